//! Emits the contents of a data file at a fixed logical path, proving the
//! plugin can reach its own runfiles without any options. Each input's
//! `.proto` suffix is renamed to `.executable_runfiles.pb` in place.

use std::process;

use protoc_testgen::{ContentSource, NamingPolicy, Plugin};

const CONFIG_PATH: &str = "testdata/executable_runfiles.conf";

fn main() {
    env_logger::init();

    let plugin = Plugin::new(
        NamingPolicy::Suffix(".executable_runfiles.pb".to_owned()),
        ContentSource::File(CONFIG_PATH.to_owned()),
    );
    if let Err(error) = plugin.run() {
        eprintln!("{}", error);
        process::exit(1);
    }
}
