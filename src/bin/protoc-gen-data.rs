//! Emits the contents of the data file named by the required `config`
//! option, renaming each input's `.proto` suffix to `.data.pb` in place.

use std::process;

use protoc_testgen::{ContentSource, NamingPolicy, Plugin};

fn main() {
    env_logger::init();

    let plugin = Plugin::new(
        NamingPolicy::Suffix(".data.pb".to_owned()),
        ContentSource::Option("config".to_owned()),
    );
    if let Err(error) = plugin.run() {
        eprintln!("{}", error);
        process::exit(1);
    }
}
