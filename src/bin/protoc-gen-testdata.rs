//! Emits the contents of the data file named by the required `testdata`
//! option, laid out by package directory.

use std::process;

use protoc_testgen::{ContentSource, NamingPolicy, Plugin};

fn main() {
    env_logger::init();

    let plugin = Plugin::new(
        NamingPolicy::PackageDir,
        ContentSource::Option("testdata".to_owned()),
    );
    if let Err(error) = plugin.run() {
        eprintln!("{}", error);
        process::exit(1);
    }
}
