//! Greets every generated file with a fixed payload, laid out by package
//! directory. Wants no options.

use std::process;

use protoc_testgen::{ContentSource, NamingPolicy, Plugin};

fn main() {
    env_logger::init();

    let plugin = Plugin::new(
        NamingPolicy::PackageDir,
        ContentSource::Literal("hello, world!".to_owned()),
    );
    if let Err(error) = plugin.run() {
        eprintln!("{}", error);
        process::exit(1);
    }
}
