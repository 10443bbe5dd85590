//! End-to-end tests of the code generator exchange: a real serialized
//! `CodeGeneratorRequest` in, a `CodeGeneratorResponse` out.

use std::cell::Cell;
use std::fs;
use std::io;
use std::path::PathBuf;
use std::rc::Rc;

use pretty_assertions::assert_eq;
use prost::Message;
use prost_types::compiler::CodeGeneratorRequest;
use prost_types::FileDescriptorProto;

use protoc_testgen::{ContentSource, NamingPolicy, Plugin, Runfiles};

/// Resolves data files against a fixture directory, counting lookups so
/// tests can assert how often the content source actually goes to disk.
struct DirRunfiles {
    root: PathBuf,
    lookups: Rc<Cell<usize>>,
}

impl DirRunfiles {
    fn new(root: PathBuf) -> (DirRunfiles, Rc<Cell<usize>>) {
        let lookups = Rc::new(Cell::new(0));
        let runfiles = DirRunfiles {
            root,
            lookups: Rc::clone(&lookups),
        };
        (runfiles, lookups)
    }
}

impl Runfiles for DirRunfiles {
    fn resolve(&self, path: &str) -> io::Result<PathBuf> {
        self.lookups.set(self.lookups.get() + 1);
        Ok(self.root.join(path))
    }
}

fn descriptor(name: &str, package: &str) -> FileDescriptorProto {
    FileDescriptorProto {
        name: Some(name.to_owned()),
        package: Some(package.to_owned()),
        ..Default::default()
    }
}

/// Serialize a request over `files` (`name`, `package`) pairs, asking for
/// output for the names in `generate`.
fn request(files: &[(&str, &str)], generate: &[&str], parameter: &str) -> Vec<u8> {
    CodeGeneratorRequest {
        file_to_generate: generate.iter().map(|name| name.to_string()).collect(),
        parameter: (!parameter.is_empty()).then(|| parameter.to_owned()),
        proto_file: files
            .iter()
            .map(|(name, package)| descriptor(name, package))
            .collect(),
        ..Default::default()
    }
    .encode_to_vec()
}

fn names(response: &prost_types::compiler::CodeGeneratorResponse) -> Vec<&str> {
    response.file.iter().map(|file| file.name()).collect()
}

#[test]
fn hello_world_exchange() {
    let plugin = Plugin::new(
        NamingPolicy::PackageDir,
        ContentSource::Literal("hello, world!".to_owned()),
    );

    let buf = request(&[("x.proto", "a.b.c")], &["x.proto"], "");
    let response = plugin.execute(&buf);

    assert_eq!(response.error, None);
    assert_eq!(names(&response), ["a/b/c/x.pb.test"]);
    assert_eq!(response.file[0].content(), "hello, world!");
}

#[test]
fn order_follows_request() {
    let plugin = Plugin::new(
        NamingPolicy::FlatRename,
        ContentSource::Literal("payload".to_owned()),
    );

    let buf = request(
        &[("f1.proto", "p"), ("f2.proto", "p"), ("f3.proto", "p")],
        &["f1.proto", "f2.proto", "f3.proto"],
        "",
    );
    let response = plugin.execute(&buf);

    assert_eq!(response.error, None);
    assert_eq!(names(&response), ["f1.pb.test", "f2.pb.test", "f3.pb.test"]);
}

#[test]
fn dependencies_are_skipped() {
    let dir = tempfile::tempdir().unwrap();
    fs::write(dir.path().join("greeting.txt"), "hi").unwrap();
    let (runfiles, lookups) = DirRunfiles::new(dir.path().to_owned());

    let mut plugin = Plugin::new(
        NamingPolicy::PackageDir,
        ContentSource::File("greeting.txt".to_owned()),
    );
    plugin.runfiles(runfiles);

    let buf = request(
        &[
            ("dep.proto", "dep"),
            ("main.proto", "app"),
            ("other_dep.proto", "dep"),
        ],
        &["main.proto"],
        "",
    );
    let response = plugin.execute(&buf);

    assert_eq!(response.error, None);
    assert_eq!(names(&response), ["app/main.pb.test"]);
    assert_eq!(lookups.get(), 1);
}

#[test]
fn content_is_read_once_per_run() {
    let dir = tempfile::tempdir().unwrap();
    fs::write(dir.path().join("greeting.txt"), "hi").unwrap();
    let (runfiles, lookups) = DirRunfiles::new(dir.path().to_owned());

    let mut plugin = Plugin::new(
        NamingPolicy::FlatRename,
        ContentSource::File("greeting.txt".to_owned()),
    );
    plugin.runfiles(runfiles);

    let buf = request(
        &[("a.proto", ""), ("b.proto", ""), ("c.proto", "")],
        &["a.proto", "b.proto", "c.proto"],
        "",
    );
    let response = plugin.execute(&buf);

    assert_eq!(response.error, None);
    assert_eq!(response.file.len(), 3);
    assert_eq!(lookups.get(), 1);
}

#[test]
fn nothing_to_generate_reads_nothing() {
    let dir = tempfile::tempdir().unwrap();
    let (runfiles, lookups) = DirRunfiles::new(dir.path().to_owned());

    let mut plugin = Plugin::new(
        NamingPolicy::PackageDir,
        ContentSource::File("greeting.txt".to_owned()),
    );
    plugin.runfiles(runfiles);

    let buf = request(&[("dep.proto", "dep")], &[], "");
    let response = plugin.execute(&buf);

    assert_eq!(response.error, None);
    assert!(response.file.is_empty());
    assert_eq!(lookups.get(), 0);
}

#[test]
fn content_is_trimmed() {
    let dir = tempfile::tempdir().unwrap();
    fs::write(dir.path().join("greeting.txt"), "hello\r\n\n").unwrap();
    let (runfiles, _) = DirRunfiles::new(dir.path().to_owned());

    let mut plugin = Plugin::new(
        NamingPolicy::PackageDir,
        ContentSource::Option("testdata".to_owned()),
    );
    plugin.runfiles(runfiles);

    let buf = request(&[("x.proto", "a")], &["x.proto"], "testdata=greeting.txt");
    let response = plugin.execute(&buf);

    assert_eq!(response.error, None);
    assert_eq!(response.file[0].content(), "hello");
}

#[test]
fn missing_data_file_fails_whole_run() {
    let dir = tempfile::tempdir().unwrap();
    let (runfiles, _) = DirRunfiles::new(dir.path().to_owned());

    let mut plugin = Plugin::new(
        NamingPolicy::FlatRename,
        ContentSource::File("greeting.txt".to_owned()),
    );
    plugin.runfiles(runfiles);

    let buf = request(
        &[("a.proto", ""), ("b.proto", "")],
        &["a.proto", "b.proto"],
        "",
    );
    let response = plugin.execute(&buf);

    // All-or-nothing: no partial file list next to the error.
    assert!(response.file.is_empty());
    let error = response.error.expect("expected an error");
    assert!(error.contains("greeting.txt"), "unexpected error: {error}");
}

#[test]
fn missing_option_fails_without_touching_disk() {
    let dir = tempfile::tempdir().unwrap();
    let (runfiles, lookups) = DirRunfiles::new(dir.path().to_owned());

    let mut plugin = Plugin::new(
        NamingPolicy::PackageDir,
        ContentSource::Option("testdata".to_owned()),
    );
    plugin.runfiles(runfiles);

    let buf = request(&[("x.proto", "a")], &["x.proto"], "");
    let response = plugin.execute(&buf);

    assert!(response.file.is_empty());
    assert_eq!(
        response.error.as_deref(),
        Some("option \"testdata\" is required"),
    );
    assert_eq!(lookups.get(), 0);
}

#[test]
fn malformed_request_is_reported_in_response() {
    let plugin = Plugin::new(
        NamingPolicy::PackageDir,
        ContentSource::Literal("payload".to_owned()),
    );

    let response = plugin.execute(b"\xff\xff\xff\xff");

    assert!(response.file.is_empty());
    let error = response.error.expect("expected an error");
    assert!(
        error.contains("CodeGeneratorRequest"),
        "unexpected error: {error}"
    );
}

#[test]
fn responses_are_byte_identical_across_runs() {
    let dir = tempfile::tempdir().unwrap();
    fs::write(dir.path().join("greeting.txt"), "hello\n").unwrap();

    let buf = request(
        &[("x.proto", "a.b"), ("dep.proto", "dep"), ("y.proto", "a.b")],
        &["x.proto", "y.proto"],
        "testdata=greeting.txt",
    );

    let mut encoded = Vec::new();
    for _ in 0..2 {
        let (runfiles, _) = DirRunfiles::new(dir.path().to_owned());
        let mut plugin = Plugin::new(
            NamingPolicy::PackageDir,
            ContentSource::Option("testdata".to_owned()),
        );
        plugin.runfiles(runfiles);

        encoded.push(plugin.execute(&buf).encode_to_vec());
    }

    assert_eq!(encoded[0], encoded[1]);
}
