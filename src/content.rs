//! Content sources for generated files.
//!
//! These plugins do not render real bindings; every generated file carries a
//! small payload, either fixed at build time or read from a data file
//! shipped alongside the plugin binary.

use std::env;
use std::fs;
use std::io;
use std::path::PathBuf;

use log::debug;
use once_cell::unsync::OnceCell;

use crate::{Error, Request};

/// Where the payload of generated files comes from.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ContentSource {
    /// A fixed payload, used verbatim for every generated file.
    Literal(String),
    /// A data file at a fixed logical path, resolved through [`Runfiles`].
    File(String),
    /// A data file whose logical path is taken from the named plugin
    /// option.
    Option(String),
}

impl ContentSource {
    /// Bind the source to a decoded request.
    ///
    /// An option-supplied path is resolved here, up front: a missing or
    /// empty option fails before any output exists, even when the request
    /// holds nothing to generate.
    pub(crate) fn bind<'a>(&'a self, request: &'a Request) -> Result<Bound<'a>, Error> {
        let kind = match self {
            ContentSource::Literal(text) => Kind::Literal(text),
            ContentSource::File(path) => Kind::File(path),
            ContentSource::Option(key) => {
                let path = request
                    .option(key)
                    .filter(|path| !path.is_empty())
                    .ok_or_else(|| Error::MissingOption(key.clone()))?;
                Kind::File(path)
            }
        };
        Ok(Bound {
            kind,
            content: OnceCell::new(),
        })
    }
}

/// A content source bound to one request.
///
/// The backing file is read at most once per run, at the first generated
/// file; every file in the run shares the same payload.
pub(crate) struct Bound<'a> {
    kind: Kind<'a>,
    content: OnceCell<String>,
}

enum Kind<'a> {
    Literal(&'a str),
    File(&'a str),
}

impl Bound<'_> {
    pub(crate) fn get(&self, runfiles: &dyn Runfiles) -> Result<&str, Error> {
        self.content
            .get_or_try_init(|| match self.kind {
                Kind::Literal(text) => Ok(text.to_owned()),
                Kind::File(path) => read_trimmed(runfiles, path),
            })
            .map(String::as_str)
    }
}

/// Read a data file and strip surrounding whitespace, so payloads compare
/// equal across unix and windows line ending conventions.
fn read_trimmed(runfiles: &dyn Runfiles, path: &str) -> Result<String, Error> {
    let resource = |source| Error::Resource {
        path: path.to_owned(),
        source,
    };

    let location = runfiles.resolve(path).map_err(resource)?;
    let bytes = fs::read(&location).map_err(resource)?;
    debug!("read {} bytes from {:?}", bytes.len(), location);

    // File.content in the response is a protobuf string.
    let text = String::from_utf8(bytes)
        .map_err(|error| resource(io::Error::new(io::ErrorKind::InvalidData, error)))?;

    Ok(text.trim().to_owned())
}

/// Maps the logical path of a data file to its location on disk.
///
/// This stands in for the build system's runfiles lookup, injected so the
/// exchange can be exercised against a plain directory in tests.
pub trait Runfiles {
    fn resolve(&self, path: &str) -> io::Result<PathBuf>;
}

/// Resolves data files under the `RUNFILES_DIR` environment variable when
/// it is set, and relative to the working directory otherwise.
#[derive(Clone, Copy, Debug, Default)]
pub struct EnvRunfiles;

impl Runfiles for EnvRunfiles {
    fn resolve(&self, path: &str) -> io::Result<PathBuf> {
        match env::var("RUNFILES_DIR") {
            Ok(root) => Ok(PathBuf::from(root).join(path)),
            Err(env::VarError::NotPresent) => Ok(PathBuf::from(path)),
            Err(env::VarError::NotUnicode(..)) => Err(io::Error::new(
                io::ErrorKind::InvalidData,
                "RUNFILES_DIR environment variable is not valid UTF-8",
            )),
        }
    }
}
