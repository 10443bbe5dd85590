//! Plugin protocol errors.

use std::error;
use std::fmt;
use std::io;

/// An error raised while servicing a code generator request.
///
/// Every variant is reported back to protoc through the `error` field of the
/// `CodeGeneratorResponse`; the plugin never answers with a partial file
/// list.
#[derive(Debug)]
pub enum Error {
    /// A required plugin option was absent from the request parameter.
    MissingOption(String),
    /// The backing content file could not be resolved or read.
    Resource {
        /// The logical path of the file, as configured or as passed in the
        /// plugin parameter.
        path: String,
        source: io::Error,
    },
    /// The compiler request was malformed.
    Decode(prost::DecodeError),
    /// The response could not be serialized.
    Encode(prost::EncodeError),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Error::MissingOption(key) => write!(f, "option {key:?} is required"),
            Error::Resource { path, source } => write!(f, "failed to open {path:?}: {source}"),
            Error::Decode(error) => write!(f, "invalid CodeGeneratorRequest: {error}"),
            Error::Encode(error) => write!(f, "invalid CodeGeneratorResponse: {error}"),
        }
    }
}

impl error::Error for Error {
    fn source(&self) -> Option<&(dyn error::Error + 'static)> {
        match self {
            Error::MissingOption(_) => None,
            Error::Resource { source, .. } => Some(source),
            Error::Decode(error) => Some(error),
            Error::Encode(error) => Some(error),
        }
    }
}

impl From<prost::DecodeError> for Error {
    fn from(error: prost::DecodeError) -> Error {
        Error::Decode(error)
    }
}

impl From<prost::EncodeError> for Error {
    fn from(error: prost::EncodeError) -> Error {
        Error::Encode(error)
    }
}

impl From<Error> for io::Error {
    fn from(error: Error) -> io::Error {
        let kind = match &error {
            Error::MissingOption(_) => io::ErrorKind::InvalidInput,
            Error::Resource { source, .. } => source.kind(),
            Error::Decode(_) => io::ErrorKind::InvalidData,
            Error::Encode(_) => io::ErrorKind::InvalidInput,
        };
        io::Error::new(kind, error)
    }
}
