//! Decoding of the compiler's code generator request.

use bytes::Buf;
use prost::Message;
use prost_types::compiler::CodeGeneratorRequest;

use crate::Error;

/// One compiler invocation, decoded from the bytes protoc writes to the
/// plugin's standard input.
///
/// Descriptors keep the order in which protoc listed them; that order is
/// part of the exchange contract and is preserved through to the response.
#[derive(Debug, Default)]
pub struct Request {
    parameter: String,
    files: Vec<ProtoFile>,
}

/// A `.proto` file known to the compiler: either a file the plugin must
/// generate output for, or a transitive dependency along for the ride.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ProtoFile {
    name: String,
    package: String,
    generate: bool,
}

impl Request {
    /// Decode a serialized `CodeGeneratorRequest`.
    ///
    /// The whole input must be a well-formed request; truncated or otherwise
    /// malformed bytes fail with [`Error::Decode`].
    pub fn decode<B>(buf: B) -> Result<Request, Error>
    where
        B: Buf,
    {
        let raw = CodeGeneratorRequest::decode(buf)?;

        let files = raw
            .proto_file
            .iter()
            .map(|descriptor| ProtoFile {
                name: descriptor.name().to_owned(),
                package: descriptor.package().to_owned(),
                generate: raw
                    .file_to_generate
                    .iter()
                    .any(|name| name == descriptor.name()),
            })
            .collect();

        Ok(Request {
            parameter: raw.parameter.unwrap_or_default(),
            files,
        })
    }

    /// The descriptors of this invocation, in protoc's order.
    pub fn files(&self) -> &[ProtoFile] {
        &self.files
    }

    /// The raw plugin parameter string.
    pub fn parameter(&self) -> &str {
        &self.parameter
    }

    /// Look up an option from the plugin parameter.
    ///
    /// protoc joins repeated `--<plugin>_opt` flags into one comma-separated
    /// string of `key=value` entries; a bare key reads as the empty value.
    /// When a key repeats, the last occurrence wins.
    pub fn option(&self, key: &str) -> Option<&str> {
        let mut value = None;
        for entry in self.parameter.split(',') {
            let (k, v) = match entry.split_once('=') {
                Some((k, v)) => (k, v),
                None => (entry, ""),
            };
            if k == key {
                value = Some(v);
            }
        }
        value
    }
}

impl ProtoFile {
    pub fn new(name: impl Into<String>, package: impl Into<String>, generate: bool) -> ProtoFile {
        ProtoFile {
            name: name.into(),
            package: package.into(),
            generate,
        }
    }

    /// The file's logical path, ending in `.proto`.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The file's dot-separated package; may be empty.
    pub fn package(&self) -> &str {
        &self.package
    }

    /// Whether protoc asked for output for this file, as opposed to merely
    /// supplying it as a dependency.
    pub fn generate(&self) -> bool {
        self.generate
    }
}
