//! Test plugins for the protoc code generator exchange.
//!
//! A protoc plugin is a program that reads a serialized
//! `CodeGeneratorRequest` on standard input and answers with a serialized
//! `CodeGeneratorResponse` on standard output. The plugins in this crate do
//! not generate real bindings: they emit small, known payloads so that a
//! build system integrating protoc can assert on the mechanics of the
//! exchange itself, from the paths of generated files down to how failures
//! are reported back to the compiler.
//!
//! A plugin is a [`NamingPolicy`] (where output files go) combined with a
//! [`ContentSource`] (what they contain), driven over one request:
//!
//! ```rust,no_run
//! use protoc_testgen::{ContentSource, NamingPolicy, Plugin};
//!
//! fn main() {
//!     env_logger::init();
//!
//!     let plugin = Plugin::new(
//!         NamingPolicy::PackageDir,
//!         ContentSource::Option("testdata".to_owned()),
//!     );
//!     if let Err(error) = plugin.run() {
//!         eprintln!("{}", error);
//!         std::process::exit(1);
//!     }
//! }
//! ```
//!
//! protoc finds the binary through `--plugin` and forwards options through
//! the plugin parameter:
//!
//! ```bash
//! $ protoc --plugin=target/debug/protoc-gen-testdata \
//!       --testdata_out=out --testdata_opt=testdata=conf/greeting.txt \
//!       greeting.proto
//! ```

mod content;
mod error;
mod path;
mod request;

pub use crate::content::{ContentSource, EnvRunfiles, Runfiles};
pub use crate::error::Error;
pub use crate::path::{NamingPolicy, DEFAULT_SUFFIX};
pub use crate::request::{ProtoFile, Request};

use std::io::{self, Read, Write};

use log::{debug, trace};
use prost::Message;
use prost_types::compiler::{code_generator_response, CodeGeneratorResponse};

/// A configured plugin: a naming policy plus a content source, shared by
/// every file of a request.
///
/// The configuration is fixed once the plugin is built; one `Plugin` value
/// services one compiler invocation.
pub struct Plugin {
    naming: NamingPolicy,
    content: ContentSource,
    runfiles: Box<dyn Runfiles>,
}

impl Plugin {
    /// Create a plugin that resolves data files through [`EnvRunfiles`].
    pub fn new(naming: NamingPolicy, content: ContentSource) -> Plugin {
        Plugin {
            naming,
            content,
            runfiles: Box::new(EnvRunfiles),
        }
    }

    /// Replace the lookup used for [`ContentSource::File`] and
    /// [`ContentSource::Option`] sources.
    pub fn runfiles<R>(&mut self, runfiles: R) -> &mut Plugin
    where
        R: Runfiles + 'static,
    {
        self.runfiles = Box::new(runfiles);
        self
    }

    /// Service one compiler invocation over stdin and stdout.
    ///
    /// Generation failures are still answered with a well-formed response
    /// whose `error` field is set (protoc reports that string to its user),
    /// then surfaced as `Err` here so the process exits non-zero. An error
    /// with no response written means stdin or stdout itself failed.
    pub fn run(&self) -> io::Result<()> {
        let mut buf = Vec::new();
        io::stdin().read_to_end(&mut buf)?;

        let response = self.execute(&buf);

        buf.clear();
        response.encode(&mut buf).map_err(Error::from)?;
        io::stdout().write_all(&buf)?;

        match response.error {
            Some(error) => Err(io::Error::new(io::ErrorKind::Other, error)),
            None => Ok(()),
        }
    }

    /// Turn a serialized `CodeGeneratorRequest` into the response protoc
    /// reads back.
    ///
    /// Any failure, from a malformed request to an unreadable data file,
    /// becomes the response's `error`; a response never carries both an
    /// error and generated files. Equal inputs produce byte-identical
    /// responses: file order follows the request, and nothing here depends
    /// on map iteration order or time.
    pub fn execute(&self, buf: &[u8]) -> CodeGeneratorResponse {
        match self.generate(buf) {
            Ok(file) => CodeGeneratorResponse {
                file,
                ..Default::default()
            },
            Err(error) => CodeGeneratorResponse {
                error: Some(error.to_string()),
                ..Default::default()
            },
        }
    }

    fn generate(&self, buf: &[u8]) -> Result<Vec<code_generator_response::File>, Error> {
        let request = Request::decode(buf)?;
        debug!(
            "decoded request: {} descriptors, {} to generate, parameter {:?}",
            request.files().len(),
            request.files().iter().filter(|f| f.generate()).count(),
            request.parameter(),
        );

        let content = self.content.bind(&request)?;

        let mut files = Vec::new();
        for proto in request.files() {
            if !proto.generate() {
                trace!("skipping dependency {}", proto.name());
                continue;
            }

            let name = self.naming.output_path(proto);
            let payload = content.get(self.runfiles.as_ref())?;
            trace!("{} -> {}", proto.name(), name);

            files.push(code_generator_response::File {
                name: Some(name),
                content: Some(payload.to_owned()),
                ..Default::default()
            });
        }
        Ok(files)
    }
}
