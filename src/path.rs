//! Output path resolution for generated files.
//!
//! Paths in the code generator exchange always use forward slashes,
//! whatever the host platform; protoc interprets them relative to its
//! output directory.

use crate::ProtoFile;

/// Suffix given to generated files unless a policy supplies its own.
pub const DEFAULT_SUFFIX: &str = ".pb.test";

const PROTO_SUFFIX: &str = ".proto";

/// Strategy mapping a `.proto` input to the path of its generated file.
///
/// Resolution is pure and total: every legal descriptor maps to some path,
/// and equal inputs always map to equal outputs.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum NamingPolicy {
    /// Lay output out by proto package: package `a.b.c` becomes directory
    /// `a/b/c`, holding `<basename>.pb.test`. An empty package puts the
    /// basename at the output root. Directories in the input name itself
    /// are discarded.
    PackageDir,
    /// Swap the `.proto` suffix for `.pb.test`, keeping any directory
    /// prefix of the input name and ignoring the package.
    FlatRename,
    /// Like [`FlatRename`](NamingPolicy::FlatRename) with a caller-chosen
    /// suffix, so independent generators can run over the same inputs
    /// without their outputs colliding.
    Suffix(String),
}

impl NamingPolicy {
    /// Resolve the output path for `file`.
    pub fn output_path(&self, file: &ProtoFile) -> String {
        match self {
            NamingPolicy::PackageDir => {
                let basename = base_name(strip_proto(file.name()));
                let mut path = file.package().replace('.', "/");
                if !path.is_empty() {
                    path.push('/');
                }
                path.push_str(basename);
                path.push_str(DEFAULT_SUFFIX);
                path
            }
            NamingPolicy::FlatRename => replace_suffix(file.name(), DEFAULT_SUFFIX),
            NamingPolicy::Suffix(suffix) => replace_suffix(file.name(), suffix),
        }
    }
}

/// Swap the `.proto` suffix of `name` for `suffix`.
///
/// A name without the `.proto` suffix keeps its full stem and still gains
/// the suffix.
fn replace_suffix(name: &str, suffix: &str) -> String {
    format!("{}{}", strip_proto(name), suffix)
}

fn strip_proto(name: &str) -> &str {
    name.strip_suffix(PROTO_SUFFIX).unwrap_or(name)
}

fn base_name(name: &str) -> &str {
    name.rfind('/').map_or(name, |slash| &name[slash + 1..])
}
