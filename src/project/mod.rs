//! Loading a module from disk.
//!
//! Reads the module manifest, hands the source tree to a
//! [`PackageLoader`](crate::syntax::PackageLoader) and builds the graph.

mod manifest;
mod module_loader;

pub use manifest::{Manifest, ManifestError, parse_manifest, read_manifest};
pub use module_loader::ModuleLoader;
