//! The loader seam: whatever parses and type-checks the source tree.

use std::path::Path;

use thiserror::Error;

use super::source::LoadedPackage;

/// Errors reported by a [`PackageLoader`] for the module as a whole.
#[derive(Debug, Error)]
pub enum LoadError {
    /// IO error while reading the source tree.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// The loader gave up on the whole module.
    #[error("Loader failed: {0}")]
    Failed(String),
}

/// External collaborator producing declarations for every package under a
/// module root.
///
/// Per-package problems belong in [`LoadedPackage::errors`]; an `Err` here
/// means nothing could be loaded at all.
pub trait PackageLoader {
    fn load(&self, root: &Path) -> Result<Vec<LoadedPackage>, LoadError>;
}

/// A loader over packages that are already resident in memory.
#[derive(Clone, Debug, Default)]
pub struct MemoryLoader {
    packages: Vec<LoadedPackage>,
}

impl MemoryLoader {
    pub fn new(packages: Vec<LoadedPackage>) -> Self {
        Self { packages }
    }

    pub fn with_package(mut self, package: LoadedPackage) -> Self {
        self.packages.push(package);
        self
    }
}

impl PackageLoader for MemoryLoader {
    fn load(&self, _root: &Path) -> Result<Vec<LoadedPackage>, LoadError> {
        Ok(self.packages.clone())
    }
}

impl<F> PackageLoader for F
where
    F: Fn(&Path) -> Result<Vec<LoadedPackage>, LoadError>,
{
    fn load(&self, root: &Path) -> Result<Vec<LoadedPackage>, LoadError> {
        self(root)
    }
}
