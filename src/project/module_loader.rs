use std::path::PathBuf;

use tracing::{info, warn};

use crate::builder::{BuildError, BuildReport, GraphBuilder};
use crate::config::GraphConfig;
use crate::graph::Module;
use crate::syntax::PackageLoader;

use super::manifest::read_manifest;

/// Loads a module from disk: reads the manifest, asks the package loader for
/// parsed packages, and builds the graph.
pub struct ModuleLoader<L> {
    loader: L,
    builder: GraphBuilder,
}

impl<L: PackageLoader> ModuleLoader<L> {
    pub fn new(loader: L, config: GraphConfig) -> Self {
        Self {
            loader,
            builder: GraphBuilder::new(config),
        }
    }

    pub fn config(&self) -> &GraphConfig {
        self.builder.config()
    }

    pub fn builder(&self) -> &GraphBuilder {
        &self.builder
    }

    /// Load the module rooted at `root`.
    ///
    /// A missing or unreadable manifest only fails the load when the
    /// configuration requires one; otherwise the module path stays empty.
    pub fn load(&self, root: impl Into<PathBuf>) -> Result<(Module, BuildReport), BuildError> {
        let root = root.into();
        let config = self.builder.config();
        let mut module = Module::new(root.clone());

        match read_manifest(&root, config) {
            Ok(manifest) => {
                module.path = manifest.module_path;
                module.language_version = manifest.language_version;
            }
            Err(e) if config.require_manifest => return Err(e.into()),
            Err(e) => warn!("[LOADER] continuing without manifest: {}", e),
        }

        let packages = self.loader.load(&root)?;
        info!(
            "[LOADER] {} packages loaded from {}",
            packages.len(),
            root.display()
        );
        let report = self.builder.build(&mut module, packages)?;
        Ok((module, report))
    }
}
