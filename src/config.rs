//! Configuration for loading and building a module graph.

use crate::base::constants::{MANIFEST_FILE, VERSION_DIRECTIVE};

/// Options shared by the module loader and the graph builder.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GraphConfig {
    /// Index non-exported (lowercase) declarations as well as exported ones.
    pub include_unexported: bool,
    /// Log every skipped file at `warn` instead of `debug`.
    pub verbose: bool,
    /// Treat a missing or unparsable manifest as fatal.
    pub require_manifest: bool,
    /// Manifest file name looked up in the module root.
    pub manifest_file: String,
    /// Manifest directive carrying the language version.
    pub version_directive: String,
}

impl Default for GraphConfig {
    fn default() -> Self {
        Self {
            include_unexported: true,
            verbose: false,
            require_manifest: false,
            manifest_file: MANIFEST_FILE.to_string(),
            version_directive: VERSION_DIRECTIVE.to_string(),
        }
    }
}

impl GraphConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Only index exported declarations.
    pub fn exported_only(mut self) -> Self {
        self.include_unexported = false;
        self
    }

    pub fn with_include_unexported(mut self, include: bool) -> Self {
        self.include_unexported = include;
        self
    }

    pub fn with_verbose(mut self, verbose: bool) -> Self {
        self.verbose = verbose;
        self
    }

    pub fn with_require_manifest(mut self, required: bool) -> Self {
        self.require_manifest = required;
        self
    }

    pub fn with_manifest_file(mut self, file_name: impl Into<String>) -> Self {
        self.manifest_file = file_name.into();
        self
    }

    pub fn with_version_directive(mut self, directive: impl Into<String>) -> Self {
        self.version_directive = directive.into();
        self
    }
}
