use tracing::{debug, info, warn};

use super::BuildError;

/// Outcome of a build or incremental update.
#[derive(Debug, Default)]
pub struct BuildReport {
    pub packages_built: usize,
    pub packages_skipped: usize,
    pub files_built: usize,
    pub files_skipped: usize,
    /// Symbols declared, package symbols excluded.
    pub symbols: usize,
    pub references: usize,
    /// Uses and embedded types whose target is not in the module.
    pub unresolved: usize,
    /// Recoverable errors, one per skipped unit.
    pub errors: Vec<BuildError>,
}

impl BuildReport {
    pub fn is_clean(&self) -> bool {
        self.errors.is_empty()
    }

    pub(crate) fn skip_file(&mut self, error: BuildError, verbose: bool) {
        if verbose {
            warn!("[BUILDER] skipping file: {}", error);
        } else {
            debug!("[BUILDER] skipping file: {}", error);
        }
        self.files_skipped += 1;
        self.errors.push(error);
    }

    pub(crate) fn skip_package(&mut self, error: BuildError) {
        warn!("[BUILDER] {}", error);
        self.packages_skipped += 1;
        self.errors.push(error);
    }

    pub(crate) fn log_summary(&self, what: &str) {
        info!(
            "[BUILDER] {}: {} packages ({} skipped), {} files ({} skipped), {} symbols, {} references, {} unresolved",
            what,
            self.packages_built,
            self.packages_skipped,
            self.files_built,
            self.files_skipped,
            self.symbols,
            self.references,
            self.unresolved
        );
    }
}
