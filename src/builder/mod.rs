//! Graph builder: turns loaded packages into a [`Module`].
//!
//! A build runs in two phases over every package:
//!
//! 1. **Declare** – each file's declarations become symbols of the package.
//!    Files are processed independently; a file that is malformed or makes
//!    the declaration code panic is removed again and reported, its siblings
//!    are unaffected.
//! 2. **Link** – methods are wired to receiver types, embedded members to
//!    the types they embed, and references are recorded for imports, type
//!    annotations and the use sites reported by the type-checker.
//!
//! [`GraphBuilder::update_files`] re-runs both phases for a set of changed
//! files only. Symbol IDs are stable, so references from unchanged files to
//! symbols of a changed file are carried over to the re-declared symbols.

mod declare;
mod error;
mod link;
mod report;

use std::panic::{self, AssertUnwindSafe};
use std::sync::Arc;

use indexmap::IndexSet;
use rustc_hash::FxHashSet;
use tracing::debug;

use crate::config::GraphConfig;
use crate::graph::{Module, Package, RefVia, Reference, SymbolId};
use crate::syntax::{LoadedPackage, SourceFile};

pub use error::BuildError;
pub use report::BuildReport;

/// New contents of one file for [`GraphBuilder::update_files`].
#[derive(Clone, Debug)]
pub struct ChangedFile {
    /// Import path of the package the file belongs to. The package is
    /// created when the module does not have it yet.
    pub import_path: String,
    pub file: SourceFile,
}

impl ChangedFile {
    pub fn new(import_path: impl Into<String>, file: SourceFile) -> Self {
        Self {
            import_path: import_path.into(),
            file,
        }
    }
}

/// Builds and incrementally updates a [`Module`].
#[derive(Clone, Debug, Default)]
pub struct GraphBuilder {
    config: GraphConfig,
}

impl GraphBuilder {
    pub fn new(config: GraphConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &GraphConfig {
        &self.config
    }

    /// Declare and link `packages` into `module`.
    ///
    /// Packages the loader reported errors for are skipped, as are files that
    /// fail to process. Fails only when no package could be built at all.
    pub fn build(
        &self,
        module: &mut Module,
        packages: Vec<LoadedPackage>,
    ) -> Result<BuildReport, BuildError> {
        self.build_with(module, packages, declare::declare_file)
    }

    fn build_with(
        &self,
        module: &mut Module,
        packages: Vec<LoadedPackage>,
        declare: DeclareFn,
    ) -> Result<BuildReport, BuildError> {
        let mut report = BuildReport::default();
        let mut built: Vec<Arc<str>> = Vec::new();
        let mut sources: Vec<(Arc<str>, SourceFile)> = Vec::new();

        for loaded in packages {
            if loaded.has_errors() {
                report.skip_package(BuildError::PackageErrors {
                    package: loaded.import_path,
                    errors: loaded.errors,
                });
                continue;
            }

            debug!(
                "[BUILDER] declaring {} ({} files)",
                loaded.import_path,
                loaded.files.len()
            );
            let mut package =
                Package::new(loaded.import_path.as_str(), loaded.name.as_str()).with_dir(loaded.dir);
            for file in loaded.files {
                match self.declare_guarded(&mut package, &file, declare) {
                    Ok(declared) => {
                        report.files_built += 1;
                        report.symbols += declared;
                        sources.push((package.import_path.clone(), file));
                    }
                    Err(error) => report.skip_file(error, self.config.verbose),
                }
            }
            built.push(package.import_path.clone());
            module.add_package(package);
            report.packages_built += 1;
        }

        if report.packages_built == 0 {
            return Err(BuildError::NoPackages {
                skipped: report.packages_skipped,
            });
        }

        let scope: FxHashSet<Arc<str>> = sources
            .iter()
            .map(|(_, file)| Arc::from(file.path.as_str()))
            .collect();
        link::wire_receivers(module, &built);
        link::link(module, &scope, &sources, &mut report);

        report.log_summary("build");
        Ok(report)
    }

    /// Re-process `changed` files and drop `removed` ones.
    ///
    /// The previous contents of every touched file are removed first,
    /// together with the references located in them. References to symbols
    /// of a touched file that were made from untouched files are kept and
    /// re-attached to the symbol with the same ID, if it still exists.
    pub fn update_files(
        &self,
        module: &mut Module,
        changed: Vec<ChangedFile>,
        removed: &[String],
    ) -> BuildReport {
        let mut report = BuildReport::default();
        let touched: FxHashSet<Arc<str>> = changed
            .iter()
            .map(|c| c.file.path.as_str())
            .chain(removed.iter().map(String::as_str))
            .map(Arc::<str>::from)
            .collect();

        let carried = carry_references(module, &touched);

        let mut packages: IndexSet<Arc<str>> = IndexSet::new();
        for path in &touched {
            if let Some(package) = module.package_of_file(path) {
                packages.insert(package.import_path.clone());
            }
        }
        for path in &touched {
            module.remove_file(path);
        }

        let mut sources: Vec<(Arc<str>, SourceFile)> = Vec::new();
        for change in changed {
            let import_path: Arc<str> = Arc::from(change.import_path.as_str());
            if module.package(&import_path).is_none() {
                module.add_package(Package::new(
                    import_path.clone(),
                    change.file.package_name.as_str(),
                ));
                report.packages_built += 1;
            }
            match self.declare_in_module(module, &import_path, &change.file) {
                Ok(declared) => {
                    report.files_built += 1;
                    report.symbols += declared;
                    sources.push((import_path.clone(), change.file));
                }
                Err(error) => report.skip_file(error, self.config.verbose),
            }
            packages.insert(import_path);
        }

        let mut dropped = 0;
        for (id, references) in carried {
            match module.symbol_mut(&id) {
                Some(symbol) => symbol.references.extend(references),
                None => dropped += references.len(),
            }
        }
        if dropped > 0 {
            debug!("[BUILDER] dropped {} references to removed symbols", dropped);
        }

        let scope: FxHashSet<Arc<str>> = sources
            .iter()
            .map(|(_, file)| Arc::from(file.path.as_str()))
            .collect();
        link::wire_receivers(module, &packages);
        link::link(module, &scope, &sources, &mut report);

        report.log_summary("update");
        report
    }

    // ============================================================
    // Per-file processing
    // ============================================================

    fn declare_guarded(
        &self,
        package: &mut Package,
        file: &SourceFile,
        declare: DeclareFn,
    ) -> Result<usize, BuildError> {
        declare::validate_file(file)?;
        package.add_file(declare::file_record(&package.import_path, file));
        let config = &self.config;
        let outcome = guard_file(&file.path, || declare(package, file, config));
        if outcome.is_err() {
            package.remove_file(&file.path);
        }
        outcome
    }

    fn declare_in_module(
        &self,
        module: &mut Module,
        import_path: &Arc<str>,
        file: &SourceFile,
    ) -> Result<usize, BuildError> {
        declare::validate_file(file)?;
        module.add_file(import_path, declare::file_record(import_path, file));
        let Some(package) = module.package_mut(import_path) else {
            return Ok(0);
        };
        let config = &self.config;
        let outcome = guard_file(&file.path, || declare::declare_file(package, file, config));
        if outcome.is_err() {
            module.remove_file(&file.path);
        }
        outcome
    }
}

/// Declaration pass run on one file.
type DeclareFn = fn(&mut Package, &SourceFile, &GraphConfig) -> usize;

/// Run `f` for the file at `path`, turning a panic into
/// [`BuildError::FilePanicked`].
fn guard_file<T>(path: &str, f: impl FnOnce() -> T) -> Result<T, BuildError> {
    panic::catch_unwind(AssertUnwindSafe(f)).map_err(|payload| BuildError::panicked(path, payload))
}

/// References on symbols of `touched` files that were made from files
/// outside the set.
///
/// Embedding references are not carried: removing the touched files clears
/// the members' targets, and linking resolves them again.
fn carry_references(
    module: &Module,
    touched: &FxHashSet<Arc<str>>,
) -> Vec<(SymbolId, Vec<Reference>)> {
    let mut carried = Vec::new();
    for path in touched {
        let Some(file) = module.file(path) else {
            continue;
        };
        for id in &file.symbols {
            let Some(symbol) = module.symbol(id) else {
                continue;
            };
            let kept: Vec<Reference> = symbol
                .references
                .iter()
                .filter(|r| !touched.contains(&r.file) && r.via != RefVia::Embedding)
                .cloned()
                .collect();
            if !kept.is_empty() {
                carried.push((id.clone(), kept));
            }
        }
    }
    carried
}
