//! The root container.

use std::path::PathBuf;
use std::sync::Arc;

use indexmap::IndexMap;
use rustc_hash::{FxHashMap, FxHashSet};
use tracing::debug;

use super::ids::SymbolId;
use super::package::{File, Package};
use super::reference::Reference;
use super::symbol::Symbol;

/// A whole analyzed codebase.
///
/// Owns every [`Package`]. Created once per load, mutated by the builder
/// during load and incremental update, dropped by the caller.
#[derive(Clone, Debug, Default)]
pub struct Module {
    /// Declared module path; empty until a manifest is read.
    pub path: String,
    pub root: PathBuf,
    /// Declared language version, e.g. `1.22`.
    pub language_version: Option<String>,
    packages: IndexMap<Arc<str>, Package>,
    /// File path → owning package import path.
    file_owner: FxHashMap<Arc<str>, Arc<str>>,
}

impl Module {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            ..Self::default()
        }
    }

    pub fn with_path(mut self, path: impl Into<String>) -> Self {
        self.path = path.into();
        self
    }

    // ============================================================
    // Packages
    // ============================================================

    /// Add a package. A package with the same import path is replaced.
    pub fn add_package(&mut self, package: Package) {
        if self.packages.contains_key(&package.import_path) {
            self.remove_package(&package.import_path.clone());
        }
        for file in package.files() {
            self.file_owner
                .insert(file.path.clone(), package.import_path.clone());
        }
        self.packages.insert(package.import_path.clone(), package);
    }

    pub fn remove_package(&mut self, import_path: &str) -> Option<Package> {
        let package = self.packages.shift_remove(import_path)?;
        let files: Vec<Arc<str>> = package.files().map(|f| f.path.clone()).collect();
        for file in &files {
            self.file_owner.remove(file);
        }
        let removed: FxHashSet<SymbolId> = package.symbols().map(|s| s.id.clone()).collect();
        let files: FxHashSet<Arc<str>> = files.into_iter().collect();
        self.prune_references(|r| {
            files.contains(&r.file) || r.context.as_ref().is_some_and(|c| removed.contains(c))
        });
        self.detach_dependents(removed);
        Some(package)
    }

    pub fn package(&self, import_path: &str) -> Option<&Package> {
        self.packages.get(import_path)
    }

    pub fn package_mut(&mut self, import_path: &str) -> Option<&mut Package> {
        self.packages.get_mut(import_path)
    }

    pub fn packages(&self) -> impl Iterator<Item = &Package> {
        self.packages.values()
    }

    pub fn package_count(&self) -> usize {
        self.packages.len()
    }

    /// Package whose name (not import path) is `name`.
    pub fn package_named(&self, name: &str) -> Option<&Package> {
        self.packages.values().find(|p| p.name == name)
    }

    // ============================================================
    // Files
    // ============================================================

    /// Add a file to the package `package`. No-op when the package is absent.
    ///
    /// A file already registered under the same path, in any package, is
    /// removed first through [`Module::remove_file`].
    pub fn add_file(&mut self, package: &str, file: File) -> bool {
        if !self.packages.contains_key(package) {
            return false;
        }
        if self.file_owner.contains_key(&file.path) {
            self.remove_file(&file.path.clone());
        }
        let Some(pkg) = self.packages.get_mut(package) else {
            return false;
        };
        self.file_owner
            .insert(file.path.clone(), pkg.import_path.clone());
        pkg.add_file(file);
        true
    }

    /// Remove a file, its symbols, and every reference located in it or
    /// made from one of its symbols, across the whole module.
    ///
    /// Edges into the removed symbols from other files are cleared as
    /// described on [`Module::remove_symbol`].
    pub fn remove_file(&mut self, path: &str) -> Option<(File, Vec<Symbol>)> {
        let owner = self.file_owner.remove(path)?;
        let (file, mut symbols) = self.packages.get_mut(&owner)?.remove_file(path)?;
        let removed: FxHashSet<SymbolId> = symbols.iter().map(|s| s.id.clone()).collect();
        let pruned = self.prune_references(|r| {
            &*r.file == path || r.context.as_ref().is_some_and(|c| removed.contains(c))
        });
        symbols.extend(self.detach_dependents(removed));
        debug!(
            "[MODULE] removed file {} ({} symbols, {} references pruned)",
            path,
            symbols.len(),
            pruned
        );
        Some((file, symbols))
    }

    pub fn file(&self, path: &str) -> Option<&File> {
        let owner = self.file_owner.get(path)?;
        self.packages.get(owner)?.file(path)
    }

    /// Package owning the file at `path`.
    pub fn package_of_file(&self, path: &str) -> Option<&Package> {
        self.packages.get(self.file_owner.get(path)?)
    }

    pub fn files(&self) -> impl Iterator<Item = &File> {
        self.packages.values().flat_map(|p| p.files())
    }

    pub fn file_count(&self) -> usize {
        self.file_owner.len()
    }

    // ============================================================
    // Symbols
    // ============================================================

    /// Find a symbol by ID. The owning package is read off the ID.
    pub fn symbol(&self, id: &SymbolId) -> Option<&Symbol> {
        self.packages.get(id.package_path())?.symbol(id)
    }

    pub fn symbol_mut(&mut self, id: &SymbolId) -> Option<&mut Symbol> {
        self.packages.get_mut(id.package_path())?.symbol_mut(id)
    }

    pub fn symbols(&self) -> impl Iterator<Item = &Symbol> {
        self.packages.values().flat_map(|p| p.symbols())
    }

    pub fn symbol_count(&self) -> usize {
        self.packages.values().map(|p| p.symbol_count()).sum()
    }

    /// Remove a symbol and prune the references made from it.
    ///
    /// Nothing is left pointing at the removed symbol: methods declared with
    /// it as receiver type lose their parent, embedded members lose their
    /// target, and members declared inside it (fields, embedded members,
    /// interface methods, parameters) are removed with it.
    pub fn remove_symbol(&mut self, id: &SymbolId) -> Option<Symbol> {
        let symbol = self.packages.get_mut(id.package_path())?.remove_symbol(id)?;
        self.prune_references(|r| r.context.as_ref() == Some(id));
        let mut removed = FxHashSet::default();
        removed.insert(id.clone());
        self.detach_dependents(removed);
        Some(symbol)
    }

    /// Clear `parent` and `embeds` edges into `removed`, removing members
    /// that cannot outlive their parent. Repeats for the members removed
    /// this way. Returns those members.
    fn detach_dependents(&mut self, mut removed: FxHashSet<SymbolId>) -> Vec<Symbol> {
        let mut cascaded = Vec::new();
        while !removed.is_empty() {
            let mut members: Vec<SymbolId> = Vec::new();
            for package in self.packages.values_mut() {
                for symbol in package.symbols_mut() {
                    if symbol.embeds.as_ref().is_some_and(|t| removed.contains(t)) {
                        symbol.embeds = None;
                    }
                    if !symbol.parent.as_ref().is_some_and(|p| removed.contains(p)) {
                        continue;
                    }
                    if symbol.receiver.is_some() {
                        symbol.parent = None;
                    } else {
                        members.push(symbol.id.clone());
                    }
                }
            }

            removed.clear();
            for member in members {
                let Some(symbol) = self
                    .packages
                    .get_mut(member.package_path())
                    .and_then(|p| p.remove_symbol(&member))
                else {
                    continue;
                };
                removed.insert(member);
                cascaded.push(symbol);
            }
            if !removed.is_empty() {
                self.prune_references(|r| r.context.as_ref().is_some_and(|c| removed.contains(c)));
            }
        }
        if !cascaded.is_empty() {
            debug!("[MODULE] removed {} members with their parent", cascaded.len());
        }
        cascaded
    }

    // ============================================================
    // References
    // ============================================================

    /// Append a reference to `target`. Returns false if the target is unknown.
    pub fn add_reference(&mut self, target: &SymbolId, reference: Reference) -> bool {
        match self.symbol_mut(target) {
            Some(symbol) => {
                symbol.references.push(reference);
                true
            }
            None => false,
        }
    }

    /// Drop every reference matching `pred`, on every symbol. Returns the
    /// number of references removed.
    pub fn prune_references<F>(&mut self, pred: F) -> usize
    where
        F: Fn(&Reference) -> bool,
    {
        let mut pruned = 0;
        for package in self.packages.values_mut() {
            for symbol in package.symbols_mut() {
                let before = symbol.references.len();
                symbol.references.retain(|r| !pred(r));
                pruned += before - symbol.references.len();
            }
        }
        pruned
    }

    pub fn reference_count(&self) -> usize {
        self.symbols().map(|s| s.references.len()).sum()
    }
}
