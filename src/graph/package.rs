//! Packages, files and imports.

use std::path::PathBuf;
use std::sync::Arc;

use indexmap::IndexMap;
use rustc_hash::FxHashMap;
use smol_str::SmolStr;
use tracing::trace;

use crate::base::{Span, import_local_name};

use super::ids::SymbolId;
use super::symbol::{Symbol, SymbolKind};

/// One import statement inside a file.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Import {
    pub path: String,
    pub alias: Option<String>,
    pub span: Span,
    /// File containing the statement.
    pub file: Arc<str>,
}

impl Import {
    /// Name the import is referred to by inside its file.
    pub fn local_name(&self) -> &str {
        import_local_name(&self.path, self.alias.as_deref())
    }

    pub fn is_blank(&self) -> bool {
        self.alias.as_deref() == Some("_")
    }

    pub fn is_dot(&self) -> bool {
        self.alias.as_deref() == Some(".")
    }
}

/// A source file. Owned by its package; `package` is a back-reference.
#[derive(Clone, Debug)]
pub struct File {
    pub path: Arc<str>,
    /// Import path of the owning package.
    pub package: Arc<str>,
    /// Symbols declared in this file, in declaration order.
    pub symbols: Vec<SymbolId>,
    pub imports: Vec<Import>,
}

impl File {
    pub fn new(path: impl Into<Arc<str>>, package: Arc<str>) -> Self {
        Self {
            path: path.into(),
            package,
            symbols: Vec::new(),
            imports: Vec::new(),
        }
    }
}

/// A compilation unit.
///
/// Owns its files and symbols. Maintains the exported-name view and the
/// local-path lookup alongside the symbol map so no operation leaves a symbol
/// reachable from one and not the other.
#[derive(Clone, Debug)]
pub struct Package {
    pub import_path: Arc<str>,
    pub name: SmolStr,
    pub dir: PathBuf,
    files: IndexMap<Arc<str>, File>,
    symbols: IndexMap<SymbolId, Symbol>,
    /// Exported package-scope name → symbol (a view, not ownership).
    exported: FxHashMap<SmolStr, SymbolId>,
    /// Import path → import record, across all files.
    imports: IndexMap<String, Import>,
    /// Local path (`Server.Start`) → first symbol declared with it.
    by_path: FxHashMap<SmolStr, SymbolId>,
}

impl Package {
    /// Create a package together with its package symbol.
    pub fn new(import_path: impl Into<Arc<str>>, name: impl Into<SmolStr>) -> Self {
        let import_path = import_path.into();
        let name = name.into();
        let mut package = Self {
            import_path: import_path.clone(),
            name: name.clone(),
            dir: PathBuf::new(),
            files: IndexMap::new(),
            symbols: IndexMap::new(),
            exported: FxHashMap::default(),
            imports: IndexMap::new(),
            by_path: FxHashMap::default(),
        };
        let symbol = Symbol::new(
            SymbolId::for_package(&import_path),
            name,
            SymbolKind::Package,
            import_path,
        );
        package.symbols.insert(symbol.id.clone(), symbol);
        package
    }

    pub fn with_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.dir = dir.into();
        self
    }

    /// ID of this package's own symbol.
    pub fn symbol_id(&self) -> SymbolId {
        SymbolId::for_package(&self.import_path)
    }

    // ============================================================
    // Files
    // ============================================================

    /// Add a file. A file already registered under the same path is removed
    /// first, together with its symbols.
    pub fn add_file(&mut self, mut file: File) {
        if self.files.contains_key(&file.path) {
            self.remove_file(&file.path);
        }
        file.package = self.import_path.clone();
        for import in &file.imports {
            self.imports.insert(import.path.clone(), import.clone());
        }
        trace!("[PACKAGE] {} add_file {}", self.import_path, file.path);
        self.files.insert(file.path.clone(), file);
    }

    /// Remove a file and every symbol declared in it.
    pub fn remove_file(&mut self, path: &str) -> Option<(File, Vec<Symbol>)> {
        let file = self.files.shift_remove(path)?;
        let mut removed = Vec::with_capacity(file.symbols.len());
        for id in &file.symbols {
            if let Some(symbol) = self.detach_symbol(id) {
                removed.push(symbol);
            }
        }
        self.rebuild_imports();
        trace!(
            "[PACKAGE] {} remove_file {} ({} symbols)",
            self.import_path,
            path,
            removed.len()
        );
        Some((file, removed))
    }

    pub fn file(&self, path: &str) -> Option<&File> {
        self.files.get(path)
    }

    pub fn files(&self) -> impl Iterator<Item = &File> {
        self.files.values()
    }

    pub fn file_count(&self) -> usize {
        self.files.len()
    }

    /// Record an import statement on a file of this package.
    pub fn add_import(&mut self, import: Import) {
        if let Some(file) = self.files.get_mut(&import.file) {
            file.imports.push(import.clone());
            self.imports.insert(import.path.clone(), import);
        }
    }

    fn rebuild_imports(&mut self) {
        self.imports = self
            .files
            .values()
            .flat_map(|file| file.imports.iter())
            .map(|import| (import.path.clone(), import.clone()))
            .collect();
    }

    pub fn imports(&self) -> impl Iterator<Item = &Import> {
        self.imports.values()
    }

    pub fn import(&self, path: &str) -> Option<&Import> {
        self.imports.get(path)
    }

    // ============================================================
    // Symbols
    // ============================================================

    /// Add a symbol, taking ownership of it.
    ///
    /// The symbol's package is set to this package. A symbol already stored
    /// under the same ID is replaced. The symbol is appended to its declaring
    /// file's symbol list when that file belongs to this package.
    pub fn add_symbol(&mut self, mut symbol: Symbol) -> SymbolId {
        symbol.package = self.import_path.clone();
        let id = symbol.id.clone();

        if self.symbols.contains_key(&id) {
            self.detach_symbol(&id);
        }

        if symbol.exported && symbol.is_top_level() {
            self.exported.insert(symbol.name.clone(), id.clone());
        }
        self.by_path
            .entry(symbol.local_path.clone())
            .or_insert_with(|| id.clone());

        if let Some(file) = symbol.file.as_ref().and_then(|f| self.files.get_mut(f)) {
            file.symbols.push(id.clone());
        }

        trace!("[PACKAGE] add_symbol {}", id);
        self.symbols.insert(id.clone(), symbol);
        id
    }

    /// Remove a symbol from the symbol map, the exported view, the path
    /// lookup and its file's symbol list.
    ///
    /// References to the symbol go with it. References *located in* or
    /// *contextualized by* it are stored on other symbols, possibly in other
    /// packages; use [`Module::remove_symbol`](super::Module::remove_symbol)
    /// to prune those and to clear `parent` and `embeds` edges into it.
    pub fn remove_symbol(&mut self, id: &SymbolId) -> Option<Symbol> {
        if id == &self.symbol_id() {
            return None;
        }
        self.detach_symbol(id)
    }

    fn detach_symbol(&mut self, id: &SymbolId) -> Option<Symbol> {
        let symbol = self.symbols.shift_remove(id)?;

        if self.exported.get(&symbol.name) == Some(id) {
            self.exported.remove(&symbol.name);
        }

        if self.by_path.get(&symbol.local_path) == Some(id) {
            self.by_path.remove(&symbol.local_path);
            if let Some(other) = self
                .symbols
                .values()
                .find(|s| s.local_path == symbol.local_path)
            {
                self.by_path
                    .insert(symbol.local_path.clone(), other.id.clone());
            }
        }

        if let Some(file) = symbol.file.as_ref().and_then(|f| self.files.get_mut(f)) {
            file.symbols.retain(|s| s != id);
        }

        trace!("[PACKAGE] remove_symbol {}", id);
        Some(symbol)
    }

    pub fn symbol(&self, id: &SymbolId) -> Option<&Symbol> {
        self.symbols.get(id)
    }

    pub fn symbol_mut(&mut self, id: &SymbolId) -> Option<&mut Symbol> {
        self.symbols.get_mut(id)
    }

    pub fn contains_symbol(&self, id: &SymbolId) -> bool {
        self.symbols.contains_key(id)
    }

    pub fn symbols(&self) -> impl Iterator<Item = &Symbol> {
        self.symbols.values()
    }

    pub(crate) fn symbols_mut(&mut self) -> impl Iterator<Item = &mut Symbol> {
        self.symbols.values_mut()
    }

    pub fn symbol_count(&self) -> usize {
        self.symbols.len()
    }

    /// Exported package-scope symbol by name.
    pub fn exported(&self, name: &str) -> Option<&Symbol> {
        self.exported.get(name).and_then(|id| self.symbols.get(id))
    }

    pub fn exported_names(&self) -> impl Iterator<Item = &str> {
        self.exported.keys().map(|name| name.as_str())
    }

    /// Symbol by local path (`Server`, `Server.Start`).
    pub fn lookup_path(&self, local_path: &str) -> Option<&Symbol> {
        self.by_path.get(local_path).and_then(|id| self.symbols.get(id))
    }

    /// A type declared in this package with the given name.
    pub fn lookup_type(&self, name: &str) -> Option<&Symbol> {
        self.lookup_path(name).filter(|s| s.is_type()).or_else(|| {
            self.symbols
                .values()
                .find(|s| s.is_type() && s.parent.is_none() && s.name == name)
        })
    }
}
