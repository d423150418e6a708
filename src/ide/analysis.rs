//! AnalysisHost and Analysis: state ownership and read-only snapshots.
//!
//! The `AnalysisHost` owns the module graph and its index. Loads and
//! incremental updates go through the host, which keeps the index in step
//! with the graph; queries go through an `Analysis` borrowed from it.
//!
//! ## Usage
//!
//! ```ignore
//! let (mut host, report) = AnalysisHost::load(loader, "/src/app", GraphConfig::default())?;
//!
//! host.update_files(vec![ChangedFile::new("example.com/app", edited)], &[]);
//!
//! let analysis = host.analysis();
//! let impls = analysis.find_implementations(&reader_id, &ImplementationFilter::new())?;
//! ```

use std::path::PathBuf;
use std::sync::Arc;

use tracing::debug;

use crate::base::Position;
use crate::builder::{BuildError, BuildReport, ChangedFile, GraphBuilder};
use crate::config::GraphConfig;
use crate::graph::{Module, Symbol, SymbolId, SymbolKind};
use crate::index::{IndexedReference, SymbolIndex};
use crate::interfaces::{
    ImplementationFilter, ImplementationInfo, InterfaceEngine, InterfaceError, MethodSet,
};
use crate::project::ModuleLoader;
use crate::syntax::PackageLoader;
use crate::usage::{self, SymbolUsage, UsageError, UsageMap};

use super::references::{self, ReferenceResult};
use super::symbols::{self, SymbolInfo};

/// Owns the module graph and its index.
pub struct AnalysisHost {
    module: Module,
    index: SymbolIndex,
    builder: GraphBuilder,
}

impl AnalysisHost {
    /// Wrap an already built module.
    pub fn new(module: Module, config: GraphConfig) -> Self {
        let index = SymbolIndex::build(&module);
        Self {
            module,
            index,
            builder: GraphBuilder::new(config),
        }
    }

    /// Load and build the module rooted at `root`.
    pub fn load<L: PackageLoader>(
        loader: L,
        root: impl Into<PathBuf>,
        config: GraphConfig,
    ) -> Result<(Self, BuildReport), BuildError> {
        let (module, report) = ModuleLoader::new(loader, config.clone()).load(root)?;
        Ok((Self::new(module, config), report))
    }

    /// Re-process `changed` files and drop `removed` ones, then bring the
    /// index up to date.
    pub fn update_files(&mut self, changed: Vec<ChangedFile>, removed: &[String]) -> BuildReport {
        let touched: Vec<Arc<str>> = changed
            .iter()
            .map(|c| c.file.path.as_str())
            .chain(removed.iter().map(String::as_str))
            .map(Arc::<str>::from)
            .collect();
        let report = self.builder.update_files(&mut self.module, changed, removed);
        self.index.update(&self.module, &touched);
        debug!("[ANALYSIS] index updated for {} files", touched.len());
        report
    }

    pub fn config(&self) -> &GraphConfig {
        self.builder.config()
    }

    pub fn module(&self) -> &Module {
        &self.module
    }

    pub fn index(&self) -> &SymbolIndex {
        &self.index
    }

    /// Give up the module, e.g. to share it with a background usage pass.
    pub fn into_module(self) -> Module {
        self.module
    }

    /// A consistent snapshot for querying.
    pub fn analysis(&self) -> Analysis<'_> {
        Analysis {
            module: &self.module,
            index: &self.index,
        }
    }
}

/// An immutable snapshot of the analysis state.
#[derive(Clone, Copy)]
pub struct Analysis<'a> {
    module: &'a Module,
    index: &'a SymbolIndex,
}

impl<'a> Analysis<'a> {
    pub fn new(module: &'a Module, index: &'a SymbolIndex) -> Self {
        Self { module, index }
    }

    pub fn module(&self) -> &'a Module {
        self.module
    }

    pub fn index(&self) -> &'a SymbolIndex {
        self.index
    }

    // ==================== Symbol queries ====================

    pub fn symbol(&self, id: &SymbolId) -> Option<&'a Symbol> {
        self.index.symbol(self.module, id)
    }

    /// Symbols named exactly `name`, optionally of one kind.
    pub fn symbols_named(&self, name: &str, kind: Option<SymbolKind>) -> Vec<&'a Symbol> {
        self.resolve(self.index.ids_named(name).iter(), kind)
    }

    /// Symbols whose name starts with `prefix`, optionally of one kind.
    pub fn symbols_with_prefix(&self, prefix: &str, kind: Option<SymbolKind>) -> Vec<&'a Symbol> {
        self.resolve(self.index.ids_with_prefix(prefix), kind)
    }

    pub fn symbols_of_kind(&self, kind: SymbolKind) -> Vec<&'a Symbol> {
        self.resolve(self.index.ids_of_kind(kind), None)
    }

    pub fn symbols_in_file(&self, file: &str) -> Vec<&'a Symbol> {
        self.resolve(self.index.ids_in_file(file).iter(), None)
    }

    /// The innermost declaration in `file` containing `position`.
    pub fn symbol_at(&self, file: &str, position: Position) -> Option<&'a Symbol> {
        let id = self.index.id_at(file, position)?;
        self.module.symbol(id)
    }

    /// Members of `parent` in declaration order.
    pub fn children(&self, parent: &SymbolId) -> Vec<&'a Symbol> {
        self.resolve(self.index.children_ids(parent).iter(), None)
    }

    fn resolve<'i>(
        &self,
        ids: impl Iterator<Item = &'i SymbolId>,
        kind: Option<SymbolKind>,
    ) -> Vec<&'a Symbol> {
        let module = self.module;
        ids.filter_map(|id| module.symbol(id))
            .filter(|symbol| kind.is_none_or(|k| symbol.kind == k))
            .collect()
    }

    // ==================== References ====================

    pub fn find_references(&self, id: &SymbolId, include_declaration: bool) -> ReferenceResult {
        references::find_references(self.module, id, include_declaration)
    }

    /// Find references to whatever is under the cursor.
    pub fn find_references_at(
        &self,
        file: &str,
        position: Position,
        include_declaration: bool,
    ) -> ReferenceResult {
        references::find_references_at(self.module, self.index, file, position, include_declaration)
    }

    /// References located in `file`.
    pub fn references_in_file(&self, file: &str) -> &'a [IndexedReference] {
        self.index.references_in_file(file)
    }

    // ==================== Interfaces ====================

    fn interfaces(&self) -> InterfaceEngine<'a> {
        InterfaceEngine::new(self.module, self.index)
    }

    pub fn method_set(&self, id: &SymbolId) -> Result<MethodSet, InterfaceError> {
        self.interfaces().method_set(id)
    }

    pub fn is_implemented_by(
        &self,
        contract: &SymbolId,
        candidate: &SymbolId,
    ) -> Result<bool, InterfaceError> {
        self.interfaces().is_implemented_by(contract, candidate)
    }

    pub fn implementation_info(
        &self,
        contract: &SymbolId,
        candidate: &SymbolId,
    ) -> Result<ImplementationInfo, InterfaceError> {
        self.interfaces().implementation_info(contract, candidate)
    }

    pub fn find_implementations(
        &self,
        contract: &SymbolId,
        filter: &ImplementationFilter,
    ) -> Result<Vec<SymbolId>, InterfaceError> {
        self.interfaces().find_implementations(contract, filter)
    }

    pub fn implemented_interfaces(&self, candidate: &SymbolId) -> Result<Vec<SymbolId>, InterfaceError> {
        self.interfaces().implemented_interfaces(candidate)
    }

    // ==================== Usage ====================

    pub fn usage(&self, id: &SymbolId) -> Result<SymbolUsage, UsageError> {
        usage::symbol_usage(self.module, id)
    }

    pub fn all_usage(&self) -> UsageMap {
        usage::collect_usage(self.module)
    }

    // ==================== Listings ====================

    /// Search for symbols across the module.
    pub fn workspace_symbols(&self, query: Option<&str>) -> Vec<SymbolInfo> {
        symbols::workspace_symbols(self.module, query)
    }

    /// Outline of one file.
    pub fn document_symbols(&self, file: &str) -> Vec<SymbolInfo> {
        symbols::document_symbols(self.module, self.index, file)
    }
}
