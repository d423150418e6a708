//! Symbol listing for workspace and document views.

use std::sync::Arc;

use smol_str::SmolStr;

use crate::base::Span;
use crate::graph::{Module, Symbol, SymbolId, SymbolKind};
use crate::index::SymbolIndex;

/// A symbol for the workspace symbol list or document outline.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SymbolInfo {
    pub id: SymbolId,
    pub name: SmolStr,
    /// Path inside the package, e.g. `Server.Start`.
    pub local_path: SmolStr,
    pub kind: SymbolKind,
    pub package: Arc<str>,
    pub file: Option<Arc<str>>,
    pub span: Span,
    pub exported: bool,
    /// Rendered type, when one was recorded.
    pub detail: Option<String>,
}

impl SymbolInfo {
    pub fn from_symbol(symbol: &Symbol) -> Self {
        Self {
            id: symbol.id.clone(),
            name: symbol.name.clone(),
            local_path: symbol.local_path.clone(),
            kind: symbol.kind,
            package: symbol.package.clone(),
            file: symbol.file.clone(),
            span: symbol.span,
            exported: symbol.exported,
            detail: symbol.type_info.as_ref().map(|t| t.display.clone()),
        }
    }

    /// Local path of the enclosing declaration, for hierarchy building.
    pub fn container_name(&self) -> Option<&str> {
        self.local_path.rfind('.').map(|idx| &self.local_path[..idx])
    }
}

/// Parameters and package symbols are noise in symbol lists.
fn is_listed(kind: SymbolKind) -> bool {
    !matches!(kind, SymbolKind::Package | SymbolKind::Parameter)
}

/// Every symbol of the module, optionally filtered by a case-insensitive
/// substring of its name or local path. Sorted by name, then ID.
pub fn workspace_symbols(module: &Module, query: Option<&str>) -> Vec<SymbolInfo> {
    let query_lower = query.map(str::to_lowercase);

    let mut results: Vec<SymbolInfo> = module
        .symbols()
        .filter(|sym| is_listed(sym.kind))
        .filter(|sym| match &query_lower {
            Some(q) => {
                sym.name.to_lowercase().contains(q.as_str())
                    || sym.local_path.to_lowercase().contains(q.as_str())
            }
            None => true,
        })
        .map(SymbolInfo::from_symbol)
        .collect();

    results.sort_by(|a, b| a.name.cmp(&b.name).then_with(|| a.id.cmp(&b.id)));
    results
}

/// Symbols declared in `file`, in source order.
pub fn document_symbols(module: &Module, index: &SymbolIndex, file: &str) -> Vec<SymbolInfo> {
    let mut results: Vec<SymbolInfo> = index
        .ids_in_file(file)
        .iter()
        .filter_map(|id| module.symbol(id))
        .filter(|sym| is_listed(sym.kind))
        .map(SymbolInfo::from_symbol)
        .collect();

    results.sort_by(|a, b| a.span.start.cmp(&b.span.start).then_with(|| a.id.cmp(&b.id)));
    results
}
