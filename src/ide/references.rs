//! Find references implementation.

use std::sync::Arc;

use crate::base::{Position, Span};
use crate::graph::{Module, RefVia, Symbol, SymbolId, SymbolKind};
use crate::index::SymbolIndex;

/// Result of a find-references request.
#[derive(Clone, Debug)]
pub struct ReferenceResult {
    /// The symbol the references point at, if one was found.
    pub target: Option<SymbolId>,
    /// All references found.
    pub references: Vec<ReferenceLocation>,
    /// Whether the declaration is included in `references`.
    pub include_declaration: bool,
}

impl ReferenceResult {
    pub fn empty() -> Self {
        Self {
            target: None,
            references: Vec::new(),
            include_declaration: false,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.references.is_empty()
    }

    pub fn len(&self) -> usize {
        self.references.len()
    }
}

/// One site in a [`ReferenceResult`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ReferenceLocation {
    pub file: Arc<str>,
    pub span: Span,
    /// Whether this is the declaration (vs a use).
    pub is_definition: bool,
    pub is_write: bool,
    /// `None` for the declaration.
    pub via: Option<RefVia>,
    pub context: Option<SymbolId>,
    /// Kind of the referenced symbol.
    pub kind: SymbolKind,
}

impl ReferenceLocation {
    fn declaration(symbol: &Symbol, file: Arc<str>) -> Self {
        Self {
            file,
            span: symbol.span,
            is_definition: true,
            is_write: false,
            via: None,
            context: symbol.parent.clone(),
            kind: symbol.kind,
        }
    }
}

/// All references to `target`, the declaration first when requested, then
/// uses ordered by file and position.
pub fn find_references(module: &Module, target: &SymbolId, include_declaration: bool) -> ReferenceResult {
    let Some(symbol) = module.symbol(target) else {
        return ReferenceResult::empty();
    };

    let mut references = Vec::new();
    if include_declaration {
        if let Some(file) = &symbol.file {
            references.push(ReferenceLocation::declaration(symbol, file.clone()));
        }
    }

    let mut uses: Vec<ReferenceLocation> = symbol
        .references
        .iter()
        .map(|r| ReferenceLocation {
            file: r.file.clone(),
            span: r.span,
            is_definition: false,
            is_write: r.is_write,
            via: Some(r.via),
            context: r.context.clone(),
            kind: symbol.kind,
        })
        .collect();
    uses.sort_by(|a, b| a.file.cmp(&b.file).then_with(|| a.span.cmp(&b.span)));
    references.extend(uses);

    ReferenceResult {
        target: Some(target.clone()),
        references,
        include_declaration,
    }
}

/// The symbol at a cursor: the target of a reference covering the position,
/// or else the innermost declaration containing it.
pub fn target_at(index: &SymbolIndex, file: &str, position: Position) -> Option<SymbolId> {
    index
        .references_in_file(file)
        .iter()
        .filter(|r| r.reference.span.contains(position))
        .min_by_key(|r| r.reference.span.nesting_key())
        .map(|r| r.target.clone())
        .or_else(|| index.id_at(file, position).cloned())
}

/// Find references to whatever is under the cursor.
pub fn find_references_at(
    module: &Module,
    index: &SymbolIndex,
    file: &str,
    position: Position,
    include_declaration: bool,
) -> ReferenceResult {
    match target_at(index, file, position) {
        Some(target) => find_references(module, &target, include_declaration),
        None => ReferenceResult::empty(),
    }
}
