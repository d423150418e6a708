//! Reference classification and per-symbol usage summaries.

mod task;

use std::sync::Arc;

use indexmap::IndexSet;
use rayon::prelude::*;
use rustc_hash::FxHashMap;
use thiserror::Error;
use tracing::{debug, warn};

use crate::graph::{Module, RefVia, Reference, Symbol, SymbolId, SymbolKind};

pub use task::{UsageTask, spawn_usage_collection};

/// Usage summaries of a whole module, by symbol.
pub type UsageMap = FxHashMap<SymbolId, SymbolUsage>;

#[derive(Debug, Error)]
pub enum UsageError {
    #[error("unknown symbol {0}")]
    UnknownSymbol(SymbolId),

    #[error("malformed symbol {symbol}: {reason}")]
    Malformed { symbol: SymbolId, reason: String },

    #[error("usage collection panicked: {0}")]
    Panicked(String),

    #[error("usage collection ended without a result")]
    TaskDropped,
}

/// How a reference uses its target.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum UsageKind {
    Read,
    Write,
    Call,
    Import,
    TypeUse,
    Embed,
    Unknown,
}

impl UsageKind {
    pub const ALL: [UsageKind; 7] = [
        UsageKind::Read,
        UsageKind::Write,
        UsageKind::Call,
        UsageKind::Import,
        UsageKind::TypeUse,
        UsageKind::Embed,
        UsageKind::Unknown,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            UsageKind::Read => "read",
            UsageKind::Write => "write",
            UsageKind::Call => "call",
            UsageKind::Import => "import",
            UsageKind::TypeUse => "type-use",
            UsageKind::Embed => "embed",
            UsageKind::Unknown => "unknown",
        }
    }
}

impl std::fmt::Display for UsageKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Classify one reference to `target`.
///
/// Writes win over everything, then embedding edges. A reference without a
/// site cannot be told apart. The rest follows the kind of the target.
pub fn classify(target: &Symbol, reference: &Reference) -> UsageKind {
    if reference.is_write {
        return UsageKind::Write;
    }
    if reference.via == RefVia::Embedding {
        return UsageKind::Embed;
    }
    if reference.file.is_empty() {
        return UsageKind::Unknown;
    }
    match target.kind {
        kind if kind.is_callable() => UsageKind::Call,
        SymbolKind::Package => UsageKind::Import,
        kind if kind.is_type() => UsageKind::TypeUse,
        _ => UsageKind::Read,
    }
}

/// Aggregated references of one symbol.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SymbolUsage {
    pub symbol: SymbolId,
    pub total: usize,
    pub by_kind: FxHashMap<UsageKind, usize>,
    /// Files the references are located in.
    pub files: IndexSet<Arc<str>>,
    /// Import paths of the packages of those files.
    pub packages: IndexSet<Arc<str>>,
    /// Enclosing declarations of the references.
    pub contexts: IndexSet<SymbolId>,
}

impl SymbolUsage {
    fn empty(symbol: SymbolId) -> Self {
        Self {
            symbol,
            total: 0,
            by_kind: FxHashMap::default(),
            files: IndexSet::new(),
            packages: IndexSet::new(),
            contexts: IndexSet::new(),
        }
    }

    pub fn count(&self, kind: UsageKind) -> usize {
        self.by_kind.get(&kind).copied().unwrap_or(0)
    }

    pub fn is_unused(&self) -> bool {
        self.total == 0
    }
}

/// Summarize the references of `symbol`.
pub fn summarize(module: &Module, symbol: &Symbol) -> Result<SymbolUsage, UsageError> {
    check_symbol(symbol)?;
    let mut usage = SymbolUsage::empty(symbol.id.clone());
    for reference in &symbol.references {
        usage.total += 1;
        *usage.by_kind.entry(classify(symbol, reference)).or_insert(0) += 1;
        if !reference.file.is_empty() {
            usage.files.insert(reference.file.clone());
            if let Some(package) = module.package_of_file(&reference.file) {
                usage.packages.insert(package.import_path.clone());
            }
        }
        if let Some(context) = &reference.context {
            usage.contexts.insert(context.clone());
        }
    }
    Ok(usage)
}

/// Summarize the references of the symbol with ID `id`.
pub fn symbol_usage(module: &Module, id: &SymbolId) -> Result<SymbolUsage, UsageError> {
    let symbol = module
        .symbol(id)
        .ok_or_else(|| UsageError::UnknownSymbol(id.clone()))?;
    summarize(module, symbol)
}

/// Summarize every symbol of the module in parallel. Symbols that fail the
/// consistency check are skipped with a warning.
pub fn collect_usage(module: &Module) -> UsageMap {
    let symbols: Vec<&Symbol> = module.symbols().collect();
    let results: Vec<Result<SymbolUsage, UsageError>> = symbols
        .par_iter()
        .map(|symbol| summarize(module, symbol))
        .collect();

    let mut map = UsageMap::default();
    let mut skipped = 0;
    for result in results {
        match result {
            Ok(usage) => {
                map.insert(usage.symbol.clone(), usage);
            }
            Err(e) => {
                warn!("[USAGE] skipping: {}", e);
                skipped += 1;
            }
        }
    }
    debug!("[USAGE] collected {} symbols ({} skipped)", map.len(), skipped);
    map
}

/// A symbol whose ID disagrees with its own fields was assembled by hand or
/// corrupted; its references cannot be attributed.
fn check_symbol(symbol: &Symbol) -> Result<(), UsageError> {
    if symbol.id.package_path() != &*symbol.package {
        return Err(UsageError::Malformed {
            symbol: symbol.id.clone(),
            reason: format!("stored in package {}", symbol.package),
        });
    }
    if symbol.kind != SymbolKind::Package && symbol.name.is_empty() {
        return Err(UsageError::Malformed {
            symbol: symbol.id.clone(),
            reason: "empty name".to_string(),
        });
    }
    Ok(())
}
