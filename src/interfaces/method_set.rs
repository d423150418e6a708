use indexmap::IndexMap;
use rustc_hash::FxHashSet;
use smol_str::SmolStr;
use tracing::warn;

use crate::graph::{Module, Symbol, SymbolId, SymbolKind};
use crate::index::SymbolIndex;

/// Method name → the method symbol providing it.
pub type MethodSet = IndexMap<SmolStr, SymbolId>;

/// Depth-first walk from `start` over embedded members.
///
/// Each node contributes the methods declared on it, then the nodes its
/// embedded members resolve to are visited in declaration order. Struct
/// fields and interface embeddings are followed alike. The first method seen
/// for a name wins; a node is visited at most once, so cyclic embedding
/// terminates.
pub(crate) fn effective_methods(module: &Module, index: &SymbolIndex, start: &SymbolId) -> MethodSet {
    let mut methods = MethodSet::new();
    let mut visited: FxHashSet<SymbolId> = FxHashSet::default();
    let mut stack = vec![start.clone()];

    while let Some(node) = stack.pop() {
        if !visited.insert(node.clone()) {
            continue;
        }
        let mut embedded = Vec::new();
        for member in members(module, index, &node) {
            match member.kind {
                SymbolKind::Method => {
                    methods
                        .entry(member.name.clone())
                        .or_insert_with(|| member.id.clone());
                }
                kind if kind.is_embedding() => {
                    if let Some(target) = &member.embeds {
                        embedded.push(target.clone());
                    }
                }
                _ => {}
            }
        }
        stack.extend(embedded.into_iter().rev());
    }
    methods
}

/// Methods declared directly on `owner`.
pub(crate) fn direct_methods(module: &Module, index: &SymbolIndex, owner: &SymbolId) -> MethodSet {
    members(module, index, owner)
        .filter(|m| m.kind == SymbolKind::Method)
        .map(|m| (m.name.clone(), m.id.clone()))
        .collect()
}

/// Targets of the embedded members of `owner`, in declaration order.
pub(crate) fn embedded_targets<'m>(
    module: &'m Module,
    index: &'m SymbolIndex,
    owner: &SymbolId,
) -> impl Iterator<Item = &'m SymbolId> {
    members(module, index, owner)
        .filter(|m| m.kind.is_embedding())
        .filter_map(|m| m.embeds.as_ref())
}

fn members<'m>(
    module: &'m Module,
    index: &'m SymbolIndex,
    owner: &SymbolId,
) -> impl Iterator<Item = &'m Symbol> {
    index
        .children_ids(owner)
        .iter()
        .filter_map(move |id| match module.symbol(id) {
            Some(symbol) => Some(symbol),
            None => {
                warn!("[INTERFACES] index lists {} but the module does not", id);
                None
            }
        })
}
