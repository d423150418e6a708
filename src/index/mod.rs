//! Derived lookup tables over a built [`Module`].
//!
//! The index stores [`SymbolId`]s, never symbols: lookups that return a
//! [`Symbol`] resolve the ID against the module, so callers always get the
//! symbol the module owns.

mod references;

use std::collections::BTreeMap;
use std::sync::Arc;

use indexmap::IndexSet;
use rustc_hash::{FxHashMap, FxHashSet};
use smol_str::SmolStr;
use tracing::debug;

use crate::base::{Position, Span};
use crate::graph::{Module, Symbol, SymbolId, SymbolKind};

pub use references::{IndexedReference, ReferenceIndex};

/// What the index remembers about a symbol, enough to remove it again after
/// the module has moved on.
#[derive(Clone, Debug)]
struct Entry {
    name: SmolStr,
    kind: SymbolKind,
    file: Option<Arc<str>>,
    parent: Option<SymbolId>,
    span: Span,
}

impl Entry {
    fn of(symbol: &Symbol) -> Self {
        Self {
            name: symbol.name.clone(),
            kind: symbol.kind,
            file: symbol.file.clone(),
            parent: symbol.parent.clone(),
            span: symbol.span,
        }
    }
}

/// Lookup tables by ID, kind, name, file, position and parent, plus the
/// reference index.
#[derive(Clone, Debug, Default)]
pub struct SymbolIndex {
    entries: FxHashMap<SymbolId, Entry>,
    by_kind: FxHashMap<SymbolKind, IndexSet<SymbolId>>,
    /// Ordered, for prefix queries.
    by_name: BTreeMap<SmolStr, Vec<SymbolId>>,
    by_file: FxHashMap<Arc<str>, Vec<SymbolId>>,
    by_parent: FxHashMap<SymbolId, Vec<SymbolId>>,
    references: ReferenceIndex,
}

impl SymbolIndex {
    pub fn new() -> Self {
        Self::default()
    }

    /// Index every symbol and reference of `module`.
    pub fn build(module: &Module) -> Self {
        let mut index = Self::new();
        for symbol in module.symbols() {
            index.insert(symbol);
            index.insert_references(symbol);
        }
        debug!(
            "[INDEX] built: {} symbols, {} references",
            index.len(),
            index.references.len()
        );
        index
    }

    /// Re-derive everything that came from `changed` files.
    ///
    /// Entries from the previous contents of those files are removed, then
    /// the files' current symbols are indexed from `module`. Entries of other
    /// files are left alone, except where the builder re-wired a symbol's
    /// parent (a method whose receiver type moved into or out of a changed
    /// file), which are re-read.
    pub fn update(&mut self, module: &Module, changed: &[Arc<str>]) {
        let changed_set: FxHashSet<&str> = changed.iter().map(|p| &**p).collect();

        let mut old: Vec<SymbolId> = Vec::new();
        for path in changed {
            if let Some(ids) = self.by_file.get(path) {
                old.extend(ids.iter().cloned());
            }
        }
        for id in &old {
            self.remove(id);
            self.references.remove_target(id);
        }
        for path in changed {
            self.references.remove_file(path);
        }

        for path in changed {
            let Some(file) = module.file(path) else {
                continue;
            };
            for id in &file.symbols {
                if let Some(symbol) = module.symbol(id) {
                    self.insert(symbol);
                    self.insert_references(symbol);
                }
            }
        }

        let mut reparented = 0;
        for symbol in module.symbols() {
            if symbol.file.as_deref().is_some_and(|f| changed_set.contains(f)) {
                continue;
            }
            // References located in a changed file but stored on symbols of
            // other files.
            for reference in &symbol.references {
                if changed_set.contains(&*reference.file) {
                    self.references.add(symbol.id.clone(), reference.clone());
                }
            }
            match self.entries.get(&symbol.id).map(|e| e.parent == symbol.parent) {
                Some(true) => {}
                Some(false) => {
                    self.insert(symbol);
                    reparented += 1;
                }
                // Package symbols of packages created by the update.
                None => {
                    self.insert(symbol);
                    for reference in symbol
                        .references
                        .iter()
                        .filter(|r| !changed_set.contains(&*r.file))
                    {
                        self.references.add(symbol.id.clone(), reference.clone());
                    }
                }
            }
        }
        // Entries whose symbol disappeared outside the changed files, such as
        // members removed together with their parent.
        let gone: Vec<SymbolId> = self
            .entries
            .keys()
            .filter(|id| module.symbol(id).is_none())
            .cloned()
            .collect();
        for id in &gone {
            self.remove(id);
            self.references.remove_target(id);
        }

        debug!(
            "[INDEX] updated {} files: {} symbols ({} re-read, {} dropped), {} references",
            changed.len(),
            self.len(),
            reparented,
            gone.len(),
            self.references.len()
        );
    }

    // ============================================================
    // Maintenance
    // ============================================================

    fn insert(&mut self, symbol: &Symbol) {
        if self.entries.contains_key(&symbol.id) {
            self.remove(&symbol.id);
        }
        let id = symbol.id.clone();
        let entry = Entry::of(symbol);

        self.by_kind.entry(entry.kind).or_default().insert(id.clone());
        self.by_name.entry(entry.name.clone()).or_default().push(id.clone());
        if let Some(file) = &entry.file {
            self.by_file.entry(file.clone()).or_default().push(id.clone());
        }
        if let Some(parent) = &entry.parent {
            self.by_parent.entry(parent.clone()).or_default().push(id.clone());
        }
        self.entries.insert(id, entry);
    }

    fn insert_references(&mut self, symbol: &Symbol) {
        for reference in &symbol.references {
            self.references.add(symbol.id.clone(), reference.clone());
        }
    }

    fn remove(&mut self, id: &SymbolId) {
        let Some(entry) = self.entries.remove(id) else {
            return;
        };
        if let Some(set) = self.by_kind.get_mut(&entry.kind) {
            set.shift_remove(id);
        }
        remove_from(&mut self.by_name, &entry.name, id);
        if let Some(file) = &entry.file {
            if let Some(list) = self.by_file.get_mut(file) {
                list.retain(|s| s != id);
                if list.is_empty() {
                    self.by_file.remove(file);
                }
            }
        }
        if let Some(parent) = &entry.parent {
            if let Some(list) = self.by_parent.get_mut(parent) {
                list.retain(|s| s != id);
                if list.is_empty() {
                    self.by_parent.remove(parent);
                }
            }
        }
    }

    // ============================================================
    // Queries
    // ============================================================

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn contains(&self, id: &SymbolId) -> bool {
        self.entries.contains_key(id)
    }

    /// The module's symbol for an indexed ID.
    pub fn symbol<'m>(&self, module: &'m Module, id: &SymbolId) -> Option<&'m Symbol> {
        if !self.contains(id) {
            return None;
        }
        module.symbol(id)
    }

    pub fn ids_of_kind(&self, kind: SymbolKind) -> impl Iterator<Item = &SymbolId> {
        self.by_kind.get(&kind).into_iter().flatten()
    }

    /// Symbols named exactly `name`.
    pub fn ids_named(&self, name: &str) -> &[SymbolId] {
        self.by_name.get(name).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Symbols whose name starts with `prefix`, in name order.
    pub fn ids_with_prefix<'a>(&'a self, prefix: &'a str) -> impl Iterator<Item = &'a SymbolId> + 'a {
        self.by_name
            .range::<str, _>((std::ops::Bound::Included(prefix), std::ops::Bound::Unbounded))
            .take_while(move |(name, _)| name.starts_with(prefix))
            .flat_map(|(_, ids)| ids.iter())
    }

    pub fn ids_in_file(&self, file: &str) -> &[SymbolId] {
        self.by_file.get(file).map(Vec::as_slice).unwrap_or(&[])
    }

    /// The innermost symbol declared in `file` whose span contains `position`.
    pub fn id_at(&self, file: &str, position: Position) -> Option<&SymbolId> {
        self.ids_in_file(file)
            .iter()
            .filter_map(|id| self.entries.get(id).map(|e| (id, e.span)))
            .filter(|(_, span)| span.contains(position))
            .min_by_key(|(_, span)| span.nesting_key())
            .map(|(id, _)| id)
    }

    /// Members whose parent is `parent`, in declaration order.
    pub fn children_ids(&self, parent: &SymbolId) -> &[SymbolId] {
        self.by_parent.get(parent).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn references(&self) -> &ReferenceIndex {
        &self.references
    }

    pub fn references_to(&self, id: &SymbolId) -> &[IndexedReference] {
        self.references.references_to(id)
    }

    pub fn references_in_file(&self, file: &str) -> &[IndexedReference] {
        self.references.references_in_file(file)
    }
}

fn remove_from(map: &mut BTreeMap<SmolStr, Vec<SymbolId>>, name: &SmolStr, id: &SymbolId) {
    if let Some(list) = map.get_mut(name) {
        list.retain(|s| s != id);
        if list.is_empty() {
            map.remove(name);
        }
    }
}
