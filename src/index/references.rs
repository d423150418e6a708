//! Two-way index over recorded references.
//!
//! Stores every reference of the module twice:
//! - by target: "find references" for a symbol
//! - by file: every reference located in a file, and the unit of cleanup
//!   when a file changes

use std::sync::Arc;

use rustc_hash::FxHashMap;
use tracing::trace;

use crate::graph::{Reference, SymbolId};

/// A reference together with the symbol it points at.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct IndexedReference {
    pub target: SymbolId,
    pub reference: Reference,
}

#[derive(Debug, Clone, Default)]
pub struct ReferenceIndex {
    by_target: FxHashMap<SymbolId, Vec<IndexedReference>>,
    by_file: FxHashMap<Arc<str>, Vec<IndexedReference>>,
}

impl ReferenceIndex {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, target: SymbolId, reference: Reference) {
        trace!(
            "[REF_INDEX] add: target='{}' file='{}' span={:?}",
            target, reference.file, reference.span
        );
        let entry = IndexedReference { target, reference };
        self.by_file
            .entry(entry.reference.file.clone())
            .or_default()
            .push(entry.clone());
        self.by_target
            .entry(entry.target.clone())
            .or_default()
            .push(entry);
    }

    /// Drop every reference to `target`.
    pub fn remove_target(&mut self, target: &SymbolId) {
        let Some(removed) = self.by_target.remove(target) else {
            return;
        };
        trace!("[REF_INDEX] remove_target: '{}' ({} refs)", target, removed.len());
        for entry in &removed {
            if let Some(list) = self.by_file.get_mut(&entry.reference.file) {
                list.retain(|r| &r.target != target);
                if list.is_empty() {
                    self.by_file.remove(&entry.reference.file);
                }
            }
        }
    }

    /// Drop every reference located in `file`.
    pub fn remove_file(&mut self, file: &str) {
        let Some(removed) = self.by_file.remove(file) else {
            return;
        };
        trace!("[REF_INDEX] remove_file: '{}' ({} refs)", file, removed.len());
        for entry in &removed {
            if let Some(list) = self.by_target.get_mut(&entry.target) {
                list.retain(|r| &*r.reference.file != file);
                if list.is_empty() {
                    self.by_target.remove(&entry.target);
                }
            }
        }
    }

    pub fn references_to(&self, target: &SymbolId) -> &[IndexedReference] {
        self.by_target.get(target).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn references_in_file(&self, file: &str) -> &[IndexedReference] {
        self.by_file.get(file).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn len(&self) -> usize {
        self.by_target.values().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.by_target.is_empty()
    }

    pub fn clear(&mut self) {
        self.by_target.clear();
        self.by_file.clear();
    }
}
