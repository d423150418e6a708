//! Structural interface satisfaction.
//!
//! A candidate satisfies a contract (an interface symbol) when every method
//! name in the contract's effective method set is also in the candidate's.
//! Method sets include methods promoted through embedding; see
//! [`InterfaceEngine::method_set`].
//!
//! Only names are compared. Parameter and result types are not checked, nor
//! are pointer versus value receivers, so the engine accepts some candidates
//! the language itself would reject.

mod method_set;

use indexmap::IndexMap;
use rayon::prelude::*;
use rustc_hash::FxHashSet;
use smol_str::SmolStr;
use thiserror::Error;
use tracing::debug;

use crate::graph::{Module, Symbol, SymbolId, SymbolKind};
use crate::index::SymbolIndex;

pub use method_set::MethodSet;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum InterfaceError {
    #[error("unknown symbol {0}")]
    UnknownSymbol(SymbolId),

    #[error("{symbol} is a {kind}, not an interface")]
    NotAnInterface { symbol: SymbolId, kind: SymbolKind },

    #[error("{candidate} does not implement {contract}")]
    NotImplemented {
        contract: SymbolId,
        candidate: SymbolId,
    },
}

/// Restricts the candidates [`InterfaceEngine::find_implementations`] looks at.
#[derive(Debug, Clone, Default)]
pub struct ImplementationFilter {
    /// Only candidates declared in one of these packages (import paths).
    pub packages: Option<FxHashSet<String>>,
    pub exported_only: bool,
}

impl ImplementationFilter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn in_packages<I, S>(mut self, packages: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.packages = Some(packages.into_iter().map(Into::into).collect());
        self
    }

    pub fn exported_only(mut self) -> Self {
        self.exported_only = true;
        self
    }

    fn admits(&self, symbol: &Symbol) -> bool {
        if self.exported_only && !symbol.exported {
            return false;
        }
        match &self.packages {
            Some(packages) => packages.contains(&*symbol.package),
            None => true,
        }
    }
}

/// How one contract method is provided.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MethodImplementation {
    pub interface_method: SymbolId,
    pub implementing_method: SymbolId,
    /// Declared on the candidate itself rather than promoted.
    pub is_direct: bool,
}

/// Detail of a satisfied contract.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImplementationInfo {
    pub contract: SymbolId,
    pub candidate: SymbolId,
    pub methods: IndexMap<SmolStr, MethodImplementation>,
    /// At least one contract method is promoted through an embedded member.
    pub via_embedding: bool,
    /// Embedded types leading from the candidate to the contract itself or to
    /// a type that satisfies the contract on its own, outermost first. Empty
    /// when no single embedded type accounts for the satisfaction.
    pub embedding_chain: Vec<SymbolId>,
}

/// Read-only satisfaction queries over a module and its index.
#[derive(Clone, Copy)]
pub struct InterfaceEngine<'a> {
    module: &'a Module,
    index: &'a SymbolIndex,
}

impl<'a> InterfaceEngine<'a> {
    pub fn new(module: &'a Module, index: &'a SymbolIndex) -> Self {
        Self { module, index }
    }

    fn symbol(&self, id: &SymbolId) -> Result<&'a Symbol, InterfaceError> {
        self.module
            .symbol(id)
            .ok_or_else(|| InterfaceError::UnknownSymbol(id.clone()))
    }

    fn contract(&self, id: &SymbolId) -> Result<&'a Symbol, InterfaceError> {
        let symbol = self.symbol(id)?;
        if !symbol.is_interface() {
            return Err(InterfaceError::NotAnInterface {
                symbol: id.clone(),
                kind: symbol.kind,
            });
        }
        Ok(symbol)
    }

    /// Effective method set of any symbol: its own methods plus those
    /// promoted from the types its embedded members resolve to, recursively.
    /// Terminates on cyclic embedding.
    pub fn method_set(&self, id: &SymbolId) -> Result<MethodSet, InterfaceError> {
        self.symbol(id)?;
        Ok(method_set::effective_methods(self.module, self.index, id))
    }

    /// Whether `candidate` provides every method `contract` requires. A
    /// contract requiring nothing is satisfied by anything.
    pub fn is_implemented_by(
        &self,
        contract: &SymbolId,
        candidate: &SymbolId,
    ) -> Result<bool, InterfaceError> {
        self.contract(contract)?;
        self.symbol(candidate)?;
        let required = method_set::effective_methods(self.module, self.index, contract);
        Ok(self.satisfies(&required, candidate))
    }

    fn satisfies(&self, required: &MethodSet, candidate: &SymbolId) -> bool {
        if required.is_empty() {
            return true;
        }
        let provided = method_set::effective_methods(self.module, self.index, candidate);
        required.keys().all(|name| provided.contains_key(name))
    }

    /// Which candidate method provides each contract method, and whether
    /// embedding was involved.
    pub fn implementation_info(
        &self,
        contract: &SymbolId,
        candidate: &SymbolId,
    ) -> Result<ImplementationInfo, InterfaceError> {
        if !self.is_implemented_by(contract, candidate)? {
            return Err(InterfaceError::NotImplemented {
                contract: contract.clone(),
                candidate: candidate.clone(),
            });
        }

        let required = method_set::effective_methods(self.module, self.index, contract);
        let provided = method_set::effective_methods(self.module, self.index, candidate);
        let direct = method_set::direct_methods(self.module, self.index, candidate);

        let mut methods = IndexMap::new();
        for (name, interface_method) in &required {
            let Some(implementing_method) = provided.get(name) else {
                continue;
            };
            methods.insert(
                name.clone(),
                MethodImplementation {
                    interface_method: interface_method.clone(),
                    implementing_method: implementing_method.clone(),
                    is_direct: direct.contains_key(name),
                },
            );
        }

        let via_embedding = methods.values().any(|m| !m.is_direct);
        let embedding_chain = if via_embedding {
            self.embedding_chain(contract, candidate, &required)
        } else {
            Vec::new()
        };

        Ok(ImplementationInfo {
            contract: contract.clone(),
            candidate: candidate.clone(),
            methods,
            via_embedding,
            embedding_chain,
        })
    }

    /// Depth-first search through embedded members of `candidate` for the
    /// contract itself or a type satisfying it alone.
    fn embedding_chain(
        &self,
        contract: &SymbolId,
        candidate: &SymbolId,
        required: &MethodSet,
    ) -> Vec<SymbolId> {
        let mut visited: FxHashSet<SymbolId> = FxHashSet::default();
        visited.insert(candidate.clone());
        let mut path = Vec::new();
        if self.find_chain(contract, candidate, required, &mut visited, &mut path) {
            path
        } else {
            Vec::new()
        }
    }

    fn find_chain(
        &self,
        contract: &SymbolId,
        node: &SymbolId,
        required: &MethodSet,
        visited: &mut FxHashSet<SymbolId>,
        path: &mut Vec<SymbolId>,
    ) -> bool {
        let targets: Vec<SymbolId> =
            method_set::embedded_targets(self.module, self.index, node)
                .cloned()
                .collect();
        for target in targets {
            if !visited.insert(target.clone()) {
                continue;
            }
            path.push(target.clone());
            if &target == contract || self.satisfies(required, &target) {
                return true;
            }
            if self.find_chain(contract, &target, required, visited, path) {
                return true;
            }
            path.pop();
        }
        false
    }

    /// Every struct satisfying `contract`, sorted by ID.
    pub fn find_implementations(
        &self,
        contract: &SymbolId,
        filter: &ImplementationFilter,
    ) -> Result<Vec<SymbolId>, InterfaceError> {
        self.contract(contract)?;
        let required = method_set::effective_methods(self.module, self.index, contract);

        let candidates: Vec<&SymbolId> = self.index.ids_of_kind(SymbolKind::Struct).collect();
        let mut found: Vec<SymbolId> = candidates
            .par_iter()
            .filter(|id| {
                self.module
                    .symbol(id)
                    .is_some_and(|symbol| filter.admits(symbol))
            })
            .filter(|id| self.satisfies(&required, id))
            .map(|id| (*id).clone())
            .collect();
        found.sort();

        debug!(
            "[INTERFACES] {} implementations of {} among {} structs",
            found.len(),
            contract,
            candidates.len()
        );
        Ok(found)
    }

    /// Every interface `candidate` satisfies, sorted by ID.
    pub fn implemented_interfaces(&self, candidate: &SymbolId) -> Result<Vec<SymbolId>, InterfaceError> {
        self.symbol(candidate)?;
        let interfaces: Vec<&SymbolId> = self
            .index
            .ids_of_kind(SymbolKind::Interface)
            .filter(|id| *id != candidate)
            .collect();
        let mut found: Vec<SymbolId> = interfaces
            .par_iter()
            .filter(|id| {
                let required = method_set::effective_methods(self.module, self.index, id);
                self.satisfies(&required, candidate)
            })
            .map(|id| (*id).clone())
            .collect();
        found.sort();
        Ok(found)
    }
}
