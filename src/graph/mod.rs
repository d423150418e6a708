//! # Symbol Graph
//!
//! The in-memory data model: a [`Module`] owns [`Package`]s, a package owns its
//! [`File`]s and [`Symbol`]s, and every symbol carries the [`Reference`]s that
//! point at it.
//!
//! Ownership is strictly top-down. Back-references (file → package,
//! symbol → package/file/parent, reference → context) are stored as keys
//! (import paths, file paths, [`SymbolId`]s), never as owning pointers, so a
//! lookup through a stale key is a miss rather than a dangling pointer.
//!
//! ```text
//! Module ──owns──▶ Package ──owns──▶ File      (ordered SymbolIds, Imports)
//!                          └─owns──▶ Symbol    (Definitions, References)
//!                          └─view──▶ exported name → SymbolId
//! ```

mod ids;
mod module;
mod package;
mod reference;
mod symbol;

pub use ids::SymbolId;
pub use module::Module;
pub use package::{File, Import, Package};
pub use reference::{Location, RefVia, Reference};
pub use symbol::{EmbeddedType, Symbol, SymbolKind, TypeInfo};
