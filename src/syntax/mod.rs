//! Boundary model consumed from the external parser / type-checker.
//!
//! Turning raw source text into declarations is not this crate's job. An
//! external collaborator hands over, per file, an ordered list of top-level
//! declarations with positions, optional receiver names, syntactic type
//! expressions and (best effort) resolved type objects. Everything here is
//! plain data; the graph builder is the only consumer.

mod decl;
mod loader;
mod source;
mod type_expr;

pub use decl::{DeclKind, Declaration, FieldDecl, InterfaceMember, ParamDecl, TypeShape};
pub use loader::{LoadError, MemoryLoader, PackageLoader};
pub use source::{ImportDecl, LoadedPackage, SourceFile, UseSite, UseTarget};
pub use type_expr::{ChanDir, FuncType, ResolvedType, TypeExpr};

// Re-export Position and Span from base for convenience
pub use crate::base::{Position, Span};
