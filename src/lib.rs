//! # gograph-base
//!
//! In-memory semantic graph of a Go-shaped module: packages, files, declared
//! symbols and the references between them, with derived lookup indexes,
//! usage summaries and structural interface satisfaction queries.
//!
//! ## Module Structure (dependency order)
//!
//! ```text
//! ide        → AnalysisHost / Analysis query surface
//!   ↓
//! interfaces → Method sets, interface satisfaction
//! usage      → Reference classification, usage summaries
//! index      → Lookup tables by ID, kind, name, file, position
//!   ↓
//! builder    → Declare + link passes, incremental update
//! project    → Manifest reader, module loading
//!   ↓
//! graph      → Module, Package, File, Symbol, Reference
//! syntax     → Declarations handed over by the external loader
//!   ↓
//! base       → Position/Span, name rules, constants
//! config     → GraphConfig
//! ```

// ============================================================================
// MODULES (dependency order: base → syntax → graph → builder → index → ide)
// ============================================================================

/// Foundation types: Position, Span, name rules
pub mod base;

/// Load and build options
pub mod config;

/// Boundary model produced by the external parser/type-checker
pub mod syntax;

/// The symbol graph
pub mod graph;

/// Declare and link passes, incremental update
pub mod builder;

/// Manifest reading and module loading
pub mod project;

/// Derived lookup tables and the reference index
pub mod index;

/// Reference classification and usage summaries
pub mod usage;

/// Structural interface satisfaction
pub mod interfaces;

/// Query surface: AnalysisHost and Analysis snapshots
pub mod ide;

// Re-export foundation types
pub use base::{Position, Span};
pub use config::GraphConfig;

// Re-export the graph
pub use graph::{Module, Package, RefVia, Reference, Symbol, SymbolId, SymbolKind};

// Re-export entry points
pub use builder::{BuildError, BuildReport, ChangedFile, GraphBuilder};
pub use ide::{Analysis, AnalysisHost};
pub use index::SymbolIndex;
pub use interfaces::{ImplementationFilter, InterfaceEngine, InterfaceError};
pub use project::ModuleLoader;
pub use usage::{SymbolUsage, UsageError, UsageKind};
