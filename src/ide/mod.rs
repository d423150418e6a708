//! IDE features: the read-only query surface over a built module.
//!
//! `AnalysisHost` owns the graph and its index and applies loads and
//! incremental updates; `Analysis` is a borrowed snapshot that every query
//! goes through.
//!
//! ## Usage
//!
//! ```ignore
//! use gograph::ide::AnalysisHost;
//!
//! let (host, _report) = AnalysisHost::load(loader, root, GraphConfig::default())?;
//! let analysis = host.analysis();
//! let outline = analysis.document_symbols("server/server.go");
//! ```

mod analysis;
mod references;
mod symbols;

pub use analysis::{Analysis, AnalysisHost};
pub use references::{ReferenceLocation, ReferenceResult, find_references, find_references_at, target_at};
pub use symbols::{SymbolInfo, document_symbols, workspace_symbols};
