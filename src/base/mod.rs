//! Foundation types for the gograph toolchain.
//!
//! This module provides fundamental types used throughout the graph:
//! - [`Position`], [`Span`] - Line/column positions for declarations and references
//! - Name rules for the analyzed language (export casing, identifiers)
//! - Domain constants (manifest file name, directive keywords)
//!
//! This module has NO dependencies on other gograph modules.

pub mod constants;
mod name;
mod position;

pub use name::{import_local_name, is_blank, is_exported, is_identifier, receiver_base_name};
pub use position::{Position, Span};
