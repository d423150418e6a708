//! Build errors.

use thiserror::Error;

use crate::project::ManifestError;
use crate::syntax::LoadError;

/// Errors raised while turning loaded packages into a [`Module`](crate::graph::Module).
///
/// Only [`BuildError::NoPackages`], [`BuildError::Manifest`] and
/// [`BuildError::Load`] abort a build. The others are collected in the
/// [`BuildReport`](super::BuildReport) for the unit they describe.
#[derive(Debug, Error)]
pub enum BuildError {
    #[error("no loadable packages ({skipped} skipped)")]
    NoPackages { skipped: usize },

    #[error("package {package} skipped: {}", errors.join("; "))]
    PackageErrors { package: String, errors: Vec<String> },

    #[error("{file}: malformed declaration `{name}`: {reason}")]
    MalformedDeclaration {
        file: String,
        name: String,
        reason: String,
    },

    #[error("{file}: declaration processing panicked: {message}")]
    FilePanicked { file: String, message: String },

    #[error("manifest: {0}")]
    Manifest(#[from] ManifestError),

    #[error("loader: {0}")]
    Load(#[from] LoadError),
}

impl BuildError {
    pub fn malformed(file: &str, name: &str, reason: impl Into<String>) -> Self {
        Self::MalformedDeclaration {
            file: file.to_string(),
            name: name.to_string(),
            reason: reason.into(),
        }
    }

    /// Convert a caught panic payload.
    pub fn panicked(file: &str, payload: Box<dyn std::any::Any + Send>) -> Self {
        let message = if let Some(s) = payload.downcast_ref::<&str>() {
            (*s).to_string()
        } else if let Some(s) = payload.downcast_ref::<String>() {
            s.clone()
        } else {
            "unknown panic payload".to_string()
        };
        Self::FilePanicked {
            file: file.to_string(),
            message,
        }
    }

    /// True for errors that abort the whole build.
    pub fn is_fatal(&self) -> bool {
        matches!(
            self,
            Self::NoPackages { .. } | Self::Manifest(_) | Self::Load(_)
        )
    }
}
