//! Module manifest (`go.mod`) reader.
//!
//! Only two directives matter here: `module <path>` and the language version
//! directive (`go <version>`). Everything else, including grouped
//! `require ( ... )` blocks, is skipped.

use std::io;
use std::path::{Path, PathBuf};

use thiserror::Error;
use tracing::debug;

use crate::base::constants::MODULE_DIRECTIVE;
use crate::config::GraphConfig;

#[derive(Debug, Error)]
pub enum ManifestError {
    #[error("cannot read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("{} has no `module` directive", path.display())]
    MissingModule { path: PathBuf },
}

/// Module identity declared by a manifest.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Manifest {
    pub module_path: String,
    pub language_version: Option<String>,
}

/// Read the manifest named by `config.manifest_file` in `dir`.
pub fn read_manifest(dir: &Path, config: &GraphConfig) -> Result<Manifest, ManifestError> {
    let path = dir.join(&config.manifest_file);
    let text = std::fs::read_to_string(&path).map_err(|source| ManifestError::Io {
        path: path.clone(),
        source,
    })?;
    let manifest = parse_manifest(&text, &config.version_directive)
        .ok_or(ManifestError::MissingModule { path })?;
    debug!(
        "[MANIFEST] module {} (version {:?})",
        manifest.module_path, manifest.language_version
    );
    Ok(manifest)
}

/// Parse manifest text. Returns `None` when there is no `module` directive.
pub fn parse_manifest(text: &str, version_directive: &str) -> Option<Manifest> {
    let mut module_path = None;
    let mut language_version = None;
    let mut in_block = false;

    for raw in text.lines() {
        let line = strip_comment(raw).trim();
        if line.is_empty() {
            continue;
        }
        if in_block {
            if line.starts_with(')') {
                in_block = false;
            }
            continue;
        }
        if line.ends_with('(') {
            in_block = true;
            continue;
        }

        let (directive, value) = match line.split_once(char::is_whitespace) {
            Some((directive, value)) => (directive, unquote(value.trim())),
            None => continue,
        };
        if directive == MODULE_DIRECTIVE && module_path.is_none() && !value.is_empty() {
            module_path = Some(value.to_string());
        } else if directive == version_directive && language_version.is_none() && !value.is_empty() {
            language_version = Some(value.to_string());
        }
    }

    module_path.map(|module_path| Manifest {
        module_path,
        language_version,
    })
}

fn strip_comment(line: &str) -> &str {
    match line.find("//") {
        Some(idx) => &line[..idx],
        None => line,
    }
}

fn unquote(value: &str) -> &str {
    for quote in ['"', '`'] {
        if let Some(inner) = value
            .strip_prefix(quote)
            .and_then(|rest| rest.strip_suffix(quote))
        {
            return inner;
        }
    }
    value
}
