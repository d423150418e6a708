//! Stable symbol identity.

use std::fmt;
use std::sync::Arc;

use crate::base::constants::{ID_KIND_SEPARATOR, ID_ORDINAL_SEPARATOR, ID_PACKAGE_SEPARATOR};

use super::symbol::SymbolKind;

/// Identifier of a symbol, stable across incremental updates.
///
/// Composed from the package import path, the parent path, the name and the
/// kind: `example.com/app/server::Server.Start#method`. Two unrelated `Config`
/// types in different packages, or two `Close` methods on different types,
/// never collide. Genuine duplicates inside one package (several `init`
/// functions) are told apart by an ordinal suffix: `...::init#function~2`.
#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SymbolId(Arc<str>);

impl SymbolId {
    /// Compose the ID of a symbol with `local_path` (e.g. `Server.Start`)
    /// declared in `package`.
    pub fn compose(package: &str, local_path: &str, kind: SymbolKind) -> Self {
        Self(
            format!(
                "{package}{ID_PACKAGE_SEPARATOR}{local_path}{ID_KIND_SEPARATOR}{}",
                kind.as_str()
            )
            .into(),
        )
    }

    /// ID of the package symbol for `package`.
    pub fn for_package(package: &str) -> Self {
        Self::compose(package, "", SymbolKind::Package)
    }

    /// The same ID with a duplicate ordinal appended.
    pub fn with_ordinal(&self, ordinal: usize) -> Self {
        Self(format!("{}{ID_ORDINAL_SEPARATOR}{ordinal}", self.0).into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Import path of the owning package.
    pub fn package_path(&self) -> &str {
        match self.0.find(ID_PACKAGE_SEPARATOR) {
            Some(idx) => &self.0[..idx],
            None => &self.0,
        }
    }

    /// Local path inside the package (`Server.Start`), empty for packages.
    pub fn local_path(&self) -> &str {
        let start = match self.0.find(ID_PACKAGE_SEPARATOR) {
            Some(idx) => idx + ID_PACKAGE_SEPARATOR.len(),
            None => return "",
        };
        let rest = &self.0[start..];
        match rest.rfind(ID_KIND_SEPARATOR) {
            Some(idx) => &rest[..idx],
            None => rest,
        }
    }
}

impl fmt::Debug for SymbolId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "SymbolId({})", self.0)
    }
}

impl fmt::Display for SymbolId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for SymbolId {
    fn from(value: &str) -> Self {
        Self(value.into())
    }
}

impl AsRef<str> for SymbolId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}
