//! Per-file and per-package inputs.

use std::path::PathBuf;

use crate::base::{Span, import_local_name};

use super::decl::Declaration;

/// One import statement.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ImportDecl {
    /// Import path, e.g. `net/http`.
    pub path: String,
    /// Local alias; `_` for side-effect imports, `.` for dot imports.
    pub alias: Option<String>,
    pub span: Span,
}

impl ImportDecl {
    pub fn new(path: impl Into<String>, span: Span) -> Self {
        Self {
            path: path.into(),
            alias: None,
            span,
        }
    }

    pub fn with_alias(mut self, alias: impl Into<String>) -> Self {
        self.alias = Some(alias.into());
        self
    }

    /// The name this import is referred to by inside the file: the alias when
    /// present, otherwise the last path segment (skipping a `/vN` major
    /// version suffix).
    pub fn local_name(&self) -> &str {
        import_local_name(&self.path, self.alias.as_deref())
    }

    pub fn is_blank(&self) -> bool {
        self.alias.as_deref() == Some("_")
    }

    pub fn is_dot(&self) -> bool {
        self.alias.as_deref() == Some(".")
    }
}

/// The declared object an identifier use resolves to.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct UseTarget {
    /// Import path of the declaring package; `None` means the file's own package.
    pub package: Option<String>,
    /// Owning type name for methods and fields.
    pub parent: Option<String>,
    pub name: String,
}

impl UseTarget {
    pub fn local(name: impl Into<String>) -> Self {
        Self {
            package: None,
            parent: None,
            name: name.into(),
        }
    }

    pub fn member(parent: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            package: None,
            parent: Some(parent.into()),
            name: name.into(),
        }
    }

    pub fn in_package(mut self, package: impl Into<String>) -> Self {
        self.package = Some(package.into());
        self
    }

    /// Local path of the target inside its package, e.g. `Server.Start`.
    pub fn local_path(&self) -> String {
        match &self.parent {
            Some(parent) => format!("{}.{}", parent, self.name),
            None => self.name.clone(),
        }
    }
}

/// An identifier use inside a file, already resolved by the type-checker.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct UseSite {
    pub target: UseTarget,
    pub span: Span,
    /// The use assigns to the target.
    pub is_write: bool,
    /// Local path of the enclosing declaration, e.g. `Server.Start`.
    pub context: Option<String>,
}

impl UseSite {
    pub fn read(target: UseTarget, span: Span) -> Self {
        Self {
            target,
            span,
            is_write: false,
            context: None,
        }
    }

    pub fn write(target: UseTarget, span: Span) -> Self {
        Self {
            target,
            span,
            is_write: true,
            context: None,
        }
    }

    pub fn within(mut self, context: impl Into<String>) -> Self {
        self.context = Some(context.into());
        self
    }
}

/// Everything the external parser reports for one file.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct SourceFile {
    pub path: String,
    pub package_name: String,
    pub imports: Vec<ImportDecl>,
    pub declarations: Vec<Declaration>,
    pub uses: Vec<UseSite>,
}

impl SourceFile {
    pub fn new(path: impl Into<String>, package_name: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            package_name: package_name.into(),
            ..Self::default()
        }
    }

    pub fn with_import(mut self, import: ImportDecl) -> Self {
        self.imports.push(import);
        self
    }

    pub fn with_declaration(mut self, decl: Declaration) -> Self {
        self.declarations.push(decl);
        self
    }

    pub fn with_use(mut self, site: UseSite) -> Self {
        self.uses.push(site);
        self
    }

    /// Find the import referred to by `local_name` in this file.
    pub fn import_named(&self, local_name: &str) -> Option<&ImportDecl> {
        self.imports
            .iter()
            .find(|import| !import.is_blank() && import.local_name() == local_name)
    }
}

/// A package as reported by the external loader.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct LoadedPackage {
    pub import_path: String,
    pub name: String,
    pub dir: PathBuf,
    pub files: Vec<SourceFile>,
    /// Parse or type errors the loader reported. A package with errors is
    /// skipped by the builder.
    pub errors: Vec<String>,
}

impl LoadedPackage {
    pub fn new(import_path: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            import_path: import_path.into(),
            name: name.into(),
            ..Self::default()
        }
    }

    pub fn with_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.dir = dir.into();
        self
    }

    pub fn with_file(mut self, file: SourceFile) -> Self {
        self.files.push(file);
        self
    }

    pub fn with_error(mut self, error: impl Into<String>) -> Self {
        self.errors.push(error.into());
        self
    }

    pub fn has_errors(&self) -> bool {
        !self.errors.is_empty()
    }
}
