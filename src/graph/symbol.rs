//! Declared entities.

use std::sync::Arc;

use smol_str::SmolStr;

use crate::base::Span;
use crate::syntax::{ResolvedType, TypeExpr};

use super::ids::SymbolId;
use super::reference::{Location, Reference};

/// Closed set of symbol kinds.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum SymbolKind {
    Package,
    Function,
    Method,
    /// A defined type whose underlying type is neither a struct nor an interface.
    NamedType,
    Struct,
    Interface,
    Field,
    Variable,
    Constant,
    Parameter,
    /// An unnamed struct field; incorporates the members of its type.
    EmbeddedField,
    /// An unnamed interface member; incorporates the methods of its type.
    EmbeddedInterface,
}

impl SymbolKind {
    pub const ALL: [SymbolKind; 12] = [
        SymbolKind::Package,
        SymbolKind::Function,
        SymbolKind::Method,
        SymbolKind::NamedType,
        SymbolKind::Struct,
        SymbolKind::Interface,
        SymbolKind::Field,
        SymbolKind::Variable,
        SymbolKind::Constant,
        SymbolKind::Parameter,
        SymbolKind::EmbeddedField,
        SymbolKind::EmbeddedInterface,
    ];

    /// Tag used inside symbol IDs.
    pub fn as_str(&self) -> &'static str {
        match self {
            SymbolKind::Package => "package",
            SymbolKind::Function => "function",
            SymbolKind::Method => "method",
            SymbolKind::NamedType => "type",
            SymbolKind::Struct => "struct",
            SymbolKind::Interface => "interface",
            SymbolKind::Field => "field",
            SymbolKind::Variable => "var",
            SymbolKind::Constant => "const",
            SymbolKind::Parameter => "param",
            SymbolKind::EmbeddedField => "embedded-field",
            SymbolKind::EmbeddedInterface => "embedded-interface",
        }
    }

    /// Get a display label for this kind.
    pub fn display(&self) -> &'static str {
        match self {
            SymbolKind::Package => "Package",
            SymbolKind::Function => "Function",
            SymbolKind::Method => "Method",
            SymbolKind::NamedType => "Type",
            SymbolKind::Struct => "Struct",
            SymbolKind::Interface => "Interface",
            SymbolKind::Field => "Field",
            SymbolKind::Variable => "Variable",
            SymbolKind::Constant => "Constant",
            SymbolKind::Parameter => "Parameter",
            SymbolKind::EmbeddedField => "Embedded field",
            SymbolKind::EmbeddedInterface => "Embedded interface",
        }
    }

    /// Named types, structs and interfaces.
    pub fn is_type(&self) -> bool {
        matches!(
            self,
            SymbolKind::NamedType | SymbolKind::Struct | SymbolKind::Interface
        )
    }

    pub fn is_callable(&self) -> bool {
        matches!(self, SymbolKind::Function | SymbolKind::Method)
    }

    /// Members that incorporate another type's members.
    pub fn is_embedding(&self) -> bool {
        matches!(
            self,
            SymbolKind::EmbeddedField | SymbolKind::EmbeddedInterface
        )
    }
}

impl std::fmt::Display for SymbolKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Type information attached to a symbol.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TypeInfo {
    /// Textual type, from the resolved object when there is one.
    pub display: String,
    pub syntax: Option<TypeExpr>,
    pub resolved: Option<ResolvedType>,
}

impl TypeInfo {
    /// Combine what the parser and the type-checker reported. Returns `None`
    /// when neither said anything.
    pub fn from_parts(syntax: Option<&TypeExpr>, resolved: Option<&ResolvedType>) -> Option<Self> {
        let display = match (resolved, syntax) {
            (Some(resolved), _) if *resolved != ResolvedType::Invalid => resolved.to_string(),
            (_, Some(syntax)) => syntax.to_string(),
            (Some(resolved), None) => resolved.to_string(),
            (None, None) => return None,
        };
        Some(Self {
            display,
            syntax: syntax.cloned(),
            resolved: resolved.cloned(),
        })
    }
}

/// The type named by an embedded member, as written.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct EmbeddedType {
    /// Package qualifier (`io` in `io.Reader`).
    pub qualifier: Option<SmolStr>,
    pub name: SmolStr,
}

/// A named declared entity.
#[derive(Clone, Debug)]
pub struct Symbol {
    pub id: SymbolId,
    pub name: SmolStr,
    /// Path inside the package, e.g. `Server.Start`.
    pub local_path: SmolStr,
    pub kind: SymbolKind,
    /// Derived from the name's leading-letter casing.
    pub exported: bool,
    /// Import path of the owning package.
    pub package: Arc<str>,
    /// Declaring file; `None` for package symbols.
    pub file: Option<Arc<str>>,
    /// Declaring type (methods, fields, embedded members) or function
    /// (parameters). Never owning.
    pub parent: Option<SymbolId>,
    /// Raw receiver text for methods.
    pub receiver: Option<SmolStr>,
    /// Type named by an embedded member.
    pub embedded: Option<EmbeddedType>,
    /// Resolved target of an embedded member.
    pub embeds: Option<SymbolId>,
    pub type_info: Option<TypeInfo>,
    /// Declaration span of the name.
    pub span: Span,
    pub definitions: Vec<Location>,
    pub references: Vec<Reference>,
}

impl Symbol {
    pub fn new(id: SymbolId, name: impl Into<SmolStr>, kind: SymbolKind, package: Arc<str>) -> Self {
        let name = name.into();
        let exported = crate::base::is_exported(&name);
        Self {
            local_path: SmolStr::new(id.local_path()),
            id,
            name,
            kind,
            exported,
            package,
            file: None,
            parent: None,
            receiver: None,
            embedded: None,
            embeds: None,
            type_info: None,
            span: Span::default(),
            definitions: Vec::new(),
            references: Vec::new(),
        }
    }

    /// Record the declaring file and span, which is also the first definition.
    pub fn with_declaration(mut self, file: Arc<str>, span: Span) -> Self {
        self.definitions.push(Location::new(file.clone(), span));
        self.file = Some(file);
        self.span = span;
        self
    }

    pub fn with_parent(mut self, parent: SymbolId) -> Self {
        self.parent = Some(parent);
        self
    }

    pub fn with_type_info(mut self, type_info: Option<TypeInfo>) -> Self {
        self.type_info = type_info;
        self
    }

    pub fn is_type(&self) -> bool {
        self.kind.is_type()
    }

    pub fn is_interface(&self) -> bool {
        self.kind == SymbolKind::Interface
    }

    pub fn is_struct(&self) -> bool {
        self.kind == SymbolKind::Struct
    }

    /// Package-scope symbols have no parent.
    pub fn is_top_level(&self) -> bool {
        self.parent.is_none() && self.kind != SymbolKind::Package && !self.is_member_kind()
    }

    fn is_member_kind(&self) -> bool {
        matches!(
            self.kind,
            SymbolKind::Method
                | SymbolKind::Field
                | SymbolKind::Parameter
                | SymbolKind::EmbeddedField
                | SymbolKind::EmbeddedInterface
        )
    }

    pub fn declared_in(&self, file: &str) -> bool {
        self.file.as_deref() == Some(file)
    }
}
