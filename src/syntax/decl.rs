//! Top-level declarations as reported by the external parser.

use crate::base::Span;

use super::type_expr::{FuncType, ResolvedType, TypeExpr};

/// Declaration kind tag.
///
/// Functions and methods share a tag; a method is a function with a receiver.
/// Named types, structs and interfaces share a tag; the declared type shape
/// tells them apart.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum DeclKind {
    Function,
    Type,
    Variable,
    Constant,
}

/// Shape of a type declaration's underlying type.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum TypeShape {
    Struct,
    Interface,
    Other,
}

/// A single top-level declaration.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Declaration {
    pub kind: DeclKind,
    pub name: String,
    pub span: Span,
    /// Receiver type text for methods, e.g. `*Server` or `List[T]`.
    pub receiver: Option<String>,
    /// Syntactic type: underlying type for type declarations, signature for
    /// functions, declared type for variables and constants.
    pub type_expr: Option<TypeExpr>,
    /// Type-checker object, when the checker managed to produce one.
    pub resolved: Option<ResolvedType>,
}

impl Declaration {
    pub fn new(kind: DeclKind, name: impl Into<String>, span: Span) -> Self {
        Self {
            kind,
            name: name.into(),
            span,
            receiver: None,
            type_expr: None,
            resolved: None,
        }
    }

    pub fn function(name: impl Into<String>, span: Span) -> Self {
        Self::new(DeclKind::Function, name, span)
    }

    pub fn method(receiver: impl Into<String>, name: impl Into<String>, span: Span) -> Self {
        Self::new(DeclKind::Function, name, span).with_receiver(receiver)
    }

    pub fn type_decl(name: impl Into<String>, span: Span, underlying: TypeExpr) -> Self {
        Self::new(DeclKind::Type, name, span).with_type(underlying)
    }

    pub fn variable(name: impl Into<String>, span: Span) -> Self {
        Self::new(DeclKind::Variable, name, span)
    }

    pub fn constant(name: impl Into<String>, span: Span) -> Self {
        Self::new(DeclKind::Constant, name, span)
    }

    pub fn with_receiver(mut self, receiver: impl Into<String>) -> Self {
        self.receiver = Some(receiver.into());
        self
    }

    pub fn with_type(mut self, type_expr: TypeExpr) -> Self {
        self.type_expr = Some(type_expr);
        self
    }

    pub fn with_resolved(mut self, resolved: ResolvedType) -> Self {
        self.resolved = Some(resolved);
        self
    }

    /// A function declaration with a receiver is a method.
    pub fn is_method(&self) -> bool {
        self.kind == DeclKind::Function && self.receiver.is_some()
    }

    /// Shape of a type declaration. Falls back to the resolved type object
    /// when no syntactic type was supplied.
    pub fn type_shape(&self) -> TypeShape {
        match (&self.type_expr, &self.resolved) {
            (Some(TypeExpr::Struct(_)), _) => TypeShape::Struct,
            (Some(TypeExpr::Interface(_)), _) => TypeShape::Interface,
            (Some(_), _) => TypeShape::Other,
            (None, Some(ResolvedType::Struct { .. })) => TypeShape::Struct,
            (None, Some(ResolvedType::Interface { .. })) => TypeShape::Interface,
            (None, _) => TypeShape::Other,
        }
    }

    /// Signature of a function or method declaration.
    pub fn signature(&self) -> Option<&FuncType> {
        match &self.type_expr {
            Some(TypeExpr::Func(func)) => Some(func),
            _ => None,
        }
    }

    /// Struct fields of a struct-shaped type declaration.
    pub fn fields(&self) -> &[FieldDecl] {
        match &self.type_expr {
            Some(TypeExpr::Struct(fields)) => fields,
            _ => &[],
        }
    }

    /// Members of an interface-shaped type declaration.
    pub fn interface_members(&self) -> &[InterfaceMember] {
        match &self.type_expr {
            Some(TypeExpr::Interface(members)) => members,
            _ => &[],
        }
    }
}

/// A struct field. A field without a name is embedded.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FieldDecl {
    pub name: Option<String>,
    pub type_expr: TypeExpr,
    pub span: Span,
}

impl FieldDecl {
    pub fn named(name: impl Into<String>, type_expr: TypeExpr, span: Span) -> Self {
        Self {
            name: Some(name.into()),
            type_expr,
            span,
        }
    }

    pub fn embedded(type_expr: TypeExpr, span: Span) -> Self {
        Self {
            name: None,
            type_expr,
            span,
        }
    }

    pub fn is_embedded(&self) -> bool {
        self.name.is_none()
    }
}

/// An interface member: a named method, or an embedded interface when the
/// name is absent.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct InterfaceMember {
    pub name: Option<String>,
    pub type_expr: TypeExpr,
    pub span: Span,
}

impl InterfaceMember {
    pub fn method(name: impl Into<String>, signature: FuncType, span: Span) -> Self {
        Self {
            name: Some(name.into()),
            type_expr: TypeExpr::Func(signature),
            span,
        }
    }

    pub fn embedded(type_expr: TypeExpr, span: Span) -> Self {
        Self {
            name: None,
            type_expr,
            span,
        }
    }

    pub fn is_embedded(&self) -> bool {
        self.name.is_none()
    }
}

/// A function parameter or result.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ParamDecl {
    pub name: Option<String>,
    pub type_expr: TypeExpr,
    pub span: Span,
}

impl ParamDecl {
    pub fn new(name: Option<&str>, type_expr: TypeExpr, span: Span) -> Self {
        Self {
            name: name.map(str::to_string),
            type_expr,
            span,
        }
    }

    pub fn named(name: impl Into<String>, type_expr: TypeExpr, span: Span) -> Self {
        Self {
            name: Some(name.into()),
            type_expr,
            span,
        }
    }

    pub fn unnamed(type_expr: TypeExpr) -> Self {
        Self {
            name: None,
            type_expr,
            span: Span::default(),
        }
    }
}
