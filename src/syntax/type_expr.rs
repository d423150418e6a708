//! Type expressions: the syntactic form written in source, and the resolved
//! form produced by the type-checker.
//!
//! When no resolved type is available the syntactic form is rendered instead,
//! so consumers always get some textual type.

use std::fmt;

use super::decl::{FieldDecl, InterfaceMember, ParamDecl};

/// Channel direction.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ChanDir {
    Both,
    Send,
    Recv,
}

/// Parameter and result lists of a function type.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct FuncType {
    pub params: Vec<ParamDecl>,
    pub results: Vec<ParamDecl>,
}

impl FuncType {
    pub fn new(params: Vec<ParamDecl>, results: Vec<ParamDecl>) -> Self {
        Self { params, results }
    }

    /// `func()` with no parameters and no results.
    pub fn empty() -> Self {
        Self::default()
    }
}

/// A type expression as written in source.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum TypeExpr {
    /// `T`, `pkg.T` or `T[A, B]`
    Named {
        package: Option<String>,
        name: String,
        args: Vec<TypeExpr>,
    },
    /// `*T`
    Pointer(Box<TypeExpr>),
    /// `[]T`
    Slice(Box<TypeExpr>),
    /// `[N]T`, or `[...]T` when the length is absent
    Array {
        len: Option<String>,
        elem: Box<TypeExpr>,
    },
    /// `map[K]V`
    Map {
        key: Box<TypeExpr>,
        value: Box<TypeExpr>,
    },
    /// `chan T`, `chan<- T`, `<-chan T`
    Chan { dir: ChanDir, elem: Box<TypeExpr> },
    /// `func(params) results`
    Func(FuncType),
    /// `struct{ ... }`
    Struct(Vec<FieldDecl>),
    /// `interface{ ... }`
    Interface(Vec<InterfaceMember>),
    /// `...T` (final variadic parameter)
    Ellipsis(Box<TypeExpr>),
}

impl TypeExpr {
    pub fn named(name: impl Into<String>) -> Self {
        TypeExpr::Named {
            package: None,
            name: name.into(),
            args: Vec::new(),
        }
    }

    pub fn qualified(package: impl Into<String>, name: impl Into<String>) -> Self {
        TypeExpr::Named {
            package: Some(package.into()),
            name: name.into(),
            args: Vec::new(),
        }
    }

    pub fn pointer(inner: TypeExpr) -> Self {
        TypeExpr::Pointer(Box::new(inner))
    }

    pub fn slice(elem: TypeExpr) -> Self {
        TypeExpr::Slice(Box::new(elem))
    }

    pub fn map(key: TypeExpr, value: TypeExpr) -> Self {
        TypeExpr::Map {
            key: Box::new(key),
            value: Box::new(value),
        }
    }

    /// The named type at the root of an embedded member: `*pkg.T[A]`
    /// yields `(Some("pkg"), "T")`.
    pub fn embedded_name(&self) -> Option<(Option<&str>, &str)> {
        match self {
            TypeExpr::Named { package, name, .. } => Some((package.as_deref(), name.as_str())),
            TypeExpr::Pointer(inner) => inner.embedded_name(),
            _ => None,
        }
    }

    /// Every named type mentioned anywhere in this expression, outermost first.
    pub fn named_types(&self) -> Vec<(Option<&str>, &str)> {
        let mut out = Vec::new();
        self.collect_named(&mut out);
        out
    }

    fn collect_named<'a>(&'a self, out: &mut Vec<(Option<&'a str>, &'a str)>) {
        match self {
            TypeExpr::Named {
                package,
                name,
                args,
            } => {
                out.push((package.as_deref(), name.as_str()));
                for arg in args {
                    arg.collect_named(out);
                }
            }
            TypeExpr::Pointer(inner)
            | TypeExpr::Slice(inner)
            | TypeExpr::Ellipsis(inner)
            | TypeExpr::Array { elem: inner, .. }
            | TypeExpr::Chan { elem: inner, .. } => inner.collect_named(out),
            TypeExpr::Map { key, value } => {
                key.collect_named(out);
                value.collect_named(out);
            }
            TypeExpr::Func(func) => {
                for param in func.params.iter().chain(&func.results) {
                    param.type_expr.collect_named(out);
                }
            }
            TypeExpr::Struct(fields) => {
                for field in fields {
                    field.type_expr.collect_named(out);
                }
            }
            TypeExpr::Interface(members) => {
                for member in members {
                    member.type_expr.collect_named(out);
                }
            }
        }
    }
}

fn write_list<T: fmt::Display>(f: &mut fmt::Formatter<'_>, items: &[T], sep: &str) -> fmt::Result {
    for (i, item) in items.iter().enumerate() {
        if i > 0 {
            f.write_str(sep)?;
        }
        write!(f, "{item}")?;
    }
    Ok(())
}

impl fmt::Display for ParamDecl {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.name {
            Some(name) => write!(f, "{} {}", name, self.type_expr),
            None => write!(f, "{}", self.type_expr),
        }
    }
}

impl fmt::Display for FuncType {
    /// Renders `(params) results` without the leading `func` keyword.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("(")?;
        write_list(f, &self.params, ", ")?;
        f.write_str(")")?;
        match self.results.as_slice() {
            [] => Ok(()),
            [single] if single.name.is_none() => write!(f, " {single}"),
            results => {
                f.write_str(" (")?;
                write_list(f, results, ", ")?;
                f.write_str(")")
            }
        }
    }
}

impl fmt::Display for TypeExpr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TypeExpr::Named {
                package,
                name,
                args,
            } => {
                if let Some(package) = package {
                    write!(f, "{package}.")?;
                }
                f.write_str(name)?;
                if !args.is_empty() {
                    f.write_str("[")?;
                    write_list(f, args, ", ")?;
                    f.write_str("]")?;
                }
                Ok(())
            }
            TypeExpr::Pointer(inner) => write!(f, "*{inner}"),
            TypeExpr::Slice(elem) => write!(f, "[]{elem}"),
            TypeExpr::Array { len, elem } => match len {
                Some(len) => write!(f, "[{len}]{elem}"),
                None => write!(f, "[...]{elem}"),
            },
            TypeExpr::Map { key, value } => write!(f, "map[{key}]{value}"),
            TypeExpr::Chan { dir, elem } => match dir {
                ChanDir::Both => write!(f, "chan {elem}"),
                ChanDir::Send => write!(f, "chan<- {elem}"),
                ChanDir::Recv => write!(f, "<-chan {elem}"),
            },
            TypeExpr::Func(func) => write!(f, "func{func}"),
            TypeExpr::Struct(fields) => {
                f.write_str("struct{")?;
                for (i, field) in fields.iter().enumerate() {
                    if i > 0 {
                        f.write_str("; ")?;
                    }
                    match &field.name {
                        Some(name) => write!(f, "{} {}", name, field.type_expr)?,
                        None => write!(f, "{}", field.type_expr)?,
                    }
                }
                f.write_str("}")
            }
            TypeExpr::Interface(members) => {
                f.write_str("interface{")?;
                for (i, member) in members.iter().enumerate() {
                    if i > 0 {
                        f.write_str("; ")?;
                    }
                    match (&member.name, &member.type_expr) {
                        (Some(name), TypeExpr::Func(func)) => write!(f, "{name}{func}")?,
                        (Some(name), other) => write!(f, "{name} {other}")?,
                        (None, embedded) => write!(f, "{embedded}")?,
                    }
                }
                f.write_str("}")
            }
            TypeExpr::Ellipsis(elem) => write!(f, "...{elem}"),
        }
    }
}

/// A type object produced by the type-checker.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ResolvedType {
    /// Predeclared type such as `int` or `string`.
    Basic(String),
    /// Defined type, with the import path of its package when it has one.
    Named {
        package: Option<String>,
        name: String,
    },
    Pointer(Box<ResolvedType>),
    Slice(Box<ResolvedType>),
    Array {
        len: u64,
        elem: Box<ResolvedType>,
    },
    Map {
        key: Box<ResolvedType>,
        value: Box<ResolvedType>,
    },
    Chan {
        dir: ChanDir,
        elem: Box<ResolvedType>,
    },
    Signature {
        params: Vec<ResolvedType>,
        results: Vec<ResolvedType>,
        variadic: bool,
    },
    Struct {
        fields: Vec<(String, ResolvedType)>,
    },
    Interface {
        methods: Vec<String>,
    },
    /// The checker failed on this expression.
    Invalid,
}

impl fmt::Display for ResolvedType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ResolvedType::Basic(name) => f.write_str(name),
            ResolvedType::Named { package, name } => match package {
                Some(package) => write!(f, "{package}.{name}"),
                None => f.write_str(name),
            },
            ResolvedType::Pointer(inner) => write!(f, "*{inner}"),
            ResolvedType::Slice(elem) => write!(f, "[]{elem}"),
            ResolvedType::Array { len, elem } => write!(f, "[{len}]{elem}"),
            ResolvedType::Map { key, value } => write!(f, "map[{key}]{value}"),
            ResolvedType::Chan { dir, elem } => match dir {
                ChanDir::Both => write!(f, "chan {elem}"),
                ChanDir::Send => write!(f, "chan<- {elem}"),
                ChanDir::Recv => write!(f, "<-chan {elem}"),
            },
            ResolvedType::Signature {
                params,
                results,
                variadic,
            } => {
                f.write_str("func(")?;
                for (i, param) in params.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    match param {
                        ResolvedType::Slice(elem) if *variadic && i == params.len() - 1 => {
                            write!(f, "...{elem}")?
                        }
                        _ => write!(f, "{param}")?,
                    }
                }
                f.write_str(")")?;
                match results.as_slice() {
                    [] => Ok(()),
                    [single] => write!(f, " {single}"),
                    results => {
                        f.write_str(" (")?;
                        write_list(f, results, ", ")?;
                        f.write_str(")")
                    }
                }
            }
            ResolvedType::Struct { fields } => {
                f.write_str("struct{")?;
                for (i, (name, ty)) in fields.iter().enumerate() {
                    if i > 0 {
                        f.write_str("; ")?;
                    }
                    write!(f, "{name} {ty}")?;
                }
                f.write_str("}")
            }
            ResolvedType::Interface { methods } => {
                f.write_str("interface{")?;
                write_list(f, methods, "; ")?;
                f.write_str("}")
            }
            ResolvedType::Invalid => f.write_str("invalid type"),
        }
    }
}
