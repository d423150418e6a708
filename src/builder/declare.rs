//! Phase one: turn a file's declarations into symbols.

use std::sync::Arc;

use smol_str::SmolStr;
use tracing::trace;

use crate::base::{is_blank, is_exported, is_identifier, receiver_base_name};
use crate::config::GraphConfig;
use crate::graph::{EmbeddedType, File, Import, Package, Symbol, SymbolId, SymbolKind, TypeInfo};
use crate::syntax::{
    DeclKind, Declaration, FieldDecl, FuncType, InterfaceMember, ResolvedType, SourceFile,
    TypeExpr, TypeShape,
};

use super::BuildError;

// ============================================================================
// VALIDATION
// ============================================================================

/// Reject files carrying declarations no symbol can be made from. Runs
/// before anything is added to the package.
pub(crate) fn validate_file(file: &SourceFile) -> Result<(), BuildError> {
    for decl in &file.declarations {
        check_name(&file.path, &decl.name)?;
        if decl.span.is_inverted() {
            return Err(BuildError::malformed(&file.path, &decl.name, "span ends before it starts"));
        }
        if let Some(receiver) = &decl.receiver {
            let base = receiver_base_name(receiver);
            if !is_identifier(base) {
                return Err(BuildError::malformed(
                    &file.path,
                    &decl.name,
                    format!("unusable receiver `{receiver}`"),
                ));
            }
        }
        for field in decl.fields() {
            if let Some(name) = &field.name {
                check_name(&file.path, name)?;
            }
        }
        for member in decl.interface_members() {
            if let Some(name) = &member.name {
                check_name(&file.path, name)?;
            }
        }
    }
    Ok(())
}

fn check_name(file: &str, name: &str) -> Result<(), BuildError> {
    if name.is_empty() {
        return Err(BuildError::malformed(file, name, "empty name"));
    }
    if !is_identifier(name) {
        return Err(BuildError::malformed(file, name, "not an identifier"));
    }
    Ok(())
}

// ============================================================================
// DECLARATION CONTEXT
// ============================================================================

struct DeclareContext<'a> {
    package: &'a mut Package,
    file: Arc<str>,
    config: &'a GraphConfig,
    declared: usize,
}

impl DeclareContext<'_> {
    fn includes(&self, name: &str) -> bool {
        !is_blank(name) && (self.config.include_unexported || is_exported(name))
    }

    /// First free ID for `local_path`/`kind` in the package.
    fn allocate_id(&self, local_path: &str, kind: SymbolKind) -> SymbolId {
        let id = SymbolId::compose(&self.package.import_path, local_path, kind);
        if !self.package.contains_symbol(&id) {
            return id;
        }
        let mut ordinal = 2;
        loop {
            let candidate = id.with_ordinal(ordinal);
            if !self.package.contains_symbol(&candidate) {
                return candidate;
            }
            ordinal += 1;
        }
    }

    fn new_symbol(
        &self,
        local_path: &str,
        name: &str,
        kind: SymbolKind,
        span: crate::base::Span,
    ) -> Symbol {
        Symbol::new(
            self.allocate_id(local_path, kind),
            name,
            kind,
            self.package.import_path.clone(),
        )
        .with_declaration(self.file.clone(), span)
    }

    fn declare(&mut self, symbol: Symbol) -> SymbolId {
        self.declared += 1;
        self.package.add_symbol(symbol)
    }
}

// ============================================================================
// DECLARATION
// ============================================================================

/// The graph record of `file`, with its imports, ready to be added to the
/// package at `package`.
pub(crate) fn file_record(package: &Arc<str>, file: &SourceFile) -> File {
    let path: Arc<str> = Arc::from(file.path.as_str());
    let mut record = File::new(path.clone(), package.clone());
    record.imports = file
        .imports
        .iter()
        .map(|import| Import {
            path: import.path.clone(),
            alias: import.alias.clone(),
            span: import.span,
            file: path.clone(),
        })
        .collect();
    record
}

/// Declare the symbols of `file`, already registered with `package`.
/// Returns the number of symbols declared.
pub(crate) fn declare_file(package: &mut Package, file: &SourceFile, config: &GraphConfig) -> usize {
    let path: Arc<str> = Arc::from(file.path.as_str());
    let mut ctx = DeclareContext {
        package,
        file: path,
        config,
        declared: 0,
    };

    for decl in &file.declarations {
        if !ctx.includes(&decl.name) {
            trace!("[BUILDER] filtered {} in {}", decl.name, ctx.file);
            continue;
        }
        match decl.kind {
            DeclKind::Function if decl.is_method() => declare_method(&mut ctx, decl),
            DeclKind::Function => declare_function(&mut ctx, decl),
            DeclKind::Type => declare_type(&mut ctx, decl),
            DeclKind::Variable => declare_value(&mut ctx, decl, SymbolKind::Variable),
            DeclKind::Constant => declare_value(&mut ctx, decl, SymbolKind::Constant),
        }
    }

    ctx.declared
}

fn declare_function(ctx: &mut DeclareContext<'_>, decl: &Declaration) {
    let symbol = ctx
        .new_symbol(&decl.name, &decl.name, SymbolKind::Function, decl.span)
        .with_type_info(TypeInfo::from_parts(decl.type_expr.as_ref(), decl.resolved.as_ref()));
    let id = ctx.declare(symbol);
    if let Some(signature) = decl.signature() {
        declare_parameters(ctx, &id, &decl.name, signature);
    }
}

fn declare_method(ctx: &mut DeclareContext<'_>, decl: &Declaration) {
    let Some(receiver) = decl.receiver.as_deref() else {
        return;
    };
    let base = receiver_base_name(receiver);
    let local_path = format!("{base}.{}", decl.name);

    let mut symbol = ctx
        .new_symbol(&local_path, &decl.name, SymbolKind::Method, decl.span)
        .with_type_info(TypeInfo::from_parts(decl.type_expr.as_ref(), decl.resolved.as_ref()));
    symbol.receiver = Some(SmolStr::new(receiver));
    // Left unset when the receiver type is declared later; the link phase
    // picks those up.
    symbol.parent = ctx.package.lookup_type(base).map(|t| t.id.clone());

    let id = ctx.declare(symbol);
    if let Some(signature) = decl.signature() {
        declare_parameters(ctx, &id, &local_path, signature);
    }
}

fn declare_parameters(
    ctx: &mut DeclareContext<'_>,
    owner: &SymbolId,
    owner_path: &str,
    signature: &FuncType,
) {
    for param in signature.params.iter().chain(&signature.results) {
        let Some(name) = param.name.as_deref() else {
            continue;
        };
        if is_blank(name) {
            continue;
        }
        let symbol = ctx
            .new_symbol(
                &format!("{owner_path}.{name}"),
                name,
                SymbolKind::Parameter,
                param.span,
            )
            .with_parent(owner.clone())
            .with_type_info(TypeInfo::from_parts(Some(&param.type_expr), None));
        ctx.declare(symbol);
    }
}

fn declare_value(ctx: &mut DeclareContext<'_>, decl: &Declaration, kind: SymbolKind) {
    let symbol = ctx
        .new_symbol(&decl.name, &decl.name, kind, decl.span)
        .with_type_info(TypeInfo::from_parts(decl.type_expr.as_ref(), decl.resolved.as_ref()));
    ctx.declare(symbol);
}

fn declare_type(ctx: &mut DeclareContext<'_>, decl: &Declaration) {
    let shape = decl.type_shape();
    let kind = match shape {
        TypeShape::Struct => SymbolKind::Struct,
        TypeShape::Interface => SymbolKind::Interface,
        TypeShape::Other => SymbolKind::NamedType,
    };
    let symbol = ctx
        .new_symbol(&decl.name, &decl.name, kind, decl.span)
        .with_type_info(TypeInfo::from_parts(decl.type_expr.as_ref(), decl.resolved.as_ref()));
    let id = ctx.declare(symbol);

    match shape {
        TypeShape::Struct => {
            for field in decl.fields() {
                declare_field(ctx, &id, &decl.name, field, decl.resolved.as_ref());
            }
        }
        TypeShape::Interface => {
            for member in decl.interface_members() {
                declare_interface_member(ctx, &id, &decl.name, member);
            }
        }
        TypeShape::Other => {}
    }
}

fn declare_field(
    ctx: &mut DeclareContext<'_>,
    owner: &SymbolId,
    owner_path: &str,
    field: &FieldDecl,
    resolved_owner: Option<&ResolvedType>,
) {
    match field.name.as_deref() {
        Some(name) => {
            if !ctx.includes(name) {
                return;
            }
            let resolved = resolved_field(resolved_owner, name);
            let symbol = ctx
                .new_symbol(&format!("{owner_path}.{name}"), name, SymbolKind::Field, field.span)
                .with_parent(owner.clone())
                .with_type_info(TypeInfo::from_parts(Some(&field.type_expr), resolved));
            ctx.declare(symbol);
        }
        None => declare_embedded(ctx, owner, owner_path, &field.type_expr, field.span, SymbolKind::EmbeddedField),
    }
}

fn declare_interface_member(
    ctx: &mut DeclareContext<'_>,
    owner: &SymbolId,
    owner_path: &str,
    member: &InterfaceMember,
) {
    match member.name.as_deref() {
        Some(name) => {
            if !ctx.includes(name) {
                return;
            }
            let symbol = ctx
                .new_symbol(&format!("{owner_path}.{name}"), name, SymbolKind::Method, member.span)
                .with_parent(owner.clone())
                .with_type_info(TypeInfo::from_parts(Some(&member.type_expr), None));
            ctx.declare(symbol);
        }
        None => declare_embedded(
            ctx,
            owner,
            owner_path,
            &member.type_expr,
            member.span,
            SymbolKind::EmbeddedInterface,
        ),
    }
}

/// Embedded members take the name of the type they embed. They are kept
/// regardless of visibility filtering: the method sets of their owner depend
/// on them.
fn declare_embedded(
    ctx: &mut DeclareContext<'_>,
    owner: &SymbolId,
    owner_path: &str,
    type_expr: &TypeExpr,
    span: crate::base::Span,
    kind: SymbolKind,
) {
    let Some((qualifier, name)) = type_expr.embedded_name() else {
        trace!("[BUILDER] embedded member `{}` in {} names no type", type_expr, ctx.file);
        return;
    };
    let mut symbol = ctx
        .new_symbol(&format!("{owner_path}.{name}"), name, kind, span)
        .with_parent(owner.clone())
        .with_type_info(TypeInfo::from_parts(Some(type_expr), None));
    symbol.embedded = Some(EmbeddedType {
        qualifier: qualifier.map(SmolStr::new),
        name: SmolStr::new(name),
    });
    ctx.declare(symbol);
}

fn resolved_field<'a>(owner: Option<&'a ResolvedType>, name: &str) -> Option<&'a ResolvedType> {
    match owner? {
        ResolvedType::Struct { fields } => fields
            .iter()
            .find(|(field, _)| field == name)
            .map(|(_, ty)| ty),
        _ => None,
    }
}
