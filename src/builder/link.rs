//! Phase two: connect declared symbols to each other.
//!
//! Runs after every file in scope has been declared, so that forward
//! references (a method declared before its receiver type, a struct embedding
//! a type from a package loaded later) resolve. Each pass plans against an
//! immutable view of the module and then applies its edits.

use std::sync::Arc;

use rustc_hash::FxHashSet;
use tracing::trace;

use crate::base::receiver_base_name;
use crate::graph::{Module, RefVia, Reference, Symbol, SymbolId, SymbolKind};
use crate::syntax::SourceFile;

use super::BuildReport;

/// Files whose symbols and uses are (re)linked.
pub(crate) type LinkScope = FxHashSet<Arc<str>>;

fn in_scope(scope: &LinkScope, symbol: &Symbol) -> bool {
    symbol.file.as_ref().is_some_and(|f| scope.contains(f))
}

// ============================================================================
// RECEIVERS
// ============================================================================

/// Give every method of `packages` whose parent is unset or no longer
/// exists the receiver type of the same package, if there is one now.
pub(crate) fn wire_receivers<'p>(module: &mut Module, packages: impl IntoIterator<Item = &'p Arc<str>>) -> usize {
    let mut wired = 0;
    for path in packages {
        let Some(package) = module.package(path) else {
            continue;
        };
        let plan: Vec<(SymbolId, Option<SymbolId>)> = package
            .symbols()
            .filter(|s| s.kind == SymbolKind::Method)
            .filter(|s| s.parent.as_ref().is_none_or(|p| !package.contains_symbol(p)))
            .filter_map(|s| {
                let receiver = s.receiver.as_deref()?;
                let parent = package
                    .lookup_type(receiver_base_name(receiver))
                    .map(|t| t.id.clone());
                Some((s.id.clone(), parent))
            })
            .collect();

        let Some(package) = module.package_mut(path) else {
            continue;
        };
        for (id, parent) in plan {
            if let Some(method) = package.symbol_mut(&id) {
                if parent.is_some() {
                    wired += 1;
                    trace!("[BUILDER] wired {} to {:?}", id, parent);
                }
                method.parent = parent;
            }
        }
    }
    wired
}

// ============================================================================
// TYPE NAME RESOLUTION
// ============================================================================

/// Resolve a type named `qualifier.name` as written in `file` of `package`.
///
/// Unqualified names are looked up in the package itself, then in
/// dot-imported packages. Qualified names go through the file's imports,
/// falling back to a module package with that name; only exported types of
/// other packages are visible.
pub(crate) fn resolve_type(
    module: &Module,
    package: &str,
    file: Option<&str>,
    qualifier: Option<&str>,
    name: &str,
) -> Option<SymbolId> {
    let imports = file
        .and_then(|f| module.file(f))
        .map(|f| f.imports.as_slice())
        .unwrap_or(&[]);

    let found = match qualifier {
        None => module
            .package(package)
            .and_then(|p| p.lookup_type(name))
            .or_else(|| {
                imports
                    .iter()
                    .filter(|i| i.is_dot())
                    .filter_map(|i| module.package(&i.path))
                    .find_map(|p| p.exported(name).filter(|s| s.is_type()))
            }),
        Some(qualifier) => imports
            .iter()
            .filter(|i| !i.is_blank() && !i.is_dot() && i.local_name() == qualifier)
            .find_map(|i| module.package(&i.path))
            .or_else(|| module.package_named(qualifier))
            .and_then(|p| p.exported(name))
            .filter(|s| s.is_type()),
    };
    found.map(|s| s.id.clone())
}

// ============================================================================
// LINK PASSES
// ============================================================================

/// Run every reference-producing pass over `scope`.
pub(crate) fn link(
    module: &mut Module,
    scope: &LinkScope,
    sources: &[(Arc<str>, SourceFile)],
    report: &mut BuildReport,
) {
    resolve_embeds(module, scope, report);
    record_type_annotations(module, scope, report);
    record_imports(module, scope, report);
    for (package, file) in sources {
        record_uses(module, package, file, report);
    }
}

/// Resolve embedded members to the type they embed and record an
/// `Embedding` reference on that type.
///
/// Members outside `scope` are retried only when their target is unset or
/// was removed.
fn resolve_embeds(module: &mut Module, scope: &LinkScope, report: &mut BuildReport) {
    let mut plan: Vec<(SymbolId, Option<SymbolId>, Option<Reference>, bool)> = Vec::new();

    for symbol in module.symbols().filter(|s| s.kind.is_embedding()) {
        let scoped = in_scope(scope, symbol);
        let dangling = symbol
            .embeds
            .as_ref()
            .is_some_and(|t| module.symbol(t).is_none());
        if !scoped && symbol.embeds.is_some() && !dangling {
            continue;
        }
        let (Some(embedded), Some(file)) = (&symbol.embedded, &symbol.file) else {
            continue;
        };
        let target = resolve_type(
            module,
            &symbol.package,
            Some(file),
            embedded.qualifier.as_deref(),
            &embedded.name,
        );
        let reference = target.as_ref().map(|_| {
            Reference::new(file.clone(), symbol.span, RefVia::Embedding)
                .with_context(symbol.parent.clone())
        });
        plan.push((symbol.id.clone(), target, reference, scoped));
    }

    for (member, target, reference, scoped) in plan {
        if let Some(symbol) = module.symbol_mut(&member) {
            symbol.embeds = target.clone();
        }
        match (target, reference) {
            (Some(target), Some(reference)) => {
                trace!("[BUILDER] {} embeds {}", member, target);
                if module.add_reference(&target, reference) {
                    report.references += 1;
                }
            }
            _ if scoped => {
                trace!("[BUILDER] unresolved embedded type for {}", member);
                report.unresolved += 1;
            }
            _ => {}
        }
    }
}

/// Symbols whose declared type mentions named types of the module. Parameters
/// are covered by their function's signature.
fn annotates(kind: SymbolKind) -> bool {
    matches!(
        kind,
        SymbolKind::Field
            | SymbolKind::Variable
            | SymbolKind::Constant
            | SymbolKind::Function
            | SymbolKind::Method
            | SymbolKind::NamedType
    )
}

/// Record a `TypeAnnotation` reference for every module type named in the
/// type of a symbol in scope. Names that resolve nowhere (predeclared or
/// external types) are ignored.
fn record_type_annotations(module: &mut Module, scope: &LinkScope, report: &mut BuildReport) {
    let mut plan: Vec<(SymbolId, Reference)> = Vec::new();

    for symbol in module
        .symbols()
        .filter(|s| annotates(s.kind) && in_scope(scope, s))
    {
        let (Some(file), Some(syntax)) = (
            &symbol.file,
            symbol.type_info.as_ref().and_then(|t| t.syntax.as_ref()),
        ) else {
            continue;
        };
        let context = match symbol.kind {
            SymbolKind::Field => symbol.parent.clone(),
            _ => Some(symbol.id.clone()),
        };
        let mut seen = FxHashSet::default();
        for (qualifier, name) in syntax.named_types() {
            let Some(target) = resolve_type(module, &symbol.package, Some(file), qualifier, name)
            else {
                continue;
            };
            if seen.insert(target.clone()) {
                plan.push((
                    target,
                    Reference::new(file.clone(), symbol.span, RefVia::TypeAnnotation)
                        .with_context(context.clone()),
                ));
            }
        }
    }

    for (target, reference) in plan {
        if module.add_reference(&target, reference) {
            report.references += 1;
        }
    }
}

/// Record an `Import` reference on the package symbol of every module
/// package imported by a file in scope.
fn record_imports(module: &mut Module, scope: &LinkScope, report: &mut BuildReport) {
    let plan: Vec<(SymbolId, Reference)> = module
        .files()
        .filter(|f| scope.contains(&f.path))
        .flat_map(|f| f.imports.iter())
        .filter(|i| !i.is_blank())
        .filter_map(|i| {
            let package = module.package(&i.path)?;
            Some((
                package.symbol_id(),
                Reference::new(i.file.clone(), i.span, RefVia::Import),
            ))
        })
        .collect();

    for (target, reference) in plan {
        if module.add_reference(&target, reference) {
            report.references += 1;
        }
    }
}

/// Record an `Identifier` reference for every use site of `file` whose
/// target is declared in the module.
fn record_uses(module: &mut Module, package: &str, file: &SourceFile, report: &mut BuildReport) {
    let Some(own) = module.package(package) else {
        return;
    };
    let path: Arc<str> = Arc::from(file.path.as_str());

    let mut plan: Vec<(SymbolId, Reference)> = Vec::with_capacity(file.uses.len());
    let mut unresolved = 0;
    for site in &file.uses {
        let target_package = match site.target.package.as_deref() {
            Some(import_path) => module.package(import_path),
            None => Some(own),
        };
        let target = target_package
            .and_then(|p| p.lookup_path(&site.target.local_path()))
            .map(|s| s.id.clone());
        let Some(target) = target else {
            trace!("[BUILDER] unresolved use of {} in {}", site.target.local_path(), path);
            unresolved += 1;
            continue;
        };
        let context = site
            .context
            .as_deref()
            .and_then(|c| own.lookup_path(c))
            .map(|s| s.id.clone());
        plan.push((
            target,
            Reference::new(path.clone(), site.span, RefVia::Identifier)
                .with_context(context)
                .with_write(site.is_write),
        ));
    }

    report.unresolved += unresolved;
    for (target, reference) in plan {
        if module.add_reference(&target, reference) {
            report.references += 1;
        }
    }
}
