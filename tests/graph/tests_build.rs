//! Graph builder tests over the shop module.

use gograph::builder::{BuildError, GraphBuilder};
use gograph::graph::{Module, RefVia, SymbolId, SymbolKind};
use gograph::syntax::{Declaration, LoadedPackage, SourceFile};
use gograph::{GraphConfig, Span};

use crate::helpers::fixtures::*;
use crate::helpers::graph_assertions::*;

// =============================================================================
// DECLARATION
// =============================================================================

#[test]
fn test_shop_builds_consistent_graph() {
    let (module, report) = build_shop();

    assert_eq!(report.packages_built, 2);
    assert_eq!(report.files_built, 2);
    assert!(report.errors.is_empty());
    // `fmt.Println` is the only use outside the module.
    assert_eq!(report.unresolved, 1);
    assert_graph_consistent(&module);
}

#[test]
fn test_kinds_follow_declaration_shape() {
    let (module, _) = build_shop();

    for (path, kind) in [
        ("Reader", SymbolKind::Interface),
        ("Base", SymbolKind::Struct),
        ("Base.ID", SymbolKind::Field),
        ("Base.Read", SymbolKind::Method),
        ("Derived.Base", SymbolKind::EmbeddedField),
        ("ReadWriter.Reader", SymbolKind::EmbeddedInterface),
        ("Counter", SymbolKind::Variable),
        ("helper", SymbolKind::Function),
    ] {
        let symbol = get_symbol(&module, &id(STORE, path, kind));
        assert_eq!(symbol.local_path, path);
    }
    let package = get_symbol(&module, &SymbolId::for_package(STORE));
    assert_eq!(package.kind, SymbolKind::Package);
}

#[test]
fn test_methods_and_members_have_parents() {
    let (module, _) = build_shop();
    let base = id(STORE, "Base", SymbolKind::Struct);

    let read = get_symbol(&module, &id(STORE, "Base.Read", SymbolKind::Method));
    assert_eq!(read.parent.as_ref(), Some(&base));
    assert_eq!(read.receiver.as_deref(), Some("*Base"));

    let embedded = get_symbol(&module, &id(STORE, "Derived.Base", SymbolKind::EmbeddedField));
    assert_eq!(embedded.parent, Some(id(STORE, "Derived", SymbolKind::Struct)));
    assert_eq!(embedded.embeds.as_ref(), Some(&base));
}

#[test]
fn test_exported_view_is_package_scope_only() {
    let (module, _) = build_shop();
    let store = module.package(STORE).unwrap();

    assert!(store.exported("Reader").is_some());
    assert!(store.exported("Counter").is_some());
    assert!(store.exported("helper").is_none());
    // `Read` is only ever a method name.
    assert!(store.exported("Read").is_none());
}

// =============================================================================
// LINKING
// =============================================================================

#[test]
fn test_cross_package_references() {
    let (module, _) = build_shop();
    let base = get_symbol(&module, &id(STORE, "Base", SymbolKind::Struct));

    let embeds: Vec<_> = base
        .references
        .iter()
        .filter(|r| r.via == RefVia::Embedding)
        .collect();
    assert_eq!(embeds.len(), 2);
    let wrapper = id(APP, "Wrapper", SymbolKind::Struct);
    assert!(embeds.iter().any(|r| &*r.file == APP_FILE && r.context.as_ref() == Some(&wrapper)));

    let reader = get_symbol(&module, &id(STORE, "Reader", SymbolKind::Interface));
    let annotation = reader
        .references
        .iter()
        .find(|r| r.via == RefVia::TypeAnnotation)
        .expect("Default is typed store.Reader");
    assert_eq!(annotation.context, Some(id(APP, "Default", SymbolKind::Variable)));

    let package = get_symbol(&module, &SymbolId::for_package(STORE));
    assert_eq!(package.references.len(), 1);
    assert_eq!(package.references[0].via, RefVia::Import);
}

#[test]
fn test_identifier_uses_carry_context_and_write_flag() {
    let (module, _) = build_shop();
    let counter = get_symbol(&module, &id(STORE, "Counter", SymbolKind::Variable));
    let main = id(APP, "Main", SymbolKind::Function);

    assert_eq!(counter.references.len(), 2);
    assert!(counter.references.iter().all(|r| r.context.as_ref() == Some(&main)));
    assert_eq!(counter.references.iter().filter(|r| r.is_write).count(), 1);
    assert_no_duplicate_references(counter);
}

#[test]
fn test_unexported_filter() {
    let mut module = Module::new("/src/shop");
    GraphBuilder::new(GraphConfig::default().exported_only())
        .build(&mut module, shop_packages())
        .unwrap();

    assert!(module.symbol(&id(STORE, "helper", SymbolKind::Function)).is_none());
    assert!(module.symbol(&id(STORE, "Counter", SymbolKind::Variable)).is_some());
    // Embedded members survive the filter.
    assert!(module.symbol(&id(STORE, "Derived.Base", SymbolKind::EmbeddedField)).is_some());
    assert_graph_consistent(&module);
}

// =============================================================================
// FAILURES
// =============================================================================

#[test]
fn test_bad_file_does_not_abort_package() {
    let broken = SourceFile::new("store/broken.go", "store")
        .with_declaration(Declaration::function("not an identifier", line(1)));
    let inverted = SourceFile::new("store/inverted.go", "store")
        .with_declaration(Declaration::function("Late", Span::from_coords(5, 0, 1, 0)));
    let packages = vec![
        LoadedPackage::new(STORE, "store")
            .with_file(store_file())
            .with_file(broken)
            .with_file(inverted),
        LoadedPackage::new(APP, "main").with_file(app_file()),
    ];

    let mut module = Module::new("/src/shop");
    let report = GraphBuilder::new(GraphConfig::default())
        .build(&mut module, packages)
        .unwrap();

    assert_eq!(report.files_skipped, 2);
    assert_eq!(report.files_built, 2);
    assert!(report
        .errors
        .iter()
        .all(|e| matches!(e, BuildError::MalformedDeclaration { .. })));
    assert!(module.file("store/broken.go").is_none());
    assert!(module.symbol(&id(STORE, "Reader", SymbolKind::Interface)).is_some());
    assert_graph_consistent(&module);
}

#[test]
fn test_package_with_loader_errors_is_skipped() {
    let packages = vec![
        LoadedPackage::new(STORE, "store").with_file(store_file()),
        LoadedPackage::new(APP, "main")
            .with_file(app_file())
            .with_error("main.go:3:1: expected declaration"),
    ];
    let mut module = Module::new("/src/shop");
    let report = GraphBuilder::new(GraphConfig::default())
        .build(&mut module, packages)
        .unwrap();

    assert_eq!(report.packages_built, 1);
    assert_eq!(report.packages_skipped, 1);
    assert!(module.package(APP).is_none());
    let base = get_symbol(&module, &id(STORE, "Base", SymbolKind::Struct));
    assert_eq!(base.references.len(), 1);
}

#[test]
fn test_nothing_loadable_is_fatal() {
    let mut module = Module::new("/src/shop");
    let result = GraphBuilder::new(GraphConfig::default()).build(
        &mut module,
        vec![LoadedPackage::new(APP, "main").with_error("broken")],
    );
    assert!(matches!(result, Err(BuildError::NoPackages { skipped: 1 })));
}
