//! Usage classification and summary tests.

use std::sync::Arc;

use gograph::graph::{RefVia, Reference, Symbol, SymbolId, SymbolKind};
use gograph::usage::{self, UsageError, UsageKind, spawn_usage_collection};
use gograph::Span;
use parking_lot::RwLock;
use rstest::rstest;

use crate::helpers::fixtures::*;

#[rstest]
#[case("Counter", SymbolKind::Variable, &[(UsageKind::Read, 1), (UsageKind::Write, 1)])]
#[case("Base.Read", SymbolKind::Method, &[(UsageKind::Call, 1)])]
#[case("Base", SymbolKind::Struct, &[(UsageKind::Embed, 2)])]
#[case("Reader", SymbolKind::Interface, &[(UsageKind::Embed, 1), (UsageKind::TypeUse, 1)])]
#[case("helper", SymbolKind::Function, &[])]
fn test_usage_by_kind(
    #[case] path: &str,
    #[case] kind: SymbolKind,
    #[case] expected: &[(UsageKind, usize)],
) {
    let (module, _) = build_shop();
    let summary = usage::symbol_usage(&module, &id(STORE, path, kind)).unwrap();

    let total: usize = expected.iter().map(|(_, n)| n).sum();
    assert_eq!(summary.total, total);
    for usage_kind in UsageKind::ALL {
        let want = expected
            .iter()
            .find(|(k, _)| *k == usage_kind)
            .map(|(_, n)| *n)
            .unwrap_or(0);
        assert_eq!(summary.count(usage_kind), want, "{} of {}", usage_kind, path);
    }
    assert_eq!(summary.is_unused(), total == 0);
}

#[test]
fn test_package_import_usage() {
    let (module, _) = build_shop();
    let summary = usage::symbol_usage(&module, &SymbolId::for_package(STORE)).unwrap();
    assert_eq!(summary.count(UsageKind::Import), 1);
    // Import statements sit outside any declaration.
    assert!(summary.contexts.is_empty());
}

#[test]
fn test_usage_sets() {
    let (module, _) = build_shop();

    let counter = usage::symbol_usage(&module, &id(STORE, "Counter", SymbolKind::Variable)).unwrap();
    assert_eq!(counter.files.len(), 1);
    assert_eq!(counter.packages.iter().map(|p| &**p).collect::<Vec<_>>(), vec![APP]);
    assert_eq!(
        counter.contexts.iter().cloned().collect::<Vec<_>>(),
        vec![id(APP, "Main", SymbolKind::Function)]
    );

    let base = usage::symbol_usage(&module, &id(STORE, "Base", SymbolKind::Struct)).unwrap();
    let mut packages: Vec<&str> = base.packages.iter().map(|p| &**p).collect();
    packages.sort();
    assert_eq!(packages, vec![APP, STORE]);
    assert_eq!(base.contexts.len(), 2);
}

#[test]
fn test_reference_without_site_is_unknown() {
    let (module, _) = build_shop();
    let counter = module.symbol(&id(STORE, "Counter", SymbolKind::Variable)).unwrap();
    let reference = Reference::new(Arc::from(""), Span::default(), RefVia::Identifier);
    assert_eq!(usage::classify(counter, &reference), UsageKind::Unknown);

    let write = reference.clone().with_write(true);
    assert_eq!(usage::classify(counter, &write), UsageKind::Write);
}

#[test]
fn test_unknown_and_malformed_symbols() {
    let (module, _) = build_shop();

    let missing = id(STORE, "Missing", SymbolKind::Variable);
    assert!(matches!(
        usage::symbol_usage(&module, &missing),
        Err(UsageError::UnknownSymbol(_))
    ));

    let stray = Symbol::new(
        id(STORE, "Stray", SymbolKind::Variable),
        "Stray",
        SymbolKind::Variable,
        Arc::from(APP),
    );
    assert!(matches!(
        usage::summarize(&module, &stray),
        Err(UsageError::Malformed { .. })
    ));
}

#[test]
fn test_collect_usage_covers_every_symbol() {
    let (module, _) = build_shop();
    let map = usage::collect_usage(&module);
    assert_eq!(map.len(), module.symbol_count());
    assert_eq!(
        map[&id(STORE, "Counter", SymbolKind::Variable)].count(UsageKind::Write),
        1
    );
}

#[test]
fn test_background_collection_matches_direct() {
    let (module, _) = build_shop();
    let direct = usage::collect_usage(&module);
    let shared = Arc::new(RwLock::new(module));

    let task = spawn_usage_collection(Arc::clone(&shared));
    let background = task.wait().unwrap();

    assert_eq!(background, direct);
    // The pass released its read lock.
    assert!(shared.try_write().is_some());
}
