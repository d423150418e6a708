//! Incremental update tests: builder update plus index update.

use std::sync::Arc;

use gograph::builder::{ChangedFile, GraphBuilder};
use gograph::graph::{Module, RefVia, SymbolKind};
use gograph::index::SymbolIndex;
use gograph::interfaces::InterfaceEngine;
use gograph::syntax::{Declaration, LoadedPackage, SourceFile};
use gograph::GraphConfig;

use crate::helpers::fixtures::*;
use crate::helpers::graph_assertions::*;

fn update(module: &mut Module, index: &mut SymbolIndex, import_path: &str, file: gograph::syntax::SourceFile) {
    let path: Arc<str> = Arc::from(file.path.as_str());
    GraphBuilder::new(GraphConfig::default()).update_files(
        module,
        vec![ChangedFile::new(import_path, file)],
        &[],
    );
    index.update(module, &[path]);
}

fn store_snapshot(module: &Module) -> Vec<(String, std::collections::HashSet<gograph::graph::Reference>)> {
    let mut snapshot: Vec<_> = module
        .package(STORE)
        .unwrap()
        .symbols()
        .map(|s| (s.id.to_string(), reference_set(s)))
        .collect();
    snapshot.sort_by(|a, b| a.0.cmp(&b.0));
    snapshot
}

#[test]
fn test_reprocessing_unchanged_file_is_idempotent() {
    let (mut module, mut index) = indexed_shop();
    let symbols_before = module.symbol_count();
    let references_before = module.reference_count();
    let store_before = store_snapshot(&module);
    let app_ids_before = module.file(APP_FILE).unwrap().symbols.len();

    update(&mut module, &mut index, APP, app_file());

    assert_eq!(module.symbol_count(), symbols_before);
    assert_eq!(module.reference_count(), references_before);
    assert_eq!(store_snapshot(&module), store_before);
    assert_eq!(module.file(APP_FILE).unwrap().symbols.len(), app_ids_before);
    for symbol in module.symbols() {
        assert_no_duplicate_references(symbol);
    }
    assert_graph_consistent(&module);
    assert_index_identity(&module, &index);
    assert_eq!(index.references().len(), module.reference_count());
}

#[test]
fn test_changed_uses_replace_old_references() {
    let (mut module, mut index) = indexed_shop();
    let counter = id(STORE, "Counter", SymbolKind::Variable);

    update(&mut module, &mut index, APP, app_file_with(false));

    let symbol = get_symbol(&module, &counter);
    assert_eq!(symbol.references.len(), 1);
    assert!(!symbol.references[0].is_write);
    assert_eq!(index.references_to(&counter).len(), 1);
    assert_eq!(index.references_in_file(APP_FILE).len(), module
        .symbols()
        .flat_map(|s| s.references.iter())
        .filter(|r| &*r.file == APP_FILE)
        .count());
}

#[test]
fn test_references_from_other_files_survive_reprocessing() {
    let (mut module, mut index) = indexed_shop();
    let base = id(STORE, "Base", SymbolKind::Struct);
    let counter = id(STORE, "Counter", SymbolKind::Variable);

    update(&mut module, &mut index, STORE, store_file());

    // Both references from app/main.go were carried over to the new symbol.
    assert_eq!(get_symbol(&module, &counter).references.len(), 2);
    let base_symbol = get_symbol(&module, &base);
    assert_eq!(base_symbol.references.len(), 2);
    assert_no_duplicate_references(base_symbol);
    let wrapper_member = get_symbol(&module, &id(APP, "Wrapper.Base", SymbolKind::EmbeddedField));
    assert_eq!(wrapper_member.embeds.as_ref(), Some(&base));

    assert_graph_consistent(&module);
    assert_index_identity(&module, &index);
    assert_eq!(index.references().len(), module.reference_count());
}

#[test]
fn test_removed_declaration_leaves_no_dangling_edges() {
    let (mut module, mut index) = indexed_shop();
    let base = id(STORE, "Base", SymbolKind::Struct);

    update(&mut module, &mut index, STORE, store_file_without(&["Base"]));

    assert!(module.symbol(&base).is_none());
    assert!(!index.contains(&base));
    assert!(index.references_to(&base).is_empty());
    // The method lost its receiver type; it is still declared.
    let read = get_symbol(&module, &id(STORE, "Base.Read", SymbolKind::Method));
    assert!(read.parent.is_none());
    let derived_member = get_symbol(&module, &id(STORE, "Derived.Base", SymbolKind::EmbeddedField));
    assert!(derived_member.embeds.is_none());
    assert_index_identity(&module, &index);
}

#[test]
fn test_new_declaration_becomes_visible() {
    let (mut module, mut index) = indexed_shop();
    let app = app_file().with_declaration(Declaration::function("Extra", line(20)));

    update(&mut module, &mut index, APP, app);

    let extra = id(APP, "Extra", SymbolKind::Function);
    assert!(index.contains(&extra));
    assert_eq!(index.ids_named("Extra"), &[extra][..]);
    assert!(module.package(APP).unwrap().exported("Extra").is_some());
}

#[test]
fn test_removing_file() {
    let (mut module, mut index) = indexed_shop();
    GraphBuilder::new(GraphConfig::default()).update_files(&mut module, Vec::new(), &[APP_FILE.to_string()]);
    index.update(&module, &[Arc::from(APP_FILE)]);

    assert!(module.file(APP_FILE).is_none());
    assert!(index.ids_in_file(APP_FILE).is_empty());
    assert!(index.references_in_file(APP_FILE).is_empty());
    let base = get_symbol(&module, &id(STORE, "Base", SymbolKind::Struct));
    assert!(base.references.iter().all(|r| r.via == RefVia::Embedding && &*r.file == STORE_FILE));
    assert_index_identity(&module, &index);
}

const SPLIT: &str = "example.com/split";

fn split_types(with_receiver_type: bool) -> SourceFile {
    let file = SourceFile::new("split/types.go", "split")
        .with_declaration(interface("Reader", block(1, 3), &[("Read", 2)], &[]));
    if with_receiver_type {
        file.with_declaration(structure("T", line(5), vec![]))
    } else {
        file
    }
}

fn split_module(with_receiver_type: bool) -> Module {
    let methods = SourceFile::new("split/methods.go", "split").with_declaration(method("*T", "Read", 1));
    let mut module = Module::new("/src/split");
    GraphBuilder::new(GraphConfig::default())
        .build(
            &mut module,
            vec![LoadedPackage::new(SPLIT, "split")
                .with_file(methods)
                .with_file(split_types(with_receiver_type))],
        )
        .unwrap();
    module
}

#[test]
fn test_receiver_type_added_in_other_file_matches_full_build() {
    let mut module = split_module(false);
    let mut index = SymbolIndex::build(&module);
    let t = id(SPLIT, "T", SymbolKind::Struct);
    let read = id(SPLIT, "T.Read", SymbolKind::Method);
    let reader = id(SPLIT, "Reader", SymbolKind::Interface);

    update(&mut module, &mut index, SPLIT, split_types(true));

    assert_eq!(get_symbol(&module, &read).parent.as_ref(), Some(&t));
    let fresh = SymbolIndex::build(&module);
    assert_eq!(index.children_ids(&t), fresh.children_ids(&t));
    assert_eq!(index.children_ids(&t), &[read.clone()][..]);
    assert!(InterfaceEngine::new(&module, &index).is_implemented_by(&reader, &t).unwrap());
    assert_index_identity(&module, &index);

    update(&mut module, &mut index, SPLIT, split_types(false));

    assert!(get_symbol(&module, &read).parent.is_none());
    assert!(index.children_ids(&t).is_empty());
    assert!(!index.contains(&t));
    assert_index_identity(&module, &index);
}
