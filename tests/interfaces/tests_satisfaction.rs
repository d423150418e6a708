//! Interface satisfaction tests.

use gograph::graph::SymbolKind;
use gograph::interfaces::{ImplementationFilter, InterfaceEngine, InterfaceError};
use gograph::syntax::{Declaration, SourceFile};
use rstest::rstest;

use crate::helpers::fixtures::*;

fn store_struct(name: &str) -> gograph::SymbolId {
    id(STORE, name, SymbolKind::Struct)
}

fn store_interface(name: &str) -> gograph::SymbolId {
    id(STORE, name, SymbolKind::Interface)
}

// =============================================================================
// METHOD SETS
// =============================================================================

#[test]
fn test_method_set_includes_promoted_methods() {
    let (module, index) = indexed_shop();
    let engine = InterfaceEngine::new(&module, &index);

    let derived = engine.method_set(&store_struct("Derived")).unwrap();
    let names: Vec<&str> = derived.keys().map(|n| n.as_str()).collect();
    assert_eq!(names, vec!["Write", "Read"]);
    assert_eq!(derived["Read"], id(STORE, "Base.Read", SymbolKind::Method));

    let read_writer = engine.method_set(&store_interface("ReadWriter")).unwrap();
    assert_eq!(read_writer.len(), 2);
    assert_eq!(read_writer["Write"], id(STORE, "Writer.Write", SymbolKind::Method));
}

#[test]
fn test_cyclic_struct_embedding_terminates() {
    let (module, index) = indexed_shop();
    let engine = InterfaceEngine::new(&module, &index);

    let ring = engine.method_set(&store_struct("Ring")).unwrap();
    assert_eq!(ring.keys().map(|n| n.as_str()).collect::<Vec<_>>(), vec!["Spin"]);
    let link = engine.method_set(&store_struct("Link")).unwrap();
    assert_eq!(link.len(), 1);
}

#[test]
fn test_cyclic_interface_embedding_terminates() {
    let file = SourceFile::new("cyc/cyc.go", "cyc")
        .with_declaration(interface("A", block(1, 4), &[("Alpha", 3)], &[("B", 2)]))
        .with_declaration(interface("B", block(5, 8), &[("Beta", 7)], &[("A", 6)]));
    let (module, index) = indexed_single("example.com/cyc", file);
    let engine = InterfaceEngine::new(&module, &index);

    let a = engine
        .method_set(&id("example.com/cyc", "A", SymbolKind::Interface))
        .unwrap();
    let mut names: Vec<&str> = a.keys().map(|n| n.as_str()).collect();
    names.sort();
    assert_eq!(names, vec!["Alpha", "Beta"]);
}

#[test]
fn test_removed_embedded_type_stops_promoting_methods() {
    let (mut module, _) = build_shop();
    let base = store_struct("Base");
    module.remove_symbol(&base).unwrap();
    let index = gograph::SymbolIndex::build(&module);
    let engine = InterfaceEngine::new(&module, &index);

    let derived = engine.method_set(&store_struct("Derived")).unwrap();
    assert_eq!(derived.keys().map(|n| n.as_str()).collect::<Vec<_>>(), vec!["Write"]);
    assert!(!engine
        .is_implemented_by(&store_interface("Reader"), &id(APP, "Wrapper", SymbolKind::Struct))
        .unwrap());
    assert!(module.symbol(&id(STORE, "Base.ID", SymbolKind::Field)).is_none());
    assert!(module
        .symbol(&id(STORE, "Base.Read", SymbolKind::Method))
        .is_some_and(|m| m.parent.is_none()));
}

// =============================================================================
// SATISFACTION
// =============================================================================

#[rstest]
#[case("ReadWriter", "File", true)]
#[case("ReadWriter", "Partial", false)]
#[case("ReadWriter", "Derived", true)]
#[case("ReadWriter", "Base", false)]
#[case("Reader", "Base", true)]
#[case("Writer", "Ring", false)]
#[case("Empty", "Ring", true)]
#[case("Empty", "Partial", true)]
fn test_is_implemented_by(#[case] contract: &str, #[case] candidate: &str, #[case] expected: bool) {
    let (module, index) = indexed_shop();
    let engine = InterfaceEngine::new(&module, &index);
    assert_eq!(
        engine
            .is_implemented_by(&store_interface(contract), &store_struct(candidate))
            .unwrap(),
        expected
    );
}

#[test]
fn test_removing_one_required_method_flips_result() {
    let file = |methods: &[&str]| {
        methods.iter().enumerate().fold(
            SourceFile::new("io/io.go", "io")
                .with_declaration(interface("Closer", block(1, 4), &[("Read", 2), ("Close", 3)], &[]))
                .with_declaration(structure("Conn", line(5), vec![])),
            |file, (i, name)| file.with_declaration(method("Conn", name, 10 + i)),
        )
    };
    let contract = id("example.com/io", "Closer", SymbolKind::Interface);
    let candidate = id("example.com/io", "Conn", SymbolKind::Struct);

    let (module, index) = indexed_single("example.com/io", file(&["Read", "Close", "Flush"]));
    assert!(InterfaceEngine::new(&module, &index).is_implemented_by(&contract, &candidate).unwrap());

    let (module, index) = indexed_single("example.com/io", file(&["Read", "Flush"]));
    assert!(!InterfaceEngine::new(&module, &index).is_implemented_by(&contract, &candidate).unwrap());
}

#[test]
fn test_argument_errors() {
    let (module, index) = indexed_shop();
    let engine = InterfaceEngine::new(&module, &index);

    let missing = store_interface("Missing");
    assert_eq!(
        engine.is_implemented_by(&missing, &store_struct("File")),
        Err(InterfaceError::UnknownSymbol(missing))
    );
    assert!(matches!(
        engine.is_implemented_by(&store_struct("File"), &store_struct("Base")),
        Err(InterfaceError::NotAnInterface { kind: SymbolKind::Struct, .. })
    ));
    assert!(matches!(
        engine.implementation_info(&store_interface("Writer"), &store_struct("Partial")),
        Err(InterfaceError::NotImplemented { .. })
    ));
}

// =============================================================================
// IMPLEMENTATION INFO
// =============================================================================

#[test]
fn test_implementation_info_through_embedding() {
    let (module, index) = indexed_shop();
    let engine = InterfaceEngine::new(&module, &index);

    let info = engine
        .implementation_info(&store_interface("ReadWriter"), &store_struct("Derived"))
        .unwrap();
    assert!(info.via_embedding);
    assert!(info.methods["Write"].is_direct);
    assert!(!info.methods["Read"].is_direct);
    assert_eq!(
        info.methods["Read"].implementing_method,
        id(STORE, "Base.Read", SymbolKind::Method)
    );

    let reader = engine
        .implementation_info(&store_interface("Reader"), &store_struct("Derived"))
        .unwrap();
    assert_eq!(reader.embedding_chain, vec![store_struct("Base")]);
}

#[test]
fn test_implementation_info_direct() {
    let (module, index) = indexed_shop();
    let engine = InterfaceEngine::new(&module, &index);

    let info = engine
        .implementation_info(&store_interface("ReadWriter"), &store_struct("File"))
        .unwrap();
    assert!(!info.via_embedding);
    assert!(info.embedding_chain.is_empty());
    assert!(info.methods.values().all(|m| m.is_direct));
    assert_eq!(info.methods.len(), 2);
}

#[test]
fn test_implementation_across_packages() {
    let (module, index) = indexed_shop();
    let engine = InterfaceEngine::new(&module, &index);
    let wrapper = id(APP, "Wrapper", SymbolKind::Struct);

    let info = engine
        .implementation_info(&store_interface("Reader"), &wrapper)
        .unwrap();
    assert!(info.via_embedding);
    assert_eq!(info.embedding_chain, vec![store_struct("Base")]);
}

// =============================================================================
// ENUMERATION
// =============================================================================

#[test]
fn test_find_implementations_sorted() {
    let (module, index) = indexed_shop();
    let engine = InterfaceEngine::new(&module, &index);

    let found = engine
        .find_implementations(&store_interface("Reader"), &ImplementationFilter::new())
        .unwrap();
    assert_eq!(
        found,
        vec![
            id(APP, "Wrapper", SymbolKind::Struct),
            store_struct("Base"),
            store_struct("Derived"),
            store_struct("File"),
            store_struct("Partial"),
        ]
    );

    let trivial = engine
        .find_implementations(&store_interface("Empty"), &ImplementationFilter::new())
        .unwrap();
    assert_eq!(trivial.len(), index.ids_of_kind(SymbolKind::Struct).count());
}

#[test]
fn test_find_implementations_filtered() {
    let (module, index) = indexed_shop();
    let engine = InterfaceEngine::new(&module, &index);

    let in_store = engine
        .find_implementations(
            &store_interface("ReadWriter"),
            &ImplementationFilter::new().in_packages([STORE]),
        )
        .unwrap();
    assert_eq!(in_store, vec![store_struct("Derived"), store_struct("File")]);

    let in_app = engine
        .find_implementations(
            &store_interface("Reader"),
            &ImplementationFilter::new().in_packages([APP]),
        )
        .unwrap();
    assert_eq!(in_app, vec![id(APP, "Wrapper", SymbolKind::Struct)]);
}

#[test]
fn test_implemented_interfaces() {
    let (module, index) = indexed_shop();
    let engine = InterfaceEngine::new(&module, &index);

    assert_eq!(
        engine.implemented_interfaces(&store_struct("File")).unwrap(),
        vec![
            store_interface("Empty"),
            store_interface("ReadWriter"),
            store_interface("Reader"),
            store_interface("Writer"),
        ]
    );
    assert_eq!(
        engine.implemented_interfaces(&store_struct("Partial")).unwrap(),
        vec![store_interface("Empty"), store_interface("Reader")]
    );
}

// =============================================================================
// SCENARIO: THREE READ/WRITE CANDIDATES
// =============================================================================

fn read_write_file(order: &[&str]) -> SourceFile {
    let mut file = SourceFile::new("rw/rw.go", "rw")
        .with_declaration(interface("ReadWrite", block(1, 4), &[("Read", 2), ("Write", 3)], &[]))
        .with_declaration(interface("Other", block(5, 8), &[("Read", 6), ("Write", 7)], &[]));
    let mut next = 10;
    for name in order {
        let extra = match *name {
            "Disk" => "Sync",
            "Socket" => "Dial",
            "Buffer" => "Reset",
            _ => "Only",
        };
        file = file.with_declaration(structure(name, line(next), vec![]));
        file = file.with_declaration(method(name, "Read", next + 1));
        if *name != "Stream" {
            file = file.with_declaration(method(name, "Write", next + 2));
        }
        file = file.with_declaration(Declaration::method(*name, extra, line(next + 3)));
        next += 4;
    }
    file
}

#[rstest]
#[case(&["Disk", "Socket", "Buffer", "Stream"])]
#[case(&["Stream", "Buffer", "Socket", "Disk"])]
#[case(&["Socket", "Stream", "Disk", "Buffer"])]
fn test_three_candidates_in_any_order(#[case] order: &[&str]) {
    let (module, index) = indexed_single("example.com/rw", read_write_file(order));
    let engine = InterfaceEngine::new(&module, &index);
    let contract = id("example.com/rw", "ReadWrite", SymbolKind::Interface);

    let found = engine
        .find_implementations(&contract, &ImplementationFilter::new())
        .unwrap();
    assert_eq!(
        found,
        vec![
            id("example.com/rw", "Buffer", SymbolKind::Struct),
            id("example.com/rw", "Disk", SymbolKind::Struct),
            id("example.com/rw", "Socket", SymbolKind::Struct),
        ]
    );
}
