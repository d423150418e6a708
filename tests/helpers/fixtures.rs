//! Common module fixtures for tests.
//!
//! The "shop" module has two packages:
//!
//! - `store`: `Reader`, `Writer`, `ReadWriter` (embeds both), `Base` (Read),
//!   `Derived` (embeds `Base`, adds Write), `File` (Read/Write/Close),
//!   `Partial` (Read), `Ring`/`Link` (embed each other), `Empty`,
//!   `Counter`, `helper`.
//! - `app`: imports `store`; `Main` reads, writes and calls into `store`,
//!   `Wrapper` embeds `store.Base`, `Default` is typed `store.Reader`.

use gograph::builder::{BuildReport, GraphBuilder};
use gograph::graph::{Module, SymbolId, SymbolKind};
use gograph::index::SymbolIndex;
use gograph::syntax::{
    Declaration, FieldDecl, FuncType, ImportDecl, InterfaceMember, LoadedPackage, SourceFile,
    TypeExpr, UseSite, UseTarget,
};
use gograph::{GraphConfig, Span};

pub const STORE: &str = "example.com/shop/store";
pub const APP: &str = "example.com/shop/app";
pub const STORE_FILE: &str = "store/store.go";
pub const APP_FILE: &str = "app/main.go";

/// A one-line span.
pub fn line(n: usize) -> Span {
    Span::from_coords(n, 0, n, 40)
}

/// A multi-line span.
pub fn block(start: usize, end: usize) -> Span {
    Span::from_coords(start, 0, end, 1)
}

pub fn id(package: &str, local_path: &str, kind: SymbolKind) -> SymbolId {
    SymbolId::compose(package, local_path, kind)
}

pub fn interface(name: &str, span: Span, methods: &[(&str, usize)], embeds: &[(&str, usize)]) -> Declaration {
    let mut members: Vec<InterfaceMember> = embeds
        .iter()
        .map(|(name, l)| InterfaceMember::embedded(TypeExpr::named(*name), line(*l)))
        .collect();
    members.extend(
        methods
            .iter()
            .map(|(name, l)| InterfaceMember::method(*name, FuncType::empty(), line(*l))),
    );
    Declaration::type_decl(name, span, TypeExpr::Interface(members))
}

pub fn structure(name: &str, span: Span, fields: Vec<FieldDecl>) -> Declaration {
    Declaration::type_decl(name, span, TypeExpr::Struct(fields))
}

pub fn method(receiver: &str, name: &str, l: usize) -> Declaration {
    Declaration::method(receiver, name, line(l))
}

/// Contents of `store/store.go`, without the declarations listed in `omit`.
pub fn store_file_without(omit: &[&str]) -> SourceFile {
    let declarations = vec![
        interface("Reader", block(1, 3), &[("Read", 2)], &[]),
        interface("Writer", block(4, 6), &[("Write", 5)], &[]),
        interface("ReadWriter", block(7, 10), &[], &[("Reader", 8), ("Writer", 9)]),
        structure(
            "Base",
            block(11, 13),
            vec![FieldDecl::named("ID", TypeExpr::named("int"), line(12))],
        ),
        method("*Base", "Read", 14),
        structure(
            "Derived",
            block(15, 18),
            vec![
                FieldDecl::embedded(TypeExpr::named("Base"), line(16)),
                FieldDecl::named("Name", TypeExpr::named("string"), line(17)),
            ],
        ),
        method("*Derived", "Write", 19),
        structure("File", line(20), vec![]),
        method("*File", "Read", 21),
        method("*File", "Write", 22),
        method("*File", "Close", 23),
        structure("Partial", line(24), vec![]),
        method("Partial", "Read", 25),
        structure(
            "Ring",
            block(26, 28),
            vec![FieldDecl::embedded(TypeExpr::named("Link"), line(27))],
        ),
        method("*Ring", "Spin", 29),
        structure(
            "Link",
            block(30, 32),
            vec![FieldDecl::embedded(TypeExpr::named("Ring"), line(31))],
        ),
        interface("Empty", line(33), &[], &[]),
        Declaration::variable("Counter", line(34)).with_type(TypeExpr::named("int")),
        Declaration::function("helper", line(35)),
    ];

    declarations
        .into_iter()
        .filter(|d| !omit.contains(&d.name.as_str()))
        .fold(SourceFile::new(STORE_FILE, "store"), |file, decl| file.with_declaration(decl))
}

pub fn store_file() -> SourceFile {
    store_file_without(&[])
}

/// Contents of `app/main.go`. `with_write` controls the write to `Counter`.
pub fn app_file_with(with_write: bool) -> SourceFile {
    let mut file = SourceFile::new(APP_FILE, "main")
        .with_import(ImportDecl::new(STORE, line(2)))
        .with_declaration(Declaration::function("Main", block(4, 12)))
        .with_declaration(structure(
            "Wrapper",
            block(14, 16),
            vec![FieldDecl::embedded(TypeExpr::qualified("store", "Base"), line(15))],
        ))
        .with_declaration(
            Declaration::variable("Default", line(18)).with_type(TypeExpr::qualified("store", "Reader")),
        )
        .with_use(
            UseSite::read(UseTarget::local("Counter").in_package(STORE), Span::from_coords(5, 1, 5, 14))
                .within("Main"),
        )
        .with_use(
            UseSite::read(
                UseTarget::member("Base", "Read").in_package(STORE),
                Span::from_coords(7, 1, 7, 20),
            )
            .within("Main"),
        )
        .with_use(
            UseSite::read(UseTarget::local("Println").in_package("fmt"), Span::from_coords(8, 1, 8, 12))
                .within("Main"),
        );
    if with_write {
        file = file.with_use(
            UseSite::write(UseTarget::local("Counter").in_package(STORE), Span::from_coords(6, 1, 6, 14))
                .within("Main"),
        );
    }
    file
}

pub fn app_file() -> SourceFile {
    app_file_with(true)
}

pub fn shop_packages() -> Vec<LoadedPackage> {
    vec![
        LoadedPackage::new(STORE, "store").with_file(store_file()),
        LoadedPackage::new(APP, "main").with_file(app_file()),
    ]
}

/// Build the shop module.
pub fn build_shop() -> (Module, BuildReport) {
    let mut module = Module::new("/src/shop").with_path("example.com/shop");
    let report = GraphBuilder::new(GraphConfig::default())
        .build(&mut module, shop_packages())
        .expect("shop module builds");
    (module, report)
}

/// Build the shop module and index it.
pub fn indexed_shop() -> (Module, SymbolIndex) {
    let (module, _) = build_shop();
    let index = SymbolIndex::build(&module);
    (module, index)
}

/// Build and index a single-package module from one file.
pub fn indexed_single(import_path: &str, file: SourceFile) -> (Module, SymbolIndex) {
    let name = import_path.rsplit('/').next().unwrap_or(import_path).to_string();
    let mut module = Module::new("/src");
    GraphBuilder::new(GraphConfig::default())
        .build(&mut module, vec![LoadedPackage::new(import_path, name).with_file(file)])
        .expect("module builds");
    let index = SymbolIndex::build(&module);
    (module, index)
}
