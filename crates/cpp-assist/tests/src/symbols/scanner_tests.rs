use super::*;
use crate::syntax::SyntaxTree;

fn scan(source: &str) -> Vec<SymbolEntry> {
    build_symbols(&SyntaxTree::parse(source).root())
}

fn summary(symbols: &[SymbolEntry]) -> Vec<(String, SymbolKind)> {
    symbols
        .iter()
        .map(|symbol| (symbol.qualified_name(), symbol.kind))
        .collect()
}

#[test]
fn functions_and_globals() {
    let symbols = scan("int counter = 0;\nint add(int a, int b) { int local = a; return local + b; }\nvoid decl();\n");
    assert_eq!(
        summary(&symbols),
        vec![
            ("counter".to_string(), SymbolKind::Variable),
            ("add".to_string(), SymbolKind::Function),
            ("decl".to_string(), SymbolKind::Function),
        ]
    );
    assert!(!symbols[1].is_declaration);
    assert!(symbols[2].is_declaration);
}

#[test]
fn locals_and_parameters_are_not_indexed() {
    let symbols = scan("void f(int param) { int local = param; }");
    assert!(symbols.iter().all(|symbol| symbol.name != "local" && symbol.name != "param"));
}

#[test]
fn name_range_covers_identifier() {
    let source = "struct Point { int x; };";
    let symbols = scan(source);
    let point = &symbols[0];
    assert_eq!(&source[point.name_range], "Point");
    assert_eq!(&source[point.full_range], source);
}

#[test]
fn record_members_use_record_as_container() {
    let symbols = scan("struct Point {\n  int x, y;\n  int length() const;\n};\n");
    assert_eq!(
        summary(&symbols),
        vec![
            ("Point".to_string(), SymbolKind::Struct),
            ("Point::x".to_string(), SymbolKind::Field),
            ("Point::y".to_string(), SymbolKind::Field),
            ("Point::length".to_string(), SymbolKind::Function),
        ]
    );
}

#[test]
fn class_and_union_kinds() {
    let symbols = scan("class Widget { public: Widget(); };\nunion Bits { int i; float f; };\n");
    let kinds: Vec<_> = symbols.iter().map(|symbol| (symbol.name.as_str(), symbol.kind)).collect();
    assert!(kinds.contains(&("Widget", SymbolKind::Class)));
    assert!(kinds.contains(&("Bits", SymbolKind::Union)));
}

#[test]
fn forward_declared_record_is_a_declaration() {
    let symbols = scan("struct Later;\n");
    assert_eq!(symbols.len(), 1);
    assert!(symbols[0].is_declaration);
}

#[test]
fn namespaces_nest_containers() {
    let symbols = scan("namespace outer { namespace inner { int value; } void run(); }");
    assert_eq!(
        summary(&symbols),
        vec![
            ("outer".to_string(), SymbolKind::Namespace),
            ("outer::inner".to_string(), SymbolKind::Namespace),
            ("outer::inner::value".to_string(), SymbolKind::Variable),
            ("outer::run".to_string(), SymbolKind::Function),
        ]
    );
}

#[test]
fn out_of_class_method_takes_qualifier_as_container() {
    let symbols = scan("int Point::length() const { return 0; }");
    assert_eq!(symbols.len(), 1);
    assert_eq!(symbols[0].name, "length");
    assert_eq!(symbols[0].container.as_deref(), Some("Point"));
}

#[test]
fn unscoped_enumerators_live_beside_the_enum() {
    let symbols = scan("enum Color { Red, Green };\nenum class Mode { Fast };\n");
    assert_eq!(
        summary(&symbols),
        vec![
            ("Color".to_string(), SymbolKind::Enum),
            ("Red".to_string(), SymbolKind::Enumerator),
            ("Green".to_string(), SymbolKind::Enumerator),
            ("Mode".to_string(), SymbolKind::Enum),
            ("Mode::Fast".to_string(), SymbolKind::Enumerator),
        ]
    );
}

#[test]
fn typedefs_aliases_and_macros() {
    let symbols = scan("#define LIMIT 10\ntypedef unsigned int uint;\nusing Id = long;\nusing namespace std;\n");
    assert_eq!(
        summary(&symbols),
        vec![
            ("LIMIT".to_string(), SymbolKind::Macro),
            ("uint".to_string(), SymbolKind::Typedef),
            ("Id".to_string(), SymbolKind::Typedef),
        ]
    );
}

#[test]
fn typedef_of_anonymous_struct_names_the_alias_only() {
    let symbols = scan("typedef struct { int x; } Vec1;");
    assert_eq!(
        summary(&symbols),
        vec![("Vec1".to_string(), SymbolKind::Typedef)]
    );
}

#[test]
fn template_and_linkage_wrappers_are_transparent() {
    let symbols = scan("template <typename T> T identity(T value) { return value; }\nextern \"C\" { void c_entry(); }\n");
    assert_eq!(
        summary(&symbols),
        vec![
            ("identity".to_string(), SymbolKind::Function),
            ("c_entry".to_string(), SymbolKind::Function),
        ]
    );
}
