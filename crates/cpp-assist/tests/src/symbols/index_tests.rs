use super::*;
use crate::symbols::SymbolKind;
use rowan::{TextRange, TextSize};

fn entry(
    name: &str,
    kind: SymbolKind,
    start: u32,
    container: Option<&str>,
) -> SymbolEntry {
    let range = TextRange::at(TextSize::from(start), TextSize::of(name));
    SymbolEntry {
        name: name.to_string(),
        kind,
        name_range: range,
        full_range: range,
        container: container.map(str::to_string),
        is_declaration: false,
    }
}

fn snapshot() -> SymbolSnapshot {
    let a = Url::parse("file:///src/a.cpp").unwrap();
    let b = Url::parse("file:///src/b.cpp").unwrap();
    SymbolSnapshot::build(
        7,
        vec![
            (
                b.clone(),
                Arc::<[SymbolEntry]>::from(vec![
                    entry("render", SymbolKind::Function, 40, None),
                    entry("Renderer", SymbolKind::Class, 0, None),
                ]),
            ),
            (
                a.clone(),
                Arc::<[SymbolEntry]>::from(vec![
                    entry("render", SymbolKind::Function, 10, Some("gfx")),
                    entry("count", SymbolKind::Variable, 0, None),
                ]),
            ),
        ],
    )
}

#[test]
fn lookup_is_ordered_by_file_then_offset() {
    let snapshot = snapshot();
    let uris: Vec<&str> = snapshot
        .lookup("render")
        .iter()
        .map(|location| location.uri.as_str())
        .collect();
    assert_eq!(uris, vec!["file:///src/a.cpp", "file:///src/b.cpp"]);
    assert_eq!(snapshot.generation(), 7);
}

#[test]
fn lookup_of_unknown_name_is_empty() {
    assert!(snapshot().lookup("missing").is_empty());
}

#[test]
fn lookup_in_filters_by_container() {
    let snapshot = snapshot();
    let global: Vec<_> = snapshot.lookup_in("render", None).collect();
    assert_eq!(global.len(), 1);
    assert_eq!(global[0].uri.as_str(), "file:///src/b.cpp");
    assert_eq!(snapshot.lookup_in("render", Some("gfx")).count(), 1);
}

#[test]
fn search_is_case_insensitive_and_limited() {
    let snapshot = snapshot();
    let names: Vec<&str> = snapshot
        .search("REND", 10)
        .into_iter()
        .map(|(name, _)| name)
        .collect();
    assert_eq!(names, vec!["Renderer", "render", "render"]);
    assert_eq!(snapshot.search("rend", 2).len(), 2);
}

#[test]
fn symbols_in_returns_file_entries() {
    let snapshot = snapshot();
    let a = Url::parse("file:///src/a.cpp").unwrap();
    assert_eq!(snapshot.symbols_in(&a).len(), 2);
    assert_eq!(snapshot.file_count(), 2);
    assert_eq!(snapshot.len(), 4);
    let missing = Url::parse("file:///src/none.cpp").unwrap();
    assert!(snapshot.symbols_in(&missing).is_empty());
}
