use expect_test::expect;

use super::*;
use crate::syntax::ast::{BinaryExpr, FunctionDef};

/// A single function spanning the whole 100-byte document.
fn padded_main() -> String {
    let mut source = String::from("int main() { return 40 + 2; ");
    while source.len() < 99 {
        source.push(' ');
    }
    source.push('}');
    source
}

fn path_at(
    source: &str,
    offset: u32,
) -> AstPath {
    resolve(&SyntaxTree::parse(source), TextSize::from(offset))
}

#[test]
fn offset_inside_function_body() {
    let source = padded_main();
    assert_eq!(source.len(), 100);

    let path = path_at(&source, 50);
    assert_eq!(
        path.kinds(),
        vec![SyntaxKind::Root, SyntaxKind::FunctionDef, SyntaxKind::Block]
    );
    let function = path.depth_of(SyntaxKind::FunctionDef).unwrap();
    assert!(function < path.len() - 1);
    assert_eq!(path.offset(), TextSize::from(50));
}

#[test]
fn offset_past_end_gives_empty_path() {
    let source = padded_main();
    assert!(path_at(&source, 150).is_empty());
    assert!(path_at(&source, 100).is_empty());
}

#[test]
fn leading_and_trailing_whitespace_are_outside_the_root() {
    let source = "  \nint x;\n\n";
    assert!(path_at(source, 0).is_empty());
    assert!(path_at(source, 9).is_empty());
    assert_eq!(path_at(source, 3).kinds()[0], SyntaxKind::Root);
}

#[test]
fn empty_document_has_no_path() {
    assert!(path_at("", 0).is_empty());
    assert!(path_at("// only a comment\n", 4).is_empty());
}

#[test]
fn whitespace_between_items_stops_at_root() {
    let source = "int a;\n\nint b;";
    let path = path_at(source, 7);
    assert_eq!(path.kinds(), vec![SyntaxKind::Root]);
}

#[test]
fn descends_into_nested_expressions() {
    let source = "int f(int a, int b, int c) { return a + b * c; }";
    let offset = source.find("c;").unwrap() as u32;
    let path = path_at(source, offset);
    assert_eq!(
        path.kinds(),
        vec![
            SyntaxKind::Root,
            SyntaxKind::FunctionDef,
            SyntaxKind::Block,
            SyntaxKind::ReturnStmt,
            SyntaxKind::BinaryExpr,
            SyntaxKind::BinaryExpr,
            SyntaxKind::NameRef,
        ]
    );
    let product = path.find_innermost::<BinaryExpr>().unwrap();
    assert_eq!(product.syntax().text().to_string(), "b * c");
    let sum = path.find_outermost::<BinaryExpr>().unwrap();
    assert_eq!(sum.syntax().text().to_string(), "a + b * c");
}

#[test]
fn every_node_contains_the_offset_and_nests_in_its_parent() {
    let source = "namespace n {\nstruct S { int v; };\nint g(S s) {\n  if (s.v > 0) { return s.v; }\n  return -1;\n}\n}\n";
    let tree = SyntaxTree::parse(source);
    for offset in 0..source.len() as u32 {
        let offset = TextSize::from(offset);
        let path = resolve(&tree, offset);
        for node in &path {
            assert!(node.text_range().contains(offset), "{node:?} misses {offset:?}");
        }
        for pair in path.nodes().windows(2) {
            assert!(pair[0].text_range().contains_range(pair[1].text_range()));
            assert_eq!(pair[1].parent().as_ref(), Some(&pair[0]));
        }
    }
}

#[test]
fn resolution_is_deterministic() {
    let source = padded_main();
    let tree = SyntaxTree::parse(&source);
    let first = resolve(&tree, TextSize::from(20));
    let second = resolve(&tree, TextSize::from(20));
    assert_eq!(first, second);
    assert_eq!(first.innermost_range(), second.innermost_range());
}

#[test]
fn typed_lookup_on_path() {
    let source = "void run() { launch(1, 2); }";
    let offset = source.find('1').unwrap() as u32;
    let path = path_at(source, offset);
    assert!(path.contains_kind(SyntaxKind::CallExpr));
    assert!(path.contains_kind(SyntaxKind::ArgList));
    let function = path.find_innermost::<FunctionDef>().unwrap();
    assert_eq!(function.name_token().unwrap().text(), "run");
    assert_eq!(path.innermost().map(|node| node.kind()), Some(SyntaxKind::Literal));
    assert_eq!(path.outermost().map(|node| node.kind()), Some(SyntaxKind::Root));
}

#[test]
fn path_to_comparison_operator() {
    let source = "int main() { return a == 0; }";
    let path = path_at(source, 22);
    let rendered: Vec<String> = path
        .iter()
        .map(|node| format!("{:?}@{:?}", node.kind(), node.text_range()))
        .collect();
    expect![[r#"
        Root@0..29
        FunctionDef@0..29
        Block@11..29
        ReturnStmt@13..27
        BinaryExpr@20..26"#]]
    .assert_eq(&rendered.join("\n"));
}
