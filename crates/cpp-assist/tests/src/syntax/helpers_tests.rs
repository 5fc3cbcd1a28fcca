use super::*;
use crate::syntax::SyntaxTree;

#[test]
fn token_at_offset_prefers_identifiers() {
    let tree = SyntaxTree::parse("int v = a+b;");
    let root = tree.root();
    let token = token_at_offset(&root, TextSize::from(9)).unwrap();
    assert_eq!(token.text(), "a");
    let token = token_at_offset(&root, TextSize::from(10)).unwrap();
    assert_eq!(token.text(), "b");
    assert!(token_at_offset(&root, TextSize::from(40)).is_none());
}

#[test]
fn token_at_offset_prefers_literals_over_whitespace() {
    let tree = SyntaxTree::parse("void f() { return 1; }");
    let token = token_at_offset(&tree.root(), TextSize::from(18)).unwrap();
    assert_eq!(token.kind(), SyntaxKind::Integer);
    assert_eq!(token.parent().unwrap().kind(), SyntaxKind::Literal);
}

#[test]
fn node_text_slices_source() {
    let source = "int x = 1;\nint y;";
    let tree = SyntaxTree::parse(source);
    let texts: Vec<_> = tree
        .root()
        .children()
        .map(|node| node_text(&node, source).trim())
        .collect();
    assert_eq!(texts, vec!["int x = 1;", "int y;"]);
}

#[test]
fn node_text_is_empty_for_foreign_source() {
    let tree = SyntaxTree::parse("int long_name;");
    let node = tree.root().first_child().unwrap();
    assert_eq!(node_text(&node, "int"), "");
}

#[test]
fn text_size_saturates() {
    assert_eq!(text_size(12), TextSize::from(12));
    assert_eq!(text_size(usize::MAX), TextSize::from(u32::MAX));
}
