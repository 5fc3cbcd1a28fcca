use super::*;

fn url(path: &str) -> Url {
    Url::parse(&format!("file:///work/{path}")).unwrap()
}

#[test]
fn token_table_holds_significant_tokens_only() {
    let tree = SyntaxTree::parse("int /* n */ x;\n");
    let kinds: Vec<_> = tree.tokens().iter().map(|token| token.kind).collect();
    assert_eq!(kinds, vec![SyntaxKind::KwInt, SyntaxKind::Ident, SyntaxKind::Semicolon]);
    assert_eq!(
        tree.token(1).map(|token| token.range),
        Some(TextRange::new(TextSize::from(12), TextSize::from(13)))
    );
    assert!(tree.token(3).is_none());
}

#[test]
fn token_index_at_uses_half_open_ranges() {
    let tree = SyntaxTree::parse("int x;");
    assert_eq!(tree.token_index_at(TextSize::from(0)), Some(0));
    assert_eq!(tree.token_index_at(TextSize::from(3)), None);
    assert_eq!(tree.token_index_at(TextSize::from(4)), Some(1));
    assert_eq!(tree.token_index_at(TextSize::from(5)), Some(2));
    assert_eq!(tree.token_index_at(TextSize::from(6)), None);
}

#[test]
fn significant_range_excludes_surrounding_trivia() {
    let tree = SyntaxTree::parse("\n  int x;  // done\n");
    assert_eq!(
        tree.significant_range(),
        Some(TextRange::new(TextSize::from(3), TextSize::from(9)))
    );
    assert_eq!(tree.text_len(), TextSize::from(19));
    assert!(SyntaxTree::parse("   ").significant_range().is_none());
}

#[test]
fn error_tokens_are_reported() {
    assert!(!SyntaxTree::parse("int x;").has_errors());
    assert!(SyntaxTree::parse("int @x;").has_errors());
}

#[test]
fn clones_share_the_source() {
    let tree = SyntaxTree::parse("int x;");
    let copy = tree.clone();
    assert_eq!(copy.source(), "int x;");
    assert_eq!(copy.root().text_range(), tree.root().text_range());
}

#[test]
fn document_trees_track_versions() {
    let trees = DocumentTrees::new();
    let uri = url("a.cpp");
    assert!(trees.get(&uri).is_none());

    trees.parse_and_store(&uri, 1, "int a;");
    assert_eq!(trees.version(&uri), Some(1));
    assert!(trees.get_for_version(&uri, 1).is_some());
    assert!(trees.get_for_version(&uri, 2).is_none());

    trees.insert(uri.clone(), 2, SyntaxTree::parse("int b;"));
    let (version, tree) = trees.get_versioned(&uri).unwrap();
    assert_eq!(version, 2);
    assert_eq!(tree.source(), "int b;");

    trees.remove(&uri);
    assert!(trees.get_versioned(&uri).is_none());
}
