use super::*;
use crate::symbols::SymbolProvider;
use crate::syntax::kind::SyntaxKind;

fn uri() -> Url {
    Url::parse("file:///work/main.cpp").unwrap()
}

fn context(
    source: &str,
    cursor: u32,
) -> QuickFixContext {
    let editor = EditorState::new(uri(), 1, TextSize::from(cursor)).with_tree(1, SyntaxTree::parse(source));
    let snapshot = editor
        .snapshot(Arc::new(SymbolSnapshot::default()))
        .expect("current parse");
    QuickFixContext::new(snapshot, editor.selection, AssistReason::Explicit)
}

#[test]
fn cursor_on_token_is_half_open() {
    // tokens: `int` `x` `=` `1` `;`
    let source = "int x = 1;";
    assert!(context(source, 4).is_cursor_on_token(1));
    assert!(!context(source, 5).is_cursor_on_token(1));
    assert!(!context(source, 3).is_cursor_on_token(1));
    assert!(context(source, 0).is_cursor_on_token(0));
    assert!(!context(source, 3).is_cursor_on_token(0));
    assert!(!context(source, 4).is_cursor_on_token(42));
}

#[test]
fn cursor_token_skips_whitespace() {
    let source = "int x = 1;";
    assert_eq!(context(source, 5).cursor_token_index(), None);
    let token = context(source, 8).cursor_token().unwrap();
    assert_eq!(token.kind, SyntaxKind::Integer);
}

#[test]
fn token_at_cursor_prefers_names_at_boundaries() {
    let source = "int value = other;";
    let token = context(source, 9).token_at_cursor().unwrap();
    assert_eq!(token.text(), "value");
    let token = context(source, 12).token_at_cursor().unwrap();
    assert_eq!(token.text(), "other");
    let token = context(source, 10).token_at_cursor().unwrap();
    assert_eq!(token.kind(), SyntaxKind::Equal);
}

#[test]
fn cursor_on_syntax_token_and_node() {
    let source = "int value = compute();";
    let ctx = context(source, 13);
    let call = ctx.path().innermost().unwrap().clone();
    let call = call
        .ancestors()
        .find(|node| node.kind() == SyntaxKind::CallExpr)
        .unwrap();
    assert!(ctx.is_cursor_on_node(&call));
    assert_eq!(ctx.text_of(&call), "compute()");

    let name = ctx
        .tree()
        .root()
        .descendants_with_tokens()
        .filter_map(|element| element.into_token())
        .find(|token| token.text() == "value")
        .unwrap();
    assert!(!ctx.is_cursor_on(&name));
    assert!(context(source, 4).is_cursor_on(&name));
}

#[test]
fn node_outside_cursor_is_not_under_cursor() {
    let source = "int a;\nint b;";
    let ctx = context(source, 11);
    let first = ctx.tree().root().first_child().unwrap();
    assert!(!ctx.is_cursor_on_node(&first));
}

#[test]
fn build_context_resolves_path_at_cursor() {
    let editor = EditorState::new(uri(), 3, TextSize::from(8))
        .with_tree(3, SyntaxTree::parse("int x = 1;"))
        .with_selection(TextRange::new(TextSize::from(8), TextSize::from(9)));
    let ctx = editor
        .build_context(Arc::new(SymbolSnapshot::default()), AssistReason::Automatic)
        .unwrap();
    assert_eq!(ctx.path().innermost().map(|node| node.kind()), Some(SyntaxKind::Literal));
    assert_eq!(ctx.reason(), AssistReason::Automatic);
    assert_eq!(ctx.selection(), editor.selection);

    let stale = EditorState::new(uri(), 4, TextSize::from(8)).with_tree(3, SyntaxTree::parse("int x = 1;"));
    assert!(stale.build_context(Arc::new(SymbolSnapshot::default()), AssistReason::Explicit).is_none());
}

#[test]
fn stale_tree_builds_no_snapshot() {
    let editor = EditorState::new(uri(), 2, TextSize::from(0)).with_tree(1, SyntaxTree::parse("int x;"));
    assert!(editor.has_stale_tree());
    assert!(editor.snapshot(Arc::new(SymbolSnapshot::default())).is_none());

    let unparsed = EditorState::new(uri(), 1, TextSize::from(0));
    assert!(!unparsed.has_stale_tree());
    assert!(unparsed.current_tree().is_none());
}

#[test]
fn context_keeps_its_snapshot_after_later_changes() {
    let provider = SymbolProvider::new();
    provider.scan_source(&uri(), "int helper();");

    let editor = EditorState::new(uri(), 1, TextSize::from(0)).with_tree(1, SyntaxTree::parse("int helper();"));
    let snapshot = editor.snapshot(provider.snapshot()).unwrap();
    let ctx = QuickFixContext::new(snapshot, None, AssistReason::Automatic);

    provider.scan_source(&uri(), "int renamed();");
    assert_eq!(ctx.lookup("helper").len(), 1);
    assert!(ctx.lookup("renamed").is_empty());
    assert_eq!(ctx.source(), "int helper();");
    assert_eq!(ctx.reason(), AssistReason::Automatic);
}

#[test]
fn cursor_location_is_one_based() {
    let ctx = context("int a;\nint b;", 11);
    let location = ctx.cursor_location().unwrap();
    assert_eq!(location.line(), 2);
    assert_eq!(location.column(), 5);
    assert_eq!(location.file_path(), "/work/main.cpp");
    assert_eq!(location.to_string(), "/work/main.cpp, line: 2, column: 5, offset: 11");
}

#[test]
fn location_of_maps_offsets_in_the_snapshot() {
    let ctx = context("int a;\nint b;", 0);
    let location = ctx.location_of(TextSize::from(8)).unwrap();
    assert_eq!((location.line(), location.column()), (2, 2));
    assert_eq!(location.offset(), TextSize::from(8));
    assert_eq!(location.file_path(), "/work/main.cpp");
    assert!(ctx.location_of(TextSize::from(40)).is_none());
}

#[test]
fn selection_is_carried_through() {
    let source = "int a = 1 + 2;";
    let selection = TextRange::new(TextSize::from(8), TextSize::from(13));
    let editor = EditorState::new(uri(), 3, TextSize::from(8))
        .with_tree(3, SyntaxTree::parse(source))
        .with_selection(selection);
    let snapshot = editor.snapshot(Arc::new(SymbolSnapshot::default())).unwrap();
    let ctx = QuickFixContext::new(snapshot, editor.selection, AssistReason::Explicit);
    assert_eq!(ctx.selection(), Some(selection));
    assert_eq!(ctx.text_in(selection), "1 + 2");
    assert_eq!(ctx.snapshot().version(), 3);
}
