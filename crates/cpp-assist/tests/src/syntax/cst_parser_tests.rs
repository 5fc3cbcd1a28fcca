use rowan::TextSize;

use super::*;
use crate::syntax::cst::SyntaxNode;

fn parse(input: &str) -> SyntaxNode {
    SyntaxNode::new_root(Parser::new(input).parse())
}

fn check(
    input: &str,
    expected_tree: &str,
) {
    let actual_tree = format!("{:#?}", parse(input));
    assert_eq!(actual_tree.trim(), expected_tree.trim());
}

fn child_kinds(node: &SyntaxNode) -> Vec<SyntaxKind> {
    node.children().map(|child| child.kind()).collect()
}

fn first_descendant(
    node: &SyntaxNode,
    kind: SyntaxKind,
) -> SyntaxNode {
    node.descendants()
        .find(|node| node.kind() == kind)
        .unwrap_or_else(|| panic!("no {kind:?} in tree"))
}

#[test]
fn empty_input() {
    check("", "Root@0..0");
}

#[test]
fn variable_with_initializer() {
    check(
        "int x = 1;",
        r#"
Root@0..10
  VariableDef@0..10
    TypeRef@0..3
      KwInt@0..3 "int"
    Whitespace@3..4 " "
    Ident@4..5 "x"
    Whitespace@5..6 " "
    Initializer@6..9
      Equal@6..7 "="
      Whitespace@7..8 " "
      Literal@8..9
        Integer@8..9 "1"
    Semicolon@9..10 ";"
"#,
    );
}

#[test]
fn function_with_comparison() {
    check(
        "int main() { return a == 0; }",
        r#"
Root@0..29
  FunctionDef@0..29
    TypeRef@0..3
      KwInt@0..3 "int"
    Whitespace@3..4 " "
    Ident@4..8 "main"
    ParameterList@8..10
      LParen@8..9 "("
      RParen@9..10 ")"
    Whitespace@10..11 " "
    Block@11..29
      LBrace@11..12 "{"
      Whitespace@12..13 " "
      ReturnStmt@13..27
        KwReturn@13..19 "return"
        Whitespace@19..20 " "
        BinaryExpr@20..26
          NameRef@20..21
            Ident@20..21 "a"
          Whitespace@21..22 " "
          EqualEqual@22..24 "=="
          Whitespace@24..25 " "
          Literal@25..26
            Integer@25..26 "0"
        Semicolon@26..27 ";"
      Whitespace@27..28 " "
      RBrace@28..29 "}"
"#,
    );
}

#[test]
fn preprocessor_lines_end_at_newline() {
    let root = parse("#include <vector>\n#define MAX 10\nint x;\n");
    assert_eq!(
        child_kinds(&root),
        vec![SyntaxKind::PreprocInclude, SyntaxKind::PreprocDefine, SyntaxKind::VariableDef]
    );
}

#[test]
fn continued_macro_spans_lines() {
    let root = parse("#define TWICE(x) \\\n  ((x) * 2)\nint y;");
    assert_eq!(child_kinds(&root), vec![SyntaxKind::PreprocDefine, SyntaxKind::VariableDef]);
}

#[test]
fn namespace_with_records() {
    let root = parse("namespace geo { struct Point { int x, y; }; enum class Axis { X, Y }; }");
    assert_eq!(child_kinds(&root), vec![SyntaxKind::NamespaceDef]);

    let items = first_descendant(&root, SyntaxKind::ItemList);
    assert_eq!(child_kinds(&items), vec![SyntaxKind::StructDef, SyntaxKind::EnumDef]);

    let fields = first_descendant(&root, SyntaxKind::FieldList);
    assert_eq!(child_kinds(&fields), vec![SyntaxKind::FieldDef]);
    let enumerators = first_descendant(&root, SyntaxKind::EnumeratorList);
    assert_eq!(
        child_kinds(&enumerators),
        vec![SyntaxKind::Enumerator, SyntaxKind::Enumerator]
    );
}

#[test]
fn class_members_and_access_specifiers() {
    let root = parse("class Widget {\npublic:\n  Widget();\n  ~Widget();\n  int size() const;\nprivate:\n  int size_;\n};");
    let fields = first_descendant(&root, SyntaxKind::FieldList);
    assert_eq!(
        child_kinds(&fields),
        vec![
            SyntaxKind::AccessSpecifier,
            SyntaxKind::FunctionDef,
            SyntaxKind::FunctionDef,
            SyntaxKind::FunctionDef,
            SyntaxKind::AccessSpecifier,
            SyntaxKind::FieldDef,
        ]
    );
}

#[test]
fn out_of_class_constructor() {
    let root = parse("Widget::Widget(int n) : size_(n) {}");
    assert_eq!(child_kinds(&root), vec![SyntaxKind::FunctionDef]);
    let function = root.first_child().unwrap();
    assert_eq!(
        child_kinds(&function),
        vec![SyntaxKind::ParameterList, SyntaxKind::Block]
    );
}

#[test]
fn template_wraps_function() {
    let root = parse("template <typename T> T larger(T a, T b) { return a > b ? a : b; }");
    assert_eq!(child_kinds(&root), vec![SyntaxKind::TemplateDef]);
    let template = root.first_child().unwrap();
    assert_eq!(
        child_kinds(&template),
        vec![SyntaxKind::TemplateParameterList, SyntaxKind::FunctionDef]
    );

    let conditional = first_descendant(&root, SyntaxKind::ConditionalExpr);
    assert_eq!(
        child_kinds(&conditional),
        vec![SyntaxKind::BinaryExpr, SyntaxKind::NameRef, SyntaxKind::NameRef]
    );
}

#[test]
fn nested_template_arguments_close_with_shift_token() {
    let root = parse("std::vector<std::vector<int>> grid;");
    assert_eq!(child_kinds(&root), vec![SyntaxKind::VariableDef]);
    let ty = first_descendant(&root, SyntaxKind::TypeRef);
    assert_eq!(ty.text().to_string(), "std::vector<std::vector<int>>");
}

#[test]
fn local_declarations_and_expressions() {
    let root = parse("void f() { int n = 0; n += 2; g(n); }");
    let block = first_descendant(&root, SyntaxKind::Block);
    assert_eq!(
        child_kinds(&block),
        vec![SyntaxKind::DeclStmt, SyntaxKind::ExprStmt, SyntaxKind::ExprStmt]
    );
    let statements: Vec<_> = block.children().collect();
    assert_eq!(child_kinds(&statements[1]), vec![SyntaxKind::AssignExpr]);
    assert_eq!(child_kinds(&statements[2]), vec![SyntaxKind::CallExpr]);
}

#[test]
fn control_flow_statements() {
    let root = parse(
        "void f(int x) {\n  if (x > 0) return; else x = 1;\n  while (x) --x;\n  for (int i = 0; i < x; ++i) {}\n  switch (x) { case 1: break; default: break; }\n}",
    );
    let block = first_descendant(&root, SyntaxKind::Block);
    assert_eq!(
        child_kinds(&block),
        vec![
            SyntaxKind::IfStmt,
            SyntaxKind::WhileStmt,
            SyntaxKind::ForStmt,
            SyntaxKind::SwitchStmt,
        ]
    );
    let if_stmt = first_descendant(&root, SyntaxKind::IfStmt);
    assert_eq!(
        child_kinds(&if_stmt),
        vec![SyntaxKind::Condition, SyntaxKind::ReturnStmt, SyntaxKind::ElseBranch]
    );
}

#[test]
fn operator_precedence() {
    let root = parse("int v = a + b * c;");
    let sum = first_descendant(&root, SyntaxKind::BinaryExpr);
    assert_eq!(sum.text().to_string(), "a + b * c");
    assert_eq!(child_kinds(&sum), vec![SyntaxKind::NameRef, SyntaxKind::BinaryExpr]);
}

#[test]
fn extern_c_block() {
    let root = parse("extern \"C\" { int puts(const char* s); }");
    assert_eq!(child_kinds(&root), vec![SyntaxKind::LinkageSpec]);
    let list = first_descendant(&root, SyntaxKind::ItemList);
    assert_eq!(child_kinds(&list), vec![SyntaxKind::FunctionDef]);
}

#[test]
fn tree_is_lossless() {
    let inputs = [
        "int main() { return 0; }\n",
        "  // leading comment\nstruct S { int a; };  \n\n",
        "void broken( { if (x } int y = ;",
        "template <class T> class Box { T value; };\n#define X 1\n",
        "@@ ))) }}} ;;;",
    ];
    for input in inputs {
        assert_eq!(parse(input).text().to_string(), input);
    }
}

#[test]
fn trailing_trivia_belongs_to_root() {
    let root = parse("int x;   \n");
    assert_eq!(root.text_range().end(), TextSize::from(10));
    assert_eq!(root.first_child().unwrap().text_range().end(), TextSize::from(6));
}
