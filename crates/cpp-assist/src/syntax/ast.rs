use crate::syntax::cst::{SyntaxNode, SyntaxToken};
use crate::syntax::kind::SyntaxKind;

/// Typed view over an untyped [`SyntaxNode`] of one specific kind.
pub trait AstNode: Sized {
    fn can_cast(kind: SyntaxKind) -> bool;
    fn cast(syntax: SyntaxNode) -> Option<Self>;
    fn syntax(&self) -> &SyntaxNode;
}

macro_rules! ast_node {
    ($($name:ident),* $(,)?) => {
        $(
            #[derive(Debug, Clone, PartialEq, Eq, Hash)]
            pub struct $name {
                syntax: SyntaxNode,
            }

            impl AstNode for $name {
                fn can_cast(kind: SyntaxKind) -> bool {
                    kind == SyntaxKind::$name
                }

                fn cast(syntax: SyntaxNode) -> Option<Self> {
                    if Self::can_cast(syntax.kind()) {
                        Some(Self { syntax })
                    } else {
                        None
                    }
                }

                fn syntax(&self) -> &SyntaxNode {
                    &self.syntax
                }
            }
        )*
    };
}

ast_node!(
    Root,
    PreprocInclude,
    PreprocDefine,
    NamespaceDef,
    StructDef,
    ClassDef,
    EnumDef,
    Enumerator,
    FunctionDef,
    ParameterList,
    Parameter,
    VariableDef,
    FieldDef,
    DeclStmt,
    Initializer,
    TypeRef,
    Block,
    ReturnStmt,
    IfStmt,
    Condition,
    CallExpr,
    ArgList,
    BinaryExpr,
    AssignExpr,
    MemberExpr,
    NameRef,
    Literal,
);

fn direct_tokens(syntax: &SyntaxNode) -> impl Iterator<Item = SyntaxToken> {
    syntax
        .children_with_tokens()
        .filter_map(|element| element.into_token())
}

fn first_token_of(
    syntax: &SyntaxNode,
    kind: SyntaxKind,
) -> Option<SyntaxToken> {
    direct_tokens(syntax).find(|token| token.kind() == kind)
}

/// The last identifier directly under `syntax` that precedes `stop` (or the end).
fn declarator_name(
    syntax: &SyntaxNode,
    stop: SyntaxKind,
) -> Option<SyntaxToken> {
    let mut name = None;
    for element in syntax.children_with_tokens() {
        if element.kind() == stop {
            break;
        }
        if let Some(token) = element.into_token()
            && token.kind() == SyntaxKind::Ident
        {
            name = Some(token);
        }
    }
    name
}

impl Root {
    pub fn items(&self) -> impl Iterator<Item = SyntaxNode> {
        self.syntax.children()
    }

    pub fn functions(&self) -> impl Iterator<Item = FunctionDef> {
        self.syntax.children().filter_map(FunctionDef::cast)
    }

    pub fn includes(&self) -> impl Iterator<Item = PreprocInclude> {
        self.syntax.children().filter_map(PreprocInclude::cast)
    }
}

impl PreprocInclude {
    /// The header spelling including its delimiters: `<vector>` or `"foo.h"`.
    pub fn target(&self) -> Option<String> {
        let mut tokens = direct_tokens(&self.syntax)
            .skip_while(|token| token.text() != "include")
            .skip(1)
            .filter(|token| !token.kind().is_trivia());
        let first = tokens.next()?;
        if first.kind() == SyntaxKind::String {
            return Some(first.text().to_string());
        }
        if first.kind() != SyntaxKind::Less {
            return None;
        }
        let mut target = String::from("<");
        for token in tokens {
            target.push_str(token.text());
            if token.kind() == SyntaxKind::Greater {
                return Some(target);
            }
        }
        None
    }
}

impl PreprocDefine {
    pub fn name_token(&self) -> Option<SyntaxToken> {
        direct_tokens(&self.syntax)
            .filter(|token| token.kind() == SyntaxKind::Ident)
            .nth(1)
    }
}

impl NamespaceDef {
    pub fn name_token(&self) -> Option<SyntaxToken> {
        first_token_of(&self.syntax, SyntaxKind::Ident)
    }

    pub fn items(&self) -> impl Iterator<Item = SyntaxNode> {
        self.syntax
            .children()
            .filter(|child| child.kind() == SyntaxKind::ItemList)
            .flat_map(|list| list.children())
    }
}

impl StructDef {
    pub fn name_token(&self) -> Option<SyntaxToken> {
        first_token_of(&self.syntax, SyntaxKind::Ident)
    }

    pub fn is_union(&self) -> bool {
        first_token_of(&self.syntax, SyntaxKind::KwUnion).is_some()
    }

    pub fn fields(&self) -> impl Iterator<Item = FieldDef> {
        record_members(&self.syntax).filter_map(FieldDef::cast)
    }

    pub fn methods(&self) -> impl Iterator<Item = FunctionDef> {
        record_members(&self.syntax).filter_map(FunctionDef::cast)
    }
}

impl ClassDef {
    pub fn name_token(&self) -> Option<SyntaxToken> {
        first_token_of(&self.syntax, SyntaxKind::Ident)
    }

    pub fn fields(&self) -> impl Iterator<Item = FieldDef> {
        record_members(&self.syntax).filter_map(FieldDef::cast)
    }

    pub fn methods(&self) -> impl Iterator<Item = FunctionDef> {
        record_members(&self.syntax).filter_map(FunctionDef::cast)
    }
}

fn record_members(syntax: &SyntaxNode) -> impl Iterator<Item = SyntaxNode> {
    syntax
        .children()
        .filter(|child| child.kind() == SyntaxKind::FieldList)
        .flat_map(|list| list.children())
}

impl EnumDef {
    pub fn name_token(&self) -> Option<SyntaxToken> {
        first_token_of(&self.syntax, SyntaxKind::Ident)
    }

    pub fn is_scoped(&self) -> bool {
        direct_tokens(&self.syntax)
            .any(|token| matches!(token.kind(), SyntaxKind::KwClass | SyntaxKind::KwStruct))
    }

    pub fn enumerators(&self) -> impl Iterator<Item = Enumerator> {
        self.syntax
            .children()
            .filter(|child| child.kind() == SyntaxKind::EnumeratorList)
            .flat_map(|list| list.children())
            .filter_map(Enumerator::cast)
    }
}

impl Enumerator {
    pub fn name_token(&self) -> Option<SyntaxToken> {
        first_token_of(&self.syntax, SyntaxKind::Ident)
    }
}

impl FunctionDef {
    /// The unqualified function name (`bar` in `Foo::bar`).
    pub fn name_token(&self) -> Option<SyntaxToken> {
        declarator_name(&self.syntax, SyntaxKind::ParameterList)
    }

    /// The qualifier before the name, if any (`Foo` in `void Foo::bar()`).
    pub fn qualifier(&self) -> Option<String> {
        let mut segments: Vec<String> = Vec::new();
        for element in self.syntax.children_with_tokens() {
            match element.kind() {
                SyntaxKind::ParameterList => break,
                SyntaxKind::Ident => {
                    if let Some(token) = element.into_token() {
                        segments.push(token.text().to_string());
                    }
                },
                _ => {},
            }
        }
        segments.pop()?;
        (!segments.is_empty()).then(|| segments.join("::"))
    }

    pub fn return_type(&self) -> Option<TypeRef> {
        self.syntax.children().find_map(TypeRef::cast)
    }

    pub fn parameter_list(&self) -> Option<ParameterList> {
        self.syntax.children().find_map(ParameterList::cast)
    }

    pub fn body(&self) -> Option<Block> {
        self.syntax.children().find_map(Block::cast)
    }

    pub fn is_declaration_only(&self) -> bool {
        self.body().is_none()
    }
}

impl ParameterList {
    pub fn parameters(&self) -> impl Iterator<Item = Parameter> {
        self.syntax.children().filter_map(Parameter::cast)
    }
}

impl Parameter {
    pub fn name_token(&self) -> Option<SyntaxToken> {
        first_token_of(&self.syntax, SyntaxKind::Ident)
    }

    pub fn ty(&self) -> Option<TypeRef> {
        self.syntax.children().find_map(TypeRef::cast)
    }

    pub fn default_value(&self) -> Option<Initializer> {
        self.syntax.children().find_map(Initializer::cast)
    }
}

impl VariableDef {
    pub fn ty(&self) -> Option<TypeRef> {
        self.syntax.children().find_map(TypeRef::cast)
    }

    /// Declarator names in source order (`a`, `b` for `int a, b;`).
    pub fn names(&self) -> impl Iterator<Item = SyntaxToken> {
        declared_names(&self.syntax)
    }
}

impl FieldDef {
    pub fn ty(&self) -> Option<TypeRef> {
        self.syntax.children().find_map(TypeRef::cast)
    }

    pub fn names(&self) -> impl Iterator<Item = SyntaxToken> {
        declared_names(&self.syntax)
    }
}

impl DeclStmt {
    pub fn ty(&self) -> Option<TypeRef> {
        self.syntax.children().find_map(TypeRef::cast)
    }

    pub fn names(&self) -> impl Iterator<Item = SyntaxToken> {
        declared_names(&self.syntax)
    }

    pub fn initializers(&self) -> impl Iterator<Item = Initializer> {
        self.syntax.children().filter_map(Initializer::cast)
    }
}

fn declared_names(syntax: &SyntaxNode) -> impl Iterator<Item = SyntaxToken> {
    direct_tokens(syntax).filter(|token| token.kind() == SyntaxKind::Ident)
}

impl Initializer {
    /// The initializing expression or braced list.
    pub fn value(&self) -> Option<SyntaxNode> {
        self.syntax.children().next()
    }
}

impl TypeRef {
    /// Source text with insignificant whitespace collapsed.
    pub fn spelling(&self) -> String {
        self.syntax
            .descendants_with_tokens()
            .filter_map(|element| element.into_token())
            .filter(|token| !token.kind().is_trivia())
            .map(|token| token.text().to_string())
            .collect::<Vec<_>>()
            .join(" ")
    }

    pub fn is_pointer(&self) -> bool {
        direct_tokens(&self.syntax).any(|token| token.kind() == SyntaxKind::Star)
    }

    pub fn is_reference(&self) -> bool {
        direct_tokens(&self.syntax)
            .any(|token| matches!(token.kind(), SyntaxKind::Amp | SyntaxKind::AndAnd))
    }
}

impl Block {
    pub fn statements(&self) -> impl Iterator<Item = SyntaxNode> {
        self.syntax
            .children()
            .filter(|child| child.kind().is_statement() || child.kind() == SyntaxKind::UsingDef)
    }
}

impl ReturnStmt {
    pub fn expr(&self) -> Option<SyntaxNode> {
        self.syntax
            .children()
            .find(|child| child.kind().is_expression())
    }
}

impl IfStmt {
    pub fn condition(&self) -> Option<Condition> {
        self.syntax.children().find_map(Condition::cast)
    }

    pub fn then_branch(&self) -> Option<SyntaxNode> {
        self.syntax
            .children()
            .find(|child| child.kind().is_statement())
    }

    pub fn else_branch(&self) -> Option<SyntaxNode> {
        self.syntax
            .children()
            .find(|child| child.kind() == SyntaxKind::ElseBranch)
            .and_then(|branch| branch.children().next())
    }
}

impl Condition {
    pub fn expr(&self) -> Option<SyntaxNode> {
        self.syntax.children().next()
    }
}

impl CallExpr {
    pub fn callee(&self) -> Option<SyntaxNode> {
        self.syntax.children().next()
    }

    pub fn arg_list(&self) -> Option<ArgList> {
        self.syntax.children().find_map(ArgList::cast)
    }
}

impl ArgList {
    pub fn args(&self) -> impl Iterator<Item = SyntaxNode> {
        self.syntax.children()
    }
}

impl BinaryExpr {
    pub fn lhs(&self) -> Option<SyntaxNode> {
        self.syntax.children().next()
    }

    pub fn rhs(&self) -> Option<SyntaxNode> {
        self.syntax.children().nth(1)
    }

    pub fn op_token(&self) -> Option<SyntaxToken> {
        direct_tokens(&self.syntax).find(|token| !token.kind().is_trivia())
    }
}

impl AssignExpr {
    pub fn target(&self) -> Option<SyntaxNode> {
        self.syntax.children().next()
    }

    pub fn value(&self) -> Option<SyntaxNode> {
        self.syntax.children().nth(1)
    }

    pub fn op_token(&self) -> Option<SyntaxToken> {
        direct_tokens(&self.syntax).find(|token| !token.kind().is_trivia())
    }
}

impl MemberExpr {
    pub fn base(&self) -> Option<SyntaxNode> {
        self.syntax.children().next()
    }

    pub fn is_arrow(&self) -> bool {
        first_token_of(&self.syntax, SyntaxKind::Arrow).is_some()
    }

    pub fn member_token(&self) -> Option<SyntaxToken> {
        first_token_of(&self.syntax, SyntaxKind::Ident)
    }
}

impl NameRef {
    /// Last path segment: `size` for `std::vector<int>::size`.
    pub fn ident_token(&self) -> Option<SyntaxToken> {
        direct_tokens(&self.syntax)
            .filter(|token| token.kind() == SyntaxKind::Ident)
            .last()
    }

    pub fn is_qualified(&self) -> bool {
        first_token_of(&self.syntax, SyntaxKind::DoubleColon).is_some()
    }
}

impl Literal {
    pub fn token(&self) -> Option<SyntaxToken> {
        direct_tokens(&self.syntax).find(|token| !token.kind().is_trivia())
    }
}

#[cfg(test)]
#[path = "../../tests/src/syntax/ast_tests.rs"]
mod tests;
