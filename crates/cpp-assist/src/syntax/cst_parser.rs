use rowan::{Checkpoint, GreenNode, GreenNodeBuilder};

use crate::syntax::{kind::SyntaxKind, lexer::Lexer};

/// Where a declaration appears; decides the node kind a non-function declaration gets.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum DeclContext {
    Item,
    Member,
    Local,
}

const PREFIX_BP: u8 = 25;
const CONDITIONAL_BP: u8 = 4;

/// Error-tolerant C/C++ parser producing a lossless rowan tree.
///
/// Trivia is emitted lazily: it is flushed right before the next significant token or the next
/// node start, so every composite node begins and ends on a significant token and whitespace
/// between constructs belongs to their parent.
pub struct Parser<'a> {
    tokens: Vec<(SyntaxKind, &'a str)>,
    pos: usize,
    builder: GreenNodeBuilder<'static>,
}

impl<'a> Parser<'a> {
    pub fn new(input: &'a str) -> Self {
        let tokens: Vec<_> = Lexer::new(input).collect();
        Self {
            tokens,
            pos: 0,
            builder: GreenNodeBuilder::new(),
        }
    }

    pub fn parse(mut self) -> GreenNode {
        self.builder.start_node(SyntaxKind::Root.into());
        self.parse_items(false);
        self.eat_trivia();
        self.builder.finish_node();
        self.builder.finish()
    }

    // ── items ──────────────────────────────────────────────────────────

    fn parse_items(
        &mut self,
        braced: bool,
    ) {
        loop {
            match self.current() {
                SyntaxKind::Eof => break,
                SyntaxKind::RBrace if braced => break,
                _ => {},
            }
            let before = self.pos;
            self.parse_item();
            if self.pos == before {
                self.bump();
            }
        }
    }

    fn parse_item(&mut self) {
        match self.current() {
            SyntaxKind::Hash if self.at_line_start() => self.parse_preprocessor(),
            SyntaxKind::Semicolon => self.bump(),
            SyntaxKind::KwTemplate => self.parse_template_def(),
            SyntaxKind::KwNamespace => self.parse_namespace_def(),
            SyntaxKind::KwUsing => self.parse_using_def(),
            SyntaxKind::KwTypedef => self.parse_typedef_def(),
            SyntaxKind::KwExtern if self.nth(1) == SyntaxKind::String => self.parse_linkage_spec(),
            SyntaxKind::KwStruct | SyntaxKind::KwClass | SyntaxKind::KwUnion
                if self.at_record_definition() =>
            {
                self.parse_record_def(true);
            },
            SyntaxKind::KwEnum if self.at_enum_definition() => self.parse_enum_def(true),
            _ if self.at_qualified_constructor() => self.parse_constructor(),
            _ => {
                if self.looks_like_declaration() {
                    self.parse_declaration(DeclContext::Item);
                } else {
                    self.bump();
                }
            },
        }
    }

    fn parse_preprocessor(&mut self) {
        let kind = match (self.nth(1), self.nth_text(1)) {
            (SyntaxKind::Ident, "include") => SyntaxKind::PreprocInclude,
            (SyntaxKind::Ident, "define") => SyntaxKind::PreprocDefine,
            _ => SyntaxKind::PreprocDirective,
        };
        self.start_node(kind);
        self.bump();
        let mut continued = false;
        while let Some(next) = self.next_significant_index() {
            if !continued && self.newline_between(self.pos, next) {
                break;
            }
            continued = self.tokens[next] == (SyntaxKind::Error, "\\");
            self.bump();
        }
        self.finish_node();
    }

    fn parse_linkage_spec(&mut self) {
        self.start_node(SyntaxKind::LinkageSpec);
        self.bump();
        self.bump();
        if self.at(SyntaxKind::LBrace) {
            self.parse_item_list();
        } else {
            self.parse_item();
        }
        self.finish_node();
    }

    fn parse_namespace_def(&mut self) {
        self.start_node(SyntaxKind::NamespaceDef);
        self.bump();
        while matches!(self.current(), SyntaxKind::Ident | SyntaxKind::DoubleColon) {
            self.bump();
        }
        if self.at(SyntaxKind::LBrace) {
            self.parse_item_list();
        } else {
            // Namespace alias: `namespace fs = std::filesystem;`
            self.bump_until_semicolon();
        }
        self.finish_node();
    }

    fn parse_item_list(&mut self) {
        self.start_node(SyntaxKind::ItemList);
        self.bump();
        self.parse_items(true);
        self.eat(SyntaxKind::RBrace);
        self.finish_node();
    }

    fn parse_template_def(&mut self) {
        self.start_node(SyntaxKind::TemplateDef);
        self.bump();
        if self.at(SyntaxKind::Less) {
            self.parse_template_parameter_list();
        }
        match self.current() {
            SyntaxKind::Eof | SyntaxKind::RBrace => {},
            _ => {
                let before = self.pos;
                self.parse_item();
                if self.pos == before {
                    self.bump();
                }
            },
        }
        self.finish_node();
    }

    fn parse_template_parameter_list(&mut self) {
        self.start_node(SyntaxKind::TemplateParameterList);
        self.bump();
        while !matches!(
            self.current(),
            SyntaxKind::Greater | SyntaxKind::Eof | SyntaxKind::LBrace | SyntaxKind::Semicolon
        ) {
            self.start_node(SyntaxKind::TemplateParameter);
            self.bump_template_argument();
            self.finish_node();
            if !self.eat(SyntaxKind::Comma) {
                break;
            }
        }
        self.eat(SyntaxKind::Greater);
        self.finish_node();
    }

    /// Consumes one template parameter or argument, stopping at a top-level `,` or `>`.
    fn bump_template_argument(&mut self) {
        let mut consumed = false;
        loop {
            match self.current() {
                SyntaxKind::Comma | SyntaxKind::Greater if consumed => break,
                SyntaxKind::Eof | SyntaxKind::Semicolon | SyntaxKind::LBrace => break,
                SyntaxKind::Less => self.bump_balanced(SyntaxKind::Less, SyntaxKind::Greater),
                SyntaxKind::LParen => self.bump_balanced(SyntaxKind::LParen, SyntaxKind::RParen),
                _ => self.bump(),
            }
            consumed = true;
        }
    }

    fn parse_using_def(&mut self) {
        self.start_node(SyntaxKind::UsingDef);
        self.bump_until_semicolon();
        self.finish_node();
    }

    fn parse_typedef_def(&mut self) {
        self.start_node(SyntaxKind::TypedefDef);
        self.bump();
        match self.current() {
            SyntaxKind::KwStruct | SyntaxKind::KwClass | SyntaxKind::KwUnion
                if self.at_record_definition() =>
            {
                self.parse_record_def(false);
            },
            SyntaxKind::KwEnum if self.at_enum_definition() => self.parse_enum_def(false),
            _ => self.parse_type_ref(),
        }
        self.bump_until_semicolon();
        self.finish_node();
    }

    fn at_record_definition(&self) -> bool {
        match self.nth(1) {
            SyntaxKind::LBrace => true,
            SyntaxKind::Ident => matches!(
                self.nth(2),
                SyntaxKind::LBrace | SyntaxKind::Colon | SyntaxKind::Semicolon
            ),
            _ => false,
        }
    }

    fn at_enum_definition(&self) -> bool {
        let mut n = 1;
        if matches!(self.nth(n), SyntaxKind::KwClass | SyntaxKind::KwStruct) {
            n += 1;
        }
        if self.nth(n) == SyntaxKind::Ident {
            n += 1;
        }
        matches!(
            self.nth(n),
            SyntaxKind::LBrace | SyntaxKind::Colon | SyntaxKind::Semicolon
        )
    }

    /// `struct`/`class`/`union` definitions. A standalone definition also owns any trailing
    /// declarators and the terminating `;`.
    fn parse_record_def(
        &mut self,
        standalone: bool,
    ) {
        let kind = if self.at(SyntaxKind::KwClass) {
            SyntaxKind::ClassDef
        } else {
            SyntaxKind::StructDef
        };
        self.start_node(kind);
        self.bump();
        self.eat(SyntaxKind::Ident);
        if self.eat(SyntaxKind::Colon) {
            while !matches!(
                self.current(),
                SyntaxKind::LBrace | SyntaxKind::Semicolon | SyntaxKind::Eof
            ) {
                self.bump();
            }
        }
        if self.at(SyntaxKind::LBrace) {
            self.parse_field_list();
        }
        if standalone {
            self.bump_until_semicolon();
        }
        self.finish_node();
    }

    fn parse_field_list(&mut self) {
        self.start_node(SyntaxKind::FieldList);
        self.bump();
        loop {
            match self.current() {
                SyntaxKind::RBrace | SyntaxKind::Eof => break,
                _ => {},
            }
            let before = self.pos;
            self.parse_member();
            if self.pos == before {
                self.bump();
            }
        }
        self.eat(SyntaxKind::RBrace);
        self.finish_node();
    }

    fn parse_member(&mut self) {
        match self.current() {
            SyntaxKind::KwPublic | SyntaxKind::KwPrivate | SyntaxKind::KwProtected
                if self.nth(1) == SyntaxKind::Colon =>
            {
                self.start_node(SyntaxKind::AccessSpecifier);
                self.bump();
                self.bump();
                self.finish_node();
            },
            SyntaxKind::KwUsing => self.parse_using_def(),
            _ if self.at_constructor() => self.parse_constructor(),
            _ => self.parse_item_in(DeclContext::Member),
        }
    }

    fn parse_item_in(
        &mut self,
        context: DeclContext,
    ) {
        if self.looks_like_declaration() {
            self.parse_declaration(context);
        } else {
            self.parse_item();
        }
    }

    /// `Foo(...)`, `~Foo(...)` and `explicit Foo(...)` inside a record body.
    fn at_constructor(&self) -> bool {
        let mut n = 0;
        while matches!(
            self.nth(n),
            SyntaxKind::KwExplicit | SyntaxKind::KwInline | SyntaxKind::KwVirtual | SyntaxKind::KwConstexpr
        ) {
            n += 1;
        }
        if self.nth(n) == SyntaxKind::Tilde {
            n += 1;
        }
        self.nth(n) == SyntaxKind::Ident && self.nth(n + 1) == SyntaxKind::LParen
    }

    /// Out-of-class `Foo::Foo(...)` / `Foo::~Foo(...)`.
    fn at_qualified_constructor(&self) -> bool {
        let mut n = 0;
        while matches!(self.nth(n), SyntaxKind::KwInline | SyntaxKind::KwConstexpr) {
            n += 1;
        }
        if self.nth(n) != SyntaxKind::Ident {
            return false;
        }
        n += 1;
        let mut qualified = false;
        while self.nth(n) == SyntaxKind::DoubleColon {
            n += 1;
            if self.nth(n) == SyntaxKind::Tilde {
                n += 1;
            }
            if self.nth(n) != SyntaxKind::Ident {
                return false;
            }
            n += 1;
            qualified = true;
        }
        qualified && self.nth(n) == SyntaxKind::LParen
    }

    fn parse_constructor(&mut self) {
        self.start_node(SyntaxKind::FunctionDef);
        while self.current() != SyntaxKind::LParen && self.current() != SyntaxKind::Eof {
            self.bump();
        }
        self.parse_parameter_list();
        self.parse_function_rest();
        self.finish_node();
    }

    fn parse_enum_def(
        &mut self,
        standalone: bool,
    ) {
        self.start_node(SyntaxKind::EnumDef);
        self.bump();
        if matches!(self.current(), SyntaxKind::KwClass | SyntaxKind::KwStruct) {
            self.bump();
        }
        self.eat(SyntaxKind::Ident);
        if self.eat(SyntaxKind::Colon) {
            self.parse_type_ref();
        }
        if self.at(SyntaxKind::LBrace) {
            self.parse_enumerator_list();
        }
        if standalone {
            self.bump_until_semicolon();
        }
        self.finish_node();
    }

    fn parse_enumerator_list(&mut self) {
        self.start_node(SyntaxKind::EnumeratorList);
        self.bump();
        while self.at(SyntaxKind::Ident) {
            self.start_node(SyntaxKind::Enumerator);
            self.bump();
            if self.eat(SyntaxKind::Equal) {
                self.parse_expression();
            }
            self.finish_node();
            if !self.eat(SyntaxKind::Comma) {
                break;
            }
        }
        while !matches!(self.current(), SyntaxKind::RBrace | SyntaxKind::Eof) {
            self.bump();
        }
        self.eat(SyntaxKind::RBrace);
        self.finish_node();
    }

    // ── declarations ───────────────────────────────────────────────────

    /// Parses `type declarator ...` and wraps it as a function definition or as the
    /// variable-like node for `context`.
    fn parse_declaration(
        &mut self,
        context: DeclContext,
    ) {
        let checkpoint = self.checkpoint();
        self.parse_type_ref();
        self.bump_declarator_name();

        if self.at(SyntaxKind::LParen) && context != DeclContext::Local {
            self.start_node_at(checkpoint, SyntaxKind::FunctionDef);
            self.parse_parameter_list();
            self.parse_function_rest();
            self.finish_node();
            return;
        }

        let kind = match context {
            DeclContext::Item => SyntaxKind::VariableDef,
            DeclContext::Member => SyntaxKind::FieldDef,
            DeclContext::Local => SyntaxKind::DeclStmt,
        };
        self.start_node_at(checkpoint, kind);
        loop {
            self.parse_declarator_suffix(context);
            if !self.eat(SyntaxKind::Comma) {
                break;
            }
            while matches!(
                self.current(),
                SyntaxKind::Star | SyntaxKind::Amp | SyntaxKind::AndAnd | SyntaxKind::KwConst
            ) {
                self.bump();
            }
            self.bump_declarator_name();
        }
        if context == DeclContext::Local && self.at(SyntaxKind::Colon) {
            // Range-based for: `for (auto& item : items)`
            self.bump();
            self.parse_expression();
        } else {
            self.bump_until_semicolon();
        }
        self.finish_node();
    }

    fn bump_declarator_name(&mut self) {
        if self.at(SyntaxKind::KwOperator) {
            self.bump();
            if self.at(SyntaxKind::LParen) {
                self.bump();
                self.eat(SyntaxKind::RParen);
            } else {
                while !matches!(self.current(), SyntaxKind::LParen | SyntaxKind::Eof) {
                    self.bump();
                }
            }
            return;
        }
        while matches!(
            self.current(),
            SyntaxKind::Ident | SyntaxKind::DoubleColon | SyntaxKind::Tilde
        ) {
            if self.at(SyntaxKind::Ident) && self.nth(1) == SyntaxKind::Less {
                self.bump();
                self.bump_balanced(SyntaxKind::Less, SyntaxKind::Greater);
                continue;
            }
            self.bump();
        }
    }

    fn parse_declarator_suffix(
        &mut self,
        context: DeclContext,
    ) {
        while self.at(SyntaxKind::LBracket) {
            self.bump_balanced(SyntaxKind::LBracket, SyntaxKind::RBracket);
        }
        if context == DeclContext::Member && self.at(SyntaxKind::Colon) {
            // Bit-field width.
            self.bump();
            self.parse_expression();
        }
        match self.current() {
            SyntaxKind::Equal => {
                self.start_node(SyntaxKind::Initializer);
                self.bump();
                self.parse_expression();
                self.finish_node();
            },
            SyntaxKind::LBrace => {
                self.start_node(SyntaxKind::Initializer);
                self.parse_init_list();
                self.finish_node();
            },
            SyntaxKind::LParen => {
                self.start_node(SyntaxKind::Initializer);
                self.parse_arg_list();
                self.finish_node();
            },
            _ => {},
        }
    }

    /// Qualifiers, constructor initializers and the body (or `;`) after a parameter list.
    fn parse_function_rest(&mut self) {
        loop {
            match self.current() {
                SyntaxKind::LBrace => {
                    self.parse_block();
                    return;
                },
                SyntaxKind::Semicolon => {
                    self.bump();
                    return;
                },
                SyntaxKind::Eof | SyntaxKind::RBrace => return,
                SyntaxKind::Colon => {
                    self.bump();
                    self.bump_member_initializers();
                },
                SyntaxKind::Equal => {
                    // `= 0`, `= default`, `= delete`
                    self.bump_until_semicolon();
                    return;
                },
                SyntaxKind::LParen => self.bump_balanced(SyntaxKind::LParen, SyntaxKind::RParen),
                _ => self.bump(),
            }
        }
    }

    fn bump_member_initializers(&mut self) {
        loop {
            while matches!(
                self.current(),
                SyntaxKind::Ident | SyntaxKind::DoubleColon
            ) {
                self.bump();
            }
            match self.current() {
                SyntaxKind::LParen => self.bump_balanced(SyntaxKind::LParen, SyntaxKind::RParen),
                SyntaxKind::LBrace => self.bump_balanced(SyntaxKind::LBrace, SyntaxKind::RBrace),
                _ => return,
            }
            if !self.eat(SyntaxKind::Comma) {
                return;
            }
        }
    }

    fn parse_parameter_list(&mut self) {
        self.start_node(SyntaxKind::ParameterList);
        self.bump();
        while !matches!(self.current(), SyntaxKind::RParen | SyntaxKind::Eof) {
            self.parse_parameter();
            if !self.eat(SyntaxKind::Comma) {
                break;
            }
        }
        while !matches!(
            self.current(),
            SyntaxKind::RParen | SyntaxKind::Eof | SyntaxKind::LBrace | SyntaxKind::Semicolon
        ) {
            self.bump();
        }
        self.eat(SyntaxKind::RParen);
        self.finish_node();
    }

    fn parse_parameter(&mut self) {
        self.start_node(SyntaxKind::Parameter);
        let before = self.pos;
        if self.at_type_start() {
            self.parse_type_ref();
            self.eat(SyntaxKind::Ident);
        }
        loop {
            match self.current() {
                SyntaxKind::Comma | SyntaxKind::RParen | SyntaxKind::Eof => break,
                SyntaxKind::LBrace | SyntaxKind::Semicolon => break,
                SyntaxKind::Equal => {
                    self.start_node(SyntaxKind::Initializer);
                    self.bump();
                    self.parse_expression();
                    self.finish_node();
                },
                SyntaxKind::LParen => self.bump_balanced(SyntaxKind::LParen, SyntaxKind::RParen),
                SyntaxKind::LBracket => {
                    self.bump_balanced(SyntaxKind::LBracket, SyntaxKind::RBracket);
                },
                _ => self.bump(),
            }
        }
        if self.pos == before {
            self.bump();
        }
        self.finish_node();
    }

    /// Decl specifiers, the type name itself, then cv-qualifiers and pointer operators.
    fn parse_type_ref(&mut self) {
        self.start_node(SyntaxKind::TypeRef);
        while self.current().is_decl_specifier() {
            self.bump();
        }
        match self.current() {
            kind if kind.is_builtin_type() => {
                while self.current().is_builtin_type() {
                    self.bump();
                }
            },
            SyntaxKind::KwAuto => self.bump(),
            SyntaxKind::KwStruct | SyntaxKind::KwClass | SyntaxKind::KwUnion | SyntaxKind::KwEnum => {
                self.bump();
                self.bump_qualified_type_name();
            },
            SyntaxKind::Ident | SyntaxKind::DoubleColon => self.bump_qualified_type_name(),
            _ => {},
        }
        while matches!(
            self.current(),
            SyntaxKind::KwConst
                | SyntaxKind::KwVolatile
                | SyntaxKind::Star
                | SyntaxKind::Amp
                | SyntaxKind::AndAnd
        ) {
            self.bump();
        }
        self.finish_node();
    }

    fn bump_qualified_type_name(&mut self) {
        self.eat(SyntaxKind::DoubleColon);
        while self.at(SyntaxKind::Ident) {
            self.bump();
            if self.at(SyntaxKind::Less) && self.template_args_end(0).is_some() {
                self.bump_balanced(SyntaxKind::Less, SyntaxKind::Greater);
            }
            if self.at(SyntaxKind::DoubleColon) && self.nth(1) == SyntaxKind::Ident {
                self.bump();
            } else {
                break;
            }
        }
    }

    // ── statements ─────────────────────────────────────────────────────

    fn parse_block(&mut self) {
        self.start_node(SyntaxKind::Block);
        self.bump();
        loop {
            match self.current() {
                SyntaxKind::RBrace | SyntaxKind::Eof => break,
                _ => {},
            }
            let before = self.pos;
            self.parse_statement();
            if self.pos == before {
                self.bump();
            }
        }
        self.eat(SyntaxKind::RBrace);
        self.finish_node();
    }

    fn parse_statement(&mut self) {
        match self.current() {
            SyntaxKind::LBrace => self.parse_block(),
            SyntaxKind::Hash if self.at_line_start() => self.parse_preprocessor(),
            SyntaxKind::KwReturn => {
                self.start_node(SyntaxKind::ReturnStmt);
                self.bump();
                if !self.at(SyntaxKind::Semicolon) {
                    self.parse_expression();
                }
                self.bump_until_semicolon();
                self.finish_node();
            },
            SyntaxKind::KwIf => self.parse_if_stmt(),
            SyntaxKind::KwWhile => {
                self.start_node(SyntaxKind::WhileStmt);
                self.bump();
                self.parse_condition();
                self.parse_sub_statement();
                self.finish_node();
            },
            SyntaxKind::KwDo => {
                self.start_node(SyntaxKind::DoStmt);
                self.bump();
                self.parse_sub_statement();
                if self.eat(SyntaxKind::KwWhile) {
                    self.parse_condition();
                }
                self.eat(SyntaxKind::Semicolon);
                self.finish_node();
            },
            SyntaxKind::KwFor => self.parse_for_stmt(),
            SyntaxKind::KwSwitch => {
                self.start_node(SyntaxKind::SwitchStmt);
                self.bump();
                self.parse_condition();
                self.parse_sub_statement();
                self.finish_node();
            },
            SyntaxKind::KwCase | SyntaxKind::KwDefault => {
                self.start_node(SyntaxKind::CaseStmt);
                let is_case = self.at(SyntaxKind::KwCase);
                self.bump();
                if is_case {
                    self.parse_expression();
                }
                self.eat(SyntaxKind::Colon);
                self.finish_node();
            },
            SyntaxKind::KwBreak => self.parse_jump_stmt(SyntaxKind::BreakStmt),
            SyntaxKind::KwContinue => self.parse_jump_stmt(SyntaxKind::ContinueStmt),
            SyntaxKind::KwGoto => self.parse_jump_stmt(SyntaxKind::GotoStmt),
            SyntaxKind::KwUsing => self.parse_using_def(),
            SyntaxKind::KwTypedef => self.parse_typedef_def(),
            SyntaxKind::KwStruct | SyntaxKind::KwClass | SyntaxKind::KwUnion
                if self.at_record_definition() =>
            {
                self.parse_record_def(true);
            },
            SyntaxKind::KwEnum if self.at_enum_definition() => self.parse_enum_def(true),
            _ if self.looks_like_declaration() => self.parse_declaration(DeclContext::Local),
            _ => self.parse_expr_stmt(),
        }
    }

    /// Body of a control statement; an absent statement leaves the parent incomplete.
    fn parse_sub_statement(&mut self) {
        if !matches!(self.current(), SyntaxKind::Eof | SyntaxKind::RBrace) {
            self.parse_statement();
        }
    }

    fn parse_jump_stmt(
        &mut self,
        kind: SyntaxKind,
    ) {
        self.start_node(kind);
        self.bump_until_semicolon();
        self.finish_node();
    }

    fn parse_expr_stmt(&mut self) {
        self.start_node(SyntaxKind::ExprStmt);
        if !self.at(SyntaxKind::Semicolon) && !self.parse_expression() {
            self.bump();
        }
        self.eat(SyntaxKind::Semicolon);
        self.finish_node();
    }

    fn parse_if_stmt(&mut self) {
        self.start_node(SyntaxKind::IfStmt);
        self.bump();
        self.eat(SyntaxKind::KwConstexpr);
        self.parse_condition();
        self.parse_sub_statement();
        if self.at(SyntaxKind::KwElse) {
            self.start_node(SyntaxKind::ElseBranch);
            self.bump();
            self.parse_sub_statement();
            self.finish_node();
        }
        self.finish_node();
    }

    fn parse_condition(&mut self) {
        if !self.at(SyntaxKind::LParen) {
            return;
        }
        self.start_node(SyntaxKind::Condition);
        self.bump();
        if self.looks_like_declaration() {
            let checkpoint = self.checkpoint();
            self.parse_type_ref();
            self.bump_declarator_name();
            self.start_node_at(checkpoint, SyntaxKind::DeclStmt);
            self.parse_declarator_suffix(DeclContext::Local);
            self.finish_node();
        } else {
            self.parse_expression();
        }
        while !matches!(
            self.current(),
            SyntaxKind::RParen | SyntaxKind::Eof | SyntaxKind::LBrace | SyntaxKind::Semicolon
        ) {
            if self.at(SyntaxKind::LParen) {
                self.bump_balanced(SyntaxKind::LParen, SyntaxKind::RParen);
            } else {
                self.bump();
            }
        }
        self.eat(SyntaxKind::RParen);
        self.finish_node();
    }

    fn parse_for_stmt(&mut self) {
        self.start_node(SyntaxKind::ForStmt);
        self.bump();
        if self.eat(SyntaxKind::LParen) {
            if self.looks_like_declaration() {
                self.parse_declaration(DeclContext::Local);
            } else {
                self.parse_expr_stmt();
            }
            if !self.at(SyntaxKind::Semicolon) && !self.at(SyntaxKind::RParen) {
                self.parse_expression();
            }
            self.eat(SyntaxKind::Semicolon);
            if !self.at(SyntaxKind::RParen) {
                self.parse_expression();
            }
            while !matches!(
                self.current(),
                SyntaxKind::RParen | SyntaxKind::Eof | SyntaxKind::LBrace
            ) {
                self.bump();
            }
            self.eat(SyntaxKind::RParen);
        }
        self.parse_sub_statement();
        self.finish_node();
    }

    // ── expressions ────────────────────────────────────────────────────

    /// Returns `false` when no expression starts at the current token.
    fn parse_expression(&mut self) -> bool {
        self.parse_expression_bp(0)
    }

    fn parse_expression_bp(
        &mut self,
        min_bp: u8,
    ) -> bool {
        let checkpoint = self.checkpoint();
        if !self.parse_unary_expression() {
            return false;
        }

        loop {
            let op = self.current();
            if op == SyntaxKind::Question {
                if CONDITIONAL_BP < min_bp {
                    break;
                }
                self.start_node_at(checkpoint, SyntaxKind::ConditionalExpr);
                self.bump();
                self.parse_expression();
                if self.eat(SyntaxKind::Colon) {
                    self.parse_expression_bp(CONDITIONAL_BP - 1);
                }
                self.finish_node();
                continue;
            }
            let Some((left_bp, right_bp, kind)) = infix_binding_power(op) else {
                break;
            };
            if left_bp < min_bp {
                break;
            }
            self.start_node_at(checkpoint, kind);
            self.bump();
            self.parse_expression_bp(right_bp);
            self.finish_node();
        }
        true
    }

    fn parse_unary_expression(&mut self) -> bool {
        match self.current() {
            SyntaxKind::Plus
            | SyntaxKind::Minus
            | SyntaxKind::Exclaim
            | SyntaxKind::Tilde
            | SyntaxKind::Star
            | SyntaxKind::Amp
            | SyntaxKind::PlusPlus
            | SyntaxKind::MinusMinus
            | SyntaxKind::KwSizeof
            | SyntaxKind::KwNew
            | SyntaxKind::KwDelete => {
                self.start_node(SyntaxKind::UnaryExpr);
                self.bump();
                if self.at(SyntaxKind::LBracket) {
                    // `delete[] ptr`
                    self.bump_balanced(SyntaxKind::LBracket, SyntaxKind::RBracket);
                }
                self.parse_expression_bp(PREFIX_BP);
                self.finish_node();
                true
            },
            SyntaxKind::LParen if self.at_cast() => {
                self.start_node(SyntaxKind::CastExpr);
                self.bump();
                self.parse_type_ref();
                self.eat(SyntaxKind::RParen);
                self.parse_expression_bp(PREFIX_BP);
                self.finish_node();
                true
            },
            _ => self.parse_postfix_expression(),
        }
    }

    fn at_cast(&self) -> bool {
        let mut n = 1;
        while matches!(self.nth(n), SyntaxKind::KwConst | SyntaxKind::KwVolatile) {
            n += 1;
        }
        let head = self.nth(n);
        if !head.is_builtin_type()
            && !matches!(
                head,
                SyntaxKind::KwStruct | SyntaxKind::KwUnion | SyntaxKind::KwEnum
            )
        {
            return false;
        }
        while !matches!(
            self.nth(n),
            SyntaxKind::RParen | SyntaxKind::Eof | SyntaxKind::Semicolon
        ) {
            n += 1;
        }
        self.nth(n) == SyntaxKind::RParen
    }

    fn parse_postfix_expression(&mut self) -> bool {
        let checkpoint = self.checkpoint();
        if !self.parse_primary_expression() {
            return false;
        }

        loop {
            match self.current() {
                SyntaxKind::LParen => {
                    self.start_node_at(checkpoint, SyntaxKind::CallExpr);
                    self.parse_arg_list();
                    self.finish_node();
                },
                SyntaxKind::LBracket => {
                    self.start_node_at(checkpoint, SyntaxKind::IndexExpr);
                    self.bump();
                    self.parse_expression();
                    self.eat(SyntaxKind::RBracket);
                    self.finish_node();
                },
                SyntaxKind::Dot | SyntaxKind::Arrow => {
                    self.start_node_at(checkpoint, SyntaxKind::MemberExpr);
                    self.bump();
                    self.eat(SyntaxKind::Tilde);
                    self.eat(SyntaxKind::Ident);
                    self.finish_node();
                },
                SyntaxKind::PlusPlus | SyntaxKind::MinusMinus => {
                    self.start_node_at(checkpoint, SyntaxKind::PostfixExpr);
                    self.bump();
                    self.finish_node();
                },
                _ => break,
            }
        }
        true
    }

    fn parse_primary_expression(&mut self) -> bool {
        match self.current() {
            kind if kind.is_literal() => {
                self.start_node(SyntaxKind::Literal);
                let adjacent_strings = kind == SyntaxKind::String;
                self.bump();
                while adjacent_strings && self.at(SyntaxKind::String) {
                    self.bump();
                }
                self.finish_node();
            },
            SyntaxKind::Ident | SyntaxKind::DoubleColon => {
                self.start_node(SyntaxKind::NameRef);
                self.eat(SyntaxKind::DoubleColon);
                while self.at(SyntaxKind::Ident) {
                    self.bump();
                    if self.at(SyntaxKind::Less)
                        && self.template_args_end(0).is_some_and(|end| {
                            matches!(
                                self.nth(end + 1),
                                SyntaxKind::LParen | SyntaxKind::DoubleColon | SyntaxKind::LBrace
                            )
                        })
                    {
                        self.bump_balanced(SyntaxKind::Less, SyntaxKind::Greater);
                    }
                    if self.at(SyntaxKind::DoubleColon)
                        && matches!(self.nth(1), SyntaxKind::Ident | SyntaxKind::Tilde)
                    {
                        self.bump();
                        self.eat(SyntaxKind::Tilde);
                    } else {
                        break;
                    }
                }
                self.finish_node();
            },
            kind if kind.is_builtin_type() => {
                // Functional cast: `float(x)`
                self.start_node(SyntaxKind::NameRef);
                self.bump();
                self.finish_node();
            },
            SyntaxKind::LParen => {
                self.start_node(SyntaxKind::ParenExpr);
                self.bump();
                self.parse_expression();
                self.eat(SyntaxKind::RParen);
                self.finish_node();
            },
            SyntaxKind::LBrace => self.parse_init_list(),
            SyntaxKind::LBracket => self.parse_lambda(),
            _ => return false,
        }
        true
    }

    fn parse_lambda(&mut self) {
        self.start_node(SyntaxKind::LambdaExpr);
        self.bump_balanced(SyntaxKind::LBracket, SyntaxKind::RBracket);
        if self.at(SyntaxKind::LParen) {
            self.parse_parameter_list();
        }
        while !matches!(
            self.current(),
            SyntaxKind::LBrace | SyntaxKind::Eof | SyntaxKind::Semicolon | SyntaxKind::RParen
        ) {
            self.bump();
        }
        if self.at(SyntaxKind::LBrace) {
            self.parse_block();
        }
        self.finish_node();
    }

    fn parse_init_list(&mut self) {
        self.start_node(SyntaxKind::InitList);
        self.bump();
        while !matches!(self.current(), SyntaxKind::RBrace | SyntaxKind::Eof) {
            if self.at(SyntaxKind::Dot) {
                // Designated initializer: `.x = 1`
                self.bump();
                self.eat(SyntaxKind::Ident);
                self.eat(SyntaxKind::Equal);
            }
            if !self.parse_expression() {
                self.bump();
            }
            if !self.eat(SyntaxKind::Comma) {
                break;
            }
        }
        while !matches!(self.current(), SyntaxKind::RBrace | SyntaxKind::Eof) {
            self.bump();
        }
        self.eat(SyntaxKind::RBrace);
        self.finish_node();
    }

    fn parse_arg_list(&mut self) {
        self.start_node(SyntaxKind::ArgList);
        self.bump();
        while !matches!(self.current(), SyntaxKind::RParen | SyntaxKind::Eof) {
            if !self.parse_expression() {
                if matches!(self.current(), SyntaxKind::LBrace | SyntaxKind::Semicolon) {
                    break;
                }
                self.bump();
                continue;
            }
            if !self.eat(SyntaxKind::Comma) {
                break;
            }
        }
        while !matches!(
            self.current(),
            SyntaxKind::RParen | SyntaxKind::Eof | SyntaxKind::LBrace | SyntaxKind::Semicolon
        ) {
            self.bump();
        }
        self.eat(SyntaxKind::RParen);
        self.finish_node();
    }

    // ── lookahead ──────────────────────────────────────────────────────

    fn at_type_start(&self) -> bool {
        let kind = self.current();
        kind.is_decl_specifier()
            || kind.is_builtin_type()
            || matches!(
                kind,
                SyntaxKind::KwAuto
                    | SyntaxKind::KwStruct
                    | SyntaxKind::KwClass
                    | SyntaxKind::KwUnion
                    | SyntaxKind::KwEnum
                    | SyntaxKind::Ident
                    | SyntaxKind::DoubleColon
            )
    }

    /// Heuristic: a type followed by a declarator name and a declarator terminator.
    fn looks_like_declaration(&self) -> bool {
        let mut n = 0;
        while self.nth(n).is_decl_specifier() {
            n += 1;
        }
        let has_specifiers = n > 0;
        match self.nth(n) {
            kind if kind.is_builtin_type() => {
                while self.nth(n).is_builtin_type() {
                    n += 1;
                }
            },
            SyntaxKind::KwAuto => n += 1,
            SyntaxKind::KwStruct | SyntaxKind::KwClass | SyntaxKind::KwUnion | SyntaxKind::KwEnum => {
                n += 1;
                if self.nth(n) == SyntaxKind::Ident {
                    n += 1;
                }
            },
            SyntaxKind::Ident | SyntaxKind::DoubleColon => {
                if self.nth(n) == SyntaxKind::DoubleColon {
                    n += 1;
                }
                loop {
                    if self.nth(n) != SyntaxKind::Ident {
                        return false;
                    }
                    n += 1;
                    if self.nth(n) == SyntaxKind::Less {
                        match self.template_args_end(n) {
                            Some(end) => n = end + 1,
                            None => return false,
                        }
                    }
                    if self.nth(n) == SyntaxKind::DoubleColon {
                        n += 1;
                    } else {
                        break;
                    }
                }
            },
            _ => return has_specifiers && self.nth(n) == SyntaxKind::Ident,
        }
        while matches!(
            self.nth(n),
            SyntaxKind::Star
                | SyntaxKind::Amp
                | SyntaxKind::AndAnd
                | SyntaxKind::KwConst
                | SyntaxKind::KwVolatile
        ) {
            n += 1;
        }
        match self.nth(n) {
            SyntaxKind::Ident => matches!(
                self.nth(n + 1),
                SyntaxKind::Semicolon
                    | SyntaxKind::Equal
                    | SyntaxKind::Comma
                    | SyntaxKind::LParen
                    | SyntaxKind::LBracket
                    | SyntaxKind::LBrace
                    | SyntaxKind::Colon
                    | SyntaxKind::DoubleColon
            ),
            SyntaxKind::KwOperator | SyntaxKind::Tilde => true,
            _ => false,
        }
    }

    /// Index (relative to the current token) of the `>` closing the template argument list
    /// that opens at significant token `open`.
    fn template_args_end(
        &self,
        open: usize,
    ) -> Option<usize> {
        let mut depth = 0usize;
        let mut n = open;
        loop {
            match self.nth(n) {
                SyntaxKind::Less => depth += 1,
                SyntaxKind::Greater => {
                    depth -= 1;
                    if depth == 0 {
                        return Some(n);
                    }
                },
                SyntaxKind::RightShift => {
                    if depth <= 2 {
                        return (depth == 2).then_some(n);
                    }
                    depth -= 2;
                },
                SyntaxKind::Eof
                | SyntaxKind::Semicolon
                | SyntaxKind::LBrace
                | SyntaxKind::RBrace
                | SyntaxKind::AndAnd
                | SyntaxKind::OrOr
                | SyntaxKind::EqualEqual
                | SyntaxKind::NotEqual => return None,
                _ => {},
            }
            n += 1;
        }
    }

    // ── token plumbing ─────────────────────────────────────────────────

    fn next_significant_index(&self) -> Option<usize> {
        (self.pos..self.tokens.len()).find(|&index| !self.tokens[index].0.is_trivia())
    }

    fn nth_index(
        &self,
        n: usize,
    ) -> Option<usize> {
        (self.pos..self.tokens.len())
            .filter(|&index| !self.tokens[index].0.is_trivia())
            .nth(n)
    }

    fn nth(
        &self,
        n: usize,
    ) -> SyntaxKind {
        self.nth_index(n)
            .map_or(SyntaxKind::Eof, |index| self.tokens[index].0)
    }

    fn nth_text(
        &self,
        n: usize,
    ) -> &'a str {
        self.nth_index(n)
            .map_or("", |index| self.tokens[index].1)
    }

    fn current(&self) -> SyntaxKind {
        self.nth(0)
    }

    fn at(
        &self,
        kind: SyntaxKind,
    ) -> bool {
        self.current() == kind
    }

    fn newline_between(
        &self,
        from: usize,
        to: usize,
    ) -> bool {
        self.tokens[from..to]
            .iter()
            .any(|(kind, text)| kind.is_trivia() && text.contains('\n'))
    }

    fn at_line_start(&self) -> bool {
        let Some(next) = self.next_significant_index() else {
            return false;
        };
        let previous = (0..next)
            .rev()
            .find(|&index| !self.tokens[index].0.is_trivia());
        match previous {
            Some(previous) => self.newline_between(previous + 1, next),
            None => true,
        }
    }

    fn eat_trivia(&mut self) {
        while let Some(&(kind, text)) = self.tokens.get(self.pos) {
            if !kind.is_trivia() {
                break;
            }
            self.builder.token(kind.into(), text);
            self.pos += 1;
        }
    }

    fn bump(&mut self) {
        self.eat_trivia();
        if let Some(&(kind, text)) = self.tokens.get(self.pos) {
            self.builder.token(kind.into(), text);
            self.pos += 1;
        }
    }

    fn eat(
        &mut self,
        kind: SyntaxKind,
    ) -> bool {
        if self.at(kind) {
            self.bump();
            true
        } else {
            false
        }
    }

    fn bump_until_semicolon(&mut self) {
        loop {
            match self.current() {
                SyntaxKind::Semicolon => {
                    self.bump();
                    return;
                },
                SyntaxKind::Eof | SyntaxKind::RBrace => return,
                SyntaxKind::LBrace => self.bump_balanced(SyntaxKind::LBrace, SyntaxKind::RBrace),
                SyntaxKind::LParen => self.bump_balanced(SyntaxKind::LParen, SyntaxKind::RParen),
                _ => self.bump(),
            }
        }
    }

    fn bump_balanced(
        &mut self,
        open: SyntaxKind,
        close: SyntaxKind,
    ) {
        let mut depth = 0usize;
        loop {
            let kind = self.current();
            if kind == SyntaxKind::Eof {
                return;
            }
            if kind == open {
                depth += 1;
            } else if kind == close {
                depth = depth.saturating_sub(1);
            } else if close == SyntaxKind::Greater && kind == SyntaxKind::RightShift {
                depth = depth.saturating_sub(2);
            } else if open != SyntaxKind::LBrace
                && matches!(kind, SyntaxKind::Semicolon | SyntaxKind::RBrace | SyntaxKind::LBrace)
            {
                return;
            }
            self.bump();
            if depth == 0 {
                return;
            }
        }
    }

    fn start_node(
        &mut self,
        kind: SyntaxKind,
    ) {
        self.eat_trivia();
        self.builder.start_node(kind.into());
    }

    fn checkpoint(&mut self) -> Checkpoint {
        self.eat_trivia();
        self.builder.checkpoint()
    }

    fn start_node_at(
        &mut self,
        checkpoint: Checkpoint,
        kind: SyntaxKind,
    ) {
        self.builder.start_node_at(checkpoint, kind.into());
    }

    fn finish_node(&mut self) {
        self.builder.finish_node();
    }
}

fn infix_binding_power(op: SyntaxKind) -> Option<(u8, u8, SyntaxKind)> {
    let (left, right) = match op {
        SyntaxKind::Equal
        | SyntaxKind::PlusEqual
        | SyntaxKind::MinusEqual
        | SyntaxKind::StarEqual
        | SyntaxKind::SlashEqual
        | SyntaxKind::PercentEqual
        | SyntaxKind::CaretEqual
        | SyntaxKind::AmpEqual
        | SyntaxKind::PipeEqual
        | SyntaxKind::LeftShiftEqual
        | SyntaxKind::RightShiftEqual => return Some((2, 1, SyntaxKind::AssignExpr)),
        SyntaxKind::OrOr => (5, 6),
        SyntaxKind::AndAnd => (7, 8),
        SyntaxKind::Pipe => (9, 10),
        SyntaxKind::Caret => (11, 12),
        SyntaxKind::Amp => (13, 14),
        SyntaxKind::EqualEqual | SyntaxKind::NotEqual => (15, 16),
        SyntaxKind::Less | SyntaxKind::Greater | SyntaxKind::LessEqual | SyntaxKind::GreaterEqual => {
            (17, 18)
        },
        SyntaxKind::LeftShift | SyntaxKind::RightShift => (19, 20),
        SyntaxKind::Plus | SyntaxKind::Minus => (21, 22),
        SyntaxKind::Star | SyntaxKind::Slash | SyntaxKind::Percent => (23, 24),
        _ => return None,
    };
    Some((left, right, SyntaxKind::BinaryExpr))
}

#[cfg(test)]
#[path = "../../tests/src/syntax/cst_parser_tests.rs"]
mod tests;
