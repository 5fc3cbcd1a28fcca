use logos::Logos;

/// Every token and node kind that can appear in a C/C++ syntax tree.
///
/// Token kinds come first; composite node kinds start at [`SyntaxKind::Root`].
/// [`SyntaxKind::Eof`] is a parser sentinel and never appears in a tree.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[repr(u16)]
pub enum SyntaxKind {
    // Tokens
    Error = 0,
    Whitespace,
    Comment,

    // Identifiers & Literals
    Ident,
    Integer,
    Float,
    String,
    Char,

    // Punctuation
    Hash,
    LParen,
    RParen,
    LBrace,
    RBrace,
    LBracket,
    RBracket,
    Semicolon,
    Colon,
    DoubleColon,
    Comma,
    Dot,
    Arrow,
    Ellipsis,
    Question,

    // Operators
    Plus,
    Minus,
    Star,
    Slash,
    Percent,
    Caret,
    Amp,
    Pipe,
    Tilde,
    Exclaim,
    Equal,
    Less,
    Greater,
    PlusPlus,
    MinusMinus,
    PlusEqual,
    MinusEqual,
    StarEqual,
    SlashEqual,
    PercentEqual,
    CaretEqual,
    AmpEqual,
    PipeEqual,
    EqualEqual,
    NotEqual,
    LessEqual,
    GreaterEqual,
    AndAnd,
    OrOr,
    LeftShift,
    RightShift,
    LeftShiftEqual,
    RightShiftEqual,

    // Keywords
    KwAuto,
    KwBool,
    KwBreak,
    KwCase,
    KwChar,
    KwClass,
    KwConst,
    KwConstexpr,
    KwContinue,
    KwDefault,
    KwDelete,
    KwDo,
    KwDouble,
    KwElse,
    KwEnum,
    KwExplicit,
    KwExtern,
    KwFalse,
    KwFloat,
    KwFor,
    KwFriend,
    KwGoto,
    KwIf,
    KwInline,
    KwInt,
    KwLong,
    KwMutable,
    KwNamespace,
    KwNew,
    KwNoexcept,
    KwNullptr,
    KwOperator,
    KwPrivate,
    KwProtected,
    KwPublic,
    KwRegister,
    KwReturn,
    KwShort,
    KwSigned,
    KwSizeof,
    KwStatic,
    KwStruct,
    KwSwitch,
    KwTemplate,
    KwThis,
    KwThreadLocal,
    KwTrue,
    KwTypedef,
    KwTypename,
    KwUnion,
    KwUnsigned,
    KwUsing,
    KwVirtual,
    KwVoid,
    KwVolatile,
    KwWhile,

    // Parser sentinel
    Eof,

    // Composite nodes
    Root,
    PreprocInclude,
    PreprocDefine,
    PreprocDirective,
    LinkageSpec,
    NamespaceDef,
    ItemList,
    TemplateDef,
    TemplateParameterList,
    TemplateParameter,
    TypedefDef,
    UsingDef,
    StructDef,
    ClassDef,
    FieldList,
    FieldDef,
    AccessSpecifier,
    EnumDef,
    EnumeratorList,
    Enumerator,
    FunctionDef,
    ParameterList,
    Parameter,
    VariableDef,
    Initializer,
    TypeRef,

    // Statements
    Block,
    DeclStmt,
    ExprStmt,
    ReturnStmt,
    IfStmt,
    ElseBranch,
    Condition,
    WhileStmt,
    DoStmt,
    ForStmt,
    SwitchStmt,
    CaseStmt,
    BreakStmt,
    ContinueStmt,
    GotoStmt,

    // Expressions
    AssignExpr,
    ConditionalExpr,
    BinaryExpr,
    UnaryExpr,
    PostfixExpr,
    CastExpr,
    CallExpr,
    ArgList,
    IndexExpr,
    MemberExpr,
    ParenExpr,
    LambdaExpr,
    InitList,
    NameRef,
    Literal,
}

impl SyntaxKind {
    pub const LAST: SyntaxKind = SyntaxKind::Literal;

    pub fn is_trivia(self) -> bool {
        matches!(self, SyntaxKind::Whitespace | SyntaxKind::Comment)
    }

    pub fn is_node(self) -> bool {
        self >= SyntaxKind::Root
    }

    pub fn is_keyword(self) -> bool {
        (SyntaxKind::KwAuto..=SyntaxKind::KwWhile).contains(&self)
    }

    /// Built-in type specifiers that may be combined (`unsigned long int`).
    pub fn is_builtin_type(self) -> bool {
        matches!(
            self,
            SyntaxKind::KwBool
                | SyntaxKind::KwChar
                | SyntaxKind::KwDouble
                | SyntaxKind::KwFloat
                | SyntaxKind::KwInt
                | SyntaxKind::KwLong
                | SyntaxKind::KwShort
                | SyntaxKind::KwSigned
                | SyntaxKind::KwUnsigned
                | SyntaxKind::KwVoid
        )
    }

    /// Storage classes and function/cv specifiers allowed before a type.
    pub fn is_decl_specifier(self) -> bool {
        matches!(
            self,
            SyntaxKind::KwConst
                | SyntaxKind::KwConstexpr
                | SyntaxKind::KwExplicit
                | SyntaxKind::KwExtern
                | SyntaxKind::KwFriend
                | SyntaxKind::KwInline
                | SyntaxKind::KwMutable
                | SyntaxKind::KwRegister
                | SyntaxKind::KwStatic
                | SyntaxKind::KwThreadLocal
                | SyntaxKind::KwTypename
                | SyntaxKind::KwVirtual
                | SyntaxKind::KwVolatile
        )
    }

    pub fn is_literal(self) -> bool {
        matches!(
            self,
            SyntaxKind::Integer
                | SyntaxKind::Float
                | SyntaxKind::String
                | SyntaxKind::Char
                | SyntaxKind::KwTrue
                | SyntaxKind::KwFalse
                | SyntaxKind::KwNullptr
                | SyntaxKind::KwThis
        )
    }

    pub fn is_statement(self) -> bool {
        (SyntaxKind::Block..=SyntaxKind::GotoStmt).contains(&self)
            && !matches!(self, SyntaxKind::ElseBranch | SyntaxKind::Condition)
    }

    pub fn is_expression(self) -> bool {
        (SyntaxKind::AssignExpr..=SyntaxKind::Literal).contains(&self) && self != SyntaxKind::ArgList
    }
}

impl From<SyntaxKind> for rowan::SyntaxKind {
    fn from(kind: SyntaxKind) -> Self {
        rowan::SyntaxKind(kind as u16)
    }
}

#[derive(Logos, Debug, PartialEq, Clone, Copy)]
#[logos(error = ())]
pub enum TokenKind {
    #[regex(r"[ \t\r\n\f]+")]
    Whitespace,

    #[regex(r"//.*", allow_greedy = true)]
    #[regex(r"/\*([^*]|\*+[^*/])*\*+/")]
    Comment,

    #[token("#")]
    Hash,
    #[token("(")]
    LParen,
    #[token(")")]
    RParen,
    #[token("{")]
    LBrace,
    #[token("}")]
    RBrace,
    #[token("[")]
    LBracket,
    #[token("]")]
    RBracket,
    #[token(";")]
    Semicolon,
    #[token(":")]
    Colon,
    #[token("::")]
    DoubleColon,
    #[token(",")]
    Comma,
    #[token(".")]
    Dot,
    #[token("->")]
    Arrow,
    #[token("...")]
    Ellipsis,
    #[token("?")]
    Question,

    #[token("+")]
    Plus,
    #[token("-")]
    Minus,
    #[token("*")]
    Star,
    #[token("/")]
    Slash,
    #[token("%")]
    Percent,
    #[token("^")]
    Caret,
    #[token("&")]
    Amp,
    #[token("|")]
    Pipe,
    #[token("~")]
    Tilde,
    #[token("!")]
    Exclaim,
    #[token("=")]
    Equal,
    #[token("<")]
    Less,
    #[token(">")]
    Greater,
    #[token("++")]
    PlusPlus,
    #[token("--")]
    MinusMinus,
    #[token("+=")]
    PlusEqual,
    #[token("-=")]
    MinusEqual,
    #[token("*=")]
    StarEqual,
    #[token("/=")]
    SlashEqual,
    #[token("%=")]
    PercentEqual,
    #[token("^=")]
    CaretEqual,
    #[token("&=")]
    AmpEqual,
    #[token("|=")]
    PipeEqual,
    #[token("==")]
    EqualEqual,
    #[token("!=")]
    NotEqual,
    #[token("<=")]
    LessEqual,
    #[token(">=")]
    GreaterEqual,
    #[token("&&")]
    AndAnd,
    #[token("||")]
    OrOr,
    #[token("<<")]
    LeftShift,
    #[token(">>")]
    RightShift,
    #[token("<<=")]
    LeftShiftEqual,
    #[token(">>=")]
    RightShiftEqual,

    #[token("auto")]
    KwAuto,
    #[token("bool")]
    KwBool,
    #[token("break")]
    KwBreak,
    #[token("case")]
    KwCase,
    #[token("char")]
    KwChar,
    #[token("class")]
    KwClass,
    #[token("const")]
    KwConst,
    #[token("constexpr")]
    KwConstexpr,
    #[token("continue")]
    KwContinue,
    #[token("default")]
    KwDefault,
    #[token("delete")]
    KwDelete,
    #[token("do")]
    KwDo,
    #[token("double")]
    KwDouble,
    #[token("else")]
    KwElse,
    #[token("enum")]
    KwEnum,
    #[token("explicit")]
    KwExplicit,
    #[token("extern")]
    KwExtern,
    #[token("false")]
    KwFalse,
    #[token("float")]
    KwFloat,
    #[token("for")]
    KwFor,
    #[token("friend")]
    KwFriend,
    #[token("goto")]
    KwGoto,
    #[token("if")]
    KwIf,
    #[token("inline")]
    KwInline,
    #[token("int")]
    KwInt,
    #[token("long")]
    KwLong,
    #[token("mutable")]
    KwMutable,
    #[token("namespace")]
    KwNamespace,
    #[token("new")]
    KwNew,
    #[token("noexcept")]
    KwNoexcept,
    #[token("nullptr")]
    KwNullptr,
    #[token("operator")]
    KwOperator,
    #[token("private")]
    KwPrivate,
    #[token("protected")]
    KwProtected,
    #[token("public")]
    KwPublic,
    #[token("register")]
    KwRegister,
    #[token("return")]
    KwReturn,
    #[token("short")]
    KwShort,
    #[token("signed")]
    KwSigned,
    #[token("sizeof")]
    KwSizeof,
    #[token("static")]
    KwStatic,
    #[token("struct")]
    KwStruct,
    #[token("switch")]
    KwSwitch,
    #[token("template")]
    KwTemplate,
    #[token("this")]
    KwThis,
    #[token("thread_local")]
    KwThreadLocal,
    #[token("true")]
    KwTrue,
    #[token("typedef")]
    KwTypedef,
    #[token("typename")]
    KwTypename,
    #[token("union")]
    KwUnion,
    #[token("unsigned")]
    KwUnsigned,
    #[token("using")]
    KwUsing,
    #[token("virtual")]
    KwVirtual,
    #[token("void")]
    KwVoid,
    #[token("volatile")]
    KwVolatile,
    #[token("while")]
    KwWhile,

    #[regex(r"[a-zA-Z_][a-zA-Z0-9_]*")]
    Ident,
    #[regex(r#"(u8|u|U|L)?'([^'\\\n]|\\.)+'"#)]
    Char,
    #[regex(r#"(u8|u|U|L)?"([^"\\\n]|\\.)*""#)]
    String,
    #[regex(r"0[xX][0-9A-Fa-f]+[uUlL]*")]
    #[regex(r"[0-9]+[uUlL]*")]
    Integer,
    #[regex(r"[0-9]+\.[0-9]*([eE][+-]?[0-9]+)?[fFlL]?")]
    #[regex(r"\.[0-9]+([eE][+-]?[0-9]+)?[fFlL]?")]
    #[regex(r"[0-9]+[eE][+-]?[0-9]+[fFlL]?")]
    Float,
}

impl From<TokenKind> for SyntaxKind {
    fn from(token: TokenKind) -> Self {
        match token {
            TokenKind::Whitespace => SyntaxKind::Whitespace,
            TokenKind::Comment => SyntaxKind::Comment,
            TokenKind::Hash => SyntaxKind::Hash,
            TokenKind::LParen => SyntaxKind::LParen,
            TokenKind::RParen => SyntaxKind::RParen,
            TokenKind::LBrace => SyntaxKind::LBrace,
            TokenKind::RBrace => SyntaxKind::RBrace,
            TokenKind::LBracket => SyntaxKind::LBracket,
            TokenKind::RBracket => SyntaxKind::RBracket,
            TokenKind::Semicolon => SyntaxKind::Semicolon,
            TokenKind::Colon => SyntaxKind::Colon,
            TokenKind::DoubleColon => SyntaxKind::DoubleColon,
            TokenKind::Comma => SyntaxKind::Comma,
            TokenKind::Dot => SyntaxKind::Dot,
            TokenKind::Arrow => SyntaxKind::Arrow,
            TokenKind::Ellipsis => SyntaxKind::Ellipsis,
            TokenKind::Question => SyntaxKind::Question,
            TokenKind::Plus => SyntaxKind::Plus,
            TokenKind::Minus => SyntaxKind::Minus,
            TokenKind::Star => SyntaxKind::Star,
            TokenKind::Slash => SyntaxKind::Slash,
            TokenKind::Percent => SyntaxKind::Percent,
            TokenKind::Caret => SyntaxKind::Caret,
            TokenKind::Amp => SyntaxKind::Amp,
            TokenKind::Pipe => SyntaxKind::Pipe,
            TokenKind::Tilde => SyntaxKind::Tilde,
            TokenKind::Exclaim => SyntaxKind::Exclaim,
            TokenKind::Equal => SyntaxKind::Equal,
            TokenKind::Less => SyntaxKind::Less,
            TokenKind::Greater => SyntaxKind::Greater,
            TokenKind::PlusPlus => SyntaxKind::PlusPlus,
            TokenKind::MinusMinus => SyntaxKind::MinusMinus,
            TokenKind::PlusEqual => SyntaxKind::PlusEqual,
            TokenKind::MinusEqual => SyntaxKind::MinusEqual,
            TokenKind::StarEqual => SyntaxKind::StarEqual,
            TokenKind::SlashEqual => SyntaxKind::SlashEqual,
            TokenKind::PercentEqual => SyntaxKind::PercentEqual,
            TokenKind::CaretEqual => SyntaxKind::CaretEqual,
            TokenKind::AmpEqual => SyntaxKind::AmpEqual,
            TokenKind::PipeEqual => SyntaxKind::PipeEqual,
            TokenKind::EqualEqual => SyntaxKind::EqualEqual,
            TokenKind::NotEqual => SyntaxKind::NotEqual,
            TokenKind::LessEqual => SyntaxKind::LessEqual,
            TokenKind::GreaterEqual => SyntaxKind::GreaterEqual,
            TokenKind::AndAnd => SyntaxKind::AndAnd,
            TokenKind::OrOr => SyntaxKind::OrOr,
            TokenKind::LeftShift => SyntaxKind::LeftShift,
            TokenKind::RightShift => SyntaxKind::RightShift,
            TokenKind::LeftShiftEqual => SyntaxKind::LeftShiftEqual,
            TokenKind::RightShiftEqual => SyntaxKind::RightShiftEqual,
            TokenKind::KwAuto => SyntaxKind::KwAuto,
            TokenKind::KwBool => SyntaxKind::KwBool,
            TokenKind::KwBreak => SyntaxKind::KwBreak,
            TokenKind::KwCase => SyntaxKind::KwCase,
            TokenKind::KwChar => SyntaxKind::KwChar,
            TokenKind::KwClass => SyntaxKind::KwClass,
            TokenKind::KwConst => SyntaxKind::KwConst,
            TokenKind::KwConstexpr => SyntaxKind::KwConstexpr,
            TokenKind::KwContinue => SyntaxKind::KwContinue,
            TokenKind::KwDefault => SyntaxKind::KwDefault,
            TokenKind::KwDelete => SyntaxKind::KwDelete,
            TokenKind::KwDo => SyntaxKind::KwDo,
            TokenKind::KwDouble => SyntaxKind::KwDouble,
            TokenKind::KwElse => SyntaxKind::KwElse,
            TokenKind::KwEnum => SyntaxKind::KwEnum,
            TokenKind::KwExplicit => SyntaxKind::KwExplicit,
            TokenKind::KwExtern => SyntaxKind::KwExtern,
            TokenKind::KwFalse => SyntaxKind::KwFalse,
            TokenKind::KwFloat => SyntaxKind::KwFloat,
            TokenKind::KwFor => SyntaxKind::KwFor,
            TokenKind::KwFriend => SyntaxKind::KwFriend,
            TokenKind::KwGoto => SyntaxKind::KwGoto,
            TokenKind::KwIf => SyntaxKind::KwIf,
            TokenKind::KwInline => SyntaxKind::KwInline,
            TokenKind::KwInt => SyntaxKind::KwInt,
            TokenKind::KwLong => SyntaxKind::KwLong,
            TokenKind::KwMutable => SyntaxKind::KwMutable,
            TokenKind::KwNamespace => SyntaxKind::KwNamespace,
            TokenKind::KwNew => SyntaxKind::KwNew,
            TokenKind::KwNoexcept => SyntaxKind::KwNoexcept,
            TokenKind::KwNullptr => SyntaxKind::KwNullptr,
            TokenKind::KwOperator => SyntaxKind::KwOperator,
            TokenKind::KwPrivate => SyntaxKind::KwPrivate,
            TokenKind::KwProtected => SyntaxKind::KwProtected,
            TokenKind::KwPublic => SyntaxKind::KwPublic,
            TokenKind::KwRegister => SyntaxKind::KwRegister,
            TokenKind::KwReturn => SyntaxKind::KwReturn,
            TokenKind::KwShort => SyntaxKind::KwShort,
            TokenKind::KwSigned => SyntaxKind::KwSigned,
            TokenKind::KwSizeof => SyntaxKind::KwSizeof,
            TokenKind::KwStatic => SyntaxKind::KwStatic,
            TokenKind::KwStruct => SyntaxKind::KwStruct,
            TokenKind::KwSwitch => SyntaxKind::KwSwitch,
            TokenKind::KwTemplate => SyntaxKind::KwTemplate,
            TokenKind::KwThis => SyntaxKind::KwThis,
            TokenKind::KwThreadLocal => SyntaxKind::KwThreadLocal,
            TokenKind::KwTrue => SyntaxKind::KwTrue,
            TokenKind::KwTypedef => SyntaxKind::KwTypedef,
            TokenKind::KwTypename => SyntaxKind::KwTypename,
            TokenKind::KwUnion => SyntaxKind::KwUnion,
            TokenKind::KwUnsigned => SyntaxKind::KwUnsigned,
            TokenKind::KwUsing => SyntaxKind::KwUsing,
            TokenKind::KwVirtual => SyntaxKind::KwVirtual,
            TokenKind::KwVoid => SyntaxKind::KwVoid,
            TokenKind::KwVolatile => SyntaxKind::KwVolatile,
            TokenKind::KwWhile => SyntaxKind::KwWhile,
            TokenKind::Ident => SyntaxKind::Ident,
            TokenKind::Char => SyntaxKind::Char,
            TokenKind::String => SyntaxKind::String,
            TokenKind::Integer => SyntaxKind::Integer,
            TokenKind::Float => SyntaxKind::Float,
        }
    }
}
