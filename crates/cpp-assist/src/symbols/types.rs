use std::fmt;

use rowan::TextRange;
use tower_lsp::lsp_types::{self, Url};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SymbolKind {
    Function,
    Struct,
    Class,
    Union,
    Enum,
    Enumerator,
    Field,
    Namespace,
    Typedef,
    Macro,
    Variable,
}

impl SymbolKind {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Function => "function",
            Self::Struct => "struct",
            Self::Class => "class",
            Self::Union => "union",
            Self::Enum => "enum",
            Self::Enumerator => "enumerator",
            Self::Field => "field",
            Self::Namespace => "namespace",
            Self::Typedef => "typedef",
            Self::Macro => "macro",
            Self::Variable => "variable",
        }
    }

    pub fn is_type(self) -> bool {
        matches!(
            self,
            Self::Struct | Self::Class | Self::Union | Self::Enum | Self::Typedef
        )
    }
}

impl fmt::Display for SymbolKind {
    fn fmt(
        &self,
        f: &mut fmt::Formatter<'_>,
    ) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<SymbolKind> for lsp_types::SymbolKind {
    fn from(kind: SymbolKind) -> Self {
        match kind {
            SymbolKind::Function => lsp_types::SymbolKind::FUNCTION,
            SymbolKind::Struct | SymbolKind::Union => lsp_types::SymbolKind::STRUCT,
            SymbolKind::Class => lsp_types::SymbolKind::CLASS,
            SymbolKind::Enum => lsp_types::SymbolKind::ENUM,
            SymbolKind::Enumerator => lsp_types::SymbolKind::ENUM_MEMBER,
            SymbolKind::Field => lsp_types::SymbolKind::FIELD,
            SymbolKind::Namespace => lsp_types::SymbolKind::NAMESPACE,
            SymbolKind::Typedef => lsp_types::SymbolKind::TYPE_PARAMETER,
            SymbolKind::Macro => lsp_types::SymbolKind::CONSTANT,
            SymbolKind::Variable => lsp_types::SymbolKind::VARIABLE,
        }
    }
}

/// A declaration found in one file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SymbolEntry {
    pub name: String,
    pub kind: SymbolKind,
    /// Range of the declared name.
    pub name_range: TextRange,
    /// Range of the whole declaration.
    pub full_range: TextRange,
    /// Enclosing namespace or record, `::`-joined.
    pub container: Option<String>,
    /// Declarations without a body (prototypes, forward declarations).
    pub is_declaration: bool,
}

impl SymbolEntry {
    pub fn qualified_name(&self) -> String {
        match &self.container {
            Some(container) => format!("{container}::{}", self.name),
            None => self.name.clone(),
        }
    }
}

/// Where a symbol is declared, as stored in the workspace index.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SymbolLocation {
    pub uri: Url,
    pub kind: SymbolKind,
    pub name_range: TextRange,
    pub container: Option<String>,
    pub is_declaration: bool,
}
