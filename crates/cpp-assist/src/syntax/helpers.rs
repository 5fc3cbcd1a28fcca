//! Small node and offset utilities shared by the quick-fix layer.

use rowan::{TextRange, TextSize, TokenAtOffset};

use crate::syntax::cst::{SyntaxNode, SyntaxToken};
use crate::syntax::kind::SyntaxKind;

pub fn node_text<'a>(
    node: &SyntaxNode,
    source: &'a str,
) -> &'a str {
    slice(source, node.text_range())
}

fn slice(
    source: &str,
    range: TextRange,
) -> &str {
    source
        .get(usize::from(range.start())..usize::from(range.end()))
        .unwrap_or_default()
}

/// The token touching `offset`, preferring identifiers and literals over punctuation when the
/// offset sits between two tokens.
pub fn token_at_offset(
    root: &SyntaxNode,
    offset: TextSize,
) -> Option<SyntaxToken> {
    if offset > root.text_range().end() {
        return None;
    }
    pick_token(root.token_at_offset(offset))
}

fn pick_token(tokens: TokenAtOffset<SyntaxToken>) -> Option<SyntaxToken> {
    tokens.max_by_key(|token| match token.kind() {
        SyntaxKind::Ident => 3,
        kind if kind.is_literal() || kind.is_keyword() => 2,
        kind if kind.is_trivia() => 0,
        _ => 1,
    })
}

pub(crate) fn text_size(offset: usize) -> TextSize {
    TextSize::from(u32::try_from(offset).unwrap_or(u32::MAX))
}

#[cfg(test)]
#[path = "../../tests/src/syntax/helpers_tests.rs"]
mod tests;
