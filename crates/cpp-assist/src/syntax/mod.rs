pub mod ast;
pub mod cst;
pub mod cst_parser;
pub mod helpers;
pub mod kind;
pub mod lexer;

use std::sync::Arc;

use dashmap::DashMap;
use rowan::{TextRange, TextSize};
use tower_lsp::lsp_types::Url;

use crate::syntax::cst::SyntaxNode;
use crate::syntax::cst_parser::Parser;
use crate::syntax::kind::SyntaxKind;

/// One significant (non-trivia) token of a parsed document.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TokenInfo {
    pub kind: SyntaxKind,
    pub range: TextRange,
}

/// Immutable syntax snapshot for a parsed document.
///
/// Cloning is cheap: the green tree, the source text and the token table are shared.
#[derive(Clone)]
pub struct SyntaxTree {
    green: rowan::GreenNode,
    source: Arc<str>,
    tokens: Arc<[TokenInfo]>,
}

impl SyntaxTree {
    pub fn parse(source: &str) -> Self {
        let parser = Parser::new(source);
        let green = parser.parse();
        let tokens: Arc<[TokenInfo]> = SyntaxNode::new_root(green.clone())
            .descendants_with_tokens()
            .filter_map(|element| element.into_token())
            .filter(|token| !token.kind().is_trivia())
            .map(|token| TokenInfo {
                kind: token.kind(),
                range: token.text_range(),
            })
            .collect();
        Self {
            green,
            source: Arc::from(source),
            tokens,
        }
    }

    pub fn root(&self) -> SyntaxNode {
        SyntaxNode::new_root(self.green.clone())
    }

    pub fn source(&self) -> &str {
        &self.source
    }

    pub fn text_len(&self) -> TextSize {
        helpers::text_size(self.source.len())
    }

    /// Significant tokens in source order; the index is the token's stable identity.
    pub fn tokens(&self) -> &[TokenInfo] {
        &self.tokens
    }

    pub fn token(
        &self,
        index: usize,
    ) -> Option<TokenInfo> {
        self.tokens.get(index).copied()
    }

    /// Index of the significant token whose range contains `offset`.
    pub fn token_index_at(
        &self,
        offset: TextSize,
    ) -> Option<usize> {
        let index = self
            .tokens
            .partition_point(|token| token.range.end() <= offset);
        self.tokens
            .get(index)
            .filter(|token| token.range.contains(offset))
            .map(|_| index)
    }

    /// Extent of the translation unit's constructs: first to last significant token.
    ///
    /// Leading and trailing whitespace or comments are outside this range.
    pub fn significant_range(&self) -> Option<TextRange> {
        let first = self.tokens.first()?;
        let last = self.tokens.last()?;
        Some(TextRange::new(first.range.start(), last.range.end()))
    }

    pub fn has_errors(&self) -> bool {
        self.tokens
            .iter()
            .any(|token| token.kind == SyntaxKind::Error)
    }
}

impl std::fmt::Debug for SyntaxTree {
    fn fmt(
        &self,
        f: &mut std::fmt::Formatter<'_>,
    ) -> std::fmt::Result {
        f.debug_struct("SyntaxTree")
            .field("len", &self.source.len())
            .field("tokens", &self.tokens.len())
            .finish()
    }
}

/// Thread-safe store of parsed syntax trees for all open documents, tagged with the document
/// version they were parsed from.
pub struct DocumentTrees {
    snapshots: DashMap<Url, (i32, SyntaxTree)>,
}

impl DocumentTrees {
    pub fn new() -> Self {
        Self {
            snapshots: DashMap::new(),
        }
    }

    /// Full parse of a document, replacing any existing snapshot.
    pub fn parse_and_store(
        &self,
        uri: &Url,
        version: i32,
        source: &str,
    ) -> SyntaxTree {
        let tree = SyntaxTree::parse(source);
        self.snapshots
            .insert(uri.clone(), (version, tree.clone()));
        tree
    }

    pub fn insert(
        &self,
        uri: Url,
        version: i32,
        tree: SyntaxTree,
    ) {
        self.snapshots.insert(uri, (version, tree));
    }

    /// Get an Arc-cloned snapshot. No lock held after return.
    pub fn get(
        &self,
        uri: &Url,
    ) -> Option<SyntaxTree> {
        self.snapshots.get(uri).map(|entry| entry.1.clone())
    }

    /// Snapshot only if it was parsed from exactly `version`.
    pub fn get_for_version(
        &self,
        uri: &Url,
        version: i32,
    ) -> Option<SyntaxTree> {
        self.snapshots
            .get(uri)
            .filter(|entry| entry.0 == version)
            .map(|entry| entry.1.clone())
    }

    /// Snapshot together with the document version it was parsed from.
    pub fn get_versioned(
        &self,
        uri: &Url,
    ) -> Option<(i32, SyntaxTree)> {
        self.snapshots
            .get(uri)
            .map(|entry| (entry.0, entry.1.clone()))
    }

    pub fn version(
        &self,
        uri: &Url,
    ) -> Option<i32> {
        self.snapshots.get(uri).map(|entry| entry.0)
    }

    pub fn remove(
        &self,
        uri: &Url,
    ) {
        self.snapshots.remove(uri);
    }
}

impl Default for DocumentTrees {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
#[path = "../../tests/src/syntax/tree_tests.rs"]
mod tests;
