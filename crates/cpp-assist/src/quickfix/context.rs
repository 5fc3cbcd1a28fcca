use std::sync::Arc;

use rowan::{TextRange, TextSize};
use tower_lsp::lsp_types::Url;

use crate::source_location::SourceLocation;
use crate::symbols::{SymbolSnapshot, SymbolLocation};
use crate::syntax::cst::{SyntaxNode, SyntaxToken};
use crate::syntax::{SyntaxTree, TokenInfo, helpers};

use super::path::AstPath;
use super::snapshot::SemanticSnapshot;

/// Why the editor asked for quick fixes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AssistReason {
    /// The user invoked the quick-fix command.
    Explicit,
    /// The editor polled on cursor movement or idle.
    Automatic,
}

/// What the editor knows about a document when it asks for fixes.
#[derive(Debug, Clone)]
pub struct EditorState {
    pub uri: Url,
    pub version: i32,
    pub cursor: TextSize,
    pub selection: Option<TextRange>,
    parsed: Option<(i32, SyntaxTree)>,
}

impl EditorState {
    pub fn new(
        uri: Url,
        version: i32,
        cursor: TextSize,
    ) -> Self {
        Self {
            uri,
            version,
            cursor,
            selection: None,
            parsed: None,
        }
    }

    /// Attach the parse of document version `tree_version`.
    pub fn with_tree(
        mut self,
        tree_version: i32,
        tree: SyntaxTree,
    ) -> Self {
        self.parsed = Some((tree_version, tree));
        self
    }

    pub fn with_selection(
        mut self,
        selection: TextRange,
    ) -> Self {
        self.selection = Some(selection);
        self
    }

    /// The parse, only when it was produced from the current document version.
    pub fn current_tree(&self) -> Option<&SyntaxTree> {
        self.parsed
            .as_ref()
            .filter(|(tree_version, _)| *tree_version == self.version)
            .map(|(_, tree)| tree)
    }

    pub fn has_stale_tree(&self) -> bool {
        self.parsed.is_some() && self.current_tree().is_none()
    }

    /// Capture the snapshot factories will see. `None` without a current parse.
    pub fn snapshot(
        &self,
        symbols: Arc<SymbolSnapshot>,
    ) -> Option<SemanticSnapshot> {
        let tree = self.current_tree()?.clone();
        Some(SemanticSnapshot::new(
            self.uri.clone(),
            self.version,
            tree,
            symbols,
            self.cursor,
        ))
    }

    /// Capture a snapshot and resolve the path under the cursor. `None` without a current parse.
    pub fn build_context(
        &self,
        symbols: Arc<SymbolSnapshot>,
        reason: AssistReason,
    ) -> Option<QuickFixContext> {
        let snapshot = self.snapshot(symbols)?;
        Some(QuickFixContext::new(snapshot, self.selection, reason))
    }
}

/// Everything a quick-fix factory may inspect for one request.
///
/// Built once per request and shared read-only by every factory. Editing the document afterwards
/// does not change a built context.
#[derive(Debug)]
pub struct QuickFixContext {
    snapshot: SemanticSnapshot,
    path: AstPath,
    selection: Option<TextRange>,
    reason: AssistReason,
}

impl QuickFixContext {
    pub fn new(
        snapshot: SemanticSnapshot,
        selection: Option<TextRange>,
        reason: AssistReason,
    ) -> Self {
        let path = AstPath::resolve(snapshot.tree(), snapshot.cursor());
        Self {
            snapshot,
            path,
            selection,
            reason,
        }
    }

    pub fn path(&self) -> &AstPath {
        &self.path
    }

    pub fn snapshot(&self) -> &SemanticSnapshot {
        &self.snapshot
    }

    pub fn reason(&self) -> AssistReason {
        self.reason
    }

    pub fn cursor(&self) -> TextSize {
        self.snapshot.cursor()
    }

    pub fn selection(&self) -> Option<TextRange> {
        self.selection
    }

    pub fn uri(&self) -> &Url {
        self.snapshot.uri()
    }

    pub fn tree(&self) -> &SyntaxTree {
        self.snapshot.tree()
    }

    pub fn source(&self) -> &str {
        self.snapshot.source()
    }

    // ── cursor predicates ──────────────────────────────────────────────

    /// Whether the cursor lies in `[start, end)` of the significant token at `index`.
    pub fn is_cursor_on_token(
        &self,
        index: usize,
    ) -> bool {
        self.tree()
            .token(index)
            .is_some_and(|token| token.range.contains(self.cursor()))
    }

    pub fn is_cursor_on(
        &self,
        token: &SyntaxToken,
    ) -> bool {
        token.text_range().contains(self.cursor())
    }

    pub fn is_cursor_on_node(
        &self,
        node: &SyntaxNode,
    ) -> bool {
        node.text_range().contains(self.cursor())
    }

    /// Index of the significant token under the cursor.
    pub fn cursor_token_index(&self) -> Option<usize> {
        self.tree().token_index_at(self.cursor())
    }

    pub fn cursor_token(&self) -> Option<TokenInfo> {
        self.cursor_token_index()
            .and_then(|index| self.tree().token(index))
    }

    /// The tree token touching the cursor. Between two tokens, identifiers and literals win over
    /// punctuation, so a cursor right after a name still finds the name.
    pub fn token_at_cursor(&self) -> Option<SyntaxToken> {
        helpers::token_at_offset(&self.tree().root(), self.cursor())
    }

    // ── text & symbols ─────────────────────────────────────────────────

    pub fn text_of(
        &self,
        node: &SyntaxNode,
    ) -> &str {
        helpers::node_text(node, self.source())
    }

    pub fn text_in(
        &self,
        range: TextRange,
    ) -> &str {
        self.source()
            .get(usize::from(range.start())..usize::from(range.end()))
            .unwrap_or_default()
    }

    pub fn cursor_location(&self) -> Option<SourceLocation> {
        SourceLocation::from_offset(&self.snapshot.file_path(), self.source(), self.cursor())
    }

    pub fn location_of(
        &self,
        offset: TextSize,
    ) -> Option<SourceLocation> {
        SourceLocation::from_offset(&self.snapshot.file_path(), self.source(), offset)
    }

    pub fn symbols(&self) -> &SymbolSnapshot {
        self.snapshot.symbols()
    }

    pub fn lookup(
        &self,
        name: &str,
    ) -> &[SymbolLocation] {
        self.snapshot.symbols().lookup(name)
    }
}

#[cfg(test)]
#[path = "../../tests/src/quickfix/context_tests.rs"]
mod tests;
