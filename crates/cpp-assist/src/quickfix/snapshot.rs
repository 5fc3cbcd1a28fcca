use std::sync::Arc;

use rowan::TextSize;
use tower_lsp::lsp_types::Url;

use crate::symbols::SymbolSnapshot;
use crate::syntax::SyntaxTree;

/// Parsed document plus symbol view captured for one assist request.
///
/// Holding a [`SyntaxTree`] is what makes a snapshot constructible: no snapshot exists for a
/// document without a completed parse.
#[derive(Debug, Clone)]
pub struct SemanticSnapshot {
    uri: Url,
    version: i32,
    tree: SyntaxTree,
    symbols: Arc<SymbolSnapshot>,
    cursor: TextSize,
}

impl SemanticSnapshot {
    pub fn new(
        uri: Url,
        version: i32,
        tree: SyntaxTree,
        symbols: Arc<SymbolSnapshot>,
        cursor: TextSize,
    ) -> Self {
        Self {
            uri,
            version,
            tree,
            symbols,
            cursor,
        }
    }

    pub fn uri(&self) -> &Url {
        &self.uri
    }

    pub fn version(&self) -> i32 {
        self.version
    }

    pub fn tree(&self) -> &SyntaxTree {
        &self.tree
    }

    pub fn source(&self) -> &str {
        self.tree.source()
    }

    pub fn symbols(&self) -> &SymbolSnapshot {
        &self.symbols
    }

    pub fn cursor(&self) -> TextSize {
        self.cursor
    }

    /// File path for `file://` URIs, the URI text otherwise.
    pub fn file_path(&self) -> String {
        match self.uri.to_file_path() {
            Ok(path) => path.to_string_lossy().into_owned(),
            Err(()) => self.uri.to_string(),
        }
    }
}
