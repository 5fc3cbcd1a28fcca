use dashmap::DashMap;
use tower_lsp::lsp_types::{TextDocumentContentChangeEvent, Url};

use super::Document;
use crate::quickfix::change::{ChangeError, ChangeSet};

/// Thread-safe store of all open documents.
#[derive(Debug)]
pub struct DocumentStore {
    documents: DashMap<Url, Document>,
}

impl DocumentStore {
    pub fn new() -> Self {
        Self {
            documents: DashMap::new(),
        }
    }

    pub fn open(
        &self,
        uri: Url,
        text: String,
        version: i32,
    ) {
        self.documents
            .insert(uri.clone(), Document::new(uri, text, version));
    }

    /// Replace the full content of a document, opening it if it is not tracked yet.
    pub fn update(
        &self,
        uri: Url,
        text: String,
        version: i32,
    ) {
        if let Some(mut doc) = self.documents.get_mut(&uri) {
            doc.set_content(text, version);
        } else {
            self.documents
                .insert(uri.clone(), Document::new(uri, text, version));
        }
    }

    /// Apply incremental or full-content changes; returns the updated document.
    pub fn apply_changes(
        &self,
        uri: &Url,
        changes: Vec<TextDocumentContentChangeEvent>,
        version: i32,
    ) -> Option<Document> {
        let mut doc = self.documents.get_mut(uri)?;
        doc.apply_changes(changes, version);
        Some(doc.clone())
    }

    /// Apply a quick-fix change set to the tracked document and bump its version by one.
    ///
    /// Returns `Ok(None)` when the document is not open.
    pub fn apply_change_set(
        &self,
        uri: &Url,
        change: &ChangeSet,
    ) -> Result<Option<Document>, ChangeError> {
        let Some(mut doc) = self.documents.get_mut(uri) else {
            return Ok(None);
        };
        let next_version = doc.version + 1;
        doc.apply_change_set(change, next_version)?;
        Ok(Some(doc.clone()))
    }

    pub fn close(
        &self,
        uri: &Url,
    ) {
        self.documents.remove(uri);
    }

    pub fn get_content(
        &self,
        uri: &Url,
    ) -> Option<String> {
        self.documents.get(uri).map(|r| r.value().text.clone())
    }

    pub fn get(
        &self,
        uri: &Url,
    ) -> Option<Document> {
        self.documents.get(uri).map(|r| r.value().clone())
    }

    pub fn all_uris(&self) -> Vec<Url> {
        self.documents.iter().map(|r| r.key().clone()).collect()
    }
}

impl Default for DocumentStore {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
#[path = "../../tests/src/document/document_store_tests.rs"]
mod tests;
