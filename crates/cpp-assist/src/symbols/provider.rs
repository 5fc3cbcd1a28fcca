use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};

use dashmap::DashMap;
use tower_lsp::lsp_types::Url;
use tracing::debug;

use crate::syntax::SyntaxTree;

use super::index::SymbolSnapshot;
use super::scanner::build_symbols;
use super::types::SymbolEntry;

/// Workspace-wide symbol index fed by per-file scans.
///
/// Readers take an [`Arc<SymbolSnapshot>`]; the snapshot is rebuilt lazily the first time it is
/// requested after a file changed.
pub struct SymbolProvider {
    files: DashMap<Url, Arc<[SymbolEntry]>>,
    generation: AtomicU64,
    cached: Mutex<Option<Arc<SymbolSnapshot>>>,
}

impl Default for SymbolProvider {
    fn default() -> Self {
        Self::new()
    }
}

impl SymbolProvider {
    pub fn new() -> Self {
        Self {
            files: DashMap::new(),
            generation: AtomicU64::new(0),
            cached: Mutex::new(None),
        }
    }

    /// Replace the symbols recorded for `uri` with the declarations of `tree`.
    pub fn scan_file(
        &self,
        uri: &Url,
        tree: &SyntaxTree,
    ) {
        let symbols = build_symbols(&tree.root());
        debug!("[symbols] {uri}: {} declarations", symbols.len());
        self.files.insert(uri.clone(), Arc::from(symbols));
        self.generation.fetch_add(1, Ordering::AcqRel);
    }

    /// Parse `source` and index it.
    pub fn scan_source(
        &self,
        uri: &Url,
        source: &str,
    ) {
        self.scan_file(uri, &SyntaxTree::parse(source));
    }

    pub fn remove_file(
        &self,
        uri: &Url,
    ) {
        if self.files.remove(uri).is_some() {
            self.generation.fetch_add(1, Ordering::AcqRel);
        }
    }

    pub fn contains_file(
        &self,
        uri: &Url,
    ) -> bool {
        self.files.contains_key(uri)
    }

    pub fn generation(&self) -> u64 {
        self.generation.load(Ordering::Acquire)
    }

    /// Current immutable view of the index.
    pub fn snapshot(&self) -> Arc<SymbolSnapshot> {
        let generation = self.generation();
        let mut cached = match self.cached.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };
        if let Some(snapshot) = cached.as_ref()
            && snapshot.generation() == generation
        {
            return Arc::clone(snapshot);
        }
        let files = self
            .files
            .iter()
            .map(|entry| (entry.key().clone(), Arc::clone(entry.value())));
        let snapshot = Arc::new(SymbolSnapshot::build(generation, files));
        *cached = Some(Arc::clone(&snapshot));
        snapshot
    }
}

#[cfg(test)]
#[path = "../../tests/src/symbols/provider_tests.rs"]
mod tests;
