use std::collections::HashMap;
use std::sync::Arc;

use tower_lsp::lsp_types::Url;

use crate::symbols::types::{SymbolEntry, SymbolLocation};

/// Frozen view of the workspace symbol index.
///
/// A snapshot never changes after construction; rescanning a file produces a new snapshot
/// generation instead.
#[derive(Debug, Default)]
pub struct SymbolSnapshot {
    generation: u64,
    by_name: HashMap<String, Vec<SymbolLocation>>,
    by_file: HashMap<Url, Arc<[SymbolEntry]>>,
}

impl SymbolSnapshot {
    pub(crate) fn build(
        generation: u64,
        files: impl IntoIterator<Item = (Url, Arc<[SymbolEntry]>)>,
    ) -> Self {
        let mut by_name: HashMap<String, Vec<SymbolLocation>> = HashMap::new();
        let mut by_file = HashMap::new();
        for (uri, entries) in files {
            for entry in entries.iter() {
                by_name
                    .entry(entry.name.clone())
                    .or_default()
                    .push(SymbolLocation {
                        uri: uri.clone(),
                        kind: entry.kind,
                        name_range: entry.name_range,
                        container: entry.container.clone(),
                        is_declaration: entry.is_declaration,
                    });
            }
            by_file.insert(uri, entries);
        }
        // DashMap iteration order is arbitrary; keep lookups deterministic.
        for locations in by_name.values_mut() {
            locations.sort_by(|a, b| {
                a.uri
                    .as_str()
                    .cmp(b.uri.as_str())
                    .then(a.name_range.start().cmp(&b.name_range.start()))
            });
        }
        Self {
            generation,
            by_name,
            by_file,
        }
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Every declaration of `name`, ordered by file then position.
    pub fn lookup(
        &self,
        name: &str,
    ) -> &[SymbolLocation] {
        self.by_name.get(name).map_or(&[], Vec::as_slice)
    }

    /// Declarations of `name` nested directly in `container` (`None` for the global scope).
    pub fn lookup_in(
        &self,
        name: &str,
        container: Option<&str>,
    ) -> impl Iterator<Item = &SymbolLocation> {
        self.lookup(name)
            .iter()
            .filter(move |location| location.container.as_deref() == container)
    }

    pub fn symbols_in(
        &self,
        uri: &Url,
    ) -> &[SymbolEntry] {
        self.by_file.get(uri).map_or(&[], |entries| entries)
    }

    /// Case-insensitive substring search over symbol names, sorted by name.
    pub fn search(
        &self,
        query: &str,
        limit: usize,
    ) -> Vec<(&str, &SymbolLocation)> {
        let query = query.to_lowercase();
        let mut names: Vec<&String> = self
            .by_name
            .keys()
            .filter(|name| name.to_lowercase().contains(&query))
            .collect();
        names.sort();
        names
            .into_iter()
            .flat_map(|name| {
                self.by_name[name]
                    .iter()
                    .map(move |location| (name.as_str(), location))
            })
            .take(limit)
            .collect()
    }

    pub fn file_count(&self) -> usize {
        self.by_file.len()
    }

    pub fn len(&self) -> usize {
        self.by_name.values().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.by_name.is_empty()
    }
}

#[cfg(test)]
#[path = "../../tests/src/symbols/index_tests.rs"]
mod tests;
