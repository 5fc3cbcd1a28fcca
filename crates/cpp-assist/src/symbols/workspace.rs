//! Workspace discovery of C/C++ sources for the symbol index.

use std::collections::HashSet;
use std::path::{Path, PathBuf};

use tower_lsp::lsp_types::Url;
use tracing::{debug, info};
use walkdir::{DirEntry, WalkDir};

use super::provider::SymbolProvider;

pub const SOURCE_EXTENSIONS: &[&str] = &[
    "c", "cc", "cpp", "cxx", "c++", "h", "hh", "hpp", "hxx", "h++", "inl", "ipp",
];

#[derive(Debug, Clone)]
pub struct WorkspaceScanOptions {
    pub max_file_size_bytes: u64,
    /// Absolute paths, or paths relative to each workspace root.
    pub exclude_paths: Vec<String>,
}

impl Default for WorkspaceScanOptions {
    fn default() -> Self {
        Self {
            max_file_size_bytes: 512 * 1024,
            exclude_paths: Vec::new(),
        }
    }
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct WorkspaceScanSummary {
    pub indexed: usize,
    pub skipped: usize,
}

pub fn is_source_path(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| {
            SOURCE_EXTENSIONS
                .iter()
                .any(|candidate| candidate.eq_ignore_ascii_case(ext))
        })
}

/// Source files under `roots`, deduplicated, in walk order.
pub fn discover_source_files(
    roots: &[PathBuf],
    options: &WorkspaceScanOptions,
) -> Vec<PathBuf> {
    let excluded_prefixes = build_exclude_prefixes(roots, &options.exclude_paths);
    let mut files = Vec::new();
    let mut seen = HashSet::new();

    for root in roots {
        for entry in WalkDir::new(root)
            .follow_links(true)
            .sort_by_file_name()
            .into_iter()
            .filter_entry(|entry| should_descend(entry, &excluded_prefixes))
            .filter_map(|entry| entry.ok())
        {
            if !entry.file_type().is_file() || !is_source_path(entry.path()) {
                continue;
            }
            if let Ok(metadata) = entry.metadata()
                && metadata.len() > options.max_file_size_bytes
            {
                debug!(
                    "[symbols] skipping large file ({} bytes): {}",
                    metadata.len(),
                    entry.path().display()
                );
                continue;
            }
            let normalized = normalize_path(entry.path());
            if seen.insert(normalized.clone()) {
                files.push(normalized);
            }
        }
    }
    files
}

/// Index every source file under `roots` into `provider`. Blocking; run it off the async runtime.
pub fn scan_workspace(
    provider: &SymbolProvider,
    roots: &[PathBuf],
    options: &WorkspaceScanOptions,
) -> WorkspaceScanSummary {
    let mut summary = WorkspaceScanSummary::default();
    for path in discover_source_files(roots, options) {
        let Ok(uri) = Url::from_file_path(&path) else {
            summary.skipped += 1;
            continue;
        };
        match std::fs::read_to_string(&path) {
            Ok(source) => {
                provider.scan_source(&uri, &source);
                summary.indexed += 1;
            },
            Err(error) => {
                debug!("[symbols] cannot read {}: {error}", path.display());
                summary.skipped += 1;
            },
        }
    }
    info!(
        "Workspace symbol scan complete: {} file(s) indexed, {} skipped",
        summary.indexed, summary.skipped
    );
    summary
}

fn should_descend(
    entry: &DirEntry,
    excluded_prefixes: &[PathBuf],
) -> bool {
    let normalized = normalize_path(entry.path());
    if excluded_prefixes
        .iter()
        .any(|prefix| normalized.starts_with(prefix))
    {
        return false;
    }
    if !entry.file_type().is_dir() || entry.depth() == 0 {
        return true;
    }
    let Some(name) = entry.file_name().to_str() else {
        return false;
    };
    if name.starts_with('.') {
        return false;
    }
    !matches!(
        name,
        "target" | "build" | "node_modules" | "out" | "bin" | "obj" | "cmake-build-debug"
    )
}

fn build_exclude_prefixes(
    roots: &[PathBuf],
    exclude_paths: &[String],
) -> Vec<PathBuf> {
    let mut prefixes = Vec::new();
    let mut seen = HashSet::new();
    for raw in exclude_paths {
        let path = PathBuf::from(raw);
        let candidates: Vec<PathBuf> = if path.is_absolute() {
            vec![path]
        } else {
            roots.iter().map(|root| root.join(&path)).collect()
        };
        for candidate in candidates {
            let normalized = normalize_path(&candidate);
            if seen.insert(normalized.clone()) {
                prefixes.push(normalized);
            }
        }
    }
    prefixes
}

fn normalize_path(path: &Path) -> PathBuf {
    path.canonicalize().unwrap_or_else(|_| path.to_path_buf())
}

#[cfg(test)]
#[path = "../../tests/src/symbols/workspace_tests.rs"]
mod tests;
