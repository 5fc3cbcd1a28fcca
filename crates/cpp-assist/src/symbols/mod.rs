mod index;
mod provider;
mod scanner;
mod types;
pub mod workspace;

pub use index::SymbolSnapshot;
pub use provider::SymbolProvider;
pub use types::{SymbolEntry, SymbolKind, SymbolLocation};
pub use workspace::{WorkspaceScanOptions, WorkspaceScanSummary, scan_workspace};
