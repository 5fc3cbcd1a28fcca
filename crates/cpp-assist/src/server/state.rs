use std::path::PathBuf;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicU64};

use dashmap::DashMap;
use tokio::sync::RwLock;
use tower_lsp::Client;
use tower_lsp::lsp_types::Url;

use crate::document::DocumentStore;
use crate::quickfix::{QuickFixAssistProvider, QuickFixOperation, QuickFixRegistry};
use crate::server::settings::ServerSettings;
use crate::symbols::SymbolProvider;
use crate::syntax::DocumentTrees;

/// Operations offered by the last code-action request for a document, kept until the client
/// resolves one of them or the document changes.
pub(crate) struct PendingFixes {
    pub(crate) request_id: u64,
    pub(crate) version: i32,
    pub(crate) operations: Vec<QuickFixOperation>,
}

/// The cpp-assist backend that implements the Language Server Protocol.
pub struct AssistLanguageServer {
    /// The LSP client handle, used to send log messages and progress back.
    pub(crate) client: Client,

    /// Thread-safe store of all open documents.
    pub(crate) document_store: Arc<DocumentStore>,

    /// Rowan-parsed syntax trees for all open documents, tagged with their version.
    pub(crate) document_trees: Arc<DocumentTrees>,

    /// Workspace-wide declarations used by quick-fix factories.
    pub(crate) symbol_provider: Arc<SymbolProvider>,

    /// Runs the registered quick-fix factories.
    pub(crate) assist_provider: QuickFixAssistProvider,

    /// Workspace root folders, populated during `initialize`.
    pub(crate) workspace_roots: RwLock<Vec<PathBuf>>,

    /// Unresolved code actions per document.
    pub(crate) pending_fixes: DashMap<Url, PendingFixes>,

    /// Monotonic id tying resolve requests to the code-action request that produced them.
    pub(crate) next_request_id: AtomicU64,

    /// Whether the client resolves `edit` lazily through `codeAction/resolve`.
    pub(crate) resolve_support: AtomicBool,

    /// Runtime server settings updated from LSP configuration.
    pub(crate) settings: Arc<RwLock<ServerSettings>>,
}

impl AssistLanguageServer {
    /// Create a server wired to the given LSP client that offers fixes from `registry`.
    pub fn new(
        client: Client,
        registry: Arc<QuickFixRegistry>,
    ) -> Self {
        let symbol_provider = Arc::new(SymbolProvider::new());
        let assist_provider = QuickFixAssistProvider::new(registry, Arc::clone(&symbol_provider));

        Self {
            client,
            document_store: Arc::new(DocumentStore::new()),
            document_trees: Arc::new(DocumentTrees::new()),
            symbol_provider,
            assist_provider,
            workspace_roots: RwLock::new(Vec::new()),
            pending_fixes: DashMap::new(),
            next_request_id: AtomicU64::new(1),
            resolve_support: AtomicBool::new(false),
            settings: Arc::new(RwLock::new(ServerSettings::default())),
        }
    }

    pub(crate) async fn settings_snapshot(&self) -> ServerSettings {
        self.settings.read().await.clone()
    }

    pub(crate) async fn apply_settings(
        &self,
        settings: ServerSettings,
    ) {
        *self.settings.write().await = settings;
    }

    /// Parse `text` as `version` of `uri` and refresh its symbols.
    pub(crate) fn reparse(
        &self,
        uri: &Url,
        version: i32,
        text: &str,
    ) {
        let tree = self.document_trees.parse_and_store(uri, version, text);
        self.symbol_provider.scan_file(uri, &tree);
        self.pending_fixes.remove(uri);
    }
}
