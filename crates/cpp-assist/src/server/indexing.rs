use std::path::PathBuf;
use std::sync::Arc;

use tokio::sync::RwLock;
use tower_lsp::Client;
use tracing::{info, warn};

use crate::progress::ProgressToken;
use crate::server::settings::ServerSettings;
use crate::server::state::AssistLanguageServer;
use crate::symbols::{SymbolProvider, scan_workspace};

impl AssistLanguageServer {
    pub(crate) async fn clone_for_background(&self) -> BackgroundHandle {
        BackgroundHandle {
            client: self.client.clone(),
            symbol_provider: Arc::clone(&self.symbol_provider),
            workspace_roots: self.workspace_roots.read().await.clone(),
            settings: Arc::clone(&self.settings),
        }
    }
}

/// What a background workspace scan needs, detached from the server borrow.
pub(crate) struct BackgroundHandle {
    client: Client,
    symbol_provider: Arc<SymbolProvider>,
    workspace_roots: Vec<PathBuf>,
    settings: Arc<RwLock<ServerSettings>>,
}

impl BackgroundHandle {
    /// Index every C/C++ source file of the workspace on the blocking pool.
    pub(crate) async fn index_workspace(self) {
        let settings = self.settings.read().await.clone();
        if !settings.indexing.enabled {
            info!("Skipping workspace scan because cpp-assist.indexing.enabled=false");
            return;
        }
        if self.workspace_roots.is_empty() {
            info!("Skipping workspace scan: no workspace roots");
            return;
        }

        let progress = ProgressToken::begin(&self.client, "Indexing symbols", None).await;
        let options = settings.indexing.scan_options();
        let provider = Arc::clone(&self.symbol_provider);
        let roots = self.workspace_roots;
        let result =
            tokio::task::spawn_blocking(move || scan_workspace(&provider, &roots, &options)).await;

        match result {
            Ok(summary) => {
                progress
                    .end(Some(format!("{} file(s) indexed", summary.indexed)))
                    .await;
            },
            Err(error) => {
                warn!("Workspace symbol scan failed: {error}");
                progress.end(Some("Indexing failed".to_string())).await;
            },
        }
    }
}
