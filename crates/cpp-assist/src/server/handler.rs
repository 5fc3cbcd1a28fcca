use std::{panic::AssertUnwindSafe, path::PathBuf, sync::atomic::Ordering};

use futures::FutureExt;
use tower_lsp::{LanguageServer, jsonrpc::Result, lsp_types::*};
use tracing::{debug, info};

use crate::{
    quickfix::EditorState,
    server::{
        code_action::{FixData, accepts_quick_fixes, assist_reason, to_code_actions, workspace_edit},
        settings::ServerSettings,
        state::{AssistLanguageServer, PendingFixes},
    },
    syntax::helpers::text_size,
};

const CLIENT_NOTIFICATION_PREFIX: &str = "cpp-assist:";

#[tower_lsp::async_trait]
impl LanguageServer for AssistLanguageServer {
    async fn initialize(
        &self,
        params: InitializeParams,
    ) -> Result<InitializeResult> {
        info!("Initializing cpp-assist...");

        let initial_settings = ServerSettings::from_lsp_payload(params.initialization_options.as_ref());
        self.apply_settings(initial_settings).await;

        let roots: Vec<PathBuf> = if let Some(folders) = &params.workspace_folders {
            folders
                .iter()
                .filter_map(|folder| folder.uri.to_file_path().ok())
                .collect()
        } else {
            params
                .root_uri
                .iter()
                .filter_map(|uri| uri.to_file_path().ok())
                .collect()
        };
        *self.workspace_roots.write().await = roots;

        let resolves_edits = params
            .capabilities
            .text_document
            .as_ref()
            .and_then(|text_document| text_document.code_action.as_ref())
            .and_then(|code_action| code_action.resolve_support.as_ref())
            .is_some_and(|support| support.properties.iter().any(|property| property == "edit"));
        self.resolve_support.store(resolves_edits, Ordering::Relaxed);

        Ok(InitializeResult {
            capabilities: ServerCapabilities {
                text_document_sync: Some(TextDocumentSyncCapability::Kind(TextDocumentSyncKind::INCREMENTAL)),
                code_action_provider: Some(CodeActionProviderCapability::Options(CodeActionOptions {
                    code_action_kinds: Some(vec![CodeActionKind::QUICKFIX]),
                    resolve_provider: Some(resolves_edits),
                    work_done_progress_options: Default::default(),
                })),
                ..Default::default()
            },
            server_info: Some(ServerInfo {
                name: "cpp-assist".to_string(),
                version: Some(env!("CARGO_PKG_VERSION").to_string()),
            }),
        })
    }

    async fn initialized(
        &self,
        _: InitializedParams,
    ) {
        info!("cpp-assist initialized");

        let handle = self.clone_for_background().await;
        tokio::spawn(async move {
            handle.index_workspace().await;
        });
    }

    async fn did_change_configuration(
        &self,
        params: DidChangeConfigurationParams,
    ) {
        let current = self.settings_snapshot().await;
        let merged = current.merged_with_payload(&params.settings);
        if merged == current {
            return;
        }

        let should_rescan = merged.indexing.enabled && merged.indexing != current.indexing;
        self.apply_settings(merged).await;
        info!("Applied updated cpp-assist settings");

        if should_rescan {
            let handle = self.clone_for_background().await;
            tokio::spawn(async move {
                handle.index_workspace().await;
            });
        }
    }

    async fn shutdown(&self) -> Result<()> {
        info!("Shutting down cpp-assist");
        self.pending_fixes.clear();
        Ok(())
    }

    async fn did_open(
        &self,
        params: DidOpenTextDocumentParams,
    ) {
        let uri = params.text_document.uri;
        let text = params.text_document.text;
        let version = params.text_document.version;
        let filename = short_name(&uri);

        info!("Opened {filename} (v{version}, {} bytes)", text.len());
        self.log_to_client(format!("Opened {filename}")).await;

        self.document_store.open(uri.clone(), text.clone(), version);
        self.reparse(&uri, version, &text);
    }

    async fn did_change(
        &self,
        params: DidChangeTextDocumentParams,
    ) {
        let uri = params.text_document.uri;
        let version = params.text_document.version;

        let Some(document) = self
            .document_store
            .apply_changes(&uri, params.content_changes, version)
        else {
            debug!("Change for unopened document {uri}");
            return;
        };
        self.reparse(&uri, document.version, &document.text);
    }

    async fn did_close(
        &self,
        params: DidCloseTextDocumentParams,
    ) {
        let uri = params.text_document.uri;
        self.document_store.close(&uri);
        self.document_trees.remove(&uri);
        self.pending_fixes.remove(&uri);

        // Fall back to the saved file so workspace lookups keep seeing it.
        let on_disk = uri
            .to_file_path()
            .ok()
            .and_then(|path| std::fs::read_to_string(path).ok());
        match on_disk {
            Some(text) => self.symbol_provider.scan_source(&uri, &text),
            None => self.symbol_provider.remove_file(&uri),
        }
    }

    async fn code_action(
        &self,
        params: CodeActionParams,
    ) -> Result<Option<CodeActionResponse>> {
        let settings = self.settings_snapshot().await;
        if !settings.quick_fix.enabled || !accepts_quick_fixes(params.context.only.as_deref()) {
            return Ok(None);
        }

        let uri = params.text_document.uri;
        if !self.assist_provider.supports_file(&uri) {
            return Ok(None);
        }
        let Some(document) = self.document_store.get(&uri) else {
            return Ok(None);
        };
        let Some(cursor) = document.offset_of(params.range.start) else {
            return Ok(None);
        };

        let mut editor = EditorState::new(uri.clone(), document.version, text_size(cursor));
        if let Some((tree_version, tree)) = self.document_trees.get_versioned(&uri) {
            editor = editor.with_tree(tree_version, tree);
        }
        if let Some(selection) = document.text_range_of(params.range)
            && !selection.is_empty()
        {
            editor = editor.with_selection(selection);
        }

        let reason = assist_reason(params.context.trigger_kind);
        let proposal = self
            .assist_provider
            .request_quick_fixes_with(&editor, reason, &settings.quick_fix.options());
        if proposal.is_empty() {
            return Ok(None);
        }

        let request_id = self.next_request_id.fetch_add(1, Ordering::Relaxed);
        let lazy = self.resolve_support.load(Ordering::Relaxed);
        let actions = to_code_actions(&document, &proposal.operations, request_id, lazy);
        debug!(
            "[quickfix] {} action(s) from {} for {} (lazy: {lazy})",
            actions.len(),
            proposal.provider,
            short_name(&uri)
        );
        if lazy {
            self.pending_fixes.insert(
                uri,
                PendingFixes {
                    request_id,
                    version: proposal.version,
                    operations: proposal.operations,
                },
            );
        }
        Ok(Some(actions))
    }

    async fn code_action_resolve(
        &self,
        mut action: CodeAction,
    ) -> Result<CodeAction> {
        let Some(data) = action
            .data
            .clone()
            .and_then(|data| serde_json::from_value::<FixData>(data).ok())
        else {
            return Ok(action);
        };
        let Some(document) = self.document_store.get(&data.uri) else {
            return Ok(action);
        };
        let Some(pending) = self.pending_fixes.get(&data.uri) else {
            return Ok(action);
        };
        if pending.request_id != data.request_id || pending.version != document.version {
            debug!("[quickfix] stale resolve for {}", short_name(&data.uri));
            return Ok(action);
        }
        if let Some(operation) = pending.operations.get(data.index) {
            action.edit = workspace_edit(&document, operation);
        }
        Ok(action)
    }
}

impl AssistLanguageServer {
    async fn log_to_client(
        &self,
        message: String,
    ) {
        if !self.settings_snapshot().await.logging.level.allows_info() {
            return;
        }
        let _ = AssertUnwindSafe(
            self.client
                .log_message(MessageType::INFO, prefixed_client_message(message)),
        )
        .catch_unwind()
        .await;
    }
}

fn short_name(uri: &Url) -> String {
    uri.path().rsplit('/').next().unwrap_or(uri.path()).to_owned()
}

fn prefixed_client_message(message: impl AsRef<str>) -> String {
    format!("{CLIENT_NOTIFICATION_PREFIX} {}", message.as_ref())
}
