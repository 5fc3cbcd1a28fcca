use std::collections::HashSet;
use std::sync::Arc;

use tower_lsp::lsp_types::Url;
use tracing::debug;

use crate::symbols::SymbolProvider;
use crate::symbols::workspace::is_source_path;

use super::context::{AssistReason, EditorState};
use super::operation::QuickFixOperation;
use super::registry::QuickFixRegistry;

pub const PROVIDER_ID: &str = "cpp.quickfix";

/// Per-request switches coming from user settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuickFixOptions {
    /// Answer automatic (cursor-driven) requests. Explicit requests are always answered.
    pub automatic: bool,
    /// Factory ids to skip.
    pub disabled: HashSet<String>,
}

impl Default for QuickFixOptions {
    fn default() -> Self {
        Self {
            automatic: true,
            disabled: HashSet::new(),
        }
    }
}

/// The fixes offered for one request.
#[derive(Debug)]
pub struct AssistProposal {
    pub provider: &'static str,
    pub uri: Url,
    pub version: i32,
    pub operations: Vec<QuickFixOperation>,
}

impl AssistProposal {
    fn empty(editor: &EditorState) -> Self {
        Self {
            provider: PROVIDER_ID,
            uri: editor.uri.clone(),
            version: editor.version,
            operations: Vec::new(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.operations.is_empty()
    }

    pub fn descriptions(&self) -> Vec<&str> {
        self.operations
            .iter()
            .map(QuickFixOperation::description)
            .collect()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AssistPhase {
    Idle,
    ContextBuilding,
    Dispatching,
    Completed,
}

/// Entry point the editor integration talks to.
#[derive(Clone)]
pub struct QuickFixAssistProvider {
    registry: Arc<QuickFixRegistry>,
    symbols: Arc<SymbolProvider>,
}

impl QuickFixAssistProvider {
    pub fn new(
        registry: Arc<QuickFixRegistry>,
        symbols: Arc<SymbolProvider>,
    ) -> Self {
        Self { registry, symbols }
    }

    pub fn id(&self) -> &'static str {
        PROVIDER_ID
    }

    /// Requests complete synchronously on the caller's thread.
    pub fn is_asynchronous(&self) -> bool {
        false
    }

    pub fn supports_file(
        &self,
        uri: &Url,
    ) -> bool {
        uri.to_file_path()
            .map(|path| is_source_path(&path))
            .unwrap_or_else(|()| is_source_path(std::path::Path::new(uri.path())))
    }

    pub fn registry(&self) -> &QuickFixRegistry {
        &self.registry
    }

    pub fn create_processor(&self) -> QuickFixAssistProcessor<'_> {
        QuickFixAssistProcessor {
            provider: self,
            phase: AssistPhase::Idle,
        }
    }

    pub fn request_quick_fixes(
        &self,
        editor: &EditorState,
        reason: AssistReason,
    ) -> AssistProposal {
        self.request_quick_fixes_with(editor, reason, &QuickFixOptions::default())
    }

    pub fn request_quick_fixes_with(
        &self,
        editor: &EditorState,
        reason: AssistReason,
        options: &QuickFixOptions,
    ) -> AssistProposal {
        let mut processor = self.create_processor();
        processor
            .perform(editor, reason, options)
            .unwrap_or_else(|| AssistProposal::empty(editor))
    }
}

/// Runs a single assist request through its phases.
pub struct QuickFixAssistProcessor<'a> {
    provider: &'a QuickFixAssistProvider,
    phase: AssistPhase,
}

impl QuickFixAssistProcessor<'_> {
    pub fn phase(&self) -> AssistPhase {
        self.phase
    }

    /// Build the context and collect fixes. Returns `None` if this processor already ran.
    pub fn perform(
        &mut self,
        editor: &EditorState,
        reason: AssistReason,
        options: &QuickFixOptions,
    ) -> Option<AssistProposal> {
        if self.phase != AssistPhase::Idle {
            return None;
        }
        self.phase = AssistPhase::ContextBuilding;
        let proposal = self.run(editor, reason, options);
        self.phase = AssistPhase::Completed;
        Some(proposal)
    }

    fn run(
        &mut self,
        editor: &EditorState,
        reason: AssistReason,
        options: &QuickFixOptions,
    ) -> AssistProposal {
        if reason == AssistReason::Automatic && !options.automatic {
            debug!("[quickfix] automatic request ignored for {}", editor.uri);
            return AssistProposal::empty(editor);
        }
        let Some(ctx) = editor.build_context(self.provider.symbols.snapshot(), reason) else {
            debug!(
                "[quickfix] no current parse for {} v{} (stale: {})",
                editor.uri,
                editor.version,
                editor.has_stale_tree()
            );
            return AssistProposal::empty(editor);
        };
        debug!(
            "[quickfix] {} @{:?}: path {:?}",
            editor.uri,
            editor.cursor,
            ctx.path().kinds()
        );

        self.phase = AssistPhase::Dispatching;
        let operations = self
            .provider
            .registry
            .collect_candidates_where(&ctx, |id| !options.disabled.contains(id));
        debug!("[quickfix] {} candidate(s) for {}", operations.len(), editor.uri);

        AssistProposal {
            provider: PROVIDER_ID,
            uri: editor.uri.clone(),
            version: editor.version,
            operations,
        }
    }
}

#[cfg(test)]
#[path = "../../tests/src/quickfix/assist_tests.rs"]
mod tests;
