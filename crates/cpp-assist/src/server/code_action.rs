//! Conversion between quick-fix proposals and LSP code actions.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use tower_lsp::lsp_types::{
    CodeAction, CodeActionKind, CodeActionOrCommand, CodeActionTriggerKind, TextEdit, Url,
    WorkspaceEdit,
};
use tracing::warn;

use crate::document::Document;
use crate::quickfix::{AssistReason, QuickFixOperation};

/// Payload attached to unresolved code actions.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct FixData {
    pub(crate) uri: Url,
    pub(crate) request_id: u64,
    pub(crate) index: usize,
}

pub(crate) fn assist_reason(trigger: Option<CodeActionTriggerKind>) -> AssistReason {
    if trigger == Some(CodeActionTriggerKind::AUTOMATIC) {
        AssistReason::Automatic
    } else {
        AssistReason::Explicit
    }
}

/// Whether a request restricted to `only` accepts `quickfix` actions.
pub(crate) fn accepts_quick_fixes(only: Option<&[CodeActionKind]>) -> bool {
    let Some(only) = only else {
        return true;
    };
    let quickfix_kind = CodeActionKind::QUICKFIX;
    let quickfix = quickfix_kind.as_str();
    only.iter().any(|kind| {
        let kind = kind.as_str();
        kind.is_empty()
            || quickfix == kind
            || quickfix
                .strip_prefix(kind)
                .is_some_and(|rest| rest.starts_with('.'))
    })
}

/// Edit performed by `operation`, expressed against `document`.
pub(crate) fn workspace_edit(
    document: &Document,
    operation: &QuickFixOperation,
) -> Option<WorkspaceEdit> {
    let changes = operation.perform();
    match document.text_edits_for(&changes) {
        Ok(edits) => Some(workspace_edit_for(&document.uri, edits)),
        Err(error) => {
            warn!("[quickfix] `{}` produced an invalid edit: {error}", operation.description());
            None
        },
    }
}

fn workspace_edit_for(
    uri: &Url,
    edits: Vec<TextEdit>,
) -> WorkspaceEdit {
    WorkspaceEdit {
        changes: Some(HashMap::from([(uri.clone(), edits)])),
        ..Default::default()
    }
}

/// One `quickfix` code action per operation, in proposal order.
///
/// With `lazy` the edit is left out and `data` identifies the operation for `codeAction/resolve`.
pub(crate) fn to_code_actions(
    document: &Document,
    operations: &[QuickFixOperation],
    request_id: u64,
    lazy: bool,
) -> Vec<CodeActionOrCommand> {
    operations
        .iter()
        .enumerate()
        .filter_map(|(index, operation)| {
            let mut action = CodeAction {
                title: operation.description().to_string(),
                kind: Some(CodeActionKind::QUICKFIX),
                ..Default::default()
            };
            if lazy {
                let data = FixData {
                    uri: document.uri.clone(),
                    request_id,
                    index,
                };
                action.data = serde_json::to_value(data).ok();
            } else {
                action.edit = Some(workspace_edit(document, operation)?);
            }
            Some(CodeActionOrCommand::CodeAction(action))
        })
        .collect()
}

#[cfg(test)]
#[path = "../../tests/src/server/code_action_tests.rs"]
mod tests;
