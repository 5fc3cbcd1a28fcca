//! Work-done progress reporting via the LSP `$/progress` notification.
//!
//! ```ignore
//! let token = ProgressToken::begin(&client, "Indexing symbols", None).await;
//! token.end(Some("42 files".into())).await;
//! ```

use std::{
    panic::AssertUnwindSafe,
    sync::atomic::{AtomicU64, Ordering},
};

use futures::FutureExt;
use tower_lsp::{Client, lsp_types::*};
use tracing::{debug, warn};

static NEXT_PROGRESS_ID: AtomicU64 = AtomicU64::new(1);
const PROGRESS_TITLE_PREFIX: &str = "cpp-assist:";

/// A handle to an active work-done progress session.
///
/// Dropping the handle without calling [`end`](Self::end) still ends the session, so the editor
/// never keeps a stuck indicator.
pub struct ProgressToken {
    client: Option<Client>,
    token: Option<NumberOrString>,
}

impl ProgressToken {
    /// Ask the client to create a token, then send `Begin`.
    ///
    /// The create request runs in the background; editors that reject it still accept the
    /// notifications.
    pub async fn begin(
        client: &Client,
        title: &str,
        message: Option<String>,
    ) -> Self {
        let id = NEXT_PROGRESS_ID.fetch_add(1, Ordering::Relaxed);
        let token = NumberOrString::String(format!("cppAssist/{title}/{id}"));
        let display_title = prefixed_progress_title(title);

        let create_client = client.clone();
        let create_token = token.clone();
        tokio::spawn(async move {
            let result = AssertUnwindSafe(create_client.send_request::<request::WorkDoneProgressCreate>(
                WorkDoneProgressCreateParams {
                    token: create_token,
                },
            ))
            .catch_unwind()
            .await;
            match result {
                Ok(Ok(())) => {},
                Ok(Err(error)) => debug!("workDoneProgress/create failed: {error}"),
                Err(_) => warn!("workDoneProgress/create panicked (client may have disconnected)"),
            }
        });

        let sent = AssertUnwindSafe(client.send_notification::<notification::Progress>(ProgressParams {
            token: token.clone(),
            value: ProgressParamsValue::WorkDone(WorkDoneProgress::Begin(WorkDoneProgressBegin {
                title: display_title.clone(),
                cancellable: Some(false),
                message,
                percentage: None,
            })),
        }))
        .catch_unwind()
        .await;

        if sent.is_err() {
            warn!("progress begin notification panicked (client may have disconnected)");
            return Self {
                client: None,
                token: None,
            };
        }
        debug!("progress begin: {display_title}");

        Self {
            client: Some(client.clone()),
            token: Some(token),
        }
    }

    pub async fn end(
        mut self,
        message: Option<String>,
    ) {
        let (Some(client), Some(token)) = (self.client.take(), self.token.take()) else {
            return;
        };
        debug!("progress end: {token:?}");
        let _ = AssertUnwindSafe(client.send_notification::<notification::Progress>(ProgressParams {
            token,
            value: ProgressParamsValue::WorkDone(WorkDoneProgress::End(WorkDoneProgressEnd { message })),
        }))
        .catch_unwind()
        .await;
    }
}

impl Drop for ProgressToken {
    fn drop(&mut self) {
        if let (Some(client), Some(token)) = (self.client.take(), self.token.take()) {
            debug!("progress cancelled (drop): {token:?}");
            tokio::spawn(async move {
                let _ = AssertUnwindSafe(client.send_notification::<notification::Progress>(ProgressParams {
                    token,
                    value: ProgressParamsValue::WorkDone(WorkDoneProgress::End(WorkDoneProgressEnd {
                        message: Some("Cancelled".to_string()),
                    })),
                }))
                .catch_unwind()
                .await;
            });
        }
    }
}

fn prefixed_progress_title(title: &str) -> String {
    let trimmed = title.trim();
    if trimmed.starts_with(PROGRESS_TITLE_PREFIX) {
        return trimmed.to_owned();
    }
    format!("{PROGRESS_TITLE_PREFIX} {trimmed}")
}

#[cfg(test)]
#[path = "../tests/src/progress_tests.rs"]
mod tests;
