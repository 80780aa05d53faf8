//! Terminal-failure notices.
//!
//! When a polling sequence observes a job landing in a failed outcome, the
//! user gets told once. Notices are dismissible and do not auto-hide; the
//! consuming surface renders them with a single acknowledge action.

use serde::{Deserialize, Serialize};
use tokio::sync::mpsc;

/// Why the user is being notified.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NoticeKind {
    /// The export matched more data than the platform allows in one file.
    SizeExceeded,
    /// The export failed for any other reason.
    GenericFailure,
}

impl std::fmt::Display for NoticeKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            NoticeKind::SizeExceeded => write!(f, "size_exceeded"),
            NoticeKind::GenericFailure => write!(f, "generic_failure"),
        }
    }
}

/// A single user-facing notice about one export job.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExportNotice {
    pub kind: NoticeKind,
    pub request_id: String,
}

impl ExportNotice {
    pub fn size_exceeded(request_id: impl Into<String>) -> Self {
        Self {
            kind: NoticeKind::SizeExceeded,
            request_id: request_id.into(),
        }
    }

    pub fn generic_failure(request_id: impl Into<String>) -> Self {
        Self {
            kind: NoticeKind::GenericFailure,
            request_id: request_id.into(),
        }
    }

    /// Kind-specific user-facing copy.
    pub fn message(&self) -> &'static str {
        match self.kind {
            NoticeKind::SizeExceeded => {
                "Your data export exceeded the maximum file size. Narrow the date range and try again."
            }
            NoticeKind::GenericFailure => {
                "Your data export could not be completed. Please try again."
            }
        }
    }

    /// Notices stay on screen until acknowledged.
    pub fn auto_hide(&self) -> bool {
        false
    }
}

/// Sink for terminal-failure notices.
///
/// The engine calls [`notify`](Self::notify) at most once per distinct
/// terminal transition; implementations do not need their own deduplication.
#[async_trait::async_trait]
pub trait ExportNotifier: Send + Sync {
    async fn notify(&self, notice: ExportNotice);
}

/// Forwards notices to the embedding UI over an unbounded channel.
pub struct ChannelNotifier {
    tx: mpsc::UnboundedSender<ExportNotice>,
}

impl ChannelNotifier {
    /// Creates the notifier and the receiving end the UI drains.
    pub fn channel() -> (Self, mpsc::UnboundedReceiver<ExportNotice>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (Self { tx }, rx)
    }
}

#[async_trait::async_trait]
impl ExportNotifier for ChannelNotifier {
    async fn notify(&self, notice: ExportNotice) {
        if self.tx.send(notice.clone()).is_err() {
            // Receiver is gone; the surface that wanted the notice no longer
            // exists, so dropping it is the correct outcome.
            tracing::debug!(
                request_id = %notice.request_id,
                kind = %notice.kind,
                "Notice dropped, receiver closed"
            );
        }
    }
}

/// Logs notices instead of surfacing them. For headless embedding and tests.
#[derive(Debug, Clone, Default)]
pub struct LogNotifier;

impl LogNotifier {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait::async_trait]
impl ExportNotifier for LogNotifier {
    async fn notify(&self, notice: ExportNotice) {
        tracing::warn!(
            request_id = %notice.request_id,
            kind = %notice.kind,
            message = notice.message(),
            "Export ended in a failed outcome"
        );
    }
}
