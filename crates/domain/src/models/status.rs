//! UI-facing status derivation.

use serde::{Deserialize, Serialize};

use super::export_job::{RawStatus, ResultFile};

/// The closed set of statuses the UI renders.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UiStatus {
    Scheduled,
    Exporting,
    Merging,
    Completed,
    Failed,
    Expired,
    Cancelled,
}

impl UiStatus {
    /// Maps a raw status and optional result file to a UI status.
    ///
    /// A result file whose expiry is behind `now_ms` wins over everything,
    /// whatever the raw status says. Unknown raw statuses yield `None`;
    /// callers fall back to a neutral presentation, never an error.
    ///
    /// Pure: the outcome depends only on the three arguments. `now_ms` must
    /// be read at call time (see `shared::time::now_ms`); expiry is a
    /// time-dependent condition, not a stored state.
    pub fn derive(
        status: &RawStatus,
        result_file: Option<&ResultFile>,
        now_ms: i64,
    ) -> Option<UiStatus> {
        if let Some(file) = result_file {
            if file.expires_at < now_ms {
                return Some(UiStatus::Expired);
            }
        }

        match status {
            RawStatus::Scheduled | RawStatus::Request => Some(UiStatus::Scheduled),
            RawStatus::Exporting | RawStatus::Doing => Some(UiStatus::Exporting),
            RawStatus::Merging => Some(UiStatus::Merging),
            RawStatus::Done | RawStatus::Complete => Some(UiStatus::Completed),
            RawStatus::Failed | RawStatus::Error | RawStatus::SizeExceeded => {
                Some(UiStatus::Failed)
            }
            RawStatus::Cancelled => Some(UiStatus::Cancelled),
            RawStatus::Unknown(_) => None,
        }
    }
}

impl std::fmt::Display for UiStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Self::Scheduled => "scheduled",
            Self::Exporting => "exporting",
            Self::Merging => "merging",
            Self::Completed => "completed",
            Self::Failed => "failed",
            Self::Expired => "expired",
            Self::Cancelled => "cancelled",
        };
        write!(f, "{s}")
    }
}
