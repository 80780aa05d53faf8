//! Export job records.

use serde::{Deserialize, Serialize};

/// The data set an export job covers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DataType {
    Messages,
    Channels,
    Users,
}

impl DataType {
    /// URL path segment for this data type.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Messages => "messages",
            Self::Channels => "channels",
            Self::Users => "users",
        }
    }
}

impl std::fmt::Display for DataType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Output format of an export.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExportFormat {
    Json,
    Csv,
}

impl std::fmt::Display for ExportFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Json => write!(f, "json"),
            Self::Csv => write!(f, "csv"),
        }
    }
}

/// Server-reported job status.
///
/// The API has been through one vocabulary change; both the current and the
/// legacy spellings still appear in responses, so both are modeled. Strings
/// outside either vocabulary are preserved verbatim as [`RawStatus::Unknown`]
/// rather than rejected, since the server may grow new statuses before this
/// client learns about them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum RawStatus {
    /// Queued, waiting for a worker (current vocabulary).
    Scheduled,
    /// Queued, waiting for a worker (legacy vocabulary).
    Request,
    /// A worker is producing output (current vocabulary).
    Exporting,
    /// A worker is producing output (legacy vocabulary).
    Doing,
    /// Partial outputs are being merged into the result file.
    Merging,
    /// Finished (current vocabulary). A missing result file means no data
    /// matched the request.
    Done,
    /// Finished (legacy vocabulary).
    Complete,
    /// Failed (current vocabulary).
    Failed,
    /// Failed (legacy vocabulary).
    Error,
    /// Cancelled before completion.
    Cancelled,
    /// Aborted because the matched data exceeded the export size limit.
    SizeExceeded,
    /// Any status string outside the known vocabularies.
    Unknown(String),
}

impl RawStatus {
    /// The wire spelling of this status.
    pub fn as_str(&self) -> &str {
        match self {
            Self::Scheduled => "scheduled",
            Self::Request => "request",
            Self::Exporting => "exporting",
            Self::Doing => "doing",
            Self::Merging => "merging",
            Self::Done => "done",
            Self::Complete => "complete",
            Self::Failed => "failed",
            Self::Error => "error",
            Self::Cancelled => "cancelled",
            Self::SizeExceeded => "size exceeded",
            Self::Unknown(s) => s,
        }
    }

    /// Whether the job will not change further on the server.
    ///
    /// Unknown statuses count as terminal: an unrecognized vocabulary must
    /// not leave a polling sequence running forever.
    pub fn is_terminal(&self) -> bool {
        !matches!(
            self,
            Self::Scheduled | Self::Request | Self::Exporting | Self::Doing | Self::Merging
        )
    }

    /// Whether observing a job in this status should start a polling
    /// sequence. Narrower than non-terminal: only scheduled- and
    /// exporting-equivalent statuses qualify.
    pub fn is_poll_eligible(&self) -> bool {
        matches!(
            self,
            Self::Scheduled | Self::Request | Self::Exporting | Self::Doing
        )
    }
}

impl From<String> for RawStatus {
    fn from(s: String) -> Self {
        match s.as_str() {
            "scheduled" => Self::Scheduled,
            "request" => Self::Request,
            "exporting" => Self::Exporting,
            "doing" => Self::Doing,
            "merging" => Self::Merging,
            "done" => Self::Done,
            "complete" => Self::Complete,
            "failed" => Self::Failed,
            "error" => Self::Error,
            "cancelled" => Self::Cancelled,
            "size exceeded" => Self::SizeExceeded,
            _ => Self::Unknown(s),
        }
    }
}

impl From<RawStatus> for String {
    fn from(status: RawStatus) -> Self {
        status.as_str().to_string()
    }
}

impl std::fmt::Display for RawStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Download descriptor for a finished export.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResultFile {
    pub url: String,

    /// Epoch milliseconds after which the download link is dead.
    #[serde(rename = "expiresAtTimestamp")]
    pub expires_at: i64,
}

/// One export request and its lifecycle state as reported by the server.
///
/// Records are only ever replaced wholesale by fresher fetches; the client
/// never mutates individual fields and never deletes a job. Link expiry is a
/// derived condition (see [`super::status::UiStatus`]), not a transition the
/// client performs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExportJob {
    /// Server-assigned unique identifier.
    pub request_id: String,

    pub data_type: DataType,

    pub status: RawStatus,

    /// Epoch milliseconds when the request was created.
    pub created_at: i64,

    /// Range start, epoch milliseconds.
    pub start_timestamp: i64,

    /// Range end, epoch milliseconds.
    pub end_timestamp: i64,

    /// IANA zone name the export was requested in.
    pub timezone: String,

    pub format: ExportFormat,

    /// Present only for terminal statuses that produced output.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub result_file: Option<ResultFile>,
}

impl ExportJob {
    /// UI-facing status at instant `now_ms`. `None` when the raw status is
    /// outside the known vocabularies.
    pub fn ui_status(&self, now_ms: i64) -> Option<super::status::UiStatus> {
        super::status::UiStatus::derive(&self.status, self.result_file.as_ref(), now_ms)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_raw_status_roundtrip() {
        for s in [
            "scheduled",
            "request",
            "exporting",
            "doing",
            "merging",
            "done",
            "complete",
            "failed",
            "error",
            "cancelled",
            "size exceeded",
        ] {
            let status = RawStatus::from(s.to_string());
            assert!(!matches!(status, RawStatus::Unknown(_)), "{s} parsed as unknown");
            assert_eq!(status.as_str(), s);
        }
    }

    #[test]
    fn test_raw_status_unknown_preserved() {
        let status = RawStatus::from("archived".to_string());
        assert_eq!(status, RawStatus::Unknown("archived".to_string()));
        assert_eq!(status.as_str(), "archived");
    }

    #[test]
    fn test_terminal_classification() {
        assert!(!RawStatus::Scheduled.is_terminal());
        assert!(!RawStatus::Request.is_terminal());
        assert!(!RawStatus::Exporting.is_terminal());
        assert!(!RawStatus::Doing.is_terminal());
        assert!(!RawStatus::Merging.is_terminal());

        assert!(RawStatus::Done.is_terminal());
        assert!(RawStatus::Complete.is_terminal());
        assert!(RawStatus::Failed.is_terminal());
        assert!(RawStatus::Error.is_terminal());
        assert!(RawStatus::Cancelled.is_terminal());
        assert!(RawStatus::SizeExceeded.is_terminal());
        assert!(RawStatus::Unknown("archived".into()).is_terminal());
    }

    #[test]
    fn test_poll_eligibility_excludes_merging() {
        assert!(RawStatus::Scheduled.is_poll_eligible());
        assert!(RawStatus::Doing.is_poll_eligible());
        assert!(!RawStatus::Merging.is_poll_eligible());
        assert!(!RawStatus::Done.is_poll_eligible());
        assert!(!RawStatus::Unknown("archived".into()).is_poll_eligible());
    }

    #[test]
    fn test_export_job_deserialize() {
        let json = json!({
            "requestId": "req_7f3a",
            "dataType": "messages",
            "status": "exporting",
            "createdAt": 1717000000000i64,
            "startTimestamp": 1716000000000i64,
            "endTimestamp": 1716999999999i64,
            "timezone": "Asia/Seoul",
            "format": "csv"
        });

        let job: ExportJob = serde_json::from_value(json).unwrap();
        assert_eq!(job.request_id, "req_7f3a");
        assert_eq!(job.data_type, DataType::Messages);
        assert_eq!(job.status, RawStatus::Exporting);
        assert_eq!(job.format, ExportFormat::Csv);
        assert!(job.result_file.is_none());
    }

    #[test]
    fn test_export_job_result_file_fields() {
        let json = json!({
            "requestId": "req_7f3a",
            "dataType": "channels",
            "status": "done",
            "createdAt": 1717000000000i64,
            "startTimestamp": 1716000000000i64,
            "endTimestamp": 1716999999999i64,
            "timezone": "UTC",
            "format": "json",
            "resultFile": {
                "url": "https://files.example.com/exports/req_7f3a.zip",
                "expiresAtTimestamp": 1717600000000i64
            }
        });

        let job: ExportJob = serde_json::from_value(json).unwrap();
        let file = job.result_file.unwrap();
        assert_eq!(file.expires_at, 1717600000000);

        // Serializing keeps the wire field names.
        let back = serde_json::to_value(ExportJob {
            result_file: Some(file),
            ..serde_json::from_value(json!({
                "requestId": "r",
                "dataType": "users",
                "status": "done",
                "createdAt": 0,
                "startTimestamp": 0,
                "endTimestamp": 0,
                "timezone": "UTC",
                "format": "json"
            }))
            .unwrap()
        })
        .unwrap();
        assert!(back["resultFile"]["expiresAtTimestamp"].is_i64());
    }

    #[test]
    fn test_data_type_path_segment() {
        assert_eq!(DataType::Messages.as_str(), "messages");
        assert_eq!(DataType::Channels.as_str(), "channels");
        assert_eq!(DataType::Users.as_str(), "users");
    }
}
