//! Export creation payloads.

use serde::{Deserialize, Serialize};
use validator::{Validate, ValidationError};

use shared::validation::{validate_timestamp_ms, validate_timezone};

use super::export_job::ExportFormat;

/// Upper bound for the neighboring-message context option.
pub const MAX_NEIGHBORING_MESSAGES: u32 = 100;

/// Configuration for a new export job.
///
/// Range bounds and timezone are required; the remaining fields narrow the
/// exported data set and are omitted from the wire payload when unset.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
#[validate(schema(function = "validate_export_window"))]
pub struct ExportRequest {
    /// Range start, epoch milliseconds.
    pub start_timestamp: i64,

    /// Range end, epoch milliseconds. Must not precede the start.
    pub end_timestamp: i64,

    pub format: ExportFormat,

    /// IANA zone name used to resolve day boundaries server-side.
    #[validate(custom(function = "validate_timezone"))]
    pub timezone: String,

    /// Restrict to messages sent by these users.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sender_ids: Option<Vec<String>>,

    /// Exclude messages sent by these users.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub exclude_sender_ids: Option<Vec<String>>,

    /// Restrict to these channels.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub channel_urls: Option<Vec<String>>,

    /// Exclude these channels.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub exclude_channel_urls: Option<Vec<String>>,

    /// Restrict a user export to these user ids.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user_ids: Option<Vec<String>>,

    /// Include read-receipt data in message exports.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub show_read_receipt: Option<bool>,

    /// Number of surrounding messages to include per matched message.
    #[validate(range(min = 1, max = 100, message = "neighboringMessageLimit must be 1-100"))]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub neighboring_message_limit: Option<u32>,
}

impl ExportRequest {
    /// A minimal request covering `[start, end]` in the given zone.
    pub fn new(start_timestamp: i64, end_timestamp: i64, format: ExportFormat, timezone: impl Into<String>) -> Self {
        Self {
            start_timestamp,
            end_timestamp,
            format,
            timezone: timezone.into(),
            sender_ids: None,
            exclude_sender_ids: None,
            channel_urls: None,
            exclude_channel_urls: None,
            user_ids: None,
            show_read_receipt: None,
            neighboring_message_limit: None,
        }
    }
}

fn validate_export_window(request: &ExportRequest) -> Result<(), ValidationError> {
    validate_timestamp_ms(request.start_timestamp)?;
    validate_timestamp_ms(request.end_timestamp)?;

    if request.start_timestamp > request.end_timestamp {
        let mut err = ValidationError::new("range_order");
        err.message = Some("startTimestamp must not be after endTimestamp".into());
        return Err(err);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request() -> ExportRequest {
        ExportRequest::new(
            1_716_000_000_000,
            1_716_999_999_999,
            ExportFormat::Csv,
            "Asia/Seoul",
        )
    }

    #[test]
    fn test_valid_request_passes() {
        assert!(request().validate().is_ok());
    }

    #[test]
    fn test_inverted_range_rejected() {
        let mut req = request();
        std::mem::swap(&mut req.start_timestamp, &mut req.end_timestamp);
        assert!(req.validate().is_err());
    }

    #[test]
    fn test_negative_timestamp_rejected() {
        let mut req = request();
        req.start_timestamp = -5;
        assert!(req.validate().is_err());
    }

    #[test]
    fn test_equal_bounds_allowed() {
        let mut req = request();
        req.end_timestamp = req.start_timestamp;
        assert!(req.validate().is_ok());
    }

    #[test]
    fn test_bad_timezone_rejected() {
        let mut req = request();
        req.timezone = "KST".to_string();
        assert!(req.validate().is_err());
    }

    #[test]
    fn test_neighboring_limit_bounds() {
        let mut req = request();
        req.neighboring_message_limit = Some(1);
        assert!(req.validate().is_ok());

        req.neighboring_message_limit = Some(MAX_NEIGHBORING_MESSAGES);
        assert!(req.validate().is_ok());

        req.neighboring_message_limit = Some(MAX_NEIGHBORING_MESSAGES + 1);
        assert!(req.validate().is_err());

        req.neighboring_message_limit = Some(0);
        assert!(req.validate().is_err());
    }

    #[test]
    fn test_unset_filters_skipped_on_wire() {
        let json = serde_json::to_value(request()).unwrap();
        assert!(json.get("senderIds").is_none());
        assert!(json.get("neighboringMessageLimit").is_none());
        assert_eq!(json["format"], "csv");
        assert_eq!(json["startTimestamp"], 1_716_000_000_000i64);
    }

    #[test]
    fn test_filters_serialize_camel_case() {
        let mut req = request();
        req.channel_urls = Some(vec!["desk_channel_1".to_string()]);
        req.show_read_receipt = Some(true);

        let json = serde_json::to_value(req).unwrap();
        assert_eq!(json["channelUrls"][0], "desk_channel_1");
        assert_eq!(json["showReadReceipt"], true);
    }
}
