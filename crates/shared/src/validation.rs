//! Common validation utilities.

use chrono::{TimeZone, Utc};
use lazy_static::lazy_static;
use regex::Regex;
use validator::ValidationError;

lazy_static! {
    /// IANA zone names are `Area/Location` (optionally `Area/Region/Location`),
    /// each segment starting with an ASCII letter.
    static ref TIMEZONE_RE: Regex =
        Regex::new(r"^[A-Za-z][A-Za-z0-9_+\-]*(/[A-Za-z][A-Za-z0-9_+\-]*){1,2}$").unwrap();
}

/// Validates that a millisecond epoch timestamp is representable as an instant.
pub fn validate_timestamp_ms(timestamp_millis: i64) -> Result<(), ValidationError> {
    if timestamp_millis < 0 {
        let mut err = ValidationError::new("timestamp_negative");
        err.message = Some("Timestamp must not be negative".into());
        return Err(err);
    }

    match Utc.timestamp_millis_opt(timestamp_millis).single() {
        Some(_) => Ok(()),
        None => {
            let mut err = ValidationError::new("timestamp_invalid");
            err.message = Some("Invalid timestamp value".into());
            Err(err)
        }
    }
}

/// Validates that a timezone string has the shape of an IANA zone name.
///
/// Accepts `UTC` as-is; everything else must look like `Area/Location`.
/// This is a shape check only; full zone resolution is the server's job.
pub fn validate_timezone(timezone: &str) -> Result<(), ValidationError> {
    if timezone == "UTC" || TIMEZONE_RE.is_match(timezone) {
        Ok(())
    } else {
        let mut err = ValidationError::new("timezone_invalid");
        err.message = Some("Timezone must be an IANA zone name".into());
        Err(err)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_timestamp_current() {
        assert!(validate_timestamp_ms(Utc::now().timestamp_millis()).is_ok());
    }

    #[test]
    fn test_validate_timestamp_epoch() {
        assert!(validate_timestamp_ms(0).is_ok());
    }

    #[test]
    fn test_validate_timestamp_negative() {
        let err = validate_timestamp_ms(-1).unwrap_err();
        assert_eq!(err.code, "timestamp_negative");
    }

    #[test]
    fn test_validate_timezone_common_zones() {
        assert!(validate_timezone("UTC").is_ok());
        assert!(validate_timezone("Asia/Seoul").is_ok());
        assert!(validate_timezone("America/Los_Angeles").is_ok());
        assert!(validate_timezone("America/Argentina/Buenos_Aires").is_ok());
        assert!(validate_timezone("Etc/GMT+9").is_ok());
    }

    #[test]
    fn test_validate_timezone_rejects_garbage() {
        assert!(validate_timezone("").is_err());
        assert!(validate_timezone("KST").is_err());
        assert!(validate_timezone("not a zone").is_err());
        assert!(validate_timezone("/leading").is_err());
        assert!(validate_timezone("trailing/").is_err());
    }

    #[test]
    fn test_validate_timezone_error_code() {
        let err = validate_timezone("???").unwrap_err();
        assert_eq!(err.code, "timezone_invalid");
    }
}
