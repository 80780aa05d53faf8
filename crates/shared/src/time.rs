//! Clock helpers.

use chrono::Utc;

/// Current time as epoch milliseconds.
///
/// Expiry derivation is time-dependent; callers must read the clock at the
/// moment of the check rather than caching an earlier value.
pub fn now_ms() -> i64 {
    Utc::now().timestamp_millis()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_now_ms_is_monotonic_enough() {
        let a = now_ms();
        let b = now_ms();
        assert!(b >= a);
        // Sanity: after 2020-01-01 in milliseconds.
        assert!(a > 1_577_836_800_000);
    }
}
