//! Poll metrics collection.
//!
//! Records through the `metrics` facade only; wiring an exporter is the
//! embedding process's concern.

use metrics::{counter, gauge};

use domain::models::DataType;

/// Record one successful status fetch.
pub fn record_poll(data_type: DataType) {
    counter!("export_poll_total", "data_type" => data_type.as_str()).increment(1);
}

/// Record one failed status fetch (the sequence retries).
pub fn record_poll_failure(data_type: DataType) {
    counter!("export_poll_failures_total", "data_type" => data_type.as_str()).increment(1);
}

/// Track how many polling sequences are currently registered.
pub fn set_active_sequences(count: usize) {
    gauge!("export_poll_sequences_active").set(count as f64);
}
