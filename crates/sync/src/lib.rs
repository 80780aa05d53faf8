//! Export job status sync engine.
//!
//! Keeps in-flight export jobs synchronized with server-side state until
//! each reaches a terminal status: the [`store::JobStore`] holds the list
//! and detail state the UI renders, the [`poller::StatusPoller`] re-fetches
//! non-terminal jobs on a fixed cadence, and terminal failures surface once
//! through the domain notifier.

pub mod config;
pub mod logging;
pub mod metrics;
pub mod poller;
pub mod store;

pub use config::{LoggingConfig, PollConfig, SyncConfig};
pub use poller::{JobUpdateHandler, PollScope, StatusPoller, StoreUpdateHandler};
pub use store::{FetchFailure, JobStore, StoreError, StoreSnapshot};
