//! Status polling engine.
//!
//! One repeating task per non-terminal job: wait the poll interval, fetch
//! the job's current record, hand it to the update sink, continue until the
//! status is terminal. The registry is process-wide and keyed by request id,
//! with per-scope reference counting: however many surfaces observe a job,
//! it gets exactly one sequence, and the sequence dies with the last
//! interested scope.
//!
//! Fetch failures are retried on the next interval tick, indefinitely, with
//! no backoff and nothing surfaced to the user; export status is expected to
//! eventually settle. Cancellation is checked at every suspension point: a
//! cancelled sequence lets an in-flight fetch finish, then discards the
//! result without touching shared state.

use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use tokio_util::sync::CancellationToken;
use tracing::debug;

use client::ExportApi;
use domain::models::{DataType, ExportJob, RawStatus, UiStatus};
use domain::services::{ExportNotice, ExportNotifier};
use shared::time::now_ms;

use crate::metrics;
use crate::store::JobStore;

/// Delay between status fetches for one job.
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_millis(3000);

/// Sink for fresh job records fetched by a polling sequence.
#[async_trait]
pub trait JobUpdateHandler: Send + Sync {
    async fn on_updated(&self, job: ExportJob);
}

/// Default sink: writes the fresh record into the job store and raises a
/// notice when the job landed in a failed outcome.
///
/// Size-exceeded gets its dedicated notice; any other raw status mapping to
/// a failed UI status gets the generic one. The raw-status table decides;
/// the result file is deliberately left out so an already-expired file on a
/// failed job still reads as a failure. Each terminal transition is seen by
/// exactly one sequence fetch, so each notice fires at most once.
pub struct StoreUpdateHandler {
    store: JobStore,
    notifier: Arc<dyn ExportNotifier>,
}

impl StoreUpdateHandler {
    pub fn new(store: JobStore, notifier: Arc<dyn ExportNotifier>) -> Self {
        Self { store, notifier }
    }
}

#[async_trait]
impl JobUpdateHandler for StoreUpdateHandler {
    async fn on_updated(&self, job: ExportJob) {
        let request_id = job.request_id.clone();
        let status = job.status.clone();

        self.store.update_item(job);

        if matches!(status, RawStatus::SizeExceeded) {
            self.notifier
                .notify(ExportNotice::size_exceeded(request_id))
                .await;
        } else if UiStatus::derive(&status, None, now_ms()) == Some(UiStatus::Failed) {
            self.notifier
                .notify(ExportNotice::generic_failure(request_id))
                .await;
        }
    }
}

type ScopeId = u64;

struct Sequence {
    token: CancellationToken,
    /// Distinguishes this sequence from any later one for the same job, so
    /// a finished task never removes a successor's registry entry.
    generation: u64,
    watchers: HashSet<ScopeId>,
}

#[derive(Default)]
struct Registry {
    sequences: HashMap<String, Sequence>,
    generation: u64,
}

/// Process-wide polling engine.
pub struct StatusPoller {
    api: Arc<dyn ExportApi>,
    handler: Arc<dyn JobUpdateHandler>,
    interval: Duration,
    registry: Mutex<Registry>,
    next_scope: AtomicU64,
}

impl StatusPoller {
    pub fn new(api: Arc<dyn ExportApi>, handler: Arc<dyn JobUpdateHandler>) -> Arc<Self> {
        Self::with_interval(api, handler, DEFAULT_POLL_INTERVAL)
    }

    /// Engine with a custom poll cadence. Tests run at a few milliseconds.
    pub fn with_interval(
        api: Arc<dyn ExportApi>,
        handler: Arc<dyn JobUpdateHandler>,
        interval: Duration,
    ) -> Arc<Self> {
        Arc::new(Self {
            api,
            handler,
            interval,
            registry: Mutex::new(Registry::default()),
            next_scope: AtomicU64::new(0),
        })
    }

    /// A new observer scope. One per UI surface; dispose (or drop) when the
    /// surface goes away.
    pub fn scope(self: &Arc<Self>) -> PollScope {
        PollScope {
            poller: Arc::clone(self),
            id: self.next_scope.fetch_add(1, Ordering::SeqCst),
            disposed: AtomicBool::new(false),
        }
    }

    /// Number of registered polling sequences.
    pub fn active_sequences(&self) -> usize {
        self.registry.lock().unwrap().sequences.len()
    }

    /// Whether a sequence is registered for `request_id`.
    pub fn is_polling(&self, request_id: &str) -> bool {
        self.registry
            .lock()
            .unwrap()
            .sequences
            .contains_key(request_id)
    }

    fn observe_from(self: &Arc<Self>, scope: ScopeId, jobs: &[ExportJob]) {
        let mut registry = self.registry.lock().unwrap();

        for job in jobs.iter().filter(|j| j.status.is_poll_eligible()) {
            match registry.sequences.get_mut(&job.request_id) {
                Some(sequence) => {
                    sequence.watchers.insert(scope);
                }
                None => {
                    registry.generation += 1;
                    let generation = registry.generation;
                    let token = CancellationToken::new();

                    registry.sequences.insert(
                        job.request_id.clone(),
                        Sequence {
                            token: token.clone(),
                            generation,
                            watchers: HashSet::from([scope]),
                        },
                    );

                    debug!(
                        request_id = %job.request_id,
                        status = %job.status,
                        "Polling sequence started"
                    );

                    tokio::spawn(Arc::clone(self).run_sequence(
                        job.data_type,
                        job.request_id.clone(),
                        token,
                        generation,
                    ));
                }
            }
        }

        metrics::set_active_sequences(registry.sequences.len());
    }

    fn release_scope(&self, scope: ScopeId) {
        let mut registry = self.registry.lock().unwrap();

        registry.sequences.retain(|request_id, sequence| {
            sequence.watchers.remove(&scope);
            if sequence.watchers.is_empty() {
                sequence.token.cancel();
                debug!(request_id = %request_id, "Polling sequence cancelled");
                false
            } else {
                true
            }
        });

        metrics::set_active_sequences(registry.sequences.len());
    }

    /// Deregisters a sequence that ended on its own (terminal status or
    /// cancellation observed from inside the task).
    fn finish_sequence(&self, request_id: &str, generation: u64) {
        let mut registry = self.registry.lock().unwrap();

        let same_generation = registry
            .sequences
            .get(request_id)
            .map_or(false, |sequence| sequence.generation == generation);
        if same_generation {
            registry.sequences.remove(request_id);
        }

        metrics::set_active_sequences(registry.sequences.len());
    }

    async fn run_sequence(
        self: Arc<Self>,
        data_type: DataType,
        request_id: String,
        token: CancellationToken,
        generation: u64,
    ) {
        loop {
            tokio::select! {
                _ = token.cancelled() => break,
                _ = tokio::time::sleep(self.interval) => {}
            }

            let fetched = self.api.get_job(data_type, &request_id).await;

            // A disposal that raced the fetch wins: the response is
            // discarded before any shared state is touched.
            if token.is_cancelled() {
                break;
            }

            match fetched {
                Ok(job) => {
                    metrics::record_poll(data_type);
                    let terminal = job.status.is_terminal();
                    self.handler.on_updated(job).await;

                    if terminal {
                        debug!(
                            request_id = %request_id,
                            "Polling sequence reached terminal status"
                        );
                        break;
                    }
                }
                Err(e) => {
                    metrics::record_poll_failure(data_type);
                    debug!(
                        request_id = %request_id,
                        error = %e,
                        "Status fetch failed, retrying on next tick"
                    );
                }
            }
        }

        self.finish_sequence(&request_id, generation);
    }
}

/// One observer's handle on the poller.
///
/// Feeds the jobs currently visible on a surface into the engine and keeps
/// their sequences alive. Disposal (explicit or on drop) withdraws this
/// scope's interest; sequences nobody else watches are cancelled.
pub struct PollScope {
    poller: Arc<StatusPoller>,
    id: ScopeId,
    disposed: AtomicBool,
}

impl PollScope {
    /// Registers interest in every poll-eligible job in `jobs`.
    ///
    /// Safe to call on every render: jobs already being polled gain a
    /// watcher, never a second sequence.
    pub fn observe(&self, jobs: &[ExportJob]) {
        if self.disposed.load(Ordering::SeqCst) {
            return;
        }
        self.poller.observe_from(self.id, jobs);
    }

    /// Withdraws this scope's interest. Idempotent.
    pub fn dispose(&self) {
        if !self.disposed.swap(true, Ordering::SeqCst) {
            self.poller.release_scope(self.id);
        }
    }
}

impl Drop for PollScope {
    fn drop(&mut self) {
        self.dispose();
    }
}
