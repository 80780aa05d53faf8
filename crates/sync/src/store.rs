//! Shared job store.
//!
//! Reducer-style state for the export screens: the paged job list, the
//! active data-type filter, and the one job open on a detail page. Reads
//! happen through copy-out snapshots; a revision channel tells render code
//! when a new snapshot is worth taking. All I/O failures at this layer are
//! absorbed into `last_error`; the store never retries on its own.

use std::sync::{Arc, RwLock};

use chrono::{DateTime, Utc};
use thiserror::Error;
use tokio::sync::watch;
use tracing::{info, warn};

use client::ExportApi;
use domain::models::{DataType, ExportJob, ExportRequest};
use shared::pagination::PageToken;

/// Errors surfaced to callers of [`JobStore::create`].
#[derive(Debug, Error)]
pub enum StoreError {
    /// The platform rejected the creation request.
    #[error("Export request rejected: {message}")]
    Create { message: String },
}

/// The most recent list/detail fetch failure.
#[derive(Debug, Clone, PartialEq)]
pub struct FetchFailure {
    pub message: String,
    pub at: DateTime<Utc>,
}

/// Copy-out view of the store for rendering.
#[derive(Debug, Clone, PartialEq)]
pub struct StoreSnapshot {
    /// Known jobs in server pagination order, unique by request id.
    pub items: Vec<ExportJob>,
    /// Continuation cursor; `None` means the listing is exhausted.
    pub next: Option<PageToken>,
    /// Active data-type filter.
    pub data_type: DataType,
    /// The job open on a detail page, independent of the list.
    pub current: Option<ExportJob>,
    pub is_fetching: bool,
    pub last_error: Option<FetchFailure>,
}

struct StoreState {
    items: Vec<ExportJob>,
    next: Option<PageToken>,
    data_type: DataType,
    current: Option<ExportJob>,
    is_fetching: bool,
    last_error: Option<FetchFailure>,
}

struct StoreInner {
    api: Arc<dyn ExportApi>,
    page_size: usize,
    state: RwLock<StoreState>,
    revision: watch::Sender<u64>,
}

/// Shared, cheaply clonable handle to the job store.
#[derive(Clone)]
pub struct JobStore {
    inner: Arc<StoreInner>,
}

impl JobStore {
    /// Creates a store over `api`, listing `page_size` jobs per page.
    pub fn new(api: Arc<dyn ExportApi>, page_size: usize) -> Self {
        let (revision, _) = watch::channel(0);
        Self {
            inner: Arc::new(StoreInner {
                api,
                page_size,
                state: RwLock::new(StoreState {
                    items: Vec::new(),
                    next: None,
                    data_type: DataType::Messages,
                    current: None,
                    is_fetching: false,
                    last_error: None,
                }),
                revision,
            }),
        }
    }

    /// A consistent copy of the current state.
    pub fn snapshot(&self) -> StoreSnapshot {
        let state = self.inner.state.read().unwrap();
        StoreSnapshot {
            items: state.items.clone(),
            next: state.next.clone(),
            data_type: state.data_type,
            current: state.current.clone(),
            is_fetching: state.is_fetching,
            last_error: state.last_error.clone(),
        }
    }

    /// Revision channel; the value increments on every visible change.
    pub fn subscribe(&self) -> watch::Receiver<u64> {
        self.inner.revision.subscribe()
    }

    pub fn data_type(&self) -> DataType {
        self.inner.state.read().unwrap().data_type
    }

    /// Fetches one page of jobs for the active data type.
    ///
    /// No token replaces the list; a token appends (skipping ids already
    /// present) and records the fresh cursor. On failure the data is left
    /// untouched, the fetching flag cleared, and the error recorded.
    ///
    /// Concurrent calls are not serialized: whichever response lands last
    /// wins. Callers who need replace-then-append ordering must await one
    /// call before issuing the next.
    pub async fn fetch_list(&self, token: Option<PageToken>) {
        let data_type = {
            let mut state = self.inner.state.write().unwrap();
            state.is_fetching = true;
            state.data_type
        };
        self.bump();

        let result = self
            .inner
            .api
            .list_jobs(data_type, token.as_ref(), self.inner.page_size)
            .await;

        {
            let mut state = self.inner.state.write().unwrap();
            state.is_fetching = false;
            match result {
                Ok(page) => {
                    if token.is_none() {
                        state.items = page.items;
                    } else {
                        for job in page.items {
                            if !state.items.iter().any(|j| j.request_id == job.request_id) {
                                state.items.push(job);
                            }
                        }
                    }
                    state.next = page.next;
                    state.last_error = None;
                }
                Err(e) => {
                    warn!(
                        data_type = %data_type,
                        error = %e,
                        "Failed to fetch export job list"
                    );
                    state.last_error = Some(FetchFailure {
                        message: e.to_string(),
                        at: Utc::now(),
                    });
                }
            }
        }
        self.bump();
    }

    /// Continues the listing from the stored cursor.
    ///
    /// Returns false without fetching when the listing is exhausted.
    pub async fn load_more(&self) -> bool {
        let token = self.inner.state.read().unwrap().next.clone();
        match token {
            Some(token) => {
                self.fetch_list(Some(token)).await;
                true
            }
            None => false,
        }
    }

    /// Creates a new export job, then refreshes the active listing.
    ///
    /// The created job is returned so callers can switch the filter and
    /// navigate to it. Creation failures carry the platform's message and
    /// leave the list state untouched; they are never retried here.
    pub async fn create(
        &self,
        data_type: DataType,
        request: ExportRequest,
    ) -> Result<ExportJob, StoreError> {
        let job = self
            .inner
            .api
            .create_job(data_type, &request)
            .await
            .map_err(|e| {
                warn!(data_type = %data_type, error = %e, "Failed to create export job");
                StoreError::Create {
                    message: e.user_message(),
                }
            })?;

        info!(
            request_id = %job.request_id,
            data_type = %data_type,
            "Export job created"
        );

        self.fetch_list(None).await;
        Ok(job)
    }

    /// Replaces the matching job, by request id, in the list and in the
    /// detail slot. Position in the list is preserved; a job present in
    /// neither place is a no-op. Idempotent.
    pub fn update_item(&self, job: ExportJob) {
        let mut changed = false;
        {
            let mut state = self.inner.state.write().unwrap();
            if let Some(slot) = state
                .items
                .iter_mut()
                .find(|j| j.request_id == job.request_id)
            {
                if *slot != job {
                    *slot = job.clone();
                    changed = true;
                }
            }
            if let Some(current) = state.current.as_mut() {
                if current.request_id == job.request_id && *current != job {
                    *current = job;
                    changed = true;
                }
            }
        }
        if changed {
            self.bump();
        }
    }

    /// Switches the active data-type filter.
    ///
    /// Does not refetch; callers react to the change and call
    /// [`fetch_list`](Self::fetch_list) themselves.
    pub fn set_data_type(&self, data_type: DataType) {
        {
            let mut state = self.inner.state.write().unwrap();
            if state.data_type == data_type {
                return;
            }
            state.data_type = data_type;
        }
        self.bump();
    }

    /// Fetches one job's detail into the `current` slot.
    pub async fn fetch_current(&self, request_id: &str) {
        let data_type = {
            let mut state = self.inner.state.write().unwrap();
            state.is_fetching = true;
            state.data_type
        };
        self.bump();

        let result = self.inner.api.get_job(data_type, request_id).await;

        {
            let mut state = self.inner.state.write().unwrap();
            state.is_fetching = false;
            match result {
                Ok(job) => {
                    state.current = Some(job);
                    state.last_error = None;
                }
                Err(e) => {
                    warn!(
                        request_id = %request_id,
                        error = %e,
                        "Failed to fetch export job detail"
                    );
                    state.last_error = Some(FetchFailure {
                        message: e.to_string(),
                        at: Utc::now(),
                    });
                }
            }
        }
        self.bump();
    }

    fn bump(&self) {
        self.inner.revision.send_modify(|rev| *rev += 1);
    }
}
