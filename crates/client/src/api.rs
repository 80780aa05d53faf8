//! The export Job API as the engine sees it.

use async_trait::async_trait;

use domain::models::{DataType, ExportJob, ExportRequest};
use shared::pagination::{Page, PageToken};

use crate::error::ApiError;

/// Operations the export platform exposes for jobs.
///
/// One implementation talks HTTP ([`crate::HttpExportApi`]); tests substitute
/// scripted implementations. All operations are scoped by data type; the
/// platform namespaces jobs per exported data set.
#[async_trait]
pub trait ExportApi: Send + Sync {
    /// One page of jobs for `data_type`, newest first, in server pagination
    /// order. `token` continues a previous listing.
    async fn list_jobs(
        &self,
        data_type: DataType,
        token: Option<&PageToken>,
        limit: usize,
    ) -> Result<Page<ExportJob>, ApiError>;

    /// The current record for one job.
    async fn get_job(&self, data_type: DataType, request_id: &str)
        -> Result<ExportJob, ApiError>;

    /// Registers a new export job. The server assigns the request id and the
    /// initial (scheduling) status.
    async fn create_job(
        &self,
        data_type: DataType,
        request: &ExportRequest,
    ) -> Result<ExportJob, ApiError>;
}
