//! `reqwest` implementation of the Job API.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use tracing::debug;
use validator::Validate;

use domain::models::{DataType, ExportJob, ExportRequest};
use shared::pagination::{Page, PageToken};

use crate::api::ExportApi;
use crate::error::ApiError;

/// Default per-request timeout in seconds.
const DEFAULT_TIMEOUT_SECS: u64 = 10;

/// Connection settings for the export platform.
#[derive(Debug, Clone, Deserialize)]
pub struct ApiConfig {
    /// Platform origin, e.g. `https://api.desk.example.com`.
    pub base_url: String,

    /// Application API token, sent as the `Api-Token` header.
    pub api_token: String,

    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

fn default_timeout_secs() -> u64 {
    DEFAULT_TIMEOUT_SECS
}

/// Wire shape of a job listing.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ListJobsResponse {
    jobs: Vec<ExportJob>,
    #[serde(default)]
    next_cursor: Option<String>,
}

/// Wire shape of a platform error body.
#[derive(Debug, Deserialize)]
struct ErrorBody {
    #[serde(default)]
    code: Option<i64>,
    #[serde(default)]
    message: Option<String>,
}

/// HTTP client for the export Job API.
pub struct HttpExportApi {
    client: Client,
    base_url: String,
    api_token: String,
}

impl HttpExportApi {
    /// Builds the client with the configured per-request timeout.
    pub fn new(config: ApiConfig) -> Self {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .expect("Failed to create HTTP client");

        Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            api_token: config.api_token,
        }
    }

    fn export_url(&self, data_type: DataType) -> String {
        format!("{}/v3/export/{}", self.base_url, data_type)
    }

    fn job_url(&self, data_type: DataType, request_id: &str) -> String {
        format!("{}/{}", self.export_url(data_type), request_id)
    }

    /// Reads the response body and decodes it as `T`, mapping non-2xx
    /// statuses to [`ApiError::Api`] with the platform error body when one
    /// is present.
    async fn decode<T: serde::de::DeserializeOwned>(
        response: reqwest::Response,
    ) -> Result<T, ApiError> {
        let status = response.status();
        let body = response.text().await?;

        if !status.is_success() {
            let parsed: Option<ErrorBody> = serde_json::from_str(&body).ok();
            let (code, message) = match parsed {
                Some(ErrorBody { code, message }) => {
                    (code, message.unwrap_or_else(|| body.clone()))
                }
                None => (None, body),
            };
            return Err(ApiError::Api {
                status: status.as_u16(),
                code,
                message,
            });
        }

        Ok(serde_json::from_str(&body)?)
    }
}

#[async_trait]
impl ExportApi for HttpExportApi {
    async fn list_jobs(
        &self,
        data_type: DataType,
        token: Option<&PageToken>,
        limit: usize,
    ) -> Result<Page<ExportJob>, ApiError> {
        let mut request = self
            .client
            .get(self.export_url(data_type))
            .header("Api-Token", &self.api_token)
            .query(&[("limit", limit.to_string())]);

        if let Some(token) = token {
            request = request.query(&[("token", token.as_str())]);
        }

        let response = request.send().await?;
        let listing: ListJobsResponse = Self::decode(response).await?;

        debug!(
            data_type = %data_type,
            count = listing.jobs.len(),
            "Listed export jobs"
        );

        Ok(Page::new(listing.jobs, listing.next_cursor))
    }

    async fn get_job(
        &self,
        data_type: DataType,
        request_id: &str,
    ) -> Result<ExportJob, ApiError> {
        let response = self
            .client
            .get(self.job_url(data_type, request_id))
            .header("Api-Token", &self.api_token)
            .send()
            .await?;

        Self::decode(response).await
    }

    async fn create_job(
        &self,
        data_type: DataType,
        request: &ExportRequest,
    ) -> Result<ExportJob, ApiError> {
        // Reject malformed payloads before anything goes on the wire.
        request.validate()?;

        let response = self
            .client
            .post(self.export_url(data_type))
            .header("Api-Token", &self.api_token)
            .json(request)
            .send()
            .await?;

        let job: ExportJob = Self::decode(response).await?;

        debug!(
            data_type = %data_type,
            request_id = %job.request_id,
            "Created export job"
        );

        Ok(job)
    }
}
