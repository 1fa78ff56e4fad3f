//! BigQuery REST API client.

use async_trait::async_trait;
use forecast_common::{ResultSet, Statement};
use serde::de::DeserializeOwned;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info, instrument, warn};

use crate::auth::TokenProvider;
use crate::decode;
use crate::error::{WarehouseError, WarehouseResult};
use crate::wire::{ApiErrorEnvelope, JobReference, QueryRequestBody, QueryResponse};
use crate::Warehouse;

/// Public BigQuery v2 endpoint.
pub const DEFAULT_ENDPOINT: &str = "https://bigquery.googleapis.com/bigquery/v2";

/// Connection settings for [`BigQueryClient`].
#[derive(Debug, Clone)]
pub struct BigQueryConfig {
    /// Base URL of the v2 REST API.
    pub endpoint: String,
    /// Project that runs (and is billed for) query jobs.
    pub project_id: String,
    /// Dataset location, when not the multi-region default.
    pub location: Option<String>,
    /// How long each API call waits server-side for the job to finish.
    pub query_timeout_ms: u64,
    /// Client-side limit for a single HTTP exchange. `None` waits indefinitely.
    pub request_timeout: Option<Duration>,
}

impl BigQueryConfig {
    pub fn new(project_id: impl Into<String>) -> Self {
        Self {
            endpoint: DEFAULT_ENDPOINT.to_string(),
            project_id: project_id.into(),
            location: None,
            query_timeout_ms: 10_000,
            request_timeout: None,
        }
    }

    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = endpoint.into().trim_end_matches('/').to_string();
        self
    }

    pub fn with_location(mut self, location: Option<String>) -> Self {
        self.location = location;
        self
    }
}

/// Runs statements through `jobs.query`, waiting for completion and reading
/// every result page through `jobs.getQueryResults`.
///
/// The underlying `reqwest::Client` pools connections and is safe to share
/// between concurrent requests.
pub struct BigQueryClient {
    http: reqwest::Client,
    config: BigQueryConfig,
    auth: Arc<dyn TokenProvider>,
}

impl BigQueryClient {
    pub fn new(config: BigQueryConfig, auth: Arc<dyn TokenProvider>) -> WarehouseResult<Self> {
        let mut builder = reqwest::Client::builder();
        if let Some(timeout) = config.request_timeout {
            builder = builder.timeout(timeout);
        }
        let http = builder.build()?;

        Ok(Self { http, config, auth })
    }

    pub fn config(&self) -> &BigQueryConfig {
        &self.config
    }

    async fn send<T: DeserializeOwned>(&self, request: reqwest::RequestBuilder) -> WarehouseResult<T> {
        let request = match self.auth.token().await? {
            Some(token) => request.bearer_auth(token),
            None => request,
        };

        let response = request.send().await?;
        let status = response.status();
        let body = response.text().await?;

        if !status.is_success() {
            let message = serde_json::from_str::<ApiErrorEnvelope>(&body)
                .map(|e| e.error.message)
                .ok()
                .filter(|m| !m.is_empty())
                .unwrap_or(body);
            return Err(WarehouseError::Api {
                status: status.as_u16(),
                message,
            });
        }

        Ok(serde_json::from_str(&body)?)
    }

    async fn start_query(&self, statement: &Statement) -> WarehouseResult<QueryResponse> {
        let url = format!(
            "{}/projects/{}/queries",
            self.config.endpoint, self.config.project_id
        );
        let body = QueryRequestBody::from_statement(
            statement,
            self.config.query_timeout_ms,
            self.config.location.clone(),
        );
        self.send(self.http.post(url).json(&body)).await
    }

    async fn query_results(
        &self,
        job: &JobReference,
        page_token: Option<&str>,
    ) -> WarehouseResult<QueryResponse> {
        let url = format!(
            "{}/projects/{}/queries/{}",
            self.config.endpoint, job.project_id, job.job_id
        );

        let mut params: Vec<(&str, String)> = vec![
            ("timeoutMs", self.config.query_timeout_ms.to_string()),
            ("formatOptions.useInt64Timestamp", "true".to_string()),
        ];
        if let Some(location) = job.location.as_ref().or(self.config.location.as_ref()) {
            params.push(("location", location.clone()));
        }
        if let Some(token) = page_token {
            params.push(("pageToken", token.to_string()));
        }

        self.send(self.http.get(url).query(&params)).await
    }
}

fn job_reference(response: &QueryResponse) -> WarehouseResult<JobReference> {
    response
        .job_reference
        .clone()
        .ok_or_else(|| WarehouseError::Decode("response is missing jobReference".to_string()))
}

#[async_trait]
impl Warehouse for BigQueryClient {
    #[instrument(skip_all, fields(project = %self.config.project_id))]
    async fn execute(&self, statement: &Statement) -> WarehouseResult<ResultSet> {
        let mut response = self.start_query(statement).await?;

        while !response.is_complete() {
            let job = job_reference(&response)?;
            debug!(job_id = %job.job_id, "Waiting for query job");
            response = self.query_results(&job, None).await?;
        }

        for error in &response.errors {
            warn!(
                reason = error.reason.as_deref().unwrap_or(""),
                message = error.message.as_deref().unwrap_or(""),
                "Query job reported an error"
            );
        }

        let fields = response.schema.take().unwrap_or_default().fields;
        let mut result = ResultSet::new(decode::columns(&fields));
        for row in &response.rows {
            result.push_row(decode::row(&fields, row)?);
        }

        let mut page_token = response.page_token.take();
        while let Some(token) = page_token {
            let job = job_reference(&response)?;
            debug!(job_id = %job.job_id, rows = result.len(), "Fetching next result page");
            let page = self.query_results(&job, Some(&token)).await?;
            for row in &page.rows {
                result.push_row(decode::row(&fields, row)?);
            }
            page_token = page.page_token;
        }

        info!(
            rows = result.len(),
            columns = result.columns().len(),
            "Query completed"
        );
        Ok(result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_defaults() {
        let config = BigQueryConfig::new("billing-project");
        assert_eq!(config.endpoint, DEFAULT_ENDPOINT);
        assert_eq!(config.query_timeout_ms, 10_000);
        assert!(config.location.is_none());
        assert!(config.request_timeout.is_none());
    }

    #[test]
    fn test_endpoint_trailing_slash_trimmed() {
        let config = BigQueryConfig::new("p").with_endpoint("http://localhost:9050/bigquery/v2/");
        assert_eq!(config.endpoint, "http://localhost:9050/bigquery/v2");
    }
}
