use std::time::{Duration, Instant};

use reqwest::Client;
use tracing::{debug, info, warn};

use super::types::{GenerationRequest, WorkerEnvelope};
use crate::config::{RequestConfig, WorkerConfig};
use crate::error::{WorkerError, WorkerResult};

/// Client for the AI worker's diagram-generation endpoint.
///
/// Performs exactly one outbound call per invocation; failed calls are not
/// retried here. The caller decides what a failure means for its batch.
#[derive(Clone)]
pub struct WorkerClient {
    client: Client,
    base_url: String,
    api_key: Option<String>,
}

impl WorkerClient {
    /// Create a new worker client.
    pub fn new(config: &WorkerConfig, request_config: &RequestConfig) -> WorkerResult<Self> {
        let client = Client::builder()
            .timeout(Duration::from_millis(request_config.timeout_ms))
            .build()
            .map_err(|e| WorkerError::Unknown {
                message: format!("Failed to build HTTP client: {e}"),
            })?;

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            api_key: config.api_key.clone(),
        })
    }

    /// Get the base URL (for testing)
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Request generation of the diagrams named in `request`.
    ///
    /// Classifies failures as `Network` (the worker could not be reached,
    /// including timeouts), `Http` (non-2xx status, body captured best
    /// effort), or `Parse` (2xx but the body did not decode as an envelope).
    pub async fn generate(&self, request: &GenerationRequest) -> WorkerResult<WorkerEnvelope> {
        let url = format!("{}/api/ai", self.base_url);
        let start = Instant::now();

        debug!(
            diagrams = ?request.selected_diagrams,
            "Requesting diagram generation"
        );

        let mut builder = self
            .client
            .post(&url)
            .header("Content-Type", "application/json")
            .json(request);

        if let Some(api_key) = &self.api_key {
            builder = builder.header("Authorization", format!("Bearer {api_key}"));
        }

        let response = builder.send().await.map_err(|e| WorkerError::Network {
            message: e.to_string(),
        })?;

        let status = response.status();

        if !status.is_success() {
            let body = read_body(response).await;
            warn!(
                status = status.as_u16(),
                latency_ms = start.elapsed().as_millis() as u64,
                "Worker returned error status"
            );
            return Err(WorkerError::Http {
                status: status.as_u16(),
                body,
            });
        }

        let body = response.text().await.map_err(|e| WorkerError::Network {
            message: format!("Failed to read worker response body: {e}"),
        })?;

        match serde_json::from_str::<WorkerEnvelope>(&body) {
            Ok(envelope) => {
                info!(
                    diagrams = request.selected_diagrams.len(),
                    latency_ms = start.elapsed().as_millis() as u64,
                    "Worker call succeeded"
                );
                Ok(envelope)
            }
            Err(e) => Err(WorkerError::Parse {
                message: e.to_string(),
                body: Some(body),
            }),
        }
    }
}

async fn read_body(response: reqwest::Response) -> Option<String> {
    match response.text().await {
        Ok(body) if !body.is_empty() => Some(body),
        Ok(_) => None,
        Err(e) => {
            warn!(error = %e, "Failed to read worker response body");
            None
        }
    }
}
