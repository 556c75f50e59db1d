//! Cropcheck HTTP Client
//!
//! Talks to the remote crop service. Two API shapes exist, a fixed-resource-path
//! API (`v1`) and a generic job-resource API (`v2`). Both are reached through
//! [`ProtocolAdapter`], which is picked once from a [`ProtocolVersion`] and
//! exposes the same two operations for either version via [`JobService`].
//!
//! # Example
//!
//! ```no_run
//! use cropcheck_client::{JobService, ProtocolAdapter, ServiceClient};
//! use cropcheck_core::{ProtocolVersion, build};
//! use cropcheck_core::domain::sample::Sample;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let client = ServiceClient::new("http://localhost:8000");
//!     let adapter = ProtocolAdapter::new(ProtocolVersion::V2, client);
//!
//!     let request = build(&Sample::from_dir("samples/images/01"), ProtocolVersion::V2)?;
//!     let job_id = adapter.submit(&request).await?;
//!     println!("Submitted job {}", job_id);
//!     Ok(())
//! }
//! ```

mod adapter;
pub mod error;
mod fixed_path;
mod job_resource;

// Re-export commonly used types
pub use adapter::{JobService, ProtocolAdapter};
pub use cropcheck_core::ProtocolVersion;
pub use error::{ClientError, Result};
pub use fixed_path::FixedPathApi;
pub use job_resource::JobResourceApi;

use base64::{Engine as _, engine::general_purpose::STANDARD};
use cropcheck_core::domain::job::{JobSnapshot, StatusLabel};
use cropcheck_core::dto::job::{JobCreated, JobStatusResponse, SubmitJob};
use reqwest::Client;
use std::time::Duration;
use tracing::debug;

/// HTTP plumbing shared by both protocol versions
///
/// Holds the base URL and the configured reqwest client. The protocol
/// adapters only decide which URL to hit; sending requests and decoding
/// responses happens here.
#[derive(Debug, Clone)]
pub struct ServiceClient {
    /// Base URL of the service (e.g., "http://localhost:8000")
    base_url: String,
    /// HTTP client instance
    client: Client,
}

impl ServiceClient {
    /// Create a new service client
    ///
    /// # Example
    /// ```
    /// use cropcheck_client::ServiceClient;
    ///
    /// let client = ServiceClient::new("http://localhost:8000");
    /// ```
    pub fn new(base_url: impl Into<String>) -> Self {
        Self::with_client(base_url, Client::new())
    }

    /// Create a client whose every request is bounded by `timeout`
    pub fn with_timeout(base_url: impl Into<String>, timeout: Duration) -> Result<Self> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self::with_client(base_url, client))
    }

    /// Create a new service client with a custom HTTP client
    ///
    /// This allows you to configure timeouts, proxies, TLS settings, etc.
    pub fn with_client(base_url: impl Into<String>, client: Client) -> Self {
        let base_url = base_url.into();
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            client,
        }
    }

    /// Get the base URL of the service
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    // =============================================================================
    // Request Handlers
    // =============================================================================

    /// POST a create-job body and return the id the service assigned
    async fn create_job(&self, url: &str, body: &SubmitJob) -> Result<String> {
        debug!("POST {}", url);
        let response = self.client.post(url).json(body).send().await?;
        let status = response.status();

        if !status.is_success() {
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            return Err(ClientError::submission(status.as_u16(), error_text));
        }

        let bytes = response.bytes().await?;
        let created: JobCreated = serde_json::from_slice(&bytes).map_err(|e| {
            ClientError::Protocol(format!("Failed to parse submit response: {}", e))
        })?;

        match created.id {
            Some(id) if !id.is_empty() => Ok(id),
            _ => Err(ClientError::Protocol(
                "submit response lacks an `id` field".to_string(),
            )),
        }
    }

    /// GET a status document and decode it into a snapshot
    async fn fetch_snapshot(&self, url: &str) -> Result<JobSnapshot> {
        debug!("GET {}", url);
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(ClientError::poll_transport)?;
        let status = response.status();

        if !status.is_success() {
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            return Err(ClientError::Poll {
                status: Some(status.as_u16()),
                message: error_text,
            });
        }

        let bytes = response
            .bytes()
            .await
            .map_err(ClientError::poll_transport)?;
        let body: JobStatusResponse = serde_json::from_slice(&bytes).map_err(|e| {
            ClientError::Protocol(format!("Failed to parse status response: {}", e))
        })?;

        decode_snapshot(body)
    }
}

/// Maps a status document onto a snapshot; a non-empty `svg` wins over `status`
fn decode_snapshot(body: JobStatusResponse) -> Result<JobSnapshot> {
    match body.svg.as_deref() {
        Some(svg) if !svg.is_empty() => STANDARD
            .decode(svg)
            .map(JobSnapshot::Completed)
            .map_err(|e| ClientError::Protocol(format!("`svg` is not valid base64: {}", e))),
        _ => Ok(JobSnapshot::Status(StatusLabel::parse(
            body.status.as_deref(),
        ))),
    }
}
