//! Generic job-resource API (`v2`)
//!
//! Jobs are a plain REST collection: `POST /api/v2/jobs` creates one and
//! `GET /api/v2/jobs/{id}` reads it back.

use cropcheck_core::JobRequest;
use cropcheck_core::domain::job::JobSnapshot;

use crate::ServiceClient;
use crate::error::Result;

/// Adapter for the `v2` service API
#[derive(Debug, Clone)]
pub struct JobResourceApi {
    client: ServiceClient,
}

impl JobResourceApi {
    pub fn new(client: ServiceClient) -> Self {
        Self { client }
    }

    pub fn submit_url(&self) -> String {
        format!("{}/api/v2/jobs", self.client.base_url())
    }

    pub fn status_url(&self, job_id: &str) -> String {
        format!("{}/api/v2/jobs/{}", self.client.base_url(), job_id)
    }

    /// Create a job resource
    ///
    /// # Returns
    /// The id of the created job
    pub async fn submit(&self, request: &JobRequest) -> Result<String> {
        self.client
            .create_job(&self.submit_url(), &request.to_wire())
            .await
    }

    /// Read a job resource
    pub async fn poll_once(&self, job_id: &str) -> Result<JobSnapshot> {
        self.client.fetch_snapshot(&self.status_url(job_id)).await
    }
}
