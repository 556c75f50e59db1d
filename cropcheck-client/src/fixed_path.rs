//! Fixed-resource-path API (`v1`)
//!
//! Jobs live under `/api/v1/frontal/crop`, with `submit` and `status/{id}`
//! as separate resources.

use cropcheck_core::JobRequest;
use cropcheck_core::domain::job::JobSnapshot;

use crate::ServiceClient;
use crate::error::Result;

/// Adapter for the `v1` service API
#[derive(Debug, Clone)]
pub struct FixedPathApi {
    client: ServiceClient,
}

impl FixedPathApi {
    pub fn new(client: ServiceClient) -> Self {
        Self { client }
    }

    pub fn submit_url(&self) -> String {
        format!("{}/api/v1/frontal/crop/submit", self.client.base_url())
    }

    pub fn status_url(&self, job_id: &str) -> String {
        format!(
            "{}/api/v1/frontal/crop/status/{}",
            self.client.base_url(),
            job_id
        )
    }

    /// Submit a crop job
    ///
    /// # Returns
    /// The id the service assigned to the job
    pub async fn submit(&self, request: &JobRequest) -> Result<String> {
        self.client
            .create_job(&self.submit_url(), &request.to_wire())
            .await
    }

    /// Fetch the current state of a job
    pub async fn poll_once(&self, job_id: &str) -> Result<JobSnapshot> {
        self.client.fetch_snapshot(&self.status_url(job_id)).await
    }
}
