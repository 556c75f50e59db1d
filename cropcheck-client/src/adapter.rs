//! Protocol adapter
//!
//! [`JobService`] is the seam the runner depends on. [`ProtocolAdapter`] is the
//! production implementation: a closed set of API versions chosen once at
//! startup. New versions are added as a variant here, never as a branch in
//! the code that drives polling.

use async_trait::async_trait;
use cropcheck_core::domain::job::JobSnapshot;
use cropcheck_core::{JobRequest, ProtocolVersion};

use crate::ServiceClient;
use crate::error::Result;
use crate::fixed_path::FixedPathApi;
use crate::job_resource::JobResourceApi;

/// Submit/poll contract shared by every protocol version
#[async_trait]
pub trait JobService: Send + Sync {
    /// Submits a request and returns the job id assigned by the service
    ///
    /// # Errors
    /// * [`ClientError::Submission`](crate::ClientError::Submission) on a non-success status
    /// * [`ClientError::Protocol`](crate::ClientError::Protocol) if the response lacks an id
    async fn submit(&self, request: &JobRequest) -> Result<String>;

    /// Polls a job once
    ///
    /// # Errors
    /// * [`ClientError::Poll`](crate::ClientError::Poll) on transport or HTTP failure
    /// * [`ClientError::Protocol`](crate::ClientError::Protocol) on an undecodable body
    async fn poll_once(&self, job_id: &str) -> Result<JobSnapshot>;
}

/// The supported service API shapes
#[derive(Debug, Clone)]
pub enum ProtocolAdapter {
    FixedPath(FixedPathApi),
    JobResource(JobResourceApi),
}

impl ProtocolAdapter {
    /// Selects the adapter for `version`
    pub fn new(version: ProtocolVersion, client: ServiceClient) -> Self {
        match version {
            ProtocolVersion::V1 => Self::FixedPath(FixedPathApi::new(client)),
            ProtocolVersion::V2 => Self::JobResource(JobResourceApi::new(client)),
        }
    }

    pub fn version(&self) -> ProtocolVersion {
        match self {
            Self::FixedPath(_) => ProtocolVersion::V1,
            Self::JobResource(_) => ProtocolVersion::V2,
        }
    }
}

#[async_trait]
impl JobService for ProtocolAdapter {
    async fn submit(&self, request: &JobRequest) -> Result<String> {
        match self {
            Self::FixedPath(api) => api.submit(request).await,
            Self::JobResource(api) => api.submit(request).await,
        }
    }

    async fn poll_once(&self, job_id: &str) -> Result<JobSnapshot> {
        match self {
            Self::FixedPath(api) => api.poll_once(job_id).await,
            Self::JobResource(api) => api.poll_once(job_id).await,
        }
    }
}
