//! Jobs repository
//!
//! Handles the three job phases against the backend:
//! - Submitting a request
//! - Polling the job status
//! - Fetching the result of a completed job

use async_trait::async_trait;
use tasklane_client::{Result, TaskClient};
use tasklane_core::domain::artifact::JobResult;
use tasklane_core::domain::job::{JobHandle, JobStatus};
use tasklane_core::domain::request::JobRequest;

/// Repository trait for job-related operations with the backend
#[async_trait]
pub trait JobRepository: Send + Sync {
    /// Submits a job and returns its handle
    async fn submit(&self, request: &JobRequest) -> Result<JobHandle>;

    /// Submits a job whose response already contains the result
    async fn submit_immediate(&self, request: &JobRequest) -> Result<JobResult>;

    /// Polls the status of a job once
    ///
    /// # Arguments
    /// * `handle` - The handle returned by [`submit`](Self::submit)
    async fn poll_status(&self, handle: &JobHandle) -> Result<JobStatus>;

    /// Fetches the result of a completed job
    async fn fetch_result(&self, handle: &JobHandle) -> Result<JobResult>;
}

#[async_trait]
impl JobRepository for TaskClient {
    async fn submit(&self, request: &JobRequest) -> Result<JobHandle> {
        TaskClient::submit(self, request).await
    }

    async fn submit_immediate(&self, request: &JobRequest) -> Result<JobResult> {
        TaskClient::submit_immediate(self, request).await
    }

    async fn poll_status(&self, handle: &JobHandle) -> Result<JobStatus> {
        self.poll_once(handle).await
    }

    async fn fetch_result(&self, handle: &JobHandle) -> Result<JobResult> {
        TaskClient::fetch_result(self, handle).await
    }
}
