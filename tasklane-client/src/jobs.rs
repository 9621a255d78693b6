//! Job-related API endpoints

use reqwest::multipart::{Form, Part};
use tasklane_core::domain::artifact::JobResult;
use tasklane_core::domain::job::{JobHandle, JobStatus};
use tasklane_core::domain::request::{FilePart, JobRequest, RequestBody};
use tasklane_core::dto::job::{ResultResponse, StatusResponse, SubmitResponse};
use tracing::debug;

use crate::TaskClient;
use crate::error::{ClientError, Result};

impl TaskClient {
    // =============================================================================
    // Job Lifecycle
    // =============================================================================

    /// Submit a job and return the handle the backend assigned to it
    ///
    /// Fails with a transport error on network failure, timeout or non-2xx
    /// status, and with a parse error if the response carries no `request_id`.
    pub async fn submit(&self, request: &JobRequest) -> Result<JobHandle> {
        let response: SubmitResponse = self.send_submission(request).await?;
        let handle = response.into_handle().map_err(ClientError::ParseError)?;

        debug!("Submitted job {}", handle);
        Ok(handle)
    }

    /// Submit a job whose backend answers synchronously with the result
    ///
    /// The submission response is decoded with the same rules as
    /// [`fetch_result`](Self::fetch_result).
    pub async fn submit_immediate(&self, request: &JobRequest) -> Result<JobResult> {
        let response: ResultResponse = self.send_submission(request).await?;
        response.into_result().map_err(ClientError::ParseError)
    }

    /// Poll the status of a job once
    ///
    /// An HTTP error status is surfaced as [`ClientError::ApiError`]; it is never
    /// retried here.
    pub async fn poll_once(&self, handle: &JobHandle) -> Result<JobStatus> {
        let url = self.url(&self.routes.status_path(handle));
        let response = self
            .authorized(self.client.get(&url))
            .timeout(self.timeouts.poll)
            .send()
            .await?;

        let body: StatusResponse = self.handle_response(response).await?;
        body.into_status().map_err(ClientError::ParseError)
    }

    /// Fetch the result of a completed job
    ///
    /// Fails with a parse error if the artifact list is missing or empty, or if
    /// its first entry has no usable URL.
    pub async fn fetch_result(&self, handle: &JobHandle) -> Result<JobResult> {
        let url = self.url(&self.routes.result_path(handle));
        let response = self
            .authorized(self.client.get(&url))
            .timeout(self.timeouts.fetch)
            .send()
            .await?;

        let body: ResultResponse = self.handle_response(response).await?;
        body.into_result().map_err(ClientError::ParseError)
    }

    async fn send_submission<T: serde::de::DeserializeOwned>(
        &self,
        request: &JobRequest,
    ) -> Result<T> {
        let url = self.url(&self.routes.submit);
        let builder = self
            .authorized(self.client.post(&url))
            .timeout(self.timeouts.submit);

        let builder = match request.body() {
            RequestBody::Multipart { files, fields } => {
                builder.multipart(build_form(files, fields)?)
            }
            RequestBody::Json(body) => builder.json(body),
        };

        debug!("POST {} ({})", url, request.summary());
        let response = builder.send().await?;
        self.handle_response(response).await
    }
}

fn build_form(files: &[FilePart], fields: &[(String, String)]) -> Result<Form> {
    let mut form = Form::new();

    for (name, value) in fields {
        form = form.text(name.clone(), value.clone());
    }

    for file in files {
        let part = Part::bytes(file.bytes.clone())
            .file_name(file.file_name.clone())
            .mime_str(&file.mime_type)?;
        form = form.part(file.field.clone(), part);
    }

    Ok(form)
}
