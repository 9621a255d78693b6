//! Artifact download

use tracing::debug;

use crate::TaskClient;
use crate::error::{ClientError, Result};

impl TaskClient {
    /// Download the bytes behind an artifact URL
    ///
    /// Artifact URLs point at public storage, so no bearer token is sent.
    pub async fn download(&self, url: &str) -> Result<Vec<u8>> {
        let response = self
            .client
            .get(url)
            .timeout(self.timeouts.download)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            return Err(ClientError::api_error(status.as_u16(), error_text));
        }

        let bytes = response.bytes().await?;
        debug!("Downloaded {} bytes from {}", bytes.len(), url);
        Ok(bytes.to_vec())
    }
}
