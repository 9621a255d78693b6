//! Artifacts repository

use async_trait::async_trait;
use tasklane_client::{Result, TaskClient};

/// Repository trait for downloading result artifacts
#[async_trait]
pub trait ArtifactRepository: Send + Sync {
    /// Downloads the bytes behind an artifact URL
    async fn download(&self, url: &str) -> Result<Vec<u8>>;
}

#[async_trait]
impl ArtifactRepository for TaskClient {
    async fn download(&self, url: &str) -> Result<Vec<u8>> {
        TaskClient::download(self, url).await
    }
}
