//! Artifact storage service
//!
//! Writes downloaded artifacts to disk, either at a caller-chosen destination
//! or under a generated name in the storage directory.

use std::path::{Path, PathBuf};

use tracing::debug;
use uuid::Uuid;

use crate::error::{JobError, Result};

const DEFAULT_EXTENSION: &str = ".jpg";

/// Service trait for persisting artifact bytes
pub trait ArtifactStore: Send + Sync {
    /// Writes `bytes` and returns the final path
    ///
    /// # Arguments
    /// * `bytes` - Artifact content
    /// * `destination` - Explicit output path; `None` generates one
    /// * `source_url` - URL the bytes came from, used to pick a file extension
    fn persist(
        &self,
        bytes: &[u8],
        destination: Option<&Path>,
        source_url: &str,
    ) -> Result<PathBuf>;
}

/// Filesystem implementation of ArtifactStore
#[derive(Debug, Clone)]
pub struct FsArtifactStore {
    storage_dir: PathBuf,
}

impl FsArtifactStore {
    pub fn new(storage_dir: impl Into<PathBuf>) -> Self {
        Self {
            storage_dir: storage_dir.into(),
        }
    }

    pub fn storage_dir(&self) -> &Path {
        &self.storage_dir
    }

    fn generated_path(&self, source_url: &str) -> PathBuf {
        self.storage_dir
            .join(format!("{}{}", Uuid::new_v4(), extension_from_url(source_url)))
    }
}

impl ArtifactStore for FsArtifactStore {
    fn persist(
        &self,
        bytes: &[u8],
        destination: Option<&Path>,
        source_url: &str,
    ) -> Result<PathBuf> {
        let path = match destination {
            Some(path) => path.to_path_buf(),
            None => self.generated_path(source_url),
        };

        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent).map_err(|source| JobError::Storage {
                path: parent.to_path_buf(),
                source,
            })?;
        }

        std::fs::write(&path, bytes).map_err(|source| JobError::Storage {
            path: path.clone(),
            source,
        })?;

        debug!("Wrote {} bytes to {}", bytes.len(), path.display());
        Ok(path)
    }
}

/// Extension (with leading dot) of the last URL path segment
fn extension_from_url(url: &str) -> String {
    let without_query = url.split(['?', '#']).next().unwrap_or(url);
    let segment = without_query.rsplit('/').next().unwrap_or_default();

    Path::new(segment)
        .extension()
        .and_then(|ext| ext.to_str())
        .filter(|ext| !ext.is_empty())
        .map(|ext| format!(".{}", ext))
        .unwrap_or_else(|| DEFAULT_EXTENSION.to_string())
}
