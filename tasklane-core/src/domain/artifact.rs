//! Result artifact types

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value as JsonValue;
use std::path::PathBuf;

/// Locator for one output artifact of a completed job
///
/// The backend reports an artifact either as a bare URL string or as a record
/// with a `url` field and optional metadata. Only `url` is load-bearing;
/// metadata that is not a string is dropped.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum ArtifactLocator {
    Url(String),
    Record {
        url: String,
        #[serde(skip_serializing_if = "Option::is_none")]
        content_type: Option<String>,
        #[serde(skip_serializing_if = "Option::is_none")]
        file_name: Option<String>,
    },
}

impl ArtifactLocator {
    pub fn url(&self) -> &str {
        match self {
            ArtifactLocator::Url(url) => url,
            ArtifactLocator::Record { url, .. } => url,
        }
    }

    /// Decodes a single JSON entry, rejecting entries without a usable URL
    pub fn from_value(value: &JsonValue) -> Result<Self, String> {
        let locator = match value {
            JsonValue::String(url) => ArtifactLocator::Url(url.clone()),
            JsonValue::Object(fields) => {
                let url = fields
                    .get("url")
                    .and_then(JsonValue::as_str)
                    .ok_or_else(|| format!("Invalid artifact entry: {}", value))?;
                let text = |key: &str| {
                    fields
                        .get(key)
                        .and_then(JsonValue::as_str)
                        .map(String::from)
                };

                ArtifactLocator::Record {
                    url: url.to_string(),
                    content_type: text("content_type"),
                    file_name: text("file_name"),
                }
            }
            _ => return Err(format!("Invalid artifact entry: {}", value)),
        };

        if locator.url().trim().is_empty() {
            return Err(format!("Artifact entry has an empty URL: {}", value));
        }

        Ok(locator)
    }
}

impl<'de> Deserialize<'de> for ArtifactLocator {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = JsonValue::deserialize(deserializer)?;
        ArtifactLocator::from_value(&value).map_err(serde::de::Error::custom)
    }
}

/// Artifacts produced by a completed job
///
/// Always non-empty. The first artifact is the canonical result; the rest are
/// kept in backend order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct JobResult {
    artifacts: Vec<ArtifactLocator>,
}

impl JobResult {
    pub fn new(artifacts: Vec<ArtifactLocator>) -> Result<Self, String> {
        if artifacts.is_empty() {
            return Err("No artifacts found in result".to_string());
        }
        Ok(Self { artifacts })
    }

    /// The canonical (first) artifact
    pub fn primary(&self) -> &ArtifactLocator {
        &self.artifacts[0]
    }

    pub fn artifacts(&self) -> &[ArtifactLocator] {
        &self.artifacts
    }

    pub fn into_artifacts(self) -> Vec<ArtifactLocator> {
        self.artifacts
    }
}

/// An artifact fetched and written to local storage
#[derive(Debug, Clone)]
pub struct DownloadedArtifact {
    pub path: PathBuf,
    pub source_url: String,
    pub bytes: Vec<u8>,
}
