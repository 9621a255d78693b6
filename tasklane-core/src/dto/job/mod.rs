//! Job response envelopes
//!
//! Every field is optional at the serde level so that a missing field turns
//! into a descriptive protocol error instead of a generic JSON failure.

use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;

use crate::domain::artifact::{ArtifactLocator, JobResult};
use crate::domain::job::{JobHandle, JobStatus};

/// Response to a submission: `{ "request_id": "..." }`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SubmitResponse {
    #[serde(default)]
    pub request_id: Option<String>,
}

impl SubmitResponse {
    pub fn into_handle(self) -> Result<JobHandle, String> {
        match self.request_id {
            Some(id) if !id.trim().is_empty() => Ok(JobHandle::new(id)),
            Some(_) => Err("Invalid submit response: empty request_id".to_string()),
            None => Err("Invalid submit response: missing request_id".to_string()),
        }
    }
}

/// Response to a status poll: `{ "data": { "status": "..." } }`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StatusResponse {
    #[serde(default)]
    pub data: Option<StatusData>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StatusData {
    #[serde(default)]
    pub status: Option<String>,
}

impl StatusResponse {
    pub fn into_status(self) -> Result<JobStatus, String> {
        self.data
            .and_then(|data| data.status)
            .map(|raw| JobStatus::parse(&raw))
            .ok_or_else(|| "Invalid status response: missing data.status".to_string())
    }
}

/// Response to a result fetch
///
/// Queued jobs report `{ "data": { "images": [...] } }`; the upscale family
/// reports a single `{ "data": { "image": {...} } }`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResultResponse {
    #[serde(default)]
    pub data: Option<ResultData>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResultData {
    #[serde(default)]
    pub images: Option<JsonValue>,
    #[serde(default)]
    pub image: Option<JsonValue>,
}

impl ResultResponse {
    pub fn into_result(self) -> Result<JobResult, String> {
        let data = self
            .data
            .ok_or_else(|| "Invalid result response: missing data".to_string())?;

        if let Some(images) = data.images {
            let entries = images
                .as_array()
                .ok_or_else(|| "Invalid result response: data.images is not a list".to_string())?;

            let (first, rest) = entries
                .split_first()
                .ok_or_else(|| "No images found in result".to_string())?;

            let mut artifacts = vec![ArtifactLocator::from_value(first)?];
            // Only the first entry is load-bearing; malformed trailing entries are dropped.
            artifacts.extend(rest.iter().filter_map(|v| ArtifactLocator::from_value(v).ok()));

            return JobResult::new(artifacts);
        }

        if let Some(image) = data.image {
            return JobResult::new(vec![ArtifactLocator::from_value(&image)?]);
        }

        Err("Invalid result response: missing data.images".to_string())
    }
}
