//! Payload strategies
//!
//! A [`PayloadBuilder`] decides everything that differs between job families:
//! which endpoints to use, how the request body is shaped, and whether the
//! backend answers the submission synchronously. The orchestrator itself is
//! the same for all of them.

use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use serde_json::json;
use tasklane_core::domain::job::JobRoutes;
use tasklane_core::domain::request::{FilePart, JobRequest};

use crate::error::{JobError, Result};
use crate::service::input::InputReader;

/// How the backend answers a submission
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResponseMode {
    /// Returns a handle; the job must be polled and its result fetched
    Queued,
    /// Returns the result payload directly
    Immediate,
}

/// Strategy for building the submission of one job family
pub trait PayloadBuilder: Send + Sync {
    /// Short name used in log lines
    fn name(&self) -> &str;

    /// Endpoints this job family is served from
    fn routes(&self) -> JobRoutes;

    fn response_mode(&self) -> ResponseMode {
        ResponseMode::Queued
    }

    /// Builds the request, reading local inputs through `inputs`
    ///
    /// Must fail with an input error before any network access when an input
    /// is missing or an option is unsupported.
    fn build(&self, inputs: &dyn InputReader) -> Result<JobRequest>;
}

fn file_part(inputs: &dyn InputReader, field: &str, path: &Path) -> Result<FilePart> {
    let bytes = inputs.read(path)?;
    let file_name = path
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .ok_or_else(|| JobError::input(format!("Not a file path: {}", path.display())))?;

    Ok(FilePart::new(field, file_name, bytes))
}

// =============================================================================
// Single-file processing
// =============================================================================

/// One image plus a prompt, sent as the `file` part
#[derive(Debug, Clone)]
pub struct ProcessPayload {
    pub file: PathBuf,
    pub prompt: String,
}

impl ProcessPayload {
    pub fn new(file: impl Into<PathBuf>, prompt: impl Into<String>) -> Self {
        Self {
            file: file.into(),
            prompt: prompt.into(),
        }
    }
}

impl PayloadBuilder for ProcessPayload {
    fn name(&self) -> &str {
        "process"
    }

    fn routes(&self) -> JobRoutes {
        JobRoutes::default()
    }

    fn build(&self, inputs: &dyn InputReader) -> Result<JobRequest> {
        let part = file_part(inputs, "file", &self.file)?;
        Ok(JobRequest::multipart(
            vec![part],
            vec![("prompt".to_string(), self.prompt.clone())],
        ))
    }
}

// =============================================================================
// Multi-image editing
// =============================================================================

/// Editing models accepted by the process endpoint
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ImageModel {
    FluxProKontext,
    #[default]
    NanoBananaEdit,
}

impl ImageModel {
    pub const SUPPORTED: [ImageModel; 2] =
        [ImageModel::NanoBananaEdit, ImageModel::FluxProKontext];

    pub fn as_str(&self) -> &'static str {
        match self {
            ImageModel::FluxProKontext => "flux-pro/kontext",
            ImageModel::NanoBananaEdit => "nano-banana/edit",
        }
    }

    /// Multipart field name the model expects its images under
    pub fn file_field(&self) -> &'static str {
        match self {
            ImageModel::FluxProKontext => "file",
            ImageModel::NanoBananaEdit => "files",
        }
    }

    /// Nano Banana answers the submission with the finished result
    pub fn response_mode(&self) -> ResponseMode {
        match self {
            ImageModel::FluxProKontext => ResponseMode::Queued,
            ImageModel::NanoBananaEdit => ResponseMode::Immediate,
        }
    }
}

impl fmt::Display for ImageModel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ImageModel {
    type Err = JobError;

    fn from_str(s: &str) -> Result<Self> {
        Self::SUPPORTED
            .into_iter()
            .find(|model| model.as_str() == s)
            .ok_or_else(|| {
                let supported: Vec<&str> = Self::SUPPORTED.iter().map(|m| m.as_str()).collect();
                JobError::input(format!(
                    "Unsupported model: {}. Supported models: {}",
                    s,
                    supported.join(", ")
                ))
            })
    }
}

/// Main image, optional reference image and a prompt for an editing model
#[derive(Debug, Clone)]
pub struct EditPayload {
    pub main_image: PathBuf,
    pub reference_image: Option<PathBuf>,
    pub prompt: String,
    pub model: ImageModel,
}

impl EditPayload {
    /// Prompt sent to the backend; describes image roles when a reference is given
    pub fn effective_prompt(&self) -> String {
        if self.reference_image.is_none() {
            return self.prompt.clone();
        }

        format!(
            "{}\n\nImage descriptions:\nImage 1: main image\nImage 2: reference image",
            self.prompt
        )
    }
}

impl PayloadBuilder for EditPayload {
    fn name(&self) -> &str {
        "edit"
    }

    fn routes(&self) -> JobRoutes {
        JobRoutes::default()
    }

    fn response_mode(&self) -> ResponseMode {
        self.model.response_mode()
    }

    fn build(&self, inputs: &dyn InputReader) -> Result<JobRequest> {
        let field = self.model.file_field();

        let mut files = vec![file_part(inputs, field, &self.main_image)?];
        if let Some(reference) = &self.reference_image {
            files.push(file_part(inputs, field, reference)?);
        }

        Ok(JobRequest::multipart(
            files,
            vec![
                ("prompt".to_string(), self.effective_prompt()),
                ("model".to_string(), self.model.as_str().to_string()),
            ],
        ))
    }
}

// =============================================================================
// Upscaling
// =============================================================================

/// Upscale an already-hosted image
#[derive(Debug, Clone)]
pub struct UpscalePayload {
    pub image_url: String,
}

impl UpscalePayload {
    pub fn new(image_url: impl Into<String>) -> Self {
        Self {
            image_url: image_url.into(),
        }
    }
}

impl PayloadBuilder for UpscalePayload {
    fn name(&self) -> &str {
        "upscale"
    }

    fn routes(&self) -> JobRoutes {
        JobRoutes::new(
            "/tasks/images/upscale/start",
            "/tasks/images/upscale/status",
            "/tasks/images/upscale/result",
        )
    }

    fn build(&self, _inputs: &dyn InputReader) -> Result<JobRequest> {
        if self.image_url.trim().is_empty() {
            return Err(JobError::input("image_url is required"));
        }

        Ok(JobRequest::json(json!({ "image_url": self.image_url })))
    }
}
