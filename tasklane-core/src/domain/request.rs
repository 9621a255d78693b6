//! Job request payloads
//!
//! A [`JobRequest`] is built once by the caller and handed to the client as-is.
//! The client only knows how to put it on the wire; what goes into it is
//! decided by the payload strategy in the runner.

use serde_json::Value as JsonValue;

/// A named file part of a multipart submission
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilePart {
    /// Form field name the backend expects (e.g. `file` or `files`)
    pub field: String,
    pub file_name: String,
    pub mime_type: String,
    pub bytes: Vec<u8>,
}

impl FilePart {
    /// Creates a file part, deriving an `image/*` MIME type from the file name
    pub fn new(field: impl Into<String>, file_name: impl Into<String>, bytes: Vec<u8>) -> Self {
        let file_name = file_name.into();
        let mime_type = image_mime_type(&file_name);
        Self {
            field: field.into(),
            file_name,
            mime_type,
            bytes,
        }
    }
}

fn image_mime_type(file_name: &str) -> String {
    let extension = std::path::Path::new(file_name)
        .extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| ext.to_ascii_lowercase());

    match extension.as_deref() {
        Some("jpg") | Some("jpeg") => "image/jpeg".to_string(),
        Some(ext) if !ext.is_empty() => format!("image/{}", ext),
        _ => "application/octet-stream".to_string(),
    }
}

/// Body of a submission request
#[derive(Debug, Clone, PartialEq)]
pub enum RequestBody {
    Multipart {
        files: Vec<FilePart>,
        fields: Vec<(String, String)>,
    },
    Json(JsonValue),
}

/// Immutable unit of work handed to the backend on submission
#[derive(Debug, Clone, PartialEq)]
pub struct JobRequest {
    body: RequestBody,
}

impl JobRequest {
    pub fn multipart(files: Vec<FilePart>, fields: Vec<(String, String)>) -> Self {
        Self {
            body: RequestBody::Multipart { files, fields },
        }
    }

    pub fn json(body: JsonValue) -> Self {
        Self {
            body: RequestBody::Json(body),
        }
    }

    pub fn body(&self) -> &RequestBody {
        &self.body
    }

    /// Short description for log lines; never includes file contents
    pub fn summary(&self) -> String {
        match &self.body {
            RequestBody::Multipart { files, fields } => {
                let names: Vec<&str> = files.iter().map(|f| f.file_name.as_str()).collect();
                format!(
                    "multipart ({} file(s): {}; {} field(s))",
                    files.len(),
                    names.join(", "),
                    fields.len()
                )
            }
            RequestBody::Json(_) => "json".to_string(),
        }
    }
}
