//! Job domain types

use serde::{Deserialize, Serialize};
use std::fmt;

/// Opaque identifier returned by the backend when a job is submitted
///
/// Used as the key for every status poll and for the final result fetch.
/// It has no meaning outside the backend session that issued it.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct JobHandle(String);

impl JobHandle {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for JobHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Job status as reported by the backend status endpoint
///
/// Matching is exact and case-sensitive. Any other string is kept verbatim in
/// `Unknown` so the caller can report the protocol drift.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum JobStatus {
    Pending,
    InProgress,
    Completed,
    Failed,
    Unknown(String),
}

impl JobStatus {
    /// Parses a raw backend status string
    pub fn parse(raw: &str) -> Self {
        match raw {
            "PENDING" => JobStatus::Pending,
            "IN_PROGRESS" => JobStatus::InProgress,
            "COMPLETED" => JobStatus::Completed,
            "FAILED" => JobStatus::Failed,
            other => JobStatus::Unknown(other.to_string()),
        }
    }

    /// Returns the wire representation of this status
    pub fn as_str(&self) -> &str {
        match self {
            JobStatus::Pending => "PENDING",
            JobStatus::InProgress => "IN_PROGRESS",
            JobStatus::Completed => "COMPLETED",
            JobStatus::Failed => "FAILED",
            JobStatus::Unknown(raw) => raw,
        }
    }

    /// `Pending` and `InProgress`: the job is still running
    pub fn is_transient(&self) -> bool {
        matches!(self, JobStatus::Pending | JobStatus::InProgress)
    }

    /// `Completed` and `Failed`: the backend will not change its answer
    pub fn is_terminal(&self) -> bool {
        matches!(self, JobStatus::Completed | JobStatus::Failed)
    }
}

impl fmt::Display for JobStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<&str> for JobStatus {
    fn from(raw: &str) -> Self {
        JobStatus::parse(raw)
    }
}

/// Endpoint paths for one family of backend jobs
///
/// `status` and `result` are prefixes; the job handle is percent-encoded and
/// appended as the last path segment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JobRoutes {
    pub submit: String,
    pub status: String,
    pub result: String,
}

impl JobRoutes {
    pub fn new(
        submit: impl Into<String>,
        status: impl Into<String>,
        result: impl Into<String>,
    ) -> Self {
        Self {
            submit: submit.into(),
            status: status.into(),
            result: result.into(),
        }
    }

    pub fn status_path(&self, handle: &JobHandle) -> String {
        handle_path(&self.status, handle)
    }

    pub fn result_path(&self, handle: &JobHandle) -> String {
        handle_path(&self.result, handle)
    }
}

fn handle_path(prefix: &str, handle: &JobHandle) -> String {
    format!(
        "{}/{}",
        prefix.trim_end_matches('/'),
        urlencoding::encode(handle.as_str())
    )
}

impl Default for JobRoutes {
    fn default() -> Self {
        Self::new("/tasks/process", "/tasks/status", "/tasks/result")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_parse_known_values() {
        assert_eq!(JobStatus::parse("PENDING"), JobStatus::Pending);
        assert_eq!(JobStatus::parse("IN_PROGRESS"), JobStatus::InProgress);
        assert_eq!(JobStatus::parse("COMPLETED"), JobStatus::Completed);
        assert_eq!(JobStatus::parse("FAILED"), JobStatus::Failed);
    }

    #[test]
    fn test_status_parse_is_case_sensitive() {
        assert_eq!(
            JobStatus::parse("completed"),
            JobStatus::Unknown("completed".to_string())
        );
        assert_eq!(
            JobStatus::parse("CANCELLED"),
            JobStatus::Unknown("CANCELLED".to_string())
        );
    }

    #[test]
    fn test_status_classification() {
        assert!(JobStatus::Pending.is_transient());
        assert!(JobStatus::InProgress.is_transient());
        assert!(JobStatus::Completed.is_terminal());
        assert!(JobStatus::Failed.is_terminal());

        let unknown = JobStatus::Unknown("QUEUED".to_string());
        assert!(!unknown.is_transient());
        assert!(!unknown.is_terminal());
        assert_eq!(unknown.to_string(), "QUEUED");
    }

    #[test]
    fn test_routes_append_handle() {
        let routes = JobRoutes::default();
        let handle = JobHandle::new("abc123");
        assert_eq!(routes.status_path(&handle), "/tasks/status/abc123");
        assert_eq!(routes.result_path(&handle), "/tasks/result/abc123");

        let routes = JobRoutes::new("/start", "/status/", "/result/");
        assert_eq!(routes.status_path(&handle), "/status/abc123");
    }

    #[test]
    fn test_routes_escape_handle_segment() {
        let routes = JobRoutes::default();

        assert_eq!(
            routes.status_path(&JobHandle::new("a/b?c#d")),
            "/tasks/status/a%2Fb%3Fc%23d"
        );
        assert_eq!(
            routes.result_path(&JobHandle::new("../x")),
            "/tasks/result/..%2Fx"
        );
    }

    #[test]
    fn test_handle_serializes_as_plain_string() {
        let handle = JobHandle::new("req-1");
        assert_eq!(serde_json::to_string(&handle).unwrap(), r#""req-1""#);
    }
}
