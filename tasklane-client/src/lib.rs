//! Tasklane HTTP Client
//!
//! A small, type-safe HTTP client for the three-phase remote job protocol:
//! submit a job, poll its status, fetch its result. It also downloads result
//! artifacts.
//!
//! The client performs exactly one HTTP exchange per call. It never retries,
//! never sleeps and never touches the filesystem; scheduling policy lives in
//! `tasklane-runner`.
//!
//! # Example
//!
//! ```no_run
//! use tasklane_client::TaskClient;
//! use tasklane_core::domain::request::JobRequest;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let client = TaskClient::new("https://backend.example.com/api", "token");
//!
//!     let handle = client
//!         .submit(&JobRequest::json(serde_json::json!({"image_url": "https://x/a.png"})))
//!         .await?;
//!     let status = client.poll_once(&handle).await?;
//!
//!     println!("Job {} is {}", handle, status);
//!     Ok(())
//! }
//! ```

mod artifacts;
pub mod error;
mod jobs;

// Re-export commonly used types
pub use error::{ClientError, Result};
pub use tasklane_core::domain::job::JobRoutes;

use reqwest::{Client, RequestBuilder};
use serde::de::DeserializeOwned;
use std::fmt;
use std::time::Duration;

/// Per-call timeouts
///
/// Each phase gets its own bound so that one hung request is detected well
/// before an orchestrator's polling budget runs out.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RequestTimeouts {
    pub submit: Duration,
    pub poll: Duration,
    pub fetch: Duration,
    pub download: Duration,
}

impl Default for RequestTimeouts {
    fn default() -> Self {
        Self {
            submit: Duration::from_secs(120),
            poll: Duration::from_secs(30),
            fetch: Duration::from_secs(30),
            download: Duration::from_secs(60),
        }
    }
}

/// HTTP client for one job backend
///
/// Every backend request carries `Authorization: Bearer <api_key>`.
#[derive(Clone)]
pub struct TaskClient {
    /// Base URL of the backend (e.g., "https://backend.example.com/api")
    base_url: String,
    /// Bearer token attached to backend requests
    api_key: String,
    /// Endpoint paths for the job family this client talks to
    routes: JobRoutes,
    timeouts: RequestTimeouts,
    /// HTTP client instance
    client: Client,
}

impl TaskClient {
    /// Create a new client with default routes and timeouts
    ///
    /// # Example
    /// ```
    /// use tasklane_client::TaskClient;
    ///
    /// let client = TaskClient::new("http://localhost:8080/", "secret");
    /// assert_eq!(client.base_url(), "http://localhost:8080");
    /// ```
    pub fn new(base_url: impl Into<String>, api_key: impl Into<String>) -> Self {
        Self::with_client(base_url, api_key, Client::new())
    }

    /// Create a client around a pre-configured reqwest Client
    ///
    /// This allows you to configure proxies, TLS settings, connection pools, etc.
    pub fn with_client(
        base_url: impl Into<String>,
        api_key: impl Into<String>,
        client: Client,
    ) -> Self {
        let base_url = base_url.into();
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key: api_key.into(),
            routes: JobRoutes::default(),
            timeouts: RequestTimeouts::default(),
            client,
        }
    }

    pub fn with_routes(mut self, routes: JobRoutes) -> Self {
        self.routes = routes;
        self
    }

    pub fn with_timeouts(mut self, timeouts: RequestTimeouts) -> Self {
        self.timeouts = timeouts;
        self
    }

    /// Get the base URL of the backend
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn routes(&self) -> &JobRoutes {
        &self.routes
    }

    pub fn timeouts(&self) -> RequestTimeouts {
        self.timeouts
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    fn authorized(&self, builder: RequestBuilder) -> RequestBuilder {
        builder.bearer_auth(&self.api_key)
    }

    // =============================================================================
    // Response Handlers
    // =============================================================================

    /// Handle an API response and deserialize JSON
    ///
    /// A non-2xx status becomes [`ClientError::ApiError`]. A body that is not
    /// valid JSON for `T` becomes [`ClientError::ParseError`].
    async fn handle_response<T: DeserializeOwned>(
        &self,
        response: reqwest::Response,
    ) -> Result<T> {
        let status = response.status();

        if !status.is_success() {
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            return Err(ClientError::api_error(status.as_u16(), error_text));
        }

        let body = response.bytes().await?;
        serde_json::from_slice(&body)
            .map_err(|e| ClientError::ParseError(format!("Failed to parse JSON response: {}", e)))
    }
}

impl fmt::Debug for TaskClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TaskClient")
            .field("base_url", &self.base_url)
            .field("api_key", &"<redacted>")
            .field("routes", &self.routes)
            .field("timeouts", &self.timeouts)
            .finish()
    }
}
