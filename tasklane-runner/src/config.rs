//! Runner configuration
//!
//! Backend connection, local storage and polling settings for the
//! orchestrator.

use std::path::PathBuf;
use std::time::Duration;

use tasklane_client::{JobRoutes, RequestTimeouts, TaskClient};

use crate::scheduler::policy::PollPolicy;

/// Runner configuration
#[derive(Clone)]
pub struct Config {
    /// Backend base URL (e.g., "https://backend.example.com/api")
    pub base_url: String,

    /// Bearer token for backend requests
    pub api_key: String,

    /// Directory for artifacts saved without an explicit destination
    pub storage_dir: PathBuf,

    /// Poll interval and attempt budget
    pub poll_policy: PollPolicy,

    /// Per-call HTTP timeouts
    pub timeouts: RequestTimeouts,
}

impl Config {
    /// Creates a new configuration with defaults
    pub fn new(base_url: impl Into<String>, api_key: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            api_key: api_key.into(),
            storage_dir: std::env::temp_dir(),
            poll_policy: PollPolicy::default(),
            timeouts: RequestTimeouts::default(),
        }
    }

    /// Creates configuration from environment variables
    ///
    /// Expected environment variables:
    /// - TASKLANE_BASE_URL (required)
    /// - TASKLANE_API_KEY (required)
    /// - TASKLANE_STORAGE_DIR (optional, default: system temp dir)
    /// - TASKLANE_POLL_INTERVAL (optional, seconds, default: 5)
    /// - TASKLANE_MAX_POLL_ATTEMPTS (optional, default: 60)
    pub fn from_env() -> anyhow::Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Creates configuration from an arbitrary variable source
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> anyhow::Result<Self> {
        let base_url = lookup("TASKLANE_BASE_URL")
            .ok_or_else(|| anyhow::anyhow!("TASKLANE_BASE_URL environment variable not set"))?;

        let api_key = lookup("TASKLANE_API_KEY")
            .ok_or_else(|| anyhow::anyhow!("TASKLANE_API_KEY environment variable not set"))?;

        let mut config = Self::new(base_url, api_key);

        if let Some(dir) = lookup("TASKLANE_STORAGE_DIR").filter(|d| !d.is_empty()) {
            config.storage_dir = PathBuf::from(dir);
        }

        if let Some(secs) = lookup("TASKLANE_POLL_INTERVAL") {
            let secs = secs.parse::<u64>().map_err(|_| {
                anyhow::anyhow!("TASKLANE_POLL_INTERVAL must be a number of seconds")
            })?;
            config.poll_policy.interval = Duration::from_secs(secs);
        }

        if let Some(attempts) = lookup("TASKLANE_MAX_POLL_ATTEMPTS") {
            config.poll_policy.max_attempts = attempts.parse::<u32>().map_err(|_| {
                anyhow::anyhow!("TASKLANE_MAX_POLL_ATTEMPTS must be a whole number")
            })?;
        }

        Ok(config)
    }

    pub fn with_storage_dir(mut self, storage_dir: impl Into<PathBuf>) -> Self {
        self.storage_dir = storage_dir.into();
        self
    }

    pub fn with_poll_policy(mut self, poll_policy: PollPolicy) -> Self {
        self.poll_policy = poll_policy;
        self
    }

    pub fn with_timeouts(mut self, timeouts: RequestTimeouts) -> Self {
        self.timeouts = timeouts;
        self
    }

    /// Validates the configuration
    pub fn validate(&self) -> anyhow::Result<()> {
        if self.base_url.is_empty() {
            anyhow::bail!("base_url cannot be empty");
        }

        if !self.base_url.starts_with("http://") && !self.base_url.starts_with("https://") {
            anyhow::bail!("base_url must start with http:// or https://");
        }

        if self.api_key.trim().is_empty() {
            anyhow::bail!("api_key cannot be empty");
        }

        self.poll_policy.validate()
    }

    /// Builds a backend client for the given job family
    pub fn client(&self, routes: JobRoutes) -> TaskClient {
        TaskClient::new(&self.base_url, &self.api_key)
            .with_routes(routes)
            .with_timeouts(self.timeouts)
    }
}

impl std::fmt::Debug for Config {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Config")
            .field("base_url", &self.base_url)
            .field("api_key", &"<redacted>")
            .field("storage_dir", &self.storage_dir)
            .field("poll_policy", &self.poll_policy)
            .field("timeouts", &self.timeouts)
            .finish()
    }
}
