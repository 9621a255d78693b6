//! Configuration module
//!
//! Global CLI options and their conversion into a validated runner
//! configuration.

use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::Args;
use tasklane_runner::{Config, PollPolicy};

/// Options shared by every subcommand
#[derive(Args, Debug, Clone)]
pub struct GlobalArgs {
    /// Backend base URL
    #[arg(long, global = true, env = "TASKLANE_BASE_URL")]
    pub base_url: Option<String>,

    /// Bearer token for the backend
    #[arg(long, global = true, env = "TASKLANE_API_KEY", hide_env_values = true)]
    pub api_key: Option<String>,

    /// Directory for artifacts saved without --output
    #[arg(long, global = true, env = "TASKLANE_STORAGE_DIR")]
    pub storage_dir: Option<PathBuf>,

    /// Seconds between status polls
    #[arg(
        long,
        global = true,
        env = "TASKLANE_POLL_INTERVAL",
        default_value_t = PollPolicy::DEFAULT_INTERVAL.as_secs()
    )]
    pub poll_interval: u64,

    /// Maximum number of status polls before giving up
    #[arg(
        long,
        global = true,
        env = "TASKLANE_MAX_POLL_ATTEMPTS",
        default_value_t = PollPolicy::DEFAULT_MAX_ATTEMPTS
    )]
    pub max_poll_attempts: u32,
}

impl GlobalArgs {
    /// Builds and validates the runner configuration
    pub fn to_config(&self) -> Result<Config> {
        let base_url = self
            .base_url
            .clone()
            .context("Backend URL not set (use --base-url or TASKLANE_BASE_URL)")?;
        let api_key = self
            .api_key
            .clone()
            .context("API key not set (use --api-key or TASKLANE_API_KEY)")?;

        let mut config = Config::new(base_url, api_key).with_poll_policy(PollPolicy::new(
            Duration::from_secs(self.poll_interval),
            self.max_poll_attempts,
        ));

        if let Some(dir) = &self.storage_dir {
            config = config.with_storage_dir(dir);
        }

        config.validate().context("Invalid configuration")?;
        Ok(config)
    }
}
