//! Tasklane Runner
//!
//! Client-side orchestration of remote asynchronous jobs.
//!
//! Architecture:
//! - Configuration: Backend, storage and polling settings from environment or defaults
//! - Repositories: Trait seams over the HTTP client (jobs, artifacts)
//! - Services: Input reading, payload shaping, artifact persistence
//! - Scheduler: Poll policy, job state machine and the orchestrator
//!
//! A job is submitted, polled at a fixed interval until it reaches a terminal
//! status or the attempt budget runs out, its result is fetched, and the first
//! artifact is downloaded to local storage.
//!
//! # Example
//!
//! ```no_run
//! use tasklane_runner::{Config, JobOrchestrator, PayloadBuilder, ProcessPayload};
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let config = Config::from_env()?;
//!     let payload = ProcessPayload::new("input.png", "make it blue");
//!
//!     let orchestrator = JobOrchestrator::with_client(config.client(payload.routes()), &config);
//!     let completed = orchestrator.run(&payload, None).await?;
//!
//!     println!("Saved {}", completed.artifact.path.display());
//!     Ok(())
//! }
//! ```

pub mod config;
pub mod error;
pub mod repository;
pub mod scheduler;
pub mod service;

pub use config::Config;
pub use error::{ErrorKind, JobError, Phase, Result};
pub use scheduler::{CompletedJob, JobOrchestrator, JobReport, PollPolicy};
pub use service::{
    EditPayload, ImageModel, PayloadBuilder, ProcessPayload, ResponseMode, UpscalePayload,
};
pub use tasklane_core::domain::job::JobHandle;
