//! Scheduler layer for the runner
//!
//! This layer drives a submitted job through its remote lifecycle: it polls
//! at a fixed cadence under a bounded budget, decides on each observed status
//! and hands the finished result on for download.

pub mod orchestrator;
pub mod policy;
pub mod state;

pub use orchestrator::{CompletedJob, JobOrchestrator, JobReport};
pub use policy::PollPolicy;
pub use state::{JobState, PollDecision, PollTracker};
