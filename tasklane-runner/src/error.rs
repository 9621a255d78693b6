//! Orchestration errors
//!
//! Every failure surfaced by the orchestrator is a [`JobError`]. Each variant
//! carries the phase it happened in and, once a job has been submitted, its
//! handle, so a single log line is enough to diagnose it.

use std::fmt;
use std::path::PathBuf;
use std::time::Duration;

use tasklane_client::ClientError;
use tasklane_core::domain::job::JobHandle;
use thiserror::Error;

/// Result type alias for orchestration
pub type Result<T> = std::result::Result<T, JobError>;

/// Step of the job lifecycle an error belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Input,
    Submit,
    Poll,
    Fetch,
    Download,
    Persist,
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Phase::Input => "input",
            Phase::Submit => "submit",
            Phase::Poll => "poll",
            Phase::Fetch => "fetch",
            Phase::Download => "download",
            Phase::Persist => "persist",
        };
        f.write_str(name)
    }
}

/// Coarse error category callers can branch on
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Input,
    Transport,
    Protocol,
    JobFailure,
    Timeout,
    Storage,
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ErrorKind::Input => "input error",
            ErrorKind::Transport => "transport error",
            ErrorKind::Protocol => "protocol error",
            ErrorKind::JobFailure => "job failure",
            ErrorKind::Timeout => "timeout",
            ErrorKind::Storage => "storage error",
        };
        f.write_str(name)
    }
}

/// Errors that end a job run
#[derive(Debug, Error)]
pub enum JobError {
    /// Missing or invalid local input, or an unsupported option value
    #[error("Invalid input: {message}")]
    Input { message: String },

    /// Network failure, per-call timeout or non-2xx status
    #[error("Transport error during {phase}{}: {source}", handle_suffix(.handle))]
    Transport {
        phase: Phase,
        handle: Option<JobHandle>,
        #[source]
        source: ClientError,
    },

    /// Response did not match the wire contract
    #[error("Protocol error during {phase}{}: {message}", handle_suffix(.handle))]
    Protocol {
        phase: Phase,
        handle: Option<JobHandle>,
        message: String,
    },

    /// The backend reported the job as failed
    #[error("Job {handle} failed during processing")]
    JobFailed { handle: JobHandle },

    /// The polling budget ran out before the job reached a terminal state
    #[error("Job {handle} timed out after {attempts} polls ({budget:?})")]
    TimedOut {
        handle: JobHandle,
        attempts: u32,
        budget: Duration,
    },

    /// Writing the artifact to local storage failed
    #[error("Failed to write artifact to {}: {source}", .path.display())]
    Storage {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

fn handle_suffix(handle: &Option<JobHandle>) -> String {
    handle
        .as_ref()
        .map(|h| format!(" of job {}", h))
        .unwrap_or_default()
}

impl JobError {
    pub fn input(message: impl Into<String>) -> Self {
        Self::Input {
            message: message.into(),
        }
    }

    pub fn protocol(phase: Phase, handle: Option<&JobHandle>, message: impl Into<String>) -> Self {
        Self::Protocol {
            phase,
            handle: handle.cloned(),
            message: message.into(),
        }
    }

    /// Wraps a client error, keeping its transport/protocol category
    pub fn from_client(phase: Phase, handle: Option<&JobHandle>, err: ClientError) -> Self {
        match err {
            ClientError::ParseError(message) => Self::protocol(phase, handle, message),
            source => Self::Transport {
                phase,
                handle: handle.cloned(),
                source,
            },
        }
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            JobError::Input { .. } => ErrorKind::Input,
            JobError::Transport { .. } => ErrorKind::Transport,
            JobError::Protocol { .. } => ErrorKind::Protocol,
            JobError::JobFailed { .. } => ErrorKind::JobFailure,
            JobError::TimedOut { .. } => ErrorKind::Timeout,
            JobError::Storage { .. } => ErrorKind::Storage,
        }
    }

    /// Handle of the job the error belongs to, if it was submitted
    pub fn handle(&self) -> Option<&JobHandle> {
        match self {
            JobError::Transport { handle, .. } | JobError::Protocol { handle, .. } => {
                handle.as_ref()
            }
            JobError::JobFailed { handle } | JobError::TimedOut { handle, .. } => Some(handle),
            JobError::Input { .. } | JobError::Storage { .. } => None,
        }
    }

    pub fn phase(&self) -> Phase {
        match self {
            JobError::Input { .. } => Phase::Input,
            JobError::Transport { phase, .. } | JobError::Protocol { phase, .. } => *phase,
            JobError::JobFailed { .. } | JobError::TimedOut { .. } => Phase::Poll,
            JobError::Storage { .. } => Phase::Persist,
        }
    }
}
