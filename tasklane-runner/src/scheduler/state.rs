//! Job lifecycle state machine
//!
//! [`PollTracker`] consumes the statuses observed while polling and decides
//! what the orchestrator does next. It performs no I/O, so every transition
//! can be exercised directly in tests.
//!
//! ```text
//! Submitted -> {Pending, InProgress}* -> Completed
//!                                     -> Failed
//!                                     -> TimedOut  (budget exhausted, local)
//!                                     -> Rejected  (unrecognized status)
//! ```

use std::fmt;

use tasklane_core::domain::job::JobStatus;

/// Orchestrator-side view of a job
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JobState {
    Submitted,
    Pending,
    InProgress,
    Completed,
    Failed,
    TimedOut,
    Rejected,
}

impl JobState {
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            JobState::Completed | JobState::Failed | JobState::TimedOut | JobState::Rejected
        )
    }
}

impl fmt::Display for JobState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            JobState::Submitted => "SUBMITTED",
            JobState::Pending => "PENDING",
            JobState::InProgress => "IN_PROGRESS",
            JobState::Completed => "COMPLETED",
            JobState::Failed => "FAILED",
            JobState::TimedOut => "TIMED_OUT",
            JobState::Rejected => "REJECTED",
        };
        f.write_str(name)
    }
}

/// What the orchestrator does after one poll
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PollDecision {
    /// Still running; wait and poll again
    Continue,
    /// Fetch the result
    Completed,
    /// Backend reported a failed job
    Failed,
    /// Backend sent a status the client does not recognize
    Unrecognized(String),
    /// Attempt budget exhausted without a terminal status
    Exhausted,
}

/// Tracks polls for a single submitted job
#[derive(Debug, Clone)]
pub struct PollTracker {
    state: JobState,
    attempts: u32,
    max_attempts: u32,
}

impl PollTracker {
    pub fn new(max_attempts: u32) -> Self {
        Self {
            state: JobState::Submitted,
            attempts: 0,
            max_attempts,
        }
    }

    /// Records one poll result and returns the next step
    ///
    /// Once a terminal state is reached further observations are ignored and
    /// the terminal decision is repeated; the orchestrator never polls a
    /// finished job.
    pub fn observe(&mut self, status: &JobStatus) -> PollDecision {
        if self.state.is_terminal() {
            return self.terminal_decision(status);
        }

        self.attempts += 1;

        if status.is_transient() {
            if self.attempts >= self.max_attempts {
                self.state = JobState::TimedOut;
                return PollDecision::Exhausted;
            }

            self.state = if *status == JobStatus::Pending {
                JobState::Pending
            } else {
                JobState::InProgress
            };
            return PollDecision::Continue;
        }

        if !status.is_terminal() {
            self.state = JobState::Rejected;
            return PollDecision::Unrecognized(status.as_str().to_string());
        }

        if *status == JobStatus::Completed {
            self.state = JobState::Completed;
            PollDecision::Completed
        } else {
            self.state = JobState::Failed;
            PollDecision::Failed
        }
    }

    fn terminal_decision(&self, status: &JobStatus) -> PollDecision {
        match self.state {
            JobState::Completed => PollDecision::Completed,
            JobState::Failed => PollDecision::Failed,
            JobState::TimedOut => PollDecision::Exhausted,
            _ => PollDecision::Unrecognized(status.as_str().to_string()),
        }
    }

    pub fn state(&self) -> JobState {
        self.state
    }

    /// Number of polls recorded so far
    pub fn attempts(&self) -> u32 {
        self.attempts
    }

    pub fn max_attempts(&self) -> u32 {
        self.max_attempts
    }
}
