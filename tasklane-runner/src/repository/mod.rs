//! Repository layer
//!
//! Repositories are the seams between the orchestrator and the remote
//! backend. They expose focused, trait-based interfaces with no scheduling
//! logic so the orchestrator can be driven by in-memory fakes in tests.

mod artifacts;
mod jobs;

// Re-export traits
pub use artifacts::ArtifactRepository;
pub use jobs::JobRepository;
