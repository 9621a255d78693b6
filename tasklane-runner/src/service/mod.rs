//! Service layer
//!
//! Services are the local collaborators of the orchestrator: reading input
//! files, shaping request payloads and persisting downloaded artifacts.
//!
//! All services are trait-based to enable testing and dependency injection.

mod input;
mod payload;
mod storage;

// Re-export traits
pub use input::InputReader;
pub use payload::PayloadBuilder;
pub use storage::ArtifactStore;

// Re-export implementations
pub use input::FsInputReader;
pub use payload::{EditPayload, ImageModel, ProcessPayload, ResponseMode, UpscalePayload};
pub use storage::FsArtifactStore;
