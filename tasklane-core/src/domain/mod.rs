//! Core domain types
//!
//! This module contains the structures shared by the client (which moves them
//! over the wire) and the runner (which drives a job through its lifecycle).

pub mod artifact;
pub mod job;
pub mod request;
