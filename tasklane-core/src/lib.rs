//! Tasklane Core
//!
//! Core types for the Tasklane remote job protocol.
//!
//! This crate contains:
//! - Domain types: job handles, statuses, request payloads and result artifacts
//! - DTOs: wire envelopes returned by the backend, decoded once into domain types

pub mod domain;
pub mod dto;
