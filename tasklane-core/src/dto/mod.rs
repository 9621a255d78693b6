//! Data Transfer Objects for the backend wire protocol
//!
//! Each envelope mirrors one backend response and converts into a domain type,
//! rejecting shapes the client cannot reason about.

pub mod job;
