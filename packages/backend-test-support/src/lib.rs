//! Shared helpers for the backend's integration tests.
//!
//! Kept free of backend types so that assertions check the wire contract
//! rather than the structs that produce it.

pub mod logging;
pub mod problem_details;
