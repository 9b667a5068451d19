//! Adapters for the external collaborators of the game core.

pub mod catalog;
pub mod session_store;
