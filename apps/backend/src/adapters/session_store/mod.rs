//! Key-value session store contract and its implementations.

mod memory;
pub mod record;
mod redis_store;

use std::collections::HashMap;
use std::time::Duration;

use async_trait::async_trait;
use thiserror::Error;

pub use self::memory::MemorySessionStore;
pub use self::redis_store::RedisSessionStore;
use crate::errors::domain::{DomainError, InfraErrorKind};

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum StoreError {
    #[error("store call {op} timed out after {after_ms} ms")]
    Timeout { op: &'static str, after_ms: u128 },
    #[error("store unavailable: {0}")]
    Unavailable(String),
    #[error("corrupt field {field}: {detail}")]
    Corrupt { field: String, detail: String },
}

impl From<StoreError> for DomainError {
    fn from(e: StoreError) -> Self {
        let kind = match &e {
            StoreError::Timeout { .. } => InfraErrorKind::Timeout,
            StoreError::Unavailable(_) => InfraErrorKind::Unreachable,
            StoreError::Corrupt { .. } => InfraErrorKind::DataCorruption,
        };
        DomainError::unavailable(kind, e.to_string())
    }
}

/// Async hash + string store. Every call completes or fails within the
/// implementation's own deadline.
#[async_trait]
pub trait SessionStore: Send + Sync {
    /// All fields of a hash; empty when the key does not exist.
    async fn get_all(&self, key: &str) -> Result<HashMap<String, String>, StoreError>;

    async fn get_field(&self, key: &str, field: &str) -> Result<Option<String>, StoreError>;

    async fn set_fields(&self, key: &str, fields: &[(String, String)]) -> Result<(), StoreError>;

    async fn exists(&self, key: &str) -> Result<bool, StoreError>;

    /// Standalone string value, optionally expiring after `ttl`.
    async fn set_string(
        &self,
        key: &str,
        value: &str,
        ttl: Option<Duration>,
    ) -> Result<(), StoreError>;

    /// Set `key` only if it is absent, in one step. Returns false when the
    /// key already held a live value.
    async fn set_string_if_absent(
        &self,
        key: &str,
        value: &str,
        ttl: Duration,
    ) -> Result<bool, StoreError>;

    async fn delete(&self, key: &str) -> Result<(), StoreError>;
}
