//! Redis-backed store over a shared connection manager.

use std::collections::HashMap;
use std::future::Future;
use std::time::Duration;

use async_trait::async_trait;
use redis::aio::ConnectionManager;
use redis::{AsyncCommands, Client, RedisResult};
use tracing::warn;

use super::{SessionStore, StoreError};

#[derive(Clone)]
pub struct RedisSessionStore {
    conn: ConnectionManager,
    timeout: Duration,
}

impl RedisSessionStore {
    pub async fn connect(redis_url: &str, timeout: Duration) -> Result<Self, StoreError> {
        let client = Client::open(redis_url)
            .map_err(|err| StoreError::Unavailable(format!("invalid REDIS_URL: {err}")))?;
        let conn = tokio::time::timeout(timeout, ConnectionManager::new(client))
            .await
            .map_err(|_| StoreError::Timeout {
                op: "connect",
                after_ms: timeout.as_millis(),
            })?
            .map_err(|err| {
                StoreError::Unavailable(format!("unable to initialize Redis connection: {err}"))
            })?;
        Ok(Self { conn, timeout })
    }

    async fn bounded<T, F>(&self, op: &'static str, fut: F) -> Result<T, StoreError>
    where
        F: Future<Output = RedisResult<T>> + Send,
    {
        match tokio::time::timeout(self.timeout, fut).await {
            Ok(Ok(value)) => Ok(value),
            Ok(Err(err)) => {
                warn!(op, error = %err, "redis call failed");
                Err(StoreError::Unavailable(err.to_string()))
            }
            Err(_) => {
                warn!(op, timeout_ms = self.timeout.as_millis() as u64, "redis call timed out");
                Err(StoreError::Timeout {
                    op,
                    after_ms: self.timeout.as_millis(),
                })
            }
        }
    }
}

#[async_trait]
impl SessionStore for RedisSessionStore {
    async fn get_all(&self, key: &str) -> Result<HashMap<String, String>, StoreError> {
        let mut conn = self.conn.clone();
        self.bounded("hgetall", async move { conn.hgetall(key).await })
            .await
    }

    async fn get_field(&self, key: &str, field: &str) -> Result<Option<String>, StoreError> {
        let mut conn = self.conn.clone();
        self.bounded("hget", async move { conn.hget(key, field).await })
            .await
    }

    async fn set_fields(&self, key: &str, fields: &[(String, String)]) -> Result<(), StoreError> {
        if fields.is_empty() {
            return Ok(());
        }
        let mut conn = self.conn.clone();
        self.bounded("hset", async move { conn.hset_multiple(key, fields).await })
            .await
    }

    async fn exists(&self, key: &str) -> Result<bool, StoreError> {
        let mut conn = self.conn.clone();
        self.bounded("exists", async move { conn.exists(key).await })
            .await
    }

    async fn set_string(
        &self,
        key: &str,
        value: &str,
        ttl: Option<Duration>,
    ) -> Result<(), StoreError> {
        let mut conn = self.conn.clone();
        match ttl {
            Some(ttl) => {
                let secs = ttl.as_secs().max(1);
                self.bounded("set_ex", async move { conn.set_ex(key, value, secs).await })
                    .await
            }
            None => {
                self.bounded("set", async move { conn.set(key, value).await })
                    .await
            }
        }
    }

    async fn set_string_if_absent(
        &self,
        key: &str,
        value: &str,
        ttl: Duration,
    ) -> Result<bool, StoreError> {
        let mut conn = self.conn.clone();
        let secs = ttl.as_secs().max(1);
        let reply: Option<String> = self
            .bounded("set_nx", async move {
                redis::cmd("SET")
                    .arg(key)
                    .arg(value)
                    .arg("NX")
                    .arg("EX")
                    .arg(secs)
                    .query_async(&mut conn)
                    .await
            })
            .await?;
        Ok(reply.is_some())
    }

    async fn delete(&self, key: &str) -> Result<(), StoreError> {
        let mut conn = self.conn.clone();
        self.bounded("del", async move { conn.del(key).await })
            .await
    }
}
