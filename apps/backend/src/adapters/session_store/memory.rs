//! In-process store used when no Redis URL is configured, and by tests.

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::{Duration, Instant};

use async_trait::async_trait;
use dashmap::mapref::entry::Entry as Slot;
use dashmap::DashMap;

use super::{SessionStore, StoreError};

#[derive(Debug, Clone)]
enum Entry {
    Hash(HashMap<String, String>),
    Str {
        value: String,
        expires_at: Option<Instant>,
    },
}

#[derive(Debug, Default)]
pub struct MemorySessionStore {
    entries: DashMap<String, Entry>,
    offline: AtomicBool,
}

impl MemorySessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make every subsequent call fail with `StoreError::Unavailable`.
    pub fn set_offline(&self, offline: bool) {
        self.offline.store(offline, Ordering::SeqCst);
    }

    /// String value under `key`, unless expired.
    pub fn get_string(&self, key: &str) -> Option<String> {
        match self.live_entry(key)? {
            Entry::Str { value, .. } => Some(value),
            Entry::Hash(_) => None,
        }
    }

    fn check(&self) -> Result<(), StoreError> {
        if self.offline.load(Ordering::SeqCst) {
            return Err(StoreError::Unavailable("memory store is offline".into()));
        }
        Ok(())
    }

    fn live_entry(&self, key: &str) -> Option<Entry> {
        let entry = self.entries.get(key)?.clone();
        if let Entry::Str {
            expires_at: Some(at),
            ..
        } = &entry
        {
            if Instant::now() >= *at {
                self.entries.remove(key);
                return None;
            }
        }
        Some(entry)
    }
}

#[async_trait]
impl SessionStore for MemorySessionStore {
    async fn get_all(&self, key: &str) -> Result<HashMap<String, String>, StoreError> {
        self.check()?;
        Ok(match self.live_entry(key) {
            Some(Entry::Hash(map)) => map,
            _ => HashMap::new(),
        })
    }

    async fn get_field(&self, key: &str, field: &str) -> Result<Option<String>, StoreError> {
        self.check()?;
        Ok(match self.live_entry(key) {
            Some(Entry::Hash(map)) => map.get(field).cloned(),
            _ => None,
        })
    }

    async fn set_fields(&self, key: &str, fields: &[(String, String)]) -> Result<(), StoreError> {
        self.check()?;
        let mut entry = self
            .entries
            .entry(key.to_string())
            .or_insert_with(|| Entry::Hash(HashMap::new()));
        if !matches!(*entry, Entry::Hash(_)) {
            *entry = Entry::Hash(HashMap::new());
        }
        if let Entry::Hash(map) = &mut *entry {
            for (field, value) in fields {
                map.insert(field.clone(), value.clone());
            }
        }
        Ok(())
    }

    async fn exists(&self, key: &str) -> Result<bool, StoreError> {
        self.check()?;
        Ok(self.live_entry(key).is_some())
    }

    async fn set_string(
        &self,
        key: &str,
        value: &str,
        ttl: Option<Duration>,
    ) -> Result<(), StoreError> {
        self.check()?;
        self.entries.insert(
            key.to_string(),
            Entry::Str {
                value: value.to_string(),
                expires_at: ttl.map(|d| Instant::now() + d),
            },
        );
        Ok(())
    }

    async fn set_string_if_absent(
        &self,
        key: &str,
        value: &str,
        ttl: Duration,
    ) -> Result<bool, StoreError> {
        self.check()?;
        let fresh = Entry::Str {
            value: value.to_string(),
            expires_at: Some(Instant::now() + ttl),
        };
        match self.entries.entry(key.to_string()) {
            Slot::Occupied(mut slot) => {
                let expired = matches!(
                    slot.get(),
                    Entry::Str { expires_at: Some(at), .. } if Instant::now() >= *at
                );
                if !expired {
                    return Ok(false);
                }
                slot.insert(fresh);
            }
            Slot::Vacant(slot) => {
                slot.insert(fresh);
            }
        }
        Ok(true)
    }

    async fn delete(&self, key: &str) -> Result<(), StoreError> {
        self.check()?;
        self.entries.remove(key);
        Ok(())
    }
}
