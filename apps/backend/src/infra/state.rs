use std::sync::Arc;

use tracing::info;

use crate::adapters::catalog::{CardCatalog, MemoryCatalog};
use crate::adapters::session_store::{MemorySessionStore, RedisSessionStore, SessionStore};
use crate::config::AppConfig;
use crate::error::AppError;
use crate::services::notifier::Notifier;
use crate::services::registry::{RegistryConfig, SessionRegistry};
use crate::state::app_state::AppState;
use crate::ws::hub::WsRegistry;

/// Builder for creating AppState instances (used in both tests and main)
pub struct StateBuilder {
    config: AppConfig,
    store: Option<Arc<dyn SessionStore>>,
    catalog: Option<Arc<dyn CardCatalog>>,
}

impl StateBuilder {
    pub fn new() -> Self {
        Self {
            config: AppConfig::default(),
            store: None,
            catalog: None,
        }
    }
    pub fn with_config(mut self, config: AppConfig) -> Self {
        self.config = config;
        self
    }
    /// Use `store` instead of the one `REDIS_URL` selects.
    pub fn with_store(mut self, store: Arc<dyn SessionStore>) -> Self {
        self.store = Some(store);
        self
    }
    pub fn with_catalog(mut self, catalog: Arc<dyn CardCatalog>) -> Self {
        self.catalog = Some(catalog);
        self
    }

    pub async fn build(self) -> Result<AppState, AppError> {
        let config = self.config;

        let (store, store_kind): (Arc<dyn SessionStore>, &'static str) =
            match (self.store, &config.redis_url) {
                (Some(store), _) => (store, "custom"),
                (None, Some(url)) => {
                    let store = RedisSessionStore::connect(url, config.store_timeout)
                        .await
                        .map_err(|e| AppError::config(format!("Redis session store: {e}")))?;
                    info!(store = "redis", "Session store connected");
                    (Arc::new(store), "redis")
                }
                (None, None) => {
                    info!(store = "memory", "REDIS_URL not set; sessions are kept in memory");
                    (Arc::new(MemorySessionStore::new()), "memory")
                }
            };

        let catalog: Arc<dyn CardCatalog> = match (self.catalog, &config.catalog_path) {
            (Some(catalog), _) => catalog,
            (None, Some(path)) => Arc::new(
                MemoryCatalog::from_path(path).map_err(|e| AppError::config(e.to_string()))?,
            ),
            (None, None) => {
                Arc::new(MemoryCatalog::builtin().map_err(|e| AppError::config(e.to_string()))?)
            }
        };

        let hub = Arc::new(WsRegistry::new());
        let notifier: Arc<dyn Notifier> = hub.clone();
        let registry = SessionRegistry::new(
            store.clone(),
            catalog.clone(),
            notifier,
            RegistryConfig {
                session_ttl: config.session_ttl,
                timings: config.timings,
                seed: config.rng_seed,
                ..RegistryConfig::default()
            },
        );

        Ok(AppState::new(
            Arc::new(registry),
            hub,
            store,
            catalog,
            store_kind,
            config,
        ))
    }
}

impl Default for StateBuilder {
    fn default() -> Self {
        Self::new()
    }
}
pub fn build_state() -> StateBuilder {
    StateBuilder::new()
}
