use std::sync::Arc;

use crate::adapters::catalog::CardCatalog;
use crate::adapters::session_store::SessionStore;
use crate::config::AppConfig;
use crate::services::registry::SessionRegistry;
use crate::ws::hub::WsRegistry;

/// Application state containing shared resources
#[derive(Clone)]
pub struct AppState {
    sessions: Arc<SessionRegistry>,
    hub: Arc<WsRegistry>,
    store: Arc<dyn SessionStore>,
    catalog: Arc<dyn CardCatalog>,
    /// Which store backs the sessions ("redis" or "memory")
    store_kind: &'static str,
    pub config: Arc<AppConfig>,
}

impl AppState {
    pub fn new(
        sessions: Arc<SessionRegistry>,
        hub: Arc<WsRegistry>,
        store: Arc<dyn SessionStore>,
        catalog: Arc<dyn CardCatalog>,
        store_kind: &'static str,
        config: AppConfig,
    ) -> Self {
        Self {
            sessions,
            hub,
            store,
            catalog,
            store_kind,
            config: Arc::new(config),
        }
    }

    pub fn sessions(&self) -> Arc<SessionRegistry> {
        self.sessions.clone()
    }

    /// Websocket connections; also the registry's notifier.
    pub fn hub(&self) -> Arc<WsRegistry> {
        self.hub.clone()
    }

    pub fn store(&self) -> &dyn SessionStore {
        self.store.as_ref()
    }

    pub fn catalog(&self) -> &dyn CardCatalog {
        self.catalog.as_ref()
    }

    pub fn store_kind(&self) -> &'static str {
        self.store_kind
    }
}
