//! Process-wide map from session code to live session actor.

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use dashmap::DashMap;
use tokio::sync::Mutex;
use tracing::info;
use uuid::Uuid;

use super::game_flow::{ActionReply, GameFlowService, PlayerAction};
use super::notifier::Notifier;
use super::session_actor::{self, SessionHandle, Timings};
use crate::adapters::catalog::CardCatalog;
use crate::adapters::session_store::record::{
    delete_session, game_key, load_session, reserve_code, FIELD_ACTIVE_PLAYER,
};
use crate::adapters::session_store::SessionStore;
use crate::domain::grid::Board;
use crate::domain::session::{PlayerId, Session};
use crate::domain::snapshot::SessionView;
use crate::errors::domain::{ActionKind, DomainError, InfraErrorKind, NotFoundKind};
use crate::utils::join_code::generate_join_code;

const MAX_CODE_ATTEMPTS: usize = 32;

#[derive(Debug, Clone)]
pub struct RegistryConfig {
    /// Lifetime of the `code:{code}` reservation.
    pub session_ttl: Duration,
    pub timings: Timings,
    /// Seeds every session's RNG when set (vote tie-breaks, theft rolls).
    pub seed: Option<u64>,
    pub board: Board,
}

impl Default for RegistryConfig {
    fn default() -> Self {
        Self {
            session_ttl: Duration::from_secs(86_400),
            timings: Timings::default(),
            seed: None,
            board: Board::builtin(),
        }
    }
}

pub struct SessionRegistry {
    sessions: DashMap<String, SessionHandle>,
    store: Arc<dyn SessionStore>,
    catalog: Arc<dyn CardCatalog>,
    notifier: Arc<dyn Notifier>,
    config: RegistryConfig,
    // Serialises restores so one code never gets two actors.
    restore_lock: Mutex<()>,
}

impl SessionRegistry {
    pub fn new(
        store: Arc<dyn SessionStore>,
        catalog: Arc<dyn CardCatalog>,
        notifier: Arc<dyn Notifier>,
        config: RegistryConfig,
    ) -> Self {
        Self {
            sessions: DashMap::new(),
            store,
            catalog,
            notifier,
            config,
            restore_lock: Mutex::new(()),
        }
    }

    /// Create a session hosted by `host_name`. Returns `(code, host_id)`.
    pub async fn create(&self, host_name: &str) -> Result<(String, PlayerId), DomainError> {
        if host_name.trim().is_empty() {
            return Err(DomainError::invalid(
                ActionKind::InvalidName,
                "player name must not be empty",
            ));
        }
        let code = self.allocate_code().await?;
        let handle = self.spawn(Session::new(code.clone(), self.config.board.clone()));
        self.sessions.insert(code.clone(), handle.clone());

        let host_id = new_player_id();
        if let Err(err) = handle.join(host_id.clone(), host_name).await {
            self.sessions.remove(&code);
            handle.shutdown().await;
            return Err(err);
        }
        info!(game_id = %code, player_id = %host_id, "Game created");
        Ok((code, host_id))
    }

    async fn allocate_code(&self) -> Result<String, DomainError> {
        for _ in 0..MAX_CODE_ATTEMPTS {
            let code = generate_join_code();
            if reserve_code(self.store.as_ref(), &code, self.config.session_ttl).await? {
                return Ok(code);
            }
        }
        Err(DomainError::unavailable(
            InfraErrorKind::Unreachable,
            "no free game code could be reserved",
        ))
    }

    pub async fn join(&self, code: &str, name: &str) -> Result<PlayerId, DomainError> {
        let player_id = new_player_id();
        self.on_actor(code, |handle| {
            let player_id = player_id.clone();
            async move { handle.join(player_id, name).await }
        })
        .await?;
        Ok(player_id)
    }

    pub async fn act(
        &self,
        code: &str,
        player_id: &str,
        action: PlayerAction,
    ) -> Result<ActionReply, DomainError> {
        self.on_actor(code, |handle| {
            let action = action.clone();
            async move { handle.act(player_id, action).await }
        })
        .await
    }

    pub async fn snapshot(&self, code: &str) -> Result<SessionView, DomainError> {
        self.on_actor(code, |handle| async move { handle.snapshot().await })
            .await
    }

    /// Run `call` against the live actor. An actor that stopped while idle
    /// drops the call unprocessed, so it is retried once on a restored actor.
    async fn on_actor<T, F, Fut>(&self, code: &str, call: F) -> Result<T, DomainError>
    where
        F: Fn(SessionHandle) -> Fut,
        Fut: Future<Output = Result<T, DomainError>>,
    {
        let handle = self.handle(code).await?;
        match call(handle.clone()).await {
            Err(_) if handle.is_closed() => call(self.handle(code).await?).await,
            result => result,
        }
    }

    /// Active player id; read straight from the store when no actor is live.
    pub async fn active_player(&self, code: &str) -> Result<Option<PlayerId>, DomainError> {
        if let Some(handle) = self.live(code) {
            return Ok(handle.snapshot().await?.active_player_id);
        }
        let key = game_key(code);
        match self.store.get_field(&key, FIELD_ACTIVE_PLAYER).await? {
            Some(id) => Ok(Some(id).filter(|id| !id.is_empty())),
            None if self.store.exists(&key).await? => Ok(None),
            None => Err(session_not_found(code)),
        }
    }

    /// Stop the actor and delete every stored key of the session.
    pub async fn teardown(&self, code: &str) -> Result<(), DomainError> {
        let live = self.sessions.remove(code).map(|(_, handle)| handle);
        let stored = self.store.exists(&game_key(code)).await?;
        if live.is_none() && !stored {
            return Err(session_not_found(code));
        }
        if let Some(handle) = live {
            handle.shutdown().await;
        }
        delete_session(self.store.as_ref(), code).await?;
        info!(game_id = %code, "Game torn down");
        Ok(())
    }

    /// Live actor for `code`, restoring it from the store when needed.
    pub async fn handle(&self, code: &str) -> Result<SessionHandle, DomainError> {
        if let Some(handle) = self.live(code) {
            return Ok(handle);
        }
        let _guard = self.restore_lock.lock().await;
        if let Some(handle) = self.live(code) {
            return Ok(handle);
        }
        let session = load_session(self.store.as_ref(), code)
            .await?
            .ok_or_else(|| session_not_found(code))?;
        info!(
            game_id = %code,
            phase = session.phase.as_str(),
            players = session.players.len(),
            "Game restored from store"
        );
        // Drop entries of actors that stopped on their own.
        self.sessions.retain(|_, handle| !handle.is_closed());
        let handle = self.spawn(session);
        self.sessions.insert(code.to_string(), handle.clone());
        Ok(handle)
    }

    pub fn live_sessions(&self) -> usize {
        self.sessions
            .iter()
            .filter(|entry| !entry.value().is_closed())
            .count()
    }

    fn live(&self, code: &str) -> Option<SessionHandle> {
        self.sessions
            .get(code)
            .map(|entry| entry.value().clone())
            .filter(|handle| !handle.is_closed())
    }

    fn spawn(&self, session: Session) -> SessionHandle {
        let flow = match self.config.seed {
            Some(seed) => GameFlowService::seeded(self.catalog.clone(), seed),
            None => GameFlowService::from_os_rng(self.catalog.clone()),
        };
        session_actor::spawn(
            session,
            flow,
            self.store.clone(),
            self.notifier.clone(),
            self.config.timings,
        )
    }
}

fn new_player_id() -> PlayerId {
    Uuid::new_v4().to_string()
}

fn session_not_found(code: &str) -> DomainError {
    DomainError::not_found(NotFoundKind::Session, format!("game {code} does not exist"))
}
