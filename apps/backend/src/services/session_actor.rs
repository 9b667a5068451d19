//! Single-writer task owning one live session.
//!
//! Every action, timer and query is a message on the actor's channel. An
//! action runs against a clone of the owned session; the clone is written to
//! the store and only then replaces the owned state, so a failed step leaves
//! both the actor and the store untouched.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::{mpsc, oneshot};
use tracing::{debug, info, info_span, warn, Instrument};

use crate::adapters::session_store::record::save_session;
use crate::adapters::session_store::SessionStore;
use crate::domain::session::{PlayerId, Session};
use crate::domain::snapshot::SessionView;
use crate::errors::domain::{DomainError, NotFoundKind};
use crate::services::game_flow::{ActionOutcome, ActionReply, GameFlowService, PlayerAction, Timer};
use crate::services::notifier::Notifier;

const COMMAND_BUFFER: usize = 64;

/// Pacing delays between sub-phase steps, and how long an actor may sit
/// without commands before it stops.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Timings {
    pub bet_close_delay: Duration,
    pub quiz_next_delay: Duration,
    pub idle_timeout: Duration,
}

const DEFAULT_IDLE_TIMEOUT: Duration = Duration::from_secs(30 * 60);

impl Timings {
    /// No pacing at all; timers fire on the next scheduler tick.
    pub fn immediate() -> Self {
        Self {
            bet_close_delay: Duration::ZERO,
            quiz_next_delay: Duration::ZERO,
            idle_timeout: DEFAULT_IDLE_TIMEOUT,
        }
    }

    pub fn delay_for(&self, timer: &Timer) -> Duration {
        match timer {
            Timer::CloseBetting { .. } => self.bet_close_delay,
            Timer::NextQuestion { .. } => self.quiz_next_delay,
        }
    }
}

impl Default for Timings {
    fn default() -> Self {
        Self {
            bet_close_delay: Duration::from_millis(2000),
            quiz_next_delay: Duration::from_millis(1000),
            idle_timeout: DEFAULT_IDLE_TIMEOUT,
        }
    }
}

pub enum SessionCommand {
    Join {
        player_id: PlayerId,
        name: String,
        reply: oneshot::Sender<Result<(), DomainError>>,
    },
    Act {
        player_id: PlayerId,
        action: PlayerAction,
        reply: oneshot::Sender<Result<ActionReply, DomainError>>,
    },
    Snapshot {
        reply: oneshot::Sender<SessionView>,
    },
    Timer(Timer),
    Shutdown {
        reply: oneshot::Sender<()>,
    },
}

/// Cloneable address of a session actor.
#[derive(Clone)]
pub struct SessionHandle {
    code: String,
    tx: mpsc::Sender<SessionCommand>,
}

impl SessionHandle {
    pub fn code(&self) -> &str {
        &self.code
    }

    /// True once the actor has stopped.
    pub fn is_closed(&self) -> bool {
        self.tx.is_closed()
    }

    pub async fn join(&self, player_id: PlayerId, name: &str) -> Result<(), DomainError> {
        let (reply, rx) = oneshot::channel();
        self.send(SessionCommand::Join {
            player_id,
            name: name.to_string(),
            reply,
        })
        .await?;
        rx.await.map_err(|_| self.stopped())?
    }

    pub async fn act(
        &self,
        player_id: &str,
        action: PlayerAction,
    ) -> Result<ActionReply, DomainError> {
        let (reply, rx) = oneshot::channel();
        self.send(SessionCommand::Act {
            player_id: player_id.to_string(),
            action,
            reply,
        })
        .await?;
        rx.await.map_err(|_| self.stopped())?
    }

    pub async fn snapshot(&self) -> Result<SessionView, DomainError> {
        let (reply, rx) = oneshot::channel();
        self.send(SessionCommand::Snapshot { reply }).await?;
        rx.await.map_err(|_| self.stopped())
    }

    /// Stop the actor after the commands already queued.
    pub async fn shutdown(&self) {
        let (reply, rx) = oneshot::channel();
        if self.send(SessionCommand::Shutdown { reply }).await.is_ok() {
            let _ = rx.await;
        }
    }

    async fn send(&self, cmd: SessionCommand) -> Result<(), DomainError> {
        self.tx.send(cmd).await.map_err(|_| self.stopped())
    }

    fn stopped(&self) -> DomainError {
        DomainError::not_found(
            NotFoundKind::Session,
            format!("game {} is no longer running", self.code),
        )
    }
}

struct SessionActor {
    session: Session,
    flow: GameFlowService,
    store: Arc<dyn SessionStore>,
    notifier: Arc<dyn Notifier>,
    timings: Timings,
    timers: mpsc::WeakSender<SessionCommand>,
}

/// Start the actor for `session` on the current runtime.
pub fn spawn(
    session: Session,
    flow: GameFlowService,
    store: Arc<dyn SessionStore>,
    notifier: Arc<dyn Notifier>,
    timings: Timings,
) -> SessionHandle {
    let (tx, rx) = mpsc::channel(COMMAND_BUFFER);
    let code = session.code.clone();
    let actor = SessionActor {
        session,
        flow,
        store,
        notifier,
        timings,
        timers: tx.downgrade(),
    };
    let span = info_span!("session", game_id = %code);
    tokio::spawn(actor.run(rx).instrument(span));
    SessionHandle { code, tx }
}

impl SessionActor {
    async fn run(mut self, mut rx: mpsc::Receiver<SessionCommand>) {
        debug!(phase = self.session.phase.as_str(), "Session actor started");
        for timer in GameFlowService::pending_timers(&self.session) {
            debug!(timer = timer.name(), "Re-arming pending timer");
            self.schedule(timer);
        }
        loop {
            // State is persisted per commit; the registry restores stopped actors.
            let cmd = match tokio::time::timeout(self.timings.idle_timeout, rx.recv()).await {
                Ok(Some(cmd)) => cmd,
                Ok(None) => break,
                Err(_) => {
                    info!(
                        idle_secs = self.timings.idle_timeout.as_secs(),
                        "Session idle, stopping actor"
                    );
                    break;
                }
            };
            match cmd {
                SessionCommand::Join {
                    player_id,
                    name,
                    reply,
                } => {
                    let result = self.join(player_id, &name).await;
                    let _ = reply.send(result);
                }
                SessionCommand::Act {
                    player_id,
                    action,
                    reply,
                } => {
                    let result = self.act(&player_id, action).await;
                    if let Err(err) = &result {
                        debug!(player_id = %player_id, error = %err, "Action rejected");
                    }
                    let _ = reply.send(result);
                }
                SessionCommand::Snapshot { reply } => {
                    let _ = reply.send(SessionView::of(&self.session));
                }
                SessionCommand::Timer(timer) => self.fire(timer).await,
                SessionCommand::Shutdown { reply } => {
                    let _ = reply.send(());
                    break;
                }
            }
        }
        info!("Session actor stopped");
    }

    async fn join(&mut self, player_id: PlayerId, name: &str) -> Result<(), DomainError> {
        let mut working = self.session.clone();
        let outcome = self.flow.join(&mut working, player_id, name)?;
        self.commit(working, outcome).await.map(|_| ())
    }

    async fn act(
        &mut self,
        player_id: &str,
        action: PlayerAction,
    ) -> Result<ActionReply, DomainError> {
        let mut working = self.session.clone();
        let outcome = self.flow.apply(&mut working, player_id, action).await?;
        self.commit(working, outcome).await
    }

    async fn fire(&mut self, timer: Timer) {
        let name = timer.name();
        let mut working = self.session.clone();
        let result = match self.flow.on_timer(&mut working, timer).await {
            Ok(outcome) => self.commit(working, outcome).await,
            Err(err) => Err(err),
        };
        if let Err(err) = result {
            warn!(timer = name, error = %err, "Timer step failed");
        }
    }

    /// Persist the working copy, adopt it and broadcast. Outcomes that change
    /// nothing skip all three.
    async fn commit(
        &mut self,
        working: Session,
        outcome: ActionOutcome,
    ) -> Result<ActionReply, DomainError> {
        if !outcome.persist {
            return Ok(outcome.reply);
        }
        save_session(self.store.as_ref(), &working).await?;
        self.session = working;
        self.notifier.broadcast(&self.session.code, &outcome.events);
        for timer in outcome.timers {
            self.schedule(timer);
        }
        Ok(outcome.reply)
    }

    fn schedule(&self, timer: Timer) {
        let delay = self.timings.delay_for(&timer);
        let tx = self.timers.clone();
        tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            if let Some(tx) = tx.upgrade() {
                let _ = tx.send(SessionCommand::Timer(timer)).await;
            }
        });
    }
}
