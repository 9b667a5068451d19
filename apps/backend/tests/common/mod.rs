#![allow(dead_code)]

pub mod ws_client;

use std::sync::Arc;
use std::time::Duration;

use backend::adapters::catalog::ScriptedCatalog;
use backend::adapters::session_store::MemorySessionStore;
use backend::domain::session::Phase;
use backend::services::notifier::RecordingNotifier;
use backend::services::session_actor::Timings;
use backend::{ActionReply, PlayerAction, RegistryConfig, SessionRegistry};

// Logging is auto-installed for every test binary
#[ctor::ctor]
fn init_logging() {
    backend_test_support::logging::init();
}

/// A registry over an in-memory store whose draws follow `script`.
pub struct Harness {
    pub registry: Arc<SessionRegistry>,
    pub notifier: Arc<RecordingNotifier>,
    pub store: Arc<MemorySessionStore>,
    pub catalog: Arc<ScriptedCatalog>,
}

pub fn harness(script: &[u32]) -> Harness {
    let store = Arc::new(MemorySessionStore::new());
    let notifier = Arc::new(RecordingNotifier::new());
    let catalog =
        Arc::new(ScriptedCatalog::builtin(script.iter().copied()).expect("builtin catalog"));
    let registry = Arc::new(SessionRegistry::new(
        store.clone(),
        catalog.clone(),
        notifier.clone(),
        RegistryConfig {
            timings: Timings::immediate(),
            seed: Some(11),
            ..RegistryConfig::default()
        },
    ));
    Harness {
        registry,
        notifier,
        store,
        catalog,
    }
}

/// Poll until the session reaches `phase`; timers fire on their own task.
pub async fn wait_for_phase(registry: &SessionRegistry, code: &str, phase: Phase) {
    let deadline = tokio::time::Instant::now() + Duration::from_secs(2);
    loop {
        let view = registry.snapshot(code).await.expect("snapshot");
        if view.phase == phase {
            return;
        }
        assert!(
            tokio::time::Instant::now() < deadline,
            "timed out waiting for {phase:?}, still {:?}",
            view.phase
        );
        tokio::time::sleep(Duration::from_millis(5)).await;
    }
}

/// Move `player_id` one step in the first open direction.
pub async fn step(registry: &SessionRegistry, code: &str, player_id: &str) {
    let reply = registry
        .act(code, player_id, PlayerAction::GetValidMoves)
        .await
        .expect("valid moves");
    let ActionReply::ValidMoves { moves } = reply else {
        panic!("expected valid moves, got {reply:?}");
    };
    let mv = if moves.can_move_forward {
        backend::domain::movement::Move::Forward
    } else if moves.can_move_left {
        backend::domain::movement::Move::Left
    } else {
        assert!(moves.can_move_right, "player {player_id} is boxed in");
        backend::domain::movement::Move::Right
    };
    registry
        .act(code, player_id, PlayerAction::PlayerMove { mv })
        .await
        .expect("move");
}
