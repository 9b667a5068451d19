//! Inbound actions, replies and timers exchanged with the session actor.

use serde::{Deserialize, Serialize};

use crate::domain::cards::CardId;
use crate::domain::events::GameEvent;
use crate::domain::movement::{Move, ValidMoves};
use crate::domain::session::PlayerId;

/// Player action as sent over the websocket: `{"action": "...", ...}`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(tag = "action", rename_all = "camelCase", rename_all_fields = "camelCase")]
pub enum PlayerAction {
    PlayerReady {
        is_ready: bool,
    },
    StartGame,
    FinishTutorial,
    PlayerMove {
        #[serde(rename = "move")]
        mv: Move,
    },
    GetValidMoves,
    EndTurn,
    StartBetting,
    PlaceBet {
        bet: String,
    },
    PlaceChallengeVote {
        vote: String,
    },
    StartQuiz {
        chosen_theme: String,
    },
    QuizAnswer {
        answer: String,
        #[serde(default)]
        question_index: Option<usize>,
    },
    PickUpObject,
    UseObject {
        item_id: CardId,
    },
    GetActivePlayer,
}

impl PlayerAction {
    pub fn name(&self) -> &'static str {
        match self {
            PlayerAction::PlayerReady { .. } => "playerReady",
            PlayerAction::StartGame => "startGame",
            PlayerAction::FinishTutorial => "finishTutorial",
            PlayerAction::PlayerMove { .. } => "playerMove",
            PlayerAction::GetValidMoves => "getValidMoves",
            PlayerAction::EndTurn => "endTurn",
            PlayerAction::StartBetting => "startBetting",
            PlayerAction::PlaceBet { .. } => "placeBet",
            PlayerAction::PlaceChallengeVote { .. } => "placeChallengeVote",
            PlayerAction::StartQuiz { .. } => "startQuiz",
            PlayerAction::QuizAnswer { .. } => "quizAnswer",
            PlayerAction::PickUpObject => "pickUpObject",
            PlayerAction::UseObject { .. } => "useObject",
            PlayerAction::GetActivePlayer => "getActivePlayer",
        }
    }
}

/// Answer sent to the requesting connection only.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "camelCase", rename_all_fields = "camelCase")]
pub enum ActionReply {
    Ack,
    ValidMoves {
        #[serde(flatten)]
        moves: ValidMoves,
    },
    ActivePlayer {
        active_player_id: Option<PlayerId>,
        active_player_name: Option<String>,
    },
}

/// Deferred step posted back to the actor after a pacing delay.
///
/// Each timer carries the state it was scheduled for; the handler ignores
/// it when the session has moved on.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Timer {
    CloseBetting { active_player_id: PlayerId },
    NextQuestion {
        active_player_id: PlayerId,
        answered_index: usize,
    },
}

impl Timer {
    pub fn name(&self) -> &'static str {
        match self {
            Timer::CloseBetting { .. } => "closeBetting",
            Timer::NextQuestion { .. } => "nextQuestion",
        }
    }
}

/// Result of applying one action or timer to the working copy.
#[derive(Debug, Clone, PartialEq)]
pub struct ActionOutcome {
    /// Broadcast to every connection of the session, in order.
    pub events: Vec<GameEvent>,
    pub reply: ActionReply,
    pub timers: Vec<Timer>,
    /// False for queries and no-ops: nothing is written or broadcast.
    pub persist: bool,
}

impl ActionOutcome {
    pub fn broadcast(events: Vec<GameEvent>) -> Self {
        Self {
            events,
            reply: ActionReply::Ack,
            timers: Vec::new(),
            persist: true,
        }
    }

    pub fn query(reply: ActionReply) -> Self {
        Self {
            events: Vec::new(),
            reply,
            timers: Vec::new(),
            persist: false,
        }
    }

    /// Accepted, but nothing changed.
    pub fn idle() -> Self {
        Self::query(ActionReply::Ack)
    }

    pub fn with_timer(mut self, timer: Timer) -> Self {
        self.timers.push(timer);
        self
    }

    pub fn event_names(&self) -> Vec<&'static str> {
        self.events.iter().map(GameEvent::name).collect()
    }
}
