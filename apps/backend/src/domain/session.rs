//! Session record: players, phase and the ephemeral sub-state of a turn.

use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};

use crate::domain::cards::{Card, CardId};
use crate::domain::grid::{Board, Position};
use crate::domain::movement::{Orientation, Pose};
use crate::domain::quiz::QuizRun;
use crate::errors::domain::{DomainError, NotFoundKind};

pub type PlayerId = String;

/// Turn/phase states.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Phase {
    /// Lobby; players ready up.
    Waiting,
    /// Active player may move.
    Movement,
    /// A card has been revealed.
    CardDrawn,
    /// Non-active players bet on the challenge outcome.
    Betting,
    /// Bets closed; votes decide the outcome.
    ChallengeInProgress,
    /// Active player answers the three questions.
    QuizInProgress,
    /// Challenge settled.
    Result,
    /// Quiz finished.
    QuizResult,
}

impl Phase {
    pub const fn as_str(self) -> &'static str {
        match self {
            Phase::Waiting => "waiting",
            Phase::Movement => "movement",
            Phase::CardDrawn => "cardDrawn",
            Phase::Betting => "betting",
            Phase::ChallengeInProgress => "challengeInProgress",
            Phase::QuizInProgress => "quizInProgress",
            Phase::Result => "result",
            Phase::QuizResult => "quizResult",
        }
    }

    pub fn parse(raw: &str) -> Option<Self> {
        [
            Phase::Waiting,
            Phase::Movement,
            Phase::CardDrawn,
            Phase::Betting,
            Phase::ChallengeInProgress,
            Phase::QuizInProgress,
            Phase::Result,
            Phase::QuizResult,
        ]
        .into_iter()
        .find(|p| p.as_str() == raw)
    }
}

/// Inventory entry. `item_id` is the id of the card it came from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Item {
    pub item_id: CardId,
    pub name: String,
    pub image: String,
    pub description: String,
}

impl From<&Card> for Item {
    fn from(card: &Card) -> Self {
        Self {
            item_id: card.id,
            name: card.name.clone(),
            image: card.image.clone(),
            description: card.description.clone(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Player {
    pub id: PlayerId,
    pub name: String,
    pub is_host: bool,
    pub position: Position,
    pub orientation: Orientation,
    pub ready: bool,
    pub score: u32,
    pub berries: u32,
    pub inventory: Vec<Item>,
    pub tutorial_done: bool,
}

impl Player {
    pub fn new(id: PlayerId, name: String, is_host: bool, pose: Pose) -> Self {
        Self {
            id,
            name,
            is_host,
            position: pose.position,
            orientation: pose.orientation,
            ready: false,
            score: 0,
            berries: 0,
            inventory: Vec::new(),
            tutorial_done: false,
        }
    }

    pub fn pose(&self) -> Pose {
        Pose {
            position: self.position,
            orientation: self.orientation,
        }
    }

    pub fn set_pose(&mut self, pose: Pose) {
        self.position = pose.position;
        self.orientation = pose.orientation;
    }
}

/// Host start, then joiners alternate between the two other corners.
pub fn starting_pose(join_index: usize) -> Pose {
    if join_index == 0 {
        return Pose {
            position: Position::new(7, 8),
            orientation: Orientation::North,
        };
    }
    if join_index % 2 == 1 {
        Pose {
            position: Position::new(2, 0),
            orientation: Orientation::South,
        }
    } else {
        Pose {
            position: Position::new(0, 8),
            orientation: Orientation::East,
        }
    }
}

/// Bets and votes of one challenge card.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ChallengeRound {
    pub bets: BTreeMap<PlayerId, String>,
    pub votes: BTreeMap<PlayerId, String>,
}

/// Restricted draw pool installed by an item.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ForcedDraw {
    pub pool: Vec<CardId>,
    pub remaining: u8,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Session {
    pub code: String,
    /// Turn order; never re-sorted.
    pub players: Vec<Player>,
    pub active_player_id: Option<PlayerId>,
    pub phase: Phase,
    pub board: Board,
    pub current_card: Option<Card>,
    pub challenge: Option<ChallengeRound>,
    pub quiz: Option<QuizRun>,
    pub forced_draws: BTreeMap<PlayerId, ForcedDraw>,
    pub double_turns: BTreeSet<PlayerId>,
    /// Set while the first turn's card was drawn before any move.
    pub opening_draw: bool,
}

impl Session {
    pub fn new(code: String, board: Board) -> Self {
        Self {
            code,
            players: Vec::new(),
            active_player_id: None,
            phase: Phase::Waiting,
            board,
            current_card: None,
            challenge: None,
            quiz: None,
            forced_draws: BTreeMap::new(),
            double_turns: BTreeSet::new(),
            opening_draw: false,
        }
    }

    pub fn player(&self, id: &str) -> Option<&Player> {
        self.players.iter().find(|p| p.id == id)
    }

    pub fn player_mut(&mut self, id: &str) -> Option<&mut Player> {
        self.players.iter_mut().find(|p| p.id == id)
    }

    pub fn require_player(&self, id: &str) -> Result<&Player, DomainError> {
        self.player(id).ok_or_else(|| {
            DomainError::not_found(
                NotFoundKind::Player,
                format!("player {id} is not in game {}", self.code),
            )
        })
    }

    pub fn require_player_mut(&mut self, id: &str) -> Result<&mut Player, DomainError> {
        let code = self.code.clone();
        self.player_mut(id).ok_or_else(|| {
            DomainError::not_found(
                NotFoundKind::Player,
                format!("player {id} is not in game {code}"),
            )
        })
    }

    pub fn active_index(&self) -> Option<usize> {
        let active = self.active_player_id.as_deref()?;
        self.players.iter().position(|p| p.id == active)
    }

    pub fn active_player(&self) -> Option<&Player> {
        self.active_index().and_then(|i| self.players.get(i))
    }

    pub fn active_player_mut(&mut self) -> Option<&mut Player> {
        let idx = self.active_index()?;
        self.players.get_mut(idx)
    }

    pub fn is_active(&self, id: &str) -> bool {
        self.active_player_id.as_deref() == Some(id)
    }

    /// The active player; errors when the game has not started.
    pub fn require_active(&self) -> Result<&Player, DomainError> {
        self.active_player().ok_or_else(|| {
            DomainError::phase_mismatch(format!("game {} has no active player", self.code))
        })
    }

    pub fn non_active_ids(&self) -> Vec<PlayerId> {
        self.players
            .iter()
            .filter(|p| !self.is_active(&p.id))
            .map(|p| p.id.clone())
            .collect()
    }

    /// Players who bet and vote: everyone but the active player, or the
    /// active player alone when nobody else is in the game.
    pub fn eligible_voters(&self) -> Vec<PlayerId> {
        let others = self.non_active_ids();
        if others.is_empty() {
            self.active_player_id.iter().cloned().collect()
        } else {
            others
        }
    }

    pub fn host(&self) -> Option<&Player> {
        self.players.iter().find(|p| p.is_host)
    }
}
