//! Outbound notifications broadcast to every participant of a session.

use std::collections::BTreeMap;

use serde::Serialize;

use crate::domain::cards::{CardId, DrawnCard};
use crate::domain::challenge::RewardSnapshot;
use crate::domain::grid::{Board, Position};
use crate::domain::inventory::ItemEffectOutcome;
use crate::domain::movement::Orientation;
use crate::domain::quiz::{QuestionView, QuizSummary};
use crate::domain::session::{Item, Phase, Player, PlayerId};

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "name", content = "payload")]
#[serde(rename_all = "camelCase", rename_all_fields = "camelCase")]
pub enum GameEvent {
    CurrentPlayers {
        players: Vec<Player>,
    },
    ReadyStatusUpdate {
        player_id: PlayerId,
        is_ready: bool,
    },
    AllPlayersReady,
    StartGame {
        board: Board,
        players: Vec<Player>,
        active_player_id: PlayerId,
    },
    TutorialAllFinished {
        board: Board,
        players: Vec<Player>,
        active_player_name: String,
    },
    PositionUpdate {
        player_id: PlayerId,
        position: Position,
        orientation: Orientation,
    },
    CardDrawn {
        active_player_id: PlayerId,
        active_player_name: String,
        card: DrawnCard,
        follow_up: &'static str,
    },
    TurnStateChanged {
        turn_state: Phase,
        bet_options: Vec<String>,
    },
    BetPlaced {
        player_id: PlayerId,
        bet: String,
    },
    ChallengeVotesUpdated {
        votes: BTreeMap<PlayerId, String>,
        is_majority_reached: bool,
    },
    ChallengeResult {
        active_player_name: String,
        result: String,
        berry_reward: u32,
        rewards: Vec<RewardSnapshot>,
    },
    QuizStarted {
        theme: String,
        total_questions: usize,
    },
    QuizQuestion {
        question: QuestionView,
    },
    QuizAnswerResult {
        question_index: usize,
        is_correct: bool,
        correct_answer: String,
        reward: u32,
    },
    QuizEnd {
        #[serde(flatten)]
        summary: QuizSummary,
    },
    ObjectPickedUp {
        player_id: PlayerId,
        item: Item,
    },
    ObjectUsed {
        player_id: PlayerId,
        item_id: CardId,
        outcome: ItemEffectOutcome,
    },
    ActivePlayerChanged {
        active_player_id: PlayerId,
        active_player_name: String,
        turn_state: Phase,
    },
    GameInfos {
        active_player_name: Option<String>,
        ranking: Vec<RankEntry>,
    },
}

impl GameEvent {
    /// Wire name, used in logs.
    pub fn name(&self) -> &'static str {
        match self {
            GameEvent::CurrentPlayers { .. } => "currentPlayers",
            GameEvent::ReadyStatusUpdate { .. } => "readyStatusUpdate",
            GameEvent::AllPlayersReady => "allPlayersReady",
            GameEvent::StartGame { .. } => "startGame",
            GameEvent::TutorialAllFinished { .. } => "tutorialAllFinished",
            GameEvent::PositionUpdate { .. } => "positionUpdate",
            GameEvent::CardDrawn { .. } => "cardDrawn",
            GameEvent::TurnStateChanged { .. } => "turnStateChanged",
            GameEvent::BetPlaced { .. } => "betPlaced",
            GameEvent::ChallengeVotesUpdated { .. } => "challengeVotesUpdated",
            GameEvent::ChallengeResult { .. } => "challengeResult",
            GameEvent::QuizStarted { .. } => "quizStarted",
            GameEvent::QuizQuestion { .. } => "quizQuestion",
            GameEvent::QuizAnswerResult { .. } => "quizAnswerResult",
            GameEvent::QuizEnd { .. } => "quizEnd",
            GameEvent::ObjectPickedUp { .. } => "objectPickedUp",
            GameEvent::ObjectUsed { .. } => "objectUsed",
            GameEvent::ActivePlayerChanged { .. } => "activePlayerChanged",
            GameEvent::GameInfos { .. } => "gameInfos",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RankEntry {
    pub rank: usize,
    pub player_id: PlayerId,
    pub player_name: String,
    pub berries: u32,
    pub score: u32,
}
