//! Game flow service - bridges the pure domain rules with the catalog.
//!
//! Every entry point mutates the session it is handed (the actor's working
//! copy) and returns the events to broadcast. Nothing here touches the store
//! or the transport.

mod actions;
mod challenge;
mod lobby;
mod movement;
mod objects;
mod quiz;


use std::sync::Arc;

use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use tracing::debug;

pub use self::actions::{ActionOutcome, ActionReply, PlayerAction, Timer};
use crate::adapters::catalog::CardCatalog;
use crate::domain::events::GameEvent;
use crate::domain::session::{Phase, Session};
use crate::domain::turn;
use crate::errors::domain::DomainError;

pub struct GameFlowService {
    catalog: Arc<dyn CardCatalog>,
    rng: ChaCha8Rng,
}

impl GameFlowService {
    pub fn new(catalog: Arc<dyn CardCatalog>, rng: ChaCha8Rng) -> Self {
        Self { catalog, rng }
    }

    /// Deterministic vote tie-breaks and theft rolls.
    pub fn seeded(catalog: Arc<dyn CardCatalog>, seed: u64) -> Self {
        Self::new(catalog, ChaCha8Rng::seed_from_u64(seed))
    }

    pub fn from_os_rng(catalog: Arc<dyn CardCatalog>) -> Self {
        Self::new(catalog, ChaCha8Rng::from_os_rng())
    }

    /// Validate and apply one player action.
    pub async fn apply(
        &mut self,
        session: &mut Session,
        player_id: &str,
        action: PlayerAction,
    ) -> Result<ActionOutcome, DomainError> {
        session.require_player(player_id)?;
        debug!(
            game_id = %session.code,
            player_id,
            action = action.name(),
            phase = session.phase.as_str(),
            "Applying action"
        );

        let outcome = match action {
            PlayerAction::PlayerReady { is_ready } => {
                self.player_ready(session, player_id, is_ready).await?
            }
            PlayerAction::StartGame => self.start_game(session, player_id).await?,
            PlayerAction::FinishTutorial => Self::finish_tutorial(session, player_id)?,
            PlayerAction::PlayerMove { mv } => self.player_move(session, player_id, mv).await?,
            PlayerAction::GetValidMoves => Self::valid_moves(session, player_id)?,
            PlayerAction::EndTurn => Self::end_turn(session)?,
            PlayerAction::StartBetting => Self::start_betting(session, player_id)?,
            PlayerAction::PlaceBet { bet } => Self::place_bet(session, player_id, &bet)?,
            PlayerAction::PlaceChallengeVote { vote } => {
                self.place_vote(session, player_id, &vote)?
            }
            PlayerAction::StartQuiz { chosen_theme } => {
                self.start_quiz(session, player_id, &chosen_theme).await?
            }
            PlayerAction::QuizAnswer {
                answer,
                question_index,
            } => Self::quiz_answer(session, player_id, &answer, question_index)?,
            PlayerAction::PickUpObject => Self::pick_up_object(session, player_id)?,
            PlayerAction::UseObject { item_id } => self.use_object(session, player_id, item_id)?,
            PlayerAction::GetActivePlayer => Self::active_player(session),
        };
        Ok(with_game_infos(session, outcome))
    }

    /// Handle a pacing timer. Stale timers yield an idle outcome.
    pub async fn on_timer(
        &mut self,
        session: &mut Session,
        timer: Timer,
    ) -> Result<ActionOutcome, DomainError> {
        debug!(
            game_id = %session.code,
            timer = timer.name(),
            phase = session.phase.as_str(),
            "Timer fired"
        );
        let outcome = match timer {
            Timer::CloseBetting { active_player_id } => {
                Self::close_betting(session, &active_player_id)?
            }
            Timer::NextQuestion {
                active_player_id,
                answered_index,
            } => Self::next_question(session, &active_player_id, answered_index)?,
        };
        Ok(with_game_infos(session, outcome))
    }
}

impl GameFlowService {
    /// Timers a session loaded from the store still waits on: a closed
    /// betting round or an answered quiz question.
    pub fn pending_timers(session: &Session) -> Vec<Timer> {
        let Some(active_player_id) = session.active_player_id.clone() else {
            return Vec::new();
        };
        match session.phase {
            Phase::Betting => {
                let bets = session.challenge.as_ref().map(|c| &c.bets);
                let all_in = session
                    .eligible_voters()
                    .iter()
                    .all(|id| bets.is_some_and(|b| b.contains_key(id)));
                if all_in {
                    vec![Timer::CloseBetting { active_player_id }]
                } else {
                    Vec::new()
                }
            }
            Phase::QuizInProgress => match session.quiz.as_ref() {
                Some(run) if run.awaiting_next && run.cursor > 0 => vec![Timer::NextQuestion {
                    active_player_id,
                    answered_index: run.cursor - 1,
                }],
                _ => Vec::new(),
            },
            _ => Vec::new(),
        }
    }
}

/// Ranking summary appended after every change that is persisted.
pub fn game_infos(session: &Session) -> GameEvent {
    GameEvent::GameInfos {
        active_player_name: session.active_player().map(|p| p.name.clone()),
        ranking: turn::ranking(session),
    }
}

fn with_game_infos(session: &Session, mut outcome: ActionOutcome) -> ActionOutcome {
    if outcome.persist {
        outcome.events.push(game_infos(session));
    }
    outcome
}
