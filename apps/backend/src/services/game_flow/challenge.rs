use tracing::info;

use super::{ActionOutcome, GameFlowService, Timer};
use crate::domain::challenge::{self, VoteTally};
use crate::domain::events::GameEvent;
use crate::domain::session::{Phase, Session};
use crate::errors::domain::DomainError;

impl GameFlowService {
    pub(super) fn start_betting(
        session: &mut Session,
        player_id: &str,
    ) -> Result<ActionOutcome, DomainError> {
        let opened = challenge::start_betting(session, player_id)?;
        let mut events = vec![GameEvent::TurnStateChanged {
            turn_state: Phase::Betting,
            bet_options: opened.bet_options,
        }];
        // Solo game: nobody else can bet.
        if opened.closes_now {
            events.push(Self::voting_opened(session)?);
        }
        Ok(ActionOutcome::broadcast(events))
    }

    pub(super) fn place_bet(
        session: &mut Session,
        player_id: &str,
        bet: &str,
    ) -> Result<ActionOutcome, DomainError> {
        let all_in = challenge::place_bet(session, player_id, bet)?;
        let outcome = ActionOutcome::broadcast(vec![GameEvent::BetPlaced {
            player_id: player_id.to_string(),
            bet: bet.to_string(),
        }]);
        if !all_in {
            return Ok(outcome);
        }
        let active_player_id = session.require_active()?.id.clone();
        Ok(outcome.with_timer(Timer::CloseBetting { active_player_id }))
    }

    pub(super) fn close_betting(
        session: &mut Session,
        active_player_id: &str,
    ) -> Result<ActionOutcome, DomainError> {
        if session.phase != Phase::Betting || !session.is_active(active_player_id) {
            return Ok(ActionOutcome::idle());
        }
        Ok(ActionOutcome::broadcast(vec![Self::voting_opened(session)?]))
    }

    fn voting_opened(session: &mut Session) -> Result<GameEvent, DomainError> {
        let bet_options = challenge::open_voting(session)?;
        Ok(GameEvent::TurnStateChanged {
            turn_state: Phase::ChallengeInProgress,
            bet_options,
        })
    }

    pub(super) fn place_vote(
        &mut self,
        session: &mut Session,
        player_id: &str,
        vote: &str,
    ) -> Result<ActionOutcome, DomainError> {
        challenge::place_vote(session, player_id, vote)?;
        let votes = session
            .challenge
            .as_ref()
            .map(|c| c.votes.clone())
            .unwrap_or_default();
        let tally = challenge::tally_votes(&votes, &session.eligible_voters(), &mut self.rng);

        let VoteTally::Decided(outcome) = tally else {
            return Ok(ActionOutcome::broadcast(vec![
                GameEvent::ChallengeVotesUpdated {
                    votes,
                    is_majority_reached: false,
                },
            ]));
        };

        let settlement = challenge::settle_challenge(session, &outcome)?;
        info!(
            game_id = %session.code,
            outcome = %settlement.outcome,
            berry_reward = settlement.berry_reward,
            "Challenge settled"
        );
        Ok(ActionOutcome::broadcast(vec![
            GameEvent::ChallengeVotesUpdated {
                votes,
                is_majority_reached: true,
            },
            GameEvent::ChallengeResult {
                active_player_name: settlement.active_player_name,
                result: settlement.outcome,
                berry_reward: settlement.berry_reward,
                rewards: settlement.rewards,
            },
        ]))
    }
}
