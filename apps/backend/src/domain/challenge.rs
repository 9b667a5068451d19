//! Challenge cards: bets from the non-active players, then a majority vote.

use std::collections::BTreeMap;

use rand::seq::IndexedRandom;
use rand::Rng;
use serde::Serialize;

use crate::domain::dispatch::{require_kind, CardKind};
use crate::domain::rewards::parse_reward;
use crate::domain::session::{ChallengeRound, Phase, PlayerId, Session};
use crate::domain::turn::require_active_actor;
use crate::errors::domain::{ActionKind, DomainError};

/// Outcome that grants the active player the success bonus.
pub const SUCCESS_OUTCOME: &str = "success";

/// Score for each bettor who called the outcome.
pub const CORRECT_BET_POINTS: u32 = 1;

/// Score for the active player on a successful challenge.
pub const SUCCESS_POINTS: u32 = 2;

/// Votes needed before a result can be declared.
pub fn quorum(eligible: usize) -> usize {
    eligible.div_ceil(2).max(1)
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum VoteTally {
    Pending,
    Decided(String),
}

/// Count eligible votes. A unique leader wins once quorum is reached; a tie
/// is broken at random only once every eligible voter has voted.
pub fn tally_votes<R: Rng + ?Sized>(
    votes: &BTreeMap<PlayerId, String>,
    eligible: &[PlayerId],
    rng: &mut R,
) -> VoteTally {
    let counted: Vec<&String> = eligible.iter().filter_map(|id| votes.get(id)).collect();
    if counted.len() < quorum(eligible.len()) {
        return VoteTally::Pending;
    }

    let mut counts: BTreeMap<&str, usize> = BTreeMap::new();
    for vote in &counted {
        *counts.entry(vote.as_str()).or_default() += 1;
    }
    let Some(max) = counts.values().copied().max() else {
        return VoteTally::Pending;
    };
    let leaders: Vec<&str> = counts
        .iter()
        .filter(|(_, n)| **n == max)
        .map(|(opt, _)| *opt)
        .collect();

    match leaders.as_slice() {
        [only] => VoteTally::Decided((*only).to_string()),
        tied if counted.len() == eligible.len() => tied
            .choose(rng)
            .map(|opt| VoteTally::Decided((*opt).to_string()))
            .unwrap_or(VoteTally::Pending),
        _ => VoteTally::Pending,
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BettingOpened {
    pub bet_options: Vec<String>,
    /// Nobody else can bet; voting opens right away.
    pub closes_now: bool,
}

pub fn start_betting(session: &mut Session, player_id: &str) -> Result<BettingOpened, DomainError> {
    require_active_actor(session, player_id)?;
    if session.phase != Phase::CardDrawn {
        return Err(DomainError::phase_mismatch(format!(
            "betting cannot start during {}",
            session.phase.as_str()
        )));
    }
    let card = require_kind(session, CardKind::Challenge)?;
    let bet_options = card.bet_options();
    session.challenge = Some(ChallengeRound::default());
    session.phase = Phase::Betting;
    session.opening_draw = false;
    Ok(BettingOpened {
        bet_options,
        closes_now: session.non_active_ids().is_empty(),
    })
}

/// Record one bet. Returns true once every eligible player has bet.
pub fn place_bet(session: &mut Session, player_id: &str, bet: &str) -> Result<bool, DomainError> {
    if session.phase != Phase::Betting {
        return Err(DomainError::phase_mismatch("betting is not open"));
    }
    session.require_player(player_id)?;
    let eligible = session.eligible_voters();
    if !eligible.iter().any(|id| id == player_id) {
        return Err(DomainError::out_of_turn(
            "the active player does not bet on their own challenge",
        ));
    }
    let options = require_kind(session, CardKind::Challenge)?.bet_options();
    if !options.iter().any(|o| o == bet) {
        return Err(DomainError::invalid(
            ActionKind::InvalidBet,
            format!("'{bet}' is not one of {options:?}"),
        ));
    }
    let round = session.challenge.get_or_insert_with(ChallengeRound::default);
    if round.bets.contains_key(player_id) {
        return Err(DomainError::invalid(
            ActionKind::AlreadyBet,
            format!("player {player_id} already bet"),
        ));
    }
    round.bets.insert(player_id.to_string(), bet.to_string());
    Ok(eligible.iter().all(|id| round.bets.contains_key(id)))
}

/// Close betting and open the vote. Errors if betting is no longer open.
pub fn open_voting(session: &mut Session) -> Result<Vec<String>, DomainError> {
    if session.phase != Phase::Betting {
        return Err(DomainError::phase_mismatch("betting already closed"));
    }
    let options = require_kind(session, CardKind::Challenge)?.bet_options();
    let round = session.challenge.get_or_insert_with(ChallengeRound::default);
    round.votes.clear();
    session.phase = Phase::ChallengeInProgress;
    Ok(options)
}

/// Record a vote, replacing any earlier vote by the same player.
pub fn place_vote(session: &mut Session, player_id: &str, vote: &str) -> Result<(), DomainError> {
    if session.phase != Phase::ChallengeInProgress {
        return Err(DomainError::phase_mismatch("voting is not open"));
    }
    session.require_player(player_id)?;
    if !session.eligible_voters().iter().any(|id| id == player_id) {
        return Err(DomainError::out_of_turn(
            "the active player does not vote on their own challenge",
        ));
    }
    let options = require_kind(session, CardKind::Challenge)?.bet_options();
    if !options.iter().any(|o| o == vote) {
        return Err(DomainError::invalid(
            ActionKind::InvalidVote,
            format!("'{vote}' is not one of {options:?}"),
        ));
    }
    let round = session.challenge.get_or_insert_with(ChallengeRound::default);
    round.votes.insert(player_id.to_string(), vote.to_string());
    Ok(())
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RewardSnapshot {
    pub player_id: PlayerId,
    pub player_name: String,
    pub score: u32,
    pub berries: u32,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChallengeSettlement {
    pub outcome: String,
    pub active_player_name: String,
    pub berry_reward: u32,
    pub rewards: Vec<RewardSnapshot>,
}

/// Apply the decided outcome and move to `result`.
pub fn settle_challenge(
    session: &mut Session,
    outcome: &str,
) -> Result<ChallengeSettlement, DomainError> {
    let card = require_kind(session, CardKind::Challenge)?.clone();
    let berry_reward = match card.bet_options().iter().position(|o| o == outcome) {
        Some(idx) => match card.reward_options().get(idx) {
            Some(entry) => parse_reward(entry)?,
            None => 0,
        },
        None => 0,
    };

    let bets = session
        .challenge
        .take()
        .map(|round| round.bets)
        .unwrap_or_default();
    for (bettor, bet) in &bets {
        if bet == outcome {
            if let Some(p) = session.player_mut(bettor) {
                p.score += CORRECT_BET_POINTS;
            }
        }
    }

    let active = session
        .active_player_mut()
        .ok_or_else(|| DomainError::phase_mismatch("challenge settled without an active player"))?;
    if outcome == SUCCESS_OUTCOME {
        active.score += SUCCESS_POINTS;
    }
    active.berries += berry_reward;
    let active_player_name = active.name.clone();

    session.phase = Phase::Result;
    Ok(ChallengeSettlement {
        outcome: outcome.to_string(),
        active_player_name,
        berry_reward,
        rewards: session
            .players
            .iter()
            .map(|p| RewardSnapshot {
                player_id: p.id.clone(),
                player_name: p.name.clone(),
                score: p.score,
                berries: p.berries,
            })
            .collect(),
    })
}
