//! Lobby, game start, movement and turn advance.

use crate::domain::events::RankEntry;
use crate::domain::movement::{apply_move, valid_moves, Move, Pose, ValidMoves};
use crate::domain::session::{starting_pose, Phase, Player, PlayerId, Session};
use crate::errors::domain::{ActionKind, DomainError, PreconditionKind};

/// Errors unless `player_id` is in the game and currently active.
pub fn require_active_actor(session: &Session, player_id: &str) -> Result<(), DomainError> {
    session.require_player(player_id)?;
    if !session.is_active(player_id) {
        return Err(DomainError::out_of_turn(format!(
            "player {player_id} is not the active player"
        )));
    }
    Ok(())
}

pub fn add_player<'a>(
    session: &'a mut Session,
    player_id: PlayerId,
    name: &str,
) -> Result<&'a Player, DomainError> {
    if session.phase != Phase::Waiting {
        return Err(DomainError::invalid(
            ActionKind::LobbyClosed,
            format!("game {} has already started", session.code),
        ));
    }
    let name = name.trim();
    if name.is_empty() {
        return Err(DomainError::invalid(
            ActionKind::InvalidName,
            "player name must not be empty",
        ));
    }
    let is_host = session.players.is_empty();
    let pose = starting_pose(session.players.len());
    session
        .players
        .push(Player::new(player_id, name.to_string(), is_host, pose));
    session
        .players
        .last()
        .ok_or_else(|| DomainError::invalid(ActionKind::Other("join".into()), "player not added"))
}

/// Toggle readiness. Returns true when every player is ready.
pub fn set_ready(session: &mut Session, player_id: &str, ready: bool) -> Result<bool, DomainError> {
    if session.phase != Phase::Waiting {
        return Err(DomainError::phase_mismatch("readiness only applies in the lobby"));
    }
    session.require_player_mut(player_id)?.ready = ready;
    Ok(all_ready(session))
}

pub fn all_ready(session: &Session) -> bool {
    !session.players.is_empty() && session.players.iter().all(|p| p.ready)
}

pub fn require_host(session: &Session, player_id: &str) -> Result<(), DomainError> {
    if !session.require_player(player_id)?.is_host {
        return Err(DomainError::precondition(
            PreconditionKind::NotHost,
            "only the host can start the game",
        ));
    }
    Ok(())
}

/// Leave the lobby; the first player in order becomes active. The caller
/// draws the opening card.
pub fn begin_game(session: &mut Session) -> Result<PlayerId, DomainError> {
    if session.phase != Phase::Waiting {
        return Err(DomainError::phase_mismatch(format!(
            "game {} has already started",
            session.code
        )));
    }
    let first = session
        .players
        .first()
        .map(|p| p.id.clone())
        .ok_or_else(|| DomainError::phase_mismatch("cannot start a game without players"))?;
    session.active_player_id = Some(first.clone());
    session.phase = Phase::Movement;
    Ok(first)
}

/// Moving is allowed in `movement`, and during the opening `cardDrawn`.
pub fn can_move(session: &Session) -> bool {
    session.phase == Phase::Movement || (session.phase == Phase::CardDrawn && session.opening_draw)
}

pub fn move_player(session: &mut Session, player_id: &str, mv: Move) -> Result<Pose, DomainError> {
    require_active_actor(session, player_id)?;
    if !can_move(session) {
        return Err(DomainError::phase_mismatch(format!(
            "cannot move during {}",
            session.phase.as_str()
        )));
    }
    let pose = session.require_player(player_id)?.pose();
    let next = apply_move(pose, mv, &session.board)
        .map_err(|rejected| DomainError::invalid(ActionKind::InvalidMove, rejected.reason))?;
    session.require_player_mut(player_id)?.set_pose(next);
    session.opening_draw = false;
    Ok(next)
}

pub fn valid_moves_for(session: &Session, player_id: &str) -> Result<ValidMoves, DomainError> {
    let player = session.require_player(player_id)?;
    Ok(valid_moves(player.pose(), &session.board))
}

pub fn can_end_turn(phase: Phase) -> bool {
    matches!(phase, Phase::CardDrawn | Phase::Result | Phase::QuizResult)
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TurnAdvance {
    pub active_player_id: PlayerId,
    pub active_player_name: String,
    /// The same player keeps the turn (double turn consumed).
    pub repeated: bool,
}

/// Hand the turn to the next player in order, or keep it with the active
/// player once if they hold a double-turn marker. Clears all card sub-state.
pub fn advance_turn(session: &mut Session) -> Result<TurnAdvance, DomainError> {
    if !can_end_turn(session.phase) {
        return Err(DomainError::phase_mismatch(format!(
            "turn cannot end during {}",
            session.phase.as_str()
        )));
    }
    let idx = session
        .active_index()
        .ok_or_else(|| DomainError::phase_mismatch("no active player to advance from"))?;
    let current = session.players[idx].id.clone();

    let repeated = session.double_turns.remove(&current);
    let next_idx = if repeated {
        idx
    } else {
        next_index(idx, session.players.len())
    };
    let next = &session.players[next_idx];
    let advance = TurnAdvance {
        active_player_id: next.id.clone(),
        active_player_name: next.name.clone(),
        repeated,
    };

    session.active_player_id = Some(advance.active_player_id.clone());
    session.phase = Phase::Movement;
    session.current_card = None;
    session.challenge = None;
    session.quiz = None;
    session.opening_draw = false;
    Ok(advance)
}

pub fn next_index(current: usize, count: usize) -> usize {
    if count == 0 {
        0
    } else {
        (current + 1) % count
    }
}

/// Mark the tutorial done. Returns true when every player has finished it.
pub fn finish_tutorial(session: &mut Session, player_id: &str) -> Result<bool, DomainError> {
    session.require_player_mut(player_id)?.tutorial_done = true;
    Ok(session.players.iter().all(|p| p.tutorial_done))
}

/// Players ranked by berries, highest first; ties keep turn order.
pub fn ranking(session: &Session) -> Vec<RankEntry> {
    let mut ordered: Vec<&Player> = session.players.iter().collect();
    ordered.sort_by(|a, b| b.berries.cmp(&a.berries));
    ordered
        .into_iter()
        .enumerate()
        .map(|(i, p)| RankEntry {
            rank: i + 1,
            player_id: p.id.clone(),
            player_name: p.name.clone(),
            berries: p.berries,
            score: p.score,
        })
        .collect()
}
