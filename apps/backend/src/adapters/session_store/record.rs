//! Mapping between a `Session` and the fields of its store hash.

use std::collections::{BTreeMap, BTreeSet, HashMap};
use std::time::Duration;

use serde::de::DeserializeOwned;
use serde::Serialize;

use super::{SessionStore, StoreError};
use crate::domain::cards::Card;
use crate::domain::grid::Board;
use crate::domain::quiz::QuizRun;
use crate::domain::session::{ChallengeRound, ForcedDraw, Phase, Player, PlayerId, Session};

pub const FIELD_PLAYERS: &str = "players";
pub const FIELD_ACTIVE_PLAYER: &str = "activePlayerId";
pub const FIELD_PHASE: &str = "phase";
pub const FIELD_BOARD: &str = "board";
pub const FIELD_CURRENT_CARD: &str = "currentCard";
pub const FIELD_CHALLENGE: &str = "challenge";
pub const FIELD_QUIZ: &str = "quiz";
pub const FIELD_FORCED_DRAWS: &str = "forcedDraws";
pub const FIELD_DOUBLE_TURNS: &str = "doubleTurns";
pub const FIELD_OPENING_DRAW: &str = "openingDraw";

pub fn game_key(code: &str) -> String {
    format!("game:{code}")
}

pub fn code_key(code: &str) -> String {
    format!("code:{code}")
}

fn json<T: Serialize>(field: &str, value: &T) -> Result<String, StoreError> {
    serde_json::to_string(value).map_err(|e| StoreError::Corrupt {
        field: field.to_string(),
        detail: e.to_string(),
    })
}

fn parse<T: DeserializeOwned>(field: &str, raw: &str) -> Result<T, StoreError> {
    serde_json::from_str(raw).map_err(|e| StoreError::Corrupt {
        field: field.to_string(),
        detail: e.to_string(),
    })
}

fn parse_opt<T: DeserializeOwned>(
    fields: &HashMap<String, String>,
    field: &str,
) -> Result<Option<T>, StoreError> {
    match fields.get(field).map(String::as_str) {
        None | Some("") | Some("null") => Ok(None),
        Some(raw) => parse(field, raw).map(Some),
    }
}

/// Every field of the session hash. Absent sub-state is written as `null`.
pub fn encode(session: &Session) -> Result<Vec<(String, String)>, StoreError> {
    Ok(vec![
        (FIELD_PLAYERS.into(), json(FIELD_PLAYERS, &session.players)?),
        (
            FIELD_ACTIVE_PLAYER.into(),
            session.active_player_id.clone().unwrap_or_default(),
        ),
        (FIELD_PHASE.into(), session.phase.as_str().to_string()),
        (FIELD_BOARD.into(), json(FIELD_BOARD, &session.board)?),
        (
            FIELD_CURRENT_CARD.into(),
            json(FIELD_CURRENT_CARD, &session.current_card)?,
        ),
        (FIELD_CHALLENGE.into(), json(FIELD_CHALLENGE, &session.challenge)?),
        (FIELD_QUIZ.into(), json(FIELD_QUIZ, &session.quiz)?),
        (
            FIELD_FORCED_DRAWS.into(),
            json(FIELD_FORCED_DRAWS, &session.forced_draws)?,
        ),
        (
            FIELD_DOUBLE_TURNS.into(),
            json(FIELD_DOUBLE_TURNS, &session.double_turns)?,
        ),
        (FIELD_OPENING_DRAW.into(), session.opening_draw.to_string()),
    ])
}

pub fn decode(code: &str, fields: &HashMap<String, String>) -> Result<Session, StoreError> {
    let phase_raw = fields.get(FIELD_PHASE).ok_or_else(|| StoreError::Corrupt {
        field: FIELD_PHASE.into(),
        detail: "missing".into(),
    })?;
    let phase = Phase::parse(phase_raw).ok_or_else(|| StoreError::Corrupt {
        field: FIELD_PHASE.into(),
        detail: format!("unknown phase '{phase_raw}'"),
    })?;
    let players: Vec<Player> = parse_opt(fields, FIELD_PLAYERS)?.unwrap_or_default();
    let board: Board = parse_opt(fields, FIELD_BOARD)?.unwrap_or_else(Board::builtin);
    let active_player_id = fields
        .get(FIELD_ACTIVE_PLAYER)
        .filter(|id| !id.is_empty())
        .cloned();
    if let Some(active) = &active_player_id {
        if !players.iter().any(|p| &p.id == active) {
            return Err(StoreError::Corrupt {
                field: FIELD_ACTIVE_PLAYER.into(),
                detail: format!("active player {active} is not in the player list"),
            });
        }
    }

    Ok(Session {
        code: code.to_string(),
        players,
        active_player_id,
        phase,
        board,
        current_card: parse_opt::<Card>(fields, FIELD_CURRENT_CARD)?,
        challenge: parse_opt::<ChallengeRound>(fields, FIELD_CHALLENGE)?,
        quiz: parse_opt::<QuizRun>(fields, FIELD_QUIZ)?,
        forced_draws: parse_opt::<BTreeMap<PlayerId, ForcedDraw>>(fields, FIELD_FORCED_DRAWS)?
            .unwrap_or_default(),
        double_turns: parse_opt::<BTreeSet<PlayerId>>(fields, FIELD_DOUBLE_TURNS)?
            .unwrap_or_default(),
        opening_draw: fields
            .get(FIELD_OPENING_DRAW)
            .is_some_and(|v| v == "true"),
    })
}

pub async fn save_session(store: &dyn SessionStore, session: &Session) -> Result<(), StoreError> {
    let fields = encode(session)?;
    store.set_fields(&game_key(&session.code), &fields).await
}

/// `None` when no hash exists for `code`.
pub async fn load_session(
    store: &dyn SessionStore,
    code: &str,
) -> Result<Option<Session>, StoreError> {
    let fields = store.get_all(&game_key(code)).await?;
    if fields.is_empty() {
        return Ok(None);
    }
    decode(code, &fields).map(Some)
}

/// Reserve `code`. Returns false when it is already taken.
pub async fn reserve_code(
    store: &dyn SessionStore,
    code: &str,
    ttl: Duration,
) -> Result<bool, StoreError> {
    if store.exists(&game_key(code)).await? {
        return Ok(false);
    }
    store.set_string_if_absent(&code_key(code), "1", ttl).await
}

pub async fn delete_session(store: &dyn SessionStore, code: &str) -> Result<(), StoreError> {
    store.delete(&game_key(code)).await?;
    store.delete(&code_key(code)).await
}
