//! Read-only projection of a session sent to (re)connecting clients.
//!
//! Quiz answers never leave the server; only the open question is shown.

use std::collections::BTreeMap;

use serde::Serialize;

use crate::domain::cards::DrawnCard;
use crate::domain::grid::Board;
use crate::domain::quiz::QuestionView;
use crate::domain::session::{Phase, Player, PlayerId, Session};

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionView {
    pub code: String,
    pub phase: Phase,
    pub active_player_id: Option<PlayerId>,
    pub players: Vec<Player>,
    pub board: Board,
    pub current_card: Option<DrawnCard>,
    pub bets: BTreeMap<PlayerId, String>,
    pub votes: BTreeMap<PlayerId, String>,
    pub quiz_question: Option<QuestionView>,
    pub double_turns: Vec<PlayerId>,
}

impl SessionView {
    pub fn of(session: &Session) -> Self {
        let active_name = session
            .active_player()
            .map(|p| p.name.as_str())
            .unwrap_or_default();
        let (bets, votes) = session
            .challenge
            .as_ref()
            .map(|c| (c.bets.clone(), c.votes.clone()))
            .unwrap_or_default();
        Self {
            code: session.code.clone(),
            phase: session.phase,
            active_player_id: session.active_player_id.clone(),
            players: session.players.clone(),
            board: session.board.clone(),
            current_card: session
                .current_card
                .as_ref()
                .map(|c| DrawnCard::reveal(c, active_name)),
            bets,
            votes,
            quiz_question: session.quiz.as_ref().and_then(|q| q.current_view()),
            double_turns: session.double_turns.iter().cloned().collect(),
        }
    }
}
