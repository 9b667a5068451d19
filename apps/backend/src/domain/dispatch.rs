//! Card resolution dispatch keyed by card category.
//!
//! Every kind opens with the same reveal. What differs is the follow-up
//! action the kind accepts while its card is current.

use crate::domain::cards::{Card, DrawnCard};
use crate::domain::events::GameEvent;
use crate::domain::session::{Phase, Session};
use crate::errors::domain::{ActionKind, DomainError};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CardKind {
    Generic,
    Challenge,
    Quiz,
    Object,
}

impl CardKind {
    pub fn for_category(category: &str) -> Self {
        match category {
            "Challenge" => CardKind::Challenge,
            "Quiz" => CardKind::Quiz,
            "Object" => CardKind::Object,
            // Unknown categories resolve as a plain reveal.
            _ => CardKind::Generic,
        }
    }

    /// Action that continues the resolution of this kind.
    pub const fn follow_up(self) -> &'static str {
        match self {
            CardKind::Generic => "endTurn",
            CardKind::Challenge => "startBetting",
            CardKind::Quiz => "startQuiz",
            CardKind::Object => "pickUpObject",
        }
    }

    pub const fn as_str(self) -> &'static str {
        match self {
            CardKind::Generic => "generic",
            CardKind::Challenge => "challenge",
            CardKind::Quiz => "quiz",
            CardKind::Object => "object",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Resolution {
    pub kind: CardKind,
    pub phase: Phase,
    pub events: Vec<GameEvent>,
}

/// Install `card` as the current card for the active player and reveal it.
/// Any sub-state of a previous card is dropped.
pub fn on_draw(session: &mut Session, card: Card) -> Result<Resolution, DomainError> {
    let active = session.require_active()?;
    let kind = CardKind::for_category(&card.category);
    let event = GameEvent::CardDrawn {
        active_player_id: active.id.clone(),
        active_player_name: active.name.clone(),
        card: DrawnCard::reveal(&card, &active.name),
        follow_up: kind.follow_up(),
    };
    session.current_card = Some(card);
    session.challenge = None;
    session.quiz = None;
    session.phase = Phase::CardDrawn;
    Ok(Resolution {
        kind,
        phase: session.phase,
        events: vec![event],
    })
}

/// The current card, provided it dispatches to `kind`.
pub fn require_kind(session: &Session, kind: CardKind) -> Result<&Card, DomainError> {
    let card = session.current_card.as_ref().ok_or_else(|| {
        DomainError::phase_mismatch(format!("no card is being resolved in game {}", session.code))
    })?;
    let actual = CardKind::for_category(&card.category);
    if actual != kind {
        return Err(DomainError::invalid(
            ActionKind::WrongCardCategory,
            format!(
                "card {} is a {} card, expected {}",
                card.id,
                actual.as_str(),
                kind.as_str()
            ),
        ));
    }
    Ok(card)
}
