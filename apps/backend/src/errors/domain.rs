//! Domain-level error type used by the game core, the session actor and the
//! adapters.
//!
//! This error type is HTTP- and transport-agnostic. Handlers convert it into
//! `crate::error::AppError` (HTTP) or a websocket error frame; both use the
//! code returned by [`DomainError::code`].

use std::error::Error;
use std::fmt::{Display, Formatter, Result as FmtResult};

use super::ErrorCode;

/// References that did not resolve.
#[derive(Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum NotFoundKind {
    Session,
    Player,
    Item,
    Card,
    Question,
}

/// Actions that are rejected without touching the session.
#[derive(Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum ActionKind {
    InvalidName,
    InvalidMove,
    InvalidBet,
    InvalidVote,
    AlreadyBet,
    NoActiveQuestion,
    StaleAnswer,
    PhaseMismatch,
    OutOfTurn,
    LobbyClosed,
    WrongCardCategory,
    InvalidReward,
    Other(String),
}

/// Preconditions on who may use an effect or operation.
#[derive(Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum PreconditionKind {
    NotActivePlayer,
    NotHost,
}

/// Operational failures of external collaborators.
#[derive(Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum InfraErrorKind {
    Timeout,
    Unreachable,
    Catalog,
    DataCorruption,
}

/// Central domain error type
#[derive(Debug, Clone, PartialEq)]
pub enum DomainError {
    /// Missing session, player, item or catalog entry
    NotFound(NotFoundKind, String),
    /// Illegal move, bad bet, answer without a question, wrong phase
    InvalidAction(ActionKind, String),
    /// Effect or operation used by the wrong player
    Precondition(PreconditionKind, String),
    /// Store or catalog failed; the action was aborted
    StoreUnavailable(InfraErrorKind, String),
}

impl Display for DomainError {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        match self {
            DomainError::NotFound(kind, d) => write!(f, "not found {kind:?}: {d}"),
            DomainError::InvalidAction(kind, d) => write!(f, "invalid action {kind:?}: {d}"),
            DomainError::Precondition(kind, d) => write!(f, "precondition {kind:?}: {d}"),
            DomainError::StoreUnavailable(kind, d) => write!(f, "unavailable {kind:?}: {d}"),
        }
    }
}

impl Error for DomainError {}

impl DomainError {
    pub fn not_found(kind: NotFoundKind, detail: impl Into<String>) -> Self {
        Self::NotFound(kind, detail.into())
    }
    pub fn invalid(kind: ActionKind, detail: impl Into<String>) -> Self {
        Self::InvalidAction(kind, detail.into())
    }
    pub fn precondition(kind: PreconditionKind, detail: impl Into<String>) -> Self {
        Self::Precondition(kind, detail.into())
    }
    pub fn unavailable(kind: InfraErrorKind, detail: impl Into<String>) -> Self {
        Self::StoreUnavailable(kind, detail.into())
    }

    pub fn phase_mismatch(detail: impl Into<String>) -> Self {
        Self::invalid(ActionKind::PhaseMismatch, detail)
    }

    pub fn out_of_turn(detail: impl Into<String>) -> Self {
        Self::invalid(ActionKind::OutOfTurn, detail)
    }

    /// Human-readable detail without the kind prefix.
    pub fn detail(&self) -> &str {
        match self {
            DomainError::NotFound(_, d)
            | DomainError::InvalidAction(_, d)
            | DomainError::Precondition(_, d)
            | DomainError::StoreUnavailable(_, d) => d,
        }
    }

    /// Stable code surfaced to clients.
    pub fn code(&self) -> ErrorCode {
        match self {
            DomainError::NotFound(kind, _) => match kind {
                NotFoundKind::Session => ErrorCode::GameNotFound,
                NotFoundKind::Player => ErrorCode::PlayerNotFound,
                NotFoundKind::Item => ErrorCode::ItemNotFound,
                NotFoundKind::Card => ErrorCode::CardNotFound,
                NotFoundKind::Question => ErrorCode::QuestionNotFound,
            },
            DomainError::InvalidAction(kind, _) => match kind {
                ActionKind::InvalidName => ErrorCode::InvalidName,
                ActionKind::InvalidMove => ErrorCode::InvalidMove,
                ActionKind::InvalidBet => ErrorCode::InvalidBet,
                ActionKind::InvalidVote => ErrorCode::InvalidVote,
                ActionKind::AlreadyBet => ErrorCode::AlreadyBet,
                ActionKind::NoActiveQuestion => ErrorCode::NoActiveQuestion,
                ActionKind::StaleAnswer => ErrorCode::StaleAnswer,
                ActionKind::PhaseMismatch => ErrorCode::PhaseMismatch,
                ActionKind::OutOfTurn => ErrorCode::OutOfTurn,
                ActionKind::LobbyClosed => ErrorCode::LobbyClosed,
                ActionKind::WrongCardCategory => ErrorCode::WrongCardCategory,
                ActionKind::InvalidReward => ErrorCode::InvalidReward,
                ActionKind::Other(_) => ErrorCode::BadRequest,
            },
            DomainError::Precondition(kind, _) => match kind {
                PreconditionKind::NotActivePlayer => ErrorCode::NotActivePlayer,
                PreconditionKind::NotHost => ErrorCode::NotHost,
            },
            DomainError::StoreUnavailable(kind, _) => match kind {
                InfraErrorKind::Timeout => ErrorCode::StoreTimeout,
                InfraErrorKind::Unreachable => ErrorCode::StoreUnavailable,
                InfraErrorKind::Catalog => ErrorCode::CatalogUnavailable,
                InfraErrorKind::DataCorruption => ErrorCode::DataCorruption,
            },
        }
    }
}
