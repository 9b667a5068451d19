//! Error codes for the Maze Quest backend.
//!
//! Every code that leaves the process (HTTP problem details or websocket
//! error frames) is defined here. Never pass ad-hoc strings as error codes.

use core::fmt;

/// Centralized error codes.
///
/// Each variant maps to a canonical SCREAMING_SNAKE_CASE string.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCode {
    // Request validation
    /// Malformed request body or message
    BadRequest,
    /// Display name missing or empty
    InvalidName,
    /// Move leaves the grid or hits a blocked cell
    InvalidMove,
    /// Bet is not one of the card's options
    InvalidBet,
    /// Vote is not one of the card's options
    InvalidVote,
    /// Player already placed a bet this round
    AlreadyBet,
    /// Quiz answer submitted while no question is open
    NoActiveQuestion,
    /// Quiz answer refers to a question that is no longer current
    StaleAnswer,
    /// Action is not valid in the current phase
    PhaseMismatch,
    /// Action reserved for the active player (or for the others)
    OutOfTurn,
    /// Session no longer accepts new players
    LobbyClosed,
    /// Follow-up action does not match the drawn card
    WrongCardCategory,
    /// Reward pattern could not be parsed
    InvalidReward,

    // Preconditions
    /// Effect may only be used by the active player
    NotActivePlayer,
    /// Operation reserved for the host
    NotHost,

    // Resource not found
    /// Session code does not resolve
    GameNotFound,
    /// Player id does not belong to the session
    PlayerNotFound,
    /// Item is not in the player's inventory
    ItemNotFound,
    /// Catalog has no matching card
    CardNotFound,
    /// Catalog has no matching quiz question
    QuestionNotFound,
    /// General not found error
    NotFound,

    // System errors
    /// Session store call failed
    StoreUnavailable,
    /// Session store call exceeded its deadline
    StoreTimeout,
    /// Card catalog call failed
    CatalogUnavailable,
    /// Stored record could not be decoded
    DataCorruption,
    /// Configuration error
    ConfigError,
    /// Internal server error
    Internal,
}

impl ErrorCode {
    /// Returns the canonical SCREAMING_SNAKE_CASE string for this error code.
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::BadRequest => "BAD_REQUEST",
            Self::InvalidName => "INVALID_NAME",
            Self::InvalidMove => "INVALID_MOVE",
            Self::InvalidBet => "INVALID_BET",
            Self::InvalidVote => "INVALID_VOTE",
            Self::AlreadyBet => "ALREADY_BET",
            Self::NoActiveQuestion => "NO_ACTIVE_QUESTION",
            Self::StaleAnswer => "STALE_ANSWER",
            Self::PhaseMismatch => "PHASE_MISMATCH",
            Self::OutOfTurn => "OUT_OF_TURN",
            Self::LobbyClosed => "LOBBY_CLOSED",
            Self::WrongCardCategory => "WRONG_CARD_CATEGORY",
            Self::InvalidReward => "INVALID_REWARD",

            Self::NotActivePlayer => "NOT_ACTIVE_PLAYER",
            Self::NotHost => "NOT_HOST",

            Self::GameNotFound => "GAME_NOT_FOUND",
            Self::PlayerNotFound => "PLAYER_NOT_FOUND",
            Self::ItemNotFound => "ITEM_NOT_FOUND",
            Self::CardNotFound => "CARD_NOT_FOUND",
            Self::QuestionNotFound => "QUESTION_NOT_FOUND",
            Self::NotFound => "NOT_FOUND",

            Self::StoreUnavailable => "STORE_UNAVAILABLE",
            Self::StoreTimeout => "STORE_TIMEOUT",
            Self::CatalogUnavailable => "CATALOG_UNAVAILABLE",
            Self::DataCorruption => "DATA_CORRUPTION",
            Self::ConfigError => "CONFIG_ERROR",
            Self::Internal => "INTERNAL",
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
