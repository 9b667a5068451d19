use serde::Serialize;

use crate::domain::events::GameEvent;
use crate::domain::session::PlayerId;
use crate::domain::snapshot::SessionView;
use crate::services::game_flow::ActionReply;

/// Inbound frames are `PlayerAction`s (`{"action": ...}`); these are the
/// outbound ones.
#[allow(clippy::large_enum_variant)]
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ServerMsg {
    /// First frame on every connection.
    Welcome {
        player_id: PlayerId,
        snapshot: SessionView,
    },

    /// Broadcast to every connection of the session.
    Event { event: GameEvent },

    /// Answer to the sender's own action.
    Reply {
        action: &'static str,
        reply: ActionReply,
    },

    Error {
        code: &'static str,
        message: String,
    },
}
