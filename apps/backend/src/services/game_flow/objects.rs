use tracing::info;

use super::{ActionOutcome, GameFlowService};
use crate::domain::cards::CardId;
use crate::domain::events::GameEvent;
use crate::domain::inventory;
use crate::domain::session::Session;
use crate::errors::domain::DomainError;

impl GameFlowService {
    /// Take the drawn object and hand the turn over.
    pub(super) fn pick_up_object(
        session: &mut Session,
        player_id: &str,
    ) -> Result<ActionOutcome, DomainError> {
        let item = inventory::pick_up(session, player_id)?;
        info!(game_id = %session.code, player_id, item_id = item.item_id, "Object picked up");
        let mut events = vec![GameEvent::ObjectPickedUp {
            player_id: player_id.to_string(),
            item,
        }];
        events.extend(Self::end_turn(session)?.events);
        Ok(ActionOutcome::broadcast(events))
    }

    pub(super) fn use_object(
        &mut self,
        session: &mut Session,
        player_id: &str,
        item_id: CardId,
    ) -> Result<ActionOutcome, DomainError> {
        let Some(outcome) = inventory::use_item(session, player_id, item_id, &mut self.rng)? else {
            return Ok(ActionOutcome::idle());
        };
        info!(game_id = %session.code, player_id, item_id, outcome = ?outcome, "Object used");
        Ok(ActionOutcome::broadcast(vec![GameEvent::ObjectUsed {
            player_id: player_id.to_string(),
            item_id,
            outcome,
        }]))
    }
}
