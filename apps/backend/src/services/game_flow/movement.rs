use tracing::{debug, info};

use super::{ActionOutcome, ActionReply, GameFlowService};
use crate::domain::dispatch;
use crate::domain::events::GameEvent;
use crate::domain::inventory::take_forced_pool;
use crate::domain::movement::Move;
use crate::domain::session::Session;
use crate::domain::turn;
use crate::errors::domain::{DomainError, NotFoundKind};

impl GameFlowService {
    pub(super) async fn player_move(
        &mut self,
        session: &mut Session,
        player_id: &str,
        mv: Move,
    ) -> Result<ActionOutcome, DomainError> {
        let pose = turn::move_player(session, player_id, mv)?;
        debug!(
            game_id = %session.code,
            player_id,
            mv = mv.as_str(),
            cell = %pose.position.label(),
            "Player moved"
        );
        let mut events = vec![GameEvent::PositionUpdate {
            player_id: player_id.to_string(),
            position: pose.position,
            orientation: pose.orientation,
        }];
        events.extend(self.draw_for_active(session).await?);
        Ok(ActionOutcome::broadcast(events))
    }

    pub(super) fn valid_moves(
        session: &Session,
        player_id: &str,
    ) -> Result<ActionOutcome, DomainError> {
        let moves = turn::valid_moves_for(session, player_id)?;
        Ok(ActionOutcome::query(ActionReply::ValidMoves { moves }))
    }

    /// Draw a card for the active player and dispatch it.
    ///
    /// A forced-draw override restricts the draw to its pool and uses up one
    /// charge; otherwise the whole catalog is sampled.
    pub(super) async fn draw_for_active(
        &mut self,
        session: &mut Session,
    ) -> Result<Vec<GameEvent>, DomainError> {
        let active_id = session.require_active()?.id.clone();
        let pool = take_forced_pool(session, &active_id);
        let card = self
            .catalog
            .random_card(pool.as_deref())
            .await?
            .ok_or_else(|| {
                DomainError::not_found(
                    NotFoundKind::Card,
                    format!("no card to draw from pool {pool:?}"),
                )
            })?;
        let resolution = dispatch::on_draw(session, card)?;
        info!(
            game_id = %session.code,
            active_player_id = %active_id,
            kind = resolution.kind.as_str(),
            forced = pool.is_some(),
            "Card drawn"
        );
        Ok(resolution.events)
    }
}
