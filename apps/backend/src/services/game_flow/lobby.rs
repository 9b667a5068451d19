use tracing::info;

use super::{with_game_infos, ActionOutcome, ActionReply, GameFlowService};
use crate::domain::events::GameEvent;
use crate::domain::session::{PlayerId, Session};
use crate::domain::turn;
use crate::errors::domain::DomainError;

impl GameFlowService {
    /// Add a player to a waiting session.
    pub fn join(
        &mut self,
        session: &mut Session,
        player_id: PlayerId,
        name: &str,
    ) -> Result<ActionOutcome, DomainError> {
        let is_host = turn::add_player(session, player_id.clone(), name)?.is_host;
        info!(
            game_id = %session.code,
            player_id = %player_id,
            is_host,
            "Player joined"
        );
        let outcome = ActionOutcome::broadcast(vec![GameEvent::CurrentPlayers {
            players: session.players.clone(),
        }]);
        Ok(with_game_infos(session, outcome))
    }

    pub(super) async fn player_ready(
        &mut self,
        session: &mut Session,
        player_id: &str,
        is_ready: bool,
    ) -> Result<ActionOutcome, DomainError> {
        let everyone = turn::set_ready(session, player_id, is_ready)?;
        let mut events = vec![GameEvent::ReadyStatusUpdate {
            player_id: player_id.to_string(),
            is_ready,
        }];
        if everyone {
            events.push(GameEvent::AllPlayersReady);
            events.extend(self.begin(session).await?);
        }
        Ok(ActionOutcome::broadcast(events))
    }

    pub(super) async fn start_game(
        &mut self,
        session: &mut Session,
        player_id: &str,
    ) -> Result<ActionOutcome, DomainError> {
        turn::require_host(session, player_id)?;
        let events = self.begin(session).await?;
        Ok(ActionOutcome::broadcast(events))
    }

    /// `startGame` followed by the opening draw for the first player.
    async fn begin(&mut self, session: &mut Session) -> Result<Vec<GameEvent>, DomainError> {
        let first = turn::begin_game(session)?;
        info!(
            game_id = %session.code,
            active_player_id = %first,
            players = session.players.len(),
            "Game started"
        );
        let mut events = vec![GameEvent::StartGame {
            board: session.board.clone(),
            players: session.players.clone(),
            active_player_id: first,
        }];
        events.extend(self.draw_for_active(session).await?);
        session.opening_draw = true;
        Ok(events)
    }

    pub(super) fn finish_tutorial(
        session: &mut Session,
        player_id: &str,
    ) -> Result<ActionOutcome, DomainError> {
        let everyone = turn::finish_tutorial(session, player_id)?;
        let mut events = Vec::new();
        if everyone {
            events.push(GameEvent::TutorialAllFinished {
                board: session.board.clone(),
                players: session.players.clone(),
                active_player_name: session
                    .active_player()
                    .map(|p| p.name.clone())
                    .unwrap_or_default(),
            });
        }
        Ok(ActionOutcome::broadcast(events))
    }

    pub(super) fn end_turn(session: &mut Session) -> Result<ActionOutcome, DomainError> {
        let advance = turn::advance_turn(session)?;
        info!(
            game_id = %session.code,
            active_player_id = %advance.active_player_id,
            repeated = advance.repeated,
            "Turn advanced"
        );
        Ok(ActionOutcome::broadcast(vec![
            GameEvent::ActivePlayerChanged {
                active_player_id: advance.active_player_id,
                active_player_name: advance.active_player_name,
                turn_state: session.phase,
            },
        ]))
    }

    pub(super) fn active_player(session: &Session) -> ActionOutcome {
        let active = session.active_player();
        ActionOutcome::query(ActionReply::ActivePlayer {
            active_player_id: active.map(|p| p.id.clone()),
            active_player_name: active.map(|p| p.name.clone()),
        })
    }
}
