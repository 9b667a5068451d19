//! Domain layer: pure game logic types and helpers.

pub mod cards;
pub mod challenge;
pub mod dispatch;
pub mod events;
pub mod grid;
pub mod inventory;
pub mod movement;
pub mod quiz;
pub mod rewards;
pub mod session;
pub mod snapshot;
pub mod turn;

#[cfg(test)]
mod test_prelude;
#[cfg(test)]
mod test_state_helpers;
#[cfg(test)]
mod tests_challenge;
#[cfg(test)]
mod tests_inventory;
#[cfg(test)]
mod tests_props_movement;
#[cfg(test)]
mod tests_props_quiz;
#[cfg(test)]
mod tests_props_turn_order;
#[cfg(test)]
mod tests_turn;

// Re-exports for ergonomics
pub use cards::{Card, CardId, DrawnCard, Question};
pub use dispatch::CardKind;
pub use events::GameEvent;
pub use grid::{is_accessible, Board, Position};
pub use movement::{apply_move, valid_moves, Move, Orientation, Pose, ValidMoves};
pub use session::{Phase, Player, PlayerId, Session};
pub use snapshot::SessionView;
