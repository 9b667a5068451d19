//! Legal moves for a pose and applying a single move.
//!
//! Left and right rotate one step and translate one cell in the new facing.
//! Forward translates without rotating. There is no rotate-in-place.

use serde::{Deserialize, Serialize};

use crate::domain::grid::{is_accessible, Board, Position};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Orientation {
    North,
    East,
    South,
    West,
}

impl Orientation {
    /// Clockwise cycle order.
    pub const CYCLE: [Orientation; 4] = [
        Orientation::North,
        Orientation::East,
        Orientation::South,
        Orientation::West,
    ];

    fn index(self) -> usize {
        match self {
            Orientation::North => 0,
            Orientation::East => 1,
            Orientation::South => 2,
            Orientation::West => 3,
        }
    }

    pub fn turned_right(self) -> Self {
        Self::CYCLE[(self.index() + 1) % 4]
    }

    pub fn turned_left(self) -> Self {
        Self::CYCLE[(self.index() + 3) % 4]
    }

    /// Unit step `(dx, dy)` for this facing.
    pub fn offset(self) -> (i32, i32) {
        match self {
            Orientation::North => (0, -1),
            Orientation::East => (1, 0),
            Orientation::South => (0, 1),
            Orientation::West => (-1, 0),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Move {
    Forward,
    Left,
    Right,
}

impl Move {
    pub const fn as_str(self) -> &'static str {
        match self {
            Move::Forward => "forward",
            Move::Left => "left",
            Move::Right => "right",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Pose {
    pub position: Position,
    pub orientation: Orientation,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ValidMoves {
    pub can_move_forward: bool,
    pub can_move_left: bool,
    pub can_move_right: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MoveRejected {
    pub reason: String,
}

impl std::fmt::Display for MoveRejected {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.reason)
    }
}

/// Pose reached by `mv`, without checking the board.
pub fn destination(pose: Pose, mv: Move) -> Pose {
    let orientation = match mv {
        Move::Forward => pose.orientation,
        Move::Left => pose.orientation.turned_left(),
        Move::Right => pose.orientation.turned_right(),
    };
    let (dx, dy) = orientation.offset();
    Pose {
        position: Position::new(pose.position.x + dx, pose.position.y + dy),
        orientation,
    }
}

pub fn valid_moves(pose: Pose, board: &Board) -> ValidMoves {
    let ok = |mv| is_accessible(destination(pose, mv).position, board);
    ValidMoves {
        can_move_forward: ok(Move::Forward),
        can_move_left: ok(Move::Left),
        can_move_right: ok(Move::Right),
    }
}

pub fn apply_move(pose: Pose, mv: Move, board: &Board) -> Result<Pose, MoveRejected> {
    let next = destination(pose, mv);
    if !board.in_bounds(next.position) {
        return Err(MoveRejected {
            reason: format!(
                "moving {} from {} leaves the board",
                mv.as_str(),
                pose.position.label()
            ),
        });
    }
    if !is_accessible(next.position, board) {
        return Err(MoveRejected {
            reason: format!("cell {} is blocked", next.position.label()),
        });
    }
    Ok(next)
}
