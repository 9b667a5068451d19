//! Property tests for movement legality on the built-in maze.

use proptest::prelude::*;

use crate::domain::grid::{is_accessible, Board, Position};
use crate::domain::movement::{apply_move, destination, valid_moves, Move, Orientation, Pose};
use crate::domain::test_prelude;

fn arb_orientation() -> impl Strategy<Value = Orientation> {
    prop::sample::select(Orientation::CYCLE.to_vec())
}

fn arb_move() -> impl Strategy<Value = Move> {
    prop::sample::select(vec![Move::Forward, Move::Left, Move::Right])
}

proptest! {
    #![proptest_config(test_prelude::proptest_config())]

    /// apply_move succeeds iff the destination is in-bounds and open.
    #[test]
    fn prop_apply_move_matches_accessibility(
        x in -1i32..=16,
        y in -1i32..=10,
        orientation in arb_orientation(),
        mv in arb_move(),
    ) {
        let board = Board::builtin();
        let pose = Pose { position: Position::new(x, y), orientation };
        let target = destination(pose, mv);
        let result = apply_move(pose, mv, &board);
        prop_assert_eq!(result.is_ok(), is_accessible(target.position, &board));
        if let Ok(next) = result {
            prop_assert_eq!(next, target);
        }
    }

    /// Forward changes only position; left/right change both.
    #[test]
    fn prop_move_kind_changes(
        x in 0i32..16,
        y in 0i32..10,
        orientation in arb_orientation(),
        mv in arb_move(),
    ) {
        let pose = Pose { position: Position::new(x, y), orientation };
        let next = destination(pose, mv);
        prop_assert_ne!(next.position, pose.position);
        match mv {
            Move::Forward => prop_assert_eq!(next.orientation, pose.orientation),
            Move::Left | Move::Right => prop_assert_ne!(next.orientation, pose.orientation),
        }
    }

    /// valid_moves agrees with apply_move for every move kind.
    #[test]
    fn prop_valid_moves_agree(
        x in 0i32..16,
        y in 0i32..10,
        orientation in arb_orientation(),
    ) {
        let board = Board::builtin();
        let pose = Pose { position: Position::new(x, y), orientation };
        let moves = valid_moves(pose, &board);
        prop_assert_eq!(moves.can_move_forward, apply_move(pose, Move::Forward, &board).is_ok());
        prop_assert_eq!(moves.can_move_left, apply_move(pose, Move::Left, &board).is_ok());
        prop_assert_eq!(moves.can_move_right, apply_move(pose, Move::Right, &board).is_ok());
    }
}
