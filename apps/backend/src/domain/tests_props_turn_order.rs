//! Property tests for round-robin turn order (pure domain, no store).

use proptest::prelude::*;

use crate::domain::session::Phase;
use crate::domain::test_prelude;
use crate::domain::test_state_helpers::started_session;
use crate::domain::turn::advance_turn;

proptest! {
    #![proptest_config(test_prelude::proptest_config())]

    /// After K plain advances the active player is players[(start + K) mod N].
    #[test]
    fn prop_round_robin(n in 1usize..=6, start in 0usize..6, k in 0usize..40) {
        let names: Vec<String> = (0..n).map(|i| format!("P{i}")).collect();
        let refs: Vec<&str> = names.iter().map(String::as_str).collect();
        let mut s = started_session(&refs);
        let start = start % n;
        s.active_player_id = Some(s.players[start].id.clone());

        for _ in 0..k {
            s.phase = Phase::CardDrawn;
            advance_turn(&mut s).unwrap();
        }

        let expected = &s.players[(start + k) % n].id;
        prop_assert_eq!(s.active_player_id.as_ref(), Some(expected));
        prop_assert_eq!(s.phase, Phase::Movement);
    }

    /// A double-turn marker delays rotation by exactly one advance.
    #[test]
    fn prop_double_turn_delays_by_one(n in 2usize..=6, k in 1usize..20) {
        let names: Vec<String> = (0..n).map(|i| format!("P{i}")).collect();
        let refs: Vec<&str> = names.iter().map(String::as_str).collect();
        let mut s = started_session(&refs);
        s.double_turns.insert(s.players[0].id.clone());

        for _ in 0..k {
            s.phase = Phase::Result;
            advance_turn(&mut s).unwrap();
        }

        let expected = &s.players[(k - 1) % n].id;
        prop_assert_eq!(s.active_player_id.as_ref(), Some(expected));
        prop_assert!(s.double_turns.is_empty());
    }
}
