use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

use crate::domain::inventory::{
    pick_up, resolve_theft, take_forced_pool, use_item, ItemEffectOutcome, TheftRoll,
    DOUBLE_TURN_ITEM, FORCED_DRAW_ITEM, THEFT_ITEM,
};
use crate::domain::session::{Item, Phase};
use crate::domain::test_state_helpers::{card, started_session, with_card};
use crate::errors::domain::{ActionKind, DomainError, PreconditionKind};

fn item(id: u32) -> Item {
    Item {
        item_id: id,
        name: format!("item {id}"),
        image: String::new(),
        description: String::new(),
    }
}

#[test]
fn pick_up_adds_object_card_to_inventory() {
    let mut s = with_card(started_session(&["A", "B"]), card(10, "Object"));
    let picked = pick_up(&mut s, "p0").unwrap();
    assert_eq!(picked.item_id, 10);
    assert_eq!(s.players[0].inventory, vec![picked]);
}

#[test]
fn pick_up_rejects_non_object_and_off_turn() {
    let mut s = with_card(started_session(&["A", "B"]), card(4, "Challenge"));
    let err = pick_up(&mut s, "p0").unwrap_err();
    assert!(matches!(
        err,
        DomainError::InvalidAction(ActionKind::WrongCardCategory, _)
    ));
    let mut s = with_card(started_session(&["A", "B"]), card(10, "Object"));
    let err = pick_up(&mut s, "p1").unwrap_err();
    assert!(matches!(err, DomainError::InvalidAction(ActionKind::OutOfTurn, _)));
    s.phase = Phase::Movement;
    assert!(pick_up(&mut s, "p0").is_err());
}

#[test]
fn missing_item_is_silent_noop() {
    let mut s = started_session(&["A", "B"]);
    let before = s.clone();
    let mut rng = ChaCha8Rng::seed_from_u64(3);
    assert_eq!(use_item(&mut s, "p0", THEFT_ITEM, &mut rng).unwrap(), None);
    assert_eq!(s, before);
}

#[test]
fn double_turn_item_marks_and_is_consumed() {
    let mut s = started_session(&["A", "B"]);
    s.players[1].inventory = vec![item(DOUBLE_TURN_ITEM), item(DOUBLE_TURN_ITEM)];
    let mut rng = ChaCha8Rng::seed_from_u64(3);
    let out = use_item(&mut s, "p1", DOUBLE_TURN_ITEM, &mut rng).unwrap();
    assert_eq!(out, Some(ItemEffectOutcome::DoubleTurnGranted));
    assert!(s.double_turns.contains("p1"));
    assert_eq!(s.players[1].inventory.len(), 1);
}

#[test]
fn theft_off_turn_is_a_precondition_violation() {
    let mut s = started_session(&["A", "B"]);
    s.players[1].inventory = vec![item(THEFT_ITEM)];
    let mut rng = ChaCha8Rng::seed_from_u64(3);
    let err = use_item(&mut s, "p1", THEFT_ITEM, &mut rng).unwrap_err();
    assert!(matches!(
        err,
        DomainError::Precondition(PreconditionKind::NotActivePlayer, _)
    ));
    assert_eq!(s.players[1].inventory.len(), 1);
}

#[test]
fn theft_success_against_empty_target_transfers_nothing() {
    let mut s = started_session(&["A", "B"]);
    s.players[0].inventory = vec![item(THEFT_ITEM)];
    s.players[0].berries = 2;
    let roll = TheftRoll {
        target_index: Some(0),
        succeeded: true,
    };
    let out = resolve_theft(&mut s, "p0", roll).unwrap();
    assert_eq!(
        out,
        ItemEffectOutcome::TheftSucceeded {
            target_player_id: "p1".into(),
            stolen: 0,
        }
    );
    assert_eq!(s.players[0].berries, 2);
    assert_eq!(s.players[1].berries, 0);
    assert_eq!(s.players[0].inventory.len(), 1, "ring is kept on success");
}

#[test]
fn theft_success_moves_one_berry() {
    let mut s = started_session(&["A", "B", "C"]);
    s.players[0].inventory = vec![item(THEFT_ITEM)];
    s.players[2].berries = 5;
    let roll = TheftRoll {
        target_index: Some(1),
        succeeded: true,
    };
    resolve_theft(&mut s, "p0", roll).unwrap();
    assert_eq!(s.players[0].berries, 1);
    assert_eq!(s.players[2].berries, 4);
}

#[test]
fn theft_failure_destroys_item_and_floors_penalty() {
    let mut s = started_session(&["A", "B"]);
    s.players[0].inventory = vec![item(THEFT_ITEM)];
    s.players[0].berries = 2;
    let roll = TheftRoll {
        target_index: Some(0),
        succeeded: false,
    };
    let out = resolve_theft(&mut s, "p0", roll).unwrap();
    assert_eq!(out, ItemEffectOutcome::TheftFailed { lost: 2 });
    assert_eq!(s.players[0].berries, 0);
    assert!(s.players[0].inventory.is_empty());
}

#[test]
fn theft_without_other_players_is_noop() {
    let mut s = started_session(&["A"]);
    s.players[0].inventory = vec![item(THEFT_ITEM)];
    let roll = TheftRoll {
        target_index: None,
        succeeded: true,
    };
    assert_eq!(
        resolve_theft(&mut s, "p0", roll).unwrap(),
        ItemEffectOutcome::NoEffect
    );
}

#[test]
fn failed_theft_without_other_players_keeps_item_and_berries() {
    let mut s = started_session(&["A"]);
    s.players[0].inventory = vec![item(THEFT_ITEM)];
    s.players[0].berries = 5;
    let roll = TheftRoll {
        target_index: None,
        succeeded: false,
    };
    assert_eq!(
        resolve_theft(&mut s, "p0", roll).unwrap(),
        ItemEffectOutcome::NoEffect
    );
    assert_eq!(s.players[0].berries, 5);
    assert_eq!(s.players[0].inventory, vec![item(THEFT_ITEM)]);
}

#[test]
fn forced_draw_pool_exhausts_after_two_draws() {
    let mut s = started_session(&["A", "B"]);
    s.players[0].inventory = vec![item(FORCED_DRAW_ITEM)];
    let mut rng = ChaCha8Rng::seed_from_u64(3);
    use_item(&mut s, "p0", FORCED_DRAW_ITEM, &mut rng).unwrap();
    assert!(s.players[0].inventory.is_empty());

    assert_eq!(take_forced_pool(&mut s, "p0"), Some(vec![2, 3, 6]));
    assert_eq!(s.forced_draws["p0"].remaining, 1);
    assert_eq!(take_forced_pool(&mut s, "p0"), Some(vec![2, 3, 6]));
    assert!(s.forced_draws.is_empty());
    assert_eq!(take_forced_pool(&mut s, "p0"), None);
}

#[test]
fn unknown_item_has_no_effect_and_is_kept() {
    let mut s = started_session(&["A"]);
    s.players[0].inventory = vec![item(42)];
    let mut rng = ChaCha8Rng::seed_from_u64(3);
    let out = use_item(&mut s, "p0", 42, &mut rng).unwrap();
    assert_eq!(out, Some(ItemEffectOutcome::NoEffect));
    assert_eq!(s.players[0].inventory.len(), 1);
}

#[test]
fn theft_roll_targets_a_candidate() {
    let mut rng = ChaCha8Rng::seed_from_u64(9);
    for _ in 0..50 {
        let roll = TheftRoll::roll(&mut rng, 3);
        assert!(roll.target_index.is_some_and(|i| i < 3));
    }
    assert_eq!(TheftRoll::roll(&mut rng, 0).target_index, None);
}
