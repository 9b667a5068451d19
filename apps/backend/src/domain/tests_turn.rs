use crate::domain::dispatch::{on_draw, CardKind};
use crate::domain::events::GameEvent;
use crate::domain::movement::{Move, Orientation};
use crate::domain::grid::Position;
use crate::domain::session::{ChallengeRound, Phase};
use crate::domain::test_state_helpers::{card, lobby, started_session, with_card};
use crate::domain::turn::{
    add_player, advance_turn, begin_game, finish_tutorial, move_player, ranking, require_host,
    set_ready,
};
use crate::errors::domain::{ActionKind, DomainError, PreconditionKind};

#[test]
fn join_is_rejected_after_start() {
    let mut s = started_session(&["A", "B"]);
    let err = add_player(&mut s, "p9".into(), "Z").unwrap_err();
    assert!(matches!(err, DomainError::InvalidAction(ActionKind::LobbyClosed, _)));
}

#[test]
fn join_requires_a_name() {
    let mut s = lobby(&["A"]);
    let err = add_player(&mut s, "p1".into(), "   ").unwrap_err();
    assert!(matches!(err, DomainError::InvalidAction(ActionKind::InvalidName, _)));
    assert_eq!(s.players.len(), 1);
}

#[test]
fn joiners_get_alternating_starts_and_first_is_host() {
    let mut s = lobby(&[]);
    add_player(&mut s, "h".into(), "Host").unwrap();
    add_player(&mut s, "j1".into(), "J1").unwrap();
    add_player(&mut s, "j2".into(), "J2").unwrap();
    assert!(s.players[0].is_host);
    assert!(!s.players[1].is_host);
    assert_eq!(s.players[1].position, Position::new(2, 0));
    assert_eq!(s.players[1].orientation, Orientation::South);
    assert_eq!(s.players[2].position, Position::new(0, 8));
    assert_eq!(s.players[2].orientation, Orientation::East);
}

#[test]
fn ready_reports_when_everyone_is_ready() {
    let mut s = lobby(&["A", "B"]);
    assert!(!set_ready(&mut s, "p0", true).unwrap());
    assert!(set_ready(&mut s, "p1", true).unwrap());
    assert!(!set_ready(&mut s, "p1", false).unwrap());
}

#[test]
fn only_host_may_force_start() {
    let s = lobby(&["A", "B"]);
    assert!(require_host(&s, "p0").is_ok());
    let err = require_host(&s, "p1").unwrap_err();
    assert!(matches!(err, DomainError::Precondition(PreconditionKind::NotHost, _)));
}

#[test]
fn begin_game_makes_first_player_active() {
    let mut s = lobby(&["A", "B"]);
    assert_eq!(begin_game(&mut s).unwrap(), "p0");
    assert_eq!(s.phase, Phase::Movement);
    assert!(begin_game(&mut s).is_err());
}

#[test]
fn opening_draw_still_allows_a_move() {
    let mut s = started_session(&["A", "B"]);
    on_draw(&mut s, card(1, "Event")).unwrap();
    s.opening_draw = true;
    let pose = move_player(&mut s, "p0", Move::Forward).unwrap();
    assert_eq!(pose.position, Position::new(7, 7));
    assert!(!s.opening_draw);

    on_draw(&mut s, card(4, "Event")).unwrap();
    let err = move_player(&mut s, "p0", Move::Forward).unwrap_err();
    assert!(matches!(err, DomainError::InvalidAction(ActionKind::PhaseMismatch, _)));
}

#[test]
fn only_active_player_moves() {
    let mut s = started_session(&["A", "B"]);
    let err = move_player(&mut s, "p1", Move::Forward).unwrap_err();
    assert!(matches!(err, DomainError::InvalidAction(ActionKind::OutOfTurn, _)));
}

#[test]
fn illegal_move_leaves_pose_unchanged() {
    let mut s = started_session(&["A"]);
    let err = move_player(&mut s, "p0", Move::Left).unwrap_err();
    assert!(matches!(err, DomainError::InvalidAction(ActionKind::InvalidMove, _)));
    assert_eq!(s.players[0].position, Position::new(7, 8));
    assert_eq!(s.players[0].orientation, Orientation::North);
}

#[test]
fn draw_reveals_with_active_player_name() {
    let mut s = started_session(&["Ada", "Bob"]);
    let res = on_draw(&mut s, card(7, "Challenge")).unwrap();
    assert_eq!(res.kind, CardKind::Challenge);
    assert_eq!(res.phase, Phase::CardDrawn);
    match &res.events[0] {
        GameEvent::CardDrawn {
            card, follow_up, ..
        } => {
            assert_eq!(card.passive_text, "Ada draws");
            assert_eq!(*follow_up, "startBetting");
        }
        other => panic!("unexpected event {other:?}"),
    }
}

#[test]
fn end_turn_rotates_and_clears_sub_state() {
    let mut s = with_card(started_session(&["A", "B", "C"]), card(7, "Challenge"));
    s.challenge = Some(ChallengeRound::default());
    s.phase = Phase::Result;
    let adv = advance_turn(&mut s).unwrap();
    assert_eq!(adv.active_player_id, "p1");
    assert!(!adv.repeated);
    assert_eq!(s.phase, Phase::Movement);
    assert!(s.current_card.is_none());
    assert!(s.challenge.is_none());
    assert!(s.quiz.is_none());
}

#[test]
fn end_turn_wraps_to_first_player() {
    let mut s = with_card(started_session(&["A", "B"]), card(1, "Event"));
    s.active_player_id = Some("p1".into());
    assert_eq!(advance_turn(&mut s).unwrap().active_player_id, "p0");
}

#[test]
fn double_turn_keeps_player_once() {
    let mut s = with_card(started_session(&["A", "B"]), card(1, "Event"));
    s.double_turns.insert("p0".into());
    let adv = advance_turn(&mut s).unwrap();
    assert!(adv.repeated);
    assert_eq!(adv.active_player_id, "p0");
    assert!(s.double_turns.is_empty());

    s.phase = Phase::CardDrawn;
    assert_eq!(advance_turn(&mut s).unwrap().active_player_id, "p1");
}

#[test]
fn end_turn_rejected_mid_challenge() {
    let mut s = with_card(started_session(&["A", "B"]), card(7, "Challenge"));
    s.phase = Phase::Betting;
    let err = advance_turn(&mut s).unwrap_err();
    assert!(matches!(err, DomainError::InvalidAction(ActionKind::PhaseMismatch, _)));
    assert!(s.is_active("p0"));
}

#[test]
fn tutorial_completes_when_all_done() {
    let mut s = started_session(&["A", "B"]);
    assert!(!finish_tutorial(&mut s, "p0").unwrap());
    assert!(finish_tutorial(&mut s, "p1").unwrap());
}

#[test]
fn ranking_orders_by_berries_and_keeps_ties_stable() {
    let mut s = started_session(&["A", "B", "C"]);
    s.players[0].berries = 1;
    s.players[1].berries = 4;
    s.players[2].berries = 1;
    let names: Vec<_> = ranking(&s).into_iter().map(|r| (r.rank, r.player_name)).collect();
    assert_eq!(
        names,
        vec![(1, "B".to_string()), (2, "A".to_string()), (3, "C".to_string())]
    );
}
