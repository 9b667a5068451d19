use std::collections::BTreeMap;

use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

use crate::domain::challenge::{
    open_voting, place_bet, place_vote, quorum, settle_challenge, start_betting, tally_votes,
    VoteTally,
};
use crate::domain::session::Phase;
use crate::domain::test_state_helpers::{card, started_session, with_card};
use crate::errors::domain::{ActionKind, DomainError};

fn votes(pairs: &[(&str, &str)]) -> BTreeMap<String, String> {
    pairs
        .iter()
        .map(|(p, v)| (p.to_string(), v.to_string()))
        .collect()
}

fn ids(n: usize) -> Vec<String> {
    (1..=n).map(|i| format!("p{i}")).collect()
}

#[test]
fn quorum_is_half_rounded_up() {
    assert_eq!(quorum(1), 1);
    assert_eq!(quorum(2), 1);
    assert_eq!(quorum(3), 2);
    assert_eq!(quorum(4), 2);
    assert_eq!(quorum(0), 1);
}

#[test]
fn below_quorum_is_pending() {
    let mut rng = ChaCha8Rng::seed_from_u64(1);
    let v = votes(&[("p1", "success")]);
    assert_eq!(tally_votes(&v, &ids(3), &mut rng), VoteTally::Pending);
}

#[test]
fn unique_leader_at_quorum_wins() {
    let mut rng = ChaCha8Rng::seed_from_u64(1);
    let v = votes(&[("p1", "failure"), ("p2", "failure")]);
    assert_eq!(
        tally_votes(&v, &ids(3), &mut rng),
        VoteTally::Decided("failure".into())
    );
}

#[test]
fn partial_tie_waits_for_remaining_voters() {
    let mut rng = ChaCha8Rng::seed_from_u64(1);
    let v = votes(&[("p1", "success"), ("p2", "failure")]);
    assert_eq!(tally_votes(&v, &ids(3), &mut rng), VoteTally::Pending);
}

#[test]
fn full_tie_picks_a_tied_option() {
    let v = votes(&[("p1", "success"), ("p2", "failure")]);
    for seed in 0..20 {
        let mut rng = ChaCha8Rng::seed_from_u64(seed);
        match tally_votes(&v, &ids(2), &mut rng) {
            VoteTally::Decided(o) => assert!(o == "success" || o == "failure"),
            VoteTally::Pending => panic!("full tie must be decided"),
        }
    }
}

#[test]
fn ineligible_votes_are_not_counted() {
    let mut rng = ChaCha8Rng::seed_from_u64(1);
    let v = votes(&[("p0", "success"), ("ghost", "success")]);
    assert_eq!(tally_votes(&v, &ids(2), &mut rng), VoteTally::Pending);
}

#[test]
fn betting_round_flow() {
    let mut s = with_card(started_session(&["A", "B", "C"]), card(7, "Challenge"));
    let opened = start_betting(&mut s, "p0").unwrap();
    assert_eq!(opened.bet_options, vec!["success", "failure"]);
    assert!(!opened.closes_now);
    assert_eq!(s.phase, Phase::Betting);

    let err = place_bet(&mut s, "p0", "success").unwrap_err();
    assert!(matches!(err, DomainError::InvalidAction(ActionKind::OutOfTurn, _)));
    let err = place_bet(&mut s, "p1", "maybe").unwrap_err();
    assert!(matches!(err, DomainError::InvalidAction(ActionKind::InvalidBet, _)));

    assert!(!place_bet(&mut s, "p1", "success").unwrap());
    let err = place_bet(&mut s, "p1", "failure").unwrap_err();
    assert!(matches!(err, DomainError::InvalidAction(ActionKind::AlreadyBet, _)));
    assert!(place_bet(&mut s, "p2", "failure").unwrap());

    open_voting(&mut s).unwrap();
    assert_eq!(s.phase, Phase::ChallengeInProgress);
    assert!(open_voting(&mut s).is_err(), "a second close is stale");
}

#[test]
fn start_betting_requires_a_challenge_card() {
    let mut s = with_card(started_session(&["A", "B"]), card(2, "Quiz"));
    let err = start_betting(&mut s, "p0").unwrap_err();
    assert!(matches!(
        err,
        DomainError::InvalidAction(ActionKind::WrongCardCategory, _)
    ));
    assert_eq!(s.phase, Phase::CardDrawn);
}

#[test]
fn solo_betting_closes_immediately() {
    let mut s = with_card(started_session(&["A"]), card(7, "Challenge"));
    assert!(start_betting(&mut s, "p0").unwrap().closes_now);
}

#[test]
fn revote_replaces_previous_vote() {
    let mut s = with_card(started_session(&["A", "B", "C"]), card(7, "Challenge"));
    start_betting(&mut s, "p0").unwrap();
    open_voting(&mut s).unwrap();
    place_vote(&mut s, "p1", "success").unwrap();
    place_vote(&mut s, "p1", "failure").unwrap();
    let round = s.challenge.as_ref().unwrap();
    assert_eq!(round.votes.len(), 1);
    assert_eq!(round.votes["p1"], "failure");
    let err = place_vote(&mut s, "p2", "perhaps").unwrap_err();
    assert!(matches!(err, DomainError::InvalidAction(ActionKind::InvalidVote, _)));
}

#[test]
fn settlement_pays_bettors_and_active_player() {
    let mut s = with_card(started_session(&["A", "B", "C"]), card(7, "Challenge"));
    start_betting(&mut s, "p0").unwrap();
    place_bet(&mut s, "p1", "success").unwrap();
    place_bet(&mut s, "p2", "failure").unwrap();
    open_voting(&mut s).unwrap();

    let settled = settle_challenge(&mut s, "success").unwrap();
    assert_eq!(settled.berry_reward, 3);
    assert_eq!(s.phase, Phase::Result);
    assert!(s.challenge.is_none());
    assert_eq!(s.players[0].score, 2);
    assert_eq!(s.players[0].berries, 3);
    assert_eq!(s.players[1].score, 1);
    assert_eq!(s.players[2].score, 0);
    assert_eq!(settled.rewards.len(), 3);
}

#[test]
fn failure_outcome_pays_aligned_reward_without_bonus() {
    let mut s = with_card(started_session(&["A", "B"]), card(7, "Challenge"));
    start_betting(&mut s, "p0").unwrap();
    open_voting(&mut s).unwrap();
    let settled = settle_challenge(&mut s, "failure").unwrap();
    assert_eq!(settled.berry_reward, 1);
    assert_eq!(s.players[0].score, 0);
    assert_eq!(s.players[0].berries, 1);
}
