//! Test-only session builders for domain unit tests.

use crate::domain::cards::{Card, CardId};
use crate::domain::grid::Board;
use crate::domain::session::{starting_pose, Phase, Player, Session};

/// A started session with players `p0..pN` named after `names`, `p0` active.
pub fn started_session(names: &[&str]) -> Session {
    let mut s = lobby(names);
    s.active_player_id = s.players.first().map(|p| p.id.clone());
    s.phase = Phase::Movement;
    s
}

/// A lobby with players `p0..pN`, `p0` hosting.
pub fn lobby(names: &[&str]) -> Session {
    let mut s = Session::new("TEST01".into(), Board::builtin());
    for (i, name) in names.iter().enumerate() {
        s.players.push(Player::new(
            format!("p{i}"),
            (*name).to_string(),
            i == 0,
            starting_pose(i),
        ));
    }
    s
}

pub fn card(id: CardId, category: &str) -> Card {
    Card {
        id,
        name: format!("card {id}"),
        description: format!("{category} card"),
        passive_description: "{activePlayerName} draws".into(),
        image: format!("card{id}.png"),
        category: category.into(),
        theme: "Explorers history;Exotic Nature".into(),
        bet: "success;failure".into(),
        reward: "3b;1b".into(),
    }
}

/// Session in `cardDrawn` with `card` current.
pub fn with_card(mut s: Session, card: Card) -> Session {
    s.current_card = Some(card);
    s.phase = Phase::CardDrawn;
    s
}
