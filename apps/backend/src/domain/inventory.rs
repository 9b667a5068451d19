//! Inventory pickup and one-shot item effects.

use rand::Rng;
use serde::Serialize;

use crate::domain::cards::CardId;
use crate::domain::dispatch::{require_kind, CardKind};
use crate::domain::session::{ForcedDraw, Item, Phase, PlayerId, Session};
use crate::domain::turn::require_active_actor;
use crate::errors::domain::{DomainError, PreconditionKind};

pub const DOUBLE_TURN_ITEM: CardId = 10;
pub const THEFT_ITEM: CardId = 11;
pub const FORCED_DRAW_ITEM: CardId = 12;

pub const FORCED_DRAW_POOL: [CardId; 3] = [2, 3, 6];
pub const FORCED_DRAW_USES: u8 = 2;

pub const THEFT_SUCCESS_PROBABILITY: f64 = 0.75;
pub const THEFT_PENALTY: u32 = 3;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ItemEffect {
    DoubleTurn,
    Theft,
    ForcedDraw,
    Inert,
}

impl ItemEffect {
    pub fn for_item(item_id: CardId) -> Self {
        match item_id {
            DOUBLE_TURN_ITEM => ItemEffect::DoubleTurn,
            THEFT_ITEM => ItemEffect::Theft,
            FORCED_DRAW_ITEM => ItemEffect::ForcedDraw,
            _ => ItemEffect::Inert,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "effect", rename_all = "camelCase", rename_all_fields = "camelCase")]
pub enum ItemEffectOutcome {
    DoubleTurnGranted,
    TheftSucceeded {
        target_player_id: PlayerId,
        stolen: u32,
    },
    TheftFailed {
        lost: u32,
    },
    ForcedDrawGranted {
        pool: Vec<CardId>,
        uses: u8,
    },
    NoEffect,
}

/// Gamble result: which other player is targeted and whether it succeeds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TheftRoll {
    pub target_index: Option<usize>,
    pub succeeded: bool,
}

impl TheftRoll {
    pub fn roll<R: Rng + ?Sized>(rng: &mut R, candidates: usize) -> Self {
        let target_index = (candidates > 0).then(|| rng.random_range(0..candidates));
        Self {
            target_index,
            succeeded: rng.random_bool(THEFT_SUCCESS_PROBABILITY),
        }
    }
}

/// Add the current object card to the active player's inventory.
pub fn pick_up(session: &mut Session, player_id: &str) -> Result<Item, DomainError> {
    require_active_actor(session, player_id)?;
    if session.phase != Phase::CardDrawn {
        return Err(DomainError::phase_mismatch(format!(
            "objects cannot be picked up during {}",
            session.phase.as_str()
        )));
    }
    let item = Item::from(require_kind(session, CardKind::Object)?);
    session.require_player_mut(player_id)?.inventory.push(item.clone());
    Ok(item)
}

/// Apply the effect of `item_id` held by `player_id`. A missing item yields
/// `Ok(None)` and changes nothing.
pub fn use_item<R: Rng + ?Sized>(
    session: &mut Session,
    player_id: &str,
    item_id: CardId,
    rng: &mut R,
) -> Result<Option<ItemEffectOutcome>, DomainError> {
    let player = session.require_player(player_id)?;
    if !player.inventory.iter().any(|i| i.item_id == item_id) {
        return Ok(None);
    }

    let outcome = match ItemEffect::for_item(item_id) {
        ItemEffect::DoubleTurn => {
            remove_one(session, player_id, item_id);
            session.double_turns.insert(player_id.to_string());
            ItemEffectOutcome::DoubleTurnGranted
        }
        ItemEffect::Theft => {
            if !session.is_active(player_id) {
                return Err(DomainError::precondition(
                    PreconditionKind::NotActivePlayer,
                    "this item can only be used on your own turn",
                ));
            }
            let candidates = session.non_active_ids().len();
            let roll = TheftRoll::roll(rng, candidates);
            resolve_theft(session, player_id, roll)?
        }
        ItemEffect::ForcedDraw => {
            remove_one(session, player_id, item_id);
            session.forced_draws.insert(
                player_id.to_string(),
                ForcedDraw {
                    pool: FORCED_DRAW_POOL.to_vec(),
                    remaining: FORCED_DRAW_USES,
                },
            );
            ItemEffectOutcome::ForcedDrawGranted {
                pool: FORCED_DRAW_POOL.to_vec(),
                uses: FORCED_DRAW_USES,
            }
        }
        ItemEffect::Inert => ItemEffectOutcome::NoEffect,
    };
    Ok(Some(outcome))
}

/// Apply a theft roll. On success the item is kept and one berry moves from
/// the target (nothing moves if the target has none). On failure the item
/// is destroyed and the user loses up to [`THEFT_PENALTY`] berries. With no
/// other players nothing happens either way.
pub fn resolve_theft(
    session: &mut Session,
    player_id: &str,
    roll: TheftRoll,
) -> Result<ItemEffectOutcome, DomainError> {
    let others = session.non_active_ids();
    if others.is_empty() {
        return Ok(ItemEffectOutcome::NoEffect);
    }
    if !roll.succeeded {
        remove_one(session, player_id, THEFT_ITEM);
        let user = session.require_player_mut(player_id)?;
        let lost = user.berries.min(THEFT_PENALTY);
        user.berries -= lost;
        return Ok(ItemEffectOutcome::TheftFailed { lost });
    }

    let Some(target_id) = roll.target_index.and_then(|i| others.get(i)).cloned() else {
        return Ok(ItemEffectOutcome::NoEffect);
    };
    let target = session.require_player_mut(&target_id)?;
    let stolen = target.berries.min(1);
    target.berries -= stolen;
    session.require_player_mut(player_id)?.berries += stolen;
    Ok(ItemEffectOutcome::TheftSucceeded {
        target_player_id: target_id,
        stolen,
    })
}

/// Card pool for the next draw of `player_id`, consuming one forced use.
pub fn take_forced_pool(session: &mut Session, player_id: &str) -> Option<Vec<CardId>> {
    let forced = session.forced_draws.get_mut(player_id)?;
    let pool = forced.pool.clone();
    forced.remaining = forced.remaining.saturating_sub(1);
    if forced.remaining == 0 {
        session.forced_draws.remove(player_id);
    }
    Some(pool)
}

fn remove_one(session: &mut Session, player_id: &str, item_id: CardId) {
    if let Some(player) = session.player_mut(player_id) {
        if let Some(idx) = player.inventory.iter().position(|i| i.item_id == item_id) {
            player.inventory.remove(idx);
        }
    }
}
