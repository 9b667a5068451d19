//! Card and quiz question reference data.

use serde::{Deserialize, Serialize};

pub type CardId = u32;

/// Placeholder substituted with the active player's name on reveal.
pub const ACTIVE_PLAYER_PLACEHOLDER: &str = "{activePlayerName}";

/// Difficulty tiers of a quiz run, in the order they are asked.
pub const DIFFICULTY_TIERS: [u8; 3] = [1, 2, 3];

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Card {
    pub id: CardId,
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub passive_description: String,
    #[serde(default)]
    pub image: String,
    pub category: String,
    /// `;`-separated quiz themes
    #[serde(default)]
    pub theme: String,
    /// `;`-separated bet options
    #[serde(default)]
    pub bet: String,
    /// `;`-separated rewards such as `1b;2b;3b`
    #[serde(default)]
    pub reward: String,
}

fn split_list(raw: &str) -> Vec<String> {
    raw.split(';')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

impl Card {
    pub fn bet_options(&self) -> Vec<String> {
        split_list(&self.bet)
    }

    pub fn reward_options(&self) -> Vec<String> {
        split_list(&self.reward)
    }

    pub fn themes(&self) -> Vec<String> {
        split_list(&self.theme)
    }

    pub fn passive_text(&self, active_player_name: &str) -> String {
        self.passive_description
            .replace(ACTIVE_PLAYER_PLACEHOLDER, active_player_name)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Question {
    pub id: u32,
    /// Theme the question belongs to
    pub category: String,
    pub difficulty: u8,
    pub description: String,
    pub options: Vec<String>,
    pub answer: String,
}

/// Card as revealed to clients.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DrawnCard {
    #[serde(flatten)]
    pub card: Card,
    pub passive_text: String,
    pub bet_options: Vec<String>,
    pub reward_options: Vec<String>,
    pub themes: Vec<String>,
}

impl DrawnCard {
    pub fn reveal(card: &Card, active_player_name: &str) -> Self {
        Self {
            passive_text: card.passive_text(active_player_name),
            bet_options: card.bet_options(),
            reward_options: card.reward_options(),
            themes: card.themes(),
            card: card.clone(),
        }
    }
}
