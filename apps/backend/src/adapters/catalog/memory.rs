use std::path::Path;

use async_trait::async_trait;
use parking_lot::Mutex;
use rand::seq::IndexedRandom;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use serde::Deserialize;
use tracing::info;

use super::{CardCatalog, CatalogError};
use crate::domain::cards::{Card, CardId, Question};

const BUILTIN_CATALOG: &str = include_str!("../../../data/catalog.json");

#[derive(Debug, Clone, Deserialize)]
pub struct CatalogData {
    pub cards: Vec<Card>,
    #[serde(default)]
    pub questions: Vec<Question>,
}

pub struct MemoryCatalog {
    cards: Vec<Card>,
    questions: Vec<Question>,
    rng: Mutex<ChaCha8Rng>,
}

impl MemoryCatalog {
    pub fn new(data: CatalogData, rng: ChaCha8Rng) -> Result<Self, CatalogError> {
        if data.cards.is_empty() {
            return Err(CatalogError::Load("catalog has no cards".into()));
        }
        Ok(Self {
            cards: data.cards,
            questions: data.questions,
            rng: Mutex::new(rng),
        })
    }

    pub fn from_json(raw: &str, rng: ChaCha8Rng) -> Result<Self, CatalogError> {
        let data: CatalogData =
            serde_json::from_str(raw).map_err(|e| CatalogError::Load(e.to_string()))?;
        Self::new(data, rng)
    }

    /// Seed catalog compiled into the binary, with an OS-seeded RNG.
    pub fn builtin() -> Result<Self, CatalogError> {
        Self::from_json(BUILTIN_CATALOG, ChaCha8Rng::from_os_rng())
    }

    /// Seed catalog with a deterministic RNG.
    pub fn builtin_seeded(seed: u64) -> Result<Self, CatalogError> {
        Self::from_json(BUILTIN_CATALOG, ChaCha8Rng::seed_from_u64(seed))
    }

    pub fn from_path(path: &Path) -> Result<Self, CatalogError> {
        let raw = std::fs::read_to_string(path)
            .map_err(|e| CatalogError::Load(format!("{}: {e}", path.display())))?;
        let catalog = Self::from_json(&raw, ChaCha8Rng::from_os_rng())?;
        info!(
            path = %path.display(),
            cards = catalog.cards.len(),
            questions = catalog.questions.len(),
            "catalog loaded"
        );
        Ok(catalog)
    }
}

#[async_trait]
impl CardCatalog for MemoryCatalog {
    async fn random_card(&self, restrict: Option<&[CardId]>) -> Result<Option<Card>, CatalogError> {
        let pool: Vec<&Card> = match restrict {
            Some(ids) => self.cards.iter().filter(|c| ids.contains(&c.id)).collect(),
            None => self.cards.iter().collect(),
        };
        let mut rng = self.rng.lock();
        Ok(pool.choose(&mut *rng).map(|c| (*c).clone()))
    }

    async fn card_by_id(&self, id: CardId) -> Result<Option<Card>, CatalogError> {
        Ok(self.cards.iter().find(|c| c.id == id).cloned())
    }

    async fn random_question(
        &self,
        category: &str,
        difficulty: u8,
    ) -> Result<Option<Question>, CatalogError> {
        let pool: Vec<&Question> = self
            .questions
            .iter()
            .filter(|q| q.category == category && q.difficulty == difficulty)
            .collect();
        let mut rng = self.rng.lock();
        Ok(pool.choose(&mut *rng).map(|q| (*q).clone()))
    }

    async fn all_cards(&self) -> Result<Vec<Card>, CatalogError> {
        Ok(self.cards.clone())
    }

    async fn all_questions(&self) -> Result<Vec<Question>, CatalogError> {
        Ok(self.questions.clone())
    }
}
