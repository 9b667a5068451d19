use std::collections::VecDeque;

use async_trait::async_trait;
use parking_lot::Mutex;

use super::{CardCatalog, CatalogError, MemoryCatalog};
use crate::domain::cards::{Card, CardId, Question};

/// Catalog whose draws follow a fixed script of card ids.
///
/// The next scripted id is served when it is allowed by the draw's
/// restriction; otherwise (or once the script runs dry) the draw falls back
/// to the wrapped catalog. Questions always come from the wrapped catalog.
pub struct ScriptedCatalog {
    inner: MemoryCatalog,
    script: Mutex<VecDeque<CardId>>,
}

impl ScriptedCatalog {
    pub fn new(inner: MemoryCatalog, script: impl IntoIterator<Item = CardId>) -> Self {
        Self {
            inner,
            script: Mutex::new(script.into_iter().collect()),
        }
    }

    /// Built-in cards and questions with a fixed fallback seed.
    pub fn builtin(script: impl IntoIterator<Item = CardId>) -> Result<Self, CatalogError> {
        Ok(Self::new(MemoryCatalog::builtin_seeded(0)?, script))
    }

    pub fn push(&self, id: CardId) {
        self.script.lock().push_back(id);
    }

    pub fn remaining(&self) -> usize {
        self.script.lock().len()
    }

    fn next_scripted(&self, restrict: Option<&[CardId]>) -> Option<CardId> {
        let mut script = self.script.lock();
        let next = *script.front()?;
        match restrict {
            Some(ids) if !ids.contains(&next) => None,
            _ => script.pop_front(),
        }
    }
}

#[async_trait]
impl CardCatalog for ScriptedCatalog {
    async fn random_card(&self, restrict: Option<&[CardId]>) -> Result<Option<Card>, CatalogError> {
        match self.next_scripted(restrict) {
            Some(id) => self.inner.card_by_id(id).await,
            None => self.inner.random_card(restrict).await,
        }
    }

    async fn card_by_id(&self, id: CardId) -> Result<Option<Card>, CatalogError> {
        self.inner.card_by_id(id).await
    }

    async fn random_question(
        &self,
        category: &str,
        difficulty: u8,
    ) -> Result<Option<Question>, CatalogError> {
        self.inner.random_question(category, difficulty).await
    }

    async fn all_cards(&self) -> Result<Vec<Card>, CatalogError> {
        self.inner.all_cards().await
    }

    async fn all_questions(&self) -> Result<Vec<Question>, CatalogError> {
        self.inner.all_questions().await
    }
}
