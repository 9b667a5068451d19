//! Read-only card and question catalog.

mod memory;
mod scripted;

use async_trait::async_trait;
use thiserror::Error;

pub use self::memory::{CatalogData, MemoryCatalog};
pub use self::scripted::ScriptedCatalog;
use crate::domain::cards::{Card, CardId, Question};
use crate::errors::domain::{DomainError, InfraErrorKind};

#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("catalog could not be loaded: {0}")]
    Load(String),
    #[error("catalog unavailable: {0}")]
    Unavailable(String),
}

impl From<CatalogError> for DomainError {
    fn from(e: CatalogError) -> Self {
        DomainError::unavailable(InfraErrorKind::Catalog, e.to_string())
    }
}

#[async_trait]
pub trait CardCatalog: Send + Sync {
    /// Uniformly random card, restricted to `restrict` ids when given.
    async fn random_card(&self, restrict: Option<&[CardId]>) -> Result<Option<Card>, CatalogError>;

    async fn card_by_id(&self, id: CardId) -> Result<Option<Card>, CatalogError>;

    /// Uniformly random question of one theme and difficulty tier.
    async fn random_question(
        &self,
        category: &str,
        difficulty: u8,
    ) -> Result<Option<Question>, CatalogError>;

    async fn all_cards(&self) -> Result<Vec<Card>, CatalogError>;

    async fn all_questions(&self) -> Result<Vec<Question>, CatalogError>;
}
