use actix_web::{web, Result};

use crate::domain::cards::{Card, Question};
use crate::error::AppError;
use crate::errors::domain::DomainError;
use crate::state::app_state::AppState;

/// GET /api/catalog/cards
async fn list_cards(app_state: web::Data<AppState>) -> Result<web::Json<Vec<Card>>, AppError> {
    let cards = app_state
        .catalog()
        .all_cards()
        .await
        .map_err(DomainError::from)?;
    Ok(web::Json(cards))
}

/// GET /api/catalog/questions
async fn list_questions(
    app_state: web::Data<AppState>,
) -> Result<web::Json<Vec<Question>>, AppError> {
    let questions = app_state
        .catalog()
        .all_questions()
        .await
        .map_err(DomainError::from)?;
    Ok(web::Json(questions))
}

pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.route("/cards", web::get().to(list_cards))
        .route("/questions", web::get().to(list_questions));
}
