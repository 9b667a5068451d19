use actix_web::{web, HttpResponse};
use serde::Serialize;

use crate::adapters::session_store::record::game_key;
use crate::error::AppError;
use crate::state::app_state::AppState;

#[derive(Debug, Serialize)]
struct HealthResponse {
    status: &'static str,
    app_version: &'static str,
    store: &'static str,
    store_status: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    store_error: Option<String>,
    live_sessions: usize,
}

async fn health(app_state: web::Data<AppState>) -> Result<HttpResponse, AppError> {
    // Any key will do; only the round trip matters.
    let (store_status, store_error) = match app_state.store().exists(&game_key("HEALTH")).await {
        Ok(_) => ("ok", None),
        Err(e) => ("error", Some(e.to_string())),
    };

    let response = HealthResponse {
        status: "ok",
        app_version: env!("CARGO_PKG_VERSION"),
        store: app_state.store_kind(),
        store_status,
        store_error,
        live_sessions: app_state.sessions().live_sessions(),
    };

    Ok(HttpResponse::Ok().json(response))
}

pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.route("/health", web::get().to(health));
}
