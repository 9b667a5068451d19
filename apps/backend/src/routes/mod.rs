use actix_web::{error, web};

use crate::error::AppError;
use crate::errors::ErrorCode;

pub mod catalog;
pub mod games;
pub mod health;

/// Register every route of the service.
///
/// `main.rs` adds the CORS, logging and trace middleware around this; tests
/// call it directly on a bare `App`.
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.app_data(json_config());

    // Health check: /health
    cfg.configure(health::configure_routes);

    // Session lifecycle: /api/game/**
    cfg.service(web::scope("/api/game").configure(games::configure_routes));

    // Card catalog: /api/catalog/**
    cfg.service(web::scope("/api/catalog").configure(catalog::configure_routes));

    // Realtime: /ws/{code}/{player_id}
    cfg.service(
        web::resource("/ws/{code}/{player_id}").route(web::get().to(crate::ws::session::upgrade)),
    );
}

/// Malformed JSON bodies become BAD_REQUEST problem details.
fn json_config() -> web::JsonConfig {
    web::JsonConfig::default().error_handler(|err, _req| {
        let detail = match &err {
            error::JsonPayloadError::ContentType => "expected application/json".to_string(),
            other => other.to_string(),
        };
        AppError::bad_request(ErrorCode::BadRequest, detail).into()
    })
}
