//! Session lifecycle over HTTP.
//!
//! Everything after a player has joined goes through the websocket; these
//! handlers only create, join, inspect and tear down sessions.

use actix_web::{web, HttpResponse, Result};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::domain::session::PlayerId;
use crate::error::AppError;
use crate::state::app_state::AppState;
use crate::utils::join_code::normalize_join_code;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateGameRequest {
    pub player_name: String,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateGameResponse {
    pub game_id: String,
    pub player_id: PlayerId,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JoinGameRequest {
    pub game_id: String,
    pub player_name: String,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JoinGameResponse {
    pub player_id: PlayerId,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ActivePlayerResponse {
    pub active_player_id: Option<PlayerId>,
}

/// POST /api/game/create-game
async fn create_game(
    body: web::Json<CreateGameRequest>,
    app_state: web::Data<AppState>,
) -> Result<web::Json<CreateGameResponse>, AppError> {
    let (game_id, player_id) = app_state.sessions().create(&body.player_name).await?;
    info!(game_id = %game_id, player_id = %player_id, "Game created over HTTP");
    Ok(web::Json(CreateGameResponse { game_id, player_id }))
}

/// POST /api/game/join-game
async fn join_game(
    body: web::Json<JoinGameRequest>,
    app_state: web::Data<AppState>,
) -> Result<web::Json<JoinGameResponse>, AppError> {
    let code = normalize_join_code(&body.game_id);
    let player_id = app_state.sessions().join(&code, &body.player_name).await?;
    Ok(web::Json(JoinGameResponse { player_id }))
}

/// GET /api/game/active-player/{game_id}
///
/// `activePlayerId` is null while the session is still in the lobby.
async fn active_player(
    path: web::Path<String>,
    app_state: web::Data<AppState>,
) -> Result<web::Json<ActivePlayerResponse>, AppError> {
    let code = normalize_join_code(&path.into_inner());
    let active_player_id = app_state.sessions().active_player(&code).await?;
    Ok(web::Json(ActivePlayerResponse { active_player_id }))
}

/// GET /api/game/{game_id}/snapshot
async fn snapshot(
    path: web::Path<String>,
    app_state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    let code = normalize_join_code(&path.into_inner());
    let view = app_state.sessions().snapshot(&code).await?;
    Ok(HttpResponse::Ok().json(view))
}

/// DELETE /api/game/{game_id}
///
/// Stops the session actor, deletes its keys and closes every open socket.
async fn delete_game(
    path: web::Path<String>,
    app_state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    let code = normalize_join_code(&path.into_inner());
    app_state.sessions().teardown(&code).await?;
    app_state.hub().close_session(&code);
    Ok(HttpResponse::NoContent().finish())
}

pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(web::resource("/create-game").route(web::post().to(create_game)))
        .service(web::resource("/join-game").route(web::post().to(join_game)))
        .service(web::resource("/active-player/{game_id}").route(web::get().to(active_player)))
        .service(web::resource("/{game_id}/snapshot").route(web::get().to(snapshot)))
        .service(web::resource("/{game_id}").route(web::delete().to(delete_game)));
}
