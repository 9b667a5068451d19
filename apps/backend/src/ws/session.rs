use std::sync::Arc;
use std::time::{Duration, Instant};

use actix::prelude::*;
use actix_web::{web, Error, HttpRequest, HttpResponse};
use actix_web_actors::ws;
use tracing::{info, warn};
use uuid::Uuid;

use crate::domain::session::PlayerId;
use crate::domain::snapshot::SessionView;
use crate::error::AppError;
use crate::errors::domain::{DomainError, NotFoundKind};
use crate::errors::ErrorCode;
use crate::services::game_flow::PlayerAction;
use crate::services::registry::SessionRegistry;
use crate::state::app_state::AppState;
use crate::utils::join_code::normalize_join_code;
use crate::ws::hub::{HubEvent, WsRegistry};
use crate::ws::protocol::ServerMsg;

const HEARTBEAT_INTERVAL: Duration = Duration::from_secs(20);
const CLIENT_TIMEOUT: Duration = Duration::from_secs(40);

/// `GET /ws/{code}/{player_id}`: only members of an existing session may
/// connect.
pub async fn upgrade(
    req: HttpRequest,
    stream: web::Payload,
    path: web::Path<(String, String)>,
    app_state: web::Data<AppState>,
) -> Result<HttpResponse, Error> {
    let (raw_code, player_id) = path.into_inner();
    let code = normalize_join_code(&raw_code);
    let registry = app_state.sessions();

    let snapshot = registry.snapshot(&code).await.map_err(AppError::from)?;
    if !snapshot.players.iter().any(|p| p.id == player_id) {
        let err = DomainError::not_found(
            NotFoundKind::Player,
            format!("player {player_id} is not part of game {code}"),
        );
        return Err(AppError::from(err).into());
    }

    let session = WsSession::new(code, player_id, snapshot, registry, app_state.hub());
    ws::start(session, &req, stream)
}

pub struct WsSession {
    conn_id: Uuid,
    code: String,
    player_id: PlayerId,
    registry: Arc<SessionRegistry>,
    hub: Arc<WsRegistry>,
    token: Option<Uuid>,
    // Sent once in `started`.
    welcome: Option<SessionView>,

    last_heartbeat: Instant,
    heartbeat_handle: Option<actix::SpawnHandle>,
}

impl WsSession {
    fn new(
        code: String,
        player_id: PlayerId,
        snapshot: SessionView,
        registry: Arc<SessionRegistry>,
        hub: Arc<WsRegistry>,
    ) -> Self {
        Self {
            conn_id: Uuid::new_v4(),
            code,
            player_id,
            registry,
            hub,
            token: None,
            welcome: Some(snapshot),
            last_heartbeat: Instant::now(),
            heartbeat_handle: None,
        }
    }

    fn send_json(ctx: &mut ws::WebsocketContext<Self>, msg: &ServerMsg) {
        match serde_json::to_string(msg) {
            Ok(payload) => ctx.text(payload),
            Err(err) => warn!(error = %err, "[WS SESSION] failed to serialize outbound message"),
        }
    }

    fn send_error(ctx: &mut ws::WebsocketContext<Self>, code: ErrorCode, message: impl Into<String>) {
        Self::send_json(
            ctx,
            &ServerMsg::Error {
                code: code.as_str(),
                message: message.into(),
            },
        );
    }

    fn send_error_and_close(
        &self,
        ctx: &mut ws::WebsocketContext<Self>,
        code: ErrorCode,
        message: impl Into<String>,
    ) {
        Self::send_error(ctx, code, message);
        ctx.close(Some(ws::CloseReason::from(ws::CloseCode::Error)));
        ctx.stop();
    }

    fn start_heartbeat(&mut self, ctx: &mut ws::WebsocketContext<Self>) {
        let handle = ctx.run_interval(HEARTBEAT_INTERVAL, |actor, ctx| {
            if Instant::now().duration_since(actor.last_heartbeat) > CLIENT_TIMEOUT {
                warn!(
                    conn_id = %actor.conn_id,
                    game_id = %actor.code,
                    player_id = %actor.player_id,
                    "[WS SESSION] heartbeat timed out"
                );
                ctx.close(Some(ws::CloseReason::from(ws::CloseCode::Normal)));
                ctx.stop();
                return;
            }
            ctx.ping(b"keepalive");
        });
        self.heartbeat_handle = Some(handle);
    }

    fn dispatch(&mut self, action: PlayerAction, ctx: &mut ws::WebsocketContext<Self>) {
        let registry = self.registry.clone();
        let code = self.code.clone();
        let player_id = self.player_id.clone();
        let name = action.name();

        ctx.spawn(
            async move { registry.act(&code, &player_id, action).await }
                .into_actor(self)
                .map(move |res, actor, ctx| match res {
                    Ok(reply) => Self::send_json(ctx, &ServerMsg::Reply { action: name, reply }),
                    Err(err) => {
                        info!(
                            conn_id = %actor.conn_id,
                            game_id = %actor.code,
                            player_id = %actor.player_id,
                            action = name,
                            error = %err,
                            "[WS SESSION] action rejected"
                        );
                        Self::send_error(ctx, err.code(), err.detail());
                    }
                }),
        );
    }
}

impl Actor for WsSession {
    type Context = ws::WebsocketContext<Self>;

    fn started(&mut self, ctx: &mut Self::Context) {
        info!(
            conn_id = %self.conn_id,
            game_id = %self.code,
            player_id = %self.player_id,
            "[WS SESSION] started"
        );

        let recipient = ctx.address().recipient::<HubEvent>();
        self.token = Some(self.hub.register(&self.code, recipient));

        if let Some(snapshot) = self.welcome.take() {
            Self::send_json(
                ctx,
                &ServerMsg::Welcome {
                    player_id: self.player_id.clone(),
                    snapshot,
                },
            );
        }

        self.start_heartbeat(ctx);
    }

    fn stopped(&mut self, _ctx: &mut Self::Context) {
        if let Some(token) = self.token.take() {
            self.hub.unregister(&self.code, token);
        }
        info!(
            conn_id = %self.conn_id,
            game_id = %self.code,
            player_id = %self.player_id,
            "[WS SESSION] stopped"
        );
    }
}

impl StreamHandler<Result<ws::Message, ws::ProtocolError>> for WsSession {
    fn handle(&mut self, msg: Result<ws::Message, ws::ProtocolError>, ctx: &mut Self::Context) {
        match msg {
            Ok(ws::Message::Ping(payload)) => {
                self.last_heartbeat = Instant::now();
                ctx.pong(&payload);
            }
            Ok(ws::Message::Pong(_)) => {
                self.last_heartbeat = Instant::now();
            }
            Ok(ws::Message::Text(text)) => {
                self.last_heartbeat = Instant::now();
                match serde_json::from_str::<PlayerAction>(&text) {
                    Ok(action) => self.dispatch(action, ctx),
                    Err(err) => {
                        self.send_error_and_close(
                            ctx,
                            ErrorCode::BadRequest,
                            format!("Malformed action: {err}"),
                        );
                    }
                }
            }
            Ok(ws::Message::Binary(_)) => {
                self.last_heartbeat = Instant::now();
                self.send_error_and_close(ctx, ErrorCode::BadRequest, "Binary not supported");
            }
            Ok(ws::Message::Close(reason)) => {
                ctx.close(reason);
                ctx.stop();
            }
            Ok(ws::Message::Continuation(_)) | Ok(ws::Message::Nop) => {
                self.last_heartbeat = Instant::now();
            }
            Err(err) => {
                warn!(
                    conn_id = %self.conn_id,
                    game_id = %self.code,
                    error = %err,
                    "[WS SESSION] protocol error"
                );
                ctx.close(Some(ws::CloseReason::from(ws::CloseCode::Error)));
                ctx.stop();
            }
        }
    }
}

impl Handler<HubEvent> for WsSession {
    type Result = ();

    fn handle(&mut self, msg: HubEvent, ctx: &mut Self::Context) -> Self::Result {
        match msg {
            HubEvent::Events(events) => {
                for event in events.iter() {
                    Self::send_json(
                        ctx,
                        &ServerMsg::Event {
                            event: event.clone(),
                        },
                    );
                }
            }
            HubEvent::SessionClosed => {
                // Already removed from the hub.
                self.token = None;
                if let Some(handle) = self.heartbeat_handle.take() {
                    ctx.cancel_future(handle);
                }
                Self::send_error(ctx, ErrorCode::GameNotFound, "game was closed");
                ctx.close(Some(ws::CloseReason::from(ws::CloseCode::Normal)));
                ctx.stop();
            }
        }
    }
}
