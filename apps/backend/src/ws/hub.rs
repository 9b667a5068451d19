use std::sync::Arc;

use actix::prelude::*;
use dashmap::DashMap;
use tracing::debug;
use uuid::Uuid;

use crate::domain::events::GameEvent;
use crate::services::notifier::Notifier;

#[derive(Message, Clone)]
#[rtype(result = "()")]
pub enum HubEvent {
    Events(Arc<[GameEvent]>),
    /// The session was torn down; connections should close.
    SessionClosed,
}

/// Websocket connections grouped by session code.
#[derive(Default)]
pub struct WsRegistry {
    sessions: DashMap<String, DashMap<Uuid, Recipient<HubEvent>>>,
}

impl WsRegistry {
    pub fn new() -> Self {
        Self {
            sessions: DashMap::new(),
        }
    }

    pub fn register(&self, code: &str, recipient: Recipient<HubEvent>) -> Uuid {
        let token = Uuid::new_v4();
        let entry = self
            .sessions
            .entry(code.to_string())
            .or_insert_with(DashMap::new);
        entry.insert(token, recipient);
        token
    }

    pub fn unregister(&self, code: &str, token: Uuid) {
        let now_empty = match self.sessions.get(code) {
            Some(entry) => {
                entry.remove(&token);
                entry.is_empty()
            }
            None => false,
        };
        if now_empty {
            self.sessions.remove_if(code, |_, conns| conns.is_empty());
        }
    }

    pub fn connections(&self, code: &str) -> usize {
        self.sessions.get(code).map(|c| c.len()).unwrap_or(0)
    }

    /// Tell every connection of `code` to close and forget them.
    pub fn close_session(&self, code: &str) {
        if let Some((_, conns)) = self.sessions.remove(code) {
            for recipient in conns.iter() {
                recipient.value().do_send(HubEvent::SessionClosed);
            }
        }
    }

    fn send(&self, code: &str, message: HubEvent) {
        if let Some(entry) = self.sessions.get(code) {
            for recipient in entry.iter() {
                recipient.value().do_send(message.clone());
            }
        }
    }
}

impl Notifier for WsRegistry {
    fn broadcast(&self, code: &str, events: &[GameEvent]) {
        if events.is_empty() {
            return;
        }
        debug!(
            game_id = code,
            events = events.len(),
            connections = self.connections(code),
            "Broadcasting"
        );
        self.send(code, HubEvent::Events(events.into()));
    }
}
