//! Outbound notification seam.

use std::sync::Arc;

use parking_lot::Mutex;

use crate::domain::GameEvent;

/// Fans events out to every connection of a session.
///
/// Delivery is best effort: a notifier never fails the action that produced
/// the events.
pub trait Notifier: Send + Sync {
    fn broadcast(&self, code: &str, events: &[GameEvent]);
}

/// Notifier that drops everything. Used when no transport is wired.
#[derive(Debug, Default, Clone, Copy)]
pub struct NullNotifier;

impl Notifier for NullNotifier {
    fn broadcast(&self, _code: &str, _events: &[GameEvent]) {}
}

/// Records every broadcast in order. Handy for tests and diagnostics.
#[derive(Debug, Default, Clone)]
pub struct RecordingNotifier {
    sent: Arc<Mutex<Vec<(String, GameEvent)>>>,
}

impl RecordingNotifier {
    pub fn new() -> Self {
        Self::default()
    }

    /// Everything broadcast so far, oldest first.
    pub fn events(&self) -> Vec<(String, GameEvent)> {
        self.sent.lock().clone()
    }

    /// Event names broadcast to `code`, oldest first.
    pub fn names_for(&self, code: &str) -> Vec<&'static str> {
        self.sent
            .lock()
            .iter()
            .filter(|(c, _)| c == code)
            .map(|(_, e)| e.name())
            .collect()
    }

    pub fn clear(&self) {
        self.sent.lock().clear();
    }
}

impl Notifier for RecordingNotifier {
    fn broadcast(&self, code: &str, events: &[GameEvent]) {
        let mut sent = self.sent.lock();
        sent.extend(events.iter().map(|e| (code.to_string(), e.clone())));
    }
}
