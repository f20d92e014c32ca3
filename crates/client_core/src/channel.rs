//! Event channel seam between the watch face and its controller.

use std::{
    collections::HashMap,
    sync::{Arc, Mutex, PoisonError},
};

use serde_json::Value;
use shared::{domain::ButtonEvent, protocol::empty_payload};
use tracing::trace;

pub type Handler = Arc<dyn Fn(&Value) + Send + Sync>;

/// Bidirectional, per-direction ordered event channel bound to one topic.
///
/// `send` is fire-and-forget: implementations drop the event when the
/// transport is unavailable instead of reporting an error. Handlers for the
/// same event name all run, in registration order.
pub trait Channel: Send + Sync {
    fn topic(&self) -> &str;

    fn send(&self, event: &str, payload: Value);

    fn subscribe(&self, event: &str, handler: Handler);

    /// Starts inbound delivery. Handlers registered before this call see
    /// every inbound event of the session.
    fn listen(&self) {}

    fn send_button(&self, event: ButtonEvent) {
        self.send(event.event_name(), empty_payload());
    }
}

#[derive(Default)]
pub struct Subscriptions {
    handlers: Mutex<HashMap<String, Vec<Handler>>>,
}

impl Subscriptions {
    pub fn add(&self, event: &str, handler: Handler) {
        self.handlers
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .entry(event.to_string())
            .or_default()
            .push(handler);
    }

    /// Runs every handler registered for `event` and returns how many ran.
    pub fn dispatch(&self, event: &str, payload: &Value) -> usize {
        // Handlers run outside the lock so they may subscribe further.
        let handlers = self
            .handlers
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .get(event)
            .cloned()
            .unwrap_or_default();

        if handlers.is_empty() {
            trace!(event, "no subscribers for inbound event");
        }
        for handler in &handlers {
            handler(payload);
        }
        handlers.len()
    }
}
