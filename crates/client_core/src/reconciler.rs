//! Applies controller events to the client's [`DisplayState`].

use std::sync::Arc;

use serde_json::Value;
use shared::{
    domain::DisplayState,
    protocol::{ControllerEvent, CONTROLLER_EVENTS},
};
use tokio::sync::watch;
use tracing::{debug, warn};

use crate::channel::Channel;

/// Sole owner and writer of one session's [`DisplayState`].
///
/// Each controller event touches exactly one field, and applying the same
/// event twice leaves the state as applying it once. Watchers are woken only
/// when a field actually changes.
pub struct Reconciler {
    state: watch::Sender<DisplayState>,
}

impl Reconciler {
    pub fn new() -> Arc<Self> {
        let (state, _) = watch::channel(DisplayState::default());
        Arc::new(Self { state })
    }

    /// Subscribes to every controller event name on `channel`.
    pub fn attach(self: &Arc<Self>, channel: &dyn Channel) {
        for name in CONTROLLER_EVENTS {
            let reconciler = Arc::clone(self);
            channel.subscribe(
                name,
                Arc::new(move |payload: &Value| {
                    reconciler.handle(name, payload);
                }),
            );
        }
    }

    /// Decodes and applies one inbound event. Malformed payloads leave the
    /// state untouched.
    pub fn handle(&self, name: &str, payload: &Value) -> bool {
        match ControllerEvent::decode(name, payload) {
            Ok(event) => self.apply(&event),
            Err(error) => {
                warn!(event = name, code = ?error.code(), %error, "ignoring malformed controller event");
                false
            }
        }
    }

    pub fn apply(&self, event: &ControllerEvent) -> bool {
        self.state.send_if_modified(|state| match event {
            ControllerEvent::SetIndiglo => set_field(&mut state.backlight_on, true),
            ControllerEvent::UnsetIndiglo => set_field(&mut state.backlight_on, false),
            ControllerEvent::SetTimeDisplay { time } => set_text(&mut state.time, time),
            ControllerEvent::SetDateDisplay { date } => set_text(&mut state.date, date),
            ControllerEvent::Unknown { name } => {
                debug!(event = %name, "ignoring unknown controller event");
                false
            }
        })
    }

    pub fn snapshot(&self) -> DisplayState {
        self.state.borrow().clone()
    }

    pub fn watch(&self) -> watch::Receiver<DisplayState> {
        self.state.subscribe()
    }
}

fn set_field(field: &mut bool, value: bool) -> bool {
    std::mem::replace(field, value) != value
}

fn set_text(field: &mut String, value: &str) -> bool {
    if field.as_str() == value {
        return false;
    }
    value.clone_into(field);
    true
}

#[cfg(test)]
#[path = "tests/reconciler_tests.rs"]
mod tests;
