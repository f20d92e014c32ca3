//! Controller side of a watch session: what gets pushed to the face, and
//! the per-button edge bookkeeping for what comes back.

use std::collections::HashSet;

use chrono::NaiveDateTime;
use shared::{
    domain::{ButtonEdge, ButtonEvent, ButtonId},
    protocol::ControllerEvent,
};
use tracing::debug;

pub const TIME_FORMAT: &str = "%H:%M:%S";
pub const DATE_FORMAT: &str = "%d/%b/%y";

/// Decides which display events a session receives.
///
/// Button edges reach `on_button` only after [`EdgeTracker`] accepted them.
pub trait WatchController: Send {
    /// Full state pushed when a client joins.
    fn on_join(&mut self, now: NaiveDateTime) -> Vec<ControllerEvent>;

    fn on_tick(&mut self, now: NaiveDateTime) -> Vec<ControllerEvent>;

    fn on_button(&mut self, event: ButtonEvent) -> Vec<ControllerEvent>;
}

pub fn format_time(now: NaiveDateTime) -> String {
    now.format(TIME_FORMAT).to_string()
}

/// `12/JAN/24` style date.
pub fn format_date(now: NaiveDateTime) -> String {
    now.format(DATE_FORMAT).to_string().to_ascii_uppercase()
}

/// Keeps the face showing wall-clock time and date.
#[derive(Debug, Default)]
pub struct ClockController {
    shown_time: Option<String>,
    shown_date: Option<String>,
}

impl ClockController {
    fn push_changes(&mut self, now: NaiveDateTime) -> Vec<ControllerEvent> {
        let mut events = Vec::new();

        let time = format_time(now);
        if self.shown_time.as_deref() != Some(time.as_str()) {
            self.shown_time = Some(time.clone());
            events.push(ControllerEvent::SetTimeDisplay { time });
        }

        let date = format_date(now);
        if self.shown_date.as_deref() != Some(date.as_str()) {
            self.shown_date = Some(date.clone());
            events.push(ControllerEvent::SetDateDisplay { date });
        }

        events
    }
}

impl WatchController for ClockController {
    fn on_join(&mut self, now: NaiveDateTime) -> Vec<ControllerEvent> {
        self.shown_time = None;
        self.shown_date = None;
        let mut events = self.push_changes(now);
        events.push(ControllerEvent::UnsetIndiglo);
        events
    }

    fn on_tick(&mut self, now: NaiveDateTime) -> Vec<ControllerEvent> {
        self.push_changes(now)
    }

    fn on_button(&mut self, event: ButtonEvent) -> Vec<ControllerEvent> {
        debug!(event = event.event_name(), "clock controller has no button bindings");
        Vec::new()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EdgeVerdict {
    Accepted,
    /// Same edge twice in a row, or a release before any press.
    Duplicate,
}

/// Tracks which buttons a session currently holds down. Every button starts
/// released.
#[derive(Debug, Default)]
pub struct EdgeTracker {
    held: HashSet<ButtonId>,
}

impl EdgeTracker {
    pub fn observe(&mut self, event: ButtonEvent) -> EdgeVerdict {
        let changed = match event.edge {
            ButtonEdge::Pressed => self.held.insert(event.button),
            ButtonEdge::Released => self.held.remove(&event.button),
        };
        if changed {
            EdgeVerdict::Accepted
        } else {
            EdgeVerdict::Duplicate
        }
    }

    pub fn is_held(&self, button: ButtonId) -> bool {
        self.held.contains(&button)
    }
}

#[cfg(test)]
#[path = "tests/controller_tests.rs"]
mod tests;
