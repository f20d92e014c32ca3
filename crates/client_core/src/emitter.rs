//! Turns pointer interaction on the four button regions into button edges.

use std::{collections::HashMap, sync::Arc};

use shared::domain::{ButtonEvent, ButtonId};
use tracing::debug;

use crate::channel::Channel;

pub type PointerId = u64;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Region {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl Region {
    pub const fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    pub fn contains(&self, x: f32, y: f32) -> bool {
        x >= self.x && x <= self.x + self.width && y >= self.y && y <= self.y + self.height
    }

    pub fn center(&self) -> (f32, f32) {
        (self.x + self.width / 2.0, self.y + self.height / 2.0)
    }
}

/// Screen regions of the four buttons, in face coordinates.
#[derive(Debug, Clone, PartialEq)]
pub struct ButtonLayout {
    regions: [(ButtonId, Region); 4],
}

impl Default for ButtonLayout {
    /// Layout of the 250x250 watch face.
    fn default() -> Self {
        Self {
            regions: [
                (ButtonId::TopLeft, Region::new(2.0, 60.0, 12.0, 12.0)),
                (ButtonId::BottomLeft, Region::new(2.0, 160.0, 12.0, 12.0)),
                (ButtonId::TopRight, Region::new(207.0, 58.0, 12.0, 12.0)),
                (ButtonId::BottomRight, Region::new(209.0, 160.0, 12.0, 12.0)),
            ],
        }
    }
}

impl ButtonLayout {
    pub fn new(regions: [(ButtonId, Region); 4]) -> Self {
        Self { regions }
    }

    pub fn region(&self, button: ButtonId) -> Option<Region> {
        self.regions
            .iter()
            .find(|(id, _)| *id == button)
            .map(|(_, region)| *region)
    }

    pub fn hit(&self, x: f32, y: f32) -> Option<ButtonId> {
        self.regions
            .iter()
            .find(|(_, region)| region.contains(x, y))
            .map(|(button, _)| *button)
    }
}

/// Emits exactly one outbound event per button transition.
///
/// A pointer that pressed a button captures it: the matching release is sent
/// when that pointer goes up or is cancelled, wherever it ends. A pointer that
/// pressed nothing never produces a release.
pub struct ButtonEdgeEmitter {
    channel: Arc<dyn Channel>,
    layout: ButtonLayout,
    captured: HashMap<PointerId, ButtonId>,
}

impl ButtonEdgeEmitter {
    pub fn new(channel: Arc<dyn Channel>) -> Self {
        Self::with_layout(channel, ButtonLayout::default())
    }

    pub fn with_layout(channel: Arc<dyn Channel>, layout: ButtonLayout) -> Self {
        Self {
            channel,
            layout,
            captured: HashMap::new(),
        }
    }

    pub fn layout(&self) -> &ButtonLayout {
        &self.layout
    }

    pub fn is_held(&self, button: ButtonId) -> bool {
        self.captured.values().any(|held| *held == button)
    }

    pub fn pointer_down(&mut self, pointer: PointerId, x: f32, y: f32) -> Option<ButtonEvent> {
        let button = self.layout.hit(x, y)?;
        if self.captured.contains_key(&pointer) {
            debug!(pointer, %button, "pointer already holds a button; ignoring press");
            return None;
        }
        if self.is_held(button) {
            debug!(pointer, %button, "button already held by another pointer");
            return None;
        }
        self.captured.insert(pointer, button);
        Some(self.emit(ButtonEvent::pressed(button)))
    }

    pub fn pointer_up(&mut self, pointer: PointerId, x: f32, y: f32) -> Option<ButtonEvent> {
        let button = self.captured.remove(&pointer)?;
        if self.layout.hit(x, y) != Some(button) {
            debug!(pointer, %button, "pointer released off its button");
        }
        Some(self.emit(ButtonEvent::released(button)))
    }

    pub fn pointer_cancel(&mut self, pointer: PointerId) -> Option<ButtonEvent> {
        let button = self.captured.remove(&pointer)?;
        Some(self.emit(ButtonEvent::released(button)))
    }

    fn emit(&self, event: ButtonEvent) -> ButtonEvent {
        debug!(topic = self.channel.topic(), event = event.event_name(), "button edge");
        self.channel.send_button(event);
        event
    }
}

#[cfg(test)]
#[path = "tests/emitter_tests.rs"]
mod tests;
