use std::fmt;

use serde::{Deserialize, Serialize};

pub const INITIAL_TIME: &str = "12:00:00";
pub const INITIAL_DATE: &str = "--/---/--";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ButtonId {
    TopLeft,
    BottomLeft,
    TopRight,
    BottomRight,
}

impl ButtonId {
    pub const ALL: [ButtonId; 4] = [
        ButtonId::TopLeft,
        ButtonId::BottomLeft,
        ButtonId::TopRight,
        ButtonId::BottomRight,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            ButtonId::TopLeft => "top-left",
            ButtonId::BottomLeft => "bottom-left",
            ButtonId::TopRight => "top-right",
            ButtonId::BottomRight => "bottom-right",
        }
    }

    pub fn parse(raw: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|button| button.as_str() == raw)
    }
}

impl fmt::Display for ButtonId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ButtonEdge {
    Pressed,
    Released,
}

impl ButtonEdge {
    pub fn as_str(self) -> &'static str {
        match self {
            ButtonEdge::Pressed => "pressed",
            ButtonEdge::Released => "released",
        }
    }
}

/// One physical transition of one button.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ButtonEvent {
    pub button: ButtonId,
    pub edge: ButtonEdge,
}

impl ButtonEvent {
    pub fn pressed(button: ButtonId) -> Self {
        Self {
            button,
            edge: ButtonEdge::Pressed,
        }
    }

    pub fn released(button: ButtonId) -> Self {
        Self {
            button,
            edge: ButtonEdge::Released,
        }
    }

    /// Outbound event name, e.g. `top-left-pressed`.
    pub fn event_name(self) -> &'static str {
        use ButtonEdge::*;
        use ButtonId::*;

        match (self.button, self.edge) {
            (TopLeft, Pressed) => "top-left-pressed",
            (TopLeft, Released) => "top-left-released",
            (BottomLeft, Pressed) => "bottom-left-pressed",
            (BottomLeft, Released) => "bottom-left-released",
            (TopRight, Pressed) => "top-right-pressed",
            (TopRight, Released) => "top-right-released",
            (BottomRight, Pressed) => "bottom-right-pressed",
            (BottomRight, Released) => "bottom-right-released",
        }
    }

    pub fn from_event_name(name: &str) -> Option<Self> {
        let (button, edge) = name.rsplit_once('-')?;
        let button = ButtonId::parse(button)?;
        let edge = [ButtonEdge::Pressed, ButtonEdge::Released]
            .into_iter()
            .find(|candidate| candidate.as_str() == edge)?;
        Some(Self { button, edge })
    }
}

impl fmt::Display for ButtonEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.event_name())
    }
}

/// Client view of the watch face.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DisplayState {
    pub time: String,
    pub date: String,
    pub backlight_on: bool,
}

impl Default for DisplayState {
    fn default() -> Self {
        Self {
            time: INITIAL_TIME.to_string(),
            date: INITIAL_DATE.to_string(),
            backlight_on: false,
        }
    }
}
