//! Pointer and keyboard input normalization.

use kurbo::Point;
use serde::{Deserialize, Serialize};

/// Where a pointer event came from, in canvas-local coordinates.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "source", rename_all = "lowercase")]
pub enum PointerSource {
    Mouse { position: Point },
    /// Active touches; only the first one draws.
    Touch { touches: Vec<Point> },
}

impl PointerSource {
    pub fn mouse(x: f64, y: f64) -> Self {
        Self::Mouse {
            position: Point::new(x, y),
        }
    }

    pub fn touch(x: f64, y: f64) -> Self {
        Self::Touch {
            touches: vec![Point::new(x, y)],
        }
    }

    /// The single point this event refers to.
    pub fn position(&self) -> Option<Point> {
        match self {
            PointerSource::Mouse { position } => Some(*position),
            PointerSource::Touch { touches } => touches.first().copied(),
        }
    }

    /// Whether the host should suppress its default handling (touch scrolling).
    pub fn prevents_default(&self) -> bool {
        matches!(self, PointerSource::Touch { .. })
    }
}

/// Unified pointer event.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum PointerEvent {
    Down(PointerSource),
    Move(PointerSource),
    Up,
}

impl PointerEvent {
    pub fn prevents_default(&self) -> bool {
        match self {
            PointerEvent::Down(source) | PointerEvent::Move(source) => source.prevents_default(),
            PointerEvent::Up => false,
        }
    }
}

/// Editor commands reachable from the keyboard.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Shortcut {
    Undo,
    Redo,
    TogglePause,
    Clear,
    Deselect,
}

impl Shortcut {
    /// Map a key press to a shortcut. Keys are matched case-insensitively;
    /// `ctrl` also covers the platform command key.
    pub fn from_key(key: &str, ctrl: bool, shift: bool) -> Option<Self> {
        let key = key.to_ascii_lowercase();
        match (key.as_str(), ctrl, shift) {
            ("z", true, false) => Some(Shortcut::Undo),
            ("z", true, true) | ("y", true, false) => Some(Shortcut::Redo),
            (" " | "space", false, _) => Some(Shortcut::TogglePause),
            ("delete" | "backspace", false, false) => Some(Shortcut::Clear),
            ("escape", false, _) => Some(Shortcut::Deselect),
            _ => None,
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            Shortcut::Undo => "Undo",
            Shortcut::Redo => "Redo",
            Shortcut::TogglePause => "Pause or resume animation",
            Shortcut::Clear => "Clear canvas",
            Shortcut::Deselect => "Deselect shape",
        }
    }
}
