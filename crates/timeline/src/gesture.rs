//! Pointer gestures on the timeline view.
//!
//! Gestures can be scripted as JSONL, one event per line. Blank lines and
//! lines starting with `#` are ignored. Coordinates are view pixels
//! relative to the top-left of the track area.

use serde::{Deserialize, Serialize};

/// A single pointer or zoom input.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum PointerEvent {
    /// Button pressed.
    Down { x: f64, y: f64 },

    /// Pointer moved (button state is tracked by the interaction).
    Move { x: f64, y: f64 },

    /// Button released.
    Up { x: f64, y: f64 },

    /// Zoom buttons pressed `steps` times (negative zooms out).
    Zoom { steps: i32 },
}

impl PointerEvent {
    pub fn down(x: f64, y: f64) -> Self {
        Self::Down { x, y }
    }

    pub fn moved(x: f64, y: f64) -> Self {
        Self::Move { x, y }
    }

    pub fn up(x: f64, y: f64) -> Self {
        Self::Up { x, y }
    }

    /// Pointer position, if this event carries one.
    pub fn position(&self) -> Option<(f64, f64)> {
        match self {
            PointerEvent::Down { x, y }
            | PointerEvent::Move { x, y }
            | PointerEvent::Up { x, y } => Some((*x, *y)),
            PointerEvent::Zoom { .. } => None,
        }
    }
}

/// Parse gestures from JSONL content.
pub fn parse_gestures(jsonl: &str) -> Result<Vec<PointerEvent>, serde_json::Error> {
    jsonl
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with('#'))
        .map(serde_json::from_str)
        .collect()
}

/// Serialize gestures to JSONL.
pub fn serialize_gestures(events: &[PointerEvent]) -> Result<String, serde_json::Error> {
    let mut output = String::new();
    for event in events {
        output.push_str(&serde_json::to_string(event)?);
        output.push('\n');
    }
    Ok(output)
}
