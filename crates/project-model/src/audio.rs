//! Standalone audio tracks (music beds, narration).

use serde::{Deserialize, Serialize};

/// An audio track laid under the timeline.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AudioTrack {
    pub id: String,
    pub name: String,
    pub source: String,

    /// Intrinsic duration in seconds.
    pub duration: f64,

    /// Playback volume in `[0.0, 1.0]`.
    pub volume: f64,

    /// Placement start (seconds).
    pub start_time: f64,
}

impl AudioTrack {
    pub fn new(name: impl Into<String>, source: impl Into<String>, duration: f64) -> Self {
        Self {
            id: crate::new_id(),
            name: name.into(),
            source: source.into(),
            duration,
            volume: 1.0,
            start_time: 0.0,
        }
    }

    pub fn end_time(&self) -> f64 {
        self.start_time + self.duration
    }
}
