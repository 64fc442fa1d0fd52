//! Project metadata and content.
//!
//! A project is the top-level container that ties together clips, text
//! overlays, audio tracks, and the canvas they are composited onto.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::audio::AudioTrack;
use crate::clip::Clip;
use crate::overlay::TextOverlay;

/// Prefix of every project key in the store.
pub const PROJECT_KEY_PREFIX: &str = "video_project_";

/// Current schema version written to disk.
pub const PROJECT_SCHEMA_VERSION: &str = "1.0";

/// A video editing project.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Project {
    /// Schema version.
    pub version: String,

    /// Unique project identifier (UUID).
    pub id: String,

    /// Human-readable project name.
    pub name: String,

    /// Canvas width in pixels.
    pub width: u32,

    /// Canvas height in pixels.
    pub height: u32,

    /// Frame rate.
    pub fps: u32,

    /// Timeline length: the latest clip end time. Always derived.
    pub duration: f64,

    /// Clips in insertion order.
    #[serde(default)]
    pub clips: Vec<Clip>,

    /// Text overlays in insertion order.
    #[serde(default)]
    pub text_overlays: Vec<TextOverlay>,

    /// Audio tracks in insertion order.
    #[serde(default)]
    pub audio_tracks: Vec<AudioTrack>,

    /// Creation timestamp (ISO 8601).
    pub created_at: DateTime<Utc>,

    /// Last modified timestamp (ISO 8601).
    pub updated_at: DateTime<Utc>,
}

impl Project {
    /// Create an empty 1920x1080 @ 30fps project.
    pub fn new(name: impl Into<String>) -> Self {
        Self::with_canvas(name, 1920, 1080, 30)
    }

    /// Create an empty project with an explicit canvas.
    pub fn with_canvas(name: impl Into<String>, width: u32, height: u32, fps: u32) -> Self {
        let now = Utc::now();
        Self {
            version: PROJECT_SCHEMA_VERSION.to_string(),
            id: crate::new_id(),
            name: name.into(),
            width: width.max(1),
            height: height.max(1),
            fps: fps.max(1),
            duration: 0.0,
            clips: Vec::new(),
            text_overlays: Vec::new(),
            audio_tracks: Vec::new(),
            created_at: now,
            updated_at: now,
        }
    }

    /// Key under which this project is stored.
    pub fn storage_key(&self) -> String {
        storage_key(&self.id)
    }

    /// Max clip end time, or 0 for an empty project.
    pub fn computed_duration(&self) -> f64 {
        self.clips
            .iter()
            .map(Clip::end_time)
            .fold(0.0_f64, f64::max)
    }

    /// Re-derive `duration` from the clips.
    pub(crate) fn recompute_duration(&mut self) {
        self.duration = self.computed_duration();
    }

    /// Bump the modification timestamp.
    pub fn touch(&mut self) {
        self.updated_at = Utc::now();
    }

    pub fn clip(&self, id: &str) -> Option<&Clip> {
        self.clips.iter().find(|c| c.id == id)
    }

    pub(crate) fn clip_mut(&mut self, id: &str) -> Option<&mut Clip> {
        self.clips.iter_mut().find(|c| c.id == id)
    }

    pub fn text_overlay(&self, id: &str) -> Option<&TextOverlay> {
        self.text_overlays.iter().find(|o| o.id == id)
    }

    pub fn audio_track(&self, id: &str) -> Option<&AudioTrack> {
        self.audio_tracks.iter().find(|a| a.id == id)
    }

    /// Clips in draw order: ascending track, then insertion order.
    pub fn clips_in_draw_order(&self) -> Vec<&Clip> {
        let mut clips: Vec<&Clip> = self.clips.iter().collect();
        clips.sort_by_key(|c| c.track);
        clips
    }

    /// Clips active at `t`, in draw order.
    pub fn clips_at(&self, t: f64) -> Vec<&Clip> {
        self.clips_in_draw_order()
            .into_iter()
            .filter(|c| c.contains_time(t))
            .collect()
    }

    /// Text overlays visible at `t`, in insertion order.
    pub fn overlays_at(&self, t: f64) -> Vec<&TextOverlay> {
        self.text_overlays
            .iter()
            .filter(|o| o.contains_time(t))
            .collect()
    }

    /// Parse a project from JSON, re-deriving the duration.
    pub fn from_json(json: &str) -> Result<Self, ProjectError> {
        let mut project: Project =
            serde_json::from_str(json).map_err(|source| ProjectError::ParseError { source })?;
        project.recompute_duration();
        Ok(project)
    }

    /// Serialize to pretty JSON.
    pub fn to_json(&self) -> Result<String, ProjectError> {
        serde_json::to_string_pretty(self).map_err(|source| ProjectError::ParseError { source })
    }

    /// Report structural problems (empty list means valid).
    pub fn validate(&self) -> Vec<String> {
        let mut errors = vec![];

        for clip in &self.clips {
            if !(clip.duration.is_finite() && clip.duration > 0.0) {
                errors.push(format!(
                    "Clip '{}' has non-positive duration {}",
                    clip.name, clip.duration
                ));
            }
            if !(clip.start_time.is_finite() && clip.start_time >= 0.0) {
                errors.push(format!(
                    "Clip '{}' starts at invalid time {}",
                    clip.name, clip.start_time
                ));
            }
            if !(0.0..=1.0).contains(&clip.volume) {
                errors.push(format!(
                    "Clip '{}' volume {} outside [0, 1]",
                    clip.name, clip.volume
                ));
            }
            let mut kinds: Vec<_> = clip.effects.iter().map(|e| e.kind).collect();
            kinds.sort_by_key(|k| k.as_str());
            kinds.dedup();
            if kinds.len() != clip.effects.len() {
                errors.push(format!("Clip '{}' has duplicate effect kinds", clip.name));
            }
        }

        for overlay in &self.text_overlays {
            if !(overlay.duration.is_finite() && overlay.duration > 0.0) {
                errors.push(format!(
                    "Text overlay '{}' has non-positive duration {}",
                    overlay.text, overlay.duration
                ));
            }
            if overlay.font_size <= 0.0 {
                errors.push(format!(
                    "Text overlay '{}' has non-positive font size",
                    overlay.text
                ));
            }
        }

        if (self.duration - self.computed_duration()).abs() > 1e-9 {
            errors.push(format!(
                "Duration {} does not match clip extent {}",
                self.duration,
                self.computed_duration()
            ));
        }

        errors
    }
}

/// Store key for a project id.
pub fn storage_key(project_id: &str) -> String {
    format!("{PROJECT_KEY_PREFIX}{project_id}")
}

/// Errors that can occur when working with projects.
#[derive(Debug, thiserror::Error)]
pub enum ProjectError {
    #[error("Project JSON error: {source}")]
    ParseError { source: serde_json::Error },

    #[error("Invalid project: {message}")]
    ValidationError { message: String },
}
