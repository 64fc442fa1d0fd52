//! Timeline clips.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::effect::{Effect, EffectKind};
use crate::geometry::{Point2D, Rect};

/// Media kind of a clip.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MediaKind {
    Video,
    Audio,
    Image,
}

impl MediaKind {
    /// Whether clips of this kind draw anything on the canvas.
    pub fn is_visual(&self) -> bool {
        !matches!(self, MediaKind::Audio)
    }

    /// MIME prefix that classifies into this kind.
    pub fn mime_prefix(&self) -> &'static str {
        match self {
            MediaKind::Video => "video/",
            MediaKind::Audio => "audio/",
            MediaKind::Image => "image/",
        }
    }

    /// Classify a declared MIME type by its prefix.
    pub fn from_mime(mime: &str) -> Option<Self> {
        let mime = mime.trim().to_ascii_lowercase();
        [MediaKind::Video, MediaKind::Audio, MediaKind::Image]
            .into_iter()
            .find(|kind| mime.starts_with(kind.mime_prefix()))
    }
}

impl fmt::Display for MediaKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            MediaKind::Video => "video",
            MediaKind::Audio => "audio",
            MediaKind::Image => "image",
        })
    }
}

impl FromStr for MediaKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "video" => Ok(MediaKind::Video),
            "audio" => Ok(MediaKind::Audio),
            "image" => Ok(MediaKind::Image),
            other => Err(format!("Unknown media kind: {other}. Use: video, audio, image")),
        }
    }
}

/// Spatial placement of a visual clip on the canvas.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Transform {
    /// Top-left corner in canvas pixels.
    pub position: Point2D,

    /// Size relative to the canvas (1.0 = full canvas).
    pub scale: f64,

    /// Rotation in degrees, clockwise.
    pub rotation: f64,
}

impl Default for Transform {
    fn default() -> Self {
        Self {
            position: Point2D::default(),
            scale: 1.0,
            rotation: 0.0,
        }
    }
}

impl Transform {
    /// Canvas rectangle covered by a clip with this transform.
    ///
    /// Rotation is carried in the model but does not change the covered
    /// rectangle.
    pub fn region(&self, width: u32, height: u32) -> Rect {
        let scale = if self.scale.is_finite() {
            self.scale.max(0.0)
        } else {
            1.0
        };
        Rect::new(
            self.position.x,
            self.position.y,
            width as f64 * scale,
            height as f64 * scale,
        )
    }
}

/// A media clip placed on the timeline.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Clip {
    /// Unique clip identifier.
    pub id: String,

    /// Display name (usually the source file name).
    pub name: String,

    /// Media kind.
    #[serde(rename = "type")]
    pub kind: MediaKind,

    /// Source reference (path or URL).
    pub source: String,

    /// Intrinsic duration in seconds.
    pub duration: f64,

    /// Track index; lower tracks are drawn first.
    pub track: usize,

    /// Placement start on the timeline (seconds).
    pub start_time: f64,

    /// Playback volume in `[0.0, 1.0]`.
    pub volume: f64,

    /// Ordered effects, at most one per kind.
    #[serde(default)]
    pub effects: Vec<Effect>,

    /// Optional spatial transform.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub transform: Option<Transform>,
}

impl Clip {
    /// Create a clip at track 0, time 0 with a fresh id.
    ///
    /// Visual clips get an identity transform; audio clips get none.
    pub fn new(
        name: impl Into<String>,
        kind: MediaKind,
        source: impl Into<String>,
        duration: f64,
    ) -> Self {
        Self {
            id: crate::new_id(),
            name: name.into(),
            kind,
            source: source.into(),
            duration,
            track: 0,
            start_time: 0.0,
            volume: 1.0,
            effects: Vec::new(),
            transform: kind.is_visual().then(Transform::default),
        }
    }

    /// Placement end on the timeline (exclusive).
    pub fn end_time(&self) -> f64 {
        self.start_time + self.duration
    }

    /// Whether the clip is on screen at `t`: `start <= t < start + duration`.
    pub fn contains_time(&self, t: f64) -> bool {
        t >= self.start_time && t < self.end_time()
    }

    /// Offset of `t` into the clip, if the clip is active at `t`.
    pub fn local_time(&self, t: f64) -> Option<f64> {
        self.contains_time(t).then(|| t - self.start_time)
    }

    /// The effect of a given kind, if present.
    pub fn effect(&self, kind: EffectKind) -> Option<&Effect> {
        self.effects.iter().find(|e| e.kind == kind)
    }

    /// Canvas rectangle this clip covers, or `None` for audio clips.
    pub fn region(&self, width: u32, height: u32) -> Option<Rect> {
        if !self.kind.is_visual() {
            return None;
        }
        Some(match &self.transform {
            Some(transform) => transform.region(width, height),
            None => Rect::canvas(width, height),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_containment_is_half_open() {
        let mut clip = Clip::new("intro.mp4", MediaKind::Video, "intro.mp4", 4.0);
        clip.start_time = 2.0;
        assert!(!clip.contains_time(1.999));
        assert!(clip.contains_time(2.0));
        assert!(clip.contains_time(5.999));
        assert!(!clip.contains_time(6.0));
        assert_eq!(clip.local_time(3.5), Some(1.5));
        assert_eq!(clip.local_time(6.0), None);
    }

    #[test]
    fn test_mime_classification() {
        assert_eq!(MediaKind::from_mime("video/mp4"), Some(MediaKind::Video));
        assert_eq!(MediaKind::from_mime("Audio/MPEG"), Some(MediaKind::Audio));
        assert_eq!(MediaKind::from_mime("image/png"), Some(MediaKind::Image));
        assert_eq!(MediaKind::from_mime("application/pdf"), None);
    }

    #[test]
    fn test_audio_has_no_region() {
        let clip = Clip::new("music.mp3", MediaKind::Audio, "music.mp3", 30.0);
        assert!(clip.transform.is_none());
        assert!(clip.region(1920, 1080).is_none());
    }

    #[test]
    fn test_transform_region_scales_canvas() {
        let mut clip = Clip::new("logo.png", MediaKind::Image, "logo.png", 5.0);
        clip.transform = Some(Transform {
            position: Point2D::new(100.0, 50.0),
            scale: 0.5,
            rotation: 0.0,
        });
        let region = clip.region(200, 100).unwrap();
        assert_eq!(region, Rect::new(100.0, 50.0, 100.0, 50.0));
    }

    #[test]
    fn test_clip_json_uses_type_field() {
        let clip = Clip::new("a.mp4", MediaKind::Video, "a.mp4", 1.0);
        let json = serde_json::to_value(&clip).unwrap();
        assert_eq!(json["type"], "video");
        assert_eq!(json["track"], 0);
    }
}
