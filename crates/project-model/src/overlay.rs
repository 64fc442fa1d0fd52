//! Timed text overlays.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::color::Color;
use crate::geometry::Point2D;

/// Font families offered by the editor.
pub const FONT_FAMILIES: [&str; 8] = [
    "Arial",
    "Helvetica",
    "Times New Roman",
    "Georgia",
    "Verdana",
    "Courier New",
    "Impact",
    "Comic Sans MS",
];

/// Entrance animation for a text overlay.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "kebab-case")]
pub enum TextAnimation {
    #[default]
    None,
    FadeIn,
    SlideIn,
    ZoomIn,
    Typewriter,
}

impl TextAnimation {
    pub fn as_str(&self) -> &'static str {
        match self {
            TextAnimation::None => "none",
            TextAnimation::FadeIn => "fade-in",
            TextAnimation::SlideIn => "slide-in",
            TextAnimation::ZoomIn => "zoom-in",
            TextAnimation::Typewriter => "typewriter",
        }
    }
}

impl fmt::Display for TextAnimation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TextAnimation {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "none" => Ok(TextAnimation::None),
            "fade-in" => Ok(TextAnimation::FadeIn),
            "slide-in" => Ok(TextAnimation::SlideIn),
            "zoom-in" => Ok(TextAnimation::ZoomIn),
            "typewriter" => Ok(TextAnimation::Typewriter),
            other => Err(format!(
                "Unknown animation: {other}. Use: none, fade-in, slide-in, zoom-in, typewriter"
            )),
        }
    }
}

/// A caption drawn over the composited clips.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TextOverlay {
    /// Unique overlay identifier.
    pub id: String,

    /// Literal text.
    pub text: String,

    pub font_family: String,

    /// Font size in pixels.
    pub font_size: f64,

    pub color: Color,

    /// Background fill; `transparent` draws no background.
    pub background_color: Color,

    /// Top-left of the text in canvas pixels.
    pub position: Point2D,

    /// Window start (seconds).
    pub start_time: f64,

    /// Window length (seconds).
    pub duration: f64,

    pub animation: TextAnimation,
}

impl TextOverlay {
    /// Create an overlay with the editor's defaults starting at `start_time`.
    pub fn new(text: impl Into<String>, start_time: f64) -> Self {
        Self {
            id: crate::new_id(),
            text: text.into(),
            font_family: FONT_FAMILIES[0].to_string(),
            font_size: 48.0,
            color: Color::WHITE,
            background_color: Color::TRANSPARENT,
            position: Point2D::new(100.0, 100.0),
            start_time,
            duration: 3.0,
            animation: TextAnimation::None,
        }
    }

    pub fn end_time(&self) -> f64 {
        self.start_time + self.duration
    }

    /// Whether the overlay is visible at `t`: `start <= t < start + duration`.
    pub fn contains_time(&self, t: f64) -> bool {
        t >= self.start_time && t < self.end_time()
    }

    /// Seconds since the overlay appeared, if visible at `t`.
    pub fn local_time(&self, t: f64) -> Option<f64> {
        self.contains_time(t).then(|| t - self.start_time)
    }

    /// Fraction of the window elapsed at `t`, clamped to `[0, 1]`.
    pub fn progress(&self, t: f64) -> f64 {
        if self.duration <= 0.0 {
            return 1.0;
        }
        ((t - self.start_time) / self.duration).clamp(0.0, 1.0)
    }
}
