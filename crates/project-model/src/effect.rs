//! Per-clip effects.
//!
//! A clip carries an ordered list of effects with at most one entry per
//! kind. Color adjustments take an intensity in `0..=100` (hue takes
//! degrees in `0..=360`); filters toggle between `0` (off) and `100` (on).

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// The fixed set of effect kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EffectKind {
    Brightness,
    Contrast,
    Saturation,
    Hue,
    Blur,
    Sepia,
    Grayscale,
}

impl EffectKind {
    pub const ALL: [EffectKind; 7] = [
        EffectKind::Brightness,
        EffectKind::Contrast,
        EffectKind::Saturation,
        EffectKind::Hue,
        EffectKind::Blur,
        EffectKind::Sepia,
        EffectKind::Grayscale,
    ];

    /// Continuous color adjustments.
    pub const COLOR: [EffectKind; 4] = [
        EffectKind::Brightness,
        EffectKind::Contrast,
        EffectKind::Saturation,
        EffectKind::Hue,
    ];

    /// Intensity at which this effect leaves pixels unchanged.
    pub fn neutral_intensity(&self) -> f64 {
        match self {
            EffectKind::Brightness | EffectKind::Saturation => 50.0,
            EffectKind::Contrast => 0.0,
            EffectKind::Hue => 0.0,
            EffectKind::Blur | EffectKind::Sepia | EffectKind::Grayscale => 0.0,
        }
    }

    /// Value the editor resets a control to.
    pub fn default_intensity(&self) -> f64 {
        match self {
            EffectKind::Brightness | EffectKind::Contrast | EffectKind::Saturation => 50.0,
            EffectKind::Hue => 0.0,
            EffectKind::Blur | EffectKind::Sepia | EffectKind::Grayscale => 100.0,
        }
    }

    /// Upper bound of the intensity range.
    pub fn max_intensity(&self) -> f64 {
        match self {
            EffectKind::Hue => 360.0,
            _ => 100.0,
        }
    }

    /// Clamp into `0..=max_intensity`; non-finite values become neutral.
    pub fn clamp_intensity(&self, intensity: f64) -> f64 {
        if intensity.is_finite() {
            intensity.clamp(0.0, self.max_intensity())
        } else {
            self.neutral_intensity()
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            EffectKind::Brightness => "brightness",
            EffectKind::Contrast => "contrast",
            EffectKind::Saturation => "saturation",
            EffectKind::Hue => "hue",
            EffectKind::Blur => "blur",
            EffectKind::Sepia => "sepia",
            EffectKind::Grayscale => "grayscale",
        }
    }
}

impl fmt::Display for EffectKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for EffectKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        EffectKind::ALL
            .iter()
            .copied()
            .find(|kind| kind.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| {
                format!(
                    "Unknown effect: {s}. Use: brightness, contrast, saturation, hue, \
                     blur, sepia, grayscale"
                )
            })
    }
}

/// An effect instance attached to a clip.
///
/// Deserialized intensities are clamped the same way [`Effect::new`] clamps
/// them, so stored or hand-written projects cannot carry out-of-range values.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(from = "StoredEffect")]
pub struct Effect {
    /// Unique effect identifier.
    pub id: String,

    /// Effect kind.
    #[serde(rename = "type")]
    pub kind: EffectKind,

    /// Strength, clamped to `0..=kind.max_intensity()`.
    pub intensity: f64,
}

impl Effect {
    /// Create an effect with a fresh id, clamping intensity into range.
    pub fn new(kind: EffectKind, intensity: f64) -> Self {
        Self {
            id: crate::new_id(),
            kind,
            intensity: kind.clamp_intensity(intensity),
        }
    }

    /// A filter switched on or off.
    pub fn toggle(kind: EffectKind, on: bool) -> Self {
        Self::new(kind, if on { 100.0 } else { 0.0 })
    }

    /// Whether the effect changes any pixel.
    pub fn is_active(&self) -> bool {
        (self.intensity - self.kind.neutral_intensity()).abs() > f64::EPSILON
    }
}

#[derive(Deserialize)]
struct StoredEffect {
    id: String,
    #[serde(rename = "type")]
    kind: EffectKind,
    intensity: f64,
}

impl From<StoredEffect> for Effect {
    fn from(stored: StoredEffect) -> Self {
        Self {
            id: stored.id,
            kind: stored.kind,
            intensity: stored.kind.clamp_intensity(stored.intensity),
        }
    }
}

/// Insert `effect`, replacing an existing entry of the same kind in place.
///
/// Returns `true` when an existing entry was replaced.
pub fn upsert_effect(effects: &mut Vec<Effect>, effect: Effect) -> bool {
    match effects.iter_mut().find(|e| e.kind == effect.kind) {
        Some(existing) => {
            *existing = effect;
            true
        }
        None => {
            effects.push(effect);
            false
        }
    }
}
