//! Application configuration.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Global application configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Directory backing the project key/value store.
    pub store_dir: PathBuf,

    /// Defaults for new projects and editing sessions.
    pub editor: EditorDefaults,

    /// Timeline geometry.
    pub timeline: TimelineDefaults,

    /// Playback driver settings.
    pub playback: PlaybackDefaults,

    /// Logging configuration.
    pub logging: LoggingConfig,
}

/// Defaults applied when creating projects and sessions.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct EditorDefaults {
    /// Canvas width in pixels.
    pub width: u32,

    /// Canvas height in pixels.
    pub height: u32,

    /// Project frame rate.
    pub fps: u32,

    /// Duration assigned to still images on import (seconds).
    pub image_clip_secs: f64,

    /// Maximum number of undo snapshots kept per session.
    pub history_limit: usize,

    /// Save the project after every committed edit.
    pub autosave: bool,
}

/// Timeline geometry used for pointer mapping.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TimelineDefaults {
    /// Horizontal pixels per second at zoom 1.0.
    pub pixels_per_second: f64,

    /// Height of one track row in pixels.
    pub track_height: f64,

    /// Number of track rows.
    pub track_count: usize,
}

/// How the playback cursor advances per tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum PlaybackClockMode {
    /// Fixed increment of one nominal frame interval per tick.
    #[default]
    FixedStep,
    /// Advance by real elapsed time between ticks.
    WallClock,
}

/// Playback driver settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PlaybackDefaults {
    /// Tick rate in Hz; the fixed-step increment is `1 / tick_hz`.
    pub tick_hz: u32,

    /// Clock mode.
    pub clock: PlaybackClockMode,
}

/// Logging configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Log level filter (e.g., "info", "debug", "cutframe=debug,warn").
    pub level: String,

    /// Whether to output structured JSON logs.
    pub json: bool,

    /// Optional log file path.
    pub file: Option<PathBuf>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            store_dir: dirs_default_store(),
            editor: EditorDefaults::default(),
            timeline: TimelineDefaults::default(),
            playback: PlaybackDefaults::default(),
            logging: LoggingConfig::default(),
        }
    }
}

impl Default for EditorDefaults {
    fn default() -> Self {
        Self {
            width: 1920,
            height: 1080,
            fps: 30,
            image_clip_secs: 5.0,
            history_limit: 100,
            autosave: true,
        }
    }
}

impl Default for TimelineDefaults {
    fn default() -> Self {
        Self {
            pixels_per_second: 50.0,
            track_height: 60.0,
            track_count: 8,
        }
    }
}

impl Default for PlaybackDefaults {
    fn default() -> Self {
        Self {
            tick_hz: 30,
            clock: PlaybackClockMode::FixedStep,
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            json: false,
            file: None,
        }
    }
}

impl AppConfig {
    /// Load config from the standard location, falling back to defaults.
    pub fn load() -> Self {
        let config_path = config_file_path();
        if config_path.exists() {
            match std::fs::read_to_string(&config_path) {
                Ok(content) => match serde_json::from_str(&content) {
                    Ok(config) => return config,
                    Err(e) => {
                        tracing::warn!("Failed to parse config at {:?}: {}", config_path, e);
                    }
                },
                Err(e) => {
                    tracing::warn!("Failed to read config at {:?}: {}", config_path, e);
                }
            }
        }
        Self::default()
    }
}

/// Standard config file location.
fn config_file_path() -> PathBuf {
    let base = std::env::var("XDG_CONFIG_HOME")
        .map(PathBuf::from)
        .unwrap_or_else(|_| {
            let home = std::env::var("HOME").unwrap_or_else(|_| "/tmp".to_string());
            PathBuf::from(home).join(".config")
        });
    base.join("cutframe").join("config.json")
}

/// Default store directory.
fn dirs_default_store() -> PathBuf {
    let base = std::env::var("XDG_DATA_HOME")
        .map(PathBuf::from)
        .unwrap_or_else(|_| {
            let home = std::env::var("HOME").unwrap_or_else(|_| "/tmp".to_string());
            PathBuf::from(home).join(".local").join("share")
        });
    base.join("cutframe").join("store")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_match_editor_conventions() {
        let config = AppConfig::default();
        assert_eq!(config.editor.width, 1920);
        assert_eq!(config.editor.height, 1080);
        assert_eq!(config.editor.fps, 30);
        assert_eq!(config.timeline.track_count, 8);
        assert_eq!(config.playback.clock, PlaybackClockMode::FixedStep);
        assert!(config.store_dir.ends_with("cutframe/store"));
    }

    #[test]
    fn test_partial_config_fills_missing_sections() {
        let parsed: AppConfig =
            serde_json::from_str(r#"{"playback":{"clock":"wall_clock"}}"#).unwrap();
        assert_eq!(parsed.playback.clock, PlaybackClockMode::WallClock);
        assert_eq!(parsed.playback.tick_hz, 30);
        assert_eq!(parsed.editor.history_limit, 100);
        assert!((parsed.timeline.pixels_per_second - 50.0).abs() < 1e-9);
    }
}
