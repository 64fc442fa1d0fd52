//! Playback cursor driver.
//!
//! The driver owns the cursor and the play state; it never renders. Each
//! call to [`PlaybackDriver::tick`] advances the cursor while playing and
//! reports the new position so the caller can composite a frame.

use cutframe_common::clock::{frame_interval_secs, PlaybackClock};
use cutframe_common::config::{PlaybackClockMode, PlaybackDefaults};

/// Play state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PlaybackState {
    #[default]
    Stopped,
    Playing,
    Paused,
}

/// Advances a playback cursor in fixed steps or by wall-clock time.
#[derive(Debug, Clone)]
pub struct PlaybackDriver {
    state: PlaybackState,
    cursor: f64,
    mode: PlaybackClockMode,
    step_secs: f64,
    clock: Option<PlaybackClock>,
}

impl PlaybackDriver {
    pub fn new(mode: PlaybackClockMode, tick_hz: u32) -> Self {
        Self {
            state: PlaybackState::Stopped,
            cursor: 0.0,
            mode,
            step_secs: frame_interval_secs(tick_hz.max(1)),
            clock: None,
        }
    }

    pub fn from_defaults(defaults: &PlaybackDefaults) -> Self {
        Self::new(defaults.clock, defaults.tick_hz)
    }

    pub fn state(&self) -> PlaybackState {
        self.state
    }

    pub fn is_playing(&self) -> bool {
        self.state == PlaybackState::Playing
    }

    pub fn cursor(&self) -> f64 {
        self.cursor
    }

    pub fn mode(&self) -> PlaybackClockMode {
        self.mode
    }

    /// Cursor increment per tick in fixed-step mode.
    pub fn step_secs(&self) -> f64 {
        self.step_secs
    }

    /// Start or resume from the current cursor.
    pub fn play(&mut self) {
        if self.state != PlaybackState::Playing {
            tracing::debug!(cursor = self.cursor, "Playback started");
            self.state = PlaybackState::Playing;
            self.clock = Some(PlaybackClock::start());
        }
    }

    pub fn pause(&mut self) {
        if self.state == PlaybackState::Playing {
            tracing::debug!(cursor = self.cursor, "Playback paused");
            self.state = PlaybackState::Paused;
            self.clock = None;
        }
    }

    /// Stop and rewind to 0.
    pub fn stop(&mut self) {
        self.state = PlaybackState::Stopped;
        self.cursor = 0.0;
        self.clock = None;
    }

    /// Move the cursor to `time`, clamped to `[0, duration]`. The play state
    /// is unchanged.
    pub fn seek(&mut self, time: f64, duration: f64) -> f64 {
        let upper = duration.max(0.0);
        self.cursor = if time.is_finite() {
            time.clamp(0.0, upper)
        } else {
            0.0
        };
        self.cursor
    }

    /// Advance one tick. Returns the new cursor when it moved.
    ///
    /// Reaching `duration` stops playback with the cursor held at
    /// `duration`.
    pub fn tick(&mut self, duration: f64) -> Option<f64> {
        if self.state != PlaybackState::Playing {
            return None;
        }

        let delta = match (self.mode, self.clock.as_mut()) {
            (PlaybackClockMode::WallClock, Some(clock)) => clock.lap_secs(),
            _ => self.step_secs,
        };

        let duration = duration.max(0.0);
        let next = self.cursor + delta;
        if next >= duration {
            self.cursor = duration;
            self.state = PlaybackState::Stopped;
            self.clock = None;
            tracing::debug!(cursor = self.cursor, "Playback reached end");
        } else {
            self.cursor = next;
        }
        Some(self.cursor)
    }
}

impl Default for PlaybackDriver {
    fn default() -> Self {
        Self::new(PlaybackClockMode::FixedStep, 30)
    }
}
