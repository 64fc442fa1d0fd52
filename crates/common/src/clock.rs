//! Clock and timing utilities for playback.
//!
//! Playback can advance either by a fixed nominal frame interval per tick
//! or by real elapsed time. This module provides:
//! - A monotonic elapsed-time source anchored at playback start
//! - Tick gating at a target rate
//! - Timecode formatting for display

use std::time::Instant;

/// A monotonic clock measuring time since it was (re)started.
#[derive(Debug, Clone)]
pub struct PlaybackClock {
    /// The instant the clock was anchored.
    epoch: Instant,

    /// Instant of the last `lap` call.
    last_lap: Instant,
}

impl PlaybackClock {
    /// Create a new clock anchored to now.
    pub fn start() -> Self {
        let now = Instant::now();
        Self {
            epoch: now,
            last_lap: now,
        }
    }

    /// Seconds elapsed since the clock started.
    pub fn elapsed_secs(&self) -> f64 {
        self.epoch.elapsed().as_secs_f64()
    }

    /// Seconds elapsed since the previous lap (or since start).
    pub fn lap_secs(&mut self) -> f64 {
        let now = Instant::now();
        let lap = now.duration_since(self.last_lap).as_secs_f64();
        self.last_lap = now;
        lap
    }

    /// Convert seconds to nanoseconds.
    pub fn secs_to_ns(secs: f64) -> u64 {
        (secs * 1_000_000_000.0) as u64
    }
}

/// Tick rate controller.
#[derive(Debug)]
pub struct RateController {
    target_interval_ns: u64,
    last_tick_ns: Option<u64>,
}

impl RateController {
    /// Create a controller targeting the given Hz rate.
    pub fn new(target_hz: u32) -> Self {
        Self {
            target_interval_ns: 1_000_000_000 / target_hz.max(1) as u64,
            last_tick_ns: None,
        }
    }

    /// Check if enough time has passed for the next tick.
    /// Returns true and updates internal state if ready.
    /// The first call always returns true.
    pub fn should_tick(&mut self, current_ns: u64) -> bool {
        match self.last_tick_ns {
            None => {
                self.last_tick_ns = Some(current_ns);
                true
            }
            Some(last) if current_ns >= last + self.target_interval_ns => {
                self.last_tick_ns = Some(current_ns);
                true
            }
            _ => false,
        }
    }
}

/// Nominal frame interval for a rate, in seconds.
pub fn frame_interval_secs(hz: u32) -> f64 {
    1.0 / hz.max(1) as f64
}

/// Format seconds as `mm:ss:ff` where `ff` is the frame within the second.
pub fn format_timecode(secs: f64, fps: u32) -> String {
    let secs = if secs.is_finite() { secs.max(0.0) } else { 0.0 };
    let mins = (secs / 60.0).floor() as u64;
    let whole = (secs % 60.0).floor() as u64;
    let frames = ((secs % 1.0) * fps as f64).floor() as u64;
    format!("{mins:02}:{whole:02}:{frames:02}")
}

/// Format seconds as `mm:ss`.
pub fn format_minutes_seconds(secs: f64) -> String {
    let secs = if secs.is_finite() { secs.max(0.0) } else { 0.0 };
    let mins = (secs / 60.0).floor() as u64;
    let whole = (secs % 60.0).floor() as u64;
    format!("{mins:02}:{whole:02}")
}
