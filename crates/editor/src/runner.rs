//! Periodic playback loop.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use cutframe_render_engine::compositor::Frame;

use crate::session::EditorSession;

/// Result of one [`PlaybackRunner::run`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PlaybackSummary {
    /// Ticks that advanced the cursor.
    pub ticks: u64,
    pub final_cursor: f64,
    /// Whether the loop ended because the stop flag was raised.
    pub interrupted: bool,
}

/// Drives a session's playback on a tokio interval until it stops.
pub struct PlaybackRunner {
    stop_flag: Arc<AtomicBool>,
}

impl PlaybackRunner {
    pub fn new() -> Self {
        Self {
            stop_flag: Arc::new(AtomicBool::new(false)),
        }
    }

    /// Play `session` from its current cursor, calling `on_frame` with the
    /// cursor and composited frame after every tick.
    ///
    /// Returns when playback reaches the end, is paused or stopped through
    /// the session, or the stop flag is raised. Raising the stop flag pauses
    /// the session. A flag raised before `run` is honoured on the first tick.
    pub async fn run<F>(&self, session: &mut EditorSession, mut on_frame: F) -> PlaybackSummary
    where
        F: FnMut(f64, &Frame),
    {
        session.play();

        let period = Duration::from_secs_f64(session.playback().step_secs());
        let mut interval = tokio::time::interval(period);
        interval.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);
        // The first tick of a tokio interval completes immediately.
        interval.tick().await;

        tracing::info!(
            project_id = %session.project().id,
            cursor = session.cursor(),
            period_ms = period.as_millis() as u64,
            "Playback loop started"
        );

        let mut ticks = 0u64;
        let mut interrupted = false;
        loop {
            interval.tick().await;

            if self.stop_flag.load(Ordering::Relaxed) {
                session.pause();
                interrupted = true;
                break;
            }

            if let Some(cursor) = session.tick() {
                ticks += 1;
                if let Some(frame) = session.preview() {
                    on_frame(cursor, frame);
                }
            }

            if !session.is_playing() {
                break;
            }
        }

        let summary = PlaybackSummary {
            ticks,
            final_cursor: session.cursor(),
            interrupted,
        };
        tracing::info!(
            ticks = summary.ticks,
            cursor = summary.final_cursor,
            interrupted,
            "Playback loop finished"
        );
        summary
    }

    /// Ask a running loop to pause and return.
    pub fn stop(&self) {
        self.stop_flag.store(true, Ordering::SeqCst);
    }

    /// Get the stop flag for external coordination.
    pub fn stop_flag(&self) -> Arc<AtomicBool> {
        self.stop_flag.clone()
    }
}

impl Default for PlaybackRunner {
    fn default() -> Self {
        Self::new()
    }
}
