//! Run the playback loop against a stored project.

use std::io::Write;
use std::sync::atomic::Ordering;

use cutframe_common::clock::{format_timecode, PlaybackClock, RateController};
use cutframe_common::config::AppConfig;
use cutframe_editor::PlaybackRunner;

/// Status line refresh rate.
const STATUS_HZ: u32 = 10;

pub async fn run(
    mut config: AppConfig,
    id: &str,
    from: f64,
    tick_hz: Option<u32>,
) -> anyhow::Result<()> {
    if let Some(hz) = tick_hz {
        config.playback.tick_hz = hz.max(1);
    }
    // Playback never edits the project.
    config.editor.autosave = false;

    let mut session = super::open_session(&config, id)?;
    let fps = session.project().fps;
    let duration = session.project().duration;
    session.seek(from);

    println!(
        "Playing '{}' from {} to {} (Ctrl+C to stop)",
        session.project().name,
        format_timecode(session.cursor(), fps),
        format_timecode(duration, fps)
    );

    let runner = PlaybackRunner::new();
    let flag = runner.stop_flag();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            flag.store(true, Ordering::SeqCst);
        }
    });

    let clock = PlaybackClock::start();
    let mut status = RateController::new(STATUS_HZ);
    let summary = runner
        .run(&mut session, |cursor, frame| {
            let now_ns = PlaybackClock::secs_to_ns(clock.elapsed_secs());
            if status.should_tick(now_ns) || cursor >= duration {
                print!(
                    "\r  {} / {}  [{}x{}]  ",
                    format_timecode(cursor, fps),
                    format_timecode(duration, fps),
                    frame.width(),
                    frame.height()
                );
                std::io::stdout().flush().ok();
            }
        })
        .await;

    println!();
    if summary.interrupted {
        println!("Paused at {}", format_timecode(summary.final_cursor, fps));
    } else {
        println!(
            "Finished: {} ticks in {:.2}s",
            summary.ticks,
            clock.elapsed_secs()
        );
    }
    Ok(())
}
