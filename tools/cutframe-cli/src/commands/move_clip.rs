//! Move a clip to a new position.

use cutframe_common::config::AppConfig;
use cutframe_project_model::Edit;

pub fn run(
    config: &AppConfig,
    id: &str,
    clip_id: String,
    start: f64,
    track: usize,
) -> anyhow::Result<()> {
    if track >= config.timeline.track_count {
        return Err(anyhow::anyhow!(
            "Track {track} out of range (0..{})",
            config.timeline.track_count
        ));
    }

    let mut session = super::open_session(config, id)?;
    session.apply(Edit::MoveClip {
        clip_id: clip_id.clone(),
        start_time: start.max(0.0),
        track,
    })?;
    let project = super::finish(session)?;

    println!(
        "Moved {clip_id} to {:.2}s on track {track} (duration {:.2}s)",
        start.max(0.0),
        project.duration
    );
    Ok(())
}
