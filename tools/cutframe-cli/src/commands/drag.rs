//! Replay a pointer-gesture script through the timeline.

use std::path::PathBuf;

use cutframe_common::config::AppConfig;
use cutframe_project_model::Project;
use cutframe_timeline::{
    parse_gestures, replay_gestures, TimelineAction, TimelineInteraction, TimelineScale,
};

pub fn run(config: &AppConfig, id: &str, script: PathBuf, dry_run: bool) -> anyhow::Result<()> {
    let content = std::fs::read_to_string(&script)
        .map_err(|e| anyhow::anyhow!("Failed to read {}: {e}", script.display()))?;
    let events = parse_gestures(&content)
        .map_err(|e| anyhow::anyhow!("Invalid gesture script: {e}"))?;
    println!("Replaying {} pointer events", events.len());

    if dry_run {
        let project = super::load_project(config, id)?;
        let mut interaction =
            TimelineInteraction::new(TimelineScale::from_defaults(&config.timeline)?);
        let (result, seek) = replay_gestures(&mut interaction, &project, &events)?;
        print_changes(&project, &result);
        if let Some(time) = seek {
            println!("  Playhead -> {time:.2}s");
        }
        println!("Dry run: nothing saved");
        return Ok(());
    }

    let mut session = super::open_session(config, id)?;
    let before = session.project().clone();
    for event in &events {
        match session.pointer(event)? {
            TimelineAction::Select { clip_id } => println!("  Picked up {clip_id}"),
            TimelineAction::Release { clip_id } => println!("  Dropped {clip_id}"),
            TimelineAction::Seek { time } => println!("  Playhead -> {time:.2}s"),
            TimelineAction::Zoom { zoom } => println!("  Zoom {zoom:.2}x"),
            TimelineAction::MoveClip { .. } | TimelineAction::None => {}
        }
    }
    let after = super::finish(session)?;
    print_changes(&before, &after);
    Ok(())
}

fn print_changes(before: &Project, after: &Project) {
    for clip in &after.clips {
        let Some(old) = before.clip(&clip.id) else {
            continue;
        };
        if old.start_time != clip.start_time || old.track != clip.track {
            println!(
                "  {} '{}': {:.2}s/track {} -> {:.2}s/track {}",
                clip.id, clip.name, old.start_time, old.track, clip.start_time, clip.track
            );
        }
    }
    println!("Duration: {:.2}s -> {:.2}s", before.duration, after.duration);
}
