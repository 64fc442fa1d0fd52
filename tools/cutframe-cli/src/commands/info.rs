//! Show project information.

use cutframe_common::clock::format_timecode;
use cutframe_common::config::AppConfig;

pub fn run(config: &AppConfig, id: &str) -> anyhow::Result<()> {
    let p = super::load_project(config, id)?;
    let tc = |secs: f64| format_timecode(secs, p.fps);

    println!("Project: {}", p.name);
    println!("  ID: {}", p.id);
    println!("  Created: {}", p.created_at);
    println!("  Modified: {}", p.updated_at);
    println!("  Canvas: {}x{} @ {}fps", p.width, p.height, p.fps);
    println!("  Duration: {}", tc(p.duration));
    println!();

    println!("Clips ({}):", p.clips.len());
    for clip in p.clips_in_draw_order() {
        println!(
            "  [{}] {} {} '{}' {} - {}",
            clip.track,
            clip.id,
            clip.kind,
            clip.name,
            tc(clip.start_time),
            tc(clip.end_time()),
        );
        for effect in &clip.effects {
            println!("      {} {:.0}", effect.kind, effect.intensity);
        }
    }
    println!();

    println!("Text overlays ({}):", p.text_overlays.len());
    for overlay in &p.text_overlays {
        println!(
            "  {} '{}' {} - {} ({})",
            overlay.id,
            overlay.text,
            tc(overlay.start_time),
            tc(overlay.end_time()),
            overlay.animation,
        );
    }
    println!();

    println!("Audio tracks ({}):", p.audio_tracks.len());
    for track in &p.audio_tracks {
        println!("  {} '{}' {:.1}s", track.id, track.name, track.duration);
    }

    let problems = p.validate();
    if !problems.is_empty() {
        println!();
        println!("Warnings:");
        for problem in &problems {
            println!("  - {problem}");
        }
    }

    Ok(())
}
