//! Composite a single frame to PNG.

use std::path::PathBuf;

use cutframe_common::clock::format_timecode;
use cutframe_common::config::AppConfig;
use cutframe_render_engine::{compute_composition, encode_png, render_composition};

pub async fn run(config: &AppConfig, id: &str, time: f64, output: PathBuf) -> anyhow::Result<()> {
    let time = frame_time(time)?;
    let project = super::load_project(config, id)?;

    let composition = compute_composition(&project, time);
    println!(
        "Rendering '{}' at {} ({} clips, {} overlays)",
        project.name,
        format_timecode(time, project.fps),
        composition.clips.len(),
        composition.overlays.len()
    );

    let frame = render_composition(&composition);
    let png = encode_png(&frame)?;
    tokio::fs::write(&output, &png).await?;

    println!("Wrote {} ({} bytes)", output.display(), png.len());
    Ok(())
}

/// Times past the last clip are valid: overlays may extend beyond it.
fn frame_time(time: f64) -> anyhow::Result<f64> {
    if !time.is_finite() || time < 0.0 {
        anyhow::bail!("Render time must be a non-negative number of seconds, got {time}");
    }
    Ok(time)
}
