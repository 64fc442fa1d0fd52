//! Export a project.

use std::io::Write;
use std::path::PathBuf;

use cutframe_common::config::AppConfig;
use cutframe_render_engine::export::{
    export_project, ExportFormat, ExportJob, ExportPreset, ExportProgress, ExportQuality,
    ExportSettings, ProgressCallback,
};

pub async fn run(
    config: &AppConfig,
    id: &str,
    output: PathBuf,
    format: &str,
    quality: &str,
    preset: &str,
    estimate_only: bool,
) -> anyhow::Result<()> {
    let settings = ExportSettings {
        format: format.parse::<ExportFormat>().map_err(|e| anyhow::anyhow!(e))?,
        quality: quality.parse::<ExportQuality>().map_err(|e| anyhow::anyhow!(e))?,
        preset: preset.parse::<ExportPreset>().map_err(|e| anyhow::anyhow!(e))?,
    };

    let project = super::load_project(config, id)?;
    println!("Exporting project '{}'", project.name);

    let job = ExportJob::new(project, output, settings);
    let estimate = job.estimate();
    println!("  Output: {}", job.output_path().display());
    println!("  Format: {}", settings.format);
    println!(
        "  Quality: {} ({}, {} Mbps)",
        settings.quality,
        settings.quality.resolution_label(),
        settings.quality.bitrate_mbps()
    );
    println!("  Preset: {} ({})", settings.preset, settings.preset.description());
    println!("  Estimated size: ~{} MB", estimate.size_mb);
    println!("  Estimated time: ~{}s", estimate.processing_secs);

    if estimate_only {
        return Ok(());
    }

    let progress_cb: ProgressCallback = Box::new(|p: ExportProgress| {
        print!(
            "\r  Progress: {:.1}% ({}/{} frames, {:?})  ",
            p.progress * 100.0,
            p.frames_rendered,
            p.total_frames,
            p.stage,
        );
        std::io::stdout().flush().ok();
    });

    match export_project(job, Some(progress_cb)).await {
        Ok(artifact) => {
            println!("\nExport complete: {}", artifact.path.display());
            println!("{}", artifact.to_json()?);
            Ok(())
        }
        Err(e) => {
            println!("\nExport failed: {e}");
            Err(e.into())
        }
    }
}
