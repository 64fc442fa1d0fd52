//! Create a new Cutframe project.

use cutframe_common::config::AppConfig;
use cutframe_project_model::Project;

pub fn run(
    config: &AppConfig,
    name: String,
    width: Option<u32>,
    height: Option<u32>,
    fps: Option<u32>,
) -> anyhow::Result<()> {
    let defaults = &config.editor;
    let project = Project::with_canvas(
        name,
        width.unwrap_or(defaults.width),
        height.unwrap_or(defaults.height),
        fps.unwrap_or(defaults.fps),
    );

    let mut store = super::open_store(config)?;
    store
        .save(&project)
        .map_err(|e| anyhow::anyhow!("Failed to create project: {e}"))?;

    println!("Project created successfully:");
    println!("  ID: {}", project.id);
    println!("  Name: {}", project.name);
    println!(
        "  Canvas: {}x{} @ {}fps",
        project.width, project.height, project.fps
    );
    println!("  Store: {}", config.store_dir.display());

    Ok(())
}
