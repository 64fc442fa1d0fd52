//! List stored projects.

use cutframe_common::clock::format_minutes_seconds;
use cutframe_common::config::AppConfig;

pub fn run(config: &AppConfig, json: bool) -> anyhow::Result<()> {
    let store = super::open_store(config)?;
    let projects = store.list()?;

    if json {
        let rows: Vec<_> = projects
            .iter()
            .map(|p| {
                serde_json::json!({
                    "id": p.id,
                    "name": p.name,
                    "duration": p.duration,
                    "clips": p.clip_count,
                    "updated_at": p.updated_at.to_rfc3339(),
                })
            })
            .collect();
        println!("{}", serde_json::to_string_pretty(&rows)?);
        return Ok(());
    }

    if projects.is_empty() {
        println!("No projects in {}", config.store_dir.display());
        return Ok(());
    }

    for p in &projects {
        println!(
            "{}  {:<24} {:>6}  {} clips  (updated {})",
            p.id,
            p.name,
            format_minutes_seconds(p.duration),
            p.clip_count,
            p.updated_at.format("%Y-%m-%d %H:%M"),
        );
    }

    Ok(())
}
