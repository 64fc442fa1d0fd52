//! Delete a project from the store.

use cutframe_common::config::AppConfig;

pub fn run(config: &AppConfig, id: &str) -> anyhow::Result<()> {
    let mut store = super::open_store(config)?;
    if store.delete(id)? {
        println!("Deleted project {id}");
        Ok(())
    } else {
        Err(anyhow::anyhow!("Project not found: {id}"))
    }
}
