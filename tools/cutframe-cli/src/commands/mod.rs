pub mod delete;
pub mod drag;
pub mod effect;
pub mod export;
pub mod import;
pub mod info;
pub mod init;
pub mod list;
pub mod move_clip;
pub mod play;
pub mod render;
pub mod text;

use cutframe_common::config::AppConfig;
use cutframe_editor::EditorSession;
use cutframe_project_model::{FileStore, Project, ProjectStore};

/// Open the configured project store.
pub fn open_store(config: &AppConfig) -> anyhow::Result<ProjectStore<FileStore>> {
    tracing::debug!(dir = %config.store_dir.display(), "Opening project store");
    let backend = FileStore::open(&config.store_dir)
        .map_err(|e| anyhow::anyhow!("Failed to open store: {e}"))?;
    Ok(ProjectStore::new(backend))
}

/// Load a project by id.
pub fn load_project(config: &AppConfig, id: &str) -> anyhow::Result<Project> {
    open_store(config)?
        .load(id)?
        .ok_or_else(|| anyhow::anyhow!("Project not found: {id}"))
}

/// Start an editing session on a stored project.
pub fn open_session(config: &AppConfig, id: &str) -> anyhow::Result<EditorSession> {
    let store = open_store(config)?.into_inner();
    Ok(EditorSession::open(id, Box::new(store), config)?)
}

/// Close a session, failing if the final state did not reach the store.
///
/// `close` only logs store failures, so save explicitly first to surface them.
pub fn finish(mut session: EditorSession) -> anyhow::Result<Project> {
    session
        .save()
        .map_err(|e| anyhow::anyhow!("Failed to save project: {e}"))?;
    Ok(session.close())
}
