//! Key/value persistence of project snapshots.
//!
//! Each project is stored as one JSON document under the key
//! `video_project_<id>`. Two backends are provided: an in-memory map and a
//! directory with one `<key>.json` file per key.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use crate::project::{storage_key, Project, ProjectError, PROJECT_KEY_PREFIX};

/// Errors raised by store backends.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("I/O error at {path}: {source}")]
    IoError {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Invalid store key: {key:?}")]
    InvalidKey { key: String },

    #[error("Corrupt entry {key}: {source}")]
    Corrupt { key: String, source: ProjectError },

    #[error("Serialization failed for {key}: {source}")]
    Serialize { key: String, source: ProjectError },

    #[error("Store unavailable: {message}")]
    Unavailable { message: String },
}

/// A string key/value store.
pub trait KeyValueStore {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError>;

    fn set(&mut self, key: &str, value: &str) -> Result<(), StoreError>;

    /// Remove a key. Returns whether it existed.
    fn remove(&mut self, key: &str) -> Result<bool, StoreError>;

    /// All keys, sorted.
    fn keys(&self) -> Result<Vec<String>, StoreError>;
}

impl<S: KeyValueStore + ?Sized> KeyValueStore for Box<S> {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        (**self).get(key)
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), StoreError> {
        (**self).set(key, value)
    }

    fn remove(&mut self, key: &str) -> Result<bool, StoreError> {
        (**self).remove(key)
    }

    fn keys(&self) -> Result<Vec<String>, StoreError> {
        (**self).keys()
    }
}

/// In-memory backend.
#[derive(Debug, Default, Clone)]
pub struct MemoryStore {
    entries: BTreeMap<String, String>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        Ok(self.entries.get(key).cloned())
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), StoreError> {
        self.entries.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&mut self, key: &str) -> Result<bool, StoreError> {
        Ok(self.entries.remove(key).is_some())
    }

    fn keys(&self) -> Result<Vec<String>, StoreError> {
        Ok(self.entries.keys().cloned().collect())
    }
}

/// Directory backend: one `<key>.json` file per key.
#[derive(Debug, Clone)]
pub struct FileStore {
    root: PathBuf,
}

impl FileStore {
    /// Open (and create if needed) a store rooted at `root`.
    pub fn open(root: impl AsRef<Path>) -> Result<Self, StoreError> {
        let root = root.as_ref().to_path_buf();
        std::fs::create_dir_all(&root).map_err(|e| StoreError::IoError {
            path: root.clone(),
            source: e,
        })?;
        Ok(Self { root })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn path_for(&self, key: &str) -> Result<PathBuf, StoreError> {
        let valid = !key.is_empty()
            && key
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-');
        if !valid {
            return Err(StoreError::InvalidKey {
                key: key.to_string(),
            });
        }
        Ok(self.root.join(format!("{key}.json")))
    }
}

impl KeyValueStore for FileStore {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        let path = self.path_for(key)?;
        match std::fs::read_to_string(&path) {
            Ok(content) => Ok(Some(content)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(StoreError::IoError { path, source: e }),
        }
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), StoreError> {
        let path = self.path_for(key)?;
        // Entries are replaced atomically via a sibling temp file.
        let tmp = path.with_extension("json.tmp");
        std::fs::write(&tmp, value).map_err(|e| StoreError::IoError {
            path: tmp.clone(),
            source: e,
        })?;
        std::fs::rename(&tmp, &path).map_err(|e| StoreError::IoError { path, source: e })
    }

    fn remove(&mut self, key: &str) -> Result<bool, StoreError> {
        let path = self.path_for(key)?;
        match std::fs::remove_file(&path) {
            Ok(()) => Ok(true),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(false),
            Err(e) => Err(StoreError::IoError { path, source: e }),
        }
    }

    fn keys(&self) -> Result<Vec<String>, StoreError> {
        let entries = std::fs::read_dir(&self.root).map_err(|e| StoreError::IoError {
            path: self.root.clone(),
            source: e,
        })?;

        let mut keys = vec![];
        for entry in entries {
            let entry = entry.map_err(|e| StoreError::IoError {
                path: self.root.clone(),
                source: e,
            })?;
            let name = entry.file_name();
            let Some(name) = name.to_str() else {
                continue;
            };
            if let Some(key) = name.strip_suffix(".json") {
                keys.push(key.to_string());
            }
        }
        keys.sort();
        Ok(keys)
    }
}

/// Summary row for project listings.
#[derive(Debug, Clone, PartialEq)]
pub struct ProjectSummary {
    pub id: String,
    pub name: String,
    pub duration: f64,
    pub clip_count: usize,
    pub updated_at: chrono::DateTime<chrono::Utc>,
}

/// Project persistence on top of any key/value backend.
#[derive(Debug)]
pub struct ProjectStore<S> {
    backend: S,
}

impl<S: KeyValueStore> ProjectStore<S> {
    pub fn new(backend: S) -> Self {
        Self { backend }
    }

    pub fn backend(&self) -> &S {
        &self.backend
    }

    pub fn backend_mut(&mut self) -> &mut S {
        &mut self.backend
    }

    pub fn into_inner(self) -> S {
        self.backend
    }

    /// Write a snapshot of `project` under its key.
    pub fn save(&mut self, project: &Project) -> Result<(), StoreError> {
        let key = project.storage_key();
        let json = project
            .to_json()
            .map_err(|source| StoreError::Serialize {
                key: key.clone(),
                source,
            })?;
        self.backend.set(&key, &json)?;
        tracing::debug!(project_id = %project.id, bytes = json.len(), "Saved project snapshot");
        Ok(())
    }

    /// Load a project by id; `Ok(None)` when absent.
    pub fn load(&self, project_id: &str) -> Result<Option<Project>, StoreError> {
        let key = storage_key(project_id);
        let Some(json) = self.backend.get(&key)? else {
            return Ok(None);
        };
        Project::from_json(&json)
            .map(Some)
            .map_err(|source| StoreError::Corrupt { key, source })
    }

    /// Delete a project. Returns whether it existed.
    pub fn delete(&mut self, project_id: &str) -> Result<bool, StoreError> {
        self.backend.remove(&storage_key(project_id))
    }

    /// Ids of all stored projects.
    pub fn project_ids(&self) -> Result<Vec<String>, StoreError> {
        Ok(self
            .backend
            .keys()?
            .into_iter()
            .filter_map(|k| k.strip_prefix(PROJECT_KEY_PREFIX).map(str::to_string))
            .collect())
    }

    /// Summaries of all readable projects, newest first.
    ///
    /// Entries that fail to parse are skipped with a warning.
    pub fn list(&self) -> Result<Vec<ProjectSummary>, StoreError> {
        let mut summaries = vec![];
        for id in self.project_ids()? {
            match self.load(&id) {
                Ok(Some(project)) => summaries.push(ProjectSummary {
                    id: project.id,
                    name: project.name,
                    duration: project.duration,
                    clip_count: project.clips.len(),
                    updated_at: project.updated_at,
                }),
                Ok(None) => {}
                Err(e) => {
                    tracing::warn!(project_id = %id, error = %e, "Skipping unreadable project")
                }
            }
        }
        summaries.sort_by(|a, b| b.updated_at.cmp(&a.updated_at));
        Ok(summaries)
    }
}
