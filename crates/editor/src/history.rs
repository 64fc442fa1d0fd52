//! Undo/redo over whole-project snapshots.

use std::collections::VecDeque;

use cutframe_project_model::project::Project;

/// A snapshot taken before an edit, tagged with the edit's label.
#[derive(Debug, Clone)]
struct Entry {
    label: String,
    project: Project,
}

/// Bounded undo/redo stacks.
#[derive(Debug, Clone)]
pub struct EditHistory {
    undo: VecDeque<Entry>,
    redo: Vec<Entry>,
    limit: usize,
}

impl EditHistory {
    /// History keeping at most `limit` undo snapshots (0 disables undo).
    pub fn new(limit: usize) -> Self {
        Self {
            undo: VecDeque::new(),
            redo: Vec::new(),
            limit,
        }
    }

    pub fn limit(&self) -> usize {
        self.limit
    }

    /// Record the state before an edit. Clears the redo stack.
    pub fn record(&mut self, label: impl Into<String>, before: Project) {
        self.redo.clear();
        if self.limit == 0 {
            return;
        }
        self.undo.push_back(Entry {
            label: label.into(),
            project: before,
        });
        while self.undo.len() > self.limit {
            self.undo.pop_front();
        }
    }

    /// Step back: returns the previous state and stashes `current` for redo.
    pub fn undo(&mut self, current: Project) -> Option<Project> {
        let entry = self.undo.pop_back()?;
        self.redo.push(Entry {
            label: entry.label,
            project: current,
        });
        Some(entry.project)
    }

    /// Step forward again after an undo.
    pub fn redo(&mut self, current: Project) -> Option<Project> {
        let entry = self.redo.pop()?;
        self.undo.push_back(Entry {
            label: entry.label,
            project: current,
        });
        Some(entry.project)
    }

    pub fn can_undo(&self) -> bool {
        !self.undo.is_empty()
    }

    pub fn can_redo(&self) -> bool {
        !self.redo.is_empty()
    }

    /// Label of the edit `undo` would revert.
    pub fn undo_label(&self) -> Option<&str> {
        self.undo.back().map(|e| e.label.as_str())
    }

    /// Label of the edit `redo` would reapply.
    pub fn redo_label(&self) -> Option<&str> {
        self.redo.last().map(|e| e.label.as_str())
    }

    pub fn undo_len(&self) -> usize {
        self.undo.len()
    }

    pub fn redo_len(&self) -> usize {
        self.redo.len()
    }

    pub fn clear(&mut self) {
        self.undo.clear();
        self.redo.clear();
    }
}

impl Default for EditHistory {
    fn default() -> Self {
        Self::new(100)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn named(name: &str) -> Project {
        Project::new(name)
    }

    #[test]
    fn test_undo_redo_cycle() {
        let mut history = EditHistory::new(10);
        history.record("rename", named("v1"));
        let current = named("v2");

        assert_eq!(history.undo_label(), Some("rename"));
        let back = history.undo(current).unwrap();
        assert_eq!(back.name, "v1");
        assert!(history.can_redo());
        assert_eq!(history.redo_label(), Some("rename"));

        let forward = history.redo(back).unwrap();
        assert_eq!(forward.name, "v2");
        assert!(history.can_undo());
        assert!(!history.can_redo());
    }

    #[test]
    fn test_record_clears_redo() {
        let mut history = EditHistory::new(10);
        history.record("a", named("v1"));
        let back = history.undo(named("v2")).unwrap();
        history.record("b", back);
        assert!(!history.can_redo());
        assert_eq!(history.undo_len(), 1);
    }

    #[test]
    fn test_limit_drops_oldest() {
        let mut history = EditHistory::new(2);
        history.record("1", named("v1"));
        history.record("2", named("v2"));
        history.record("3", named("v3"));
        assert_eq!(history.undo_len(), 2);
        let back = history.undo(named("v4")).unwrap();
        assert_eq!(back.name, "v3");
        let back = history.undo(back).unwrap();
        assert_eq!(back.name, "v2");
        assert!(history.undo(back).is_none());
    }

    #[test]
    fn test_zero_limit_disables_undo() {
        let mut history = EditHistory::new(0);
        history.record("x", named("v1"));
        assert!(!history.can_undo());
        assert!(history.undo(named("v2")).is_none());
    }
}
