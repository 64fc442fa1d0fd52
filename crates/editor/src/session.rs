//! Editing session management.
//!
//! An [`EditorSession`] owns one project together with its history,
//! timeline interaction state, playback driver and the store it autosaves
//! to. Every committed edit replaces the project value, records an undo
//! snapshot and triggers an autosave. Autosave failures are logged and
//! never surface to the caller; the edit stays in memory.

use cutframe_common::config::AppConfig;
use cutframe_project_model::clip::Clip;
use cutframe_project_model::edit::Edit;
use cutframe_project_model::project::Project;
use cutframe_project_model::store::{KeyValueStore, ProjectStore, StoreError};
use cutframe_render_engine::compositor::{render_frame, Frame};
use cutframe_timeline::gesture::PointerEvent;
use cutframe_timeline::interaction::{TimelineAction, TimelineInteraction};
use cutframe_timeline::playback::{PlaybackDriver, PlaybackState};
use cutframe_timeline::scale::TimelineScale;

use crate::error::{EditorError, EditorResult};
use crate::history::EditHistory;
use crate::media::{import_audio_track, import_media, MediaProbe, MediaSource};

/// Store backend used by sessions.
pub type DynStore = Box<dyn KeyValueStore + Send>;

/// A single-owner editing session over one project.
pub struct EditorSession {
    project: Project,
    store: ProjectStore<DynStore>,
    history: EditHistory,
    timeline: TimelineInteraction,
    playback: PlaybackDriver,
    autosave: bool,
    preview: Option<Frame>,
    /// Project value when the current drag started.
    drag_origin: Option<Project>,
}

impl EditorSession {
    /// Start a session on `project`, persisting to `store`.
    pub fn new(project: Project, store: DynStore, config: &AppConfig) -> EditorResult<Self> {
        let scale = TimelineScale::from_defaults(&config.timeline)?;
        tracing::info!(
            project_id = %project.id,
            name = %project.name,
            clips = project.clips.len(),
            "Editor session opened"
        );
        Ok(Self {
            project,
            store: ProjectStore::new(store),
            history: EditHistory::new(config.editor.history_limit),
            timeline: TimelineInteraction::new(scale),
            playback: PlaybackDriver::from_defaults(&config.playback),
            autosave: config.editor.autosave,
            preview: None,
            drag_origin: None,
        })
    }

    /// Load project `id` from `store` and start a session on it.
    pub fn open(id: &str, store: DynStore, config: &AppConfig) -> EditorResult<Self> {
        let store = ProjectStore::new(store);
        let project = store
            .load(id)?
            .ok_or_else(|| EditorError::ProjectNotFound { id: id.to_string() })?;
        Self::new(project, store.into_inner(), config)
    }

    pub fn project(&self) -> &Project {
        &self.project
    }

    pub fn history(&self) -> &EditHistory {
        &self.history
    }

    pub fn timeline(&self) -> &TimelineInteraction {
        &self.timeline
    }

    pub fn timeline_mut(&mut self) -> &mut TimelineInteraction {
        &mut self.timeline
    }

    pub fn playback(&self) -> &PlaybackDriver {
        &self.playback
    }

    pub fn store(&self) -> &ProjectStore<DynStore> {
        &self.store
    }

    /// Playback cursor in seconds.
    pub fn cursor(&self) -> f64 {
        self.playback.cursor()
    }

    /// Last frame composited after a cursor change.
    pub fn preview(&self) -> Option<&Frame> {
        self.preview.as_ref()
    }

    /// Composite the frame at the current cursor.
    pub fn render_current(&self) -> Frame {
        render_frame(&self.project, self.cursor())
    }

    /// Apply an edit, recording it for undo and autosaving.
    pub fn apply(&mut self, edit: Edit) -> EditorResult<()> {
        let next = edit.apply(&self.project)?;
        tracing::debug!(op = edit.label(), "Applied edit");
        let before = std::mem::replace(&mut self.project, next);
        self.history.record(edit.label(), before);
        self.after_change();
        Ok(())
    }

    /// Import `source` and place it at `(track, start_time)`. Returns the
    /// new clip id.
    pub fn import(
        &mut self,
        probe: &dyn MediaProbe,
        source: &MediaSource,
        track: usize,
        start_time: f64,
    ) -> EditorResult<String> {
        let clip: Clip = import_media(probe, source)?;
        let id = clip.id.clone();
        self.apply(Edit::AddClip {
            clip,
            track,
            start_time,
        })?;
        Ok(id)
    }

    /// Import `source` onto `track` starting where the timeline currently
    /// ends, so repeated imports play back to back.
    pub fn import_at_end(
        &mut self,
        probe: &dyn MediaProbe,
        source: &MediaSource,
        track: usize,
    ) -> EditorResult<String> {
        let start_time = self.project.duration;
        self.import(probe, source, track, start_time)
    }

    /// Import `source` as a standalone audio track. Returns its id.
    pub fn import_audio(
        &mut self,
        probe: &dyn MediaProbe,
        source: &MediaSource,
    ) -> EditorResult<String> {
        let track = import_audio_track(probe, source)?;
        let id = track.id.clone();
        self.apply(Edit::AddAudioTrack { track })?;
        Ok(id)
    }

    /// Revert the last edit. Returns whether anything changed.
    pub fn undo(&mut self) -> bool {
        let Some(previous) = self.history.undo(self.project.clone()) else {
            return false;
        };
        self.project = previous;
        self.after_change();
        true
    }

    /// Reapply the last undone edit. Returns whether anything changed.
    pub fn redo(&mut self) -> bool {
        let Some(next) = self.history.redo(self.project.clone()) else {
            return false;
        };
        self.project = next;
        self.after_change();
        true
    }

    /// Feed one pointer event to the timeline.
    ///
    /// Drag moves commit immediately. A whole drag is one undo step.
    pub fn pointer(&mut self, event: &PointerEvent) -> EditorResult<TimelineAction> {
        let action = self.timeline.handle(&self.project, event)?;
        match &action {
            TimelineAction::Select { .. } => {
                // A press without a release still closes the previous drag.
                self.commit_drag();
                self.drag_origin = Some(self.project.clone());
            }
            TimelineAction::MoveClip { project, .. } => {
                self.project = (**project).clone();
                self.autosave_now();
                self.clamp_cursor();
            }
            TimelineAction::Release { .. } => self.commit_drag(),
            TimelineAction::Seek { time } => {
                self.seek(*time);
            }
            TimelineAction::None | TimelineAction::Zoom { .. } => {}
        }
        Ok(action)
    }

    pub fn play(&mut self) {
        self.playback.play();
    }

    pub fn pause(&mut self) {
        self.playback.pause();
    }

    /// Stop and rewind to 0.
    pub fn stop(&mut self) {
        let moved = self.playback.cursor() != 0.0;
        self.playback.stop();
        if moved {
            self.refresh_preview();
        }
    }

    pub fn is_playing(&self) -> bool {
        self.playback.state() == PlaybackState::Playing
    }

    /// Move the cursor, clamped to `[0, duration]`.
    pub fn seek(&mut self, time: f64) -> f64 {
        let cursor = self.playback.seek(time, self.project.duration);
        self.refresh_preview();
        cursor
    }

    /// Advance playback one tick, compositing the new frame.
    pub fn tick(&mut self) -> Option<f64> {
        let cursor = self.playback.tick(self.project.duration)?;
        self.refresh_preview();
        Some(cursor)
    }

    /// Persist the project now, returning any store error.
    pub fn save(&mut self) -> Result<(), StoreError> {
        self.store.save(&self.project)
    }

    /// Final save, then hand back the project. Runs whether or not
    /// autosave is enabled.
    pub fn close(mut self) -> Project {
        self.playback.stop();
        self.save_now();
        tracing::info!(project_id = %self.project.id, "Editor session closed");
        self.project
    }

    fn commit_drag(&mut self) {
        if let Some(origin) = self.drag_origin.take() {
            if origin.clips != self.project.clips {
                self.history.record("move clip", origin);
            }
        }
    }

    fn after_change(&mut self) {
        self.timeline.reconcile(&self.project);
        self.autosave_now();
        self.clamp_cursor();
    }

    fn clamp_cursor(&mut self) {
        let cursor = self.playback.cursor();
        if cursor > self.project.duration {
            self.playback.seek(cursor, self.project.duration);
        }
        self.refresh_preview();
    }

    fn autosave_now(&mut self) {
        if self.autosave {
            self.save_now();
        }
    }

    fn save_now(&mut self) {
        if let Err(e) = self.store.save(&self.project) {
            tracing::warn!(
                project_id = %self.project.id,
                error = %e,
                "Save failed; keeping changes in memory"
            );
        }
    }

    fn refresh_preview(&mut self) {
        self.preview = Some(render_frame(&self.project, self.playback.cursor()));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cutframe_project_model::clip::MediaKind;
    use cutframe_project_model::store::{FileStore, MemoryStore};

    fn session() -> EditorSession {
        let project = Project::with_canvas("unit", 32, 18, 30);
        EditorSession::new(project, Box::new(MemoryStore::new()), &AppConfig::default()).unwrap()
    }

    fn add_video(session: &mut EditorSession, duration: f64) -> String {
        let clip = Clip::new("v", MediaKind::Video, "v.mp4", duration);
        let id = clip.id.clone();
        session
            .apply(Edit::AddClip {
                clip,
                track: 0,
                start_time: 0.0,
            })
            .unwrap();
        id
    }

    #[test]
    fn test_apply_autosaves() {
        let mut s = session();
        add_video(&mut s, 4.0);
        let stored = s.store().load(&s.project().id).unwrap().unwrap();
        assert_eq!(stored.clips.len(), 1);
        assert_eq!(stored.duration, 4.0);
    }

    #[test]
    fn test_missing_clip_edit_is_an_error() {
        let mut s = session();
        let err = s
            .apply(Edit::RemoveClip {
                clip_id: "nope".to_string(),
            })
            .unwrap_err();
        assert!(matches!(err, EditorError::Edit(_)));
        assert!(!s.history().can_undo());
    }

    #[test]
    fn test_undo_redo_restore_project() {
        let mut s = session();
        let id = add_video(&mut s, 4.0);
        s.apply(Edit::MoveClip {
            clip_id: id.clone(),
            start_time: 6.0,
            track: 1,
        })
        .unwrap();
        assert_eq!(s.project().duration, 10.0);

        assert!(s.undo());
        assert_eq!(s.project().duration, 4.0);
        assert!(s.redo());
        assert_eq!(s.project().clip(&id).unwrap().track, 1);
        assert!(!s.redo());
    }

    #[test]
    fn test_cursor_clamps_when_timeline_shrinks() {
        let mut s = session();
        let id = add_video(&mut s, 8.0);
        s.seek(7.0);
        s.apply(Edit::RemoveClip { clip_id: id }).unwrap();
        assert_eq!(s.cursor(), 0.0);
    }

    #[test]
    fn test_drag_is_one_undo_step() {
        let mut s = session();
        let id = add_video(&mut s, 4.0);
        let before = s.history().undo_len();

        s.pointer(&PointerEvent::down(10.0, 30.0)).unwrap();
        s.pointer(&PointerEvent::moved(60.0, 90.0)).unwrap();
        s.pointer(&PointerEvent::moved(110.0, 150.0)).unwrap();
        s.pointer(&PointerEvent::up(110.0, 150.0)).unwrap();

        let clip = s.project().clip(&id).unwrap();
        assert_eq!(clip.track, 2);
        assert!((clip.start_time - 2.2).abs() < 1e-9);
        assert_eq!(s.history().undo_len(), before + 1);

        assert!(s.undo());
        assert_eq!(s.project().clip(&id).unwrap().track, 0);
    }

    #[test]
    fn test_click_seeks_and_renders_preview() {
        let mut s = session();
        add_video(&mut s, 4.0);
        let action = s.pointer(&PointerEvent::down(100.0, 300.0)).unwrap();
        assert_eq!(action, TimelineAction::Seek { time: 2.0 });
        assert_eq!(s.cursor(), 2.0);
        let preview = s.preview().unwrap();
        assert_eq!(preview.get_pixel(0, 0).0, [0x33, 0x33, 0x33, 255]);
    }

    #[test]
    fn test_close_saves_with_autosave_off() {
        let dir = std::env::temp_dir().join(format!("cutframe_close_{}", std::process::id()));
        let mut config = AppConfig::default();
        config.editor.autosave = false;

        let store = FileStore::open(&dir).unwrap();
        let project = Project::with_canvas("closing", 8, 8, 30);
        let id = project.id.clone();
        let mut s = EditorSession::new(project, Box::new(store), &config).unwrap();
        add_video(&mut s, 1.0);
        assert!(s.store().load(&id).unwrap().is_none());
        s.close();

        let backend = FileStore::open(&dir).unwrap();
        let reopened = EditorSession::open(&id, Box::new(backend), &config).unwrap();
        assert_eq!(reopened.project().clips.len(), 1);
        let _ = std::fs::remove_dir_all(&dir);
    }

    #[test]
    fn test_open_missing_project() {
        let result = EditorSession::open(
            "missing",
            Box::new(MemoryStore::new()),
            &AppConfig::default(),
        );
        assert!(matches!(result, Err(EditorError::ProjectNotFound { .. })));
    }
}
