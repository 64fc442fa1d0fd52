//! Drag placement state machine.
//!
//! Pointer down over a clip starts a drag. Every pointer move while
//! dragging relocates the clip immediately to `(max(0, time), track)` as
//! long as the track under the pointer is in range. Pointer up always
//! returns to idle. Pointer down on empty space seeks instead.

use cutframe_project_model::edit::{move_clip, EditError};
use cutframe_project_model::project::Project;

use crate::gesture::PointerEvent;
use crate::scale::TimelineScale;

/// Drag state.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum DragState {
    #[default]
    Idle,
    Dragging {
        clip_id: String,
    },
}

/// Outcome of feeding one pointer event to the timeline.
#[derive(Debug, Clone, PartialEq)]
pub enum TimelineAction {
    /// Nothing changed.
    None,

    /// A clip was picked up and selected.
    Select { clip_id: String },

    /// The playhead should move to `time`.
    Seek { time: f64 },

    /// The dragged clip was relocated; the new project replaces the old one.
    MoveClip {
        clip_id: String,
        start_time: f64,
        track: usize,
        project: Box<Project>,
    },

    /// The drag ended.
    Release { clip_id: String },

    /// Zoom changed to `zoom`.
    Zoom { zoom: f64 },
}

/// Timeline view state: scale, drag state and current selection.
#[derive(Debug, Clone, Default)]
pub struct TimelineInteraction {
    scale: TimelineScale,
    drag: DragState,
    selected: Option<String>,
}

impl TimelineInteraction {
    pub fn new(scale: TimelineScale) -> Self {
        Self {
            scale,
            drag: DragState::Idle,
            selected: None,
        }
    }

    pub fn scale(&self) -> &TimelineScale {
        &self.scale
    }

    pub fn scale_mut(&mut self) -> &mut TimelineScale {
        &mut self.scale
    }

    pub fn drag_state(&self) -> &DragState {
        &self.drag
    }

    pub fn is_dragging(&self) -> bool {
        matches!(self.drag, DragState::Dragging { .. })
    }

    /// Currently selected clip id.
    pub fn selected(&self) -> Option<&str> {
        self.selected.as_deref()
    }

    pub fn select(&mut self, clip_id: Option<String>) {
        self.selected = clip_id;
    }

    /// Forget the selection if it no longer names a clip of `project`.
    pub fn reconcile(&mut self, project: &Project) {
        if let Some(id) = &self.selected {
            if project.clip(id).is_none() {
                self.selected = None;
            }
        }
        if let DragState::Dragging { clip_id } = &self.drag {
            if project.clip(clip_id).is_none() {
                self.drag = DragState::Idle;
            }
        }
    }

    pub fn pointer_down(&mut self, project: &Project, x: f64, y: f64) -> TimelineAction {
        if let Some(clip) = self.scale.clip_at(project, x, y) {
            let clip_id = clip.id.clone();
            tracing::debug!(clip_id = %clip_id, "Drag started");
            self.selected = Some(clip_id.clone());
            self.drag = DragState::Dragging {
                clip_id: clip_id.clone(),
            };
            return TimelineAction::Select { clip_id };
        }

        let time = self.scale.time_at(x).clamp(0.0, project.duration.max(0.0));
        TimelineAction::Seek { time }
    }

    /// Relocate the dragged clip. Returns `Err` only if the dragged clip
    /// disappeared from `project` mid-drag.
    pub fn pointer_move(
        &mut self,
        project: &Project,
        x: f64,
        y: f64,
    ) -> Result<TimelineAction, EditError> {
        let DragState::Dragging { clip_id } = &self.drag else {
            return Ok(TimelineAction::None);
        };
        let Some(track) = self.scale.track_at(y) else {
            return Ok(TimelineAction::None);
        };
        let start_time = self.scale.time_at(x).max(0.0);

        let clip_id = clip_id.clone();
        let moved = move_clip(project, &clip_id, start_time, track)?;
        Ok(TimelineAction::MoveClip {
            clip_id,
            start_time,
            track,
            project: Box::new(moved),
        })
    }

    pub fn pointer_up(&mut self) -> TimelineAction {
        match std::mem::take(&mut self.drag) {
            DragState::Dragging { clip_id } => {
                tracing::debug!(clip_id = %clip_id, "Drag released");
                TimelineAction::Release { clip_id }
            }
            DragState::Idle => TimelineAction::None,
        }
    }

    /// Dispatch one event.
    pub fn handle(
        &mut self,
        project: &Project,
        event: &PointerEvent,
    ) -> Result<TimelineAction, EditError> {
        match *event {
            PointerEvent::Down { x, y } => Ok(self.pointer_down(project, x, y)),
            PointerEvent::Move { x, y } => self.pointer_move(project, x, y),
            PointerEvent::Up { .. } => Ok(self.pointer_up()),
            PointerEvent::Zoom { steps } => {
                for _ in 0..steps.unsigned_abs() {
                    if steps > 0 {
                        self.scale.zoom_in();
                    } else {
                        self.scale.zoom_out();
                    }
                }
                Ok(TimelineAction::Zoom {
                    zoom: self.scale.zoom(),
                })
            }
        }
    }
}

/// Replay a gesture script against `project`, returning the final project
/// and the last seek target, if any.
pub fn replay_gestures(
    interaction: &mut TimelineInteraction,
    project: &Project,
    events: &[PointerEvent],
) -> Result<(Project, Option<f64>), EditError> {
    let mut current = project.clone();
    let mut seek = None;
    for event in events {
        match interaction.handle(&current, event)? {
            TimelineAction::MoveClip { project, .. } => current = *project,
            TimelineAction::Seek { time } => seek = Some(time),
            _ => {}
        }
    }
    Ok((current, seek))
}
