//! Edit operations.
//!
//! Every edit is a pure function from a project to a new project value.
//! The input is never mutated, which lets callers keep prior values for
//! undo. Edits that change a clip's time extent re-derive the project
//! duration. Edits that name a missing clip, overlay, or audio track fail
//! with the matching `*NotFound` error.

use serde::{Deserialize, Serialize};

use crate::audio::AudioTrack;
use crate::clip::{Clip, Transform};
use crate::effect::{upsert_effect, Effect, EffectKind};
use crate::overlay::TextOverlay;
use crate::project::Project;

/// Errors returned by edit operations.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum EditError {
    #[error("Clip not found: {id}")]
    ClipNotFound { id: String },

    #[error("Text overlay not found: {id}")]
    OverlayNotFound { id: String },

    #[error("Audio track not found: {id}")]
    AudioTrackNotFound { id: String },

    #[error("Invalid value: {message}")]
    InvalidValue { message: String },
}

impl EditError {
    fn invalid(message: impl Into<String>) -> Self {
        Self::InvalidValue {
            message: message.into(),
        }
    }
}

fn check_time(label: &str, value: f64) -> Result<(), EditError> {
    if value.is_finite() && value >= 0.0 {
        Ok(())
    } else {
        Err(EditError::invalid(format!(
            "{label} must be a non-negative number, got {value}"
        )))
    }
}

fn check_duration(label: &str, value: f64) -> Result<(), EditError> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(EditError::invalid(format!(
            "{label} must be positive, got {value}"
        )))
    }
}

/// Work on a copy of `project`, re-deriving duration and bumping `updated_at`.
fn derive(
    project: &Project,
    f: impl FnOnce(&mut Project) -> Result<(), EditError>,
) -> Result<Project, EditError> {
    let mut next = project.clone();
    f(&mut next)?;
    next.recompute_duration();
    next.touch();
    Ok(next)
}

fn with_clip(
    project: &Project,
    clip_id: &str,
    f: impl FnOnce(&mut Clip) -> Result<(), EditError>,
) -> Result<Project, EditError> {
    derive(project, |p| {
        let clip = p.clip_mut(clip_id).ok_or_else(|| EditError::ClipNotFound {
            id: clip_id.to_string(),
        })?;
        f(clip)
    })
}

/// Append `clip` placed at `(track, start_time)`.
pub fn add_clip(
    project: &Project,
    clip: Clip,
    track: usize,
    start_time: f64,
) -> Result<Project, EditError> {
    check_time("start_time", start_time)?;
    check_duration("clip duration", clip.duration)?;
    derive(project, |p| {
        p.clips.push(Clip {
            track,
            start_time,
            ..clip
        });
        Ok(())
    })
}

/// Relocate a clip. Overlap with other clips is allowed.
pub fn move_clip(
    project: &Project,
    clip_id: &str,
    start_time: f64,
    track: usize,
) -> Result<Project, EditError> {
    check_time("start_time", start_time)?;
    with_clip(project, clip_id, |clip| {
        clip.start_time = start_time;
        clip.track = track;
        Ok(())
    })
}

pub fn remove_clip(project: &Project, clip_id: &str) -> Result<Project, EditError> {
    derive(project, |p| {
        let index = p
            .clips
            .iter()
            .position(|c| c.id == clip_id)
            .ok_or_else(|| EditError::ClipNotFound {
                id: clip_id.to_string(),
            })?;
        p.clips.remove(index);
        Ok(())
    })
}

/// Apply an effect, replacing any effect of the same kind in place.
pub fn apply_effect(
    project: &Project,
    clip_id: &str,
    mut effect: Effect,
) -> Result<Project, EditError> {
    effect.intensity = effect.kind.clamp_intensity(effect.intensity);
    with_clip(project, clip_id, |clip| {
        upsert_effect(&mut clip.effects, effect);
        Ok(())
    })
}

/// Remove the effect of `kind`. Removing an absent kind is not an error.
pub fn remove_effect(
    project: &Project,
    clip_id: &str,
    kind: EffectKind,
) -> Result<Project, EditError> {
    with_clip(project, clip_id, |clip| {
        clip.effects.retain(|e| e.kind != kind);
        Ok(())
    })
}

/// Reset brightness, contrast, saturation, and hue to their control defaults.
pub fn reset_color_effects(project: &Project, clip_id: &str) -> Result<Project, EditError> {
    with_clip(project, clip_id, |clip| {
        for kind in EffectKind::COLOR {
            upsert_effect(
                &mut clip.effects,
                Effect::new(kind, kind.default_intensity()),
            );
        }
        Ok(())
    })
}

pub fn set_clip_volume(
    project: &Project,
    clip_id: &str,
    volume: f64,
) -> Result<Project, EditError> {
    if !volume.is_finite() {
        return Err(EditError::invalid(format!("volume must be finite, got {volume}")));
    }
    with_clip(project, clip_id, |clip| {
        clip.volume = volume.clamp(0.0, 1.0);
        Ok(())
    })
}

pub fn set_clip_transform(
    project: &Project,
    clip_id: &str,
    transform: Option<Transform>,
) -> Result<Project, EditError> {
    if let Some(t) = &transform {
        if !(t.scale.is_finite() && t.scale > 0.0) {
            return Err(EditError::invalid(format!(
                "scale must be positive, got {}",
                t.scale
            )));
        }
    }
    with_clip(project, clip_id, |clip| {
        clip.transform = transform;
        Ok(())
    })
}

pub fn add_text_overlay(project: &Project, overlay: TextOverlay) -> Result<Project, EditError> {
    check_time("overlay start_time", overlay.start_time)?;
    check_duration("overlay duration", overlay.duration)?;
    derive(project, |p| {
        p.text_overlays.push(overlay);
        Ok(())
    })
}

/// Replace the overlay with the same id.
pub fn update_text_overlay(project: &Project, overlay: TextOverlay) -> Result<Project, EditError> {
    check_time("overlay start_time", overlay.start_time)?;
    check_duration("overlay duration", overlay.duration)?;
    derive(project, |p| {
        let slot = p
            .text_overlays
            .iter_mut()
            .find(|o| o.id == overlay.id)
            .ok_or_else(|| EditError::OverlayNotFound {
                id: overlay.id.clone(),
            })?;
        *slot = overlay;
        Ok(())
    })
}

pub fn remove_text_overlay(project: &Project, overlay_id: &str) -> Result<Project, EditError> {
    derive(project, |p| {
        let index = p
            .text_overlays
            .iter()
            .position(|o| o.id == overlay_id)
            .ok_or_else(|| EditError::OverlayNotFound {
                id: overlay_id.to_string(),
            })?;
        p.text_overlays.remove(index);
        Ok(())
    })
}

pub fn add_audio_track(project: &Project, track: AudioTrack) -> Result<Project, EditError> {
    check_time("audio start_time", track.start_time)?;
    check_duration("audio duration", track.duration)?;
    derive(project, |p| {
        p.audio_tracks.push(track);
        Ok(())
    })
}

pub fn remove_audio_track(project: &Project, track_id: &str) -> Result<Project, EditError> {
    derive(project, |p| {
        let index = p
            .audio_tracks
            .iter()
            .position(|a| a.id == track_id)
            .ok_or_else(|| EditError::AudioTrackNotFound {
                id: track_id.to_string(),
            })?;
        p.audio_tracks.remove(index);
        Ok(())
    })
}

/// A serializable edit command.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum Edit {
    AddClip {
        clip: Clip,
        track: usize,
        start_time: f64,
    },
    MoveClip {
        clip_id: String,
        start_time: f64,
        track: usize,
    },
    RemoveClip {
        clip_id: String,
    },
    ApplyEffect {
        clip_id: String,
        effect: Effect,
    },
    RemoveEffect {
        clip_id: String,
        kind: EffectKind,
    },
    ResetColorEffects {
        clip_id: String,
    },
    SetClipVolume {
        clip_id: String,
        volume: f64,
    },
    SetClipTransform {
        clip_id: String,
        transform: Option<Transform>,
    },
    AddTextOverlay {
        overlay: TextOverlay,
    },
    UpdateTextOverlay {
        overlay: TextOverlay,
    },
    RemoveTextOverlay {
        overlay_id: String,
    },
    AddAudioTrack {
        track: AudioTrack,
    },
    RemoveAudioTrack {
        track_id: String,
    },
}

impl Edit {
    /// Apply this edit to `project`, producing the next project value.
    pub fn apply(&self, project: &Project) -> Result<Project, EditError> {
        match self {
            Edit::AddClip {
                clip,
                track,
                start_time,
            } => add_clip(project, clip.clone(), *track, *start_time),
            Edit::MoveClip {
                clip_id,
                start_time,
                track,
            } => move_clip(project, clip_id, *start_time, *track),
            Edit::RemoveClip { clip_id } => remove_clip(project, clip_id),
            Edit::ApplyEffect { clip_id, effect } => apply_effect(project, clip_id, effect.clone()),
            Edit::RemoveEffect { clip_id, kind } => remove_effect(project, clip_id, *kind),
            Edit::ResetColorEffects { clip_id } => reset_color_effects(project, clip_id),
            Edit::SetClipVolume { clip_id, volume } => set_clip_volume(project, clip_id, *volume),
            Edit::SetClipTransform { clip_id, transform } => {
                set_clip_transform(project, clip_id, *transform)
            }
            Edit::AddTextOverlay { overlay } => add_text_overlay(project, overlay.clone()),
            Edit::UpdateTextOverlay { overlay } => update_text_overlay(project, overlay.clone()),
            Edit::RemoveTextOverlay { overlay_id } => remove_text_overlay(project, overlay_id),
            Edit::AddAudioTrack { track } => add_audio_track(project, track.clone()),
            Edit::RemoveAudioTrack { track_id } => remove_audio_track(project, track_id),
        }
    }

    /// Short human-readable label for history listings.
    pub fn label(&self) -> &'static str {
        match self {
            Edit::AddClip { .. } => "add clip",
            Edit::MoveClip { .. } => "move clip",
            Edit::RemoveClip { .. } => "remove clip",
            Edit::ApplyEffect { .. } => "apply effect",
            Edit::RemoveEffect { .. } => "remove effect",
            Edit::ResetColorEffects { .. } => "reset color effects",
            Edit::SetClipVolume { .. } => "set volume",
            Edit::SetClipTransform { .. } => "set transform",
            Edit::AddTextOverlay { .. } => "add text",
            Edit::UpdateTextOverlay { .. } => "update text",
            Edit::RemoveTextOverlay { .. } => "remove text",
            Edit::AddAudioTrack { .. } => "add audio track",
            Edit::RemoveAudioTrack { .. } => "remove audio track",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clip::MediaKind;

    fn video(duration: f64) -> Clip {
        Clip::new("lecture.mp4", MediaKind::Video, "lecture.mp4", duration)
    }

    #[test]
    fn test_add_clip_places_and_extends_duration() {
        let project = Project::new("p");
        let clip = video(10.0);
        let id = clip.id.clone();
        let next = add_clip(&project, clip, 2, 3.0).unwrap();

        let placed = next.clip(&id).unwrap();
        assert_eq!(placed.track, 2);
        assert!((placed.start_time - 3.0).abs() < 1e-9);
        assert!((next.duration - 13.0).abs() < 1e-9);
        assert!(project.clips.is_empty(), "input must not be mutated");
    }

    #[test]
    fn test_add_clip_rejects_bad_values() {
        let project = Project::new("p");
        assert!(matches!(
            add_clip(&project, video(0.0), 0, 0.0),
            Err(EditError::InvalidValue { .. })
        ));
        assert!(matches!(
            add_clip(&project, video(1.0), 0, -2.0),
            Err(EditError::InvalidValue { .. })
        ));
    }

    #[test]
    fn test_move_clip_rederives_duration_both_ways() {
        let project = Project::new("p");
        let clip = video(10.0);
        let id = clip.id.clone();
        let project = add_clip(&project, clip, 0, 0.0).unwrap();

        let later = move_clip(&project, &id, 20.0, 1).unwrap();
        assert!((later.duration - 30.0).abs() < 1e-9);

        let earlier = move_clip(&later, &id, 5.0, 1).unwrap();
        assert!((earlier.duration - 15.0).abs() < 1e-9);
    }

    #[test]
    fn test_missing_ids_are_explicit_errors() {
        let project = Project::new("p");
        assert_eq!(
            move_clip(&project, "nope", 1.0, 0),
            Err(EditError::ClipNotFound {
                id: "nope".to_string()
            })
        );
        assert!(matches!(
            remove_text_overlay(&project, "nope"),
            Err(EditError::OverlayNotFound { .. })
        ));
        assert!(matches!(
            remove_audio_track(&project, "nope"),
            Err(EditError::AudioTrackNotFound { .. })
        ));
        assert!(matches!(
            update_text_overlay(&project, TextOverlay::new("x", 0.0)),
            Err(EditError::OverlayNotFound { .. })
        ));
    }

    #[test]
    fn test_reapplying_effect_kind_keeps_length() {
        let clip = video(5.0);
        let id = clip.id.clone();
        let project = add_clip(&Project::new("p"), clip, 0, 0.0).unwrap();

        let once = apply_effect(&project, &id, Effect::new(EffectKind::Brightness, 80.0)).unwrap();
        let twice = apply_effect(&once, &id, Effect::new(EffectKind::Brightness, 10.0)).unwrap();
        let effects = &twice.clip(&id).unwrap().effects;
        assert_eq!(effects.len(), 1);
        assert!((effects[0].intensity - 10.0).abs() < 1e-9);
    }

    #[test]
    fn test_out_of_range_effect_is_clamped_on_apply() {
        let clip = video(5.0);
        let id = clip.id.clone();
        let project = add_clip(&Project::new("p"), clip, 0, 0.0).unwrap();

        let effect = Effect {
            intensity: 259.0,
            ..Effect::new(EffectKind::Contrast, 0.0)
        };
        let project = apply_effect(&project, &id, effect).unwrap();
        let contrast = project.clip(&id).unwrap().effect(EffectKind::Contrast).unwrap();
        assert_eq!(contrast.intensity, 100.0);
    }

    #[test]
    fn test_reset_color_effects() {
        let clip = video(5.0);
        let id = clip.id.clone();
        let project = add_clip(&Project::new("p"), clip, 0, 0.0).unwrap();
        let project = apply_effect(&project, &id, Effect::new(EffectKind::Hue, 90.0)).unwrap();
        let project = reset_color_effects(&project, &id).unwrap();

        let clip = project.clip(&id).unwrap();
        assert_eq!(clip.effects.len(), 4);
        assert!((clip.effect(EffectKind::Hue).unwrap().intensity).abs() < 1e-9);
        assert!((clip.effect(EffectKind::Brightness).unwrap().intensity - 50.0).abs() < 1e-9);
    }

    #[test]
    fn test_remove_clip_shrinks_duration() {
        let a = video(5.0);
        let b = video(8.0);
        let b_id = b.id.clone();
        let project = add_clip(&Project::new("p"), a, 0, 0.0).unwrap();
        let project = add_clip(&project, b, 1, 4.0).unwrap();
        assert!((project.duration - 12.0).abs() < 1e-9);

        let project = remove_clip(&project, &b_id).unwrap();
        assert!((project.duration - 5.0).abs() < 1e-9);
    }

    #[test]
    fn test_volume_is_clamped() {
        let clip = video(5.0);
        let id = clip.id.clone();
        let project = add_clip(&Project::new("p"), clip, 0, 0.0).unwrap();
        let project = set_clip_volume(&project, &id, 3.0).unwrap();
        assert!((project.clip(&id).unwrap().volume - 1.0).abs() < 1e-9);
        assert!(set_clip_volume(&project, &id, f64::NAN).is_err());
    }

    #[test]
    fn test_edit_command_roundtrip_and_apply() {
        let clip = video(4.0);
        let id = clip.id.clone();
        let edit = Edit::AddClip {
            clip,
            track: 1,
            start_time: 2.0,
        };
        let json = serde_json::to_string(&edit).unwrap();
        assert!(json.contains("\"op\":\"add_clip\""));

        let parsed: Edit = serde_json::from_str(&json).unwrap();
        let project = parsed.apply(&Project::new("p")).unwrap();
        assert!(project.clip(&id).is_some());
        assert_eq!(parsed.label(), "add clip");
    }

    #[test]
    fn test_overlay_edits_do_not_change_duration() {
        let project = Project::new("p");
        let overlay = TextOverlay::new("Title", 50.0);
        let project = add_text_overlay(&project, overlay).unwrap();
        assert_eq!(project.duration, 0.0);
        assert_eq!(project.text_overlays.len(), 1);
    }
}
