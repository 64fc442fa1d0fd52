use cutframe_project_model::{add_clip, Clip, MediaKind, Project};
use cutframe_timeline::{
    parse_gestures, replay_gestures, PointerEvent, TimelineAction, TimelineInteraction,
    TimelineScale,
};
use proptest::prelude::*;

fn single_clip_project() -> (Project, String) {
    let clip = Clip::new("b-roll.mp4", MediaKind::Video, "b-roll.mp4", 3.0);
    let id = clip.id.clone();
    (add_clip(&Project::new("props"), clip, 0, 0.0).unwrap(), id)
}

proptest! {
    #[test]
    fn drag_outside_track_range_keeps_placement(
        x in -500.0f64..5000.0,
        rows_below in 0.0f64..2000.0,
        above in proptest::bool::ANY,
    ) {
        let (project, id) = single_clip_project();
        let mut timeline = TimelineInteraction::default();
        let height = timeline.scale().content_height();
        let y = if above { -1.0 - rows_below } else { height + rows_below };

        timeline.pointer_down(&project, 10.0, 30.0);
        prop_assert!(timeline.is_dragging());
        let action = timeline.pointer_move(&project, x, y).unwrap();
        prop_assert_eq!(action, TimelineAction::None);

        let clip = project.clip(&id).unwrap();
        prop_assert_eq!(clip.track, 0);
        prop_assert_eq!(clip.start_time, 0.0);
    }

    #[test]
    fn drag_inside_track_range_lands_under_pointer(
        x in -500.0f64..5000.0,
        y in 0.0f64..480.0,
        zoom_steps in -3i32..12,
    ) {
        let (project, id) = single_clip_project();
        let mut timeline = TimelineInteraction::default();
        timeline.handle(&project, &PointerEvent::Zoom { steps: zoom_steps }).unwrap();
        let scale: TimelineScale = timeline.scale().clone();

        // Pick the clip up at its first pixel column.
        timeline.pointer_down(&project, 0.5, 30.0);
        prop_assert!(timeline.is_dragging());
        let TimelineAction::MoveClip { project: moved, .. } =
            timeline.pointer_move(&project, x, y).unwrap()
        else {
            return Err(TestCaseError::fail("expected a committed move"));
        };

        let clip = moved.clip(&id).unwrap();
        prop_assert_eq!(Some(clip.track), scale.track_at(y));
        prop_assert!((clip.start_time - scale.time_at(x).max(0.0)).abs() < 1e-9);
        prop_assert!(clip.start_time >= 0.0);
        prop_assert!((moved.duration - (clip.start_time + 3.0)).abs() < 1e-9);
    }
}

#[test]
fn scripted_drag_moves_clip_across_tracks() {
    let (project, id) = single_clip_project();
    let script = r#"
# pick up the clip, drop it at 4s on track 2
{"type":"down","x":20,"y":30}
{"type":"move","x":120,"y":90}
{"type":"move","x":200,"y":150}
{"type":"up","x":200,"y":150}
"#;
    let events = parse_gestures(script).unwrap();
    let mut timeline = TimelineInteraction::default();
    let (moved, seek) = replay_gestures(&mut timeline, &project, &events).unwrap();

    let clip = moved.clip(&id).unwrap();
    assert_eq!(clip.track, 2);
    assert!((clip.start_time - 4.0).abs() < 1e-9);
    assert!((moved.duration - 7.0).abs() < 1e-9);
    assert!(seek.is_none());
}

#[test]
fn click_on_empty_track_seeks() {
    let (project, _) = single_clip_project();
    let events = parse_gestures(r#"{"type":"down","x":100,"y":300}"#).unwrap();
    let mut timeline = TimelineInteraction::default();
    let (_, seek) = replay_gestures(&mut timeline, &project, &events).unwrap();
    assert_eq!(seek, Some(2.0));
}
