use cutframe_project_model::{
    add_clip, add_text_overlay, Clip, Color, MediaKind, Project, TextAnimation, TextOverlay,
};
use cutframe_render_engine::effects::{brightness, grayscale, saturation};
use cutframe_render_engine::{compute_composition, render_frame};
use proptest::prelude::*;

fn rgb() -> impl Strategy<Value = [u8; 3]> {
    (any::<u8>(), any::<u8>(), any::<u8>()).prop_map(|(r, g, b)| [r, g, b])
}

proptest! {
    #[test]
    fn brightness_fifty_is_identity(px in rgb()) {
        prop_assert_eq!(brightness(px, 50.0), px);
    }

    #[test]
    fn brightness_extremes_differ(px in rgb()) {
        let bright = brightness(px, 100.0);
        let dark = brightness(px, 0.0);
        prop_assert_ne!(bright, dark);
        for c in 0..3 {
            prop_assert!(bright[c] >= px[c]);
            prop_assert!(dark[c] <= px[c]);
        }
    }

    #[test]
    fn grayscale_is_idempotent(px in rgb()) {
        let once = grayscale(px);
        prop_assert_eq!(grayscale(once), once);
        prop_assert_eq!(once[0], once[1]);
        prop_assert_eq!(once[1], once[2]);
    }

    #[test]
    fn saturation_fifty_is_identity(px in rgb()) {
        prop_assert_eq!(saturation(px, 50.0), px);
    }

    #[test]
    fn clip_window_is_half_open(start in 0.0f64..100.0, duration in 0.1f64..30.0) {
        let clip = Clip::new("c", MediaKind::Video, "c.mp4", duration);
        let project = add_clip(&Project::with_canvas("w", 16, 16, 30), clip, 0, start).unwrap();
        prop_assert_eq!(compute_composition(&project, start).clips.len(), 1);
        prop_assert_eq!(compute_composition(&project, start + duration).clips.len(), 0);
    }
}

fn fade_project() -> Project {
    let overlay = TextOverlay {
        animation: TextAnimation::FadeIn,
        color: Color::WHITE,
        ..TextOverlay::new("Fade", 2.0)
    };
    add_text_overlay(&Project::with_canvas("fade", 320, 240, 30), overlay).unwrap()
}

#[test]
fn fade_in_overlay_scenario() {
    let project = fade_project();
    // Inside the first glyph block of text at (100, 100), 48px.
    let probe = |t: f64| render_frame(&project, t).get_pixel(112, 120).0;

    assert_eq!(probe(2.0), [0, 0, 0, 255]);
    let half = probe(2.25);
    assert!((120..=136).contains(&half[0]), "{half:?}");
    assert_eq!(probe(2.5), [255, 255, 255, 255]);
    assert_eq!(probe(4.9), [255, 255, 255, 255]);
    assert_eq!(probe(5.0), [0, 0, 0, 255]);
    assert!(compute_composition(&project, 5.0).overlays.is_empty());
    assert_eq!(compute_composition(&project, 2.0).overlays[0].state.opacity, 0.0);
}

#[test]
fn same_track_overlap_draws_later_clip_on_top() {
    let under = Clip::new("under", MediaKind::Video, "a.mp4", 10.0);
    let over = Clip::new("over", MediaKind::Image, "b.png", 10.0);
    let (under_id, over_id) = (under.id.clone(), over.id.clone());
    let project = add_clip(&Project::with_canvas("overlap", 64, 48, 30), under, 0, 0.0).unwrap();
    let project = add_clip(&project, over, 0, 2.0).unwrap();

    let composition = compute_composition(&project, 5.0);
    let ids: Vec<_> = composition.clips.iter().map(|l| l.clip_id.clone()).collect();
    assert_eq!(ids, vec![under_id, over_id]);

    let frame = render_frame(&project, 5.0);
    assert_eq!(frame.get_pixel(0, 0).0, [0x66, 0x66, 0x66, 255]);
}
