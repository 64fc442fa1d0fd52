//! Frame compositor: draws the clips and text overlays active at a time.
//!
//! Compositing is split in two steps. [`compute_composition`] resolves which
//! layers are visible at `t` and where; [`render_composition`] rasterizes
//! that plan onto an opaque black canvas. [`render_frame`] does both.

use std::io::Cursor;

use cutframe_common::error::{CutframeError, CutframeResult};
use cutframe_project_model::clip::MediaKind;
use cutframe_project_model::color::Color;
use cutframe_project_model::effect::Effect;
use cutframe_project_model::geometry::Rect;
use cutframe_project_model::project::Project;
use image::{ImageFormat, Rgba, RgbaImage};

use crate::effects::{apply_effects, PixelRegion};
use crate::text::{
    draw_text_centered, draw_text_state, fill_rect_blended, text_render_state, TextRenderState,
    LABEL_FONT_SIZE,
};

/// A rendered RGBA frame.
pub type Frame = RgbaImage;

/// Placeholder panel fill for video clips.
pub const VIDEO_PANEL_COLOR: Color = Color::rgb(0x33, 0x33, 0x33);

/// Placeholder panel fill for image clips.
pub const IMAGE_PANEL_COLOR: Color = Color::rgb(0x66, 0x66, 0x66);

/// One visual clip to draw.
#[derive(Debug, Clone, PartialEq)]
pub struct ClipLayer {
    pub clip_id: String,
    pub kind: MediaKind,
    /// Placeholder label drawn at the panel center.
    pub label: String,
    /// Offset into the clip.
    pub local_time: f64,
    /// Panel rectangle in canvas pixels before clipping.
    pub panel: Rect,
    /// Visible pixels of the panel; `None` when fully off-canvas.
    pub region: Option<PixelRegion>,
    pub effects: Vec<Effect>,
}

/// One text overlay to draw.
#[derive(Debug, Clone, PartialEq)]
pub struct OverlayLayer {
    pub overlay_id: String,
    pub state: TextRenderState,
    pub color: Color,
    pub background: Color,
}

/// Everything visible at one instant, in draw order.
#[derive(Debug, Clone, PartialEq)]
pub struct FrameComposition {
    pub time_secs: f64,
    pub width: u32,
    pub height: u32,
    /// Back to front.
    pub clips: Vec<ClipLayer>,
    pub overlays: Vec<OverlayLayer>,
}

impl FrameComposition {
    pub fn is_empty(&self) -> bool {
        self.clips.is_empty() && self.overlays.is_empty()
    }
}

fn clip_label(kind: MediaKind, name: &str) -> String {
    match kind {
        MediaKind::Image => format!("Image: {name}"),
        _ => name.to_string(),
    }
}

/// Resolve the layers visible at `t`.
///
/// Clips are ordered by ascending track, keeping list order within a track.
/// Audio clips have no visual and are skipped.
pub fn compute_composition(project: &Project, t: f64) -> FrameComposition {
    let (width, height) = (project.width, project.height);

    let clips = project
        .clips_in_draw_order()
        .into_iter()
        .filter_map(|clip| {
            let local_time = clip.local_time(t)?;
            let panel = clip.region(width, height)?;
            Some(ClipLayer {
                clip_id: clip.id.clone(),
                kind: clip.kind,
                label: clip_label(clip.kind, &clip.name),
                local_time,
                panel,
                region: PixelRegion::from_rect(&panel, width, height),
                effects: clip.effects.clone(),
            })
        })
        .collect();

    let overlays = project
        .text_overlays
        .iter()
        .filter_map(|overlay| {
            Some(OverlayLayer {
                overlay_id: overlay.id.clone(),
                state: text_render_state(overlay, t)?,
                color: overlay.color,
                background: overlay.background_color,
            })
        })
        .collect();

    FrameComposition {
        time_secs: t,
        width,
        height,
        clips,
        overlays,
    }
}

/// Rasterize a composition.
pub fn render_composition(composition: &FrameComposition) -> Frame {
    let mut frame = RgbaImage::from_pixel(
        composition.width,
        composition.height,
        Rgba(Color::BLACK.to_array()),
    );

    for layer in &composition.clips {
        let Some(region) = layer.region else {
            continue;
        };
        let fill = match layer.kind {
            MediaKind::Image => IMAGE_PANEL_COLOR,
            _ => VIDEO_PANEL_COLOR,
        };
        fill_rect_blended(&mut frame, &layer.panel, fill);
        draw_text_centered(
            &mut frame,
            &layer.label,
            layer.panel.x + layer.panel.w / 2.0,
            layer.panel.y + layer.panel.h / 2.0,
            LABEL_FONT_SIZE,
            Color::WHITE,
        );
        apply_effects(&mut frame, region, &layer.effects);
    }

    for layer in &composition.overlays {
        draw_text_state(&mut frame, &layer.state, layer.color, layer.background);
    }

    frame
}

/// Render the frame at timeline time `t`.
pub fn render_frame(project: &Project, t: f64) -> Frame {
    let composition = compute_composition(project, t);
    tracing::trace!(
        t,
        clips = composition.clips.len(),
        overlays = composition.overlays.len(),
        "Rendering frame"
    );
    render_composition(&composition)
}

/// Sample times of every frame in `[0, duration)` at `fps`.
pub fn frame_times(duration: f64, fps: u32) -> impl Iterator<Item = f64> {
    let fps = fps.max(1);
    let total = if duration.is_finite() && duration > 0.0 {
        // Tolerate float noise so 0.1s at 30fps is 3 frames, not 4.
        (duration * fps as f64 - 1e-9).ceil().max(0.0) as u64
    } else {
        0
    };
    (0..total).map(move |frame| frame as f64 / fps as f64)
}

/// Encode a frame as PNG bytes.
pub fn encode_png(frame: &Frame) -> CutframeResult<Vec<u8>> {
    let mut bytes = Cursor::new(Vec::new());
    frame
        .write_to(&mut bytes, ImageFormat::Png)
        .map_err(|e| CutframeError::render(format!("PNG encoding failed: {e}")))?;
    Ok(bytes.into_inner())
}

#[cfg(test)]
mod tests {
    use super::*;
    use cutframe_project_model::clip::{Clip, Transform};
    use cutframe_project_model::effect::EffectKind;
    use cutframe_project_model::edit::{add_clip, add_text_overlay, apply_effect};
    use cutframe_project_model::overlay::TextOverlay;
    use cutframe_project_model::geometry::Point2D;

    fn small_project() -> Project {
        Project::with_canvas("frame", 64, 48, 30)
    }

    #[test]
    fn test_empty_project_is_black() {
        let frame = render_frame(&small_project(), 0.0);
        assert_eq!(frame.dimensions(), (64, 48));
        assert!(frame.pixels().all(|p| p.0 == [0, 0, 0, 255]));
    }

    #[test]
    fn test_video_clip_fills_canvas_with_panel() {
        let clip = Clip::new("x", MediaKind::Video, "x.mp4", 2.0);
        let project = add_clip(&small_project(), clip, 0, 1.0).unwrap();

        let inside = render_frame(&project, 1.5);
        assert_eq!(inside.get_pixel(1, 1).0, [0x33, 0x33, 0x33, 255]);

        // The window is half-open.
        let at_end = render_frame(&project, 3.0);
        assert_eq!(at_end.get_pixel(1, 1).0, [0, 0, 0, 255]);
        let before = render_frame(&project, 0.99);
        assert_eq!(before.get_pixel(1, 1).0, [0, 0, 0, 255]);
    }

    #[test]
    fn test_audio_clip_draws_nothing() {
        let clip = Clip::new("song", MediaKind::Audio, "song.mp3", 5.0);
        let id = clip.id.clone();
        let project = add_clip(&small_project(), clip, 0, 0.0).unwrap();
        let brighten = Effect::new(EffectKind::Brightness, 100.0);
        let project = apply_effect(&project, &id, brighten).unwrap();
        let frame = render_frame(&project, 1.0);
        assert!(frame.pixels().all(|p| p.0 == [0, 0, 0, 255]));
        assert!(compute_composition(&project, 1.0).is_empty());
    }

    #[test]
    fn test_image_clip_label_and_color() {
        let clip = Clip::new("logo.png", MediaKind::Image, "logo.png", 5.0);
        let project = add_clip(&small_project(), clip, 0, 0.0).unwrap();
        let composition = compute_composition(&project, 0.0);
        assert_eq!(composition.clips[0].label, "Image: logo.png");
        let frame = render_composition(&composition);
        assert_eq!(frame.get_pixel(0, 0).0, [0x66, 0x66, 0x66, 255]);
    }

    #[test]
    fn test_draw_order_is_track_then_insertion() {
        let a = Clip::new("a", MediaKind::Video, "a", 5.0);
        let b = Clip::new("b", MediaKind::Image, "b", 5.0);
        let c = Clip::new("c", MediaKind::Video, "c", 5.0);
        let (a_id, b_id, c_id) = (a.id.clone(), b.id.clone(), c.id.clone());
        let project = add_clip(&small_project(), a, 2, 0.0).unwrap();
        let project = add_clip(&project, b, 0, 0.0).unwrap();
        let project = add_clip(&project, c, 0, 0.0).unwrap();

        let order: Vec<_> = compute_composition(&project, 1.0)
            .clips
            .into_iter()
            .map(|l| l.clip_id)
            .collect();
        assert_eq!(order, vec![b_id, c_id, a_id]);
    }

    #[test]
    fn test_transform_limits_panel_and_effects() {
        let mut clip = Clip::new("pip", MediaKind::Image, "pip.png", 5.0);
        clip.transform = Some(Transform {
            position: Point2D::new(32.0, 24.0),
            scale: 0.5,
            rotation: 0.0,
        });
        clip.effects.push(Effect::new(EffectKind::Brightness, 100.0));
        let project = add_clip(&small_project(), clip, 0, 0.0).unwrap();

        let frame = render_frame(&project, 0.0);
        // Outside the panel: untouched background.
        assert_eq!(frame.get_pixel(5, 5).0, [0, 0, 0, 255]);
        // Inside the panel corner: brightened #666666.
        let expected = 0x66 + 128;
        assert_eq!(frame.get_pixel(33, 25).0, [expected, expected, expected, 255]);
    }

    #[test]
    fn test_off_canvas_clip_is_skipped() {
        let mut clip = Clip::new("far", MediaKind::Video, "far.mp4", 5.0);
        clip.transform = Some(Transform {
            position: Point2D::new(500.0, 500.0),
            scale: 1.0,
            rotation: 0.0,
        });
        let project = add_clip(&small_project(), clip, 0, 0.0).unwrap();
        let composition = compute_composition(&project, 0.0);
        assert_eq!(composition.clips.len(), 1);
        assert!(composition.clips[0].region.is_none());
        let frame = render_composition(&composition);
        assert!(frame.pixels().all(|p| p.0 == [0, 0, 0, 255]));
    }

    #[test]
    fn test_overlay_after_last_clip_is_composited() {
        let clip = Clip::new("x", MediaKind::Video, "x.mp4", 2.0);
        let project = add_clip(&small_project(), clip, 0, 0.0).unwrap();
        let project = add_text_overlay(&project, TextOverlay::new("late", 3.0)).unwrap();
        assert_eq!(project.duration, 2.0);

        let composition = compute_composition(&project, 4.0);
        assert!(composition.clips.is_empty());
        assert_eq!(composition.overlays.len(), 1);
        assert!(compute_composition(&project, 2.0).overlays.is_empty());
    }

    #[test]
    fn test_frame_times() {
        let times: Vec<f64> = frame_times(0.1, 30).collect();
        assert_eq!(times.len(), 3);
        assert_eq!(times[0], 0.0);
        assert_eq!(frame_times(0.0, 30).count(), 0);
        assert_eq!(frame_times(f64::NAN, 30).count(), 0);
    }

    #[test]
    fn test_encode_png_signature() {
        let bytes = encode_png(&render_frame(&small_project(), 0.0)).unwrap();
        assert_eq!(&bytes[..8], b"\x89PNG\r\n\x1a\n");
        let decoded = image::load_from_memory(&bytes).unwrap();
        assert_eq!(decoded.width(), 64);
    }
}
