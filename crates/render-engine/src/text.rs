//! Text overlay layout, animation and placeholder rasterization.
//!
//! No font files are loaded. Each visible character is drawn as a solid
//! block on a fixed advance of `0.6 * font_size`, which is also the width
//! used for text measurement.

use cutframe_project_model::color::Color;
use cutframe_project_model::geometry::Rect;
use cutframe_project_model::overlay::{TextAnimation, TextOverlay};
use image::{Rgba, RgbaImage};
use imageproc::drawing::{draw_filled_rect_mut, Blend};
use imageproc::rect::Rect as PixelRect;

/// Horizontal advance per character, in ems.
pub const GLYPH_ADVANCE_EM: f64 = 0.6;

/// Length of the entry animations.
pub const ANIMATION_SECS: f64 = 0.5;

/// Background padding around text, in pixels.
pub const BACKGROUND_PADDING: f64 = 5.0;

/// Font size of clip placeholder labels.
pub const LABEL_FONT_SIZE: f64 = 24.0;

/// Width of `text` at `font_size`.
pub fn measure_text_width(text: &str, font_size: f64) -> f64 {
    text.chars().count() as f64 * font_size * GLYPH_ADVANCE_EM
}

/// Resolved drawing parameters of an overlay at one instant.
#[derive(Debug, Clone, PartialEq)]
pub struct TextRenderState {
    /// Opacity in `[0, 1]` applied to text and background.
    pub opacity: f64,
    /// Top-left of the text box.
    pub x: f64,
    pub y: f64,
    pub font_size: f64,
    /// The visible part of the text.
    pub text: String,
}

impl TextRenderState {
    pub fn width(&self) -> f64 {
        measure_text_width(&self.text, self.font_size)
    }

    /// Background rectangle around the text box.
    pub fn background_rect(&self) -> Rect {
        Rect::new(
            self.x - BACKGROUND_PADDING,
            self.y - BACKGROUND_PADDING,
            self.width() + 2.0 * BACKGROUND_PADDING,
            self.font_size + 2.0 * BACKGROUND_PADDING,
        )
    }
}

/// Layout of `overlay` at timeline time `t`, or `None` outside its window.
pub fn text_render_state(overlay: &TextOverlay, t: f64) -> Option<TextRenderState> {
    let local = overlay.local_time(t)?;
    let entry = (local / ANIMATION_SECS).min(1.0);

    let mut state = TextRenderState {
        opacity: 1.0,
        x: overlay.position.x,
        y: overlay.position.y,
        font_size: overlay.font_size,
        text: overlay.text.clone(),
    };

    match overlay.animation {
        TextAnimation::None => {}
        TextAnimation::FadeIn => state.opacity = entry,
        TextAnimation::SlideIn => {
            let width = measure_text_width(&overlay.text, overlay.font_size);
            state.x -= width * (1.0 - entry);
        }
        TextAnimation::ZoomIn => state.font_size = overlay.font_size * (0.5 + 0.5 * entry),
        TextAnimation::Typewriter => {
            let len = overlay.text.chars().count();
            let visible = (len as f64 * overlay.progress(t)).floor() as usize;
            state.text = overlay.text.chars().take(visible).collect();
        }
    }
    Some(state)
}

/// Alpha-blend a solid rectangle onto `image`, clipped to its bounds.
pub fn fill_rect_blended(image: &mut RgbaImage, rect: &Rect, color: Color) {
    if color.is_transparent() {
        return;
    }
    let Some((x, y, w, h)) = rect.to_pixel_bounds(image.width(), image.height()) else {
        return;
    };
    let target = PixelRect::at(x as i32, y as i32).of_size(w, h);
    let mut canvas = Blend(std::mem::replace(image, RgbaImage::new(0, 0)));
    draw_filled_rect_mut(&mut canvas, target, Rgba(color.to_array()));
    *image = canvas.0;
}

/// Block rectangles for each visible character of `text`.
pub fn glyph_rects(text: &str, x: f64, y: f64, font_size: f64) -> Vec<Rect> {
    let advance = font_size * GLYPH_ADVANCE_EM;
    text.chars()
        .enumerate()
        .filter(|(_, c)| !c.is_whitespace())
        .map(|(i, _)| {
            Rect::new(
                x + i as f64 * advance + advance * 0.1,
                y + font_size * 0.15,
                advance * 0.8,
                font_size * 0.7,
            )
        })
        .collect()
}

/// Draw placeholder glyphs for `text` with its top-left at `(x, y)`.
pub fn draw_text(image: &mut RgbaImage, text: &str, x: f64, y: f64, font_size: f64, color: Color) {
    for rect in glyph_rects(text, x, y, font_size) {
        fill_rect_blended(image, &rect, color);
    }
}

/// Draw `text` centered on `(cx, cy)`.
pub fn draw_text_centered(
    image: &mut RgbaImage,
    text: &str,
    cx: f64,
    cy: f64,
    font_size: f64,
    color: Color,
) {
    let width = measure_text_width(text, font_size);
    draw_text(image, text, cx - width / 2.0, cy - font_size / 2.0, font_size, color);
}

/// Draw `overlay` as it appears at time `t`. Returns whether it was active.
pub fn draw_text_overlay(image: &mut RgbaImage, overlay: &TextOverlay, t: f64) -> bool {
    let Some(state) = text_render_state(overlay, t) else {
        return false;
    };
    draw_text_state(image, &state, overlay.color, overlay.background_color);
    true
}

/// Draw a resolved overlay: background first, then text, both at the
/// state's opacity.
pub fn draw_text_state(
    image: &mut RgbaImage,
    state: &TextRenderState,
    color: Color,
    background: Color,
) {
    if !background.is_transparent() {
        fill_rect_blended(
            image,
            &state.background_rect(),
            background.with_opacity(state.opacity),
        );
    }
    draw_text(
        image,
        &state.text,
        state.x,
        state.y,
        state.font_size,
        color.with_opacity(state.opacity),
    );
}

#[cfg(test)]
mod tests {
    use super::*;

    fn overlay(animation: TextAnimation) -> TextOverlay {
        // Visible during [2, 5).
        TextOverlay {
            animation,
            ..TextOverlay::new("Hello", 2.0)
        }
    }

    #[test]
    fn test_measure_width() {
        assert!((measure_text_width("abcd", 10.0) - 24.0).abs() < 1e-9);
        assert_eq!(measure_text_width("", 48.0), 0.0);
    }

    #[test]
    fn test_fade_in_opacity_curve() {
        let o = overlay(TextAnimation::FadeIn);
        assert_eq!(text_render_state(&o, 2.0).unwrap().opacity, 0.0);
        assert!((text_render_state(&o, 2.25).unwrap().opacity - 0.5).abs() < 1e-9);
        assert_eq!(text_render_state(&o, 2.5).unwrap().opacity, 1.0);
        assert_eq!(text_render_state(&o, 4.99).unwrap().opacity, 1.0);
        assert!(text_render_state(&o, 5.0).is_none());
        assert!(text_render_state(&o, 1.99).is_none());
    }

    #[test]
    fn test_slide_in_offset() {
        let o = overlay(TextAnimation::SlideIn);
        let width = measure_text_width("Hello", 48.0);
        let start = text_render_state(&o, 2.0).unwrap();
        assert!((start.x - (100.0 - width)).abs() < 1e-9);
        let mid = text_render_state(&o, 2.25).unwrap();
        assert!((mid.x - (100.0 - width / 2.0)).abs() < 1e-9);
        assert_eq!(text_render_state(&o, 3.0).unwrap().x, 100.0);
    }

    #[test]
    fn test_zoom_in_scale() {
        let o = overlay(TextAnimation::ZoomIn);
        assert_eq!(text_render_state(&o, 2.0).unwrap().font_size, 24.0);
        assert_eq!(text_render_state(&o, 2.25).unwrap().font_size, 36.0);
        assert_eq!(text_render_state(&o, 4.0).unwrap().font_size, 48.0);
    }

    #[test]
    fn test_typewriter_prefix() {
        let o = overlay(TextAnimation::Typewriter);
        assert_eq!(text_render_state(&o, 2.0).unwrap().text, "");
        // p = 1.5 / 3 = 0.5 -> floor(5 * 0.5) = 2
        assert_eq!(text_render_state(&o, 3.5).unwrap().text, "He");
        assert_eq!(text_render_state(&o, 4.99).unwrap().text, "Hell");
    }

    #[test]
    fn test_background_rect_padding() {
        let o = overlay(TextAnimation::None);
        let state = text_render_state(&o, 3.0).unwrap();
        let bg = state.background_rect();
        assert_eq!(bg, Rect::new(95.0, 95.0, 5.0 * 48.0 * 0.6 + 10.0, 58.0));
    }

    #[test]
    fn test_blended_fill_mixes_with_background() {
        let mut image = RgbaImage::from_pixel(4, 4, Rgba([0, 0, 0, 255]));
        fill_rect_blended(
            &mut image,
            &Rect::new(0.0, 0.0, 2.0, 2.0),
            Color::WHITE.with_opacity(0.5),
        );
        let mixed = image.get_pixel(0, 0).0;
        assert!((120..=136).contains(&mixed[0]), "{mixed:?}");
        assert_eq!(mixed[3], 255);
        assert_eq!(image.get_pixel(3, 3).0, [0, 0, 0, 255]);
        assert_eq!(image.dimensions(), (4, 4));
    }

    #[test]
    fn test_transparent_background_is_skipped() {
        let mut image = RgbaImage::from_pixel(400, 300, Rgba([0, 0, 0, 255]));
        let o = overlay(TextAnimation::None);
        assert!(draw_text_overlay(&mut image, &o, 3.0));
        // Padding area left of the first glyph stays black.
        assert_eq!(image.get_pixel(97, 120).0, [0, 0, 0, 255]);
        // Inside the first glyph block.
        assert_eq!(image.get_pixel(112, 120).0, [255, 255, 255, 255]);
    }

    #[test]
    fn test_opaque_background_is_drawn() {
        let mut image = RgbaImage::from_pixel(400, 300, Rgba([0, 0, 0, 255]));
        let o = TextOverlay {
            background_color: Color::rgb(0, 0, 255),
            ..overlay(TextAnimation::None)
        };
        draw_text_overlay(&mut image, &o, 3.0);
        assert_eq!(image.get_pixel(97, 97).0, [0, 0, 255, 255]);
    }
}
