//! Per-pixel clip effects on an RGBA raster.
//!
//! Every transform touches the RGB channels of pixels inside a region and
//! leaves alpha untouched. Results are rounded and clamped to `0..=255`.

use cutframe_project_model::effect::{Effect, EffectKind};
use cutframe_project_model::geometry::Rect;
use image::RgbaImage;

/// Pixel-aligned region of a raster: `(x, y)` top-left, then size.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PixelRegion {
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
}

impl PixelRegion {
    /// The whole raster.
    pub fn full(image: &RgbaImage) -> Self {
        Self {
            x: 0,
            y: 0,
            width: image.width(),
            height: image.height(),
        }
    }

    /// Snap `rect` to pixels inside a `width x height` raster.
    pub fn from_rect(rect: &Rect, width: u32, height: u32) -> Option<Self> {
        rect.to_pixel_bounds(width, height)
            .map(|(x, y, width, height)| Self {
                x,
                y,
                width,
                height,
            })
    }

    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }

    fn rows(&self) -> std::ops::Range<u32> {
        self.y..self.y + self.height
    }

    fn cols(&self) -> std::ops::Range<u32> {
        self.x..self.x + self.width
    }

    /// Clip to the bounds of `image`.
    fn clamp_to(&self, image: &RgbaImage) -> Self {
        let x = self.x.min(image.width());
        let y = self.y.min(image.height());
        Self {
            x,
            y,
            width: self.width.min(image.width() - x),
            height: self.height.min(image.height() - y),
        }
    }
}

fn clamp_channel(value: f64) -> u8 {
    value.round().clamp(0.0, 255.0) as u8
}

fn luma(px: [u8; 3]) -> f64 {
    0.299 * px[0] as f64 + 0.587 * px[1] as f64 + 0.114 * px[2] as f64
}

/// Add `(intensity - 50) * 2.55` to each channel.
pub fn brightness(px: [u8; 3], intensity: f64) -> [u8; 3] {
    let adjustment = (intensity - 50.0) * 2.55;
    px.map(|c| clamp_channel(c as f64 + adjustment))
}

/// Contrast around mid-grey; intensity 0 is the identity.
pub fn contrast(px: [u8; 3], intensity: f64) -> [u8; 3] {
    let factor = (259.0 * (intensity + 255.0)) / (255.0 * (259.0 - intensity));
    px.map(|c| clamp_channel(factor * (c as f64 - 128.0) + 128.0))
}

/// Rec. 601 luma replicated to all channels.
pub fn grayscale(px: [u8; 3]) -> [u8; 3] {
    let gray = clamp_channel(luma(px));
    [gray, gray, gray]
}

/// Scale chroma by `intensity / 50`; 50 is the identity and 0 is grayscale.
pub fn saturation(px: [u8; 3], intensity: f64) -> [u8; 3] {
    let s = intensity / 50.0;
    let y = luma(px);
    px.map(|c| clamp_channel(y + (c as f64 - y) * s))
}

/// Rotate hue by `degrees` in YIQ space.
pub fn hue_rotate(px: [u8; 3], degrees: f64) -> [u8; 3] {
    if degrees.rem_euclid(360.0) == 0.0 {
        return px;
    }
    let [r, g, b] = px.map(|c| c as f64);
    let (sin, cos) = degrees.to_radians().sin_cos();

    let y = 0.299 * r + 0.587 * g + 0.114 * b;
    let i = 0.596 * r - 0.274 * g - 0.322 * b;
    let q = 0.211 * r - 0.523 * g + 0.312 * b;

    let i2 = i * cos - q * sin;
    let q2 = i * sin + q * cos;

    [
        clamp_channel(y + 0.956 * i2 + 0.621 * q2),
        clamp_channel(y - 0.272 * i2 - 0.647 * q2),
        clamp_channel(y - 1.106 * i2 + 1.703 * q2),
    ]
}

/// Sepia tone mixed with the source by `intensity / 100`.
pub fn sepia(px: [u8; 3], intensity: f64) -> [u8; 3] {
    let amount = (intensity / 100.0).clamp(0.0, 1.0);
    let [r, g, b] = px.map(|c| c as f64);
    let toned = [
        0.393 * r + 0.769 * g + 0.189 * b,
        0.349 * r + 0.686 * g + 0.168 * b,
        0.272 * r + 0.534 * g + 0.131 * b,
    ];
    let mut out = [0u8; 3];
    for (i, channel) in out.iter_mut().enumerate() {
        let source = px[i] as f64;
        *channel = clamp_channel(source + (toned[i].min(255.0) - source) * amount);
    }
    out
}

/// Box blur radius in pixels for a blur intensity.
pub fn blur_radius(intensity: f64) -> u32 {
    (intensity / 20.0).round().clamp(0.0, 5.0) as u32
}

fn map_rgb(image: &mut RgbaImage, region: PixelRegion, f: impl Fn([u8; 3]) -> [u8; 3]) {
    for y in region.rows() {
        for x in region.cols() {
            let pixel = image.get_pixel_mut(x, y);
            let [r, g, b, a] = pixel.0;
            let [r, g, b] = f([r, g, b]);
            pixel.0 = [r, g, b, a];
        }
    }
}

/// Separable box blur of the RGB channels inside `region`.
///
/// Samples outside `region` are never read; windows shrink at its edges.
pub fn box_blur(image: &mut RgbaImage, region: PixelRegion, radius: u32) {
    let region = region.clamp_to(image);
    if radius == 0 || region.is_empty() {
        return;
    }
    let (w, h) = (region.width as usize, region.height as usize);
    let r = radius as usize;

    let mut buf: Vec<[f64; 3]> = Vec::with_capacity(w * h);
    for y in region.rows() {
        for x in region.cols() {
            let p = image.get_pixel(x, y).0;
            buf.push([p[0] as f64, p[1] as f64, p[2] as f64]);
        }
    }

    let mut tmp = vec![[0.0f64; 3]; w * h];
    for row in 0..h {
        for col in 0..w {
            let lo = col.saturating_sub(r);
            let hi = (col + r).min(w - 1);
            let mut sum = [0.0; 3];
            for k in lo..=hi {
                let s = buf[row * w + k];
                sum[0] += s[0];
                sum[1] += s[1];
                sum[2] += s[2];
            }
            let n = (hi - lo + 1) as f64;
            tmp[row * w + col] = [sum[0] / n, sum[1] / n, sum[2] / n];
        }
    }

    for col in 0..w {
        for row in 0..h {
            let lo = row.saturating_sub(r);
            let hi = (row + r).min(h - 1);
            let mut sum = [0.0; 3];
            for k in lo..=hi {
                let s = tmp[k * w + col];
                sum[0] += s[0];
                sum[1] += s[1];
                sum[2] += s[2];
            }
            let n = (hi - lo + 1) as f64;
            buf[row * w + col] = [sum[0] / n, sum[1] / n, sum[2] / n];
        }
    }

    for (i, value) in buf.iter().enumerate() {
        let x = region.x + (i % w) as u32;
        let y = region.y + (i / w) as u32;
        let pixel = image.get_pixel_mut(x, y);
        pixel.0[0] = clamp_channel(value[0]);
        pixel.0[1] = clamp_channel(value[1]);
        pixel.0[2] = clamp_channel(value[2]);
    }
}

/// Apply one effect to `region`.
pub fn apply_effect(image: &mut RgbaImage, region: PixelRegion, effect: &Effect) {
    let region = region.clamp_to(image);
    if region.is_empty() {
        return;
    }
    let i = effect.intensity;
    match effect.kind {
        EffectKind::Brightness => map_rgb(image, region, |px| brightness(px, i)),
        EffectKind::Contrast => map_rgb(image, region, |px| contrast(px, i)),
        EffectKind::Saturation => map_rgb(image, region, |px| saturation(px, i)),
        EffectKind::Hue => map_rgb(image, region, |px| hue_rotate(px, i)),
        EffectKind::Grayscale if effect.is_active() => map_rgb(image, region, grayscale),
        EffectKind::Sepia if effect.is_active() => map_rgb(image, region, |px| sepia(px, i)),
        EffectKind::Blur if effect.is_active() => box_blur(image, region, blur_radius(i)),
        EffectKind::Grayscale | EffectKind::Sepia | EffectKind::Blur => {}
    }
}

/// Apply effects in order; each reads the previous one's output.
pub fn apply_effects(image: &mut RgbaImage, region: PixelRegion, effects: &[Effect]) {
    for effect in effects {
        apply_effect(image, region, effect);
    }
}
