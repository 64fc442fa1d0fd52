//! Timeline geometry: converting between view pixels and (track, time).
//!
//! The timeline view lays tracks out as horizontal rows. Time grows to the
//! right at `pixels_per_second_base * zoom` pixels per second. Track `n`
//! occupies rows `[n * track_height, (n + 1) * track_height)`.

use cutframe_common::config::TimelineDefaults;
use cutframe_project_model::clip::Clip;
use cutframe_project_model::geometry::Rect;
use cutframe_project_model::overlay::TextOverlay;
use cutframe_project_model::project::Project;

/// Smallest zoom factor.
pub const MIN_ZOOM: f64 = 0.25;
/// Largest zoom factor.
pub const MAX_ZOOM: f64 = 4.0;
/// Zoom change per step.
pub const ZOOM_STEP: f64 = 0.25;

/// Vertical inset of clip blocks within their track row.
const CLIP_INSET_PX: f64 = 4.0;

/// Minimum drawn width of the track area.
const MIN_CONTENT_WIDTH_PX: f64 = 1000.0;

/// Invalid timeline geometry.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum TimelineError {
    #[error("Invalid timeline geometry: {message}")]
    InvalidGeometry { message: String },
}

/// Pixel/time/track mapping for the timeline view.
#[derive(Debug, Clone, PartialEq)]
pub struct TimelineScale {
    pixels_per_second_base: f64,
    track_height: f64,
    track_count: usize,
    zoom: f64,
}

impl TimelineScale {
    /// Create a scale at zoom 1.0.
    pub fn new(
        pixels_per_second_base: f64,
        track_height: f64,
        track_count: usize,
    ) -> Result<Self, TimelineError> {
        let invalid = |message: String| Err(TimelineError::InvalidGeometry { message });
        if !(pixels_per_second_base.is_finite() && pixels_per_second_base > 0.0) {
            return invalid(format!(
                "pixels per second must be positive, got {pixels_per_second_base}"
            ));
        }
        if !(track_height.is_finite() && track_height > 2.0 * CLIP_INSET_PX) {
            return invalid(format!(
                "track height must exceed {}, got {track_height}",
                2.0 * CLIP_INSET_PX
            ));
        }
        if track_count == 0 {
            return invalid("track count must be at least 1".to_string());
        }
        Ok(Self {
            pixels_per_second_base,
            track_height,
            track_count,
            zoom: 1.0,
        })
    }

    /// Build from configured defaults.
    pub fn from_defaults(defaults: &TimelineDefaults) -> Result<Self, TimelineError> {
        Self::new(
            defaults.pixels_per_second,
            defaults.track_height,
            defaults.track_count,
        )
    }

    pub fn zoom(&self) -> f64 {
        self.zoom
    }

    pub fn track_count(&self) -> usize {
        self.track_count
    }

    pub fn track_height(&self) -> f64 {
        self.track_height
    }

    /// Set the zoom factor, clamped to `[MIN_ZOOM, MAX_ZOOM]`.
    pub fn set_zoom(&mut self, zoom: f64) -> f64 {
        if zoom.is_finite() {
            self.zoom = zoom.clamp(MIN_ZOOM, MAX_ZOOM);
        }
        self.zoom
    }

    pub fn zoom_in(&mut self) -> f64 {
        self.set_zoom(self.zoom + ZOOM_STEP)
    }

    pub fn zoom_out(&mut self) -> f64 {
        self.set_zoom(self.zoom - ZOOM_STEP)
    }

    /// Effective horizontal scale.
    pub fn pixels_per_second(&self) -> f64 {
        self.pixels_per_second_base * self.zoom
    }

    /// Timeline time at a horizontal pixel offset.
    pub fn time_at(&self, px: f64) -> f64 {
        px / self.pixels_per_second()
    }

    /// Horizontal pixel offset of a timeline time.
    pub fn x_for_time(&self, time: f64) -> f64 {
        time * self.pixels_per_second()
    }

    /// Track row under a vertical pixel offset, if within `[0, track_count)`.
    pub fn track_at(&self, py: f64) -> Option<usize> {
        if !py.is_finite() || py < 0.0 {
            return None;
        }
        let track = (py / self.track_height).floor() as usize;
        (track < self.track_count).then_some(track)
    }

    /// Block rectangle of a clip in view pixels.
    pub fn clip_rect(&self, clip: &Clip) -> Rect {
        self.block_rect(clip.start_time, clip.duration, clip.track)
    }

    fn block_rect(&self, start: f64, duration: f64, track: usize) -> Rect {
        Rect::new(
            self.x_for_time(start),
            track as f64 * self.track_height + CLIP_INSET_PX,
            self.x_for_time(duration),
            self.track_height - 2.0 * CLIP_INSET_PX,
        )
    }

    /// Topmost clip under a pointer position. Later clips cover earlier ones.
    pub fn clip_at<'a>(&self, project: &'a Project, px: f64, py: f64) -> Option<&'a Clip> {
        project
            .clips
            .iter()
            .rev()
            .find(|clip| self.clip_rect(clip).contains(px, py))
    }

    /// Drawn width of the track area for a timeline of `duration` seconds.
    pub fn content_width(&self, duration: f64) -> f64 {
        self.x_for_time(duration).max(MIN_CONTENT_WIDTH_PX)
    }

    /// Drawn height of the track area.
    pub fn content_height(&self) -> f64 {
        self.track_count as f64 * self.track_height
    }
}

impl Default for TimelineScale {
    fn default() -> Self {
        Self {
            pixels_per_second_base: 50.0,
            track_height: 60.0,
            track_count: 8,
            zoom: 1.0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cutframe_project_model::clip::MediaKind;
    use cutframe_project_model::edit::add_clip;

    #[test]
    fn test_pixel_time_mapping_respects_zoom() {
        let mut scale = TimelineScale::default();
        assert!((scale.time_at(100.0) - 2.0).abs() < 1e-9);
        scale.set_zoom(2.0);
        assert!((scale.time_at(100.0) - 1.0).abs() < 1e-9);
        assert!((scale.x_for_time(1.0) - 100.0).abs() < 1e-9);
    }

    #[test]
    fn test_track_mapping_bounds() {
        let scale = TimelineScale::default();
        assert_eq!(scale.track_at(0.0), Some(0));
        assert_eq!(scale.track_at(59.9), Some(0));
        assert_eq!(scale.track_at(60.0), Some(1));
        assert_eq!(scale.track_at(479.0), Some(7));
        assert_eq!(scale.track_at(480.0), None);
        assert_eq!(scale.track_at(-1.0), None);
    }

    #[test]
    fn test_zoom_steps_and_clamps() {
        let mut scale = TimelineScale::default();
        for _ in 0..20 {
            scale.zoom_in();
        }
        assert!((scale.zoom() - MAX_ZOOM).abs() < 1e-9);
        for _ in 0..40 {
            scale.zoom_out();
        }
        assert!((scale.zoom() - MIN_ZOOM).abs() < 1e-9);
        scale.zoom_in();
        assert!((scale.zoom() - 0.5).abs() < 1e-9);
    }

    #[test]
    fn test_invalid_geometry_is_rejected() {
        assert!(TimelineScale::new(0.0, 60.0, 8).is_err());
        assert!(TimelineScale::new(50.0, 4.0, 8).is_err());
        assert!(TimelineScale::new(50.0, 60.0, 0).is_err());
    }

    #[test]
    fn test_hit_testing_prefers_later_clips() {
        let scale = TimelineScale::default();
        let a = Clip::new("a", MediaKind::Video, "a", 10.0);
        let b = Clip::new("b", MediaKind::Video, "b", 10.0);
        let b_id = b.id.clone();
        let project = add_clip(&Project::new("p"), a, 0, 0.0).unwrap();
        let project = add_clip(&project, b, 0, 2.0).unwrap();

        // x = 150px -> 3s, inside both; y = 30 -> track 0 block.
        assert_eq!(scale.clip_at(&project, 150.0, 30.0).unwrap().id, b_id);
        // Inset gap at the top of the row is empty.
        assert!(scale.clip_at(&project, 150.0, 2.0).is_none());
        // Beyond both clips.
        assert!(scale.clip_at(&project, 700.0, 30.0).is_none());
    }

    #[test]
    fn test_content_width_has_minimum() {
        let scale = TimelineScale::default();
        assert!((scale.content_width(2.0) - 1000.0).abs() < 1e-9);
        assert!((scale.content_width(40.0) - 2000.0).abs() < 1e-9);
        assert!((scale.content_height() - 480.0).abs() < 1e-9);
    }
}
