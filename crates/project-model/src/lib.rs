//! Cutframe Project Model
//!
//! Defines the core data contracts for Cutframe projects:
//! - **Clips:** Video, audio, and image media placed on timeline tracks
//! - **Effects:** Per-clip pixel adjustments, at most one per kind
//! - **Text overlays:** Timed captions with font, color, and animation
//! - **Edits:** Pure transitions from one project value to the next
//! - **Store:** Key/value persistence of project snapshots
//!
//! Times are in seconds on the timeline. Positions are canvas pixels.

pub mod audio;
pub mod clip;
pub mod color;
pub mod edit;
pub mod effect;
pub mod geometry;
pub mod overlay;
pub mod project;
pub mod store;

pub use audio::*;
pub use clip::*;
pub use color::*;
pub use edit::*;
pub use effect::*;
pub use geometry::*;
pub use overlay::*;
pub use project::*;
pub use store::*;

/// Generate a fresh random identifier.
pub fn new_id() -> String {
    uuid::Uuid::new_v4().to_string()
}
