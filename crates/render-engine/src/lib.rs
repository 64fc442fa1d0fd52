//! Cutframe Render Engine
//!
//! Turns a project snapshot into pixels:
//!
//! ```text
//! project ──► compute_composition(t) ──► clip panels (track order)
//!                                             │
//!                                             ├── effects per clip region
//!                                             │
//!                                             ├── text overlays + animation
//!                                             ▼
//!                                       RGBA frame ──► PNG
//! ```
//!
//! Export writes a single blank canvas under the container's extension
//! and reports size and time estimates.

pub mod compositor;
pub mod effects;
pub mod export;
pub mod text;

pub use compositor::*;
pub use effects::{apply_effect, apply_effects, PixelRegion};
pub use export::*;
pub use text::{measure_text_width, text_render_state, TextRenderState};
