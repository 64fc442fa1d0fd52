//! Cutframe Common Utilities
//!
//! Shared infrastructure for all Cutframe crates:
//! - Error types and result aliases
//! - Playback clock, tick gating, and timecode formatting
//! - Tracing/logging initialization
//! - Configuration loading

pub mod clock;
pub mod config;
pub mod error;
pub mod logging;

pub use clock::*;
pub use config::*;
pub use error::*;
