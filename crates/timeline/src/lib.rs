//! Cutframe Timeline
//!
//! Maps pointer input on the timeline view onto project edits and drives
//! the playback cursor:
//! - **Scale:** pixel <-> time and pixel <-> track conversion, zoom
//! - **Gestures:** pointer events, scriptable as JSONL
//! - **Interaction:** the `Idle -> Dragging -> Idle` drag state machine
//! - **Playback:** cursor advancement with fixed-step or wall-clock ticks

pub mod gesture;
pub mod interaction;
pub mod playback;
pub mod scale;

pub use gesture::*;
pub use interaction::*;
pub use playback::*;
pub use scale::*;
