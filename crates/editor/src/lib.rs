//! Cutframe Editor
//!
//! Ties the project model, timeline and compositor into an editing
//! session:
//! - **Media:** classify files by MIME type and probe their duration
//! - **History:** bounded undo/redo over project snapshots
//! - **Session:** apply edits, route pointer input, autosave
//! - **Runner:** drive playback on a periodic timer

pub mod error;
pub mod history;
pub mod media;
pub mod runner;
pub mod session;

pub use error::*;
pub use history::*;
pub use media::*;
pub use runner::*;
pub use session::*;
