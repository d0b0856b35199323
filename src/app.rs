//! Application module: exposes the app model used by the TUI and runtime.
//!
//! The `App` model lives in `app::model` and holds the current view, the
//! library cursor and the player bar mode.

mod model;

pub use model::*;
