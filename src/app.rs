//! Application module: the view-side model used by the TUI and runtime.
//!
//! `App` lives in `app::model` and holds what the engine does not: the list
//! cursor, whether it follows playback, and the last error to show.

mod model;

pub use model::*;

#[cfg(test)]
mod tests;
