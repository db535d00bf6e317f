//! Configuration loader and schema types.
//!
//! This module exposes the settings that drive playback timing, the library
//! root, the directory watcher and logging, plus helpers to load them.

mod load;
mod schema;

pub use schema::*;
