//! Track library: supported formats, directory scanning and the selector
//! that owns the ordered track list and the current selection.

mod format;
mod scan;
mod selector;

pub use format::{Format, is_audio_file, is_hidden};
pub use scan::{ensure_root, scan};
pub use selector::{MusicSelector, SelectError};

#[cfg(test)]
mod tests;
