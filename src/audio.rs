//! Audio subsystem: decoding files into loopable streams, the backend seam,
//! and the playback engine that drives play/fade/interval timing.

mod backend;
mod engine;
mod error;
mod loader;
mod stream;
mod types;

pub use backend::{AudioBackend, Player, RodioBackend, RodioPlayer};
pub use engine::{FileListSender, PlaybackEngine};
pub use error::{AudioError, LoadError, PlaybackError};
pub use loader::StreamLoader;
pub use stream::{DecodedStream, InfiniteLoop};
pub use types::{FADE_OUT_SECONDS, PlaybackState, Timing, fade_volume};
