//! Error types for loading and playback

use std::path::PathBuf;

use rodio::decoder::DecoderError;
use thiserror::Error;

use crate::library::SelectError;

/// Failures while turning a file into a decoded stream.
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("failed to open audio file {}: {source}", path.display())]
    Open {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("unsupported audio format: {}", .0.display())]
    UnsupportedFormat(PathBuf),

    #[error("failed to decode audio {}: {source}", path.display())]
    Decode {
        path: PathBuf,
        #[source]
        source: DecoderError,
    },
}

/// Failures reported by an audio backend.
#[derive(Debug, Error)]
pub enum AudioError {
    #[error("no audio output device available: {0}")]
    OutputUnavailable(String),
}

/// Playback errors surfaced by the engine.
#[derive(Debug, Error)]
pub enum PlaybackError {
    /// The library is empty or nothing is selected.
    #[error("no music available")]
    NoMusicAvailable,

    #[error("index out of range: {index} (count: {len})")]
    OutOfRange { index: usize, len: usize },

    #[error(transparent)]
    Load(#[from] LoadError),

    #[error(transparent)]
    Audio(#[from] AudioError),
}

impl From<SelectError> for PlaybackError {
    fn from(e: SelectError) -> Self {
        match e {
            SelectError::OutOfRange { index, len } => Self::OutOfRange { index, len },
        }
    }
}

pub type Result<T> = std::result::Result<T, PlaybackError>;
