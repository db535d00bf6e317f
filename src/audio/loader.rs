//! Opening audio files into [`DecodedStream`]s.
//!
//! The codec is picked once from the file extension and matched
//! exhaustively; rodio's per-format decoders do the actual work. Samples
//! are decoded lazily as the output pulls them, so loading a track only
//! reads its headers.

use std::fs::File;
use std::io::BufReader;
use std::path::Path;
use std::time::Duration;

use rodio::{Decoder, Source};
use tracing::debug;

use crate::library::Format;

use super::error::LoadError;
use super::stream::DecodedStream;

pub(super) type FileDecoder = Decoder<BufReader<File>>;

#[derive(Debug, Default, Clone, Copy)]
pub struct StreamLoader;

impl StreamLoader {
    pub fn new() -> Self {
        Self
    }

    /// Open `path` and return a stream over its decoded frames.
    ///
    /// The returned stream owns the file handle. On every error path the
    /// handle is closed before returning.
    pub fn load_stream(&self, path: &Path) -> Result<DecodedStream, LoadError> {
        let file = open(path)?;

        let Some(format) = Format::from_path(path) else {
            drop(file);
            return Err(LoadError::UnsupportedFormat(path.to_path_buf()));
        };

        let decoder = decoder_for(file, path, format)?;
        let channels = decoder.channels().max(1);
        let sample_rate = decoder.sample_rate();
        let length = match decoder.total_duration() {
            Some(d) => frames_in(d, sample_rate),
            // Some codecs cannot tell up front; count without keeping samples.
            None => count_frames(path, format, channels)?,
        };

        debug!(
            "opened {} as {}: {length} frames, {channels} ch @ {sample_rate} Hz",
            path.display(),
            format.extension(),
        );
        Ok(DecodedStream::new(
            decoder,
            path.to_path_buf(),
            format,
            channels,
            sample_rate,
            length,
        ))
    }
}

/// Open and decode `path` from the start.
pub(super) fn decode_file(path: &Path, format: Format) -> Result<FileDecoder, LoadError> {
    decoder_for(open(path)?, path, format)
}

fn open(path: &Path) -> Result<File, LoadError> {
    File::open(path).map_err(|source| LoadError::Open {
        path: path.to_path_buf(),
        source,
    })
}

fn decoder_for(file: File, path: &Path, format: Format) -> Result<FileDecoder, LoadError> {
    let reader = BufReader::new(file);
    let decoded = match format {
        Format::Wav => Decoder::new_wav(reader),
        Format::Ogg => Decoder::new_vorbis(reader),
        Format::Mp3 => Decoder::new_mp3(reader),
    };
    decoded.map_err(|source| LoadError::Decode {
        path: path.to_path_buf(),
        source,
    })
}

fn count_frames(path: &Path, format: Format, channels: u16) -> Result<u64, LoadError> {
    let samples = decode_file(path, format)?.count() as u64;
    Ok(samples / u64::from(channels))
}

fn frames_in(d: Duration, sample_rate: u32) -> u64 {
    (d.as_secs_f64() * f64::from(sample_rate)).round() as u64
}
