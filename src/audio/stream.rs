//! Decoded file streams and the loop wrapper handed to the backend.
//!
//! Positions and lengths are measured in frames: one frame holds one sample
//! per channel.

use std::fmt;
use std::io::{self, Seek, SeekFrom};
use std::path::PathBuf;
use std::time::Duration;

use rodio::Source;
use tracing::warn;

use crate::library::Format;

use super::error::LoadError;
use super::loader::{self, FileDecoder};

/// Interleaved `f32` samples decoded on demand from one open file.
pub struct DecodedStream {
    decoder: FileDecoder,
    path: PathBuf,
    format: Format,
    channels: u16,
    sample_rate: u32,
    length: u64,
    /// Samples (not frames) delivered since the start.
    pos: u64,
}

impl fmt::Debug for DecodedStream {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DecodedStream")
            .field("path", &self.path)
            .field("format", &self.format)
            .field("channels", &self.channels)
            .field("sample_rate", &self.sample_rate)
            .field("length", &self.length)
            .field("pos", &self.pos)
            .finish_non_exhaustive()
    }
}

impl DecodedStream {
    pub(super) fn new(
        decoder: FileDecoder,
        path: PathBuf,
        format: Format,
        channels: u16,
        sample_rate: u32,
        length: u64,
    ) -> Self {
        Self {
            decoder,
            path,
            format,
            channels: channels.max(1),
            sample_rate,
            length,
            pos: 0,
        }
    }

    /// Total length in frames.
    pub fn length(&self) -> u64 {
        self.length
    }

    pub fn frame_position(&self) -> u64 {
        self.pos / u64::from(self.channels)
    }

    pub fn duration(&self) -> Duration {
        if self.sample_rate == 0 {
            return Duration::ZERO;
        }
        Duration::from_secs_f64(self.length as f64 / f64::from(self.sample_rate))
    }

    /// Fill `buf` from the cursor, returning how many samples were written.
    pub fn read(&mut self, buf: &mut [f32]) -> usize {
        let mut n = 0;
        for slot in buf.iter_mut() {
            match self.next() {
                Some(s) => {
                    *slot = s;
                    n += 1;
                }
                None => break,
            }
        }
        n
    }

    /// Return to the first frame. Codecs that cannot seek are reopened.
    pub fn rewind(&mut self) -> Result<(), LoadError> {
        if self.decoder.try_seek(Duration::ZERO).is_err() {
            self.decoder = loader::decode_file(&self.path, self.format)?;
        }
        self.pos = 0;
        Ok(())
    }
}

impl Seek for DecodedStream {
    /// Seek in frames. Positions past the end clamp to the end.
    fn seek(&mut self, pos: SeekFrom) -> io::Result<u64> {
        let len = i128::from(self.length);
        let target = match pos {
            SeekFrom::Start(n) => i128::from(n),
            SeekFrom::Current(d) => i128::from(self.frame_position()) + i128::from(d),
            SeekFrom::End(d) => len + i128::from(d),
        };
        if target < 0 {
            return Err(io::Error::new(
                io::ErrorKind::InvalidInput,
                "seek before start of stream",
            ));
        }

        let frame = target.min(len) as u64;
        if frame == 0 {
            self.rewind().map_err(|e| io::Error::other(e.to_string()))?;
            return Ok(0);
        }
        let at = Duration::from_secs_f64(frame as f64 / f64::from(self.sample_rate.max(1)));
        self.decoder
            .try_seek(at)
            .map_err(|e| io::Error::other(e.to_string()))?;
        self.pos = frame * u64::from(self.channels);
        Ok(frame)
    }
}

impl Iterator for DecodedStream {
    type Item = f32;

    fn next(&mut self) -> Option<f32> {
        let s = self.decoder.next()?;
        self.pos += 1;
        Some(s)
    }
}

impl Source for DecodedStream {
    fn current_span_len(&self) -> Option<usize> {
        self.decoder.current_span_len()
    }

    fn channels(&self) -> u16 {
        self.channels
    }

    fn sample_rate(&self) -> u32 {
        self.sample_rate
    }

    fn total_duration(&self) -> Option<Duration> {
        Some(self.duration())
    }
}

/// Repeats the first `length` frames of a stream forever.
///
/// A zero-length loop ends immediately instead of spinning.
pub struct InfiniteLoop {
    inner: DecodedStream,
    length: u64,
}

impl InfiniteLoop {
    pub fn new(inner: DecodedStream, length: u64) -> Self {
        let length = length.min(inner.length());
        Self { inner, length }
    }

    pub fn length(&self) -> u64 {
        self.length
    }

    fn end_sample(&self) -> u64 {
        self.length * u64::from(self.inner.channels)
    }

    fn wrap(&mut self) -> Option<()> {
        match self.inner.rewind() {
            Ok(()) => Some(()),
            Err(e) => {
                warn!("cannot loop {}: {e}", self.inner.path.display());
                None
            }
        }
    }
}

impl Iterator for InfiniteLoop {
    type Item = f32;

    fn next(&mut self) -> Option<f32> {
        if self.length == 0 {
            return None;
        }
        if self.inner.pos >= self.end_sample() {
            self.wrap()?;
        }
        match self.inner.next() {
            Some(s) => Some(s),
            // The codec delivered fewer frames than it reported.
            None if self.inner.pos > 0 => {
                self.wrap()?;
                self.inner.next()
            }
            None => None,
        }
    }
}

impl Source for InfiniteLoop {
    fn current_span_len(&self) -> Option<usize> {
        if self.length == 0 {
            return Some(0);
        }
        // Spans end at the wrap point so the mixer never straddles it.
        let end = self.end_sample();
        let to_wrap = if self.inner.pos >= end {
            end
        } else {
            end - self.inner.pos
        } as usize;
        match self.inner.current_span_len() {
            Some(n) if n > 0 => Some(n.min(to_wrap)),
            _ => Some(to_wrap),
        }
    }

    fn channels(&self) -> u16 {
        self.inner.channels
    }

    fn sample_rate(&self) -> u32 {
        self.inner.sample_rate
    }

    fn total_duration(&self) -> Option<Duration> {
        None
    }
}
