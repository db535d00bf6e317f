//! The seam between the playback engine and an audio output.
//!
//! The engine only ever talks to [`AudioBackend`] and [`Player`]; the rodio
//! implementation below is the one the binary uses.

use rodio::{OutputStream, OutputStreamBuilder, Sink};

use super::error::AudioError;
use super::stream::InfiniteLoop;

/// Transport controls for one materialized track.
pub trait Player {
    fn play(&mut self);
    fn pause(&mut self);
    fn set_volume(&mut self, volume: f64);
    /// Stop output and release the underlying resources. Called at most once.
    fn close(&mut self) -> Result<(), AudioError>;
}

/// Creates players from decoded loop streams.
pub trait AudioBackend {
    type Player: Player;

    /// Build a paused player for `stream`.
    fn new_player(&self, stream: InfiniteLoop) -> Result<Self::Player, AudioError>;
}

/// Default output device via rodio.
pub struct RodioBackend {
    stream: OutputStream,
}

impl RodioBackend {
    pub fn open_default() -> Result<Self, AudioError> {
        let mut stream = OutputStreamBuilder::open_default_stream()
            .map_err(|e| AudioError::OutputUnavailable(e.to_string()))?;
        // rodio logs to stderr when the stream is dropped, which would land on the TUI.
        stream.log_on_drop(false);
        Ok(Self { stream })
    }
}

impl AudioBackend for RodioBackend {
    type Player = RodioPlayer;

    fn new_player(&self, stream: InfiniteLoop) -> Result<RodioPlayer, AudioError> {
        let sink = Sink::connect_new(self.stream.mixer());
        sink.pause();
        sink.append(stream);
        Ok(RodioPlayer { sink })
    }
}

/// One rodio sink per track.
pub struct RodioPlayer {
    sink: Sink,
}

impl Player for RodioPlayer {
    fn play(&mut self) {
        self.sink.play();
    }

    fn pause(&mut self) {
        self.sink.pause();
    }

    fn set_volume(&mut self, volume: f64) {
        self.sink.set_volume(volume.clamp(0.0, 1.0) as f32);
    }

    fn close(&mut self) -> Result<(), AudioError> {
        self.sink.stop();
        Ok(())
    }
}
