//! The playback state machine.
//!
//! `PlaybackEngine` owns the one open track handle and advances
//! `Playing -> FadingOut -> Interval -> Playing` from a fixed-rate tick.
//! It must be driven from a single owner (the host loop). Other threads
//! hand it new file lists through a [`FileListSender`], which the owner
//! applies with [`PlaybackEngine::apply_pending_updates`].

use std::path::{Path, PathBuf};
use std::sync::mpsc::{self, Receiver, Sender};
use std::time::Duration;

use tracing::{debug, info, warn};

use crate::library::MusicSelector;

use super::backend::{AudioBackend, Player};
use super::error::{PlaybackError, Result};
use super::loader::StreamLoader;
use super::stream::InfiniteLoop;
use super::types::{
    MAX_INTERVAL_SECONDS, MAX_LOOP_MINUTES, MIN_INTERVAL_SECONDS, MIN_LOOP_MINUTES,
    PlaybackState, Timing, fade_volume,
};

/// The open (stream, player) pair. The stream lives inside the player.
struct Track<P> {
    path: PathBuf,
    player: P,
    duration: Duration,
}

/// Cloneable handle for delivering rescanned file lists from any thread.
#[derive(Clone)]
pub struct FileListSender {
    tx: Sender<Vec<PathBuf>>,
}

impl FileListSender {
    pub fn send(&self, files: Vec<PathBuf>) {
        if self.tx.send(files).is_err() {
            debug!("playback engine is gone; dropping file list update");
        }
    }
}

pub struct PlaybackEngine<B: AudioBackend> {
    backend: B,
    loader: StreamLoader,
    selector: MusicSelector,
    current: Option<Track<B::Player>>,

    state: PlaybackState,
    counter: u64,
    paused: bool,
    volume: f64,
    timing: Timing,

    updates_tx: Sender<Vec<PathBuf>>,
    updates_rx: Receiver<Vec<PathBuf>>,
}

impl<B: AudioBackend> PlaybackEngine<B> {
    pub fn new(backend: B, timing: Timing) -> Self {
        let (updates_tx, updates_rx) = mpsc::channel();
        let mut timing = timing;
        timing.loop_duration_minutes = clamp_setting(
            timing.loop_duration_minutes,
            MIN_LOOP_MINUTES,
            MAX_LOOP_MINUTES,
        )
        .unwrap_or(MIN_LOOP_MINUTES);
        timing.interval_seconds = clamp_setting(
            timing.interval_seconds,
            MIN_INTERVAL_SECONDS,
            MAX_INTERVAL_SECONDS,
        )
        .unwrap_or(MIN_INTERVAL_SECONDS);

        Self {
            backend,
            loader: StreamLoader::new(),
            selector: MusicSelector::new(),
            current: None,
            state: PlaybackState::Stopped,
            counter: 0,
            paused: false,
            volume: 1.0,
            timing,
            updates_tx,
            updates_rx,
        }
    }

    pub fn file_list_sender(&self) -> FileListSender {
        FileListSender {
            tx: self.updates_tx.clone(),
        }
    }

    /// Apply the newest file list queued through a [`FileListSender`].
    ///
    /// Older queued lists are superseded and skipped. Returns `Ok(true)` when
    /// a list was applied.
    pub fn apply_pending_updates(&mut self) -> Result<bool> {
        let mut latest = None;
        while let Ok(files) = self.updates_rx.try_recv() {
            latest = Some(files);
        }
        match latest {
            Some(files) => self.update_music_files(files).map(|()| true),
            None => Ok(false),
        }
    }

    /// Replace the track list and reload when the selection moved.
    ///
    /// When the library becomes empty the open handle is closed and the
    /// engine stops. A stopped engine with a selectable track retries the
    /// load, which is how it recovers from an empty folder or a bad file.
    pub fn update_music_files(&mut self, files: Vec<PathBuf>) -> Result<()> {
        let count = files.len();
        let index_changed = self.selector.update(files);
        let selected = self.selector.current_file();
        debug!(
            "library updated: {count} tracks, selection {:?} (changed: {index_changed})",
            self.selector.current_index()
        );

        let Some(selected) = selected else {
            if index_changed || self.current.is_some() {
                info!("library is empty; stopping playback");
                self.close_current();
                self.enter_stopped();
            }
            return Ok(());
        };

        let loaded_elsewhere = self
            .current
            .as_ref()
            .is_some_and(|t| t.path != selected);
        if index_changed || loaded_elsewhere || self.current.is_none() {
            return self.load_current();
        }
        Ok(())
    }

    /// Advance one frame. A no-op while paused or without a track.
    pub fn tick(&mut self) -> Result<()> {
        if self.paused || self.current.is_none() {
            return Ok(());
        }

        self.counter += 1;

        match self.state {
            PlaybackState::Stopped => {}
            PlaybackState::Playing => {
                if self.counter >= self.timing.loop_frames() {
                    debug!("loop duration reached; fading out");
                    self.enter(PlaybackState::FadingOut);
                }
            }
            PlaybackState::FadingOut => {
                let fade_frames = self.timing.fade_frames();
                if self.counter >= fade_frames {
                    if let Some(t) = self.current.as_mut() {
                        t.player.pause();
                    }
                    debug!("fade complete; interval of {}s", self.timing.interval_seconds);
                    self.enter(PlaybackState::Interval);
                } else {
                    self.volume = fade_volume(self.counter, fade_frames);
                    if let Some(t) = self.current.as_mut() {
                        t.player.set_volume(self.volume);
                    }
                }
            }
            PlaybackState::Interval => {
                if self.counter >= self.timing.interval_frames() {
                    self.volume = 1.0;
                    return self.advance();
                }
            }
        }

        Ok(())
    }

    /// Pause or resume the open track. Without a track this does nothing.
    ///
    /// Resuming during the interval keeps the handle silent; only the
    /// counter starts moving again.
    pub fn toggle_pause(&mut self) {
        let Some(t) = self.current.as_mut() else {
            return;
        };

        if self.paused {
            if self.state != PlaybackState::Interval {
                t.player.play();
            }
            self.paused = false;
        } else {
            t.player.pause();
            self.paused = true;
        }
    }

    /// Move to the next track and start it right away, whatever the timer says.
    ///
    /// With a single track this restarts it. Tracks that fail to load are
    /// passed over.
    pub fn skip_to_next(&mut self) -> Result<()> {
        self.volume = 1.0;
        self.advance()
    }

    /// Step forward until a track loads, trying each entry at most once.
    /// When every entry fails the engine is left stopped with the last error.
    fn advance(&mut self) -> Result<()> {
        let attempts = self.selector.len().max(1);
        let mut result = Err(PlaybackError::NoMusicAvailable);
        for _ in 0..attempts {
            self.selector.select_next();
            result = self.load_current();
            match &result {
                Ok(()) | Err(PlaybackError::NoMusicAvailable) => break,
                Err(_) => {}
            }
        }
        result
    }

    /// Select a track explicitly and start it.
    pub fn select_index(&mut self, index: usize) -> Result<()> {
        self.selector.select_index(index)?;
        self.load_current()
    }

    fn load_current(&mut self) -> Result<()> {
        self.close_current();

        let Some(path) = self.selector.current_file() else {
            self.enter_stopped();
            return Err(PlaybackError::NoMusicAvailable);
        };

        match self.open_track(&path) {
            Ok(mut track) => {
                self.volume = 1.0;
                track.player.set_volume(self.volume);
                track.player.play();
                info!("now playing {}", path.display());
                self.current = Some(track);
                self.paused = false;
                self.enter(PlaybackState::Playing);
                Ok(())
            }
            Err(e) => {
                warn!("failed to load {}: {e}", path.display());
                self.enter_stopped();
                Err(e)
            }
        }
    }

    fn open_track(&self, path: &Path) -> Result<Track<B::Player>> {
        let stream = self.loader.load_stream(path)?;
        let duration = stream.duration();
        let length = stream.length();
        let player = self.backend.new_player(InfiniteLoop::new(stream, length))?;
        Ok(Track {
            path: path.to_path_buf(),
            player,
            duration,
        })
    }

    fn close_current(&mut self) {
        if let Some(mut t) = self.current.take() {
            if let Err(e) = t.player.close() {
                warn!("failed to close {}: {e}", t.path.display());
            }
        }
    }

    fn enter(&mut self, state: PlaybackState) {
        self.state = state;
        self.counter = 0;
    }

    fn enter_stopped(&mut self) {
        self.enter(PlaybackState::Stopped);
        self.paused = false;
    }

    /// Close the open handle and stop. Safe to call repeatedly.
    pub fn close(&mut self) -> Result<()> {
        let result = match self.current.take() {
            Some(mut t) => t.player.close().map_err(PlaybackError::from),
            None => Ok(()),
        };
        self.enter_stopped();
        result
    }

    pub fn set_loop_duration_minutes(&mut self, minutes: f64) {
        if let Some(v) = clamp_setting(minutes, MIN_LOOP_MINUTES, MAX_LOOP_MINUTES) {
            self.timing.loop_duration_minutes = v;
        }
    }

    pub fn set_interval_seconds(&mut self, seconds: f64) {
        if let Some(v) = clamp_setting(seconds, MIN_INTERVAL_SECONDS, MAX_INTERVAL_SECONDS) {
            self.timing.interval_seconds = v;
        }
    }

    pub fn loop_duration_minutes(&self) -> f64 {
        self.timing.loop_duration_minutes
    }

    pub fn interval_seconds(&self) -> f64 {
        self.timing.interval_seconds
    }

    pub fn timing(&self) -> Timing {
        self.timing
    }

    pub fn state(&self) -> PlaybackState {
        self.state
    }

    pub fn counter(&self) -> u64 {
        self.counter
    }

    pub fn is_paused(&self) -> bool {
        self.paused
    }

    pub fn volume(&self) -> f64 {
        self.volume
    }

    pub fn has_track(&self) -> bool {
        self.current.is_some()
    }

    /// Path of the open track, which can lag the selection until the next load.
    pub fn current_path(&self) -> Option<&Path> {
        self.current.as_ref().map(|t| t.path.as_path())
    }

    pub fn current_index(&self) -> Option<usize> {
        self.selector.current_index()
    }

    pub fn files(&self) -> Vec<PathBuf> {
        self.selector.files()
    }

    /// Decoded length of the open track (one pass of the loop).
    pub fn track_duration(&self) -> Option<Duration> {
        self.current.as_ref().map(|t| t.duration)
    }

    fn phase_frames(&self) -> u64 {
        match self.state {
            PlaybackState::Stopped => 0,
            PlaybackState::Playing => self.timing.loop_frames(),
            PlaybackState::FadingOut => self.timing.fade_frames(),
            PlaybackState::Interval => self.timing.interval_frames(),
        }
    }

    /// Time spent in the current state.
    pub fn phase_elapsed(&self) -> Duration {
        Duration::from_secs_f64(self.timing.frames_to_secs(self.counter))
    }

    /// Time left before the current state hands over to the next one.
    pub fn phase_remaining(&self) -> Duration {
        let left = self.phase_frames().saturating_sub(self.counter);
        Duration::from_secs_f64(self.timing.frames_to_secs(left))
    }

    /// Fraction of the current state already elapsed, in `[0, 1]`.
    pub fn progress(&self) -> f64 {
        let total = self.phase_frames();
        if total == 0 {
            return 0.0;
        }
        (self.counter as f64 / total as f64).clamp(0.0, 1.0)
    }
}

impl<B: AudioBackend> Drop for PlaybackEngine<B> {
    fn drop(&mut self) {
        if let Err(e) = self.close() {
            warn!("failed to close playback engine: {e}");
        }
    }
}

fn clamp_setting(value: f64, min: f64, max: f64) -> Option<f64> {
    value.is_finite().then(|| value.clamp(min, max))
}
