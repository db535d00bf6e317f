//! Audio-related small types.
//!
//! This module defines the engine's state enum, the timing parameters that
//! turn real-time durations into frame counts, and the fade ramp.

use crate::config::PlaybackSettings;

/// Engine-wide playback state. Exactly one is active at a time.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Default)]
pub enum PlaybackState {
    /// No track handle is open.
    #[default]
    Stopped,
    /// The current track is audible at full volume.
    Playing,
    /// Volume ramps linearly down to silence.
    FadingOut,
    /// Silence before the next track starts.
    Interval,
}

impl PlaybackState {
    pub fn label(self) -> &'static str {
        match self {
            Self::Stopped => "stopped",
            Self::Playing => "playing",
            Self::FadingOut => "fading out",
            Self::Interval => "interval",
        }
    }
}

pub const MIN_LOOP_MINUTES: f64 = 1.0;
pub const MAX_LOOP_MINUTES: f64 = 60.0;
pub const MIN_INTERVAL_SECONDS: f64 = 1.0;
pub const MAX_INTERVAL_SECONDS: f64 = 60.0;

/// Length of the linear fade-out before every interval.
pub const FADE_OUT_SECONDS: f64 = 2.0;

/// Real-time durations, counted in host ticks of `1 / frame_rate` seconds.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Timing {
    pub loop_duration_minutes: f64,
    pub interval_seconds: f64,
    pub frame_rate: u32,
}

impl Default for Timing {
    fn default() -> Self {
        Self::from(&PlaybackSettings::default())
    }
}

impl From<&PlaybackSettings> for Timing {
    fn from(s: &PlaybackSettings) -> Self {
        Self {
            loop_duration_minutes: s.loop_duration_minutes,
            interval_seconds: s.interval_seconds,
            frame_rate: s.frame_rate.max(1),
        }
    }
}

impl Timing {
    fn fps(&self) -> f64 {
        self.frame_rate.max(1) as f64
    }

    /// Ticks of audible play before the fade starts.
    pub fn loop_frames(&self) -> u64 {
        (self.loop_duration_minutes * 60.0 * self.fps()) as u64
    }

    pub fn fade_frames(&self) -> u64 {
        (FADE_OUT_SECONDS * self.fps()) as u64
    }

    pub fn interval_frames(&self) -> u64 {
        (self.interval_seconds * self.fps()) as u64
    }

    pub fn frames_to_secs(&self, frames: u64) -> f64 {
        frames as f64 / self.fps()
    }
}

/// Linear ramp from 1.0 at `counter == 0` to 0.0 at `counter == fade_frames`.
pub fn fade_volume(counter: u64, fade_frames: u64) -> f64 {
    if fade_frames == 0 {
        return 0.0;
    }
    (1.0 - counter as f64 / fade_frames as f64).clamp(0.0, 1.0)
}
