use std::path::PathBuf;

use serde::Deserialize;

/// Top-level application settings loaded from `config.toml`.
///
/// File format: TOML
/// Default path (Linux/XDG): `$XDG_CONFIG_HOME/intermission/config.toml` or
/// `~/.config/intermission/config.toml`
///
/// Precedence (highest wins):
/// 1) Environment variables (prefix `INTERMISSION__`, `__` as nested separator)
/// 2) Config file (if present)
/// 3) Struct defaults
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub playback: PlaybackSettings,
    pub library: LibrarySettings,
    pub watcher: WatcherSettings,
    pub logging: LoggingSettings,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct PlaybackSettings {
    /// How long a track plays before the fade-out starts (minutes, 1-60).
    pub loop_duration_minutes: f64,
    /// Silence between the end of a fade and the next track (seconds, 1-60).
    pub interval_seconds: f64,
    /// Ticks per second delivered by the host loop.
    pub frame_rate: u32,
}

impl Default for PlaybackSettings {
    fn default() -> Self {
        Self {
            loop_duration_minutes: 5.0,
            interval_seconds: 10.0,
            frame_rate: 60,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LibrarySettings {
    /// Directory scanned for tracks. Created empty when missing.
    pub root: PathBuf,
    /// Whether to follow symlinks during scanning.
    pub follow_links: bool,
}

impl Default for LibrarySettings {
    fn default() -> Self {
        Self {
            root: PathBuf::from("musics"),
            follow_links: true,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct WatcherSettings {
    /// Watch the library root and rescan on changes.
    pub enabled: bool,
    /// Events for the same path closer together than this collapse into one rescan.
    pub debounce_ms: u64,
}

impl Default for WatcherSettings {
    fn default() -> Self {
        Self {
            enabled: true,
            debounce_ms: 500,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LoggingSettings {
    /// Log file path. The terminal is owned by the UI, so logs never go to stderr.
    pub file: PathBuf,
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            file: PathBuf::from("intermission.log"),
        }
    }
}
