use std::{env, path::PathBuf};

use super::schema::Settings;

/// Configuration loading helpers.
///
/// `Settings::load` tries environment variables first (prefix `INTERMISSION__`), then an
/// optional config file and falls back to struct defaults.
impl Settings {
    /// Load settings from environment and optional config file.
    pub fn load() -> Result<Self, ::config::ConfigError> {
        let config_path = resolve_config_path();

        let mut builder = ::config::Config::builder();

        if let Some(path) = &config_path {
            builder = builder.add_source(::config::File::from(path.as_path()).required(false));
        }

        builder = builder.add_source(
            ::config::Environment::with_prefix("INTERMISSION")
                .separator("__")
                .try_parsing(true),
        );

        let cfg = builder.build()?;
        let settings: Settings = cfg.try_deserialize()?;
        Ok(settings)
    }

    /// Perform basic validation checks on loaded settings.
    pub fn validate(&self) -> Result<(), String> {
        let p = &self.playback;
        if !(1.0..=60.0).contains(&p.loop_duration_minutes) {
            return Err("playback.loop_duration_minutes must be within 1..=60".to_string());
        }
        if !(1.0..=60.0).contains(&p.interval_seconds) {
            return Err("playback.interval_seconds must be within 1..=60".to_string());
        }
        if p.frame_rate == 0 {
            return Err("playback.frame_rate must be >= 1".to_string());
        }
        if self.watcher.debounce_ms == 0 {
            return Err("watcher.debounce_ms must be >= 1".to_string());
        }
        Ok(())
    }
}

/// Resolve the config path from `INTERMISSION_CONFIG_PATH` or XDG defaults.
pub fn resolve_config_path() -> Option<PathBuf> {
    if let Some(p) = env::var_os("INTERMISSION_CONFIG_PATH") {
        return Some(PathBuf::from(p));
    }
    default_config_path()
}

/// Compute the default config path under `$XDG_CONFIG_HOME/intermission/config.toml`
/// or `~/.config/intermission/config.toml` when `XDG_CONFIG_HOME` is not set.
pub fn default_config_path() -> Option<PathBuf> {
    let config_home = if let Some(xdg) = env::var_os("XDG_CONFIG_HOME") {
        Some(PathBuf::from(xdg))
    } else {
        env::var_os("HOME").map(|home| PathBuf::from(home).join(".config"))
    };

    config_home.map(|d| d.join("intermission").join("config.toml"))
}
