//! Application model type: `App`.

use std::fmt::Display;
use std::path::{Path, PathBuf};

/// The main application model.
pub struct App {
    /// Highlighted row in the track list.
    pub cursor: usize,
    /// Keep the cursor on the playing track until the user moves it.
    pub follow_playback: bool,
    /// Library root, used to shorten displayed paths.
    pub root: PathBuf,
    /// Whether live reload is active.
    pub watching: bool,
    pub last_error: Option<String>,
}

impl App {
    pub fn new(root: PathBuf) -> Self {
        Self {
            cursor: 0,
            follow_playback: true,
            root,
            watching: false,
            last_error: None,
        }
    }

    /// Move the cursor down, wrapping at the end of a `len`-item list.
    pub fn next(&mut self, len: usize) {
        self.follow_playback = false;
        if len == 0 {
            self.cursor = 0;
            return;
        }
        self.cursor = (self.cursor + 1) % len;
    }

    /// Move the cursor up, wrapping at the top.
    pub fn prev(&mut self, len: usize) {
        self.follow_playback = false;
        if len == 0 {
            self.cursor = 0;
            return;
        }
        self.cursor = if self.cursor == 0 {
            len - 1
        } else {
            self.cursor - 1
        };
    }

    /// Called every frame: keep the cursor inside the list and on the
    /// playing track while following.
    pub fn sync(&mut self, playing: Option<usize>, len: usize) {
        if self.follow_playback {
            if let Some(idx) = playing {
                self.cursor = idx;
            }
        }
        if self.cursor >= len {
            self.cursor = len.saturating_sub(1);
        }
    }

    pub fn follow_playback_on(&mut self) {
        self.follow_playback = true;
    }

    pub fn record_error(&mut self, err: impl Display) {
        self.last_error = Some(err.to_string());
    }

    pub fn clear_error(&mut self) {
        self.last_error = None;
    }

    /// Path shown in the list: relative to the root when possible.
    pub fn display_name(&self, path: &Path) -> String {
        path.strip_prefix(&self.root)
            .unwrap_or(path)
            .display()
            .to_string()
    }
}
