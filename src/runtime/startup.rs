use std::path::PathBuf;

use tracing::{info, warn};

use crate::audio::{PlaybackEngine, PlaybackError, RodioBackend, Timing};
use crate::config;
use crate::library;
use crate::watcher::{DirectoryWatcher, WatchOptions};

/// Everything the event loop drives.
pub struct Session {
    pub root: PathBuf,
    pub engine: PlaybackEngine<RodioBackend>,
    pub watcher: Option<DirectoryWatcher>,
    /// Error from the initial load, shown until the first successful command.
    pub startup_error: Option<String>,
}

pub fn start(settings: &config::Settings) -> Result<Session, Box<dyn std::error::Error>> {
    let root = library::ensure_root(&settings.library.root)?;
    let files = library::scan(&root, settings.library.follow_links)?;
    info!("library {}: {} tracks", root.display(), files.len());

    let backend = RodioBackend::open_default()?;
    let mut engine = PlaybackEngine::new(backend, Timing::from(&settings.playback));

    // An empty or broken library is not fatal; the watcher may fix it later.
    let startup_error = match engine.update_music_files(files) {
        Ok(()) if !engine.has_track() => Some(PlaybackError::NoMusicAvailable.to_string()),
        Ok(()) => None,
        Err(e) => Some(e.to_string()),
    };

    let watcher = if settings.watcher.enabled {
        start_watcher(&root, settings, &engine)
    } else {
        info!("live reload disabled");
        None
    };

    Ok(Session {
        root,
        engine,
        watcher,
        startup_error,
    })
}

fn start_watcher(
    root: &std::path::Path,
    settings: &config::Settings,
    engine: &PlaybackEngine<RodioBackend>,
) -> Option<DirectoryWatcher> {
    let options = WatchOptions::from_settings(&settings.watcher, settings.library.follow_links);
    match DirectoryWatcher::watch(root, options) {
        Ok(watcher) => {
            let sender = engine.file_list_sender();
            watcher.add_handler(move |files| sender.send(files));
            Some(watcher)
        }
        Err(e) => {
            warn!("live reload unavailable: {e}");
            None
        }
    }
}
