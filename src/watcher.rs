//! Filesystem watcher for the library root
//!
//! Watches the root recursively, lets the debouncer collapse bursts of
//! events for the same path, rescans the whole root on each relevant batch
//! and hands the new track list to every registered handler.
//!
//! Handlers run on a dedicated dispatch thread, so a slow handler never
//! holds up event delivery.
//!
//! # Platform Support
//!
//! - Windows: `ReadDirectoryChangesW`
//! - macOS: `FSEvents`
//! - Linux: `inotify`

mod filter;

use std::io;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc::{self, Receiver, Sender};
use std::sync::{Arc, RwLock};
use std::thread::{self, JoinHandle};
use std::time::Duration;

use notify::{RecommendedWatcher, RecursiveMode};
use notify_debouncer_full::{DebounceEventResult, Debouncer, RecommendedCache, new_debouncer};
use thiserror::Error;
use tracing::{debug, error, info};

use crate::config::WatcherSettings;
use crate::library;

pub use filter::is_relevant;

/// Default debounce duration in milliseconds
pub const DEFAULT_DEBOUNCE_MS: u64 = 500;

#[derive(Debug, Error)]
pub enum WatchError {
    #[error("failed to create filesystem watcher: {0}")]
    Init(#[source] notify::Error),

    #[error("failed to watch {}: {source}", path.display())]
    Watch {
        path: PathBuf,
        #[source]
        source: notify::Error,
    },

    #[error("failed to prepare {}: {source}", path.display())]
    Directory {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("failed to spawn watcher thread: {0}")]
    Spawn(#[source] io::Error),

    #[error("watcher thread panicked")]
    ThreadPanicked,
}

/// Callback invoked with the full, freshly scanned track list.
pub type ChangeHandler = Arc<dyn Fn(Vec<PathBuf>) + Send + Sync>;

#[derive(Debug, Clone)]
pub struct WatchOptions {
    pub debounce: Duration,
    pub follow_links: bool,
}

impl Default for WatchOptions {
    fn default() -> Self {
        Self {
            debounce: Duration::from_millis(DEFAULT_DEBOUNCE_MS),
            follow_links: true,
        }
    }
}

impl WatchOptions {
    pub fn from_settings(settings: &WatcherSettings, follow_links: bool) -> Self {
        Self {
            debounce: Duration::from_millis(settings.debounce_ms),
            follow_links,
        }
    }
}

/// Messages for the dispatch thread.
enum Signal {
    Rescan,
    Shutdown,
}

pub struct DirectoryWatcher {
    root: PathBuf,
    handlers: Arc<RwLock<Vec<ChangeHandler>>>,
    shutdown: Arc<AtomicBool>,
    signals: Sender<Signal>,
    debouncer: Option<Debouncer<RecommendedWatcher, RecommendedCache>>,
    dispatch_thread: Option<JoinHandle<()>>,
}

impl DirectoryWatcher {
    /// Start watching `root` (created when missing) and everything below it.
    pub fn watch(root: &Path, options: WatchOptions) -> Result<Self, WatchError> {
        let root = library::ensure_root(root).map_err(|source| WatchError::Directory {
            path: root.to_path_buf(),
            source,
        })?;

        let (signals, signal_rx) = mpsc::channel::<Signal>();

        let mut debouncer = {
            let root = root.clone();
            let signals = signals.clone();
            new_debouncer(
                options.debounce,
                None,
                move |result: DebounceEventResult| match result {
                    Ok(events) => {
                        let relevant: Vec<_> = events
                            .iter()
                            .filter(|e| is_relevant(&root, &e.event))
                            .collect();
                        if let Some(first) = relevant.first() {
                            debug!(
                                "change detected: {:?} {:?} ({} events)",
                                first.event.kind,
                                first.event.paths,
                                relevant.len()
                            );
                            let _ = signals.send(Signal::Rescan);
                        }
                    }
                    Err(errors) => {
                        for e in errors {
                            error!("watcher error: {e}");
                        }
                    }
                },
            )
            .map_err(WatchError::Init)?
        };

        debouncer
            .watch(&root, RecursiveMode::Recursive)
            .map_err(|source| WatchError::Watch {
                path: root.clone(),
                source,
            })?;
        info!("watching {}", root.display());

        let handlers: Arc<RwLock<Vec<ChangeHandler>>> = Arc::new(RwLock::new(Vec::new()));
        let shutdown = Arc::new(AtomicBool::new(false));

        let dispatch_thread = {
            let root = root.clone();
            let handlers = Arc::clone(&handlers);
            let shutdown = Arc::clone(&shutdown);
            let follow_links = options.follow_links;
            thread::Builder::new()
                .name("intermission-rescan".into())
                .spawn(move || {
                    run_dispatch_loop(signal_rx, &root, follow_links, &handlers, &shutdown)
                })
                .map_err(WatchError::Spawn)?
        };

        Ok(Self {
            root,
            handlers,
            shutdown,
            signals,
            debouncer: Some(debouncer),
            dispatch_thread: Some(dispatch_thread),
        })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Register a handler. Handlers run in registration order on every rescan.
    pub fn add_handler<F>(&self, handler: F)
    where
        F: Fn(Vec<PathBuf>) + Send + Sync + 'static,
    {
        self.handlers
            .write()
            .unwrap_or_else(|e| e.into_inner())
            .push(Arc::new(handler));
    }

    /// Release the OS watches and stop the dispatch thread. Later calls do nothing.
    pub fn close(&mut self) -> Result<(), WatchError> {
        if self.shutdown.swap(true, Ordering::SeqCst) {
            return Ok(());
        }

        // Joins the debouncer's own thread; no events arrive after this.
        if let Some(debouncer) = self.debouncer.take() {
            debouncer.stop();
        }
        let _ = self.signals.send(Signal::Shutdown);

        let result = match self.dispatch_thread.take().map(JoinHandle::join) {
            Some(Err(_)) => Err(WatchError::ThreadPanicked),
            _ => Ok(()),
        };
        debug!("stopped watching {}", self.root.display());
        result
    }
}

impl Drop for DirectoryWatcher {
    fn drop(&mut self) {
        if let Err(e) = self.close() {
            error!("failed to close directory watcher: {e}");
        }
    }
}

fn run_dispatch_loop(
    signals: Receiver<Signal>,
    root: &Path,
    follow_links: bool,
    handlers: &RwLock<Vec<ChangeHandler>>,
    shutdown: &AtomicBool,
) {
    while let Ok(signal) = signals.recv() {
        if shutdown.load(Ordering::SeqCst) {
            break;
        }
        if let Signal::Shutdown = signal {
            break;
        }
        // A rescan reflects every change queued so far.
        let mut stop = false;
        while let Ok(queued) = signals.try_recv() {
            if let Signal::Shutdown = queued {
                stop = true;
            }
        }
        if stop || shutdown.load(Ordering::SeqCst) {
            break;
        }
        rescan_and_notify(root, follow_links, handlers);
    }
}

fn rescan_and_notify(root: &Path, follow_links: bool, handlers: &RwLock<Vec<ChangeHandler>>) {
    let files = match library::scan(root, follow_links) {
        Ok(files) => files,
        Err(e) => {
            error!("failed to rescan {}: {e}", root.display());
            return;
        }
    };

    let handlers: Vec<ChangeHandler> = handlers
        .read()
        .unwrap_or_else(|e| e.into_inner())
        .clone();
    debug!(
        "rescan found {} tracks; notifying {} handlers",
        files.len(),
        handlers.len()
    );
    for handler in &handlers {
        handler(files.clone());
    }
}

#[cfg(test)]
mod tests;
