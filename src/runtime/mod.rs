use std::env;
use std::fs::OpenOptions;
use std::path::PathBuf;
use std::sync::Mutex;

use crossterm::execute;
use crossterm::terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode};
use ratatui::{Terminal, backend::CrosstermBackend};
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

use crate::app::App;
use crate::config;

mod event_loop;
mod settings;
mod startup;

const DEFAULT_LOG_FILTER: &str = "intermission=info";

pub fn run() -> Result<(), Box<dyn std::error::Error>> {
    let (mut settings, config_warning) = settings::load_settings();
    init_logging(&settings.logging);
    if let Some(msg) = config_warning {
        warn!("{msg}");
    }

    if let Some(dir) = env::args().nth(1) {
        settings.library.root = PathBuf::from(dir);
    }

    let mut session = startup::start(&settings)?;
    let mut app = App::new(session.root.clone());
    app.watching = session.watcher.is_some();
    app.last_error = session.startup_error.take();

    enable_raw_mode()?;
    let mut stdout = std::io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let run_result = event_loop::run(&mut terminal, &settings, &mut app, &mut session.engine);

    if let Some(mut watcher) = session.watcher.take() {
        if let Err(e) = watcher.close() {
            error!("{e}");
        }
    }
    if let Err(e) = session.engine.close() {
        error!("failed to stop playback: {e}");
    }

    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    info!("bye");
    run_result
}

/// Send logs to a file; the terminal belongs to the UI. `RUST_LOG` overrides
/// the default filter.
fn init_logging(settings: &config::LoggingSettings) {
    let file = match OpenOptions::new()
        .create(true)
        .append(true)
        .open(&settings.file)
    {
        Ok(f) => f,
        Err(e) => {
            eprintln!(
                "intermission: cannot open log file {}: {e}",
                settings.file.display()
            );
            return;
        }
    };

    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| DEFAULT_LOG_FILTER.into()),
        )
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .try_init();
}
