use std::time::{Duration, Instant};

use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind};
use ratatui::{Terminal, backend::CrosstermBackend};
use tracing::warn;

use crate::app::App;
use crate::audio::{AudioBackend, PlaybackEngine, PlaybackError};
use crate::config;
use crate::ui;

const LOOP_STEP_MINUTES: f64 = 1.0;
const INTERVAL_STEP_SECONDS: f64 = 1.0;

/// Main terminal event loop: one engine tick and one redraw per frame, with
/// input polled for whatever is left of the frame. Returns `Ok(())` when
/// shutdown is requested.
pub fn run<B: AudioBackend>(
    terminal: &mut Terminal<CrosstermBackend<std::io::Stdout>>,
    settings: &config::Settings,
    app: &mut App,
    engine: &mut PlaybackEngine<B>,
) -> Result<(), Box<dyn std::error::Error>> {
    let frame = Duration::from_secs_f64(1.0 / f64::from(settings.playback.frame_rate.max(1)));

    loop {
        let started = Instant::now();

        match engine.apply_pending_updates() {
            Ok(true) if engine.has_track() => app.clear_error(),
            Ok(_) => {}
            Err(e) => report(app, e),
        }
        if let Err(e) = engine.tick() {
            report(app, e);
        }

        let files = engine.files();
        app.sync(engine.current_index(), files.len());
        terminal.draw(|f| ui::draw(f, app, engine, &files))?;

        loop {
            let budget = frame.saturating_sub(started.elapsed());
            if !event::poll(budget)? {
                break;
            }
            if let Event::Key(key) = event::read()? {
                if key.kind != KeyEventKind::Press {
                    continue;
                }
                if handle_key_event(key, app, engine, files.len()) {
                    return Ok(());
                }
            }
            if budget.is_zero() {
                break;
            }
        }
    }
}

fn report(app: &mut App, e: PlaybackError) {
    warn!("{e}");
    app.record_error(e);
}

/// Apply one key press. Returns `true` when the user asked to quit.
fn handle_key_event<B: AudioBackend>(
    key: KeyEvent,
    app: &mut App,
    engine: &mut PlaybackEngine<B>,
    len: usize,
) -> bool {
    let result = match key.code {
        KeyCode::Char('q') | KeyCode::Esc => return true,
        KeyCode::Char(' ') => {
            engine.toggle_pause();
            Ok(())
        }
        KeyCode::Char('n') => {
            app.follow_playback_on();
            engine.skip_to_next()
        }
        KeyCode::Char('j') | KeyCode::Down => {
            app.next(len);
            Ok(())
        }
        KeyCode::Char('k') | KeyCode::Up => {
            app.prev(len);
            Ok(())
        }
        KeyCode::Enter => {
            if len == 0 {
                return false;
            }
            app.follow_playback_on();
            engine.select_index(app.cursor)
        }
        KeyCode::Char('+') => {
            engine.set_loop_duration_minutes(engine.loop_duration_minutes() + LOOP_STEP_MINUTES);
            Ok(())
        }
        KeyCode::Char('-') => {
            engine.set_loop_duration_minutes(engine.loop_duration_minutes() - LOOP_STEP_MINUTES);
            Ok(())
        }
        KeyCode::Char(']') => {
            engine.set_interval_seconds(engine.interval_seconds() + INTERVAL_STEP_SECONDS);
            Ok(())
        }
        KeyCode::Char('[') => {
            engine.set_interval_seconds(engine.interval_seconds() - INTERVAL_STEP_SECONDS);
            Ok(())
        }
        _ => return false,
    };

    match result {
        Ok(()) => {
            if engine.has_track() {
                app.clear_error();
            }
        }
        Err(e) => report(app, e),
    }
    false
}
