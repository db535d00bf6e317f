//! UI rendering helpers for the terminal user interface.
//!
//! This module contains functions to render the TUI using `ratatui`.

use std::path::PathBuf;
use std::time::Duration;

use ratatui::{
    Frame,
    layout::{Alignment, Constraint, Direction, Layout},
    style::{Color, Modifier, Style},
    widgets::{Block, Borders, Gauge, List, ListItem, ListState, Padding, Paragraph, Wrap},
};

use crate::app::App;
use crate::audio::{AudioBackend, FADE_OUT_SECONDS, PlaybackEngine, PlaybackState};

const CONTROLS: &[(&str, &str)] = &[
    ("space", "pause/resume"),
    ("n", "next track"),
    ("j/k", "up/down"),
    ("enter", "play selected"),
    ("+/-", "loop length"),
    ("]/[", "interval"),
    ("q", "quit"),
];

fn controls_text() -> String {
    CONTROLS
        .iter()
        .map(|(k, v)| format!("[{k}] {v}"))
        .collect::<Vec<_>>()
        .join(" | ")
}

/// Format a `Duration` as `MM:SS`, rounding partial seconds up so a
/// countdown never shows `00:00` while time is left.
fn format_mmss(d: Duration) -> String {
    let mut secs = d.as_secs();
    if d.subsec_nanos() > 0 {
        secs = secs.saturating_add(1);
    }
    format!("{:02}:{:02}", secs / 60, secs % 60)
}

/// Decoded length of one pass through the track, not the loop setting.
fn track_length_text(d: Duration) -> String {
    format!("Length: {}", format_mmss(d))
}

fn status_text<B: AudioBackend>(app: &App, engine: &PlaybackEngine<B>) -> String {
    let mut parts: Vec<String> = Vec::new();

    let track = engine
        .current_path()
        .map(|p| app.display_name(p))
        .unwrap_or_else(|| "-".to_string());

    let phase = match engine.state() {
        PlaybackState::Stopped => "Stopped".to_string(),
        PlaybackState::Playing => format!(
            "Playing: {track} (fade in {})",
            format_mmss(engine.phase_remaining())
        ),
        PlaybackState::FadingOut => format!("Fading out: {track}"),
        PlaybackState::Interval => format!(
            "Next track in {}s",
            engine.phase_remaining().as_secs_f64().ceil() as u64
        ),
    };
    parts.push(phase);

    if engine.is_paused() {
        parts.push("PAUSED".to_string());
    }
    if let Some(d) = engine.track_duration() {
        parts.push(track_length_text(d));
    }
    parts.push(if app.watching {
        "Live reload: ON".to_string()
    } else {
        "Live reload: OFF".to_string()
    });
    parts.push(format!("Dir: {}", app.root.display()));

    parts.join(" • ")
}

/// Render the entire UI into the provided `frame`.
pub fn draw<B: AudioBackend>(
    frame: &mut Frame,
    app: &App,
    engine: &PlaybackEngine<B>,
    files: &[PathBuf],
) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Length(4),
            Constraint::Length(3),
            Constraint::Min(1),
            Constraint::Length(3),
            Constraint::Length(3),
        ])
        .split(frame.area());

    // Header
    let header = Paragraph::new("play for a while, fade, rest, move on")
        .alignment(Alignment::Center)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(" intermission ")
                .title_alignment(Alignment::Center),
        );
    frame.render_widget(header, chunks[0]);

    // Status box
    let mut status = status_text(app, engine);
    if let Some(err) = &app.last_error {
        status.push_str(&format!("\nError: {err}"));
    }
    let status_par = Paragraph::new(status)
        .block(
            Block::bordered()
                .padding(Padding {
                    left: 1,
                    right: 0,
                    top: 0,
                    bottom: 0,
                })
                .title(" status "),
        )
        .wrap(Wrap { trim: true });
    frame.render_widget(status_par, chunks[1]);

    // Phase gauge
    let gauge = Gauge::default()
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(format!(" {} ", engine.state().label())),
        )
        .gauge_style(Style::default().fg(Color::Cyan))
        .ratio(engine.progress())
        .label(format!(
            "{} / -{}",
            format_mmss(engine.phase_elapsed()),
            format_mmss(engine.phase_remaining())
        ));
    frame.render_widget(gauge, chunks[2]);

    // Track list
    let playing = engine.current_index();
    let items: Vec<ListItem> = files
        .iter()
        .enumerate()
        .map(|(i, path)| {
            let name = app.display_name(path);
            if Some(i) == playing {
                ListItem::new(format!("♪ {name}"))
                    .style(Style::default().add_modifier(Modifier::BOLD))
            } else {
                ListItem::new(format!("  {name}"))
            }
        })
        .collect();
    let list = List::new(items)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(format!(" tracks ({}) ", files.len())),
        )
        .highlight_style(Style::default().add_modifier(Modifier::REVERSED))
        .highlight_symbol("> ");
    let mut state = ListState::default();
    if !files.is_empty() {
        state.select(Some(app.cursor));
    }
    frame.render_stateful_widget(list, chunks[3], &mut state);

    // Settings
    let settings_line = Paragraph::new(format!(
        "Loop duration: {} min • Interval: {} s • Fade: {} s",
        engine.loop_duration_minutes(),
        engine.interval_seconds(),
        FADE_OUT_SECONDS
    ))
    .block(Block::default().borders(Borders::ALL).title(" settings "));
    frame.render_widget(settings_line, chunks[4]);

    let footer = Paragraph::new(controls_text())
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(" controls ")
                .padding(Padding {
                    left: 1,
                    right: 0,
                    top: 0,
                    bottom: 0,
                }),
        )
        .wrap(Wrap { trim: true });
    frame.render_widget(footer, chunks[5]);
}
