use super::*;
use std::path::{Path, PathBuf};

#[test]
fn cursor_wraps_both_ways() {
    let mut app = App::new(PathBuf::from("/music"));
    app.prev(3);
    assert_eq!(app.cursor, 2);
    app.next(3);
    assert_eq!(app.cursor, 0);
    app.next(3);
    assert_eq!(app.cursor, 1);
}

#[test]
fn moving_on_an_empty_list_keeps_cursor_at_zero() {
    let mut app = App::new(PathBuf::from("/music"));
    app.next(0);
    assert_eq!(app.cursor, 0);
    app.prev(0);
    assert_eq!(app.cursor, 0);
}

#[test]
fn moving_the_cursor_stops_following_playback() {
    let mut app = App::new(PathBuf::from("/music"));
    assert!(app.follow_playback);

    app.sync(Some(2), 4);
    assert_eq!(app.cursor, 2);

    app.next(4);
    app.sync(Some(0), 4);
    assert_eq!(app.cursor, 3);

    app.follow_playback_on();
    app.sync(Some(0), 4);
    assert_eq!(app.cursor, 0);
}

#[test]
fn sync_clamps_cursor_when_the_list_shrinks() {
    let mut app = App::new(PathBuf::from("/music"));
    app.follow_playback = false;
    app.cursor = 5;
    app.sync(None, 2);
    assert_eq!(app.cursor, 1);
    app.sync(None, 0);
    assert_eq!(app.cursor, 0);
}

#[test]
fn errors_are_recorded_and_cleared() {
    let mut app = App::new(PathBuf::from("/music"));
    app.record_error("no music files available");
    assert_eq!(app.last_error.as_deref(), Some("no music files available"));
    app.clear_error();
    assert!(app.last_error.is_none());
}

#[test]
fn display_name_is_relative_to_root() {
    let app = App::new(PathBuf::from("/music"));
    assert_eq!(app.display_name(Path::new("/music/album/a.wav")), "album/a.wav");
    assert_eq!(app.display_name(Path::new("/elsewhere/b.mp3")), "/elsewhere/b.mp3");
}
