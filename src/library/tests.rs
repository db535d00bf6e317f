use super::*;
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::tempdir;

fn paths(names: &[&str]) -> Vec<PathBuf> {
    names.iter().map(PathBuf::from).collect()
}

#[test]
fn format_is_resolved_case_insensitively() {
    assert_eq!(Format::from_path(Path::new("a.wav")), Some(Format::Wav));
    assert_eq!(Format::from_path(Path::new("a.WaV")), Some(Format::Wav));
    assert_eq!(Format::from_path(Path::new("/x/y/a.OGG")), Some(Format::Ogg));
    assert_eq!(Format::from_path(Path::new("a.Mp3")), Some(Format::Mp3));
    assert_eq!(Format::from_path(Path::new("a.flac")), None);
    assert_eq!(Format::from_path(Path::new("wav")), None);
    assert!(is_audio_file(Path::new("dir.with.dots/song.mp3")));
    assert!(!is_audio_file(Path::new("notes.txt")));
}

#[test]
fn hidden_names_start_with_a_dot() {
    assert!(is_hidden(Path::new("/music/.song.wav.swp")));
    assert!(is_hidden(Path::new(".git")));
    assert!(!is_hidden(Path::new("/music/song.wav")));
}

#[test]
fn scan_finds_nested_audio_and_skips_other_files() {
    let dir = tempdir().unwrap();
    let sub = dir.path().join("album");
    fs::create_dir_all(&sub).unwrap();
    fs::write(dir.path().join("b.mp3"), b"x").unwrap();
    fs::write(dir.path().join("a.WAV"), b"x").unwrap();
    fs::write(dir.path().join("readme.txt"), b"x").unwrap();
    fs::write(sub.join("c.ogg"), b"x").unwrap();

    let files = scan(dir.path(), true).unwrap();
    assert_eq!(
        files,
        vec![
            dir.path().join("a.WAV"),
            sub.join("c.ogg"),
            dir.path().join("b.mp3"),
        ]
    );
}

#[test]
fn scan_creates_missing_root_and_returns_empty() {
    let dir = tempdir().unwrap();
    let root = dir.path().join("musics");

    let files = scan(&root, true).unwrap();
    assert!(files.is_empty());
    assert!(root.is_dir());
}

#[test]
fn ensure_root_returns_absolute_existing_dir() {
    let dir = tempdir().unwrap();
    let root = dir.path().join("nested").join("musics");

    let abs = ensure_root(&root).unwrap();
    assert!(abs.is_absolute());
    assert!(abs.is_dir());
}

#[test]
fn update_keeps_current_path_when_still_present() {
    let sel = MusicSelector::new();
    sel.update(paths(&["a.wav", "b.wav", "c.wav"]));
    sel.select_index(1).unwrap();

    let changed = sel.update(paths(&["new.wav", "a.wav", "b.wav"]));
    assert!(changed);
    assert_eq!(sel.current_file(), Some(PathBuf::from("b.wav")));
    assert_eq!(sel.current_index(), Some(2));

    let changed = sel.update(paths(&["x.wav", "y.wav", "b.wav"]));
    assert!(!changed);
    assert_eq!(sel.current_file(), Some(PathBuf::from("b.wav")));
}

#[test]
fn update_falls_back_to_first_when_current_is_gone() {
    let sel = MusicSelector::new();
    sel.update(paths(&["a.wav", "b.wav"]));
    sel.select_index(1).unwrap();

    let changed = sel.update(paths(&["c.wav", "d.wav"]));
    assert!(changed);
    assert_eq!(sel.current_index(), Some(0));
    assert_eq!(sel.current_file(), Some(PathBuf::from("c.wav")));
}

#[test]
fn update_with_empty_list_unsets_selection() {
    let sel = MusicSelector::new();
    assert_eq!(sel.current_file(), None);
    assert!(!sel.update(Vec::new()));

    sel.update(paths(&["a.wav"]));
    assert!(sel.update(Vec::new()));
    assert_eq!(sel.current_file(), None);
    assert_eq!(sel.current_index(), None);
    assert!(sel.is_empty());
}

#[test]
fn select_next_cycles_back_after_len_calls() {
    let sel = MusicSelector::new();
    sel.update(paths(&["a.wav", "b.wav", "c.wav"]));
    sel.select_index(1).unwrap();

    for _ in 0..sel.len() {
        assert!(sel.select_next());
    }
    assert_eq!(sel.current_index(), Some(1));
}

#[test]
fn select_next_on_empty_library_stays_unset() {
    let sel = MusicSelector::new();
    assert!(!sel.select_next());
    assert_eq!(sel.current_index(), None);
}

#[test]
fn select_next_on_single_entry_reports_no_change() {
    let sel = MusicSelector::new();
    sel.update(paths(&["only.wav"]));
    assert!(!sel.select_next());
    assert_eq!(sel.current_index(), Some(0));
}

#[test]
fn select_index_out_of_range_leaves_selection_alone() {
    let sel = MusicSelector::new();
    sel.update(paths(&["a.wav", "b.wav"]));

    assert_eq!(
        sel.select_index(5),
        Err(SelectError::OutOfRange { index: 5, len: 2 })
    );
    assert_eq!(sel.current_index(), Some(0));
}

#[test]
fn files_returns_a_detached_copy() {
    let sel = MusicSelector::new();
    sel.update(paths(&["a.wav", "a.wav"]));

    let mut copy = sel.files();
    copy.clear();
    assert_eq!(sel.files(), paths(&["a.wav", "a.wav"]));
}
