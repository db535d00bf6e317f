use super::*;
use std::fs;
use std::sync::atomic::AtomicUsize;
use std::sync::mpsc;
use std::time::{Duration, Instant};

use notify::event::{AccessKind, CreateKind, DataChange, ModifyKind, RemoveKind, RenameMode};
use notify::{Event, EventKind};
use tempfile::tempdir;

fn event(kind: EventKind, path: &Path) -> Event {
    Event::new(kind).add_path(path.to_path_buf())
}

/// Wait for a handler call whose list satisfies `pred`.
fn wait_for<F>(rx: &mpsc::Receiver<Vec<PathBuf>>, pred: F) -> Option<Vec<PathBuf>>
where
    F: Fn(&[PathBuf]) -> bool,
{
    let deadline = Instant::now() + Duration::from_secs(5);
    while let Some(left) = deadline.checked_duration_since(Instant::now()) {
        match rx.recv_timeout(left) {
            Ok(files) if pred(&files) => return Some(files),
            Ok(_) => continue,
            Err(_) => return None,
        }
    }
    None
}

#[test]
fn creates_removes_and_renames_are_relevant() {
    let root = Path::new("/music");
    let create = event(EventKind::Create(CreateKind::File), &root.join("new.wav"));
    let remove = event(EventKind::Remove(RemoveKind::File), &root.join("gone.wav"));
    let rename = event(
        EventKind::Modify(ModifyKind::Name(RenameMode::To)),
        &root.join("renamed.ogg"),
    );
    let folder = event(EventKind::Create(CreateKind::Folder), &root.join("album"));

    assert!(is_relevant(root, &create));
    assert!(is_relevant(root, &remove));
    assert!(is_relevant(root, &rename));
    assert!(is_relevant(root, &folder));
}

#[test]
fn content_changes_and_access_are_ignored() {
    let root = Path::new("/music");
    let written = event(
        EventKind::Modify(ModifyKind::Data(DataChange::Content)),
        &root.join("a.wav"),
    );
    let access = event(EventKind::Access(AccessKind::Any), &root.join("a.wav"));

    assert!(!is_relevant(root, &written));
    assert!(!is_relevant(root, &access));
}

#[test]
fn hidden_paths_below_the_root_are_ignored() {
    let root = Path::new("/music");
    let swap = event(EventKind::Create(CreateKind::File), &root.join(".a.wav.swp"));
    let vcs = event(
        EventKind::Create(CreateKind::File),
        &root.join(".git").join("index"),
    );
    assert!(!is_relevant(root, &swap));
    assert!(!is_relevant(root, &vcs));

    // A dotted root itself does not hide its contents.
    let dotted = Path::new("/tmp/.tmpAbC123");
    let inside = event(EventKind::Create(CreateKind::File), &dotted.join("a.wav"));
    assert!(is_relevant(dotted, &inside));
}

#[test]
fn options_follow_settings() {
    let settings = WatcherSettings {
        enabled: true,
        debounce_ms: 250,
    };
    let opts = WatchOptions::from_settings(&settings, false);
    assert_eq!(opts.debounce, Duration::from_millis(250));
    assert!(!opts.follow_links);
    assert_eq!(
        WatchOptions::default().debounce,
        Duration::from_millis(DEFAULT_DEBOUNCE_MS)
    );
}

#[test]
fn watch_creates_a_missing_root() {
    let dir = tempdir().unwrap();
    let root = dir.path().join("musics");

    let mut watcher = DirectoryWatcher::watch(&root, WatchOptions::default()).unwrap();
    assert!(root.is_dir());
    assert!(watcher.root().is_absolute());
    watcher.close().unwrap();
}

#[test]
fn new_files_reach_every_handler() {
    let dir = tempdir().unwrap();
    let mut watcher = DirectoryWatcher::watch(dir.path(), WatchOptions::default()).unwrap();
    let root = watcher.root().to_path_buf();

    let (tx_a, rx_a) = mpsc::channel();
    let (tx_b, rx_b) = mpsc::channel();
    watcher.add_handler(move |files| {
        let _ = tx_a.send(files);
    });
    watcher.add_handler(move |files| {
        let _ = tx_b.send(files);
    });

    let song = root.join("song.wav");
    fs::write(&song, b"RIFF").unwrap();

    let has_song = |files: &[PathBuf]| files.contains(&song);
    assert!(wait_for(&rx_a, has_song).is_some());
    assert!(wait_for(&rx_b, has_song).is_some());

    watcher.close().unwrap();
}

#[test]
fn files_in_new_subdirectories_are_picked_up() {
    let dir = tempdir().unwrap();
    let mut watcher = DirectoryWatcher::watch(dir.path(), WatchOptions::default()).unwrap();
    let root = watcher.root().to_path_buf();

    let (tx, rx) = mpsc::channel();
    watcher.add_handler(move |files| {
        let _ = tx.send(files);
    });

    let album = root.join("album");
    fs::create_dir(&album).unwrap();
    std::thread::sleep(Duration::from_millis(200));

    let track = album.join("track.ogg");
    fs::write(&track, b"OggS").unwrap();

    let found = wait_for(&rx, |files| files.contains(&track));
    assert_eq!(found, Some(vec![track.clone()]));

    watcher.close().unwrap();
}

#[test]
fn recreated_directory_is_watched_again() {
    let dir = tempdir().unwrap();
    let mut watcher = DirectoryWatcher::watch(dir.path(), WatchOptions::default()).unwrap();
    let root = watcher.root().to_path_buf();

    let (tx, rx) = mpsc::channel();
    watcher.add_handler(move |files| {
        let _ = tx.send(files);
    });

    // Removed and recreated inside one debounce window.
    let album = root.join("album");
    fs::create_dir(&album).unwrap();
    std::thread::sleep(Duration::from_millis(50));
    fs::remove_dir(&album).unwrap();
    std::thread::sleep(Duration::from_millis(100));
    fs::create_dir(&album).unwrap();

    // Let the window close so the write below arrives in a later batch.
    std::thread::sleep(Duration::from_millis(1200));
    let track = album.join("x.wav");
    fs::write(&track, b"RIFF").unwrap();

    let found = wait_for(&rx, |files| files.contains(&track));
    assert_eq!(found, Some(vec![track.clone()]));

    watcher.close().unwrap();
}

#[test]
fn burst_on_one_path_triggers_one_rescan() {
    let dir = tempdir().unwrap();
    let mut watcher = DirectoryWatcher::watch(dir.path(), WatchOptions::default()).unwrap();
    let root = watcher.root().to_path_buf();

    let calls = Arc::new(AtomicUsize::new(0));
    let (tx, rx) = mpsc::channel();
    {
        let calls = Arc::clone(&calls);
        watcher.add_handler(move |files| {
            calls.fetch_add(1, Ordering::SeqCst);
            let _ = tx.send(files);
        });
    }

    let song = root.join("song.wav");
    fs::write(&song, b"RIFF").unwrap();
    fs::remove_file(&song).unwrap();
    fs::write(&song, b"RIFF").unwrap();

    assert!(wait_for(&rx, |files| files.contains(&song)).is_some());
    // Nothing else is pending once the batch has been delivered.
    std::thread::sleep(Duration::from_millis(1500));
    assert_eq!(calls.load(Ordering::SeqCst), 1);

    watcher.close().unwrap();
}

#[test]
fn removed_files_disappear_from_the_list() {
    let dir = tempdir().unwrap();
    let keep = dir.path().join("a.wav");
    let gone = dir.path().join("b.mp3");
    fs::write(&keep, b"x").unwrap();
    fs::write(&gone, b"x").unwrap();

    let mut watcher = DirectoryWatcher::watch(dir.path(), WatchOptions::default()).unwrap();
    let root = watcher.root().to_path_buf();
    let (tx, rx) = mpsc::channel();
    watcher.add_handler(move |files| {
        let _ = tx.send(files);
    });

    fs::remove_file(root.join("b.mp3")).unwrap();

    let found = wait_for(&rx, |files| !files.contains(&root.join("b.mp3")));
    assert_eq!(found, Some(vec![root.join("a.wav")]));

    watcher.close().unwrap();
}

#[test]
fn close_is_idempotent_and_stops_delivery() {
    let dir = tempdir().unwrap();
    let mut watcher = DirectoryWatcher::watch(dir.path(), WatchOptions::default()).unwrap();
    let root = watcher.root().to_path_buf();

    let (tx, rx) = mpsc::channel();
    watcher.add_handler(move |files| {
        let _ = tx.send(files);
    });

    watcher.close().unwrap();
    watcher.close().unwrap();

    fs::write(root.join("late.wav"), b"x").unwrap();
    assert!(rx.recv_timeout(Duration::from_millis(800)).is_err());
}
