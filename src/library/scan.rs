use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use tracing::debug;
use walkdir::WalkDir;

use super::format::is_audio_file;

/// Create `root` (and parents) when missing and return its absolute path.
pub fn ensure_root(root: &Path) -> io::Result<PathBuf> {
    if !root.exists() {
        fs::create_dir_all(root)?;
    }
    std::path::absolute(root)
}

/// Walk `root` recursively and collect every supported audio file.
///
/// Entries are visited in file-name order so the discovery order is stable
/// across rescans. A missing root is created and yields an empty list.
pub fn scan(root: &Path, follow_links: bool) -> io::Result<Vec<PathBuf>> {
    if !root.exists() {
        fs::create_dir_all(root)?;
        return Ok(Vec::new());
    }

    let mut files = Vec::new();
    let walker = WalkDir::new(root)
        .follow_links(follow_links)
        .sort_by_file_name();

    for entry in walker {
        let entry = match entry {
            Ok(e) => e,
            Err(e) => {
                debug!("skipping unreadable entry under {}: {e}", root.display());
                continue;
            }
        };
        if entry.file_type().is_file() && is_audio_file(entry.path()) {
            files.push(entry.into_path());
        }
    }

    Ok(files)
}
