use std::path::PathBuf;
use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum SelectError {
    #[error("selector index out of range: {index} (count: {len})")]
    OutOfRange { index: usize, len: usize },
}

#[derive(Debug, Default)]
struct Inner {
    files: Vec<PathBuf>,
    /// `Some(i)` always satisfies `i < files.len()`.
    index: Option<usize>,
}

/// Ordered track list plus the current selection.
///
/// Updates arrive from the watcher side while the host loop and UI read, so
/// the pair lives behind a reader/writer lock. `update`, `select_next` and
/// `select_index` are writers; everything else only reads.
#[derive(Debug, Default)]
pub struct MusicSelector {
    inner: RwLock<Inner>,
}

impl MusicSelector {
    pub fn new() -> Self {
        Self::default()
    }

    fn read(&self) -> RwLockReadGuard<'_, Inner> {
        self.inner.read().unwrap_or_else(|e| e.into_inner())
    }

    fn write(&self) -> RwLockWriteGuard<'_, Inner> {
        self.inner.write().unwrap_or_else(|e| e.into_inner())
    }

    /// Replace the library, keeping the current track selected when it is
    /// still present. Otherwise the selection falls back to the first entry,
    /// or to nothing when `new_files` is empty.
    ///
    /// Returns `true` when the selected index differs from before.
    pub fn update(&self, new_files: Vec<PathBuf>) -> bool {
        let mut inner = self.write();

        let old_index = inner.index;
        let current = old_index.and_then(|i| inner.files.get(i).cloned());

        let preserved = current.and_then(|path| new_files.iter().position(|f| *f == path));
        let new_index = preserved.or(if new_files.is_empty() { None } else { Some(0) });

        inner.files = new_files;
        inner.index = new_index;
        old_index != new_index
    }

    /// The selected path, or `None` when nothing is selectable.
    pub fn current_file(&self) -> Option<PathBuf> {
        let inner = self.read();
        inner.index.and_then(|i| inner.files.get(i).cloned())
    }

    pub fn current_index(&self) -> Option<usize> {
        self.read().index
    }

    /// A copy of the library; callers cannot reach the selector's own list.
    pub fn files(&self) -> Vec<PathBuf> {
        self.read().files.clone()
    }

    pub fn len(&self) -> usize {
        self.read().files.len()
    }

    pub fn is_empty(&self) -> bool {
        self.read().files.is_empty()
    }

    /// Advance by one, wrapping to the start after the last entry.
    pub fn select_next(&self) -> bool {
        let mut inner = self.write();

        if inner.files.is_empty() {
            inner.index = None;
            return false;
        }

        let old_index = inner.index;
        let next = match old_index {
            Some(i) if i + 1 < inner.files.len() => i + 1,
            _ => 0,
        };
        inner.index = Some(next);
        old_index != inner.index
    }

    pub fn select_index(&self, index: usize) -> Result<(), SelectError> {
        let mut inner = self.write();

        let len = inner.files.len();
        if index >= len {
            return Err(SelectError::OutOfRange { index, len });
        }
        inner.index = Some(index);
        Ok(())
    }
}
