//! Which debounced events warrant a rescan.

use std::path::Path;

use notify::event::ModifyKind;
use notify::{Event, EventKind};

use crate::library::is_hidden;

/// Creations, removals and renames change the track list; contents
/// changing in place do not. Events that only touch dotfiles or anything
/// inside a dot-directory under `root` are ignored.
pub fn is_relevant(root: &Path, event: &Event) -> bool {
    if event.need_rescan() {
        return true;
    }
    let kind_matters = matches!(
        event.kind,
        EventKind::Create(_) | EventKind::Remove(_) | EventKind::Modify(ModifyKind::Name(_))
    );
    kind_matters && event.paths.iter().any(|p| !is_hidden_below(root, p))
}

fn is_hidden_below(root: &Path, path: &Path) -> bool {
    match path.strip_prefix(root) {
        Ok(rel) => rel
            .components()
            .any(|c| c.as_os_str().to_str().is_some_and(|s| s.starts_with('.'))),
        Err(_) => is_hidden(path),
    }
}
