//! Per-path coalescing of filesystem events.
//!
//! Editors often emit several events for one save (truncate, write, rename).
//! Events are held per path until no new event arrived for the debounce
//! window, then released as a single change.

use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::{Mutex, PoisonError};
use std::time::{Duration, Instant};

/// What happened to a path.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum ChangeKind {
    Created,
    Modified,
    Removed,
}

/// A settled change.
#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) struct Change {
    pub(crate) path: PathBuf,
    pub(crate) kind: ChangeKind,
}

#[derive(Debug)]
struct Held {
    kind: ChangeKind,
    settles_at: Instant,
}

/// Thread-safe debouncer shared by the watcher callback and the rebuild task.
#[derive(Debug)]
pub(crate) struct Debouncer {
    held: Mutex<HashMap<PathBuf, Held>>,
    window: Duration,
}

impl Debouncer {
    pub(crate) fn new(window: Duration) -> Self {
        Self {
            held: Mutex::new(HashMap::new()),
            window,
        }
    }

    /// Record a raw event, merging it with any change held for the same path.
    pub(crate) fn record(&self, path: PathBuf, kind: ChangeKind) {
        use std::collections::hash_map::Entry;

        let mut held = self.held.lock().unwrap_or_else(PoisonError::into_inner);
        let settles_at = Instant::now() + self.window;

        match held.entry(path) {
            Entry::Vacant(slot) => {
                slot.insert(Held { kind, settles_at });
            }
            Entry::Occupied(mut slot) => match merge(slot.get().kind, kind) {
                Some(merged) => {
                    let entry = slot.get_mut();
                    entry.kind = merged;
                    entry.settles_at = settles_at;
                }
                None => {
                    slot.remove();
                }
            },
        }
    }

    /// Take every change whose window has elapsed.
    pub(crate) fn take_settled(&self) -> Vec<Change> {
        let mut held = self.held.lock().unwrap_or_else(PoisonError::into_inner);
        let now = Instant::now();

        let settled: Vec<PathBuf> = held
            .iter()
            .filter(|(_, h)| h.settles_at <= now)
            .map(|(path, _)| path.clone())
            .collect();

        let mut changes: Vec<Change> = settled
            .into_iter()
            .filter_map(|path| {
                held.remove(&path).map(|h| Change { path, kind: h.kind })
            })
            .collect();
        changes.sort_by(|a, b| a.path.cmp(&b.path));
        changes
    }
}

/// Merge a held change with a newer one. `None` drops the path entirely.
#[allow(clippy::match_same_arms)]
fn merge(held: ChangeKind, newer: ChangeKind) -> Option<ChangeKind> {
    use ChangeKind::{Created, Modified, Removed};

    match (held, newer) {
        (Created, Removed) => None,
        (Created, _) => Some(Created),
        (Modified, Created) => Some(Created),
        (Modified, Modified) => Some(Modified),
        (Modified, Removed) => Some(Removed),
        // Deleted and written back: the file was replaced.
        (Removed, Created) => Some(Modified),
        (Removed, _) => Some(Removed),
    }
}
