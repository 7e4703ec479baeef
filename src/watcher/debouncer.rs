//! Per-path debouncing of file change events.
//!
//! Editors often write a file several times in quick succession (save,
//! format-on-save, atomic rename). Only the last write matters, so changes
//! are held until the path has been quiet for the configured duration.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

/// What happened to a pending path since it was last flushed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum PendingKind {
    Created,
    Modified,
}

impl PendingKind {
    /// A path created and then modified is still new to the consumer.
    fn merge(self, later: PendingKind) -> PendingKind {
        match (self, later) {
            (PendingKind::Created, _) | (_, PendingKind::Created) => PendingKind::Created,
            _ => PendingKind::Modified,
        }
    }
}

#[derive(Debug)]
pub struct Debouncer {
    pending: HashMap<PathBuf, (PendingKind, Instant)>,
    duration: Duration,
}

impl Debouncer {
    pub fn new(debounce_ms: u64) -> Self {
        Self {
            pending: HashMap::new(),
            duration: Duration::from_millis(debounce_ms),
        }
    }

    pub fn duration(&self) -> Duration {
        self.duration
    }

    /// Record a change, restarting the quiet period for `path`.
    pub fn record(&mut self, path: PathBuf, kind: PendingKind) {
        let now = Instant::now();
        self.pending
            .entry(path)
            .and_modify(|(pending, last)| {
                *pending = pending.merge(kind);
                *last = now;
            })
            .or_insert((kind, now));
    }

    /// Forget a pending path, e.g. because it was deleted.
    pub fn remove(&mut self, path: &Path) -> Option<PendingKind> {
        self.pending.remove(path).map(|(kind, _)| kind)
    }

    /// Take every path that has been quiet for the debounce duration,
    /// sorted by path.
    pub fn take_ready(&mut self) -> Vec<(PathBuf, PendingKind)> {
        let now = Instant::now();
        let mut ready = Vec::new();

        self.pending.retain(|path, (kind, last)| {
            if now.duration_since(*last) >= self.duration {
                ready.push((path.clone(), *kind));
                false
            } else {
                true
            }
        });

        ready.sort();
        ready
    }

    pub fn has_pending(&self) -> bool {
        !self.pending.is_empty()
    }
}
