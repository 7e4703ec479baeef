//! Bridges `notify` into the controller's event channel.

use std::path::PathBuf;
use std::time::Duration;

use notify::event::ModifyKind;
use notify::{Event, EventKind, RecursiveMode, Watcher};
use tokio::sync::mpsc;
use tokio::time::{MissedTickBehavior, interval};

use crate::config::ProjectLayout;
use crate::project::FileScanner;
use crate::{debug_event, log_event};

use super::debouncer::{Debouncer, PendingKind};
use super::error::WatchError;
use super::event::{ChangeEvent, ControllerEvent};
use super::filter::PathFilter;

const NOTIFY_BUFFER: usize = 256;
const MIN_TICK: Duration = Duration::from_millis(10);

/// Watches the project roots and forwards filtered [`ChangeEvent`]s.
///
/// Creations and modifications are debounced per path; deletions are
/// forwarded immediately.
pub struct FileWatcher {
    filter: PathFilter,
    debouncer: Debouncer,
    event_rx: mpsc::Receiver<notify::Result<Event>>,
    events: mpsc::Sender<ControllerEvent>,
    _watcher: notify::RecommendedWatcher,
}

impl FileWatcher {
    pub fn new(
        layout: &ProjectLayout,
        debounce_ms: u64,
        events: mpsc::Sender<ControllerEvent>,
    ) -> Result<Self, WatchError> {
        let filter = PathFilter::new(layout);
        let (tx, rx) = mpsc::channel(NOTIFY_BUFFER);

        let mut watcher = notify::recommended_watcher(move |res: notify::Result<Event>| {
            let _ = tx.blocking_send(res);
        })?;

        let mut watched = 0;
        for root in filter.roots() {
            if !root.is_dir() {
                debug_event!("watcher", "skipping missing root", "{}", root.display());
                continue;
            }
            watcher
                .watch(root, RecursiveMode::Recursive)
                .map_err(|e| WatchError::PathWatchFailed {
                    path: root.clone(),
                    reason: e.to_string(),
                })?;
            debug_event!("watcher", "watching", "{}", root.display());
            watched += 1;
        }
        if watched == 0 {
            tracing::warn!("[watcher] none of the configured roots exist");
        }

        Ok(Self {
            filter,
            debouncer: Debouncer::new(debounce_ms),
            event_rx: rx,
            events,
            _watcher: watcher,
        })
    }

    /// Run until the controller hangs up.
    pub async fn watch(mut self) -> Result<(), WatchError> {
        let mut ticker = interval((self.debouncer.duration() / 2).max(MIN_TICK));
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        log_event!("watcher", "started", "{} roots", self.filter.roots().len());

        loop {
            tokio::select! {
                res = self.event_rx.recv() => match res {
                    Some(Ok(event)) => self.handle_event(event).await?,
                    Some(Err(e)) => tracing::error!("[watcher] file watch error: {e}"),
                    None => return Err(WatchError::ChannelClosed),
                },

                _ = ticker.tick(), if self.debouncer.has_pending() => {
                    for (path, kind) in self.debouncer.take_ready() {
                        self.flush(path, kind).await?;
                    }
                }
            }
        }
    }

    async fn handle_event(&mut self, event: Event) -> Result<(), WatchError> {
        match event.kind {
            EventKind::Create(_) => {
                for path in event.paths {
                    self.record_created(path);
                }
            }
            // renames arrive as one event per side; the side that no longer
            // exists is a removal
            EventKind::Modify(ModifyKind::Name(_)) => {
                for path in event.paths {
                    if path.exists() {
                        self.record_created(path);
                    } else {
                        self.removed(path).await?;
                    }
                }
            }
            EventKind::Modify(_) => {
                for path in event.paths {
                    if self.filter.matches(&path) {
                        self.debouncer.record(path, PendingKind::Modified);
                    }
                }
            }
            EventKind::Remove(_) => {
                for path in event.paths {
                    self.removed(path).await?;
                }
            }
            _ => {}
        }
        Ok(())
    }

    /// A new file, or a directory moved in whose files produce no events of
    /// their own.
    fn record_created(&mut self, path: PathBuf) {
        if path.is_dir() {
            if self.filter.is_watched(&path) {
                for file in FileScanner::new(self.filter.rules().clone()).scan(&path) {
                    if self.filter.matches(&file) {
                        self.debouncer.record(file, PendingKind::Created);
                    }
                }
            }
        } else if self.filter.matches(&path) {
            self.debouncer.record(path, PendingKind::Created);
        }
    }

    async fn removed(&mut self, path: PathBuf) -> Result<(), WatchError> {
        let is_file = self.filter.matches(&path);
        let is_dir = path.extension().is_none() && self.filter.is_watched(&path);
        if !is_file && !is_dir {
            return Ok(());
        }
        self.debouncer.remove(&path);
        self.send(ChangeEvent::Unlink(path)).await
    }

    async fn flush(&mut self, path: PathBuf, kind: PendingKind) -> Result<(), WatchError> {
        // gone again before the quiet period ended
        let event = if !path.exists() {
            ChangeEvent::Unlink(path)
        } else {
            match kind {
                PendingKind::Created => ChangeEvent::Add(path),
                PendingKind::Modified => ChangeEvent::Change(path),
            }
        };
        self.send(event).await
    }

    async fn send(&self, event: ChangeEvent) -> Result<(), WatchError> {
        debug_event!("watcher", "event", "{event}");
        self.events
            .send(event.into())
            .await
            .map_err(|_| WatchError::ChannelClosed)
    }
}
