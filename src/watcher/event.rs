//! Events flowing from the file watcher into the controller.

use std::fmt;
use std::path::{Path, PathBuf};

/// A filesystem change to one tracked path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChangeEvent {
    Add(PathBuf),
    Change(PathBuf),
    /// The path is gone. May name a directory, in which case everything
    /// under it is gone.
    Unlink(PathBuf),
}

impl ChangeEvent {
    pub fn path(&self) -> &Path {
        match self {
            ChangeEvent::Add(path) | ChangeEvent::Change(path) | ChangeEvent::Unlink(path) => path,
        }
    }

    pub fn kind(&self) -> &'static str {
        match self {
            ChangeEvent::Add(_) => "add",
            ChangeEvent::Change(_) => "change",
            ChangeEvent::Unlink(_) => "unlink",
        }
    }
}

impl fmt::Display for ChangeEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.kind(), self.path().display())
    }
}

/// Everything the controller reacts to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ControllerEvent {
    Change(ChangeEvent),
    /// Run a generation without any model change, e.g. to retry after an
    /// error.
    Regenerate,
    /// Finish the in-flight generation, then stop.
    Shutdown,
}

impl From<ChangeEvent> for ControllerEvent {
    fn from(event: ChangeEvent) -> Self {
        ControllerEvent::Change(event)
    }
}
