//! Watch mode: filesystem events in, generations out.
//!
//! ```text
//! notify::RecommendedWatcher
//!     | (blocking_send)
//! FileWatcher  -- filter roots/extensions, debounce modifications
//!     | ControllerEvent (mpsc)
//! Controller   -- owns the ProjectModel, one generation at a time
//!     | Arc<ProjectSnapshot>
//! Generator    -- extract, emit, publish
//! ```

mod controller;
mod debouncer;
mod error;
mod event;
mod file_watcher;
mod filter;

pub use controller::{Controller, ControllerState, ControllerStatus, event_channel};
pub use debouncer::{Debouncer, PendingKind};
pub use error::WatchError;
pub use event::{ChangeEvent, ControllerEvent};
pub use file_watcher::FileWatcher;
pub use filter::PathFilter;
