//! Debounced rebuilds for swatchkit's watch mode.
//!
//! File events from [`FileWatcher`] and a periodic check of the output
//! directory feed a [`Scheduler`]; [`WatchLoop`] runs the resulting builds
//! one at a time.

pub mod runner;
pub mod scheduler;
pub mod watcher;

pub use runner::{WatchLoop, WatchOptions};
pub use scheduler::{Scheduler, State};
pub use watcher::{FileWatcher, WatchEvent, WatchFilter};

/// Errors that stop watch mode.
#[derive(Debug, thiserror::Error)]
pub enum WatchError {
    #[error("File watch error: {0}")]
    Notify(#[from] notify::Error),

    #[error("File watcher stopped unexpectedly")]
    Closed,
}
