//! The watch loop: file events and the output poll driving a [`Scheduler`].

use std::future::Future;
use std::path::PathBuf;
use std::time::{Duration, Instant};

use tokio::sync::mpsc::Receiver;
use tokio::time::MissedTickBehavior;

use crate::scheduler::Scheduler;
use crate::watcher::{FileWatcher, WatchEvent, WatchFilter};
use crate::WatchError;

/// Timing for the watch loop.
#[derive(Debug, Clone, Copy)]
pub struct WatchOptions {
    /// Quiet period after the last change before a build starts
    pub debounce: Duration,

    /// How often to check that the output directory still exists
    pub poll_interval: Duration,
}

impl Default for WatchOptions {
    fn default() -> Self {
        Self {
            debounce: Duration::from_millis(100),
            poll_interval: Duration::from_secs(1),
        }
    }
}

/// Rebuilds on change until shut down.
///
/// Builds run inline on the loop, so at most one is ever in flight and
/// events arriving meanwhile are folded into a single follow-up build.
pub struct WatchLoop {
    roots: Vec<PathBuf>,
    output_dir: PathBuf,
    filter: WatchFilter,
    options: WatchOptions,
}

impl WatchLoop {
    pub fn new(roots: Vec<PathBuf>, output_dir: impl Into<PathBuf>) -> Self {
        let output_dir = output_dir.into();
        Self {
            roots,
            filter: WatchFilter::new().ignore_dir(&output_dir),
            output_dir,
            options: WatchOptions::default(),
        }
    }

    pub fn with_options(mut self, options: WatchOptions) -> Self {
        self.options = options;
        self
    }

    /// Extend the event filter. The output directory is always ignored.
    pub fn with_filter(mut self, f: impl FnOnce(WatchFilter) -> WatchFilter) -> Self {
        self.filter = f(self.filter);
        self
    }

    /// Run until Ctrl-C.
    pub async fn run<F, E>(self, build: F) -> Result<(), WatchError>
    where
        F: FnMut() -> Result<(), E>,
        E: std::fmt::Display,
    {
        self.run_until(build, async {
            let _ = tokio::signal::ctrl_c().await;
        })
        .await
    }

    /// Run until `shutdown` completes.
    ///
    /// Build failures are logged and the loop keeps watching.
    pub async fn run_until<F, E, S>(self, mut build: F, shutdown: S) -> Result<(), WatchError>
    where
        F: FnMut() -> Result<(), E>,
        E: std::fmt::Display,
        S: Future<Output = ()>,
    {
        let (_watcher, mut events) = FileWatcher::new(&self.roots, self.filter.clone())?;
        let mut scheduler = Scheduler::new(self.options.debounce);
        scheduler.on_poll(Instant::now(), self.output_dir.exists());

        let mut poll = tokio::time::interval(self.options.poll_interval);
        poll.set_missed_tick_behavior(MissedTickBehavior::Delay);

        tokio::pin!(shutdown);

        loop {
            let deadline = scheduler.deadline();

            tokio::select! {
                _ = &mut shutdown => break,

                event = events.recv() => match event {
                    Some(event) => {
                        tracing::debug!("Change detected: {}", event.path().display());
                        scheduler.on_change(Instant::now());
                    }
                    None => return Err(WatchError::Closed),
                },

                _ = wait_until(deadline) => {}

                _ = poll.tick() => {
                    if scheduler.on_poll(Instant::now(), self.output_dir.exists()) {
                        tracing::info!(
                            "Output directory {} disappeared, rebuilding",
                            self.output_dir.display()
                        );
                    }
                }
            }

            if scheduler.tick(Instant::now()) {
                match build() {
                    Ok(()) => {}
                    Err(e) => tracing::error!("Build failed: {}", e),
                }
                drain(&mut events, &mut scheduler);
                scheduler.finish(Instant::now(), self.output_dir.exists());
            }
        }

        Ok(())
    }
}

/// Feed events queued during a build into the scheduler.
fn drain(events: &mut Receiver<WatchEvent>, scheduler: &mut Scheduler) {
    while let Ok(event) = events.try_recv() {
        tracing::debug!("Changed during build: {}", event.path().display());
        scheduler.on_change(Instant::now());
    }
}

async fn wait_until(deadline: Option<Instant>) {
    match deadline {
        Some(deadline) => tokio::time::sleep_until(tokio::time::Instant::from_std(deadline)).await,
        None => std::future::pending().await,
    }
}
