// src/watch/timed.rs

//! Polling fallback for filesystems where OS notification is unreliable
//! (some FUSE mounts, network filesystems).

use std::sync::Arc;
use std::time::Duration;

use tokio::time::{interval_at, Instant, MissedTickBehavior};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info};

use crate::errors::{Result, WatchError};
use crate::fs::FileSystem;
use crate::watch::files::WatchedFiles;
use crate::watch::notifier::{NotifyOutcome, ReloadNotifier};
use crate::watch::store::HashStore;

/// State of a running timed watcher.
#[derive(Debug)]
pub struct TimedWatcher {
    files: WatchedFiles,
    store: HashStore,
    fs: Arc<dyn FileSystem>,
    notifier: ReloadNotifier,
    period: Duration,
}

impl TimedWatcher {
    /// Hash the initial state of `files`.
    ///
    /// A zero `period`, or one too large to schedule, is rejected.
    pub fn new(
        files: WatchedFiles,
        period: Duration,
        fs: Arc<dyn FileSystem>,
        notifier: ReloadNotifier,
    ) -> Result<Self> {
        if period.is_zero() {
            return Err(WatchError::Config(
                "timed watch interval must be greater than zero".to_string(),
            ));
        }
        first_deadline(period)?;
        let store = HashStore::populate(fs.as_ref(), &files);
        Ok(Self {
            files,
            store,
            fs,
            notifier,
            period,
        })
    }

    pub fn store(&self) -> &HashStore {
        &self.store
    }

    /// Check every watched file once and emit at most one signal for the
    /// whole sweep.
    pub fn sweep(&mut self) -> Option<NotifyOutcome> {
        let mut changed = false;
        for file in self.files.iter() {
            // No short-circuit: every file's digest must be refreshed.
            if self.store.has_changed(self.fs.as_ref(), file.path()) {
                info!(file = %file.display_name(), "detected change, reloading");
                changed = true;
            }
        }

        if !changed {
            debug!("nothing changed, not reloading");
            return None;
        }
        Some(self.notifier.notify())
    }

    /// Sweep once per period until cancelled or until the notification
    /// receiver is dropped. The first sweep happens one full period after
    /// start; ticks missed while sweeping are skipped, not replayed.
    pub async fn run(mut self, shutdown: CancellationToken) -> Result<()> {
        let mut ticker = interval_at(first_deadline(self.period)?, self.period);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

        loop {
            tokio::select! {
                biased;

                _ = shutdown.cancelled() => {
                    info!("shutdown requested; stopping timed watcher");
                    break;
                }
                _ = ticker.tick() => {
                    debug!("running timed check (timer fired)");
                    if self.sweep() == Some(NotifyOutcome::Closed) {
                        info!("notification receiver dropped; stopping timed watcher");
                        break;
                    }
                }
            }
        }
        Ok(())
    }
}

fn first_deadline(period: Duration) -> Result<Instant> {
    Instant::now().checked_add(period).ok_or_else(|| {
        WatchError::Config(format!("timed watch interval {period:?} is too large"))
    })
}
