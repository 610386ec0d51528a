// src/watch/watcher.rs

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use notify::{Config, Event, RecommendedWatcher, Watcher};
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{info, info_span, Instrument};

use crate::errors::{Result, WatchError};
use crate::fs::{FileSystem, RealFileSystem};
use crate::types::WatchMode;
use crate::watch::event_handler::{EventDrivenWatcher, Subscriber};
use crate::watch::files::WatchedFiles;
use crate::watch::notifier::ReloadNotifier;
use crate::watch::timed::TimedWatcher;

type RawEvents = mpsc::UnboundedReceiver<notify::Result<Event>>;
type EventSink = mpsc::UnboundedSender<notify::Result<Event>>;

/// Handle for a watcher running as a background task.
///
/// Dropping the handle does not stop the watcher; call [`shutdown`] or cancel
/// the token from [`cancellation_token`].
///
/// [`shutdown`]: WatcherHandle::shutdown
/// [`cancellation_token`]: WatcherHandle::cancellation_token
pub struct WatcherHandle {
    shutdown: CancellationToken,
    task: JoinHandle<Result<()>>,
}

impl std::fmt::Debug for WatcherHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WatcherHandle")
            .field("cancelled", &self.shutdown.is_cancelled())
            .field("finished", &self.task.is_finished())
            .finish()
    }
}

impl WatcherHandle {
    pub fn cancellation_token(&self) -> CancellationToken {
        self.shutdown.clone()
    }

    /// True once the watcher loop has returned.
    pub fn is_finished(&self) -> bool {
        self.task.is_finished()
    }

    /// Wait for the watcher to stop on its own (receiver dropped or token
    /// cancelled elsewhere).
    pub async fn join(self) -> Result<()> {
        match self.task.await {
            Ok(res) => res,
            Err(join_err) => Err(WatchError::Other(join_err.into())),
        }
    }

    /// Cancel the watcher and wait for its loop to exit.
    pub async fn shutdown(self) -> Result<()> {
        self.shutdown.cancel();
        self.join().await
    }
}

/// Start a watcher for `files` in the given mode as a tokio task.
///
/// Setup problems (duplicate base names, no OS watcher available, zero
/// interval) are returned here rather than from the task. Must be called from
/// within a tokio runtime.
pub fn spawn_watcher(
    mode: WatchMode,
    files: Vec<PathBuf>,
    notifier: ReloadNotifier,
) -> Result<WatcherHandle> {
    let files = WatchedFiles::new(files)?;
    let fs: Arc<dyn FileSystem> = Arc::new(RealFileSystem);
    let shutdown = CancellationToken::new();

    let task = match mode {
        WatchMode::Auto => {
            let span = info_span!("watch_auto", files = files.len());
            let (watcher, events) =
                span.in_scope(|| start_event_driven(files, fs, notifier, os_watcher))?;
            tokio::spawn(watcher.run(events, shutdown.clone()).instrument(span))
        }
        WatchMode::Timed(period) => {
            let span = info_span!("watch_timed", files = files.len(), ?period);
            let watcher = span.in_scope(|| TimedWatcher::new(files, period, fs, notifier))?;
            tokio::spawn(watcher.run(shutdown.clone()).instrument(span))
        }
    };

    Ok(WatcherHandle { shutdown, task })
}

/// Watch `files` using OS-level notification until `shutdown` is cancelled
/// or the notification receiver is dropped.
///
/// Fails only if the files are invalid as a set or the OS watcher cannot be
/// created at all; everything after that is logged and survived.
pub async fn watch_auto(
    files: Vec<PathBuf>,
    notifier: ReloadNotifier,
    shutdown: CancellationToken,
) -> Result<()> {
    let files = WatchedFiles::new(files)?;
    let span = info_span!("watch_auto", files = files.len());
    let (watcher, events) =
        span.in_scope(|| start_event_driven(files, Arc::new(RealFileSystem), notifier, os_watcher))?;
    watcher.run(events, shutdown).instrument(span).await
}

/// Watch `files` by re-hashing them every `interval` until `shutdown` is
/// cancelled or the notification receiver is dropped.
pub async fn watch_timed(
    files: Vec<PathBuf>,
    interval: Duration,
    notifier: ReloadNotifier,
    shutdown: CancellationToken,
) -> Result<()> {
    let files = WatchedFiles::new(files)?;
    let span = info_span!("watch_timed", files = files.len(), period = ?interval);
    let watcher = span.in_scope(|| {
        TimedWatcher::new(files, interval, Arc::new(RealFileSystem), notifier)
    })?;
    watcher.run(shutdown).instrument(span).await
}

/// OS-level watcher whose callback forwards every raw event into `sink`.
fn os_watcher(sink: EventSink) -> notify::Result<RecommendedWatcher> {
    RecommendedWatcher::new(
        move |res: notify::Result<Event>| {
            // Fails only after the loop has exited, when nobody is listening.
            let _ = sink.send(res);
        },
        Config::default(),
    )
}

/// Create the subscriber via `make_subscriber`, hash the initial state and
/// subscribe to every watched file and its directory.
///
/// A subscriber that cannot be created aborts startup with
/// [`WatchError::Setup`] before anything is hashed or subscribed.
fn start_event_driven<S, F>(
    files: WatchedFiles,
    fs: Arc<dyn FileSystem>,
    notifier: ReloadNotifier,
    make_subscriber: F,
) -> Result<(EventDrivenWatcher<S>, RawEvents)>
where
    S: Subscriber,
    F: FnOnce(EventSink) -> notify::Result<S>,
{
    // Channel from the blocking notify callback into the async world.
    let (event_tx, event_rx) = mpsc::unbounded_channel::<notify::Result<Event>>();

    let subscriber = make_subscriber(event_tx).map_err(WatchError::Setup)?;

    let mut watcher = EventDrivenWatcher::new(files, fs, subscriber, notifier);
    watcher.subscribe_all();
    info!("file watcher started");

    Ok((watcher, event_rx))
}
