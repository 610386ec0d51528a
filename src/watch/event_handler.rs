// src/watch/event_handler.rs

//! Event-driven change detection.
//!
//! Raw notify events are mapped to watched files by base name, run through
//! the hash store, and turned into at most one reload signal per event.

use std::path::Path;
use std::sync::Arc;

use notify::event::{AccessKind, AccessMode, ModifyKind, RenameMode};
use notify::{Event, EventKind, RecommendedWatcher, RecursiveMode, Watcher};
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use crate::errors::{Result, WatchError};
use crate::fs::FileSystem;
use crate::watch::files::WatchedFiles;
use crate::watch::notifier::{NotifyOutcome, ReloadNotifier};
use crate::watch::store::HashStore;

/// Something that can (re-)register an OS-level watch on a single path.
pub trait Subscriber {
    fn subscribe(&mut self, path: &Path) -> Result<()>;
}

impl Subscriber for RecommendedWatcher {
    fn subscribe(&mut self, path: &Path) -> Result<()> {
        self.watch(path, RecursiveMode::NonRecursive)
            .map_err(WatchError::Subscribe)
    }
}

/// State of a running event-driven watcher.
///
/// Owns the hash store and the OS subscription; processes one event at a time.
pub struct EventDrivenWatcher<S: Subscriber> {
    files: WatchedFiles,
    store: HashStore,
    fs: Arc<dyn FileSystem>,
    subscriber: S,
    notifier: ReloadNotifier,
}

impl<S: Subscriber> std::fmt::Debug for EventDrivenWatcher<S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EventDrivenWatcher")
            .field("files", &self.files)
            .field("store", &self.store)
            .finish_non_exhaustive()
    }
}

impl<S: Subscriber> EventDrivenWatcher<S> {
    /// Hash the initial state of `files`. Does not subscribe yet.
    pub fn new(
        files: WatchedFiles,
        fs: Arc<dyn FileSystem>,
        subscriber: S,
        notifier: ReloadNotifier,
    ) -> Self {
        let store = HashStore::populate(fs.as_ref(), &files);
        Self {
            files,
            store,
            fs,
            subscriber,
            notifier,
        }
    }

    pub fn store(&self) -> &HashStore {
        &self.store
    }

    pub fn subscriber(&self) -> &S {
        &self.subscriber
    }

    /// Subscribe to every watched file and every containing directory.
    ///
    /// Both are needed: writes in place show up on the file, while
    /// delete/recreate and rename-over only reliably show up on the directory.
    /// Failures are logged; a missing file is picked up later via its
    /// directory.
    pub fn subscribe_all(&mut self) {
        for file in self.files.iter() {
            if let Err(err) = self.subscriber.subscribe(file.path()) {
                warn!(file = %file.display_name(), error = %err, "could not watch file");
            }
        }
        for dir in self.files.directories() {
            if let Err(err) = self.subscriber.subscribe(&dir) {
                warn!(dir = ?dir, error = %err, "could not watch directory");
            }
        }
    }

    /// Process one raw event.
    ///
    /// Returns `None` when no watched file changed, otherwise the outcome of
    /// the single reload signal emitted for this event.
    pub fn handle_event(&mut self, event: &Event) -> Option<NotifyOutcome> {
        if is_read_only_access(&event.kind) {
            return None;
        }

        let mut changed = false;

        for (index, path) in event.paths.iter().enumerate() {
            let Some(file) = self.files.match_event_path(path) else {
                continue;
            };
            debug!(file = %file.display_name(), kind = ?event.kind, "received fs event");

            // A create usually follows a delete, which can silently drop the
            // direct watch on the file.
            if recreates_path(event, index) {
                if let Err(err) = self.subscriber.subscribe(file.path()) {
                    warn!(file = %file.display_name(), error = %err, "could not re-watch file");
                }
            }

            if self.store.has_changed(self.fs.as_ref(), file.path()) {
                info!(file = %file.display_name(), "detected change");
                changed = true;
            } else {
                debug!(file = %file.display_name(), "no change");
            }
        }

        if !changed {
            return None;
        }

        let outcome = self.notifier.notify();
        if outcome == NotifyOutcome::Coalesced {
            debug!("reload already pending; coalesced");
        }
        Some(outcome)
    }

    /// Errors from the OS layer never stop the loop.
    pub fn handle_error(&self, err: &notify::Error) {
        warn!(error = %err, "error watching file");
    }

    /// Consume raw events until cancelled, until the event stream ends, or
    /// until the notification receiver is dropped.
    pub async fn run(
        mut self,
        mut events: mpsc::UnboundedReceiver<notify::Result<Event>>,
        shutdown: CancellationToken,
    ) -> Result<()> {
        loop {
            tokio::select! {
                biased;

                _ = shutdown.cancelled() => {
                    info!("shutdown requested; stopping event watcher");
                    break;
                }
                next = events.recv() => match next {
                    Some(Ok(event)) => {
                        if self.handle_event(&event) == Some(NotifyOutcome::Closed) {
                            info!("notification receiver dropped; stopping event watcher");
                            break;
                        }
                    }
                    Some(Err(err)) => self.handle_error(&err),
                    None => {
                        info!("event stream closed; stopping event watcher");
                        break;
                    }
                },
            }
        }
        Ok(())
    }
}

/// Opens and reads (including our own hashing reads) carry no new content.
/// Close-after-write does, so it is kept.
fn is_read_only_access(kind: &EventKind) -> bool {
    match kind {
        EventKind::Access(AccessKind::Close(AccessMode::Write)) => false,
        EventKind::Access(_) => true,
        _ => false,
    }
}

/// Whether `event.paths[index]` now refers to a new inode: a create, or the
/// destination of a rename (atomic replace).
fn recreates_path(event: &Event, index: usize) -> bool {
    match event.kind {
        EventKind::Create(_) => true,
        EventKind::Modify(ModifyKind::Name(RenameMode::To)) => true,
        EventKind::Modify(ModifyKind::Name(RenameMode::Both)) => index + 1 == event.paths.len(),
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fs::mock::MockFileSystem;
    use crate::watch::notifier::{notification_channel, ReloadReceiver};
    use notify::event::{CreateKind, DataChange, RemoveKind};
    use std::path::PathBuf;

    #[derive(Debug, Default)]
    struct RecordingSubscriber {
        subscribed: Vec<PathBuf>,
    }

    impl Subscriber for RecordingSubscriber {
        fn subscribe(&mut self, path: &Path) -> Result<()> {
            self.subscribed.push(path.to_path_buf());
            Ok(())
        }
    }

    /// Every subscription attempt fails, as when a watched file is missing or
    /// the inotify watch limit is exhausted.
    #[derive(Debug, Default)]
    struct RefusingSubscriber {
        attempts: Vec<PathBuf>,
    }

    impl Subscriber for RefusingSubscriber {
        fn subscribe(&mut self, path: &Path) -> Result<()> {
            self.attempts.push(path.to_path_buf());
            Err(WatchError::Subscribe(notify::Error::path_not_found()))
        }
    }

    fn setup() -> (
        MockFileSystem,
        EventDrivenWatcher<RecordingSubscriber>,
        ReloadReceiver,
    ) {
        let fs = MockFileSystem::new();
        fs.add_file("conf/a.txt", "hello");
        fs.add_file("conf/b.txt", "bee");
        let files = WatchedFiles::new(["conf/a.txt", "conf/b.txt"]).unwrap();
        let (notifier, receiver) = notification_channel();
        let watcher = EventDrivenWatcher::new(
            files,
            Arc::new(fs.clone()),
            RecordingSubscriber::default(),
            notifier,
        );
        (fs, watcher, receiver)
    }

    fn event(kind: EventKind, path: &str) -> Event {
        Event::new(kind).add_path(PathBuf::from(path))
    }

    fn modify(path: &str) -> Event {
        event(EventKind::Modify(ModifyKind::Data(DataChange::Content)), path)
    }

    #[test]
    fn subscribes_files_then_directories() {
        let (_fs, mut watcher, _rx) = setup();
        watcher.subscribe_all();

        assert_eq!(
            watcher.subscriber().subscribed,
            vec![
                PathBuf::from("conf/a.txt"),
                PathBuf::from("conf/b.txt"),
                PathBuf::from("conf"),
            ]
        );
    }

    #[test]
    fn content_change_emits_one_signal() {
        let (fs, mut watcher, mut rx) = setup();

        fs.add_file("conf/a.txt", "world");
        let outcome = watcher.handle_event(&modify("/abs/conf/a.txt"));

        assert_eq!(outcome, Some(NotifyOutcome::Sent));
        assert!(rx.try_recv().is_ok());
        assert!(rx.try_recv().is_err());
    }

    #[test]
    fn duplicate_events_for_the_same_write_are_ignored() {
        let (fs, mut watcher, mut rx) = setup();

        fs.add_file("conf/a.txt", "world");
        // Once from the file watch, once from the directory watch.
        assert_eq!(watcher.handle_event(&modify("conf/a.txt")), Some(NotifyOutcome::Sent));
        assert_eq!(watcher.handle_event(&modify("conf/a.txt")), None);

        assert!(rx.try_recv().is_ok());
        assert!(rx.try_recv().is_err());
    }

    #[test]
    fn unrelated_files_are_filtered_out() {
        let (fs, mut watcher, mut rx) = setup();

        fs.add_file("conf/other.txt", "x");
        assert_eq!(watcher.handle_event(&modify("conf/other.txt")), None);
        assert!(rx.try_recv().is_err());
    }

    #[test]
    fn create_re_registers_the_watched_path() {
        let (fs, mut watcher, _rx) = setup();

        fs.remove_file("conf/a.txt");
        assert_eq!(
            watcher.handle_event(&event(EventKind::Remove(RemoveKind::File), "conf/a.txt")),
            None
        );

        fs.add_file("conf/a.txt", "hello");
        let outcome =
            watcher.handle_event(&event(EventKind::Create(CreateKind::File), "/x/conf/a.txt"));

        // Same content as before the delete: no reload, but the watch is back.
        assert_eq!(outcome, None);
        assert_eq!(watcher.subscriber().subscribed, vec![PathBuf::from("conf/a.txt")]);
    }

    #[test]
    fn atomic_rename_over_re_registers_destination_only() {
        let (fs, mut watcher, mut rx) = setup();

        fs.add_file("conf/a.txt", "replaced");
        let rename = Event::new(EventKind::Modify(ModifyKind::Name(RenameMode::Both)))
            .add_path(PathBuf::from("conf/.a.txt.tmp"))
            .add_path(PathBuf::from("conf/a.txt"));

        assert_eq!(watcher.handle_event(&rename), Some(NotifyOutcome::Sent));
        assert_eq!(watcher.subscriber().subscribed, vec![PathBuf::from("conf/a.txt")]);
        assert!(rx.try_recv().is_ok());
    }

    #[test]
    fn several_changed_paths_in_one_event_signal_once() {
        let (fs, mut watcher, mut rx) = setup();

        fs.add_file("conf/a.txt", "1");
        fs.add_file("conf/b.txt", "2");
        let ev = Event::new(EventKind::Any)
            .add_path(PathBuf::from("conf/a.txt"))
            .add_path(PathBuf::from("conf/b.txt"));

        assert_eq!(watcher.handle_event(&ev), Some(NotifyOutcome::Sent));
        assert!(rx.try_recv().is_ok());
        assert!(rx.try_recv().is_err());
    }

    #[test]
    fn read_only_access_is_skipped() {
        let (fs, mut watcher, _rx) = setup();

        fs.add_file("conf/a.txt", "changed");
        let open = event(EventKind::Access(AccessKind::Open(AccessMode::Any)), "conf/a.txt");
        assert_eq!(watcher.handle_event(&open), None);

        let close_write = event(
            EventKind::Access(AccessKind::Close(AccessMode::Write)),
            "conf/a.txt",
        );
        assert_eq!(watcher.handle_event(&close_write), Some(NotifyOutcome::Sent));
    }

    #[test]
    fn unreadable_file_does_not_signal() {
        let (fs, mut watcher, mut rx) = setup();

        fs.remove_file("conf/b.txt");
        assert_eq!(watcher.handle_event(&modify("conf/b.txt")), None);
        assert!(rx.try_recv().is_err());
        assert!(watcher.store().get("b.txt").is_some());
    }

    #[test]
    fn subscription_failures_do_not_stop_detection() {
        let fs = MockFileSystem::new();
        fs.add_file("conf/a.txt", "hello");
        let files = WatchedFiles::new(["conf/a.txt"]).unwrap();
        let (notifier, mut rx) = notification_channel();
        let mut watcher = EventDrivenWatcher::new(
            files,
            Arc::new(fs.clone()),
            RefusingSubscriber::default(),
            notifier,
        );

        watcher.subscribe_all();
        assert_eq!(
            watcher.subscriber().attempts,
            vec![PathBuf::from("conf/a.txt"), PathBuf::from("conf")]
        );

        fs.add_file("conf/a.txt", "world");
        assert_eq!(watcher.handle_event(&modify("conf/a.txt")), Some(NotifyOutcome::Sent));
        assert!(rx.try_recv().is_ok());

        // Re-subscribing after a recreate fails too; the change still counts.
        fs.add_file("conf/a.txt", "recreated");
        let outcome =
            watcher.handle_event(&event(EventKind::Create(CreateKind::File), "conf/a.txt"));
        assert_eq!(outcome, Some(NotifyOutcome::Sent));
        assert_eq!(watcher.subscriber().attempts.len(), 3);
        assert!(rx.try_recv().is_ok());
    }

    #[tokio::test]
    async fn run_stops_on_cancellation() {
        let (_fs, watcher, _rx) = setup();
        let (_tx, events) = mpsc::unbounded_channel();
        let shutdown = CancellationToken::new();
        shutdown.cancel();

        watcher.run(events, shutdown).await.unwrap();
    }

    #[tokio::test]
    async fn run_stops_when_receiver_is_dropped() {
        let (fs, watcher, rx) = setup();
        let (tx, events) = mpsc::unbounded_channel();
        drop(rx);

        fs.add_file("conf/a.txt", "world");
        tx.send(Ok(modify("conf/a.txt"))).unwrap();

        watcher.run(events, CancellationToken::new()).await.unwrap();
    }

    #[tokio::test]
    async fn run_survives_watch_errors() {
        let (fs, watcher, mut rx) = setup();
        let (tx, events) = mpsc::unbounded_channel();

        tx.send(Err(notify::Error::generic("queue overflow"))).unwrap();
        fs.add_file("conf/a.txt", "world");
        tx.send(Ok(modify("conf/a.txt"))).unwrap();
        drop(tx);

        watcher.run(events, CancellationToken::new()).await.unwrap();
        assert!(rx.try_recv().is_ok());
    }
}
