// src/watch/mod.rs

//! File watching and change detection.
//!
//! This module is responsible for:
//! - Hashing watched files and remembering the last known digest per file.
//! - Turning raw `notify` events into reload signals (event-driven mode).
//! - Periodically re-hashing every watched file (timed mode).
//!
//! It does **not** know what the consumer does with a reload signal.

pub mod event_handler;
pub mod files;
pub mod hash;
pub mod notifier;
pub mod path_utils;
pub mod store;
pub mod timed;
pub mod watcher;

pub use event_handler::{EventDrivenWatcher, Subscriber};
pub use files::{WatchedFile, WatchedFiles};
pub use hash::{compute_file_digest, Digest};
pub use notifier::{notification_channel, NotifyOutcome, ReloadNotifier, ReloadReceiver};
pub use store::HashStore;
pub use timed::TimedWatcher;
pub use watcher::{spawn_watcher, watch_auto, watch_timed, WatcherHandle};
