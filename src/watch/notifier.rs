// src/watch/notifier.rs

//! Single-slot reload signal between a watcher and its consumer.
//!
//! The channel holds at most one pending signal. When the consumer has not
//! drained the previous one yet, a new signal is coalesced into it instead of
//! blocking the watch loop: the consumer reloads everything on any signal, so
//! one pending signal already covers every change that happened before it is
//! received.

use tokio::sync::mpsc;
use tokio::sync::mpsc::error::{TryRecvError, TrySendError};

/// What happened to a signal handed to [`ReloadNotifier::notify`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotifyOutcome {
    /// Queued for the consumer.
    Sent,
    /// A signal was already pending; this one was merged into it.
    Coalesced,
    /// The receiver is gone.
    Closed,
}

/// Sending half, owned by a watcher.
#[derive(Debug, Clone)]
pub struct ReloadNotifier {
    tx: mpsc::Sender<()>,
}

/// Receiving half, owned by the reloader.
#[derive(Debug)]
pub struct ReloadReceiver {
    rx: mpsc::Receiver<()>,
}

/// Create a connected notifier/receiver pair with a one-slot buffer.
pub fn notification_channel() -> (ReloadNotifier, ReloadReceiver) {
    let (tx, rx) = mpsc::channel(1);
    (ReloadNotifier { tx }, ReloadReceiver { rx })
}

impl ReloadNotifier {
    /// Signal the consumer without ever waiting on it.
    pub fn notify(&self) -> NotifyOutcome {
        match self.tx.try_send(()) {
            Ok(()) => NotifyOutcome::Sent,
            Err(TrySendError::Full(())) => NotifyOutcome::Coalesced,
            Err(TrySendError::Closed(())) => NotifyOutcome::Closed,
        }
    }
}

impl ReloadReceiver {
    /// Wait for the next signal. `None` once every notifier is dropped.
    pub async fn recv(&mut self) -> Option<()> {
        self.rx.recv().await
    }

    pub fn try_recv(&mut self) -> Result<(), TryRecvError> {
        self.rx.try_recv()
    }
}
