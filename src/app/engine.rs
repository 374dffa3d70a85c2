//! Single-writer engine loop.
//!
//! The [`Engine`] owns the receiving end of a bounded, ordered queue. Stream sessions,
//! the gateway and the startup sequence hold [`EngineHandle`] clones and enqueue
//! [`Signal`]s; the loop applies them one at a time through
//! [`handle_signal`](super::handle_signal), so each signal is atomic with respect to
//! readers and to every other signal.
//!
//! ```text
//!   EngineHandle (Clone)        mpsc (bounded)        Engine (one task)
//!   ┌──────────────────┐  ─────────────────────▶  ┌────────────────────────┐
//!   │ .send(signal)    │                          │ handle_signal           │
//!   │ .flush()         │  ◀─────────────────────  │ revision += 1           │
//!   │ .snapshot()      │   oneshot / watch        │ Notifier, HistoryCache  │
//!   └──────────────────┘                          └────────────────────────┘
//! ```
//!
//! Readers never see a partially applied signal: the store sits behind a lock that
//! the loop holds for exactly one `handle_signal` call.

use super::actions::{Action, Notification, NotificationSettings};
use super::handler::{handle_signal, Signal};
use super::state::{TimelineSnapshot, TimelineStore};
use crate::domain::error::{Result, TweetlineError};
use crate::domain::{Status, StatusId, User};
use std::sync::{Arc, RwLock};
use tokio::sync::{mpsc, oneshot, watch};
use tokio::task::JoinHandle;

/// Default bound of the engine queue.
pub const DEFAULT_QUEUE_CAPACITY: usize = 256;

/// Receives desktop notifications.
pub trait Notifier: Send + Sync {
    fn notify(&self, notification: &Notification);
}

/// Receives accounts and hashtags seen in accepted statuses.
///
/// Implementations must not block; the engine does not wait for persistence.
pub trait HistoryCache: Send + Sync {
    fn record(&self, accounts: &[User], hashtags: &[String]);
}

enum Command {
    Apply(Signal),
    Flush(oneshot::Sender<u64>),
}

/// Cloneable entry point to a running engine.
#[derive(Clone)]
pub struct EngineHandle {
    tx: mpsc::Sender<Command>,
    store: Arc<RwLock<TimelineStore>>,
    revision: watch::Receiver<u64>,
}

impl EngineHandle {
    /// Enqueues a signal, waiting for queue capacity.
    ///
    /// # Errors
    ///
    /// Returns [`TweetlineError::EngineClosed`] if the engine loop has stopped.
    pub async fn send(&self, signal: Signal) -> Result<()> {
        self.tx
            .send(Command::Apply(signal))
            .await
            .map_err(|_| TweetlineError::EngineClosed)
    }

    /// Waits until every signal enqueued before this call has been applied.
    ///
    /// Returns the store revision at that point.
    ///
    /// # Errors
    ///
    /// Returns [`TweetlineError::EngineClosed`] if the engine loop has stopped.
    pub async fn flush(&self) -> Result<u64> {
        let (reply, rx) = oneshot::channel();
        self.tx
            .send(Command::Flush(reply))
            .await
            .map_err(|_| TweetlineError::EngineClosed)?;
        rx.await.map_err(|_| TweetlineError::EngineClosed)
    }

    /// Copy of the active timeline.
    ///
    /// # Errors
    ///
    /// Returns [`TweetlineError::EngineClosed`] if the engine panicked mid-mutation.
    pub fn snapshot(&self) -> Result<TimelineSnapshot> {
        self.read(TimelineStore::snapshot)
    }

    /// Watch channel carrying the store revision, bumped after every committed mutation.
    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<u64> {
        self.revision.clone()
    }

    /// Looks up a displayed status by resolved id.
    ///
    /// # Errors
    ///
    /// Returns [`TweetlineError::EngineClosed`] if the engine panicked mid-mutation.
    pub fn find_status(&self, id: StatusId) -> Result<Option<Status>> {
        self.read(|store| store.find_status(id).cloned())
    }

    /// Runs `f` against the store under the read lock.
    ///
    /// # Errors
    ///
    /// Returns [`TweetlineError::EngineClosed`] if the engine panicked mid-mutation.
    pub fn read<R>(&self, f: impl FnOnce(&TimelineStore) -> R) -> Result<R> {
        let store = self.store.read().map_err(|_| TweetlineError::EngineClosed)?;
        Ok(f(&store))
    }
}

/// The reconciliation loop. Build with [`Engine::new`], then [`Engine::spawn`].
pub struct Engine {
    rx: mpsc::Receiver<Command>,
    store: Arc<RwLock<TimelineStore>>,
    revision: watch::Sender<u64>,
    notifications: NotificationSettings,
    notifier: Option<Arc<dyn Notifier>>,
    history: Option<Arc<dyn HistoryCache>>,
}

impl Engine {
    /// Creates an engine over `store` with a queue bounded at `capacity` (minimum 1).
    #[must_use]
    pub fn new(store: TimelineStore, capacity: usize) -> (Self, EngineHandle) {
        let (tx, rx) = mpsc::channel(capacity.max(1));
        let (revision_tx, revision_rx) = watch::channel(store.revision());
        let store = Arc::new(RwLock::new(store));

        let handle = EngineHandle {
            tx,
            store: Arc::clone(&store),
            revision: revision_rx,
        };
        let engine = Self {
            rx,
            store,
            revision: revision_tx,
            notifications: NotificationSettings::default(),
            notifier: None,
            history: None,
        };
        (engine, handle)
    }

    #[must_use]
    pub const fn with_notifications(mut self, settings: NotificationSettings) -> Self {
        self.notifications = settings;
        self
    }

    #[must_use]
    pub fn with_notifier(mut self, notifier: Arc<dyn Notifier>) -> Self {
        self.notifier = Some(notifier);
        self
    }

    #[must_use]
    pub fn with_history(mut self, history: Arc<dyn HistoryCache>) -> Self {
        self.history = Some(history);
        self
    }

    /// Runs the loop on a new tokio task.
    pub fn spawn(self) -> JoinHandle<()> {
        tokio::spawn(self.run())
    }

    /// Processes commands until every [`EngineHandle`] has been dropped.
    pub async fn run(mut self) {
        tracing::debug!("engine loop started");

        while let Some(command) = self.rx.recv().await {
            match command {
                Command::Apply(signal) => self.apply(&signal),
                Command::Flush(reply) => {
                    let revision = *self.revision.borrow();
                    let _ = reply.send(revision);
                }
            }
        }

        tracing::debug!("engine loop stopped");
    }

    /// Pulls the next enqueued signal without applying it.
    #[cfg(test)]
    pub(crate) async fn next_signal(&mut self) -> Option<Signal> {
        loop {
            match self.rx.recv().await? {
                Command::Apply(signal) => return Some(signal),
                Command::Flush(reply) => {
                    let _ = reply.send(*self.revision.borrow());
                }
            }
        }
    }

    fn apply(&self, signal: &Signal) {
        let outcome = {
            let Ok(mut store) = self.store.write() else {
                tracing::error!(signal = signal.kind(), "timeline store poisoned, signal dropped");
                return;
            };
            handle_signal(&mut store, signal, &self.notifications).map(|(changed, actions)| {
                if changed {
                    store.revision += 1;
                }
                (changed.then_some(store.revision), actions)
            })
        };

        match outcome {
            Ok((revision, actions)) => {
                if let Some(revision) = revision {
                    self.revision.send_replace(revision);
                }
                for action in &actions {
                    self.execute(action);
                }
            }
            Err(e) => {
                tracing::warn!(signal = signal.kind(), error = %e, "signal failed, continuing");
            }
        }
    }

    fn execute(&self, action: &Action) {
        match action {
            Action::Notify(notification) => {
                tracing::debug!(kind = ?notification.kind, status_id = notification.status.id, "notify");
                if let Some(ref notifier) = self.notifier {
                    notifier.notify(notification);
                }
            }
            Action::CacheHistory { accounts, hashtags } => {
                if let Some(ref history) = self.history {
                    history.record(accounts, hashtags);
                }
            }
        }
    }
}
