//! Stream session lifecycle.
//!
//! A [`StreamSession`] drives at most one streaming connection at a time through
//! four states:
//!
//! ```text
//!              connect()                first frame
//! Disconnected ─────────→ Connecting ─────────────────→ Streaming
//!      ↑   ↑                   │                            │
//!      │   │                   │ error / end                │ error / end
//!      │   │                   ↓                            │
//!      │   └── stop() ──── Backoff ←────────────────────────┘
//!      │                       │
//!      └──── stop() ───────────┘ (from any state)
//! ```
//!
//! There is no reconnect timer. Leaving `Backoff` takes an explicit [`connect`] or a
//! resume via [`on_resume`]. Each drop into `Backoff` enqueues exactly one
//! [`Signal::ConnectionFailure`], however the connection broke. The signal is queued
//! before the state changes, so nothing from a later connection can be queued ahead
//! of it.
//!
//! [`connect`]: StreamSession::connect
//! [`on_resume`]: StreamSession::on_resume

use super::transport::{StreamConnection, StreamTransport};
use crate::app::{EngineHandle, Signal};
use crate::domain::error::Result;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use tokio::sync::{oneshot, watch};
use tokio::task::JoinHandle;
use tracing::Instrument;

/// Where the session is in its lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    Disconnected,
    Connecting,
    Streaming,
    Backoff,
}

impl SessionState {
    /// True when no connection is live or being opened.
    #[must_use]
    pub const fn is_stopped(self) -> bool {
        matches!(self, Self::Disconnected | Self::Backoff)
    }
}

struct Inner {
    state: SessionState,
    /// Bumped on every connect and stop so a finished reader cannot touch a newer attempt.
    generation: u64,
    stop: Option<oneshot::Sender<()>>,
    task: Option<JoinHandle<()>>,
}

/// Owns the streaming connection and feeds decoded events to the engine.
///
/// Cheap to clone; clones share the same state.
#[derive(Clone)]
pub struct StreamSession {
    transport: Arc<dyn StreamTransport>,
    engine: EngineHandle,
    inner: Arc<Mutex<Inner>>,
    changes: Arc<watch::Sender<SessionState>>,
}

impl StreamSession {
    #[must_use]
    pub fn new(transport: Arc<dyn StreamTransport>, engine: EngineHandle) -> Self {
        Self {
            transport,
            engine,
            inner: Arc::new(Mutex::new(Inner {
                state: SessionState::Disconnected,
                generation: 0,
                stop: None,
                task: None,
            })),
            changes: Arc::new(watch::channel(SessionState::Disconnected).0),
        }
    }

    /// Records a transition. Called with the lock held so watchers see transitions
    /// in order.
    fn set_state(&self, inner: &mut Inner, state: SessionState) {
        inner.state = state;
        self.changes.send_replace(state);
    }

    fn lock(&self) -> MutexGuard<'_, Inner> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    #[must_use]
    pub fn state(&self) -> SessionState {
        self.lock().state
    }

    #[must_use]
    pub fn is_stopped(&self) -> bool {
        self.state().is_stopped()
    }

    /// Resolves once the session is `Disconnected` or `Backoff`.
    pub async fn stopped(&self) {
        let mut rx = self.changes.subscribe();
        // The sender lives as long as `self`, so this cannot fail.
        let _ = rx.wait_for(|state| state.is_stopped()).await;
    }

    /// Starts a connection attempt from `Disconnected` or `Backoff`.
    ///
    /// The transport is opened on a new reader task, which moves the session to
    /// `Streaming` on the first frame and forwards every decoded event to the engine.
    /// Must be called from within a tokio runtime.
    ///
    /// # Returns
    ///
    /// - `true` if a new attempt was started
    /// - `false` if the session was `Connecting` or `Streaming`; nothing is done, so
    ///   there is never more than one live transport
    ///
    /// # Example
    ///
    /// ```rust,ignore
    /// let session = StreamSession::new(transport, engine);
    /// assert!(session.connect());
    /// assert!(!session.connect());
    /// ```
    pub fn connect(&self) -> bool {
        let mut inner = self.lock();
        if !inner.state.is_stopped() {
            tracing::debug!(state = ?inner.state, "connect ignored, session active");
            return false;
        }

        inner.generation += 1;
        self.set_state(&mut inner, SessionState::Connecting);
        let (stop_tx, stop_rx) = oneshot::channel();
        inner.stop = Some(stop_tx);

        let generation = inner.generation;
        tracing::debug!(generation, "stream connecting");
        let session = self.clone();
        inner.task = Some(tokio::spawn(
            async move { session.read_loop(generation, stop_rx).await }
                .instrument(tracing::debug_span!("stream_session", generation)),
        ));
        true
    }

    /// Tears down the transport and forces `Disconnected`. Idempotent.
    ///
    /// Returns once the reader task has released the connection.
    pub async fn stop(&self) {
        let task = {
            let mut inner = self.lock();
            if inner.state != SessionState::Disconnected {
                tracing::debug!(state = ?inner.state, "stream stopping");
            }
            inner.generation += 1;
            self.set_state(&mut inner, SessionState::Disconnected);
            if let Some(stop) = inner.stop.take() {
                let _ = stop.send(());
            }
            inner.task.take()
        };

        if let Some(task) = task {
            if let Err(e) = task.await {
                tracing::warn!(error = %e, "stream reader task ended abnormally");
            }
        }
    }

    /// Reconnects after the host resumes from sleep.
    ///
    /// No-op unless stopped. Otherwise marks the gap with a connection failure and
    /// starts a new connection attempt. Returns whether a connection was started.
    ///
    /// # Errors
    ///
    /// Returns [`TweetlineError::EngineClosed`](crate::TweetlineError::EngineClosed) if
    /// the engine is gone.
    pub async fn on_resume(&self) -> Result<bool> {
        if !self.is_stopped() {
            tracing::debug!("resume ignored, session active");
            return Ok(false);
        }
        self.engine.send(Signal::ConnectionFailure).await?;
        Ok(self.connect())
    }

    async fn read_loop(&self, generation: u64, mut stop_rx: oneshot::Receiver<()>) {
        let opened = tokio::select! {
            _ = &mut stop_rx => {
                tracing::debug!("stopped while opening");
                return;
            }
            opened = self.transport.open() => opened,
        };

        let mut connection = match opened {
            Ok(connection) => connection,
            Err(e) => {
                self.fail(generation, &e.to_string(), &mut stop_rx).await;
                return;
            }
        };

        let reason = self.pump(generation, connection.as_mut(), &mut stop_rx).await;
        connection.close().await;

        if let Some(reason) = reason {
            self.fail(generation, &reason, &mut stop_rx).await;
        }
    }

    /// Reads until stop, error or end. Returns the failure reason, or `None` on stop.
    async fn pump(
        &self,
        generation: u64,
        connection: &mut dyn StreamConnection,
        stop_rx: &mut oneshot::Receiver<()>,
    ) -> Option<String> {
        loop {
            let next = tokio::select! {
                biased;
                _ = &mut *stop_rx => return None,
                next = connection.next_event() => next,
            };

            let event = match next {
                Ok(Some(event)) => event,
                Ok(None) => return Some("stream ended".to_string()),
                Err(e) => return Some(e.to_string()),
            };

            self.mark_streaming(generation);

            let Some(signal) = event.into_signal() else {
                continue;
            };

            let sent = tokio::select! {
                biased;
                _ = &mut *stop_rx => return None,
                sent = self.engine.send(signal) => sent,
            };
            if sent.is_err() {
                tracing::debug!("engine closed, stream reader exiting");
                return None;
            }
        }
    }

    fn mark_streaming(&self, generation: u64) {
        let mut inner = self.lock();
        if inner.generation == generation && inner.state == SessionState::Connecting {
            tracing::debug!(generation, "stream established");
            self.set_state(&mut inner, SessionState::Streaming);
        }
    }

    fn is_current(&self, generation: u64) -> bool {
        let inner = self.lock();
        inner.generation == generation && !inner.state.is_stopped()
    }

    /// Enqueues one `ConnectionFailure`, then moves to `Backoff`.
    ///
    /// The session stays active until the failure is queued, so a racing
    /// `connect()` is ignored and a new connection's statuses cannot overtake the
    /// outage marker.
    async fn fail(&self, generation: u64, reason: &str, stop_rx: &mut oneshot::Receiver<()>) {
        if !self.is_current(generation) {
            tracing::debug!(reason, "stale stream failure ignored");
            return;
        }

        tracing::warn!(reason, "stream connection failed");
        let sent = tokio::select! {
            biased;
            _ = &mut *stop_rx => {
                tracing::debug!("stopped while reporting failure");
                return;
            }
            sent = self.engine.send(Signal::ConnectionFailure) => sent,
        };
        if sent.is_err() {
            tracing::debug!("engine closed, connection failure not delivered");
        }

        let mut inner = self.lock();
        if inner.generation == generation && !inner.state.is_stopped() {
            self.set_state(&mut inner, SessionState::Backoff);
            inner.stop = None;
        }
    }
}
