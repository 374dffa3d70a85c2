//! Stream transport seam.
//!
//! The session only needs two things from the network: a way to open a connection and
//! a way to pull decoded events off it. Concrete HTTP streaming clients, file replays
//! and test fakes all sit behind these traits.

use super::event::StreamEvent;
use crate::domain::Result;
use async_trait::async_trait;

/// Opens streaming connections.
#[async_trait]
pub trait StreamTransport: Send + Sync {
    /// Opens a new connection.
    ///
    /// # Errors
    ///
    /// Returns [`TweetlineError::Transport`](crate::TweetlineError::Transport) when the
    /// connection cannot be established.
    async fn open(&self) -> Result<Box<dyn StreamConnection>>;
}

/// One open streaming connection.
#[async_trait]
pub trait StreamConnection: Send {
    /// Next decoded frame. `Ok(None)` means the remote closed the stream.
    ///
    /// Must be cancel-safe: the session drops this future when it is stopped.
    ///
    /// # Errors
    ///
    /// Returns the error that broke the connection. The session does not read again
    /// after an error.
    async fn next_event(&mut self) -> Result<Option<StreamEvent>>;

    /// Releases the connection.
    async fn close(&mut self);
}
