//! Streaming connection layer.
//!
//! # Modules
//!
//! - [`event`]: Frame decoding into [`StreamEvent`]s and their engine signals
//! - [`transport`]: The [`StreamTransport`]/[`StreamConnection`] seam
//! - [`session`]: The [`StreamSession`] state machine
//! - [`replay`]: A transport that replays a newline-delimited JSON capture

pub mod event;
pub mod replay;
pub mod session;
pub mod transport;

pub use event::StreamEvent;
pub use replay::ReplayTransport;
pub use session::{SessionState, StreamSession};
pub use transport::{StreamConnection, StreamTransport};
