//! File-backed stream transport.
//!
//! Replays a newline-delimited JSON capture of a user stream. Blank lines are
//! treated as keep-alives and skipped. The end of the file ends the stream, which the
//! session reports as a connection failure just like a remote disconnect.

use super::event::StreamEvent;
use super::transport::{StreamConnection, StreamTransport};
use crate::domain::error::{Result, TweetlineError};
use async_trait::async_trait;
use std::path::PathBuf;
use tokio::fs::File;
use tokio::io::{AsyncBufReadExt, BufReader, Lines};

/// Opens a fresh reader over the same capture on every connect.
#[derive(Debug, Clone)]
pub struct ReplayTransport {
    path: PathBuf,
}

impl ReplayTransport {
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

#[async_trait]
impl StreamTransport for ReplayTransport {
    async fn open(&self) -> Result<Box<dyn StreamConnection>> {
        let file = File::open(&self.path).await.map_err(|e| {
            TweetlineError::Transport(format!("cannot open {}: {e}", self.path.display()))
        })?;
        tracing::debug!(path = %self.path.display(), "replay opened");
        Ok(Box::new(ReplayConnection {
            lines: Some(BufReader::new(file).lines()),
            frames: 0,
        }))
    }
}

struct ReplayConnection {
    lines: Option<Lines<BufReader<File>>>,
    frames: u64,
}

#[async_trait]
impl StreamConnection for ReplayConnection {
    async fn next_event(&mut self) -> Result<Option<StreamEvent>> {
        let Some(lines) = self.lines.as_mut() else {
            return Ok(None);
        };
        loop {
            let Some(line) = lines.next_line().await? else {
                tracing::debug!(frames = self.frames, "replay exhausted");
                return Ok(None);
            };
            if line.trim().is_empty() {
                continue;
            }
            self.frames += 1;
            return Ok(Some(StreamEvent::from_frame(&line)));
        }
    }

    async fn close(&mut self) {
        self.lines = None;
    }
}
