//! tweetline: stream session and timeline reconciliation core for a social-timeline
//! client.
//!
//! The crate keeps a live, locally consistent view of a remote event stream
//! (statuses, mentions, retweets, likes, deletions) and reconciles it with actions
//! the user performs through a separate request/response API.
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────────────────────┐   ┌──────────────────────────────┐
//! │  Stream Session (stream/)    │   │  Action Gateway (gateway/)   │
//! │  - connect / read / stop     │   │  - guards                    │
//! │  - failure → backoff         │   │  - REST calls                │
//! └──────────────────────────────┘   └──────────────────────────────┘
//!                │      signals (bounded queue)      │
//!                └─────────────────┬─────────────────┘
//! ┌────────────────────────────────────────────────────────────────┐
//! │  Engine (app/engine) → handle_signal (app/handler)             │  ← single writer
//! │  TimelineStore: home, mentions, selected view (app/state)      │
//! │  Identity & Block Set (app/identity)                           │
//! └────────────────────────────────────────────────────────────────┘
//!                                  │
//! ┌────────────────────────────────────────────────────────────────┐
//! │  Domain types (domain/): statuses, timeline items, errors      │
//! └────────────────────────────────────────────────────────────────┘
//! ```
//!
//! [`Client`] wires the pieces together and runs the startup sequence.
//!
//! # Modules
//!
//! - [`app`]: Timeline store, reconciliation rules, engine loop
//! - [`client`]: Startup sequence and suspend/resume
//! - [`domain`]: Status, user and timeline item types, errors
//! - [`gateway`]: Outbound intents and their guards
//! - [`infrastructure`]: Platform paths
//! - [`observability`]: OpenTelemetry tracing with file export
//! - [`stream`]: Stream session state machine and transports
//!
//! # Configuration
//!
//! Read from `<config_dir>/tweetline/config.toml`; every key is optional:
//!
//! ```toml
//! trace_level = "debug"
//! log_to_stderr = true
//! data_dir = "~/.local/share/tweetline"
//! queue_capacity = 256
//!
//! [notifications]
//! reply = true
//! retweet = true
//! quoted = false
//! liked = true
//! ```
//!
//! # Example
//!
//! ```rust
//! use tweetline::app::{Signal, TimelineKind};
//! use tweetline::domain::{Status, User};
//! use tweetline::{initialize, Config};
//!
//! # #[tokio::main(flavor = "current_thread")]
//! # async fn main() -> tweetline::Result<()> {
//! let (engine, handle) = initialize(&Config::default());
//! engine.spawn();
//!
//! let status = Status::new(1, User::new(42, "alice"), "hello");
//! handle.send(Signal::NewStatus { status, streamed: true }).await?;
//! handle.flush().await?;
//!
//! let snapshot = handle.snapshot()?;
//! assert_eq!(snapshot.kind, TimelineKind::Home);
//! assert_eq!(snapshot.items.len(), 1);
//! # Ok(())
//! # }
//! ```

#![allow(clippy::multiple_crate_versions)]

pub mod app;
pub mod client;
pub mod domain;
pub mod gateway;
pub mod infrastructure;
pub mod observability;
pub mod stream;

pub use app::{Engine, EngineHandle, NotificationSettings, Signal, TimelineKind, TimelineStore};
pub use client::Client;
pub use domain::{Result, TweetlineError};

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Runtime configuration, loaded from TOML.
///
/// Missing keys take their defaults, so an empty file is a valid configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    /// Filter directive for spans and events, e.g. `"debug"` or
    /// `"tweetline::stream=trace"`. `RUST_LOG` takes precedence. Default: `"info"`.
    pub trace_level: Option<String>,

    /// Also print events to stderr. Default: `false`.
    pub log_to_stderr: bool,

    /// Where the trace file is written. A leading `~` is expanded. Default: the
    /// platform data directory, see [`infrastructure::data_dir`].
    pub data_dir: Option<PathBuf>,

    /// Bound of the engine's signal queue. Producers wait when it is full.
    /// Default: 256.
    pub queue_capacity: usize,

    /// Which kinds of notification are delivered.
    pub notifications: NotificationSettings,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            trace_level: None,
            log_to_stderr: false,
            data_dir: None,
            queue_capacity: app::DEFAULT_QUEUE_CAPACITY,
            notifications: NotificationSettings::default(),
        }
    }
}

impl Config {
    /// Parses a TOML document.
    ///
    /// # Errors
    ///
    /// Returns [`TweetlineError::Config`] on malformed TOML, unknown keys, or a zero
    /// `queue_capacity`.
    ///
    /// # Example
    ///
    /// ```rust
    /// use tweetline::Config;
    ///
    /// let config = Config::from_toml("queue_capacity = 32\n[notifications]\nliked = false\n")?;
    /// assert_eq!(config.queue_capacity, 32);
    /// assert!(!config.notifications.liked);
    /// assert!(config.notifications.reply);
    /// # Ok::<(), tweetline::TweetlineError>(())
    /// ```
    pub fn from_toml(text: &str) -> Result<Self> {
        let config: Self =
            toml::from_str(text).map_err(|e| TweetlineError::Config(e.to_string()))?;
        if config.queue_capacity == 0 {
            return Err(TweetlineError::Config(
                "queue_capacity must be at least 1".to_string(),
            ));
        }
        Ok(config)
    }

    /// Reads and parses the file at `path`.
    ///
    /// # Errors
    ///
    /// Returns [`TweetlineError::Io`] if the file cannot be read, or
    /// [`TweetlineError::Config`] if it does not parse.
    pub fn load(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)?;
        Self::from_toml(&text).map_err(|e| match e {
            TweetlineError::Config(msg) => {
                TweetlineError::Config(format!("{}: {msg}", path.display()))
            }
            other => other,
        })
    }

    /// Loads `path`, or the default config file when `path` is `None`.
    ///
    /// A missing default file yields [`Config::default`]. An explicitly named file
    /// must exist. `TWEETLINE_CONFIG` names the file when no path is given.
    ///
    /// # Errors
    ///
    /// See [`Config::load`].
    pub fn from_env_and_file(path: Option<&Path>) -> Result<Self> {
        if let Some(path) = path {
            return Self::load(path);
        }
        if let Some(path) = std::env::var_os("TWEETLINE_CONFIG") {
            return Self::load(Path::new(&path));
        }

        let path = infrastructure::config_path();
        match Self::load(&path) {
            Err(TweetlineError::Io(e)) if e.kind() == std::io::ErrorKind::NotFound => {
                tracing::debug!(path = %path.display(), "no config file, using defaults");
                Ok(Self::default())
            }
            other => other,
        }
    }

    /// The configured data directory with `~` expanded, or the platform default.
    #[must_use]
    pub fn resolved_data_dir(&self) -> PathBuf {
        self.data_dir.as_ref().map_or_else(infrastructure::data_dir, |dir| {
            dir.to_str()
                .map_or_else(|| dir.clone(), infrastructure::expand_tilde)
        })
    }
}

/// Builds an engine over an empty store, sized and filtered by `config`.
///
/// The engine is returned unspawned so callers can attach a
/// [`Notifier`](app::Notifier) or [`HistoryCache`](app::HistoryCache) first.
#[must_use]
pub fn initialize(config: &Config) -> (Engine, EngineHandle) {
    tracing::debug!(
        queue_capacity = config.queue_capacity,
        "initializing engine"
    );
    let (engine, handle) = Engine::new(TimelineStore::default(), config.queue_capacity);
    (engine.with_notifications(config.notifications), handle)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn empty_document_is_default() {
        assert_eq!(Config::from_toml("").unwrap(), Config::default());
        assert_eq!(Config::default().queue_capacity, 256);
    }

    #[test]
    fn full_document_round_trips_fields() {
        let config = Config::from_toml(
            r#"
            trace_level = "tweetline=trace"
            log_to_stderr = true
            data_dir = "/var/tmp/tl"
            queue_capacity = 8

            [notifications]
            reply = false
            quoted = false
            "#,
        )
        .unwrap();

        assert_eq!(config.trace_level.as_deref(), Some("tweetline=trace"));
        assert!(config.log_to_stderr);
        assert_eq!(config.resolved_data_dir(), PathBuf::from("/var/tmp/tl"));
        assert_eq!(config.queue_capacity, 8);
        assert!(!config.notifications.reply);
        assert!(config.notifications.retweet);
        assert!(!config.notifications.quoted);
        assert!(config.notifications.liked);
    }

    #[test]
    fn rejects_bad_documents() {
        assert!(matches!(
            Config::from_toml("queue_capacity = 0"),
            Err(TweetlineError::Config(_))
        ));
        assert!(matches!(
            Config::from_toml("scan_paths = \"~\""),
            Err(TweetlineError::Config(_))
        ));
        assert!(matches!(
            Config::from_toml("queue_capacity = \"many\""),
            Err(TweetlineError::Config(_))
        ));
    }

    #[test]
    fn load_reads_file_and_names_it_in_errors() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "log_to_stderr = true").unwrap();
        assert!(Config::load(file.path()).unwrap().log_to_stderr);

        let mut bad = tempfile::NamedTempFile::new().unwrap();
        writeln!(bad, "log_to_stderr = ").unwrap();
        let err = Config::load(bad.path()).unwrap_err().to_string();
        assert!(err.contains(&bad.path().display().to_string()));
    }

    #[test]
    fn explicit_missing_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("absent.toml");
        assert!(matches!(
            Config::from_env_and_file(Some(&missing)),
            Err(TweetlineError::Io(_))
        ));
    }

    #[tokio::test]
    async fn initialize_applies_capacity_and_settings() {
        let config = Config {
            queue_capacity: 4,
            notifications: NotificationSettings::silent(),
            ..Config::default()
        };
        let (engine, handle) = initialize(&config);
        engine.spawn();

        handle.send(Signal::SelectTimeline(TimelineKind::Mention)).await.unwrap();
        assert_eq!(handle.flush().await.unwrap(), 1);
        assert_eq!(handle.snapshot().unwrap().kind, TimelineKind::Mention);
    }
}
