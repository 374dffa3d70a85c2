//! Application layer: timeline state, reconciliation rules and the engine loop.
//!
//! This module sits between the signal sources (stream session, gateway, startup
//! sequence) and the readers of timeline snapshots. All timeline mutation happens
//! here, on one task.
//!
//! # Architecture
//!
//! ```text
//! Stream Session ─┐
//! Gateway ────────┼─→ bounded queue → Engine loop → handle_signal → TimelineStore
//! Startup ────────┘                        │                             │
//!                                          └──── Actions ──→ Notifier    └─→ watch / snapshot
//!                                                         └→ HistoryCache
//! ```
//!
//! # Modules
//!
//! - [`actions`]: Side effects emitted after a mutation commits
//! - [`engine`]: Single-writer loop and the [`EngineHandle`] used to reach it
//! - [`handler`]: [`Signal`] kinds and the reconciliation rules
//! - [`identity`]: Owner account and suppressed-user sets
//! - [`modes`]: View selection and notice severity
//! - [`state`]: Timelines and the store that holds them
//!
//! # Example
//!
//! ```rust
//! use tweetline::app::{handle_signal, NotificationSettings, Signal, TimelineKind, TimelineStore};
//!
//! let mut store = TimelineStore::default();
//! handle_signal(&mut store, &Signal::SelectTimeline(TimelineKind::Mention), &NotificationSettings::default())?;
//! assert_eq!(store.current_kind(), TimelineKind::Mention);
//! # Ok::<(), tweetline::TweetlineError>(())
//! ```

pub mod actions;
pub mod engine;
pub mod handler;
pub mod identity;
pub mod modes;
pub mod state;

pub use actions::{Action, Notification, NotificationKind, NotificationSettings};
pub use engine::{Engine, EngineHandle, HistoryCache, Notifier, DEFAULT_QUEUE_CAPACITY};
pub use handler::{handle_signal, Signal};
pub use identity::{BlockSet, Identity};
pub use modes::{NoticeKind, TimelineKind};
pub use state::{Notice, Timeline, TimelineSnapshot, TimelineStore};
