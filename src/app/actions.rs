//! Side effects emitted by the reconciliation handler.
//!
//! [`handle_signal`](super::handle_signal) never performs I/O. Anything that leaves
//! the process (desktop notifications, the account/hashtag history cache) is
//! described as an [`Action`] and executed by the engine after the mutation has been
//! committed.
//!
//! # Example
//!
//! ```rust
//! use tweetline::app::{Action, NotificationKind};
//!
//! let action = Action::CacheHistory { accounts: vec![], hashtags: vec!["rust".into()] };
//! assert!(matches!(action, Action::CacheHistory { .. }));
//! assert_eq!(NotificationKind::Reply.title("alice"), "Reply from @alice");
//! ```

use crate::domain::{Status, User};
use serde::{Deserialize, Serialize};

/// Commands the engine executes once a signal has been applied.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    /// Raise a desktop notification.
    Notify(Notification),

    /// Feed accounts and hashtags seen in an accepted status to the history cache.
    ///
    /// Fire-and-forget: failures are logged by the cache and never reach the engine.
    CacheHistory {
        accounts: Vec<User>,
        hashtags: Vec<String>,
    },
}

/// Why the owner is being notified.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum NotificationKind {
    Reply,
    Retweet,
    Quoted,
    Liked,
}

impl NotificationKind {
    /// Title line shown by the notifier.
    #[must_use]
    pub fn title(self, actor: &str) -> String {
        match self {
            Self::Reply => format!("Reply from @{actor}"),
            Self::Retweet => format!("Retweeted by @{actor}"),
            Self::Quoted => format!("Quoted by @{actor}"),
            Self::Liked => format!("Liked by @{actor}"),
        }
    }
}

/// A desktop notification about something done to the owner's statuses.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    pub kind: NotificationKind,
    pub actor: User,
    pub status: Status,
}

impl Notification {
    #[must_use]
    pub fn title(&self) -> String {
        self.kind.title(&self.actor.screen_name)
    }

    /// Body text: the status the notification is about.
    #[must_use]
    pub fn body(&self) -> &str {
        &self.status.main_status().text
    }
}

/// Which notification kinds are enabled.
///
/// # Example
///
/// ```toml
/// [notifications]
/// reply = true
/// retweet = true
/// quoted = true
/// liked = false
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct NotificationSettings {
    pub reply: bool,
    pub retweet: bool,
    pub quoted: bool,
    pub liked: bool,
}

impl Default for NotificationSettings {
    fn default() -> Self {
        Self {
            reply: true,
            retweet: true,
            quoted: true,
            liked: true,
        }
    }
}

impl NotificationSettings {
    /// All kinds disabled.
    #[must_use]
    pub const fn silent() -> Self {
        Self {
            reply: false,
            retweet: false,
            quoted: false,
            liked: false,
        }
    }

    #[must_use]
    pub const fn enabled(&self, kind: NotificationKind) -> bool {
        match kind {
            NotificationKind::Reply => self.reply,
            NotificationKind::Retweet => self.retweet,
            NotificationKind::Quoted => self.quoted,
            NotificationKind::Liked => self.liked,
        }
    }
}
