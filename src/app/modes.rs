//! View selection and notice severity.
//!
//! These small enums decide which timeline the presentation layer reads and how a
//! transient notice should be styled.
//!
//! # Example
//!
//! ```rust
//! use tweetline::app::modes::{NoticeKind, TimelineKind};
//!
//! let view = TimelineKind::Mention;
//! assert_eq!(view.label(), "Mentions");
//! assert_ne!(NoticeKind::Info, NoticeKind::Error);
//! ```

use serde::{Deserialize, Serialize};

/// Which timeline is currently selected for display.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum TimelineKind {
    /// The primary home timeline.
    #[default]
    Home,

    /// Statuses addressed to the owner.
    Mention,
}

impl TimelineKind {
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Home => "Home",
            Self::Mention => "Mentions",
        }
    }
}

/// Severity of a user-visible notice.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum NoticeKind {
    Info,
    Error,
}
