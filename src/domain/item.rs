//! Timeline entries.
//!
//! A timeline holds [`TimelineItem`]s: statuses, activities about the owner's
//! statuses, and separators marking a stream discontinuity.

use super::status::{Status, StatusId, User};
use serde::{Deserialize, Serialize};

/// What happened in an [`Activity`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ActivityKind {
    /// Someone liked one of the owner's statuses.
    Liked,
}

/// A non-status event about a status, e.g. "X liked your tweet".
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Activity {
    pub kind: ActivityKind,
    pub status: Status,
    pub actor: User,
}

/// One entry of a timeline.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum TimelineItem {
    Status(Status),
    Activity(Activity),
    Separator,
}

impl TimelineItem {
    /// Resolved main-status id of a `Status` entry.
    #[must_use]
    pub fn status_id(&self) -> Option<StatusId> {
        match self {
            Self::Status(s) => Some(s.main_status().id),
            Self::Activity(_) | Self::Separator => None,
        }
    }

    /// Resolved main-status id this entry refers to, including an activity's source.
    #[must_use]
    pub fn refers_to(&self) -> Option<StatusId> {
        match self {
            Self::Status(s) => Some(s.main_status().id),
            Self::Activity(a) => Some(a.status.main_status().id),
            Self::Separator => None,
        }
    }

    #[must_use]
    pub const fn is_separator(&self) -> bool {
        matches!(self, Self::Separator)
    }

    #[must_use]
    pub const fn as_status(&self) -> Option<&Status> {
        match self {
            Self::Status(s) => Some(s),
            _ => None,
        }
    }
}
