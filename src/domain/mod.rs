//! Domain layer for the tweetline core.
//!
//! This module contains the value types shared by every other layer, independent of
//! transport or runtime concerns.
//!
//! # Organization
//!
//! - [`error`]: Error types and result aliases
//! - [`status`]: Status and user snapshots with one-level retweet resolution
//! - [`item`]: Timeline entries (status, activity, separator)
//!
//! # Examples
//!
//! ```
//! use tweetline::domain::{Status, TimelineItem, User};
//!
//! let item = TimelineItem::Status(Status::new(1, User::new(42, "alice"), "hello"));
//! assert_eq!(item.status_id(), Some(1));
//! ```

pub mod error;
pub mod item;
pub mod status;

pub use error::{ApiError, Rejection, Result, TweetlineError};
pub use item::{Activity, ActivityKind, TimelineItem};
pub use status::{Entities, Hashtag, Status, StatusId, User, UserId, UserMention};
