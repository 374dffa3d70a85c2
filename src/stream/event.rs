//! Stream frame decoding.
//!
//! Each frame of the user stream is one JSON object. Its shape tells what it is:
//!
//! | Frame                                   | Event                      |
//! |-----------------------------------------|----------------------------|
//! | `{"friends": [..]}`                     | [`StreamEvent::Friends`]   |
//! | `{"delete": {"status": {"id": ..}}}`    | [`StreamEvent::Delete`]    |
//! | `{"event": "favorite", ..}`             | [`StreamEvent::Favorite`]  |
//! | `{"id": .., "user": .., "text": ..}`    | [`StreamEvent::Status`]    |
//!
//! Anything else, including malformed JSON, decodes to [`StreamEvent::Unknown`] so a
//! single bad frame never breaks the connection.

use crate::app::Signal;
use crate::domain::{Status, StatusId, User, UserId};
use serde::Deserialize;
use serde_json::Value;

/// One decoded stream frame.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StreamEvent {
    Status(Status),
    Delete { id: StatusId, user_id: Option<UserId> },
    Favorite { source: User, target: User, status: Status },
    Unfavorite { source: User, target: User, status: Status },
    Block { source: User, target: User },
    Unblock { source: User, target: User },
    Mute { source: User, target: User },
    Unmute { source: User, target: User },
    UserUpdate(User),
    /// Initial follow list; not used.
    Friends(Vec<UserId>),
    /// Unrecognized or unparseable frame, with a short description.
    Unknown(String),
}

#[derive(Deserialize)]
struct DeleteFrame {
    delete: DeleteBody,
}

#[derive(Deserialize)]
struct DeleteBody {
    status: DeletedStatus,
}

#[derive(Deserialize)]
struct DeletedStatus {
    id: StatusId,
    #[serde(default)]
    user_id: Option<UserId>,
}

#[derive(Deserialize)]
struct UserEventFrame {
    event: String,
    source: User,
    target: Option<User>,
    target_object: Option<Status>,
}

#[derive(Deserialize)]
struct FriendsFrame {
    friends: Vec<UserId>,
}

impl StreamEvent {
    /// Decodes one frame. Never fails; see [`StreamEvent::Unknown`].
    ///
    /// # Example
    ///
    /// ```rust
    /// use tweetline::stream::StreamEvent;
    ///
    /// let event = StreamEvent::from_frame(r#"{"delete":{"status":{"id":5,"user_id":9}}}"#);
    /// assert_eq!(event, StreamEvent::Delete { id: 5, user_id: Some(9) });
    /// assert!(matches!(StreamEvent::from_frame("{oops"), StreamEvent::Unknown(_)));
    /// ```
    #[must_use]
    pub fn from_frame(frame: &str) -> Self {
        let value: Value = match serde_json::from_str(frame) {
            Ok(v) => v,
            Err(e) => return Self::Unknown(format!("malformed frame: {e}")),
        };
        Self::from_value(value)
    }

    fn from_value(value: Value) -> Self {
        let Some(object) = value.as_object() else {
            return Self::Unknown("frame is not an object".to_string());
        };

        let result = if object.contains_key("friends") {
            serde_json::from_value::<FriendsFrame>(value).map(|f| Self::Friends(f.friends))
        } else if object.contains_key("delete") {
            serde_json::from_value::<DeleteFrame>(value).map(|f| Self::Delete {
                id: f.delete.status.id,
                user_id: f.delete.status.user_id,
            })
        } else if object.contains_key("event") {
            return serde_json::from_value::<UserEventFrame>(value)
                .map_or_else(|e| Self::Unknown(format!("bad event frame: {e}")), Self::from_user_event);
        } else if object.contains_key("id") && object.contains_key("user") {
            serde_json::from_value::<Status>(value).map(Self::Status)
        } else {
            let keys: Vec<&str> = object.keys().map(String::as_str).take(4).collect();
            return Self::Unknown(format!("unrecognized frame with keys {keys:?}"));
        };

        result.unwrap_or_else(|e| Self::Unknown(format!("bad frame: {e}")))
    }

    fn from_user_event(frame: UserEventFrame) -> Self {
        let UserEventFrame { event, source, target, target_object } = frame;
        match (event.as_str(), target, target_object) {
            ("favorite", Some(target), Some(status)) => Self::Favorite { source, target, status },
            ("unfavorite", Some(target), Some(status)) => Self::Unfavorite { source, target, status },
            ("block", Some(target), _) => Self::Block { source, target },
            ("unblock", Some(target), _) => Self::Unblock { source, target },
            ("mute", Some(target), _) => Self::Mute { source, target },
            ("unmute", Some(target), _) => Self::Unmute { source, target },
            ("user_update", _, _) => Self::UserUpdate(source),
            (other, _, _) => Self::Unknown(format!("unhandled event '{other}'")),
        }
    }

    /// The engine signal this event stands for, if any.
    ///
    /// Block and mute notices only arrive for actions the owner took, so they extend or
    /// reduce the block set directly.
    #[must_use]
    pub fn into_signal(self) -> Option<Signal> {
        match self {
            Self::Status(status) => Some(Signal::NewStatus { status, streamed: true }),
            Self::Delete { id, .. } => Some(Signal::Deleted(id)),
            Self::Favorite { source, status, .. } => Some(Signal::StatusLiked { status, actor: source }),
            Self::Block { target, .. } | Self::Mute { target, .. } => {
                Some(Signal::BlockAdded(vec![target.id]))
            }
            Self::Unblock { target, .. } | Self::Unmute { target, .. } => {
                Some(Signal::BlockRemoved(vec![target.id]))
            }
            Self::UserUpdate(user) => Some(Signal::OwnerUpdated(user)),
            Self::Unfavorite { status, .. } => {
                tracing::debug!(status_id = status.id, "unfavorite event ignored");
                None
            }
            Self::Friends(ids) => {
                tracing::debug!(count = ids.len(), "friends list ignored");
                None
            }
            Self::Unknown(reason) => {
                tracing::debug!(reason = %reason, "unknown stream frame dropped");
                None
            }
        }
    }
}
