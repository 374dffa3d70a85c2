//! Status and user value types.
//!
//! A [`Status`] is one timeline-eligible post. Retweets wrap the original status by
//! value in `retweeted_status`; the wrap is exactly one level deep, so anything that
//! means "the tweet the user is looking at" goes through [`Status::main_status`].
//! Engagement flags and counts are plain fields because the same id is routinely
//! observed again with fresher values, and the newer observation wins.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Numeric identifier of a status.
pub type StatusId = u64;

/// Numeric identifier of a user.
pub type UserId = u64;

/// Snapshot of an account as seen in a payload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: UserId,
    pub screen_name: String,
    #[serde(default)]
    pub name: String,
    #[serde(default, rename = "profile_image_url_https")]
    pub icon_url: String,
    #[serde(default)]
    pub protected: bool,
}

impl User {
    #[must_use]
    pub fn new(id: UserId, screen_name: impl Into<String>) -> Self {
        let screen_name = screen_name.into();
        Self {
            id,
            name: screen_name.clone(),
            screen_name,
            icon_url: String::new(),
            protected: false,
        }
    }
}

/// A user mention parsed out of the status text by the service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserMention {
    pub id: UserId,
    #[serde(default)]
    pub screen_name: String,
}

/// A hashtag parsed out of the status text by the service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Hashtag {
    pub text: String,
}

/// Entities attached to a status.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Entities {
    #[serde(default)]
    pub user_mentions: Vec<UserMention>,
    #[serde(default)]
    pub hashtags: Vec<Hashtag>,
}

/// A timeline-eligible post.
///
/// # Examples
///
/// ```
/// use tweetline::domain::{Status, User};
///
/// let original = Status::new(1, User::new(42, "alice"), "hello");
/// let retweet = Status::retweet_of(2, User::new(9, "bob"), original);
/// assert_eq!(retweet.main_status().id, 1);
/// assert_eq!(retweet.main_status().user.screen_name, "alice");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Status {
    pub id: StatusId,
    pub user: User,
    #[serde(default, with = "service_time")]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default, alias = "full_text")]
    pub text: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub retweeted_status: Option<Box<Status>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub quoted_status: Option<Box<Status>>,
    #[serde(default)]
    pub in_reply_to_status_id: Option<StatusId>,
    #[serde(default)]
    pub in_reply_to_user_id: Option<UserId>,
    #[serde(default)]
    pub entities: Entities,
    #[serde(default)]
    pub retweeted: bool,
    #[serde(default)]
    pub favorited: bool,
    #[serde(default)]
    pub retweet_count: u64,
    #[serde(default)]
    pub favorite_count: u64,
}

impl Status {
    /// Creates a plain status with no engagement.
    #[must_use]
    pub fn new(id: StatusId, user: User, text: impl Into<String>) -> Self {
        Self {
            id,
            user,
            created_at: None,
            text: text.into(),
            retweeted_status: None,
            quoted_status: None,
            in_reply_to_status_id: None,
            in_reply_to_user_id: None,
            entities: Entities::default(),
            retweeted: false,
            favorited: false,
            retweet_count: 0,
            favorite_count: 0,
        }
    }

    /// Wraps `original` in a retweet by `user`.
    ///
    /// If `original` is itself a retweet, its main status is wrapped instead so the
    /// wrap never nests.
    #[must_use]
    pub fn retweet_of(id: StatusId, user: User, original: Self) -> Self {
        let original = match original.retweeted_status {
            Some(inner) => *inner,
            None => original,
        };
        let text = format!("RT @{}: {}", original.user.screen_name, original.text);
        let mut status = Self::new(id, user, text);
        status.retweeted_status = Some(Box::new(original));
        status
    }

    /// Returns the status the user is actually looking at.
    #[must_use]
    pub fn main_status(&self) -> &Self {
        self.retweeted_status.as_deref().unwrap_or(self)
    }

    /// Mutable counterpart of [`Status::main_status`].
    pub fn main_status_mut(&mut self) -> &mut Self {
        match self.retweeted_status {
            Some(ref mut inner) => &mut **inner,
            None => self,
        }
    }

    #[must_use]
    pub const fn is_retweet(&self) -> bool {
        self.retweeted_status.is_some()
    }

    #[must_use]
    pub const fn is_quote(&self) -> bool {
        self.quoted_status.is_some()
    }

    /// Whether any author involved (wrapper or main status) satisfies `pred`.
    pub fn any_author(&self, mut pred: impl FnMut(UserId) -> bool) -> bool {
        pred(self.user.id) || pred(self.main_status().user.id)
    }

    /// Whether this status is addressed to `owner` by someone else.
    ///
    /// True when the author is not the owner and either the owner appears among the
    /// parsed mentions or the status replies to the owner.
    #[must_use]
    pub fn mentions(&self, owner: UserId) -> bool {
        if self.user.id == owner {
            return false;
        }
        self.in_reply_to_user_id == Some(owner)
            || self.entities.user_mentions.iter().any(|m| m.id == owner)
    }

    /// Replaces the main status with `updated`, keeping any retweet wrapper.
    pub fn replace_main(&mut self, updated: &Self) {
        match self.retweeted_status {
            Some(ref mut inner) => **inner = updated.clone(),
            None => *self = updated.clone(),
        }
    }

    /// Accounts referenced by this status: author, main author, quoted author, mentions.
    #[must_use]
    pub fn referenced_accounts(&self) -> Vec<User> {
        let mut users = vec![self.user.clone()];
        if let Some(ref inner) = self.retweeted_status {
            users.push(inner.user.clone());
        }
        if let Some(ref quoted) = self.main_status().quoted_status {
            users.push(quoted.user.clone());
        }
        users.dedup_by_key(|u| u.id);
        users
    }

    /// Hashtags of the main status, without the leading `#`.
    #[must_use]
    pub fn hashtags(&self) -> Vec<String> {
        self.main_status()
            .entities
            .hashtags
            .iter()
            .map(|h| h.text.clone())
            .collect()
    }
}

/// Serde adapter for the service's `created_at` format.
///
/// The service sends `Wed Aug 27 13:08:45 +0000 2008`; RFC 3339 is accepted as well.
/// Unparseable timestamps are treated as absent since ordering never depends on them.
mod service_time {
    use chrono::{DateTime, Utc};
    use serde::{Deserialize, Deserializer, Serializer};

    const FORMAT: &str = "%a %b %d %H:%M:%S %z %Y";

    pub fn serialize<S>(value: &Option<DateTime<Utc>>, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match value {
            Some(dt) => serializer.serialize_str(&dt.format(FORMAT).to_string()),
            None => serializer.serialize_none(),
        }
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Option<DateTime<Utc>>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw: Option<String> = Option::deserialize(deserializer)?;
        Ok(raw.and_then(|s| {
            DateTime::parse_from_str(&s, FORMAT)
                .or_else(|_| DateTime::parse_from_rfc3339(&s))
                .map(|dt| dt.with_timezone(&Utc))
                .ok()
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn retweet_never_nests() {
        let original = Status::new(1, User::new(42, "alice"), "hi");
        let rt = Status::retweet_of(2, User::new(9, "bob"), original);
        let rt_of_rt = Status::retweet_of(3, User::new(10, "carol"), rt);
        assert_eq!(rt_of_rt.main_status().id, 1);
        assert!(rt_of_rt.main_status().retweeted_status.is_none());
    }

    #[test]
    fn mentions_requires_other_author() {
        let mut s = Status::new(2, User::new(9, "bob"), "@owner hi");
        s.entities.user_mentions.push(UserMention { id: 7, screen_name: "owner".into() });
        assert!(s.mentions(7));
        assert!(!s.mentions(8));

        let mut own = Status::new(3, User::new(7, "owner"), "@owner note to self");
        own.entities.user_mentions.push(UserMention { id: 7, screen_name: "owner".into() });
        assert!(!own.mentions(7));

        let mut reply = Status::new(4, User::new(9, "bob"), "sure");
        reply.in_reply_to_user_id = Some(7);
        assert!(reply.mentions(7));
    }

    #[test]
    fn replace_main_keeps_wrapper() {
        let original = Status::new(1, User::new(42, "alice"), "hi");
        let mut rt = Status::retweet_of(2, User::new(9, "bob"), original.clone());
        let mut liked = original;
        liked.favorited = true;
        rt.replace_main(&liked);
        assert_eq!(rt.id, 2);
        assert!(rt.main_status().favorited);
    }

    #[test]
    fn decodes_service_payload() {
        let json = r#"{
            "id": 10,
            "created_at": "Wed Aug 27 13:08:45 +0000 2008",
            "text": "hello #rust",
            "user": {"id": 42, "screen_name": "alice", "name": "Alice",
                     "profile_image_url_https": "https://example.com/a.png", "protected": true},
            "entities": {"hashtags": [{"text": "rust"}], "user_mentions": []},
            "favorited": true,
            "favorite_count": 3
        }"#;
        let s: Status = serde_json::from_str(json).unwrap();
        assert_eq!(s.id, 10);
        assert!(s.user.protected);
        assert!(s.favorited);
        assert_eq!(s.favorite_count, 3);
        assert_eq!(s.hashtags(), vec!["rust".to_string()]);
        assert_eq!(s.created_at.map(|d| d.timestamp()), Some(1_219_842_525));
    }

    #[test]
    fn bad_timestamp_is_absent() {
        let json = r#"{"id": 1, "created_at": "yesterday", "user": {"id": 1, "screen_name": "a"}}"#;
        let s: Status = serde_json::from_str(json).unwrap();
        assert!(s.created_at.is_none());
    }
}
