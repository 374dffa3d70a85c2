//! Error types for the tweetline core.
//!
//! This module defines the centralized error type [`TweetlineError`] and a type alias
//! [`Result`] for convenient error handling throughout the crate. Remote API failures
//! keep their numeric code in [`ApiError`] so callers can tell an expired token apart
//! from any other rejection.

use thiserror::Error;

/// Error code returned when the service cannot authenticate the request.
pub const CODE_COULD_NOT_AUTHENTICATE: i64 = 32;

/// Error code returned when the access token is invalid or expired.
pub const CODE_INVALID_OR_EXPIRED_TOKEN: i64 = 89;

/// A structured error returned by the remote REST API.
///
/// # Examples
///
/// ```
/// use tweetline::domain::ApiError;
///
/// let err = ApiError::new(32, "Could not authenticate you.");
/// assert!(err.is_auth_failure());
/// assert!(!ApiError::new(187, "Status is a duplicate.").is_auth_failure());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message} (code {code})")]
pub struct ApiError {
    /// Numeric error code as reported by the service.
    pub code: i64,
    /// Human-readable message as reported by the service.
    pub message: String,
}

impl ApiError {
    pub fn new(code: i64, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
        }
    }

    /// Whether this error means the credentials were rejected.
    #[must_use]
    pub const fn is_auth_failure(&self) -> bool {
        matches!(
            self.code,
            CODE_COULD_NOT_AUTHENTICATE | CODE_INVALID_OR_EXPIRED_TOKEN
        )
    }
}

/// Why an intent was refused before any network call was made.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum Rejection {
    #[error("You cannot retweet your tweet")]
    OwnStatus,

    #[error("Cannot retweet protected user's tweet")]
    ProtectedAuthor,

    #[error("You can only delete your own tweet")]
    NotOwner,

    #[error("Owner account is not known yet")]
    NoOwner,

    #[error("Status is not in the timeline")]
    UnknownStatus,
}

/// The main error type for tweetline operations.
///
/// Most variants wrap an underlying cause. Transport failures are never fatal to a
/// session: the stream session turns them into a `connection-failure` signal and
/// returns to backoff.
#[derive(Debug, Error)]
pub enum TweetlineError {
    /// The remote service rejected a REST call.
    #[error("API error: {0}")]
    Api(#[from] ApiError),

    /// Authentication failed again after the one allowed retry.
    #[error("Authentication failed: {0}")]
    Authentication(String),

    /// The streaming transport broke or could not be opened.
    #[error("Transport error: {0}")]
    Transport(String),

    /// An intent was refused by a guard; no network call was issued.
    #[error("Rejected: {0}")]
    Rejected(#[from] Rejection),

    /// A stream frame or payload could not be decoded.
    #[error("Decode error: {0}")]
    Decode(#[from] serde_json::Error),

    /// Configuration is invalid or unreadable.
    #[error("Configuration error: {0}")]
    Config(String),

    /// Filesystem or I/O operation failed.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// The engine loop has shut down and no longer accepts signals.
    #[error("Engine shut down")]
    EngineClosed,
}

impl TweetlineError {
    /// Whether this is an API error carrying an authentication failure code.
    #[must_use]
    pub fn is_auth_failure(&self) -> bool {
        matches!(self, Self::Api(api) if api.is_auth_failure())
    }

    /// Text for a user notice: the service's own message for API errors, the full
    /// description otherwise.
    #[must_use]
    pub fn notice_text(&self) -> String {
        match self {
            Self::Api(api) => api.message.clone(),
            other => other.to_string(),
        }
    }
}

/// A specialized `Result` type for tweetline operations.
pub type Result<T> = std::result::Result<T, TweetlineError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn auth_codes_are_classified() {
        assert!(ApiError::new(32, "x").is_auth_failure());
        assert!(ApiError::new(89, "x").is_auth_failure());
        assert!(!ApiError::new(88, "rate limit").is_auth_failure());

        let err: TweetlineError = ApiError::new(89, "expired").into();
        assert!(err.is_auth_failure());
        assert!(!TweetlineError::Transport("eof".into()).is_auth_failure());
    }

    #[test]
    fn notice_text_prefers_service_message() {
        let api: TweetlineError = ApiError::new(187, "Status is a duplicate.").into();
        assert_eq!(api.notice_text(), "Status is a duplicate.");
        let auth = TweetlineError::Authentication("authorization denied".into());
        assert_eq!(auth.notice_text(), "Authentication failed: authorization denied");
    }

    #[test]
    fn rejection_messages_are_user_facing() {
        let err: TweetlineError = Rejection::OwnStatus.into();
        assert_eq!(err.to_string(), "Rejected: You cannot retweet your tweet");
    }
}
