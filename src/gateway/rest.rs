//! REST API seam.
//!
//! [`RestClient`] is the request/response side of the service: startup fetches and
//! the calls behind user intents. Errors carry the service's numeric code inside
//! [`ApiError`](crate::domain::ApiError) so authentication failures can be told apart.

use crate::domain::{Result, Status, StatusId, User, UserId};
use async_trait::async_trait;

/// Request/response access to the remote service.
///
/// # Errors
///
/// Every method returns [`TweetlineError::Api`](crate::TweetlineError::Api) when the
/// service rejects the call, and any other variant for local or network failures.
#[async_trait]
pub trait RestClient: Send + Sync {
    /// The authenticated account.
    async fn verify_credentials(&self) -> Result<User>;

    /// Latest home timeline statuses, newest first.
    async fn fetch_home_timeline(&self) -> Result<Vec<Status>>;

    /// Latest statuses mentioning the account, newest first.
    async fn fetch_mention_timeline(&self) -> Result<Vec<Status>>;

    async fn fetch_mute_ids(&self) -> Result<Vec<UserId>>;

    async fn fetch_block_ids(&self) -> Result<Vec<UserId>>;

    /// Users whose retweets the account has turned off.
    async fn fetch_no_retweet_ids(&self) -> Result<Vec<UserId>>;

    /// Returns the new retweet wrapper.
    async fn retweet(&self, id: StatusId) -> Result<Status>;

    /// Returns the original status.
    async fn unretweet(&self, id: StatusId) -> Result<Status>;

    async fn like(&self, id: StatusId) -> Result<Status>;

    async fn unlike(&self, id: StatusId) -> Result<Status>;

    async fn post_status(&self, text: &str, in_reply_to: Option<StatusId>) -> Result<Status>;

    /// Returns the deleted status.
    async fn destroy_status(&self, id: StatusId) -> Result<Status>;
}

/// Obtains fresh credentials for the [`RestClient`] after the service rejected the
/// current ones.
#[async_trait]
pub trait Authenticator: Send + Sync {
    /// Re-runs the authorization flow. On success the client uses the new credentials.
    ///
    /// # Errors
    ///
    /// Returns an error if the user or the service refuses the authorization.
    async fn reauthenticate(&self) -> Result<()>;
}
