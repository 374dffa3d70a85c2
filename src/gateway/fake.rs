//! In-memory REST service and authenticator for tests.

use super::rest::{Authenticator, RestClient};
use crate::domain::{ApiError, Result, Status, StatusId, TweetlineError, User, UserId};
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

/// Records every call and answers from a small status table.
///
/// Confirmations echo the stored status without applying the change
/// to its flags, the way the real service sometimes does.
pub struct FakeRest {
    owner: User,
    statuses: Mutex<HashMap<StatusId, Status>>,
    calls: Mutex<Vec<String>>,
    fail_next: Mutex<Option<ApiError>>,
    credentials_valid: AtomicBool,
    verify_calls: AtomicUsize,
    home_auth_failures: AtomicUsize,
    mentions_failure: Mutex<Option<ApiError>>,
    pub home: Mutex<Vec<Status>>,
    pub mentions: Mutex<Vec<Status>>,
    pub mute_ids: Vec<UserId>,
    pub block_ids: Vec<UserId>,
    pub no_retweet_ids: Vec<UserId>,
}

impl FakeRest {
    pub fn new(owner: User) -> Self {
        Self {
            owner,
            statuses: Mutex::new(HashMap::new()),
            calls: Mutex::new(vec![]),
            fail_next: Mutex::new(None),
            credentials_valid: AtomicBool::new(true),
            verify_calls: AtomicUsize::new(0),
            home_auth_failures: AtomicUsize::new(0),
            mentions_failure: Mutex::new(None),
            home: Mutex::new(vec![]),
            mentions: Mutex::new(vec![]),
            mute_ids: vec![],
            block_ids: vec![],
            no_retweet_ids: vec![],
        }
    }

    pub fn add_status(&self, status: Status) {
        self.statuses.lock().unwrap().insert(status.id, status);
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    pub fn fail_next(&self, error: ApiError) {
        *self.fail_next.lock().unwrap() = Some(error);
    }

    pub fn invalidate_credentials(&self) {
        self.credentials_valid.store(false, Ordering::SeqCst);
    }

    pub fn restore_credentials(&self) {
        self.credentials_valid.store(true, Ordering::SeqCst);
    }

    /// The next `n` home timeline fetches fail with an expired-token error.
    pub fn expire_on_home_fetch(&self, n: usize) {
        self.home_auth_failures.store(n, Ordering::SeqCst);
    }

    /// The next mention timeline fetch fails with `error`.
    pub fn fail_mentions_once(&self, error: ApiError) {
        *self.mentions_failure.lock().unwrap() = Some(error);
    }

    pub fn verify_calls(&self) -> usize {
        self.verify_calls.load(Ordering::SeqCst)
    }

    fn record(&self, call: String) -> Result<()> {
        self.calls.lock().unwrap().push(call);
        match self.fail_next.lock().unwrap().take() {
            Some(e) => Err(e.into()),
            None => Ok(()),
        }
    }

    fn stored(&self, id: StatusId) -> Result<Status> {
        self.statuses
            .lock()
            .unwrap()
            .get(&id)
            .cloned()
            .ok_or_else(|| ApiError::new(144, "No status found with that ID.").into())
    }

    fn authorized(&self) -> Result<()> {
        if self.credentials_valid.load(Ordering::SeqCst) {
            Ok(())
        } else {
            Err(TweetlineError::Api(ApiError::new(89, "Invalid or expired token.")))
        }
    }
}

#[async_trait]
impl RestClient for FakeRest {
    async fn verify_credentials(&self) -> Result<User> {
        self.verify_calls.fetch_add(1, Ordering::SeqCst);
        self.authorized()?;
        Ok(self.owner.clone())
    }

    async fn fetch_home_timeline(&self) -> Result<Vec<Status>> {
        self.authorized()?;
        let expired = self
            .home_auth_failures
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |n| n.checked_sub(1))
            .is_ok();
        if expired {
            return Err(TweetlineError::Api(ApiError::new(89, "Invalid or expired token.")));
        }
        Ok(self.home.lock().unwrap().clone())
    }

    async fn fetch_mention_timeline(&self) -> Result<Vec<Status>> {
        self.authorized()?;
        if let Some(error) = self.mentions_failure.lock().unwrap().take() {
            return Err(error.into());
        }
        Ok(self.mentions.lock().unwrap().clone())
    }

    async fn fetch_mute_ids(&self) -> Result<Vec<UserId>> {
        self.authorized()?;
        Ok(self.mute_ids.clone())
    }

    async fn fetch_block_ids(&self) -> Result<Vec<UserId>> {
        self.authorized()?;
        Ok(self.block_ids.clone())
    }

    async fn fetch_no_retweet_ids(&self) -> Result<Vec<UserId>> {
        self.authorized()?;
        Ok(self.no_retweet_ids.clone())
    }

    async fn retweet(&self, id: StatusId) -> Result<Status> {
        self.record(format!("retweet {id}"))?;
        let original = self.stored(id)?;
        Ok(Status::retweet_of(id + 1_000, self.owner.clone(), original))
    }

    async fn unretweet(&self, id: StatusId) -> Result<Status> {
        self.record(format!("unretweet {id}"))?;
        self.stored(id)
    }

    async fn like(&self, id: StatusId) -> Result<Status> {
        self.record(format!("like {id}"))?;
        let mut status = self.stored(id)?;
        status.favorited = true;
        Ok(status)
    }

    async fn unlike(&self, id: StatusId) -> Result<Status> {
        self.record(format!("unlike {id}"))?;
        let mut status = self.stored(id)?;
        status.favorited = false;
        Ok(status)
    }

    async fn post_status(&self, text: &str, _in_reply_to: Option<StatusId>) -> Result<Status> {
        self.record(format!("post_status {text}"))?;
        Ok(Status::new(9_999, self.owner.clone(), text))
    }

    async fn destroy_status(&self, id: StatusId) -> Result<Status> {
        self.record(format!("destroy_status {id}"))?;
        self.stored(id)
    }
}

/// Restores the fake's credentials when asked, or refuses.
pub struct FakeAuthenticator {
    rest: Arc<FakeRest>,
    grant: bool,
    attempts: AtomicUsize,
}

impl FakeAuthenticator {
    pub fn new(rest: Arc<FakeRest>, grant: bool) -> Self {
        Self {
            rest,
            grant,
            attempts: AtomicUsize::new(0),
        }
    }

    pub fn attempts(&self) -> usize {
        self.attempts.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl Authenticator for FakeAuthenticator {
    async fn reauthenticate(&self) -> Result<()> {
        self.attempts.fetch_add(1, Ordering::SeqCst);
        if self.grant {
            self.rest.restore_credentials();
            Ok(())
        } else {
            Err(TweetlineError::Authentication("authorization denied".to_string()))
        }
    }
}
