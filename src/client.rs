//! Startup sequence and host lifecycle.
//!
//! [`Client`] wires the engine, the stream session and the gateway together and runs
//! the startup sequence:
//!
//! 1. verify credentials (the owner account)
//! 2. fetch mute, no-retweet and block ids plus the home and mention timelines,
//!    concurrently
//! 3. hand everything to the engine
//! 4. connect the stream
//!
//! If the service rejects the credentials anywhere in steps 1–2, the authenticator
//! runs once and the whole sequence restarts. A second rejection is terminal.

use crate::app::{EngineHandle, Signal};
use crate::domain::error::{Result, TweetlineError};
use crate::domain::{Status, User, UserId};
use crate::gateway::{Authenticator, Gateway, RestClient};
use crate::stream::{StreamSession, StreamTransport};
use std::sync::Arc;
use tracing::Instrument;

/// Everything the startup sequence fetches before touching the engine.
struct Bootstrap {
    owner: User,
    mute_ids: Vec<UserId>,
    no_retweet_ids: Vec<UserId>,
    block_ids: Vec<UserId>,
    home: Vec<Status>,
    mentions: Vec<Status>,
}

/// The assembled core: startup, suspend/resume, and access to the parts.
pub struct Client {
    rest: Arc<dyn RestClient>,
    authenticator: Arc<dyn Authenticator>,
    engine: EngineHandle,
    session: StreamSession,
    gateway: Gateway,
}

impl Client {
    #[must_use]
    pub fn new(
        rest: Arc<dyn RestClient>,
        authenticator: Arc<dyn Authenticator>,
        transport: Arc<dyn StreamTransport>,
        engine: EngineHandle,
    ) -> Self {
        let session = StreamSession::new(transport, engine.clone());
        let gateway = Gateway::new(Arc::clone(&rest), engine.clone());
        Self {
            rest,
            authenticator,
            engine,
            session,
            gateway,
        }
    }

    #[must_use]
    pub const fn engine(&self) -> &EngineHandle {
        &self.engine
    }

    #[must_use]
    pub const fn session(&self) -> &StreamSession {
        &self.session
    }

    #[must_use]
    pub const fn gateway(&self) -> &Gateway {
        &self.gateway
    }

    /// Runs the startup sequence and connects the stream.
    ///
    /// The owner account, suppressed-user sets and both timelines are fetched, handed
    /// to the engine in order, and then the stream session is connected exactly once.
    ///
    /// # Returns
    ///
    /// - `Ok(())` once the startup data is enqueued and the stream is connecting
    /// - `Err(_)` if startup gave up; the stream is not connected
    ///
    /// # Errors
    ///
    /// - [`TweetlineError::Authentication`] if re-authentication fails, or the
    ///   credentials are rejected again afterwards
    /// - any other fetch error
    ///
    /// Every error is also raised as a user notice before it is returned.
    pub async fn start(&self) -> Result<()> {
        self.startup().instrument(tracing::debug_span!("startup")).await
    }

    async fn startup(&self) -> Result<()> {
        let bootstrap = match self.bootstrap_with_retry().await {
            Ok(b) => b,
            Err(e) => {
                tracing::error!(error = %e, "startup failed");
                if let Err(send) = self.engine.send(Signal::ApiFailure(e.notice_text())).await {
                    tracing::debug!(error = %send, "startup failure notice not delivered");
                }
                return Err(e);
            }
        };

        self.deliver(bootstrap).await?;
        self.session.connect();
        tracing::info!("startup complete, stream connecting");
        Ok(())
    }

    /// Runs the fetches, re-authenticating and retrying once on an auth failure.
    async fn bootstrap_with_retry(&self) -> Result<Bootstrap> {
        match self.bootstrap().await {
            Err(e) if e.is_auth_failure() => {
                tracing::info!(error = %e, "credentials rejected, re-authenticating");
                self.authenticator.reauthenticate().await?;
                self.bootstrap().await.map_err(|e| match e {
                    TweetlineError::Api(api) if api.is_auth_failure() => {
                        TweetlineError::Authentication(format!(
                            "credentials rejected after re-authentication: {api}"
                        ))
                    }
                    other => other,
                })
            }
            other => other,
        }
    }

    async fn bootstrap(&self) -> Result<Bootstrap> {
        let owner = self.rest.verify_credentials().await?;
        tracing::debug!(owner_id = owner.id, screen_name = %owner.screen_name, "credentials verified");

        let (mute_ids, no_retweet_ids, block_ids, home, mentions) = tokio::try_join!(
            self.rest.fetch_mute_ids(),
            self.rest.fetch_no_retweet_ids(),
            self.rest.fetch_block_ids(),
            self.rest.fetch_home_timeline(),
            self.rest.fetch_mention_timeline(),
        )?;

        Ok(Bootstrap {
            owner,
            mute_ids,
            no_retweet_ids,
            block_ids,
            home,
            mentions,
        })
    }

    async fn deliver(&self, bootstrap: Bootstrap) -> Result<()> {
        let Bootstrap { owner, mute_ids, no_retweet_ids, block_ids, home, mentions } = bootstrap;

        tracing::debug!(
            mute = mute_ids.len(),
            block = block_ids.len(),
            home = home.len(),
            mentions = mentions.len(),
            "startup data fetched"
        );

        self.engine.send(Signal::SetOwner(owner)).await?;
        self.engine
            .send(Signal::BlocksLoaded { mute: mute_ids, block: block_ids })
            .await?;
        self.engine.send(Signal::NoRetweetIds(no_retweet_ids)).await?;
        // Oldest first so each front insert leaves the timeline newest-first.
        for status in home.into_iter().rev() {
            self.engine
                .send(Signal::NewStatus { status, streamed: false })
                .await?;
        }
        self.engine.send(Signal::Mentions(mentions)).await
    }

    /// The host is about to sleep: drop the stream.
    pub async fn on_suspend(&self) {
        tracing::debug!("host suspending, stopping stream");
        self.session.stop().await;
    }

    /// The host woke up: reconnect if the stream is down.
    ///
    /// # Errors
    ///
    /// Returns [`TweetlineError::EngineClosed`] if the engine is gone.
    pub async fn on_resume(&self) -> Result<bool> {
        tracing::debug!(stopped = self.session.is_stopped(), "host resumed");
        self.session.on_resume().await
    }
}
