//! Intent execution.
//!
//! The [`Gateway`] turns an [`Intent`] into one REST call and feeds the outcome back
//! to the engine as a [`Signal`]. Guards run first, against the engine's current
//! view of the status, and refuse without touching the network:
//!
//! - retweeting one's own status
//! - retweeting a protected account's status
//! - deleting someone else's status
//!
//! Failures become a dismissable notice. Nothing already applied is rolled back.

use super::intent::{Intent, TraceContext};
use super::rest::RestClient;
use crate::app::{EngineHandle, Signal};
use crate::domain::error::Result;
use crate::domain::{Rejection, Status, StatusId, UserId};
use std::sync::Arc;
use tokio::task::JoinHandle;
use tracing::Instrument;

/// A guard-approved remote call.
#[derive(Debug, Clone, PartialEq, Eq)]
enum Call {
    Retweet(StatusId),
    Unretweet(StatusId),
    Like(StatusId),
    Unlike(StatusId),
    Destroy(StatusId),
    Post { text: String, in_reply_to: Option<StatusId> },
}

impl Call {
    const fn name(&self) -> &'static str {
        match self {
            Self::Retweet(_) => "retweet",
            Self::Unretweet(_) => "unretweet",
            Self::Like(_) => "like",
            Self::Unlike(_) => "unlike",
            Self::Destroy(_) => "destroy_status",
            Self::Post { .. } => "post_status",
        }
    }
}

/// Executes user intents against the REST API.
#[derive(Clone)]
pub struct Gateway {
    rest: Arc<dyn RestClient>,
    engine: EngineHandle,
}

impl Gateway {
    #[must_use]
    pub fn new(rest: Arc<dyn RestClient>, engine: EngineHandle) -> Self {
        Self { rest, engine }
    }

    /// Runs an intent to completion.
    ///
    /// Guards are checked against the engine's current store first. An approved
    /// intent becomes one REST call, and its confirmation is enqueued as a
    /// [`Signal`] before this returns.
    ///
    /// # Parameters
    ///
    /// * `intent` - The user action, usually built with one of the [`Intent`]
    ///   constructors so it carries the caller's trace context
    ///
    /// # Returns
    ///
    /// - `Ok(())` once the confirmation signal is enqueued
    /// - `Err(_)` if the intent was refused or the call failed
    ///
    /// # Errors
    ///
    /// Returns [`TweetlineError::Rejected`](crate::TweetlineError::Rejected) when a
    /// guard refuses the intent, or the REST error when the call fails. In both
    /// cases a notice has been raised.
    ///
    /// # Example
    ///
    /// ```rust,ignore
    /// gateway.submit(Intent::toggle_like(status_id)).await?;
    /// ```
    pub async fn submit(&self, intent: Intent) -> Result<()> {
        let call = match self.check(&intent) {
            Ok(call) => call,
            Err(rejection) => {
                self.engine.send(Signal::Rejected(rejection)).await?;
                return Err(rejection.into());
            }
        };
        self.execute(call, intent.trace_context().cloned()).await
    }

    /// Checks guards now and runs the call on its own task.
    ///
    /// The task is independent of the stream session; stopping the stream does not
    /// cancel it.
    ///
    /// # Errors
    ///
    /// Returns [`TweetlineError::Rejected`](crate::TweetlineError::Rejected) synchronously when a guard refuses the
    /// intent. The rejection notice is delivered in the background.
    pub fn dispatch(&self, intent: Intent) -> Result<JoinHandle<Result<()>>> {
        let call = match self.check(&intent) {
            Ok(call) => call,
            Err(rejection) => {
                let engine = self.engine.clone();
                tokio::spawn(async move {
                    if let Err(e) = engine.send(Signal::Rejected(rejection)).await {
                        tracing::debug!(error = %e, "rejection notice not delivered");
                    }
                });
                return Err(rejection.into());
            }
        };

        let gateway = self.clone();
        let trace_context = intent.trace_context().cloned();
        Ok(tokio::spawn(async move { gateway.execute(call, trace_context).await }))
    }

    /// Resolves an intent into a call, applying the guards.
    fn check(&self, intent: &Intent) -> std::result::Result<Call, Rejection> {
        let _span = tracing::debug_span!("gateway_check", intent = intent.kind()).entered();

        let call = match intent {
            Intent::Retweet { id, .. } => {
                self.guard_retweet(*id)?;
                Call::Retweet(*id)
            }
            Intent::Unretweet { id, .. } => Call::Unretweet(*id),
            Intent::ToggleRetweet { id, .. } => {
                if self.displayed(*id)?.retweeted {
                    Call::Unretweet(*id)
                } else {
                    self.guard_retweet(*id)?;
                    Call::Retweet(*id)
                }
            }
            Intent::Like { id, .. } => Call::Like(*id),
            Intent::Unlike { id, .. } => Call::Unlike(*id),
            Intent::ToggleLike { id, .. } => {
                if self.displayed(*id)?.favorited {
                    Call::Unlike(*id)
                } else {
                    Call::Like(*id)
                }
            }
            Intent::Destroy { id, .. } => {
                let owner = self.owner_id()?;
                if self.displayed(*id)?.user.id != owner {
                    tracing::debug!(status_id = id, "destroy rejected, not owner");
                    return Err(Rejection::NotOwner);
                }
                Call::Destroy(*id)
            }
            Intent::Post { text, in_reply_to, .. } => Call::Post {
                text: text.clone(),
                in_reply_to: *in_reply_to,
            },
        };
        Ok(call)
    }

    fn guard_retweet(&self, id: StatusId) -> std::result::Result<(), Rejection> {
        let owner = self.owner_id()?;
        let status = self.displayed(id)?;
        if status.user.id == owner {
            tracing::debug!(status_id = id, "retweet rejected, own status");
            return Err(Rejection::OwnStatus);
        }
        if status.user.protected {
            tracing::debug!(status_id = id, "retweet rejected, protected author");
            return Err(Rejection::ProtectedAuthor);
        }
        Ok(())
    }

    /// The main status displayed under `id`.
    fn displayed(&self, id: StatusId) -> std::result::Result<Status, Rejection> {
        self.engine
            .find_status(id)
            .ok()
            .flatten()
            .map(|s| s.main_status().clone())
            .ok_or(Rejection::UnknownStatus)
    }

    fn owner_id(&self) -> std::result::Result<UserId, Rejection> {
        self.engine
            .read(|store| store.identity().owner_id())
            .ok()
            .flatten()
            .ok_or(Rejection::NoOwner)
    }

    async fn execute(&self, call: Call, trace_context: Option<TraceContext>) -> Result<()> {
        let span = tracing::debug_span!("gateway_call", call = call.name());
        if let Some(parent) = trace_context.as_ref().and_then(TraceContext::to_otel_context) {
            use tracing_opentelemetry::OpenTelemetrySpanExt;
            span.set_parent(parent);
        }
        self.execute_inner(call).instrument(span).await
    }

    async fn execute_inner(&self, call: Call) -> Result<()> {
        let outcome = match &call {
            Call::Retweet(id) => self.rest.retweet(*id).await.map(Signal::RetweetSucceeded),
            Call::Unretweet(id) => self.rest.unretweet(*id).await.map(Signal::UnretweetSucceeded),
            Call::Like(id) => self.rest.like(*id).await.map(Signal::LikeSucceeded),
            Call::Unlike(id) => self.rest.unlike(*id).await.map(Signal::UnlikeSucceeded),
            Call::Destroy(id) => self
                .rest
                .destroy_status(*id)
                .await
                .map(|_| Signal::Deleted(*id)),
            Call::Post { text, in_reply_to } => self
                .rest
                .post_status(text, *in_reply_to)
                .await
                .map(|_| Signal::StatusPosted),
        };

        match outcome {
            Ok(signal) => {
                tracing::debug!(call = call.name(), "call succeeded");
                self.engine.send(signal).await
            }
            Err(e) => {
                tracing::warn!(call = call.name(), error = %e, "call failed");
                self.engine.send(Signal::ApiFailure(e.notice_text())).await?;
                Err(e)
            }
        }
    }
}
