//! User intents and cross-task trace propagation.
//!
//! An [`Intent`] is what the presentation layer asks for. Each one carries the trace
//! context of the span that created it, so the gateway task's span is parented to the
//! user action even though it runs elsewhere.

use crate::domain::StatusId;
use serde::{Deserialize, Serialize};

/// Distributed tracing context for cross-task span propagation.
///
/// Captures the current trace and span IDs from OpenTelemetry so a span opened on the
/// gateway task can be linked to the span that submitted the intent.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TraceContext {
    /// OpenTelemetry trace ID as a hex string.
    pub trace_id: String,

    /// Parent span ID for linking spans across tasks.
    pub parent_span_id: String,
}

impl TraceContext {
    /// Creates a trace context from the current tracing span.
    ///
    /// Returns `None` if the current span context is invalid, which is the case when
    /// no OpenTelemetry layer is installed.
    ///
    /// # Examples
    ///
    /// ```no_run
    /// use tweetline::gateway::TraceContext;
    ///
    /// if let Some(ctx) = TraceContext::from_current() {
    ///     println!("Trace ID: {}", ctx.trace_id);
    /// }
    /// ```
    #[must_use]
    pub fn from_current() -> Option<Self> {
        use opentelemetry::trace::TraceContextExt;
        use tracing_opentelemetry::OpenTelemetrySpanExt;

        let otel_context = tracing::Span::current().context();
        let span_ref = otel_context.span();
        let span_context = span_ref.span_context();

        if !span_context.is_valid() {
            tracing::trace!("span context is not valid");
            return None;
        }

        Some(Self {
            trace_id: format!("{:032x}", span_context.trace_id()),
            parent_span_id: format!("{:016x}", span_context.span_id()),
        })
    }

    /// Rebuilds the remote OpenTelemetry context this was captured from.
    #[must_use]
    pub fn to_otel_context(&self) -> Option<opentelemetry::Context> {
        use opentelemetry::trace::{
            SpanContext, SpanId, TraceContextExt, TraceFlags, TraceId, TraceState,
        };

        let trace_id = TraceId::from_hex(&self.trace_id).ok()?;
        let span_id = SpanId::from_hex(&self.parent_span_id).ok()?;
        let span_context = SpanContext::new(
            trace_id,
            span_id,
            TraceFlags::SAMPLED,
            true,
            TraceState::default(),
        );
        Some(opentelemetry::Context::new().with_remote_span_context(span_context))
    }
}

/// Generates constructors that attach the current trace context to each intent.
macro_rules! intent_builders {
    (
        $(
            $builder_name:ident($variant:ident { $($field:ident: $ty:ty),* $(,)? })
        ),* $(,)?
    ) => {
        impl Intent {
            $(
                #[doc = concat!("Create a ", stringify!($variant), " intent with current trace context")]
                #[must_use]
                pub fn $builder_name($($field: $ty),*) -> Self {
                    Self::$variant {
                        $($field,)*
                        trace_context: TraceContext::from_current(),
                    }
                }
            )*
        }
    };
}

intent_builders! {
    retweet(Retweet { id: StatusId }),
    unretweet(Unretweet { id: StatusId }),
    toggle_retweet(ToggleRetweet { id: StatusId }),
    like(Like { id: StatusId }),
    unlike(Unlike { id: StatusId }),
    toggle_like(ToggleLike { id: StatusId }),
    destroy(Destroy { id: StatusId }),
    post(Post { text: String, in_reply_to: Option<StatusId> }),
}

/// Actions the user asks the gateway to perform.
///
/// Status ids are resolved main-status ids, as shown in the timeline.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Intent {
    Retweet {
        id: StatusId,
        #[serde(skip_serializing_if = "Option::is_none")]
        trace_context: Option<TraceContext>,
    },

    Unretweet {
        id: StatusId,
        #[serde(skip_serializing_if = "Option::is_none")]
        trace_context: Option<TraceContext>,
    },

    /// Retweet or unretweet depending on the displayed status's `retweeted` flag.
    ToggleRetweet {
        id: StatusId,
        #[serde(skip_serializing_if = "Option::is_none")]
        trace_context: Option<TraceContext>,
    },

    Like {
        id: StatusId,
        #[serde(skip_serializing_if = "Option::is_none")]
        trace_context: Option<TraceContext>,
    },

    Unlike {
        id: StatusId,
        #[serde(skip_serializing_if = "Option::is_none")]
        trace_context: Option<TraceContext>,
    },

    /// Like or unlike depending on the displayed status's `favorited` flag.
    ToggleLike {
        id: StatusId,
        #[serde(skip_serializing_if = "Option::is_none")]
        trace_context: Option<TraceContext>,
    },

    /// Delete one of the owner's statuses.
    Destroy {
        id: StatusId,
        #[serde(skip_serializing_if = "Option::is_none")]
        trace_context: Option<TraceContext>,
    },

    Post {
        text: String,
        in_reply_to: Option<StatusId>,
        #[serde(skip_serializing_if = "Option::is_none")]
        trace_context: Option<TraceContext>,
    },
}

impl Intent {
    /// Short name used in spans and logs.
    #[must_use]
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::Retweet { .. } => "retweet",
            Self::Unretweet { .. } => "unretweet",
            Self::ToggleRetweet { .. } => "toggle_retweet",
            Self::Like { .. } => "like",
            Self::Unlike { .. } => "unlike",
            Self::ToggleLike { .. } => "toggle_like",
            Self::Destroy { .. } => "destroy",
            Self::Post { .. } => "post",
        }
    }

    #[must_use]
    pub const fn trace_context(&self) -> Option<&TraceContext> {
        match self {
            Self::Retweet { trace_context, .. }
            | Self::Unretweet { trace_context, .. }
            | Self::ToggleRetweet { trace_context, .. }
            | Self::Like { trace_context, .. }
            | Self::Unlike { trace_context, .. }
            | Self::ToggleLike { trace_context, .. }
            | Self::Destroy { trace_context, .. }
            | Self::Post { trace_context, .. } => trace_context.as_ref(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builders_without_otel_layer_carry_no_context() {
        let intent = Intent::retweet(5);
        assert_eq!(intent, Intent::Retweet { id: 5, trace_context: None });
        assert_eq!(intent.kind(), "retweet");
    }

    #[test]
    fn trace_context_round_trips_into_otel() {
        let ctx = TraceContext {
            trace_id: "4bf92f3577b34da6a3ce929d0e0e4736".into(),
            parent_span_id: "00f067aa0ba902b7".into(),
        };
        assert!(ctx.to_otel_context().is_some());

        let bad = TraceContext { trace_id: "zz".into(), parent_span_id: "00".into() };
        assert!(bad.to_otel_context().is_none());
    }

    #[test]
    fn serialized_intent_omits_missing_context() {
        let json = serde_json::to_string(&Intent::post("hi".into(), None)).unwrap();
        assert_eq!(json, r#"{"Post":{"text":"hi","in_reply_to":null}}"#);
    }
}
