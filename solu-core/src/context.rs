//! Trace context carried explicitly through call chains.
//!
//! A [`TraceContext`] is a small `Copy` value. Every operation returns a new
//! context and leaves the receiver untouched, so a context can be handed to child
//! operations without any synchronization.

use crate::ids::{SpanId, TraceId};
use crate::traceparent;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TraceContext {
    trace_id: Option<TraceId>,
    span_id: Option<SpanId>,
}

impl TraceContext {
    /// Empty context: no trace, no span.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn trace_id(&self) -> Option<TraceId> {
        self.trace_id
    }

    pub fn span_id(&self) -> Option<SpanId> {
        self.span_id
    }

    pub fn is_empty(&self) -> bool {
        self.trace_id.is_none() && self.span_id.is_none()
    }

    /// Start a new logical operation chain with a freshly minted trace id.
    pub fn trace(&self) -> Self {
        self.with_trace_id(TraceId::new())
    }

    pub fn with_trace_id(&self, trace_id: TraceId) -> Self {
        Self {
            trace_id: Some(trace_id),
            span_id: self.span_id,
        }
    }

    pub fn with_span_id(&self, span_id: SpanId) -> Self {
        Self {
            trace_id: self.trace_id,
            span_id: Some(span_id),
        }
    }

    /// Child span of the current operation. Keeps the trace id, minting one if
    /// the context has none, and always mints a new span id.
    pub fn fork(&self) -> Self {
        let base = if self.trace_id.is_some() {
            *self
        } else {
            self.trace()
        };
        base.with_span_id(SpanId::new())
    }

    /// Carrier rendering, `00-<trace>-<span>-00`.
    pub fn traceparent_value(&self) -> String {
        traceparent::encode(self.trace_id, self.span_id)
    }

    /// Fill in ids from a carrier string where this context has none.
    ///
    /// A malformed carrier leaves the context unchanged. Existing ids are never
    /// overwritten.
    pub fn merge_traceparent(&self, carrier: &str) -> Self {
        let Ok((trace_id, span_id)) = traceparent::parse(carrier) else {
            return *self;
        };
        Self {
            trace_id: self.trace_id.or(trace_id),
            span_id: self.span_id.or(span_id),
        }
    }
}

/// Start a new trace on top of `ctx`.
pub fn trace(ctx: &TraceContext) -> TraceContext {
    ctx.trace()
}

/// Attach a known trace id to `ctx`.
pub fn trace_with(ctx: &TraceContext, trace_id: TraceId) -> TraceContext {
    ctx.with_trace_id(trace_id)
}

/// Child span of `ctx`.
pub fn fork(ctx: &TraceContext) -> TraceContext {
    ctx.fork()
}

pub fn traceparent_value(ctx: &TraceContext) -> String {
    ctx.traceparent_value()
}

pub fn merge_trace(ctx: &TraceContext, carrier: &str) -> TraceContext {
    ctx.merge_traceparent(carrier)
}
