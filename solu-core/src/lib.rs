//! Shared primitives of the solu workspace: trace/span identifiers, the trace
//! context that carries them, and the carrier wire format.

pub mod context;
pub mod error;
pub mod ids;
pub mod keys;
pub mod scope;
pub mod traceparent;

pub use context::{fork, merge_trace, trace, trace_with, traceparent_value, TraceContext};
pub use error::*;
pub use ids::{SpanId, TraceId};
pub use scope::{current_trace_context, sync_with_trace_context, with_trace_context};
pub use traceparent::parse as parse_traceparent;
