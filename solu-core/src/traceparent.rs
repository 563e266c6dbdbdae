//! Carrier wire format: `version-traceid-spanid-flags`.
//!
//! See <https://w3c.github.io/trace-context>. Only version `00` is produced and no
//! flags are supported; on parse both fields are ignored.

use crate::error::{CoreError, Result};
use crate::ids::{SpanId, TraceId};

/// Header name used when the carrier travels over HTTP.
pub const TRACEPARENT_HEADER: &str = "traceparent";

pub const TRACE_VERSION: &str = "00";

pub const TRACE_FLAGS: &str = "00";

/// Render a carrier. Absent ids render as their all-zero sentinel.
pub fn encode(trace_id: Option<TraceId>, span_id: Option<SpanId>) -> String {
    let tid = trace_id.map(|id| id.to_hex());
    let sid = span_id.map(|id| id.to_hex());
    format!(
        "{}-{}-{}-{}",
        TRACE_VERSION,
        tid.as_deref().unwrap_or(TraceId::INVALID_HEX),
        sid.as_deref().unwrap_or(SpanId::INVALID_HEX),
        TRACE_FLAGS
    )
}

/// Parse a carrier into its trace and span ids.
///
/// Fails only when the value does not have exactly four `-` separated fields. An
/// id field that is the sentinel, has the wrong length or is not hex comes back
/// as `None`.
pub fn parse(value: &str) -> Result<(Option<TraceId>, Option<SpanId>)> {
    let parts: Vec<&str> = value.split('-').collect();
    if parts.len() != 4 {
        return Err(CoreError::InvalidTraceparent(format!(
            "expected 4 fields, got {}",
            parts.len()
        )));
    }

    let trace_id = TraceId::from_hex(parts[1]).ok();
    let span_id = SpanId::from_hex(parts[2]).ok();
    Ok((trace_id, span_id))
}
