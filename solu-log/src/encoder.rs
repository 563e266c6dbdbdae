//! Single-line JSON encoding of records.
//!
//! Keys are written in a fixed order: level, time, name, caller, message, trace,
//! span, then the record's fields, then the stack trace. Name, caller, trace,
//! span and stack trace are omitted when absent. Setting a key name to the empty
//! string omits that entry from every record.

use crate::record::LogRecord;
use chrono::SecondsFormat;
use serde::{Deserialize, Serialize};
use solu_core::keys;

/// Key names of the built-in record entries.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EncoderKeys {
    pub time: String,
    pub level: String,
    pub name: String,
    pub caller: String,
    pub message: String,
    pub stacktrace: String,
    pub trace: String,
    pub span: String,
}

impl Default for EncoderKeys {
    fn default() -> Self {
        Self {
            time: keys::LOG_TIME_KEY.to_string(),
            level: keys::LOG_LEVEL_KEY.to_string(),
            name: keys::LOG_NAME_KEY.to_string(),
            caller: keys::LOG_CALLER_KEY.to_string(),
            message: keys::LOG_MESSAGE_KEY.to_string(),
            stacktrace: keys::LOG_STACKTRACE_KEY.to_string(),
            trace: keys::LOG_TRACE_KEY.to_string(),
            span: keys::LOG_SPAN_KEY.to_string(),
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct JsonEncoder {
    keys: EncoderKeys,
}

impl JsonEncoder {
    pub fn new(keys: EncoderKeys) -> Self {
        Self { keys }
    }

    pub fn keys(&self) -> &EncoderKeys {
        &self.keys
    }

    /// Encode `record` as one JSON object terminated by `\n`.
    pub fn encode(&self, record: &LogRecord<'_>) -> Vec<u8> {
        let mut out = JsonObject::with_capacity(256);
        let keys = &self.keys;

        out.entry(&keys.level, record.level.as_str());
        out.entry(&keys.time, &record.time.to_rfc3339_opts(SecondsFormat::Secs, true));
        if let Some(name) = record.name.filter(|n| !n.is_empty()) {
            out.entry(&keys.name, name);
        }
        if let Some(caller) = record.caller {
            out.entry(&keys.caller, &caller.short());
        }
        out.entry(&keys.message, record.message);
        if let Some(trace_id) = record.trace_id {
            out.entry(&keys.trace, &trace_id.to_hex());
        }
        if let Some(span_id) = record.span_id {
            out.entry(&keys.span, &span_id.to_hex());
        }
        for field in record.all_fields() {
            out.entry(&field.key, &field.value.to_json());
        }
        if let Some(ref stack) = record.stacktrace {
            out.entry(&keys.stacktrace, stack);
        }

        out.finish()
    }
}

struct JsonObject {
    buf: Vec<u8>,
    empty: bool,
}

impl JsonObject {
    fn with_capacity(capacity: usize) -> Self {
        let mut buf = Vec::with_capacity(capacity);
        buf.push(b'{');
        Self { buf, empty: true }
    }

    fn entry<V: Serialize + ?Sized>(&mut self, key: &str, value: &V) {
        if key.is_empty() {
            return;
        }
        if !self.empty {
            self.buf.push(b',');
        }
        self.empty = false;
        // Writing strings and JSON values into a Vec cannot fail
        let _ = serde_json::to_writer(&mut self.buf, key);
        self.buf.push(b':');
        let _ = serde_json::to_writer(&mut self.buf, value);
    }

    fn finish(mut self) -> Vec<u8> {
        self.buf.extend_from_slice(b"}\n");
        self.buf
    }
}
