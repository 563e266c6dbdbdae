use crate::field::Field;
use crate::level::Level;
use chrono::{DateTime, Local};
use solu_core::{SpanId, TraceId};
use std::fmt;
use std::panic::Location;

/// Source location of the emit call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Caller {
    pub file: &'static str,
    pub line: u32,
}

impl Caller {
    pub fn from_location(location: &'static Location<'static>) -> Self {
        Self {
            file: location.file(),
            line: location.line(),
        }
    }

    /// `dir/file.rs:line`: the file and its parent directory only.
    pub fn short(&self) -> String {
        let path = self.file.replace('\\', "/");
        let short = match path.rmatch_indices('/').nth(1) {
            Some((idx, _)) => &path[idx + 1..],
            None => path.as_str(),
        };
        format!("{}:{}", short, self.line)
    }
}

impl fmt::Display for Caller {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.file, self.line)
    }
}

/// One log event, assembled at emit time and consumed by the encoder.
#[derive(Debug, Clone)]
pub struct LogRecord<'a> {
    pub level: Level,
    pub time: DateTime<Local>,
    pub name: Option<&'a str>,
    pub caller: Option<Caller>,
    pub message: &'a str,
    pub trace_id: Option<TraceId>,
    pub span_id: Option<SpanId>,
    /// Fields bound on the logger, in derivation order.
    pub bound: &'a [Field],
    /// Fields passed at the call site.
    pub fields: &'a [Field],
    pub stacktrace: Option<String>,
}

impl<'a> LogRecord<'a> {
    /// Bound fields followed by call-site fields.
    pub fn all_fields(&self) -> impl Iterator<Item = &'a Field> {
        self.bound.iter().chain(self.fields.iter())
    }
}
