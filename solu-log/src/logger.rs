//! Logger facade.
//!
//! A [`Logger`] is a cheap handle over a shared core (sinks, minimum level,
//! sampler, encoder). Deriving a handle with [`Logger::with`], [`Logger::named`]
//! or [`Logger::in_context`] copies the handle's own state and never touches the
//! parent or the core.
//!
//! ```no_run
//! use solu_log::{Field, Logger, LoggerBuilder};
//!
//! let logger = LoggerBuilder::new().stdout().build().unwrap();
//! let users = logger.named("users").with([Field::str("region", "eu-1")]);
//! users.info_with("user created", &[Field::uint("id", 7)]);
//! ```

use crate::encoder::JsonEncoder;
use crate::field::Field;
use crate::level::Level;
use crate::record::{Caller, LogRecord};
use crate::sampler::Sampler;
use crate::sink::FanOut;
use chrono::Local;
use solu_core::{current_trace_context, SpanId, TraceContext, TraceId};
use std::backtrace::Backtrace;
use std::fmt;
use std::io;
use std::panic::Location;
use std::sync::Arc;

/// State shared by a root logger and every handle derived from it.
pub(crate) struct LogCore {
    pub(crate) sinks: FanOut,
    pub(crate) level: Level,
    pub(crate) sampler: Option<Sampler>,
    pub(crate) encoder: JsonEncoder,
    pub(crate) development: bool,
    pub(crate) caller: bool,
    pub(crate) stacktrace_level: Level,
}

#[derive(Clone)]
pub struct Logger {
    core: Arc<LogCore>,
    name: Option<String>,
    fields: Vec<Field>,
    trace_id: Option<TraceId>,
    span_id: Option<SpanId>,
}

impl Logger {
    pub(crate) fn from_core(core: LogCore) -> Self {
        Self {
            core: Arc::new(core),
            name: None,
            fields: Vec::new(),
            trace_id: None,
            span_id: None,
        }
    }

    pub fn level(&self) -> Level {
        self.core.level
    }

    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    pub fn fields(&self) -> &[Field] {
        &self.fields
    }

    pub fn is_development(&self) -> bool {
        self.core.development
    }

    /// Whether a record at `level` passes the level gate.
    pub fn enabled(&self, level: Level) -> bool {
        level >= self.core.level
    }

    /// Trace and span ids stamped on this handle's records.
    pub fn context(&self) -> TraceContext {
        let mut ctx = TraceContext::new();
        if let Some(trace_id) = self.trace_id {
            ctx = ctx.with_trace_id(trace_id);
        }
        if let Some(span_id) = self.span_id {
            ctx = ctx.with_span_id(span_id);
        }
        ctx
    }

    /// Derive a handle with `fields` appended to the bound fields.
    pub fn with<I>(&self, fields: I) -> Self
    where
        I: IntoIterator,
        I::Item: Into<Field>,
    {
        let mut derived = self.clone();
        derived.fields.extend(fields.into_iter().map(Into::into));
        derived
    }

    /// Derive a handle whose name is this name with `.name` appended.
    pub fn named(&self, name: &str) -> Self {
        let mut derived = self.clone();
        derived.name = match (self.name.as_deref(), name) {
            (None, n) | (Some(""), n) => Some(n.to_string()),
            (Some(parent), "") => Some(parent.to_string()),
            (Some(parent), n) => Some(format!("{}.{}", parent, n)),
        };
        derived
    }

    /// Derive a handle stamping the context's trace and span ids. A context
    /// without a trace id gets a freshly minted one.
    pub fn in_context(&self, ctx: &TraceContext) -> Self {
        let mut derived = self.clone();
        derived.trace_id = Some(ctx.trace_id().unwrap_or_else(TraceId::new));
        derived.span_id = ctx.span_id();
        derived
    }

    /// [`Logger::in_context`] with the task-scoped trace context.
    pub fn in_current_context(&self) -> Self {
        self.in_context(&current_trace_context())
    }

    #[track_caller]
    pub fn log(&self, level: Level, message: &str, fields: &[Field]) {
        self.emit(level, message, fields, Location::caller());
    }

    #[track_caller]
    pub fn debug(&self, message: &str) {
        self.emit(Level::Debug, message, &[], Location::caller());
    }

    #[track_caller]
    pub fn info(&self, message: &str) {
        self.emit(Level::Info, message, &[], Location::caller());
    }

    #[track_caller]
    pub fn warn(&self, message: &str) {
        self.emit(Level::Warn, message, &[], Location::caller());
    }

    #[track_caller]
    pub fn error(&self, message: &str) {
        self.emit(Level::Error, message, &[], Location::caller());
    }

    /// Logs at `DPanic`; panics afterwards in development mode.
    #[track_caller]
    pub fn dpanic(&self, message: &str) {
        self.emit(Level::DPanic, message, &[], Location::caller());
    }

    /// Logs at `Panic`, syncs the sinks and panics with `message`.
    #[track_caller]
    pub fn panic(&self, message: &str) -> ! {
        self.emit(Level::Panic, message, &[], Location::caller());
        unreachable!("panic level always panics")
    }

    /// Logs at `Fatal`, syncs the sinks and exits the process with status 1.
    #[track_caller]
    pub fn fatal(&self, message: &str) -> ! {
        self.emit(Level::Fatal, message, &[], Location::caller());
        unreachable!("fatal level always exits")
    }

    #[track_caller]
    pub fn debug_with(&self, message: &str, fields: &[Field]) {
        self.emit(Level::Debug, message, fields, Location::caller());
    }

    #[track_caller]
    pub fn info_with(&self, message: &str, fields: &[Field]) {
        self.emit(Level::Info, message, fields, Location::caller());
    }

    #[track_caller]
    pub fn warn_with(&self, message: &str, fields: &[Field]) {
        self.emit(Level::Warn, message, fields, Location::caller());
    }

    #[track_caller]
    pub fn error_with(&self, message: &str, fields: &[Field]) {
        self.emit(Level::Error, message, fields, Location::caller());
    }

    /// Flush every sink, returning the first error.
    pub fn sync(&self) -> io::Result<()> {
        self.core.sinks.sync()
    }

    fn emit(&self, level: Level, message: &str, fields: &[Field], location: &'static Location<'static>) {
        self.write_record(level, message, fields, location);

        if level > Level::Error {
            let _ = self.core.sinks.sync();
        }

        match level {
            Level::Fatal => std::process::exit(1),
            Level::Panic => panic!("{}", message),
            Level::DPanic if self.core.development => panic!("{}", message),
            _ => {}
        }
    }

    /// Gate, encode and deliver one record.
    fn write_record(
        &self,
        level: Level,
        message: &str,
        fields: &[Field],
        location: &'static Location<'static>,
    ) {
        if !self.enabled(level) {
            return;
        }

        let time = Local::now();
        if let Some(ref sampler) = self.core.sampler {
            let nanos = time.timestamp_nanos_opt().unwrap_or_default();
            if !sampler.sample(level, message, nanos) {
                return;
            }
        }

        let stacktrace = (level >= self.core.stacktrace_level)
            .then(|| Backtrace::force_capture().to_string());

        let record = LogRecord {
            level,
            time,
            name: self.name.as_deref(),
            caller: self.core.caller.then(|| Caller::from_location(location)),
            message,
            trace_id: self.trace_id,
            span_id: self.span_id,
            bound: &self.fields,
            fields,
            stacktrace,
        };

        let line = self.core.encoder.encode(&record);
        self.core.sinks.deliver(&line);
    }
}

impl fmt::Debug for Logger {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Logger")
            .field("level", &self.core.level)
            .field("name", &self.name)
            .field("sinks", &self.core.sinks)
            .field("fields", &self.fields.len())
            .field("trace_id", &self.trace_id)
            .field("span_id", &self.span_id)
            .finish()
    }
}

/// Log a formatted message at debug level.
///
/// ```no_run
/// # let logger = solu_log::global::logger();
/// solu_log::debugf!(logger, "retrying in {}ms", 250);
/// ```
#[macro_export]
macro_rules! debugf {
    ($logger:expr, $($arg:tt)+) => {
        $logger.debug(&::std::format!($($arg)+))
    };
}

/// Log a formatted message at info level.
#[macro_export]
macro_rules! infof {
    ($logger:expr, $($arg:tt)+) => {
        $logger.info(&::std::format!($($arg)+))
    };
}

/// Log a formatted message at warn level.
#[macro_export]
macro_rules! warnf {
    ($logger:expr, $($arg:tt)+) => {
        $logger.warn(&::std::format!($($arg)+))
    };
}

/// Log a formatted message at error level.
#[macro_export]
macro_rules! errorf {
    ($logger:expr, $($arg:tt)+) => {
        $logger.error(&::std::format!($($arg)+))
    };
}
