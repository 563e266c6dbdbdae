//! Default key names of an encoded log record.

pub const LOG_TRACE_KEY: &str = "gTrace";
pub const LOG_SPAN_KEY: &str = "gSpan";

pub const LOG_TIME_KEY: &str = "gTime";
pub const LOG_LEVEL_KEY: &str = "gLevel";
pub const LOG_NAME_KEY: &str = "gName";
pub const LOG_CALLER_KEY: &str = "gCaller";
pub const LOG_MESSAGE_KEY: &str = "gMessage";
pub const LOG_STACKTRACE_KEY: &str = "gStack";
