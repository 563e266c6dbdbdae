//! Process-wide logger.
//!
//! [`init`] installs the logger once, before first use. If [`logger`] runs first
//! it installs a debug-level stdout logger, after which [`init`] fails.

use crate::console::ConsoleWriter;
use crate::encoder::JsonEncoder;
use crate::error::{LogError, Result};
use crate::field::Field;
use crate::level::Level;
use crate::logger::{LogCore, Logger};
use crate::sink::{FanOut, Sink};
use solu_core::TraceContext;
use std::sync::{Arc, OnceLock};

static GLOBAL: OnceLock<Logger> = OnceLock::new();

pub fn init(logger: Logger) -> Result<()> {
    GLOBAL.set(logger).map_err(|_| LogError::AlreadyInitialized)
}

pub fn is_initialized() -> bool {
    GLOBAL.get().is_some()
}

pub fn logger() -> &'static Logger {
    GLOBAL.get_or_init(default_logger)
}

fn default_logger() -> Logger {
    Logger::from_core(LogCore {
        sinks: FanOut::new(vec![Arc::new(ConsoleWriter::stdout()) as Arc<dyn Sink>]),
        level: Level::Debug,
        sampler: None,
        encoder: JsonEncoder::default(),
        development: false,
        caller: true,
        stacktrace_level: Level::DPanic,
    })
}

/// Handle stamping `ctx`'s ids, derived from the process logger.
pub fn in_context(ctx: &TraceContext) -> Logger {
    logger().in_context(ctx)
}

pub fn with<I>(fields: I) -> Logger
where
    I: IntoIterator,
    I::Item: Into<Field>,
{
    logger().with(fields)
}

#[track_caller]
pub fn debug(message: &str) {
    logger().debug(message);
}

#[track_caller]
pub fn info(message: &str) {
    logger().info(message);
}

#[track_caller]
pub fn warn(message: &str) {
    logger().warn(message);
}

#[track_caller]
pub fn error(message: &str) {
    logger().error(message);
}

#[track_caller]
pub fn panic(message: &str) -> ! {
    logger().panic(message)
}

#[track_caller]
pub fn fatal(message: &str) -> ! {
    logger().fatal(message)
}
