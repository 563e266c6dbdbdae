//! Structured JSON logging with rotating file and console sinks.
//!
//! A [`Logger`] encodes each record once and fans the bytes out to its sinks.
//! Records pass a level gate and an optional per-message sampler first. Trace
//! and span ids from a [`solu_core::TraceContext`] are stamped on records of
//! handles derived with [`Logger::in_context`].
//!
//! # Example
//! ```no_run
//! use solu_log::{Field, LoggerBuilder, RotationPolicy};
//!
//! let logger = LoggerBuilder::new()
//!     .level("info")
//!     .file("/var/log/app", "app.log", 64 << 20, RotationPolicy::Daily)
//!     .stdout()
//!     .build()?;
//!
//! let ctx = solu_core::fork(&solu_core::TraceContext::new());
//! logger
//!     .in_context(&ctx)
//!     .info_with("request served", &[Field::uint("status", 200)]);
//! # Ok::<(), solu_log::LogError>(())
//! ```

pub mod config;
pub mod console;
pub mod encoder;
pub mod error;
pub mod field;
pub mod file;
pub mod global;
pub mod level;
pub mod logger;
pub mod metrics;
pub mod record;
pub mod rotation;
pub mod sampler;
pub mod sink;

pub use config::{FileConfig, LoggerBuilder, LoggerConfig};
pub use console::ConsoleWriter;
pub use encoder::{EncoderKeys, JsonEncoder};
pub use error::{LogError, Result};
pub use field::{Field, FieldValue};
pub use file::FileWriter;
pub use level::Level;
pub use logger::Logger;
pub use crate::metrics::describe_metrics;
pub use record::{Caller, LogRecord};
pub use rotation::{next_deadline, RotationPolicy};
pub use sampler::{Sampler, SamplingConfig};
pub use sink::{FanOut, Sink};
