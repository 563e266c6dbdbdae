//! Sink write and rotation counters.
//!
//! Counters are recorded through the `metrics` facade and are no-ops until the
//! application installs a recorder (for example the Prometheus exporter).
//!
//! # Metrics
//! - `solu_log_file_write_counter` (counter): file sink writes, by `state`
//! - `solu_log_file_rotate_counter` (counter): file rotations, by `state`
//! - `solu_log_console_write_counter` (counter): console sink writes, by `state`

use ::metrics::{counter, describe_counter};

pub const FILE_WRITE_COUNTER: &str = "solu_log_file_write_counter";
pub const FILE_ROTATE_COUNTER: &str = "solu_log_file_rotate_counter";
pub const CONSOLE_WRITE_COUNTER: &str = "solu_log_console_write_counter";

const STATE_LABEL: &str = "state";

/// Outcome label of a counted operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Ok,
    Error,
}

impl Outcome {
    pub fn of<T, E>(result: &Result<T, E>) -> Self {
        if result.is_ok() {
            Outcome::Ok
        } else {
            Outcome::Error
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Outcome::Ok => "ok",
            Outcome::Error => "error",
        }
    }
}

/// Registers help text for all counters. Call once after installing a recorder.
pub fn describe_metrics() {
    describe_counter!(FILE_WRITE_COUNTER, "File log write counter");
    describe_counter!(FILE_ROTATE_COUNTER, "File log rotate counter");
    describe_counter!(CONSOLE_WRITE_COUNTER, "Console log counter");
}

pub fn record_file_write(outcome: Outcome) {
    counter!(FILE_WRITE_COUNTER, STATE_LABEL => outcome.as_str()).increment(1);
}

pub fn record_file_rotate(outcome: Outcome) {
    counter!(FILE_ROTATE_COUNTER, STATE_LABEL => outcome.as_str()).increment(1);
}

pub fn record_console_write(outcome: Outcome) {
    counter!(CONSOLE_WRITE_COUNTER, STATE_LABEL => outcome.as_str()).increment(1);
}
