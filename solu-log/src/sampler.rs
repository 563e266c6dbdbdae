//! Per-message rate limiting.
//!
//! Records are counted per `(level, message)` within one-second windows. In each
//! window the first `first` records pass; after that every `thereafter`-th
//! record passes, or none when `thereafter` is zero.
//!
//! Keys whose window has ended are dropped when the first record of a newer
//! window arrives, so only the keys seen in the current second stay tracked.

use crate::level::Level;
use dashmap::DashMap;
use serde::{Deserialize, Serialize};
use std::sync::atomic::{AtomicI64, Ordering};

const WINDOW_NANOS: i64 = 1_000_000_000;

/// Sampling parameters, see the module docs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SamplingConfig {
    pub first: u64,
    #[serde(default)]
    pub thereafter: u64,
}

#[derive(Debug)]
struct Window {
    start: i64,
    count: u64,
}

#[derive(Debug)]
pub struct Sampler {
    first: u64,
    thereafter: u64,
    counters: DashMap<(Level, String), Window>,
    /// Start of the newest window seen so far.
    latest: AtomicI64,
}

impl Sampler {
    pub fn new(config: SamplingConfig) -> Self {
        Self {
            first: config.first,
            thereafter: config.thereafter,
            counters: DashMap::new(),
            latest: AtomicI64::new(i64::MIN),
        }
    }

    pub fn config(&self) -> SamplingConfig {
        SamplingConfig {
            first: self.first,
            thereafter: self.thereafter,
        }
    }

    /// Count the record and report whether it should be written. `now_nanos` is
    /// the record time in nanoseconds since the Unix epoch.
    pub fn sample(&self, level: Level, message: &str, now_nanos: i64) -> bool {
        let start = now_nanos - now_nanos.rem_euclid(WINDOW_NANOS);
        self.evict_before(start);

        let n = {
            let mut window = self
                .counters
                .entry((level, message.to_owned()))
                .or_insert(Window { start, count: 0 });
            if window.start != start {
                window.start = start;
                window.count = 0;
            }
            window.count += 1;
            window.count
        };

        if n <= self.first {
            return true;
        }
        self.thereafter > 0 && (n - self.first) % self.thereafter == 0
    }

    /// Drop windows older than `start` the first time a record of that window
    /// is seen. Must not be called while holding a map entry.
    fn evict_before(&self, start: i64) {
        let previous = self.latest.fetch_max(start, Ordering::AcqRel);
        if start > previous {
            self.counters.retain(|_, window| window.start >= start);
        }
    }

    /// Number of distinct keys currently tracked.
    pub fn tracked(&self) -> usize {
        self.counters.len()
    }
}
