//! Progress throttling.
//!
//! Rate-limits progress reports so a fast transfer does not flood the
//! status bus with updates the UI would coalesce anyway.

use std::time::{Duration, Instant};

/// Rate-limiter for progress reports.
///
/// Allows at most one report per `min_interval` of wall time.
#[derive(Debug)]
pub struct ProgressThrottle {
    last_emit: Option<Instant>,
    min_interval: Duration,
}

impl ProgressThrottle {
    /// Create a new throttle with the specified minimum interval.
    pub const fn new(min_interval: Duration) -> Self {
        Self {
            last_emit: None,
            min_interval,
        }
    }

    /// Check if enough time has passed to emit another report, and if so
    /// start a new interval.
    pub fn should_emit(&mut self) -> bool {
        let now = Instant::now();
        match self.last_emit {
            Some(last) if now.duration_since(last) < self.min_interval => false,
            _ => {
                self.last_emit = Some(now);
                true
            }
        }
    }

    /// Let the next check through immediately.
    ///
    /// Used after a pause so the first chunk after resuming is reported.
    pub const fn reset(&mut self) {
        self.last_emit = None;
    }

    /// The configured interval.
    pub const fn interval(&self) -> Duration {
        self.min_interval
    }
}
