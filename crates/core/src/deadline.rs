//! Wall-clock budget polled cooperatively by the search loops.

use std::time::{Duration, Instant};

/// Monotonic deadline measured from the start of a run.
#[derive(Debug, Clone, Copy)]
pub struct Deadline {
    start: Instant,
    limit: Option<Duration>,
}

impl Deadline {
    /// Starts the clock now. A limit of 0 ms never expires.
    pub fn start(limit_ms: u64) -> Self {
        Self {
            start: Instant::now(),
            limit: (limit_ms > 0).then(|| Duration::from_millis(limit_ms)),
        }
    }

    /// A deadline that never expires.
    pub fn unlimited() -> Self {
        Self::start(0)
    }

    /// Returns true once the limit has been reached.
    #[inline]
    pub fn expired(&self) -> bool {
        match self.limit {
            Some(limit) => self.start.elapsed() >= limit,
            None => false,
        }
    }

    /// Milliseconds since the clock started.
    pub fn elapsed_ms(&self) -> u64 {
        self.start.elapsed().as_millis() as u64
    }

    /// The configured limit, if any.
    pub fn limit(&self) -> Option<Duration> {
        self.limit
    }
}
