use std::time::Duration;

use tokio::time::Instant;

/// Wall-clock stopwatch started on construction.
///
/// Reads Tokio's clock, so it follows `tokio::time::pause` in tests.
#[derive(Debug, Clone, Copy)]
pub struct Timer {
    started: Instant,
}

impl Default for Timer {
    fn default() -> Self {
        Self::start()
    }
}

impl Timer {
    /// Start a new timer.
    #[must_use]
    pub fn start() -> Self {
        Self {
            started: Instant::now(),
        }
    }

    /// Time elapsed since the timer started.
    #[must_use]
    pub fn elapsed(&self) -> Duration {
        self.started.elapsed()
    }

    /// Elapsed time in fractional seconds.
    #[must_use]
    pub fn elapsed_secs(&self) -> f64 {
        self.elapsed().as_secs_f64()
    }
}
