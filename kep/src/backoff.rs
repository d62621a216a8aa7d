use std::time::Duration;

use rand::Rng;

/// Delay before the next delivery attempt: `base` plus up to `jitter_percent`
/// percent of it, drawn uniformly.
///
/// A zero `jitter_percent` returns `base` unchanged, which keeps the retry
/// schedule fixed.
#[must_use]
pub fn retry_wait(base: Duration, jitter_percent: u8) -> Duration {
    if jitter_percent == 0 || base.is_zero() {
        return base;
    }
    let base_ms = u64::try_from(base.as_millis()).unwrap_or(u64::MAX);
    let jitter_range = std::cmp::max(1, base_ms.saturating_mul(u64::from(jitter_percent)) / 100);
    let mut rng = rand::rng();
    base.saturating_add(Duration::from_millis(rng.random_range(0..jitter_range)))
}
