//! Randomized pauses between listing-page fetches.
//!
//! Successive requests to the job site are spaced by a delay drawn
//! uniformly from `[0, ceiling]` so the scan does not run at a fixed
//! machine cadence.
//!
//! # Example
//!
//! ```rust
//! use std::time::Duration;
//! use artemis_core::pacing::PacingConfig;
//!
//! let pacing = PacingConfig::new(Duration::from_secs(20));
//! assert!(pacing.next_delay() <= Duration::from_secs(20));
//! ```

use std::time::Duration;

use rand::Rng;

/// Default upper bound for a single pause.
pub const DEFAULT_PACING_CEILING: Duration = Duration::from_secs(60);

/// Configuration for the pause taken after each page fetch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PacingConfig {
    /// Longest possible pause. `Duration::ZERO` disables pacing.
    pub ceiling: Duration,
}

impl PacingConfig {
    pub fn new(ceiling: Duration) -> Self {
        Self { ceiling }
    }

    /// No pauses at all.
    pub fn disabled() -> Self {
        Self::new(Duration::ZERO)
    }

    /// Draw one delay, uniform in `[0, ceiling]` at millisecond resolution.
    pub fn next_delay(&self) -> Duration {
        let max_ms = u64::try_from(self.ceiling.as_millis()).unwrap_or(u64::MAX);
        if max_ms == 0 {
            return Duration::ZERO;
        }
        Duration::from_millis(rand::rng().random_range(0..=max_ms))
    }

    /// Sleep for a freshly drawn delay.
    pub async fn pause(&self) {
        let delay = self.next_delay();
        if delay.is_zero() {
            return;
        }
        tracing::debug!(delay_ms = %delay.as_millis(), "Pacing before next page");
        tokio::time::sleep(delay).await;
    }
}

impl Default for PacingConfig {
    fn default() -> Self {
        Self::new(DEFAULT_PACING_CEILING)
    }
}
