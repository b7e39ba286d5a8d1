//! Randomized delay between successive downloads.
//!
//! Runs are sequential; the pacer spaces requests out by a whole number of
//! seconds drawn uniformly from an inclusive range so the remote source is
//! never hit in a tight loop.

use std::time::Duration;

use rand::Rng;
use tracing::debug;

/// Default lower bound of the inter-download delay, in seconds.
pub const DEFAULT_MIN_DELAY_SECS: u64 = 1;

/// Default upper bound of the inter-download delay, in seconds.
pub const DEFAULT_MAX_DELAY_SECS: u64 = 10;

/// Draws and sleeps the delay between downloads.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pacer {
    min_secs: u64,
    max_secs: u64,
}

impl Default for Pacer {
    fn default() -> Self {
        Self::new(DEFAULT_MIN_DELAY_SECS, DEFAULT_MAX_DELAY_SECS)
    }
}

impl Pacer {
    /// Creates a pacer drawing from `min_secs..=max_secs`.
    ///
    /// A `max_secs` below `min_secs` is raised to `min_secs`.
    #[must_use]
    pub fn new(min_secs: u64, max_secs: u64) -> Self {
        Self {
            min_secs,
            max_secs: max_secs.max(min_secs),
        }
    }

    /// A pacer that never waits.
    #[must_use]
    pub fn disabled() -> Self {
        Self::new(0, 0)
    }

    /// Draws the next delay.
    #[must_use]
    pub fn next_delay(&self) -> Duration {
        if self.min_secs == self.max_secs {
            return Duration::from_secs(self.min_secs);
        }
        let mut rng = rand::thread_rng();
        Duration::from_secs(rng.gen_range(self.min_secs..=self.max_secs))
    }

    /// Sleeps for a freshly drawn delay and returns it.
    pub async fn wait(&self) -> Duration {
        let delay = self.next_delay();
        if !delay.is_zero() {
            debug!(delay_secs = delay.as_secs(), "pacing before next download");
            tokio::time::sleep(delay).await;
        }
        delay
    }
}
