//! Simulated network latency with a seen-key cache.
//!
//! Each [`ContactStore`](crate::ContactStore) owns one of these. Keyed calls
//! pay a random delay the first time a key is seen and nothing afterwards;
//! an unkeyed call clears the cache (a fresh interaction) and always pays.
//! None of this changes what an operation returns, only when.

use parking_lot::Mutex;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::collections::HashSet;
use std::time::Duration;

/// Upper bound (exclusive) of the simulated delay unless configured.
pub const DEFAULT_MAX_DELAY: Duration = Duration::from_millis(800);

/// Seen-key cache plus the random source for delays.
pub struct LatencySimulator {
    max_delay: Duration,
    seen: Mutex<HashSet<String>>,
    rng: Mutex<StdRng>,
}

impl LatencySimulator {
    /// Delays drawn from `[0, max_delay)`. A zero `max_delay` never sleeps
    /// but still tracks keys.
    pub fn new(max_delay: Duration) -> Self {
        Self {
            max_delay,
            seen: Mutex::new(HashSet::new()),
            rng: Mutex::new(StdRng::from_entropy()),
        }
    }

    /// Same as [`new`](Self::new) but with a reproducible delay sequence.
    pub fn with_seed(max_delay: Duration, seed: u64) -> Self {
        Self {
            max_delay,
            seen: Mutex::new(HashSet::new()),
            rng: Mutex::new(StdRng::seed_from_u64(seed)),
        }
    }

    /// Simulator that never sleeps.
    pub fn disabled() -> Self {
        Self::new(Duration::ZERO)
    }

    /// Configured upper bound.
    #[must_use]
    pub fn max_delay(&self) -> Duration {
        self.max_delay
    }

    /// Wait like a network round trip would.
    ///
    /// - `None`: clear the cache, then pay a delay.
    /// - a key already seen: return right away.
    /// - a new key: remember it, then pay a delay.
    pub async fn simulate(&self, key: Option<&str>) {
        match key {
            None => self.reset(),
            Some(k) => {
                if !self.seen.lock().insert(k.to_owned()) {
                    log::trace!("latency cache hit for `{k}`");
                    return;
                }
            }
        }
        let delay = self.next_delay();
        if !delay.is_zero() {
            log::trace!("simulating {}ms of latency for {key:?}", delay.as_millis());
            tokio::time::sleep(delay).await;
        }
    }

    /// Forget every seen key.
    pub fn reset(&self) {
        self.seen.lock().clear();
    }

    /// `true` if `key` would be served without a delay.
    #[must_use]
    pub fn has_seen(&self, key: &str) -> bool {
        self.seen.lock().contains(key)
    }

    /// Number of keys currently cached.
    #[must_use]
    pub fn seen_len(&self) -> usize {
        self.seen.lock().len()
    }

    fn next_delay(&self) -> Duration {
        if self.max_delay.is_zero() {
            return Duration::ZERO;
        }
        self.rng.lock().gen_range(Duration::ZERO..self.max_delay)
    }
}

impl Default for LatencySimulator {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_DELAY)
    }
}

impl std::fmt::Debug for LatencySimulator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LatencySimulator")
            .field("max_delay", &self.max_delay)
            .field("seen", &self.seen_len())
            .finish_non_exhaustive()
    }
}
