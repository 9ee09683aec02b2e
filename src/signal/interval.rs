/*!
 * Interval Sources
 *
 * Strategies that decide how long each phase lasts.
 *
 * # Design: Trait-Based Strategy
 *
 * The cycling thread owns its source and asks it for the next threshold
 * after every transition. Production uses `RandomInterval` (uniform,
 * independently drawn); tests inject `SequenceInterval` to get a
 * deterministic schedule.
 */

use crate::signal::config::SignalConfig;
use rand::distributions::{Distribution, Uniform};
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::time::Duration;

/// Strategy producing phase interval lengths
pub trait IntervalSource: Send + 'static {
    /// Length of the next phase
    fn next_interval(&mut self) -> Duration;

    /// Get source name for debugging
    fn name(&self) -> &'static str;
}

/// Uniform random intervals from an inclusive range, at microsecond granularity
pub struct RandomInterval {
    dist: Uniform<u64>,
    rng: StdRng,
}

impl RandomInterval {
    /// Draw from `[min, max]`, seeded from OS entropy
    pub fn new(min: Duration, max: Duration) -> Self {
        Self::with_rng(min, max, StdRng::from_entropy())
    }

    /// Deterministic variant for reproducible runs
    pub fn seeded(min: Duration, max: Duration, seed: u64) -> Self {
        Self::with_rng(min, max, StdRng::seed_from_u64(seed))
    }

    pub fn from_config(config: &SignalConfig) -> Self {
        Self::new(config.min_cycle, config.max_cycle)
    }

    fn with_rng(min: Duration, max: Duration, rng: StdRng) -> Self {
        // Round the lower bound up so no draw falls below `min`
        let lo = min.as_nanos().div_ceil(1_000) as u64;
        let hi = (max.as_micros() as u64).max(lo);
        Self {
            dist: Uniform::new_inclusive(lo, hi),
            rng,
        }
    }
}

impl IntervalSource for RandomInterval {
    fn next_interval(&mut self) -> Duration {
        Duration::from_micros(self.dist.sample(&mut self.rng))
    }

    fn name(&self) -> &'static str {
        "random"
    }
}

/// Replays a fixed list of intervals, wrapping around at the end
#[derive(Debug, Clone)]
pub struct SequenceInterval {
    intervals: Vec<Duration>,
    next: usize,
}

impl SequenceInterval {
    /// An empty list behaves like a single zero-length interval
    pub fn new(intervals: impl IntoIterator<Item = Duration>) -> Self {
        let mut intervals: Vec<Duration> = intervals.into_iter().collect();
        if intervals.is_empty() {
            intervals.push(Duration::ZERO);
        }
        Self { intervals, next: 0 }
    }

    pub fn constant(interval: Duration) -> Self {
        Self::new([interval])
    }
}

impl IntervalSource for SequenceInterval {
    fn next_interval(&mut self) -> Duration {
        let interval = self.intervals[self.next];
        self.next = (self.next + 1) % self.intervals.len();
        interval
    }

    fn name(&self) -> &'static str {
        "sequence"
    }
}
