/*!
 * Signal Configuration
 *
 * Runtime configuration for cycle timing
 */

use crate::core::errors::{SignalError, SignalResult};
use crate::core::limits::{
    DEFAULT_MAX_CYCLE, DEFAULT_MIN_CYCLE, DEFAULT_POLL_INTERVAL, ENV_CYCLE_MAX_MS,
    ENV_CYCLE_MIN_MS, ENV_POLL_MS, FAST_MAX_CYCLE, FAST_MIN_CYCLE, MAX_CYCLE_LIMIT,
    MAX_POLL_INTERVAL,
};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Cycle timing configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SignalConfig {
    /// Shortest phase interval (inclusive)
    pub min_cycle: Duration,
    /// Longest phase interval (inclusive)
    pub max_cycle: Duration,
    /// Sleep between two checks of the cycling loop
    pub poll_interval: Duration,
}

impl Default for SignalConfig {
    fn default() -> Self {
        Self {
            min_cycle: DEFAULT_MIN_CYCLE,
            max_cycle: DEFAULT_MAX_CYCLE,
            poll_interval: DEFAULT_POLL_INTERVAL,
        }
    }
}

impl SignalConfig {
    /// Configuration with millisecond-scale phases, for demos and tests
    pub const fn fast() -> Self {
        Self {
            min_cycle: FAST_MIN_CYCLE,
            max_cycle: FAST_MAX_CYCLE,
            poll_interval: DEFAULT_POLL_INTERVAL,
        }
    }

    pub const fn with_cycle_range(mut self, min_cycle: Duration, max_cycle: Duration) -> Self {
        self.min_cycle = min_cycle;
        self.max_cycle = max_cycle;
        self
    }

    pub const fn with_poll_interval(mut self, poll_interval: Duration) -> Self {
        self.poll_interval = poll_interval;
        self
    }

    /// Check bounds: `0 < min <= max <= MAX_CYCLE_LIMIT`, `0 < poll <= MAX_POLL_INTERVAL`
    pub fn validate(&self) -> SignalResult<()> {
        if self.min_cycle.is_zero() {
            return Err(SignalError::InvalidConfig(
                "min_cycle must be greater than zero".into(),
            ));
        }
        if self.min_cycle > self.max_cycle {
            return Err(SignalError::InvalidConfig(format!(
                "min_cycle ({:?}) exceeds max_cycle ({:?})",
                self.min_cycle, self.max_cycle
            )));
        }
        if self.max_cycle > MAX_CYCLE_LIMIT {
            return Err(SignalError::InvalidConfig(format!(
                "max_cycle ({:?}) exceeds limit ({:?})",
                self.max_cycle, MAX_CYCLE_LIMIT
            )));
        }
        if self.poll_interval.is_zero() || self.poll_interval > MAX_POLL_INTERVAL {
            return Err(SignalError::InvalidConfig(format!(
                "poll_interval ({:?}) must be within (0, {:?}]",
                self.poll_interval, MAX_POLL_INTERVAL
            )));
        }
        Ok(())
    }

    /// Load configuration from the environment, falling back to defaults
    ///
    /// Environment variables:
    /// - SIGNAL_CYCLE_MIN_MS: shortest interval (default: 4000)
    /// - SIGNAL_CYCLE_MAX_MS: longest interval (default: 6000)
    /// - SIGNAL_POLL_MS: loop poll interval (default: 1)
    pub fn from_env() -> SignalResult<Self> {
        let defaults = Self::default();
        let config = Self {
            min_cycle: env_millis(ENV_CYCLE_MIN_MS)?.unwrap_or(defaults.min_cycle),
            max_cycle: env_millis(ENV_CYCLE_MAX_MS)?.unwrap_or(defaults.max_cycle),
            poll_interval: env_millis(ENV_POLL_MS)?.unwrap_or(defaults.poll_interval),
        };
        config.validate()?;
        Ok(config)
    }
}

fn env_millis(key: &str) -> SignalResult<Option<Duration>> {
    match std::env::var(key) {
        Ok(raw) => raw
            .trim()
            .parse::<u64>()
            .map(|ms| Some(Duration::from_millis(ms)))
            .map_err(|e| SignalError::InvalidConfig(format!("{}={:?}: {}", key, raw, e))),
        Err(_) => Ok(None),
    }
}
