/*!
 * Signal Types
 * Phase values and the lock-free phase cell
 */

use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::atomic::{AtomicU8, Ordering};
use std::time::Instant;

/// Phase of a traffic signal
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
#[repr(u8)]
pub enum Phase {
    #[default]
    Red = 0,
    Green = 1,
}

impl Phase {
    /// The phase that follows this one
    #[inline]
    pub const fn toggled(self) -> Self {
        match self {
            Phase::Red => Phase::Green,
            Phase::Green => Phase::Red,
        }
    }

    #[inline]
    pub const fn is_green(self) -> bool {
        matches!(self, Phase::Green)
    }

    #[inline]
    const fn from_u8(raw: u8) -> Self {
        match raw {
            1 => Phase::Green,
            _ => Phase::Red,
        }
    }
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Phase::Red => f.write_str("red"),
            Phase::Green => f.write_str("green"),
        }
    }
}

/// Phase cell readable without blocking
///
/// Reads may observe a phase that is about to change or changed a moment
/// ago, never an invalid value.
#[derive(Debug)]
pub struct AtomicPhase(AtomicU8);

impl AtomicPhase {
    pub const fn new(phase: Phase) -> Self {
        Self(AtomicU8::new(phase as u8))
    }

    #[inline]
    pub fn load(&self) -> Phase {
        Phase::from_u8(self.0.load(Ordering::Relaxed))
    }

    #[inline]
    pub fn store(&self, phase: Phase) {
        self.0.store(phase as u8, Ordering::Relaxed);
    }
}

impl Default for AtomicPhase {
    fn default() -> Self {
        Self::new(Phase::default())
    }
}

/// A committed phase transition, as seen by broadcast subscribers
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PhaseChange {
    /// Phase the signal switched to
    pub phase: Phase,
    /// 1-based transition counter
    pub sequence: u64,
    /// When the cycling thread committed the switch
    pub at: Instant,
}
