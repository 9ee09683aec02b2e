/*!
 * Signal Limits and Constants
 *
 * Centralized location for timing defaults, bounds and environment keys.
 * Organized by domain for maintainability and discoverability.
 *
 * ## Conventions
 * - Timing values are expressed as `Duration` constants
 * - Values that preserve the classic signal behavior are marked with [COMPAT]
 * - Performance-sensitive constants are marked with [PERF]
 */

use std::time::Duration;

// =============================================================================
// CYCLE TIMING
// =============================================================================

/// Shortest phase interval drawn by default (4s)
/// [COMPAT] Lower bound of the inclusive [4000, 6000] ms range
pub const DEFAULT_MIN_CYCLE: Duration = Duration::from_millis(4000);

/// Longest phase interval drawn by default (6s)
/// [COMPAT] Upper bound of the inclusive [4000, 6000] ms range
pub const DEFAULT_MAX_CYCLE: Duration = Duration::from_millis(6000);

/// Sleep between two checks of the cycling loop (1ms)
/// [PERF] Bounds busy-polling while keeping ~1ms transition resolution
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_millis(1);

/// Upper bound accepted for any configured phase interval (1 hour)
pub const MAX_CYCLE_LIMIT: Duration = Duration::from_secs(60 * 60);

/// Upper bound accepted for the poll interval (1s)
/// Anything coarser makes transition timing meaningless
pub const MAX_POLL_INTERVAL: Duration = Duration::from_secs(1);

// =============================================================================
// FAST PRESET
// =============================================================================

/// Shortest interval of the fast preset (40ms)
pub const FAST_MIN_CYCLE: Duration = Duration::from_millis(40);

/// Longest interval of the fast preset (60ms)
pub const FAST_MAX_CYCLE: Duration = Duration::from_millis(60);

// =============================================================================
// THREADING
// =============================================================================

/// Name given to the background cycling thread
pub const CYCLE_THREAD_NAME: &str = "traffic-signal-cycle";

// =============================================================================
// ENVIRONMENT
// =============================================================================

/// Minimum cycle length in milliseconds
pub const ENV_CYCLE_MIN_MS: &str = "SIGNAL_CYCLE_MIN_MS";

/// Maximum cycle length in milliseconds
pub const ENV_CYCLE_MAX_MS: &str = "SIGNAL_CYCLE_MAX_MS";

/// Poll interval of the cycling loop in milliseconds
pub const ENV_POLL_MS: &str = "SIGNAL_POLL_MS";

/// Enables JSON trace output when set to `1` or `true`
pub const ENV_TRACE_JSON: &str = "SIGNAL_TRACE_JSON";

/// Number of green phases the demo binary waits for
pub const ENV_DEMO_GREENS: &str = "SIGNAL_DEMO_GREENS";

/// Default number of green phases the demo binary waits for
pub const DEFAULT_DEMO_GREENS: u32 = 3;
