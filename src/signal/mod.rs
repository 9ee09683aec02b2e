/*!
 * Traffic Signal Module
 *
 * A single signal cycling between red and green on randomized intervals,
 * publishing every transition to blocking observers.
 *
 * # Architecture
 *
 * - `light`: the `TrafficSignal` owner type and its observer API
 * - `cycle`: background cycling thread with graceful-with-fallback shutdown
 * - `broadcast`: per-subscriber fan-out of phase changes
 * - `interval`: injectable interval strategies (random, fixed sequence)
 * - `config`: timing configuration and environment loading
 * - `types`: `Phase`, `AtomicPhase`, `PhaseChange`
 */

mod broadcast;
mod config;
mod cycle;
mod interval;
mod light;
mod types;

// Re-export public API
pub use broadcast::{PhaseSubscription, SubscriberId};
pub use config::SignalConfig;
pub use interval::{IntervalSource, RandomInterval, SequenceInterval};
pub use light::TrafficSignal;
pub use types::{AtomicPhase, Phase, PhaseChange};
