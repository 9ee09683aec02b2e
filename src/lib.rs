/*!
 * Traffic Signal Library
 * Autonomous two-phase signal with blocking phase observers
 */

pub mod core;
pub mod monitoring;
pub mod signal;

// Re-exports
pub use crate::core::errors::{ChannelError, ChannelResult, SignalError, SignalResult};
pub use crate::core::sync::EventChannel;
pub use monitoring::init_tracing;
pub use signal::{
    IntervalSource, Phase, PhaseChange, PhaseSubscription, RandomInterval, SequenceInterval,
    SignalConfig, TrafficSignal,
};
