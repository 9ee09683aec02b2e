/*!
 * Error Types
 * Centralized error handling with thiserror, miette, and serde support
 */

use miette::Diagnostic;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Event channel errors
#[derive(Error, Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Diagnostic)]
#[serde(tag = "error_type", rename_all = "snake_case")]
pub enum ChannelError {
    #[error("Channel closed")]
    #[diagnostic(
        code(channel::closed),
        help("The channel was closed and every queued value has been consumed.")
    )]
    Closed,

    #[error("Channel receive timed out")]
    #[diagnostic(
        code(channel::timeout),
        help("No value arrived before the deadline. Retry or extend the timeout.")
    )]
    Timeout,
}

/// Result type for channel operations
pub type ChannelResult<T> = std::result::Result<T, ChannelError>;

/// Traffic signal errors with serialization support
#[derive(Error, Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Diagnostic)]
#[serde(tag = "error_type", content = "details", rename_all = "snake_case")]
pub enum SignalError {
    #[error("Signal cycle is already running")]
    #[diagnostic(
        code(signal::already_running),
        help("start() may only be called once per signal. Create a new signal for a second cycle.")
    )]
    AlreadyRunning,

    #[error("Failed to spawn cycling thread: {0}")]
    #[diagnostic(
        code(signal::spawn_failed),
        help("The OS refused to create a thread. Check process thread limits.")
    )]
    Spawn(String),

    #[error("Signal stopped")]
    #[diagnostic(
        code(signal::stopped),
        help("The signal was shut down while waiting. No further phases will be published.")
    )]
    Stopped,

    #[error("Timed out waiting for phase")]
    #[diagnostic(
        code(signal::timeout),
        help("The awaited phase was not observed before the deadline.")
    )]
    Timeout,

    #[error("Invalid signal configuration: {0}")]
    #[diagnostic(
        code(signal::invalid_config),
        help("Cycle bounds must satisfy 0 < min <= max and the poll interval must be non-zero.")
    )]
    InvalidConfig(String),

    #[error("Cycling thread panicked")]
    #[diagnostic(
        code(signal::task_panicked),
        help("The background cycle terminated abnormally. Inspect the logs for the panic message.")
    )]
    TaskPanicked,
}

impl From<ChannelError> for SignalError {
    fn from(err: ChannelError) -> Self {
        match err {
            ChannelError::Closed => SignalError::Stopped,
            ChannelError::Timeout => SignalError::Timeout,
        }
    }
}

impl From<std::io::Error> for SignalError {
    fn from(err: std::io::Error) -> Self {
        SignalError::Spawn(err.to_string())
    }
}

/// Result type for signal operations
pub type SignalResult<T> = std::result::Result<T, SignalError>;
