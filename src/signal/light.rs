/*!
 * Traffic Signal
 *
 * Owns the phase state, the shared event channel, the broadcast hub and the
 * cycling thread.
 *
 * # Observers
 *
 * `wait_for_green` drains the shared channel: every published phase is
 * consumed by exactly one caller. With several concurrent observers a single
 * green transition satisfies only one of them, and the others keep waiting
 * for a later green. Observers that must all see every transition should
 * use `subscribe()` instead.
 */

use crate::core::errors::{SignalError, SignalResult};
use crate::core::sync::EventChannel;
use crate::monitoring::WaitSpan;
use crate::signal::broadcast::{PhaseBroadcast, PhaseSubscription};
use crate::signal::config::SignalConfig;
use crate::signal::cycle::CycleTask;
use crate::signal::interval::{IntervalSource, RandomInterval};
use crate::signal::types::{AtomicPhase, Phase};
use parking_lot::Mutex;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::info;

/// State shared between the signal and its cycling thread
pub(crate) struct SignalState {
    pub phase: AtomicPhase,
    pub channel: EventChannel<Phase>,
    pub broadcast: PhaseBroadcast,
    pub transitions: AtomicU64,
}

/// A single traffic signal cycling between red and green
///
/// # Examples
///
/// ```no_run
/// use traffic_signal::{Phase, TrafficSignal};
///
/// let signal = TrafficSignal::new();
/// assert_eq!(signal.current_phase(), Phase::Red);
///
/// signal.start()?;
/// signal.wait_for_green()?;
/// signal.shutdown()?;
/// # Ok::<(), traffic_signal::SignalError>(())
/// ```
pub struct TrafficSignal {
    state: Arc<SignalState>,
    config: SignalConfig,
    source: Mutex<Option<Box<dyn IntervalSource>>>,
    task: Mutex<Option<CycleTask>>,
    stopped: AtomicBool,
}

impl TrafficSignal {
    /// Signal with the default [4000, 6000] ms random cycle
    pub fn new() -> Self {
        let config = SignalConfig::default();
        Self::build(config, Box::new(RandomInterval::from_config(&config)))
    }

    /// Signal with a validated custom configuration
    pub fn with_config(config: SignalConfig) -> SignalResult<Self> {
        config.validate()?;
        Ok(Self::build(
            config,
            Box::new(RandomInterval::from_config(&config)),
        ))
    }

    /// Signal whose intervals come from `source` instead of the random range
    ///
    /// Only `config.poll_interval` is used; the cycle bounds are ignored.
    pub fn with_interval_source<S>(config: SignalConfig, source: S) -> SignalResult<Self>
    where
        S: IntervalSource,
    {
        config.validate()?;
        Ok(Self::build(config, Box::new(source)))
    }

    /// Signal configured from `SIGNAL_*` environment variables
    pub fn from_env() -> SignalResult<Self> {
        Self::with_config(SignalConfig::from_env()?)
    }

    fn build(config: SignalConfig, source: Box<dyn IntervalSource>) -> Self {
        Self {
            state: Arc::new(SignalState {
                phase: AtomicPhase::new(Phase::Red),
                channel: EventChannel::new(),
                broadcast: PhaseBroadcast::new(),
                transitions: AtomicU64::new(0),
            }),
            config,
            source: Mutex::new(Some(source)),
            task: Mutex::new(None),
            stopped: AtomicBool::new(false),
        }
    }

    /// Best-effort snapshot of the current phase (never blocks)
    #[inline]
    pub fn current_phase(&self) -> Phase {
        self.state.phase.load()
    }

    /// Spawn the cycling thread
    ///
    /// May only succeed once per signal; later calls return
    /// `SignalError::AlreadyRunning` (or `Stopped` after shutdown).
    pub fn start(&self) -> SignalResult<()> {
        // `stopped` only flips while the task lock is held
        let mut task = self.task.lock();
        if self.stopped.load(Ordering::Acquire) {
            return Err(SignalError::Stopped);
        }

        let source = self
            .source
            .lock()
            .take()
            .ok_or(SignalError::AlreadyRunning)?;

        *task = Some(CycleTask::spawn(
            self.state.clone(),
            source,
            self.config.poll_interval,
        )?);

        info!(phase = %self.current_phase(), "Traffic signal started");
        Ok(())
    }

    /// Alias of [`start`](Self::start)
    #[inline]
    pub fn simulate(&self) -> SignalResult<()> {
        self.start()
    }

    /// Block until a green phase is received from the shared channel
    ///
    /// Returns `SignalError::Stopped` if the signal shuts down first.
    pub fn wait_for_green(&self) -> SignalResult<()> {
        self.wait_for(Phase::Green)
    }

    /// Block until `phase` is received from the shared channel
    pub fn wait_for(&self, phase: Phase) -> SignalResult<()> {
        let span = WaitSpan::new(phase);
        let result: SignalResult<()> = loop {
            match self.state.channel.receive() {
                Ok(received) if received == phase => break Ok(()),
                Ok(_) => continue,
                Err(e) => break Err(e.into()),
            }
        };
        span.record_outcome(outcome_label(&result));
        result
    }

    /// Like [`wait_for_green`](Self::wait_for_green), giving up after `timeout`
    pub fn wait_for_green_timeout(&self, timeout: Duration) -> SignalResult<()> {
        self.wait_for_timeout(Phase::Green, timeout)
    }

    pub fn wait_for_timeout(&self, phase: Phase, timeout: Duration) -> SignalResult<()> {
        let Some(deadline) = Instant::now().checked_add(timeout) else {
            return self.wait_for(phase);
        };
        let span = WaitSpan::new(phase);
        let result: SignalResult<()> = loop {
            let remaining = deadline.saturating_duration_since(Instant::now());
            match self.state.channel.receive_timeout(remaining) {
                Ok(received) if received == phase => break Ok(()),
                Ok(_) => continue,
                Err(e) => break Err(e.into()),
            }
        };
        span.record_outcome(outcome_label(&result));
        result
    }

    /// Independent stream of every phase change from now on
    pub fn subscribe(&self) -> PhaseSubscription {
        self.state.broadcast.subscribe()
    }

    /// Live broadcast subscriptions
    #[inline]
    pub fn subscriber_count(&self) -> usize {
        self.state.broadcast.subscriber_count()
    }

    /// Number of transitions committed so far
    #[inline]
    pub fn transitions(&self) -> u64 {
        self.state.transitions.load(Ordering::Relaxed)
    }

    /// Phases published to the shared channel and not yet consumed
    #[inline]
    pub fn pending_events(&self) -> usize {
        self.state.channel.len()
    }

    pub fn is_running(&self) -> bool {
        self.task
            .lock()
            .as_ref()
            .map_or(false, |task| !task.is_finished())
    }

    pub fn config(&self) -> &SignalConfig {
        &self.config
    }

    /// Stop the cycling thread, join it and release every waiter
    ///
    /// Blocked `wait_for_green` callers and subscribers drain what was
    /// already published, then get `SignalError::Stopped`. Idempotent.
    pub fn shutdown(&self) -> SignalResult<()> {
        let task = {
            let mut guard = self.task.lock();
            if self.stopped.swap(true, Ordering::AcqRel) {
                return Ok(());
            }
            guard.take()
        };
        let joined = task.map_or(Ok(()), CycleTask::shutdown);

        self.state.channel.close();
        self.state.broadcast.close();

        info!(transitions = self.transitions(), "Traffic signal stopped");
        joined
    }
}

fn outcome_label(result: &SignalResult<()>) -> &'static str {
    match result {
        Ok(()) => "observed",
        Err(SignalError::Timeout) => "timeout",
        Err(_) => "stopped",
    }
}

impl Default for TrafficSignal {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for TrafficSignal {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TrafficSignal")
            .field("phase", &self.current_phase())
            .field("transitions", &self.transitions())
            .field("config", &self.config)
            .field("stopped", &self.stopped.load(Ordering::Relaxed))
            .finish()
    }
}
