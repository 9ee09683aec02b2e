/*!
 * Cycle Task - Autonomous Phase Cycling
 *
 * Background OS thread that toggles the signal between red and green on
 * thresholds drawn from an `IntervalSource`, publishing every transition.
 *
 * # Algorithm
 *
 * Each iteration sleeps for the poll interval, then compares the time since
 * the last transition with the current threshold. Once it is reached the
 * phase is flipped, pushed to the shared channel and the broadcast, and only
 * after the push completed is the baseline reset and a new threshold drawn.
 * At most one publish is ever in flight.
 *
 * # Graceful-with-Fallback Shutdown
 *
 * 1. **Preferred Path:** `shutdown()` sets the stop flag, joins the thread
 *    and reports a panic in the loop as `SignalError::TaskPanicked`.
 * 2. **Fallback Path:** `Drop` sets the same flag and joins, logging a
 *    warning so the missing `shutdown()` call is visible.
 *
 * The loop observes the flag once per poll interval, so both paths return
 * within roughly one poll interval plus one publish.
 */

use crate::core::errors::{SignalError, SignalResult};
use crate::core::limits::CYCLE_THREAD_NAME;
use crate::signal::interval::IntervalSource;
use crate::signal::light::SignalState;
use crate::signal::types::PhaseChange;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};
use tracing::{debug, info, warn};

/// Handle to the cycling thread
pub(crate) struct CycleTask {
    stop: Arc<AtomicBool>,
    handle: Option<JoinHandle<()>>,
}

impl CycleTask {
    /// Spawn the cycling thread
    pub fn spawn(
        state: Arc<SignalState>,
        source: Box<dyn IntervalSource>,
        poll_interval: Duration,
    ) -> SignalResult<Self> {
        let stop = Arc::new(AtomicBool::new(false));
        let loop_stop = stop.clone();
        let source_name = source.name();

        let handle = thread::Builder::new()
            .name(CYCLE_THREAD_NAME.to_string())
            .spawn(move || run_cycle_loop(state, source, poll_interval, loop_stop))?;

        info!(
            source = source_name,
            poll_ms = poll_interval.as_millis() as u64,
            "Cycle task spawned"
        );

        Ok(Self {
            stop,
            handle: Some(handle),
        })
    }

    /// Whether the thread has exited (stopped or panicked)
    pub fn is_finished(&self) -> bool {
        self.handle.as_ref().map_or(true, |h| h.is_finished())
    }

    /// Stop the loop and join the thread
    pub fn shutdown(mut self) -> SignalResult<()> {
        self.stop.store(true, Ordering::Release);

        match self.handle.take() {
            Some(handle) => match handle.join() {
                Ok(()) => {
                    info!("Cycle task shutdown complete");
                    Ok(())
                }
                Err(_) => {
                    warn!("Cycle task panicked before shutdown");
                    Err(SignalError::TaskPanicked)
                }
            },
            None => Ok(()),
        }
    }
}

impl Drop for CycleTask {
    fn drop(&mut self) {
        if let Some(handle) = self.handle.take() {
            warn!("Cycle task dropped without shutdown(), stopping and joining");
            self.stop.store(true, Ordering::Release);
            if handle.join().is_err() {
                warn!("Cycle task panicked before drop");
            }
        }
    }
}

fn run_cycle_loop(
    state: Arc<SignalState>,
    mut source: Box<dyn IntervalSource>,
    poll_interval: Duration,
    stop: Arc<AtomicBool>,
) {
    let mut threshold = source.next_interval();
    let mut last_switch = Instant::now();

    debug!(
        phase = %state.phase.load(),
        threshold_ms = threshold.as_millis() as u64,
        "Cycle loop started"
    );

    while !stop.load(Ordering::Acquire) {
        thread::sleep(poll_interval);

        if last_switch.elapsed() < threshold {
            continue;
        }

        // Never commit a phase that could not be published
        if stop.load(Ordering::Acquire) || state.channel.is_closed() {
            break;
        }

        let phase = state.phase.load().toggled();
        state.phase.store(phase);
        let at = Instant::now();
        let sequence = state.transitions.fetch_add(1, Ordering::Relaxed) + 1;

        // Channel only rejects once the signal is shutting down
        if state.channel.send(phase).is_err() {
            debug!(sequence, "Channel closed, leaving cycle loop");
            break;
        }
        let subscribers = state.broadcast.publish(PhaseChange {
            phase,
            sequence,
            at,
        });

        debug!(
            %phase,
            sequence,
            held_ms = threshold.as_millis() as u64,
            subscribers,
            "Phase switched"
        );

        last_switch = Instant::now();
        threshold = source.next_interval();
    }

    debug!("Cycle loop exited");
}
