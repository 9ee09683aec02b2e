/*!
 * Traffic Signal - Demo Driver
 *
 * Starts one signal, waits for a number of green phases while a broadcast
 * subscriber logs every transition, then shuts everything down.
 */

use anyhow::{Context, Result};
use std::sync::Arc;
use std::thread;
use std::time::Instant;
use tracing::info;

use traffic_signal::core::limits::{DEFAULT_DEMO_GREENS, ENV_DEMO_GREENS};
use traffic_signal::{init_tracing, SignalError, TrafficSignal};

fn main() -> Result<()> {
    // Initialize structured tracing
    init_tracing();

    let greens = match std::env::var(ENV_DEMO_GREENS) {
        Ok(raw) => raw
            .trim()
            .parse::<u32>()
            .with_context(|| format!("{}={:?} is not a number", ENV_DEMO_GREENS, raw))?,
        Err(_) => DEFAULT_DEMO_GREENS,
    };

    let signal = Arc::new(TrafficSignal::from_env().context("Failed to configure signal")?);
    info!(config = ?signal.config(), greens, "Traffic signal demo starting");

    // Broadcast subscriber sees every transition, independent of the observer below
    let subscription = signal.subscribe();
    let subscriber = subscription.id();
    let logger = thread::Builder::new()
        .name("phase-logger".into())
        .spawn(move || loop {
            match subscription.recv() {
                Ok(change) => info!(
                    subscriber,
                    phase = %change.phase,
                    green = change.phase.is_green(),
                    sequence = change.sequence,
                    "Phase change observed"
                ),
                Err(SignalError::Stopped) => break,
                Err(e) => {
                    tracing::warn!(error = %e, "Subscription failed");
                    break;
                }
            }
        })
        .context("Failed to spawn logger thread")?;

    signal.start().context("Failed to start signal")?;
    info!(
        phase = %signal.current_phase(),
        subscribers = signal.subscriber_count(),
        "Signal running"
    );

    for n in 1..=greens {
        let started = Instant::now();
        signal.wait_for_green().context("Signal stopped while waiting")?;
        info!(
            n,
            waited_ms = started.elapsed().as_millis() as u64,
            phase = %signal.current_phase(),
            "Green observed, crossing"
        );
    }

    signal.shutdown().context("Signal shutdown failed")?;
    if logger.join().is_err() {
        tracing::warn!("Logger thread panicked");
    }

    info!(transitions = signal.transitions(), "Traffic signal demo finished");
    Ok(())
}
