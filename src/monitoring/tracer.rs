/*!
 * Tracing
 * Structured logging setup and observer wait spans using the tracing crate
 *
 * Features:
 * - Env-driven filtering (RUST_LOG)
 * - JSON-formatted logs for structured parsing
 * - Per-wait spans that report how long an observer blocked
 */

use crate::core::limits::ENV_TRACE_JSON;
use crate::signal::Phase;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{Duration, Instant};
use tracing::{debug, info, span, Level};
use tracing_subscriber::{
    fmt::format::FmtSpan, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter,
};

/// Waits longer than this are logged at info level
const LONG_WAIT: Duration = Duration::from_secs(10);

static NEXT_WAIT_ID: AtomicU64 = AtomicU64::new(1);

/// Initialize structured tracing
///
/// Environment variables:
/// - RUST_LOG: Set log level (default: info)
/// - SIGNAL_TRACE_JSON: Enable JSON output (default: false)
///
/// Safe to call more than once; only the first call installs a subscriber.
pub fn init_tracing() {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    let use_json = std::env::var(ENV_TRACE_JSON)
        .map(|v| v == "1" || v == "true")
        .unwrap_or(false);

    let registry = tracing_subscriber::registry().with(env_filter);

    let installed = if use_json {
        // JSON output for production/parsing
        registry
            .with(
                tracing_subscriber::fmt::layer()
                    .json()
                    .with_target(true)
                    .with_thread_names(true)
                    .with_current_span(true)
                    .with_span_list(true),
            )
            .try_init()
    } else {
        // Human-readable output for development
        registry
            .with(
                tracing_subscriber::fmt::layer()
                    .with_target(true)
                    .with_thread_names(true)
                    .with_span_events(FmtSpan::CLOSE)
                    .compact(),
            )
            .try_init()
    };

    if installed.is_ok() {
        info!(json = use_json, "Structured tracing initialized");
    }
}

/// Span covering one blocking wait for a phase
pub struct WaitSpan {
    span: tracing::Span,
    start: Instant,
    wait_id: u64,
}

impl WaitSpan {
    pub fn new(target: Phase) -> Self {
        let wait_id = NEXT_WAIT_ID.fetch_add(1, Ordering::Relaxed);
        let span = span!(
            Level::DEBUG,
            "wait_for_phase",
            wait_id,
            phase = %target,
            waited_ms = tracing::field::Empty,
            outcome = tracing::field::Empty,
        );

        Self {
            span,
            start: Instant::now(),
            wait_id,
        }
    }

    #[inline]
    pub fn wait_id(&self) -> u64 {
        self.wait_id
    }

    /// Record how the wait ended ("observed", "timeout", "stopped")
    pub fn record_outcome(&self, outcome: &'static str) {
        self.span.record("outcome", outcome);
    }
}

impl Drop for WaitSpan {
    fn drop(&mut self) {
        let waited = self.start.elapsed();
        let _entered = self.span.enter();
        self.span.record("waited_ms", waited.as_millis() as u64);

        if waited > LONG_WAIT {
            info!(
                wait_id = self.wait_id,
                waited_ms = waited.as_millis() as u64,
                "long phase wait"
            );
        } else {
            debug!(
                wait_id = self.wait_id,
                waited_ms = waited.as_millis() as u64,
                "phase wait finished"
            );
        }
    }
}
