/*!
 * Phase Broadcast
 * Publish-subscribe fan-out of phase changes (every subscriber sees every change)
 *
 * The shared `EventChannel` hands each phase to exactly one observer. When
 * several observers must all see each transition, they subscribe here
 * instead: each subscription owns its own unbounded flume queue.
 */

use crate::core::errors::{SignalError, SignalResult};
use crate::signal::types::{Phase, PhaseChange};
use ahash::HashMap;
use parking_lot::Mutex;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{Duration, Instant};
use tracing::debug;

pub type SubscriberId = u64;

struct BroadcastState {
    subscribers: HashMap<SubscriberId, flume::Sender<PhaseChange>>,
    closed: bool,
}

/// Fan-out hub owned by the signal
pub(crate) struct PhaseBroadcast {
    state: Mutex<BroadcastState>,
    next_id: AtomicU64,
}

impl PhaseBroadcast {
    pub fn new() -> Self {
        Self {
            state: Mutex::new(BroadcastState {
                subscribers: HashMap::default(),
                closed: false,
            }),
            next_id: AtomicU64::new(1),
        }
    }

    /// Register a subscriber; it receives changes published from now on
    ///
    /// Subscribing after `close()` yields a subscription that reports
    /// `Stopped` immediately.
    pub fn subscribe(&self) -> PhaseSubscription {
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        let (tx, rx) = flume::unbounded();

        let mut state = self.state.lock();
        if !state.closed {
            state.subscribers.insert(id, tx);
            debug!(subscriber = id, "Subscribed to phase broadcast");
        }

        PhaseSubscription { id, rx }
    }

    /// Deliver a change to every live subscriber, returning how many got it
    pub fn publish(&self, change: PhaseChange) -> usize {
        let mut state = self.state.lock();
        if state.closed {
            return 0;
        }

        // Dropped subscriptions show up as disconnected senders
        state.subscribers.retain(|id, tx| match tx.send(change) {
            Ok(()) => true,
            Err(_) => {
                debug!(subscriber = *id, "Subscriber disconnected from phase broadcast");
                false
            }
        });

        state.subscribers.len()
    }

    pub fn subscriber_count(&self) -> usize {
        self.state.lock().subscribers.len()
    }

    /// Disconnect every subscriber; queued changes remain receivable
    pub fn close(&self) {
        let mut state = self.state.lock();
        state.closed = true;
        state.subscribers.clear();
    }
}

/// Independent stream of phase changes for one subscriber
#[derive(Debug)]
pub struct PhaseSubscription {
    id: SubscriberId,
    rx: flume::Receiver<PhaseChange>,
}

impl PhaseSubscription {
    #[inline]
    pub fn id(&self) -> SubscriberId {
        self.id
    }

    /// Block until the next change
    pub fn recv(&self) -> SignalResult<PhaseChange> {
        self.rx.recv().map_err(|_| SignalError::Stopped)
    }

    pub fn recv_timeout(&self, timeout: Duration) -> SignalResult<PhaseChange> {
        let Some(deadline) = Instant::now().checked_add(timeout) else {
            return self.recv();
        };
        self.rx.recv_deadline(deadline).map_err(|e| match e {
            flume::RecvTimeoutError::Timeout => SignalError::Timeout,
            flume::RecvTimeoutError::Disconnected => SignalError::Stopped,
        })
    }

    /// Non-blocking receive
    pub fn try_recv(&self) -> Option<PhaseChange> {
        self.rx.try_recv().ok()
    }

    /// Block until this subscriber observes `phase`
    pub fn wait_for(&self, phase: Phase) -> SignalResult<PhaseChange> {
        loop {
            let change = self.recv()?;
            if change.phase == phase {
                return Ok(change);
            }
        }
    }

    /// Like [`wait_for`](Self::wait_for), giving up at the deadline
    pub fn wait_for_timeout(&self, phase: Phase, timeout: Duration) -> SignalResult<PhaseChange> {
        let Some(deadline) = Instant::now().checked_add(timeout) else {
            return self.wait_for(phase);
        };
        loop {
            let change = self
                .rx
                .recv_deadline(deadline)
                .map_err(|e| match e {
                    flume::RecvTimeoutError::Timeout => SignalError::Timeout,
                    flume::RecvTimeoutError::Disconnected => SignalError::Stopped,
                })?;
            if change.phase == phase {
                return Ok(change);
            }
        }
    }

    pub fn wait_for_green(&self) -> SignalResult<PhaseChange> {
        self.wait_for(Phase::Green)
    }

    /// Changes queued for this subscriber
    pub fn pending(&self) -> usize {
        self.rx.len()
    }
}
