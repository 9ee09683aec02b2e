/*!
 * Event Channel
 *
 * Unbounded FIFO hand-off between producer and consumer threads.
 *
 * # Design: Single Lock + Condvar Monitor
 *
 * The queue storage sits behind one `parking_lot::Mutex`, paired with a
 * `parking_lot::Condvar`. Producers never block beyond the brief enqueue;
 * consumers park on the condvar, which releases the lock while parked and
 * reacquires it before the emptiness predicate is re-checked. Spurious
 * wakeups are therefore harmless.
 *
 * Each value is moved out by exactly one `receive`, so with several
 * consumers every value reaches exactly one of them (no broadcast).
 */

use crate::core::errors::{ChannelError, ChannelResult};
use parking_lot::{Condvar, Mutex};
use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::{Duration, Instant};

struct ChannelState<T> {
    queue: VecDeque<T>,
    closed: bool,
}

/// Thread-safe unbounded FIFO queue with blocking receive
///
/// Share between threads with `Arc<EventChannel<T>>`.
///
/// # Examples
///
/// ```
/// use traffic_signal::core::sync::EventChannel;
///
/// let channel = EventChannel::new();
/// channel.send(7u32).unwrap();
/// assert_eq!(channel.receive(), Ok(7));
/// ```
pub struct EventChannel<T> {
    state: Mutex<ChannelState<T>>,
    available: Condvar,
    waiters: AtomicUsize,
}

impl<T> EventChannel<T> {
    /// Create an empty, open channel
    pub fn new() -> Self {
        Self {
            state: Mutex::new(ChannelState {
                queue: VecDeque::new(),
                closed: false,
            }),
            available: Condvar::new(),
            waiters: AtomicUsize::new(0),
        }
    }

    /// Append a value to the tail and wake at most one blocked consumer
    ///
    /// Only fails once the channel has been closed.
    pub fn send(&self, value: T) -> ChannelResult<()> {
        {
            let mut state = self.state.lock();
            if state.closed {
                return Err(ChannelError::Closed);
            }
            state.queue.push_back(value);
        }
        self.available.notify_one();
        Ok(())
    }

    /// Block until a value is available, then move it out of the head
    ///
    /// Returns `Err(ChannelError::Closed)` only when the channel is closed
    /// and every queued value has been consumed.
    pub fn receive(&self) -> ChannelResult<T> {
        let mut state = self.state.lock();
        loop {
            if let Some(value) = state.queue.pop_front() {
                return Ok(value);
            }
            if state.closed {
                return Err(ChannelError::Closed);
            }

            self.waiters.fetch_add(1, Ordering::Relaxed);
            self.available.wait(&mut state);
            self.waiters.fetch_sub(1, Ordering::Relaxed);
        }
    }

    /// Like [`receive`](Self::receive), giving up after `timeout`
    ///
    /// A timeout too large to represent as a deadline waits without one.
    pub fn receive_timeout(&self, timeout: Duration) -> ChannelResult<T> {
        let Some(deadline) = Instant::now().checked_add(timeout) else {
            return self.receive();
        };
        let mut state = self.state.lock();
        loop {
            if let Some(value) = state.queue.pop_front() {
                return Ok(value);
            }
            if state.closed {
                return Err(ChannelError::Closed);
            }

            self.waiters.fetch_add(1, Ordering::Relaxed);
            let timed_out = self
                .available
                .wait_until(&mut state, deadline)
                .timed_out();
            self.waiters.fetch_sub(1, Ordering::Relaxed);

            // The value may have landed right at the deadline
            if timed_out {
                return state.queue.pop_front().ok_or(ChannelError::Timeout);
            }
        }
    }

    /// Non-blocking receive
    #[inline]
    pub fn try_receive(&self) -> Option<T> {
        self.state.lock().queue.pop_front()
    }

    /// Close the channel and wake every blocked consumer
    ///
    /// Values already queued stay receivable. Idempotent.
    pub fn close(&self) {
        self.state.lock().closed = true;
        self.available.notify_all();
    }

    #[inline]
    pub fn is_closed(&self) -> bool {
        self.state.lock().closed
    }

    /// Number of values waiting to be received
    #[inline]
    pub fn len(&self) -> usize {
        self.state.lock().queue.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.state.lock().queue.is_empty()
    }

    /// Approximate count of consumers parked in `receive` (for diagnostics)
    #[inline]
    pub fn waiter_count(&self) -> usize {
        self.waiters.load(Ordering::Relaxed)
    }
}

impl<T> Default for EventChannel<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> std::fmt::Debug for EventChannel<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let state = self.state.lock();
        f.debug_struct("EventChannel")
            .field("len", &state.queue.len())
            .field("closed", &state.closed)
            .field("waiters", &self.waiter_count())
            .finish()
    }
}
