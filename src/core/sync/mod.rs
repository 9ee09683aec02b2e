/*!
 * Synchronization Primitives
 *
 * Blocking hand-off primitives shared by the signal and its observers:
 * - `EventChannel`: unbounded FIFO with condvar-based blocking receive
 *
 * # Use Cases
 *
 * - **Phase publication**: cycling thread hands phases to observers
 * - **Generic hand-off**: any `T` moved between threads exactly once
 */

mod channel;

pub use channel::EventChannel;
