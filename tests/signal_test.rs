/*!
 * Traffic Signal Integration Tests
 *
 * Real-time cycling with the default [4000, 6000] ms range plus scaled-down
 * scenarios driven by deterministic interval sources
 */

use pretty_assertions::assert_eq;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant};
use traffic_signal::{Phase, SequenceInterval, SignalConfig, SignalError, TrafficSignal};

/// Scheduling slack tolerated on top of the configured interval
const JITTER: Duration = Duration::from_millis(50);

fn sequenced(intervals: &[u64]) -> Arc<TrafficSignal> {
    let source = SequenceInterval::new(intervals.iter().map(|ms| Duration::from_millis(*ms)));
    Arc::new(TrafficSignal::with_interval_source(SignalConfig::fast(), source).unwrap())
}

#[test]
fn test_fresh_signal_is_red() {
    let signal = TrafficSignal::new();
    assert_eq!(signal.current_phase(), Phase::Red);

    // Sampling repeatedly without start() never changes anything
    for _ in 0..10 {
        thread::sleep(Duration::from_millis(5));
        assert_eq!(signal.current_phase(), Phase::Red);
    }
}

#[test]
fn test_wait_for_green_within_one_interval() {
    let signal = TrafficSignal::new();
    signal.start().unwrap();

    let start = Instant::now();
    signal.wait_for_green().unwrap();
    let elapsed = start.elapsed();

    assert!(
        elapsed < Duration::from_millis(6100),
        "waited {:?} for green",
        elapsed
    );
    assert!(elapsed >= Duration::from_millis(3950), "green came too early: {:?}", elapsed);
    assert_eq!(signal.current_phase(), Phase::Green);

    signal.shutdown().unwrap();
}

#[test]
fn test_default_transitions_respect_interval_range() {
    let signal = TrafficSignal::new();
    let subscription = signal.subscribe();
    let started = Instant::now();
    signal.start().unwrap();

    let changes: Vec<_> = (0..3)
        .map(|_| subscription.recv_timeout(Duration::from_secs(7)).unwrap())
        .collect();
    signal.shutdown().unwrap();

    let phases: Vec<Phase> = changes.iter().map(|c| c.phase).collect();
    assert_eq!(phases, vec![Phase::Green, Phase::Red, Phase::Green]);
    assert_eq!(
        changes.iter().map(|c| c.sequence).collect::<Vec<_>>(),
        vec![1, 2, 3]
    );

    let min = Duration::from_millis(4000);
    let max = Duration::from_millis(6000) + JITTER;

    let first = changes[0].at.duration_since(started);
    assert!(first >= min && first <= max, "first interval {:?}", first);

    for pair in changes.windows(2) {
        let interval = pair[1].at.duration_since(pair[0].at);
        assert!(
            interval >= min && interval <= max,
            "interval {:?} outside [{:?}, {:?}]",
            interval,
            min,
            max
        );
    }
}

#[test]
fn test_intervals_follow_injected_sequence() {
    let signal = sequenced(&[60, 120, 90]);
    let subscription = signal.subscribe();
    signal.start().unwrap();

    let changes: Vec<_> = (0..4)
        .map(|_| subscription.recv_timeout(Duration::from_secs(2)).unwrap())
        .collect();
    signal.shutdown().unwrap();

    // Thresholds drawn after each transition: 120, 90, 60
    let expected = [120u64, 90, 60];
    for (pair, want) in changes.windows(2).zip(expected) {
        let interval = pair[1].at.duration_since(pair[0].at);
        let want = Duration::from_millis(want);
        assert!(
            interval >= want && interval <= want + JITTER,
            "interval {:?}, expected ~{:?}",
            interval,
            want
        );
    }
}

#[test]
fn test_sampled_phase_flips_after_start() {
    let signal = sequenced(&[40]);
    signal.start().unwrap();

    // Poll the phase the way a passive reader would, without consuming events
    let deadline = Instant::now() + Duration::from_millis(400);
    let mut last = signal.current_phase();
    let mut flips = 0;
    let mut seen_green = false;
    while Instant::now() < deadline {
        let phase = signal.current_phase();
        if phase != last {
            assert_eq!(phase, last.toggled());
            flips += 1;
            last = phase;
        }
        seen_green |= phase.is_green();
        thread::sleep(Duration::from_millis(1));
    }
    signal.shutdown().unwrap();

    assert!(seen_green);
    assert!(flips >= 2, "observed only {} flips", flips);
}

#[test]
fn test_phase_alternates_on_shared_channel() {
    let signal = sequenced(&[15]);
    signal.start().unwrap();

    let subscription = signal.subscribe();
    let mut previous = None;
    for _ in 0..6 {
        let change = subscription.recv_timeout(Duration::from_secs(1)).unwrap();
        if let Some(prev) = previous {
            assert_eq!(change.phase, Phase::toggled(prev));
        }
        previous = Some(change.phase);
    }
    signal.shutdown().unwrap();

    // Every transition was also queued on the shared channel
    assert!(signal.pending_events() as u64 <= signal.transitions());
    assert!(signal.transitions() >= 6);
}

#[test]
fn test_two_observers_both_return() {
    let signal = sequenced(&[100]);
    signal.start().unwrap();

    let returned = Arc::new(AtomicUsize::new(0));
    let observers: Vec<_> = (0..2)
        .map(|_| {
            let signal = signal.clone();
            let returned = returned.clone();
            thread::spawn(move || {
                signal.wait_for_green_timeout(Duration::from_secs(3))?;
                returned.fetch_add(1, Ordering::SeqCst);
                Ok::<(), SignalError>(())
            })
        })
        .collect();

    for observer in observers {
        observer.join().unwrap().unwrap();
    }
    assert_eq!(returned.load(Ordering::SeqCst), 2);

    // The shared channel needs a distinct green per observer
    assert!(signal.transitions() >= 3);
    signal.shutdown().unwrap();
}

#[test]
fn test_single_green_satisfies_only_one_observer() {
    // One long first interval, then effectively never again
    let signal = sequenced(&[50, 60_000]);
    signal.start().unwrap();

    let observers: Vec<_> = (0..2)
        .map(|_| {
            let signal = signal.clone();
            thread::spawn(move || signal.wait_for_green_timeout(Duration::from_millis(600)))
        })
        .collect();

    let results: Vec<_> = observers.into_iter().map(|o| o.join().unwrap()).collect();
    let satisfied = results.iter().filter(|r| r.is_ok()).count();
    let timed_out = results
        .iter()
        .filter(|r| **r == Err(SignalError::Timeout))
        .count();

    assert_eq!(satisfied, 1);
    assert_eq!(timed_out, 1);
    signal.shutdown().unwrap();
}

#[test]
fn test_broadcast_reaches_every_subscriber() {
    let signal = sequenced(&[40]);
    let subscriptions: Vec<_> = (0..3).map(|_| signal.subscribe()).collect();
    signal.start().unwrap();

    let greens: Vec<_> = subscriptions
        .iter()
        .map(|s| s.wait_for_timeout(Phase::Green, Duration::from_secs(1)).unwrap())
        .collect();
    signal.shutdown().unwrap();

    // Same first green event for everybody
    assert!(greens.iter().all(|g| g.sequence == 1));
    assert!(greens.iter().all(|g| g.at == greens[0].at));
}

#[test]
fn test_shutdown_releases_blocked_observer() {
    let signal = sequenced(&[60_000]);
    signal.start().unwrap();

    let observer = {
        let signal = signal.clone();
        thread::spawn(move || signal.wait_for_green())
    };
    let subscription = signal.subscribe();

    thread::sleep(Duration::from_millis(100));
    let start = Instant::now();
    signal.shutdown().unwrap();

    assert_eq!(observer.join().unwrap(), Err(SignalError::Stopped));
    assert_eq!(subscription.recv(), Err(SignalError::Stopped));
    assert!(start.elapsed() < Duration::from_millis(500));
    assert!(!signal.is_running());
    assert_eq!(signal.current_phase(), Phase::Red);
}

#[test]
fn test_drop_stops_cycle_thread() {
    let signal = TrafficSignal::with_interval_source(
        SignalConfig::fast(),
        SequenceInterval::constant(Duration::from_millis(5)),
    )
    .unwrap();
    let subscription = signal.subscribe();
    signal.start().unwrap();
    subscription.recv_timeout(Duration::from_secs(1)).unwrap();

    let start = Instant::now();
    drop(signal);
    assert!(start.elapsed() < Duration::from_millis(500));

    // Cycle thread is gone: nothing new arrives after the queued backlog
    while subscription.try_recv().is_some() {}
    thread::sleep(Duration::from_millis(50));
    assert!(subscription.try_recv().is_none());
}
