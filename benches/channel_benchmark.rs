/*!
 * Event Channel Benchmarks
 *
 * Hand-off latency and throughput of the blocking FIFO channel
 */

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use std::sync::Arc;
use std::thread;
use traffic_signal::{EventChannel, Phase};

fn bench_handoff_latency(c: &mut Criterion) {
    c.bench_function("handoff_latency", |b| {
        let channel = Arc::new(EventChannel::<Phase>::new());

        b.iter(|| {
            let channel_clone = channel.clone();
            let handle = thread::spawn(move || channel_clone.receive());

            channel.send(black_box(Phase::Green)).ok();
            handle.join().ok();
        });
    });
}

fn bench_throughput(c: &mut Criterion) {
    let mut group = c.benchmark_group("throughput");

    for consumers in [1usize, 2, 4] {
        group.bench_with_input(
            BenchmarkId::from_parameter(consumers),
            &consumers,
            |b, &consumers| {
                b.iter(|| {
                    let channel = Arc::new(EventChannel::<u64>::new());

                    let handles: Vec<_> = (0..consumers)
                        .map(|_| {
                            let channel_clone = channel.clone();
                            thread::spawn(move || {
                                let mut n = 0u64;
                                while channel_clone.receive().is_ok() {
                                    n += 1;
                                }
                                n
                            })
                        })
                        .collect();

                    for i in 0..1_000u64 {
                        channel.send(black_box(i)).ok();
                    }
                    channel.close();

                    let total: u64 = handles.into_iter().filter_map(|h| h.join().ok()).sum();
                    assert_eq!(total, 1_000);
                });
            },
        );
    }

    group.finish();
}

fn bench_try_receive_empty(c: &mut Criterion) {
    let channel = EventChannel::<Phase>::new();
    c.bench_function("try_receive_empty", |b| {
        b.iter(|| black_box(channel.try_receive()));
    });
}

criterion_group!(
    benches,
    bench_handoff_latency,
    bench_throughput,
    bench_try_receive_empty
);
criterion_main!(benches);
