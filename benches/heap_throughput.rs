//! Benchmarks for heap enqueue/dequeue and ready-queue dispatch

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use runq::prelude::*;

fn bench_enqueue_dequeue(c: &mut Criterion) {
    let mut group = c.benchmark_group("heap_enqueue_dequeue");

    for &size in &[100usize, 1_000, 10_000] {
        group.bench_with_input(BenchmarkId::from_parameter(size), &size, |b, &size| {
            b.iter(|| {
                let mut heap = BinaryHeap::with_capacity(HeapOrder::Max, size);
                for i in 0..size {
                    // Scatter priorities so sifts do real work.
                    let priority = (i as u32).wrapping_mul(2_654_435_761);
                    heap.enqueue(i, priority);
                }
                while let Ok(v) = heap.dequeue() {
                    black_box(v);
                }
            });
        });
    }

    group.finish();
}

fn bench_std_heap_baseline(c: &mut Criterion) {
    c.bench_function("std_binary_heap_10000", |b| {
        b.iter(|| {
            let mut heap = std::collections::BinaryHeap::with_capacity(10_000);
            for i in 0..10_000usize {
                heap.push(((i as u32).wrapping_mul(2_654_435_761), i));
            }
            while let Some(v) = heap.pop() {
                black_box(v);
            }
        });
    });
}

fn bench_ready_queue_dispatch(c: &mut Criterion) {
    c.bench_function("ready_queue_run_1000", |b| {
        b.iter(|| {
            let mut queue = ReadyQueue::with_capacity(1_000);
            for i in 0..1_000u32 {
                let priority = match i % 5 {
                    0 => Priority::Realtime,
                    1 => Priority::High,
                    2 => Priority::Normal,
                    3 => Priority::Low,
                    _ => Priority::Background,
                };
                queue.push(Task::new(move || black_box(i) * 2), priority);
            }
            while let Ok(task) = queue.run_next() {
                black_box(task);
            }
        });
    });
}

fn bench_lock_uncontended(c: &mut Criterion) {
    let mutex = Mutex::new();
    c.bench_function("lock_scope_uncontended", |b| {
        b.iter(|| {
            let lock = Lock::new(&mutex);
            black_box(lock.acquired());
        });
    });
}

criterion_group!(
    benches,
    bench_enqueue_dequeue,
    bench_std_heap_baseline,
    bench_ready_queue_dispatch,
    bench_lock_uncontended
);
criterion_main!(benches);
