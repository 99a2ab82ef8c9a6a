//! Stress tests for the locking discipline under real contention.

use runq::prelude::*;
use runq::sync::Protected;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

#[test]
#[ignore] // Run with --ignored flag
fn stress_test_mutex_exclusion() {
    let mutex = Arc::new(Mutex::new());
    let inside = Arc::new(AtomicUsize::new(0));
    let entries = Arc::new(AtomicUsize::new(0));

    let threads: Vec<_> = (0..8)
        .map(|_| {
            let mutex = Arc::clone(&mutex);
            let inside = Arc::clone(&inside);
            let entries = Arc::clone(&entries);
            Thread::spawn(move || {
                for _ in 0..10_000 {
                    if let Some(_lock) = Lock::try_new(&mutex) {
                        assert_eq!(inside.fetch_add(1, Ordering::SeqCst), 0);
                        entries.fetch_add(1, Ordering::Relaxed);
                        inside.fetch_sub(1, Ordering::SeqCst);
                    }
                }
            })
            .unwrap()
        })
        .collect();

    for thread in threads {
        thread.join().unwrap();
    }

    assert!(!mutex.is_locked());
    assert!(entries.load(Ordering::Relaxed) > 0);
}

#[test]
#[ignore]
fn stress_test_shared_heap() {
    let heap = Arc::new(Protected::new(BinaryHeap::<u64, u64>::new(HeapOrder::Max)));

    let producers: Vec<_> = (0..4u64)
        .map(|t| {
            let heap = Arc::clone(&heap);
            Thread::spawn(move || {
                for i in 0..2_500u64 {
                    loop {
                        if let Some(mut h) = heap.get_with_backoff(256) {
                            h.enqueue(t * 10_000 + i, i);
                            break;
                        }
                    }
                }
            })
            .unwrap()
        })
        .collect();

    for producer in producers {
        producer.join().unwrap();
    }

    let mut h = heap.try_get().unwrap();
    assert_eq!(h.len(), 10_000);
    assert!(h.is_heap());

    let mut last = u64::MAX;
    while let Ok((priority, _)) = h.dequeue_with_priority() {
        assert!(priority <= last);
        last = priority;
    }
}

#[test]
#[ignore]
fn stress_test_many_tasks_across_threads() {
    let total = Arc::new(AtomicUsize::new(0));
    let queue = Arc::new(ReadyQueue::new().shared());

    {
        let mut q = queue.try_get().unwrap();
        for _ in 0..5_000 {
            let total = Arc::clone(&total);
            q.push(
                Task::new(move || {
                    total.fetch_add(1, Ordering::Relaxed);
                }),
                Priority::Normal,
            );
        }
    }

    let workers: Vec<_> = (0..runq::executor::max_threads().min(8))
        .map(|_| {
            let queue = Arc::clone(&queue);
            Thread::spawn(move || loop {
                let next = match queue.get_with_backoff(1_000) {
                    Some(mut q) => q.pop(),
                    None => continue,
                };
                match next {
                    Ok(mut task) => {
                        task.execute();
                    }
                    Err(_) => break,
                }
            })
            .unwrap()
        })
        .collect();

    for worker in workers {
        worker.join().unwrap();
    }

    assert_eq!(total.load(Ordering::Relaxed), 5_000);
}
