use workpool::{Executor, ExecutorBuilder, ExecutorError};

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::thread;
use std::time::{Duration, Instant};

fn both(capacity: usize, threshold: usize) -> Vec<Executor> {
    vec![
        Executor::work_stealing(capacity, threshold).unwrap(),
        Executor::work_balancing(capacity, threshold, 1).unwrap(),
    ]
}

#[test]
fn test_shutdown_does_not_block() {
    for executor in both(2, 2) {
        let slow = executor
            .submit(|| thread::sleep(Duration::from_millis(300)))
            .unwrap();

        let start = Instant::now();
        executor.shutdown();
        assert!(start.elapsed() < Duration::from_millis(100));

        // Accepted work still runs.
        slow.get();
    }
}

#[test]
fn test_submit_after_shutdown_is_rejected() {
    for executor in both(2, 2) {
        executor.shutdown();
        executor.shutdown();

        assert!(executor.is_shutdown());
        assert!(matches!(executor.submit(|| 1), Err(ExecutorError::ShutDown)));
    }
}

#[test_log::test]
fn test_workers_exit_after_shutdown() {
    for mut executor in both(4, 2) {
        let futures: Vec<_> = (0..20)
            .map(|i| executor.submit(move || i).unwrap())
            .collect();
        for future in &futures {
            future.get();
        }

        let last = Instant::now();
        executor.shutdown();
        executor.join();

        assert!(last.elapsed() < Duration::from_secs(1));
        assert_eq!(executor.live_workers(), 0);
    }
}

#[test]
fn test_idle_executor_shuts_down_promptly() {
    let mut executor = ExecutorBuilder::new()
        .capacity(4)
        .max_backoff(Duration::from_secs(5))
        .build()
        .unwrap();

    thread::sleep(Duration::from_millis(50));
    assert_eq!(executor.live_workers(), 4);

    let start = Instant::now();
    executor.shutdown();
    executor.join();

    // Parked workers are woken instead of sleeping out their backoff.
    assert!(start.elapsed() < Duration::from_secs(1));
}

#[test]
fn test_drop_runs_accepted_tasks() {
    for executor in both(3, 4) {
        let counter = Arc::new(AtomicUsize::new(0));

        for _ in 0..200 {
            let counter = counter.clone();
            executor
                .submit(move || {
                    counter.fetch_add(1, Ordering::SeqCst);
                })
                .unwrap();
        }

        drop(executor);
        assert_eq!(counter.load(Ordering::SeqCst), 200);
    }
}

#[test]
fn test_invalid_configuration() {
    assert!(matches!(
        Executor::work_stealing(0, 1),
        Err(ExecutorError::InvalidConfig(_))
    ));
    assert!(matches!(
        Executor::work_balancing(2, 0, 1),
        Err(ExecutorError::InvalidConfig(_))
    ));
}
