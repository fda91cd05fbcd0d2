use workpool::{Executor, ExecutorError, Runnable, current_worker};

use std::collections::HashSet;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::thread;
use std::time::{Duration, Instant};

struct Record {
    seen: Arc<Mutex<Vec<usize>>>,
    value: usize,
}

impl Runnable for Record {
    fn run(self) {
        self.seen.lock().unwrap().push(self.value);
    }
}

#[test_log::test]
fn test_results_match_submitted_indices() {
    let mut executor = Executor::work_stealing(4, 2).unwrap();

    let futures: Vec<_> = (0..10)
        .map(|i| executor.submit(move || i).unwrap())
        .collect();

    let mut results: Vec<usize> = futures.iter().map(|f| *f.get()).collect();
    results.sort_unstable();
    assert_eq!(results, (0..10).collect::<Vec<_>>());

    let done = Instant::now();
    executor.shutdown();
    executor.join();

    assert!(done.elapsed() < Duration::from_secs(1));
    assert_eq!(executor.live_workers(), 0);
}

#[test]
fn test_each_task_runs_exactly_once() {
    let executor = Executor::work_stealing(8, 3).unwrap();
    let counter = Arc::new(AtomicUsize::new(0));

    let futures: Vec<_> = (0..1_000)
        .map(|_| {
            let counter = counter.clone();
            executor
                .submit(move || counter.fetch_add(1, Ordering::SeqCst))
                .unwrap()
        })
        .collect();

    let tickets: HashSet<usize> = futures.iter().map(|f| *f.get()).collect();

    assert_eq!(counter.load(Ordering::SeqCst), 1_000);
    assert_eq!(tickets.len(), 1_000);
}

#[test]
fn test_runnable_tasks() {
    let executor = Executor::work_stealing(3, 1).unwrap();
    let seen = Arc::new(Mutex::new(Vec::new()));

    let futures: Vec<_> = (0..20)
        .map(|value| {
            executor
                .execute(Record {
                    seen: seen.clone(),
                    value,
                })
                .unwrap()
        })
        .collect();

    for future in &futures {
        assert!(future.result().is_ok());
    }

    let mut seen = seen.lock().unwrap().clone();
    seen.sort_unstable();
    assert_eq!(seen, (0..20).collect::<Vec<_>>());
}

#[test]
fn test_single_worker() {
    let executor = Executor::work_stealing(1, 1).unwrap();

    let futures: Vec<_> = (0..50u64)
        .map(|i| executor.submit(move || i * 2).unwrap())
        .collect();

    let sum: u64 = futures.iter().map(|f| *f.get()).sum();
    assert_eq!(sum, 2_450);
}

#[test]
fn test_tasks_run_on_worker_threads() {
    let executor = Executor::work_stealing(4, 2).unwrap();

    let futures: Vec<_> = (0..16)
        .map(|_| executor.submit(current_worker).unwrap())
        .collect();

    for future in futures {
        assert!(matches!(*future.get(), Some(id) if id < 4));
    }
}

#[test]
fn test_nested_submission() {
    let executor = Arc::new(Executor::work_stealing(4, 2).unwrap());

    let outer = {
        let inner_executor = executor.clone();
        executor
            .submit(move || {
                let inner: Vec<_> = (0..5)
                    .map(|i| inner_executor.submit(move || i + 1).unwrap())
                    .collect();
                inner.iter().map(|f| *f.get()).sum::<i32>()
            })
            .unwrap()
    };

    assert_eq!(*outer.get(), 15);
}

#[test]
fn test_idle_workers_pick_up_long_tasks() {
    let executor = Executor::work_stealing(4, 8).unwrap();
    let start = Instant::now();

    let futures: Vec<_> = (0..8)
        .map(|_| {
            executor
                .submit(|| thread::sleep(Duration::from_millis(100)))
                .unwrap()
        })
        .collect();

    for future in &futures {
        future.get();
    }

    // Serial execution would take 800ms.
    assert!(start.elapsed() < Duration::from_millis(700));
}

#[test_log::test]
fn test_panicking_task_keeps_worker_alive() {
    let mut executor = Executor::work_stealing(1, 4).unwrap();

    let bad = executor.submit(|| -> u32 { panic!("bad task") }).unwrap();
    let good = executor.submit(|| 7u32).unwrap();

    let err = bad.result().unwrap_err();
    assert!(matches!(err, ExecutorError::TaskPanicked { ref message, .. } if message == "bad task"));
    assert_eq!(*good.get(), 7);

    executor.shutdown();
    executor.join();

    let stats = executor.stats();
    assert_eq!(stats.executed, 2);
    assert_eq!(stats.panicked, 1);
}

#[test]
fn test_stats_after_join() {
    let mut executor = Executor::work_stealing(2, 5).unwrap();

    let futures: Vec<_> = (0..40)
        .map(|i| executor.submit(move || i).unwrap())
        .collect();
    for future in &futures {
        future.get();
    }

    executor.shutdown();
    executor.join();

    let stats = executor.stats();
    assert_eq!(stats.submitted, 40);
    assert_eq!(stats.executed, 40);
    assert_eq!(stats.pending(), 0);
    assert_eq!(stats.rebalances, 0);
    assert_eq!(stats.acquired, 40);
    assert_eq!(executor.queued(), 0);
}
