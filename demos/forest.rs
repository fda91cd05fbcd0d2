//! Example: training a forest of decision stumps on both executors.
//!
//! Every stump is fitted on its own bootstrap sample and submitted as an
//! independent task. The forest then predicts by majority vote.
//!
//! ```text
//! cargo run --example forest -- 200 4 8 2
//! ```
//!
//! Arguments: `trees threads threshold threshold_balance`.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tracing_subscriber::EnvFilter;
use workpool::{Executor, TaskFuture};

use std::env;
use std::sync::Arc;
use std::time::Instant;

const FEATURES: usize = 8;
const ROWS: usize = 4_000;

/// A one-level decision tree.
#[derive(Debug, Clone, Copy)]
struct Stump {
    feature: usize,
    split: f64,
    below: bool,
}

impl Stump {
    fn predict(&self, row: &[f64]) -> bool {
        if row[self.feature] < self.split {
            self.below
        } else {
            !self.below
        }
    }

    /// Picks the feature and split that misclassify the fewest sampled rows.
    fn fit(data: &[(Vec<f64>, bool)], seed: u64) -> Self {
        let mut rng = StdRng::seed_from_u64(seed);
        let sample: Vec<_> = (0..data.len())
            .map(|_| &data[rng.gen_range(0..data.len())])
            .collect();

        let mut best = (usize::MAX, Stump { feature: 0, split: 0.0, below: true });
        for feature in 0..FEATURES {
            for step in 1..20 {
                let split = step as f64 / 20.0;
                for below in [true, false] {
                    let stump = Stump { feature, split, below };
                    let errors = sample
                        .iter()
                        .filter(|(row, label)| stump.predict(row) != *label)
                        .count();
                    if errors < best.0 {
                        best = (errors, stump);
                    }
                }
            }
        }
        best.1
    }
}

fn synthetic(seed: u64) -> Vec<(Vec<f64>, bool)> {
    let mut rng = StdRng::seed_from_u64(seed);
    (0..ROWS)
        .map(|_| {
            let row: Vec<f64> = (0..FEATURES).map(|_| rng.r#gen::<f64>()).collect();
            let label = row[2] + 0.3 * row[5] > 0.65;
            (row, label)
        })
        .collect()
}

fn accuracy(forest: &[Stump], data: &[(Vec<f64>, bool)]) -> f64 {
    let correct = data
        .iter()
        .filter(|(row, label)| {
            let votes = forest.iter().filter(|s| s.predict(row)).count();
            (votes * 2 > forest.len()) == *label
        })
        .count();
    correct as f64 / data.len() as f64
}

fn train(name: &str, executor: Executor, trees: u64, data: &Arc<Vec<(Vec<f64>, bool)>>) {
    let start = Instant::now();

    let futures: Vec<TaskFuture<Stump>> = (0..trees)
        .map(|seed| {
            let data = data.clone();
            executor
                .submit(move || Stump::fit(&data, seed))
                .expect("executor is running")
        })
        .collect();
    let forest: Vec<Stump> = futures.iter().map(|f| *f.get()).collect();

    let elapsed = start.elapsed();
    executor.shutdown();

    println!(
        "{name:<14} trees={trees} accuracy={:.3} time={elapsed:.2?} stats={:?}",
        accuracy(&forest, data),
        executor.stats()
    );
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let args: Vec<usize> = env::args()
        .skip(1)
        .map(|arg| arg.parse().expect("arguments must be positive integers"))
        .collect();
    let arg = |i: usize, default: usize| args.get(i).copied().unwrap_or(default);

    let (trees, threads, threshold, threshold_balance) = (arg(0, 200), arg(1, 4), arg(2, 8), arg(3, 2));
    let data = Arc::new(synthetic(42));

    let stealing = Executor::work_stealing(threads, threshold).expect("valid configuration");
    train("work-stealing", stealing, trees as u64, &data);

    let balancing = Executor::work_balancing(threads, threshold, threshold_balance)
        .expect("valid configuration");
    train("work-balancing", balancing, trees as u64, &data);
}
