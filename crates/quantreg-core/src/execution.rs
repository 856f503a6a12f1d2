//! Execution strategy for independent per-quantile work
//!
//! Fits for different quantile levels share read-only inputs and write
//! disjoint outputs, so they can run on a rayon pool. Results always come
//! back in input order regardless of strategy.

use serde::{Deserialize, Serialize};

/// Execution strategy for batch operations
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum ExecutionStrategy {
    /// Process items one after another on the calling thread
    #[default]
    Sequential,
    /// Process items on the rayon pool (falls back to sequential without the
    /// `parallel` feature)
    Parallel,
}

impl ExecutionStrategy {
    /// Whether this strategy will actually use more than one thread
    pub fn is_parallel(&self) -> bool {
        cfg!(feature = "parallel") && matches!(self, Self::Parallel)
    }

    /// Run `f(0..count)` and collect results in index order
    pub fn execute_batch<F, R>(&self, count: usize, f: F) -> Vec<R>
    where
        F: Fn(usize) -> R + Sync + Send,
        R: Send,
    {
        if self.is_parallel() {
            return parallel_batch(count, f);
        }
        (0..count).map(f).collect()
    }
}

#[cfg(feature = "parallel")]
fn parallel_batch<F, R>(count: usize, f: F) -> Vec<R>
where
    F: Fn(usize) -> R + Sync + Send,
    R: Send,
{
    use rayon::prelude::*;
    tracing::trace!(count, threads = rayon::current_num_threads(), "parallel batch");
    (0..count).into_par_iter().map(f).collect()
}

#[cfg(not(feature = "parallel"))]
fn parallel_batch<F, R>(count: usize, f: F) -> Vec<R>
where
    F: Fn(usize) -> R + Sync + Send,
    R: Send,
{
    (0..count).map(f).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sequential_order() {
        let out = ExecutionStrategy::Sequential.execute_batch(5, |i| i * i);
        assert_eq!(out, vec![0, 1, 4, 9, 16]);
        assert!(!ExecutionStrategy::Sequential.is_parallel());
    }

    #[test]
    fn test_parallel_preserves_order() {
        let out = ExecutionStrategy::Parallel.execute_batch(100, |i| i as f64 * 0.5);
        let expected: Vec<f64> = (0..100).map(|i| i as f64 * 0.5).collect();
        assert_eq!(out, expected);
        assert_eq!(
            ExecutionStrategy::Parallel.is_parallel(),
            cfg!(feature = "parallel")
        );
    }

    #[test]
    fn test_empty_batch() {
        let out: Vec<usize> = ExecutionStrategy::Parallel.execute_batch(0, |i| i);
        assert!(out.is_empty());
    }
}
