//! Minimizer interface and fixed-step subgradient descent
//!
//! Solvers describe their objective through [`SubgradientObjective`] and hand
//! it to a [`Minimizer`]. The only minimizer provided is
//! [`SubgradientDescent`], an approximate method: it stops on a small
//! subgradient or at the iteration cap and returns its last iterate either
//! way. It does not reach the exact vertex solution of the piecewise-linear
//! problem and can oscillate near kinks.
//!
//! Barrier bookkeeping lives in a [`BarrierPolicy`] so a barrier-aware update
//! rule can replace the inert default without touching the solvers.

use quantreg_core::SolverConfig;
use tracing::debug;

/// An objective exposing a subgradient at any parameter vector
pub trait SubgradientObjective {
    /// Number of parameters
    fn dim(&self) -> usize;

    /// Write a subgradient at `params` into `grad` (length `dim()`)
    fn subgradient(&self, params: &[f64], grad: &mut [f64]);
}

/// Pluggable minimization back-end
pub trait Minimizer {
    /// Minimize `objective` starting from `x0`
    fn minimize<O: SubgradientObjective + ?Sized>(&self, objective: &O, x0: &[f64]) -> Minimum;
}

/// Outcome of a minimization run
#[derive(Debug, Clone, PartialEq)]
pub struct Minimum {
    /// Final iterate
    pub params: Vec<f64>,
    /// Number of parameter updates taken
    pub iterations: usize,
    /// Whether the subgradient tolerance was met before the cap
    pub converged: bool,
    /// Largest absolute subgradient component at the last evaluation
    pub max_gradient: f64,
    /// Barrier state at termination, if the policy tracks one
    pub barrier: Option<BarrierState>,
}

/// Barrier coefficient and its per-iteration growth factor
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BarrierState {
    /// Barrier coefficient t
    pub coefficient: f64,
    /// Growth factor μ applied once per iteration
    pub growth: f64,
}

/// Strategy for barrier tracking inside the descent loop
pub trait BarrierPolicy: Send + Sync {
    /// State at the start of a run, `None` when no barrier is tracked
    fn initial_state(&self) -> Option<BarrierState>;

    /// Hook to fold a barrier term into the subgradient before the
    /// convergence check
    fn adjust_gradient(&self, _state: &BarrierState, _params: &[f64], _grad: &mut [f64]) {}

    /// Advance the state after a parameter update
    fn advance(&self, state: &mut BarrierState) {
        state.coefficient *= state.growth;
    }
}

/// No barrier state at all
#[derive(Debug, Clone, Copy, Default)]
pub struct NoBarrier;

impl BarrierPolicy for NoBarrier {
    fn initial_state(&self) -> Option<BarrierState> {
        None
    }
}

/// Tracks t ← t·μ every iteration without touching the update
#[derive(Debug, Clone, Copy)]
pub struct InertBarrier {
    pub initial_coefficient: f64,
    pub growth: f64,
}

impl Default for InertBarrier {
    fn default() -> Self {
        Self {
            initial_coefficient: 1.0,
            growth: 10.0,
        }
    }
}

impl BarrierPolicy for InertBarrier {
    fn initial_state(&self) -> Option<BarrierState> {
        Some(BarrierState {
            coefficient: self.initial_coefficient,
            growth: self.growth,
        })
    }
}

/// Fixed-step subgradient descent
#[derive(Debug, Clone)]
pub struct SubgradientDescent<B: BarrierPolicy = NoBarrier> {
    config: SolverConfig,
    barrier: B,
}

impl SubgradientDescent<NoBarrier> {
    /// Create a descent without barrier tracking
    pub fn new(config: SolverConfig) -> Self {
        Self {
            config,
            barrier: NoBarrier,
        }
    }
}

impl<B: BarrierPolicy> SubgradientDescent<B> {
    /// Create a descent with the given barrier policy
    pub fn with_barrier(config: SolverConfig, barrier: B) -> Self {
        Self { config, barrier }
    }

    /// The solver configuration
    pub fn config(&self) -> &SolverConfig {
        &self.config
    }
}

impl<B: BarrierPolicy> Minimizer for SubgradientDescent<B> {
    fn minimize<O: SubgradientObjective + ?Sized>(&self, objective: &O, x0: &[f64]) -> Minimum {
        let p = objective.dim();
        debug_assert_eq!(x0.len(), p);

        let mut params = x0.to_vec();
        let mut grad = vec![0.0; p];
        let mut barrier = self.barrier.initial_state();
        let mut max_gradient = f64::INFINITY;
        let mut iterations = 0;
        let mut converged = false;

        while iterations < self.config.max_iterations {
            objective.subgradient(&params, &mut grad);
            if let Some(state) = &barrier {
                self.barrier.adjust_gradient(state, &params, &mut grad);
            }

            max_gradient = grad.iter().fold(0.0_f64, |m, g| m.max(g.abs()));
            if max_gradient < self.config.tolerance {
                converged = true;
                break;
            }

            for (b, g) in params.iter_mut().zip(&grad) {
                *b -= self.config.step_size * g;
            }
            if let Some(state) = barrier.as_mut() {
                self.barrier.advance(state);
            }
            iterations += 1;
        }

        debug!(
            iterations,
            converged,
            max_gradient,
            "subgradient descent finished"
        );

        Minimum {
            params,
            iterations,
            converged,
            max_gradient,
            barrier,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    /// f(x) = Σ |x_j − c_j|, subgradient sign(x_j − c_j) with sign(0) = 0
    struct L1Distance {
        center: Vec<f64>,
    }

    impl SubgradientObjective for L1Distance {
        fn dim(&self) -> usize {
            self.center.len()
        }

        fn subgradient(&self, params: &[f64], grad: &mut [f64]) {
            for ((g, &x), &c) in grad.iter_mut().zip(params).zip(&self.center) {
                *g = if x > c {
                    1.0
                } else if x < c {
                    -1.0
                } else {
                    0.0
                };
            }
        }
    }

    /// Constant zero gradient
    struct Flat;

    impl SubgradientObjective for Flat {
        fn dim(&self) -> usize {
            2
        }

        fn subgradient(&self, _params: &[f64], grad: &mut [f64]) {
            grad.fill(0.0);
        }
    }

    #[test]
    fn test_converges_immediately_on_zero_gradient() {
        let result = SubgradientDescent::new(SolverConfig::default()).minimize(&Flat, &[3.0, 4.0]);
        assert!(result.converged);
        assert_eq!(result.iterations, 0);
        assert_eq!(result.params, vec![3.0, 4.0]);
        assert_eq!(result.max_gradient, 0.0);
        assert!(result.barrier.is_none());
    }

    #[test]
    fn test_hits_iteration_cap_without_error() {
        let config = SolverConfig::default().with_max_iterations(25);
        let objective = L1Distance {
            center: vec![100.0],
        };
        let result = SubgradientDescent::new(config).minimize(&objective, &[0.0]);
        assert!(!result.converged);
        assert_eq!(result.iterations, 25);
        assert_relative_eq!(result.params[0], 0.25, epsilon = 1e-12);
        assert_eq!(result.max_gradient, 1.0);
    }

    #[test]
    fn test_oscillates_near_kink() {
        // Fixed steps cannot land on a center that is not a multiple of the step
        let objective = L1Distance {
            center: vec![0.123],
        };
        let result = SubgradientDescent::new(SolverConfig::default()).minimize(&objective, &[0.0]);
        assert!(!result.converged);
        assert!((result.params[0] - 0.123).abs() <= 0.01 + 1e-12);
    }

    #[test]
    fn test_inert_barrier_tracks_without_affecting_update() {
        let config = SolverConfig::default().with_max_iterations(3);
        let objective = L1Distance {
            center: vec![1.0, -1.0],
        };

        let plain = SubgradientDescent::new(config).minimize(&objective, &[0.0, 0.0]);
        let tracked = SubgradientDescent::with_barrier(config, InertBarrier::default())
            .minimize(&objective, &[0.0, 0.0]);

        assert_eq!(plain.params, tracked.params);
        let state = tracked.barrier.unwrap();
        assert_relative_eq!(state.coefficient, 1000.0);
        assert_eq!(state.growth, 10.0);
    }

    #[test]
    fn test_custom_barrier_can_change_the_step() {
        struct DoubleStep;

        impl BarrierPolicy for DoubleStep {
            fn initial_state(&self) -> Option<BarrierState> {
                Some(BarrierState {
                    coefficient: 1.0,
                    growth: 1.0,
                })
            }

            fn adjust_gradient(&self, _state: &BarrierState, _params: &[f64], grad: &mut [f64]) {
                grad.iter_mut().for_each(|g| *g *= 2.0);
            }
        }

        let config = SolverConfig::default().with_max_iterations(1);
        let objective = L1Distance { center: vec![5.0] };
        let result =
            SubgradientDescent::with_barrier(config, DoubleStep).minimize(&objective, &[0.0]);
        assert_relative_eq!(result.params[0], 0.02, epsilon = 1e-12);
    }
}
