//! Non-linear quantile regression
//!
//! The model is any pair of pure functions f(β, x) and ∂f/∂β. Each descent
//! iteration re-evaluates both at the current β for every observation, so the
//! effective design matrix changes as the parameters move.

use crate::fit::{FitMethod, Predictor, SingleFit};
use crate::minimizer::{
    BarrierPolicy, InertBarrier, Minimizer, SubgradientDescent, SubgradientObjective,
};
use quantreg_core::{check_dataset, subgradient_weight, Error, Result, SolverConfig};
use std::fmt;
use std::sync::Arc;
use tracing::instrument;

/// A non-linear model and its parameter gradient
///
/// Implementations must be stateless: the same model is shared across fits
/// for different quantile levels, possibly on several threads.
pub trait NonLinearModel: Send + Sync {
    /// Predicted value at parameters `beta` and covariate row `x`
    fn value(&self, beta: &[f64], x: &[f64]) -> f64;

    /// Write ∂f/∂β_j into `out` (length `beta.len()`)
    fn gradient(&self, beta: &[f64], x: &[f64], out: &mut [f64]);

    /// Name used in logs and debug output
    fn name(&self) -> &str {
        "custom"
    }
}

/// Shared handle to a model, cloned into every fit that needs to predict
pub type SharedModel = Arc<dyn NonLinearModel>;

/// Closure-backed [`NonLinearModel`]
///
/// # Examples
///
/// ```
/// use quantreg_fit::{FnModel, NonLinearModel};
///
/// // f(β, x) = β₀ · exp(β₁ · x)
/// let model = FnModel::new(
///     |b: &[f64], x: &[f64]| b[0] * (b[1] * x[0]).exp(),
///     |b: &[f64], x: &[f64], out: &mut [f64]| {
///         let e = (b[1] * x[0]).exp();
///         out[0] = e;
///         out[1] = b[0] * x[0] * e;
///     },
/// )
/// .named("exponential");
///
/// assert_eq!(model.value(&[2.0, 0.0], &[5.0]), 2.0);
/// assert_eq!(model.name(), "exponential");
/// ```
pub struct FnModel<F, G> {
    value: F,
    gradient: G,
    name: String,
}

impl<F, G> FnModel<F, G>
where
    F: Fn(&[f64], &[f64]) -> f64 + Send + Sync,
    G: Fn(&[f64], &[f64], &mut [f64]) + Send + Sync,
{
    /// Wrap a value function and a gradient function
    pub fn new(value: F, gradient: G) -> Self {
        Self {
            value,
            gradient,
            name: "custom".to_string(),
        }
    }

    /// Set the model name
    pub fn named(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }
}

impl<F, G> NonLinearModel for FnModel<F, G>
where
    F: Fn(&[f64], &[f64]) -> f64 + Send + Sync,
    G: Fn(&[f64], &[f64], &mut [f64]) + Send + Sync,
{
    fn value(&self, beta: &[f64], x: &[f64]) -> f64 {
        (self.value)(beta, x)
    }

    fn gradient(&self, beta: &[f64], x: &[f64], out: &mut [f64]) {
        (self.gradient)(beta, x, out)
    }

    fn name(&self) -> &str {
        &self.name
    }
}

impl<F, G> fmt::Debug for FnModel<F, G> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FnModel").field("name", &self.name).finish()
    }
}

/// Check loss subgradient for a non-linear model
struct NonLinearObjective<'a> {
    y: &'a [f64],
    x: &'a [Vec<f64>],
    model: &'a dyn NonLinearModel,
    tau: f64,
    p: usize,
}

impl SubgradientObjective for NonLinearObjective<'_> {
    fn dim(&self) -> usize {
        self.p
    }

    fn subgradient(&self, beta: &[f64], grad: &mut [f64]) {
        grad.fill(0.0);
        let mut row_grad = vec![0.0; self.p];
        for (&yi, xi) in self.y.iter().zip(self.x) {
            let residual = yi - self.model.value(beta, xi);
            row_grad.fill(0.0);
            self.model.gradient(beta, xi, &mut row_grad);
            let weight = subgradient_weight(residual, self.tau);
            for (g, d) in grad.iter_mut().zip(&row_grad) {
                *g += d * weight;
            }
        }
    }
}

/// Non-linear quantile regression solver
#[derive(Debug, Clone)]
pub struct NonLinearSolver<B: BarrierPolicy = InertBarrier> {
    config: SolverConfig,
    barrier: B,
}

impl Default for NonLinearSolver<InertBarrier> {
    fn default() -> Self {
        Self::new(SolverConfig::default())
    }
}

impl NonLinearSolver<InertBarrier> {
    /// Create a solver with the inert barrier policy
    pub fn new(config: SolverConfig) -> Self {
        Self {
            config,
            barrier: InertBarrier::default(),
        }
    }
}

impl<B: BarrierPolicy + Clone> NonLinearSolver<B> {
    /// Create a solver with a custom barrier policy
    pub fn with_policy(config: SolverConfig, barrier: B) -> Self {
        Self { config, barrier }
    }

    /// The solver configuration
    pub fn config(&self) -> &SolverConfig {
        &self.config
    }

    /// Fit `model` to (y, x) at quantile level `tau` starting from `beta0`
    ///
    /// P is `beta0.len()`. Fails with `EmptyInput` if y, x or `beta0` is
    /// empty, `DimensionMismatch` if y and x differ in length, and
    /// `InvalidTau` if `tau` is outside (0, 1).
    #[instrument(skip(self, y, x, model, beta0), fields(n = y.len(), p = beta0.len(), model = model.name()))]
    pub fn fit(
        &self,
        y: &[f64],
        x: &[Vec<f64>],
        model: &SharedModel,
        beta0: &[f64],
        tau: f64,
    ) -> Result<SingleFit> {
        check_dataset(y, x)?;
        Error::check_non_empty(beta0, "initial parameters")?;
        Error::check_tau(tau)?;
        self.config.validate()?;

        let objective = NonLinearObjective {
            y,
            x,
            model: model.as_ref(),
            tau,
            p: beta0.len(),
        };
        let minimum = SubgradientDescent::with_barrier(self.config, self.barrier.clone())
            .minimize(&objective, beta0);

        let fitted: Vec<f64> = x.iter().map(|xi| model.value(&minimum.params, xi)).collect();
        Ok(SingleFit::assemble(
            y,
            fitted,
            tau,
            FitMethod::NonLinear,
            Predictor::NonLinear(Arc::clone(model)),
            minimum,
        ))
    }
}

/// Fit a non-linear quantile regression with the default solver
///
/// # Examples
///
/// ```
/// use quantreg_fit::{fit_nonlinear, FnModel};
///
/// let x: Vec<Vec<f64>> = [0.0, 0.5, 1.0, 1.5, 2.0].iter().map(|&v| vec![v]).collect();
/// let y: Vec<f64> = x.iter().map(|r| (0.5 * r[0]).exp()).collect();
/// let model = FnModel::new(
///     |b: &[f64], x: &[f64]| b[0] * (b[1] * x[0]).exp(),
///     |b: &[f64], x: &[f64], out: &mut [f64]| {
///         let e = (b[1] * x[0]).exp();
///         out[0] = e;
///         out[1] = b[0] * x[0] * e;
///     },
/// );
///
/// let fit = fit_nonlinear(&y, &x, model, &[0.5, 0.1], 0.5).unwrap();
/// assert!((fit.coefficients()[0] - 1.0).abs() < 0.1);
/// assert!((fit.coefficients()[1] - 0.5).abs() < 0.1);
/// ```
pub fn fit_nonlinear<M: NonLinearModel + 'static>(
    y: &[f64],
    x: &[Vec<f64>],
    model: M,
    beta0: &[f64],
    tau: f64,
) -> Result<SingleFit> {
    let model: SharedModel = Arc::new(model);
    NonLinearSolver::default().fit(y, x, &model, beta0, tau)
}
