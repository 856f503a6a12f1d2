//! Multi-quantile fits
//!
//! A [`MultiFit`] holds one [`SingleFit`] per quantile level, all fitted to the
//! same data, in ascending τ order. The orchestration entry points normalize
//! the requested levels (sort, dedupe, validate), run one single-τ solver per
//! level and aggregate the results.
//!
//! # Example
//!
//! ```rust
//! use quantreg_process::fit_linear_multi;
//!
//! let x = vec![vec![1.0, 0.5], vec![1.0, 1.0], vec![1.0, 1.5], vec![1.0, 2.0]];
//! let y = vec![1.0, 2.0, 2.5, 3.0];
//!
//! let multi = fit_linear_multi(&y, &x, &[0.75, 0.25, 0.5]).unwrap();
//! assert_eq!(multi.taus(), &[0.25, 0.5, 0.75]);
//! assert!(multi.get(0.5).is_some());
//! ```

use crate::diagnostics::{compute_diagnostics, Diagnostics};
use ordered_float::OrderedFloat;
use quantreg_core::{Error, ExecutionStrategy, Result, SolverConfig};
use quantreg_fit::{
    FitMethod, LinearSolver, NonLinearModel, NonLinearSolver, SharedModel, SingleFit,
};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;
use tracing::{debug, instrument};

/// Options for a multi-quantile fit
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MultiFitOptions {
    /// Configuration handed to every single-τ solver
    pub solver: SolverConfig,
    /// How the per-τ fits are scheduled
    pub strategy: ExecutionStrategy,
}

impl MultiFitOptions {
    /// Set the solver configuration
    pub fn with_solver(mut self, solver: SolverConfig) -> Self {
        self.solver = solver;
        self
    }

    /// Set the execution strategy
    pub fn with_strategy(mut self, strategy: ExecutionStrategy) -> Self {
        self.strategy = strategy;
        self
    }

    /// Check the solver configuration
    pub fn validate(&self) -> Result<()> {
        self.solver.validate()
    }
}

/// Sort, dedupe and validate the requested quantile levels
///
/// Fails with `EmptyTauSet` for an empty request and `InvalidTau` for the
/// first level (in ascending order) outside (0, 1).
pub fn normalize_taus(taus: &[f64]) -> Result<Vec<f64>> {
    if taus.is_empty() {
        return Err(Error::EmptyTauSet);
    }

    let mut levels: Vec<OrderedFloat<f64>> = taus.iter().copied().map(OrderedFloat).collect();
    levels.sort_unstable();
    levels.dedup();

    levels
        .into_iter()
        .map(|tau| {
            Error::check_tau(tau.0)?;
            Ok(tau.0)
        })
        .collect()
}

/// One fit per quantile level over shared data
#[derive(Debug, Clone)]
pub struct MultiFit {
    fits: Vec<SingleFit>,
    taus: Vec<f64>,
    index: BTreeMap<OrderedFloat<f64>, usize>,
    n: usize,
    p: usize,
    method: FitMethod,
    formula: String,
}

impl MultiFit {
    /// Aggregate single fits into a multi-quantile fit
    ///
    /// Fits are reordered by τ. N, P and the method are taken from the
    /// lowest-τ fit; any fit that disagrees on N or P fails with
    /// `InconsistentFit`. Repeated levels and mixed methods are rejected.
    pub fn from_fits(mut fits: Vec<SingleFit>) -> Result<Self> {
        if fits.is_empty() {
            return Err(Error::EmptyTauSet);
        }
        fits.sort_by_key(|fit| OrderedFloat(fit.tau()));

        let first = &fits[0];
        let (n, p, method) = (first.n(), first.p(), first.method());
        let formula = first.formula().to_string();

        let mut index = BTreeMap::new();
        for (i, fit) in fits.iter().enumerate() {
            if fit.n() != n || fit.p() != p {
                return Err(Error::InconsistentFit {
                    tau: fit.tau(),
                    expected_n: n,
                    expected_p: p,
                    n: fit.n(),
                    p: fit.p(),
                });
            }
            if fit.method() != method {
                return Err(Error::InvalidParameter(format!(
                    "fit for tau={} uses method {}, expected {}",
                    fit.tau(),
                    fit.method(),
                    method
                )));
            }
            if index.insert(OrderedFloat(fit.tau()), i).is_some() {
                return Err(Error::InvalidParameter(format!(
                    "duplicate quantile level {}",
                    fit.tau()
                )));
            }
        }

        let taus = fits.iter().map(SingleFit::tau).collect();
        Ok(Self {
            fits,
            taus,
            index,
            n,
            p,
            method,
            formula,
        })
    }

    /// Attach a formula label to the aggregate
    pub fn with_formula(mut self, formula: impl Into<String>) -> Self {
        self.formula = formula.into();
        self
    }

    /// Quantile levels in ascending order
    pub fn taus(&self) -> &[f64] {
        &self.taus
    }

    /// Fits in ascending τ order
    pub fn fits(&self) -> &[SingleFit] {
        &self.fits
    }

    /// The fit for exactly this quantile level
    pub fn get(&self, tau: f64) -> Option<&SingleFit> {
        self.index.get(&OrderedFloat(tau)).map(|&i| &self.fits[i])
    }

    /// (τ, fit) pairs in ascending τ order
    pub fn iter(&self) -> impl Iterator<Item = (f64, &SingleFit)> + '_ {
        self.fits.iter().map(|fit| (fit.tau(), fit))
    }

    /// Number of quantile levels
    pub fn len(&self) -> usize {
        self.fits.len()
    }

    /// Always false for a constructed aggregate
    pub fn is_empty(&self) -> bool {
        self.fits.is_empty()
    }

    /// Number of observations shared by every fit
    pub fn n(&self) -> usize {
        self.n
    }

    /// Number of parameters shared by every fit
    pub fn p(&self) -> usize {
        self.p
    }

    /// Fitting method shared by every fit
    pub fn method(&self) -> FitMethod {
        self.method
    }

    /// Formula label, empty when none was set
    pub fn formula(&self) -> &str {
        &self.formula
    }

    /// Predict every quantile level on the same new rows
    ///
    /// Returns one (τ, predictions) pair per level in ascending τ order. The
    /// first failing level aborts the call with its τ attached.
    pub fn predict(&self, new_x: &[Vec<f64>]) -> Result<Vec<(f64, Vec<f64>)>> {
        self.iter()
            .map(|(tau, fit)| {
                fit.predict(new_x)
                    .map(|preds| (tau, preds))
                    .map_err(|e| e.for_tau(tau))
            })
            .collect()
    }

    /// Cross-quantile diagnostics for this aggregate
    pub fn diagnostics(&self) -> Diagnostics {
        compute_diagnostics(self)
    }

    /// Human-readable summary
    pub fn summary(&self) -> String {
        self.to_string()
    }
}

impl<'a> IntoIterator for &'a MultiFit {
    type Item = &'a SingleFit;
    type IntoIter = std::slice::Iter<'a, SingleFit>;

    fn into_iter(self) -> Self::IntoIter {
        self.fits.iter()
    }
}

impl fmt::Display for MultiFit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Multiple {}", self.method.title())?;
        writeln!(f, "Number of observations: {}", self.n)?;
        writeln!(f, "Number of parameters: {}", self.p)?;

        let levels: Vec<String> = self.taus.iter().map(|tau| tau.to_string()).collect();
        writeln!(f, "Quantile levels: [{}]", levels.join(" "))?;
        writeln!(f)?;

        for (tau, fit) in self.iter() {
            writeln!(f, "=== Quantile {tau:.6} ===")?;
            fit.write_coefficients(f)?;
            writeln!(f)?;
        }
        Ok(())
    }
}

/// Multi-quantile orchestrator
///
/// # Examples
///
/// ```
/// use quantreg_core::{ExecutionStrategy, SolverConfig};
/// use quantreg_process::{MultiFitOptions, QuantileProcess};
///
/// let options = MultiFitOptions::default()
///     .with_solver(SolverConfig::default().with_max_iterations(200))
///     .with_strategy(ExecutionStrategy::Parallel);
/// let process = QuantileProcess::new(options);
///
/// let x = vec![vec![1.0, 0.0], vec![1.0, 1.0], vec![1.0, 2.0]];
/// let y = vec![1.0, 3.0, 5.0];
/// let multi = process.fit_linear(&y, &x, &[0.1, 0.9]).unwrap();
/// assert_eq!(multi.len(), 2);
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct QuantileProcess {
    options: MultiFitOptions,
}

impl QuantileProcess {
    /// Create an orchestrator with the given options
    pub fn new(options: MultiFitOptions) -> Self {
        Self { options }
    }

    /// The orchestration options
    pub fn options(&self) -> &MultiFitOptions {
        &self.options
    }

    /// Fit a linear model at every requested quantile level
    #[instrument(skip(self, y, x, taus), fields(n = y.len(), levels = taus.len()))]
    pub fn fit_linear(&self, y: &[f64], x: &[Vec<f64>], taus: &[f64]) -> Result<MultiFit> {
        let solver = LinearSolver::new(self.options.solver);
        self.run(taus, |tau| solver.fit(y, x, tau))
    }

    /// Fit a non-linear model at every requested quantile level
    ///
    /// Every level starts from the same `beta0`.
    #[instrument(skip(self, y, x, model, beta0, taus), fields(n = y.len(), levels = taus.len(), model = model.name()))]
    pub fn fit_nonlinear(
        &self,
        y: &[f64],
        x: &[Vec<f64>],
        model: &SharedModel,
        beta0: &[f64],
        taus: &[f64],
    ) -> Result<MultiFit> {
        let solver = NonLinearSolver::new(self.options.solver);
        self.run(taus, |tau| solver.fit(y, x, model, beta0, tau))
    }

    fn run<F>(&self, taus: &[f64], fit_one: F) -> Result<MultiFit>
    where
        F: Fn(f64) -> Result<SingleFit> + Sync + Send,
    {
        let taus = normalize_taus(taus)?;
        self.options.validate()?;

        let strategy = self.options.strategy;
        let fits = if strategy.is_parallel() {
            strategy
                .execute_batch(taus.len(), |i| fit_one(taus[i]))
                .into_iter()
                .zip(&taus)
                .map(|(result, &tau)| result.map_err(|e| e.for_tau(tau)))
                .collect::<Result<Vec<_>>>()?
        } else {
            taus.iter()
                .map(|&tau| fit_one(tau).map_err(|e| e.for_tau(tau)))
                .collect::<Result<Vec<_>>>()?
        };

        debug!(
            levels = fits.len(),
            converged = fits.iter().filter(|fit| fit.convergence().converged).count(),
            "multi-quantile fit finished"
        );
        MultiFit::from_fits(fits)
    }
}

/// Fit a linear model at several quantile levels with default options
///
/// # Examples
///
/// ```
/// use quantreg_process::fit_linear_multi;
///
/// let x = vec![vec![1.0, 0.5], vec![1.0, 1.0], vec![1.0, 1.5], vec![1.0, 2.0], vec![1.0, 2.5]];
/// let y = vec![1.0, 2.0, 2.5, 3.0, 4.0];
///
/// let multi = fit_linear_multi(&y, &x, &[0.25, 0.5, 0.75]).unwrap();
/// let preds = multi.predict(&[vec![1.0, 3.0]]).unwrap();
/// assert_eq!(preds.len(), 3);
/// println!("{}", multi.summary());
/// ```
pub fn fit_linear_multi(y: &[f64], x: &[Vec<f64>], taus: &[f64]) -> Result<MultiFit> {
    QuantileProcess::default().fit_linear(y, x, taus)
}

/// Fit a non-linear model at several quantile levels with default options
pub fn fit_nonlinear_multi<M: NonLinearModel + 'static>(
    y: &[f64],
    x: &[Vec<f64>],
    model: M,
    beta0: &[f64],
    taus: &[f64],
) -> Result<MultiFit> {
    let model: SharedModel = Arc::new(model);
    QuantileProcess::default().fit_nonlinear(y, x, &model, beta0, taus)
}
