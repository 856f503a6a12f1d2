//! Single-quantile fit results
//!
//! A [`SingleFit`] is produced once by a solver and never changes afterwards.
//! It owns the coefficients, the in-sample fitted values and residuals, and
//! whatever it needs to predict on new rows.

use crate::minimizer::Minimum;
use crate::nonlinear::SharedModel;
use quantreg_core::{sparse::dot, total_check_loss, utils, Error, Result};
use std::fmt;

/// Fitting method identifier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FitMethod {
    /// Linear-in-parameters model
    Linear,
    /// User-supplied non-linear model
    NonLinear,
}

impl FitMethod {
    /// Short identifier
    pub fn id(&self) -> &'static str {
        match self {
            Self::Linear => "br",
            Self::NonLinear => "nlrq",
        }
    }

    /// Human-readable title used in summaries
    pub fn title(&self) -> &'static str {
        match self {
            Self::Linear => "Quantile Regression",
            Self::NonLinear => "Non-linear Quantile Regression",
        }
    }
}

impl fmt::Display for FitMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.id())
    }
}

/// How predictions are produced from the coefficients
#[derive(Clone)]
pub(crate) enum Predictor {
    Linear,
    NonLinear(SharedModel),
}

impl fmt::Debug for Predictor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Linear => f.write_str("Linear"),
            Self::NonLinear(model) => write!(f, "NonLinear({})", model.name()),
        }
    }
}

/// Optimizer diagnostics attached to every fit
///
/// A fit that exhausted the iteration cap is still a successful fit; this
/// record lets callers tell the two apart.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Convergence {
    /// Number of parameter updates taken
    pub iterations: usize,
    /// Whether the gradient tolerance was met before the cap
    pub converged: bool,
    /// Largest absolute subgradient component at the last evaluation
    pub max_gradient: f64,
    /// Total check loss at the returned coefficients
    pub objective: f64,
}

/// Coefficients, fitted values and residuals for one (model, τ) pair
#[derive(Debug, Clone)]
pub struct SingleFit {
    coefficients: Vec<f64>,
    fitted: Vec<f64>,
    residuals: Vec<f64>,
    tau: f64,
    n: usize,
    p: usize,
    method: FitMethod,
    formula: String,
    predictor: Predictor,
    convergence: Convergence,
}

impl SingleFit {
    /// Assemble a fit from solver output
    ///
    /// Residuals are computed here as `y − fitted`.
    pub(crate) fn assemble(
        y: &[f64],
        fitted: Vec<f64>,
        tau: f64,
        method: FitMethod,
        predictor: Predictor,
        minimum: Minimum,
    ) -> Self {
        let residuals: Vec<f64> = y.iter().zip(&fitted).map(|(yi, fi)| yi - fi).collect();
        let convergence = Convergence {
            iterations: minimum.iterations,
            converged: minimum.converged,
            max_gradient: minimum.max_gradient,
            objective: total_check_loss(&residuals, tau),
        };
        let p = minimum.params.len();

        Self {
            coefficients: minimum.params,
            n: y.len(),
            p,
            fitted,
            residuals,
            tau,
            method,
            formula: String::new(),
            predictor,
            convergence,
        }
    }

    /// Attach a formula label
    pub fn with_formula(mut self, formula: impl Into<String>) -> Self {
        self.formula = formula.into();
        self
    }

    /// Fitted coefficients (length P)
    pub fn coefficients(&self) -> &[f64] {
        &self.coefficients
    }

    /// In-sample fitted values (length N)
    pub fn fitted(&self) -> &[f64] {
        &self.fitted
    }

    /// In-sample residuals `y − fitted` (length N)
    pub fn residuals(&self) -> &[f64] {
        &self.residuals
    }

    /// Quantile level
    pub fn tau(&self) -> f64 {
        self.tau
    }

    /// Number of observations
    pub fn n(&self) -> usize {
        self.n
    }

    /// Number of parameters
    pub fn p(&self) -> usize {
        self.p
    }

    /// Fitting method
    pub fn method(&self) -> FitMethod {
        self.method
    }

    /// Formula label, empty when none was set
    pub fn formula(&self) -> &str {
        &self.formula
    }

    /// Optimizer diagnostics
    pub fn convergence(&self) -> &Convergence {
        &self.convergence
    }

    /// Total check loss at τ over the training residuals
    pub fn check_loss(&self) -> f64 {
        self.convergence.objective
    }

    /// Predict the τ-quantile for each new covariate row
    ///
    /// Fails with `EmptyInput` for zero rows. Linear fits also require every
    /// row to have exactly P covariates; non-linear models define their own
    /// arity.
    pub fn predict(&self, new_x: &[Vec<f64>]) -> Result<Vec<f64>> {
        Error::check_non_empty(new_x, "prediction rows")?;

        match &self.predictor {
            Predictor::Linear => new_x
                .iter()
                .map(|row| {
                    Error::check_len(self.p, row.len(), "prediction row width")?;
                    Ok(dot(row, &self.coefficients))
                })
                .collect(),
            Predictor::NonLinear(model) => Ok(new_x
                .iter()
                .map(|row| model.value(&self.coefficients, row))
                .collect()),
        }
    }

    /// Human-readable summary
    pub fn summary(&self) -> String {
        self.to_string()
    }

    /// Write the "Coefficients:" block shared by single and multi summaries
    pub fn write_coefficients(&self, f: &mut impl fmt::Write) -> fmt::Result {
        writeln!(f, "Coefficients:")?;
        for (i, coef) in self.coefficients.iter().enumerate() {
            writeln!(f, "  Beta[{i}]: {coef:.6}")?;
        }
        Ok(())
    }
}

impl fmt::Display for SingleFit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{} (tau = {:.2})", self.method.title(), self.tau)?;
        writeln!(f, "Number of observations: {}", self.n)?;
        writeln!(f, "Number of parameters: {}", self.p)?;
        writeln!(f)?;
        self.write_coefficients(f)?;

        let sorted = utils::sorted(&self.residuals);
        writeln!(f)?;
        writeln!(f, "Residual summary:")?;
        writeln!(f, "  Min: {:.6}", sorted.first().copied().unwrap_or(0.0))?;
        writeln!(f, "  Max: {:.6}", sorted.last().copied().unwrap_or(0.0))?;
        writeln!(f, "  Median: {:.6}", utils::upper_median_sorted(&sorted))
    }
}
