//! Linear quantile regression
//!
//! Minimizes Σ ρ_τ(y_i − x_iᵀβ) by fixed-step subgradient descent from β = 0.
//! The covariate rows are stored as a CSR matrix and densified once; the
//! descent loop reads the dense copy only.

use crate::fit::{FitMethod, Predictor, SingleFit};
use crate::minimizer::{Minimizer, SubgradientDescent, SubgradientObjective};
use quantreg_core::{
    check_dataset, sparse::dot, subgradient_weight, CsrMatrix, DenseMatrix, Error, Result,
    SolverConfig,
};
use tracing::{debug, instrument};

/// Check loss subgradient for a fixed design matrix
struct LinearObjective<'a> {
    y: &'a [f64],
    design: &'a DenseMatrix,
    tau: f64,
}

impl SubgradientObjective for LinearObjective<'_> {
    fn dim(&self) -> usize {
        self.design.cols()
    }

    fn subgradient(&self, beta: &[f64], grad: &mut [f64]) {
        grad.fill(0.0);
        for (&yi, row) in self.y.iter().zip(self.design.iter_rows()) {
            let weight = subgradient_weight(yi - dot(row, beta), self.tau);
            for (g, &xij) in grad.iter_mut().zip(row) {
                *g += xij * weight;
            }
        }
    }
}

/// Linear quantile regression solver
///
/// # Examples
///
/// ```
/// use quantreg_core::SolverConfig;
/// use quantreg_fit::LinearSolver;
///
/// let x = vec![vec![1.0, 0.0], vec![1.0, 1.0], vec![1.0, 2.0]];
/// let y = vec![1.0, 3.0, 5.0];
///
/// let solver = LinearSolver::new(SolverConfig::default().with_max_iterations(5000));
/// let fit = solver.fit(&y, &x, 0.5).unwrap();
/// assert_eq!(fit.coefficients().len(), 2);
/// ```
#[derive(Debug, Clone, Default)]
pub struct LinearSolver {
    config: SolverConfig,
}

impl LinearSolver {
    /// Create a solver with the given configuration
    pub fn new(config: SolverConfig) -> Self {
        Self { config }
    }

    /// The solver configuration
    pub fn config(&self) -> &SolverConfig {
        &self.config
    }

    /// Fit y on the covariate rows x at quantile level `tau`
    ///
    /// Fails with `EmptyInput` if either side has no rows (or the rows have no
    /// columns), `DimensionMismatch` if the row counts differ or rows are
    /// ragged, and `InvalidTau` if `tau` is outside (0, 1).
    #[instrument(skip(self, y, x), fields(n = y.len()))]
    pub fn fit(&self, y: &[f64], x: &[Vec<f64>], tau: f64) -> Result<SingleFit> {
        check_dataset(y, x)?;
        let csr = CsrMatrix::from_rows(x)?;
        self.fit_sparse(y, &csr, tau)
    }

    /// Fit y on a CSR design matrix at quantile level `tau`
    #[instrument(skip(self, y, x), fields(n = y.len(), p = x.cols(), nnz = x.nnz()))]
    pub fn fit_sparse(&self, y: &[f64], x: &CsrMatrix, tau: f64) -> Result<SingleFit> {
        Error::check_non_empty(y, "response vector")?;
        if x.rows() == 0 {
            return Err(Error::empty_input("covariate rows"));
        }
        Error::check_len(y.len(), x.rows(), "covariate row count")?;
        if x.cols() == 0 {
            return Err(Error::empty_input("covariate columns"));
        }
        Error::check_tau(tau)?;
        self.config.validate()?;

        let design = x.to_dense();
        debug!(sparsity = x.sparsity(), "densified design matrix");

        let objective = LinearObjective {
            y,
            design: &design,
            tau,
        };
        let minimum =
            SubgradientDescent::new(self.config).minimize(&objective, &vec![0.0; design.cols()]);

        let fitted = design.mul_vec(&minimum.params);
        Ok(SingleFit::assemble(
            y,
            fitted,
            tau,
            FitMethod::Linear,
            Predictor::Linear,
            minimum,
        ))
    }
}

/// Fit a linear quantile regression with the default solver
///
/// # Examples
///
/// ```
/// use quantreg_fit::fit_linear;
///
/// let x = vec![vec![1.0, 0.5], vec![1.0, 1.0], vec![1.0, 1.5], vec![1.0, 2.0], vec![1.0, 2.5]];
/// let y = vec![1.0, 2.0, 2.5, 3.0, 4.0];
///
/// let fit = fit_linear(&y, &x, 0.5).unwrap();
/// assert_eq!(fit.n(), 5);
/// assert_eq!(fit.p(), 2);
/// println!("{}", fit.summary());
/// ```
pub fn fit_linear(y: &[f64], x: &[Vec<f64>], tau: f64) -> Result<SingleFit> {
    LinearSolver::default().fit(y, x, tau)
}
