//! # quantreg
//!
//! Linear and non-linear quantile regression with multi-quantile diagnostics.
//!
//! The workspace is split into three crates, re-exported here:
//!
//! - [`quantreg_core`]: errors, check loss, solver configuration, design
//!   matrices and execution strategy
//! - [`quantreg_fit`]: single-quantile linear and non-linear solvers
//! - [`quantreg_process`]: multi-quantile fits and diagnostics
//!
//! ## Quick start
//!
//! ```rust
//! use quantreg::prelude::*;
//!
//! let x = vec![vec![1.0, 0.5], vec![1.0, 1.0], vec![1.0, 1.5], vec![1.0, 2.0], vec![1.0, 2.5]];
//! let y = vec![1.0, 2.0, 2.5, 3.0, 4.0];
//!
//! // One quantile level
//! let median = fit_linear(&y, &x, 0.5)?;
//! println!("{}", median.summary());
//!
//! // Several levels plus diagnostics
//! let multi = fit_linear_multi(&y, &x, &[0.25, 0.5, 0.75])?;
//! let diagnostics = compute_diagnostics(&multi);
//! println!("pseudo R² = {:.4}", diagnostics.pseudo_r_squared());
//! # Ok::<(), quantreg::Error>(())
//! ```
//!
//! ## Features
//!
//! - `parallel`: fit quantile levels on the rayon pool when
//!   [`ExecutionStrategy::Parallel`] is selected

pub use quantreg_core;
pub use quantreg_fit;
pub use quantreg_process;

pub use quantreg_core::{
    check_loss, CsrMatrix, Error, ExecutionStrategy, Result, SolverConfig,
};
pub use quantreg_fit::{
    fit_linear, fit_nonlinear, Convergence, FitMethod, FnModel, LinearSolver, NonLinearModel,
    NonLinearSolver, SharedModel, SingleFit,
};
pub use quantreg_process::{
    compute_diagnostics, fit_linear_multi, fit_nonlinear_multi, CrossingMatrix, Diagnostics,
    MultiFit, MultiFitOptions, QuantileProcess, ResidualStats,
};

/// Prelude for convenient imports
pub mod prelude {
    pub use quantreg_core::prelude::*;
    pub use quantreg_fit::prelude::*;
    pub use quantreg_process::prelude::*;
}
