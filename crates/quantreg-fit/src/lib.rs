//! Single-quantile regression solvers
//!
//! This crate fits one quantile level at a time:
//!
//! - **Linear**: y ≈ Xβ, see [`LinearSolver`] / [`fit_linear`]
//! - **Non-linear**: y ≈ f(β, x) for a user [`NonLinearModel`], see
//!   [`NonLinearSolver`] / [`fit_nonlinear`]
//!
//! Both minimize the summed check loss through the [`Minimizer`] interface
//! using fixed-step subgradient descent, and both return a [`SingleFit`].
//!
//! # Example
//!
//! ```rust
//! use quantreg_fit::fit_linear;
//!
//! let x = vec![vec![1.0, 0.5], vec![1.0, 1.0], vec![1.0, 1.5]];
//! let y = vec![1.0, 2.0, 2.5];
//!
//! let fit = fit_linear(&y, &x, 0.5).unwrap();
//! let preds = fit.predict(&[vec![1.0, 2.0]]).unwrap();
//! assert_eq!(preds.len(), 1);
//! ```

pub mod fit;
pub mod linear;
pub mod minimizer;
pub mod nonlinear;

// Re-export main types
pub use fit::{Convergence, FitMethod, SingleFit};
pub use linear::{fit_linear, LinearSolver};
pub use minimizer::{
    BarrierPolicy, BarrierState, InertBarrier, Minimizer, Minimum, NoBarrier, SubgradientDescent,
    SubgradientObjective,
};
pub use nonlinear::{fit_nonlinear, FnModel, NonLinearModel, NonLinearSolver, SharedModel};
// Re-export from quantreg-core
pub use quantreg_core::{Error, Result, SolverConfig};

/// Prelude for convenient imports
pub mod prelude {
    pub use crate::{
        fit_linear, fit_nonlinear, Error, FnModel, LinearSolver, NonLinearModel, NonLinearSolver,
        Result, SingleFit, SolverConfig,
    };
}
