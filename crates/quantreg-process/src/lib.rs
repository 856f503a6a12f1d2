//! Multi-quantile regression and cross-quantile diagnostics
//!
//! Fits a family of quantile levels against the same data and reports how the
//! resulting fits relate to each other:
//!
//! - [`fit_linear_multi`] / [`fit_nonlinear_multi`] (or [`QuantileProcess`]
//!   for custom options) produce a [`MultiFit`]
//! - [`compute_diagnostics`] reports residual statistics, quantile crossings
//!   and a median-fit pseudo-R²
//!
//! # Example
//!
//! ```rust
//! use quantreg_process::{compute_diagnostics, fit_linear_multi};
//!
//! let x = vec![vec![1.0, 0.5], vec![1.0, 1.0], vec![1.0, 1.5], vec![1.0, 2.0], vec![1.0, 2.5]];
//! let y = vec![1.0, 2.0, 2.5, 3.0, 4.0];
//!
//! let multi = fit_linear_multi(&y, &x, &[0.25, 0.5, 0.75]).unwrap();
//! let diagnostics = compute_diagnostics(&multi);
//!
//! assert_eq!(diagnostics.crossings().size(), 3);
//! assert!(diagnostics.residual_stats(0.5).is_some());
//! ```

pub mod diagnostics;
pub mod multi;

pub use diagnostics::{
    compute_diagnostics, compute_diagnostics_with, count_crossings, pseudo_r_squared,
    CrossingMatrix, Diagnostics, ResidualStats,
};
pub use multi::{
    fit_linear_multi, fit_nonlinear_multi, normalize_taus, MultiFit, MultiFitOptions,
    QuantileProcess,
};

/// Prelude for convenient imports
pub mod prelude {
    pub use crate::{
        compute_diagnostics, fit_linear_multi, fit_nonlinear_multi, Diagnostics, MultiFit,
        MultiFitOptions, QuantileProcess,
    };
}
