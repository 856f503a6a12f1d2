//! Core types for quantile regression
//!
//! This crate provides the pieces shared by the single-quantile solvers and
//! the multi-quantile orchestration layer:
//!
//! - **Errors**: one error enum with boundary validation helpers
//! - **Check loss**: the tilted absolute deviation and its one-sided subgradient
//! - **Configuration**: immutable solver policy (iteration cap, tolerance, step)
//! - **Design matrices**: a read-only CSR source and its dense conversion
//! - **Execution**: sequential or rayon-backed per-quantile batches
//!
//! # Example
//!
//! ```rust
//! use quantreg_core::{check_loss, total_check_loss, SolverConfig};
//!
//! // Under-prediction costs tau per unit, over-prediction (1 - tau)
//! assert_eq!(check_loss(2.0, 0.25), 0.5);
//! assert_eq!(check_loss(-2.0, 0.25), 1.5);
//! assert_eq!(total_check_loss(&[2.0, -2.0], 0.25), 2.0);
//!
//! let config = SolverConfig::default();
//! assert_eq!(config.max_iterations, 1000);
//! ```

pub mod config;
pub mod error;
pub mod execution;
pub mod loss;
pub mod sparse;
pub mod utils;

// Re-export core types
pub use config::SolverConfig;
pub use error::{check_dataset, check_rectangular, Error, Result};
pub use execution::ExecutionStrategy;
pub use loss::{check_loss, subgradient_weight, total_check_loss};
pub use sparse::{CsrMatrix, DenseMatrix};

// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::{
        CsrMatrix, DenseMatrix, Error, ExecutionStrategy, Result, SolverConfig,
    };
}
