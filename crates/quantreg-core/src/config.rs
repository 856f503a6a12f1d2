//! Solver configuration
//!
//! The iteration cap, gradient tolerance and step size bound the cost of a
//! fit and define convergence. They are fixed per solver instance.

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};

/// Default iteration cap
pub const DEFAULT_MAX_ITERATIONS: usize = 1000;
/// Default max-|gradient| tolerance
pub const DEFAULT_TOLERANCE: f64 = 1e-8;
/// Default fixed step size
pub const DEFAULT_STEP_SIZE: f64 = 0.01;

/// Immutable optimization policy shared by the linear and non-linear solvers
///
/// # Examples
///
/// ```
/// use quantreg_core::SolverConfig;
///
/// let config = SolverConfig::default().with_max_iterations(5000);
/// assert!(config.validate().is_ok());
/// assert_eq!(config.step_size, 0.01);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SolverConfig {
    /// Maximum number of descent iterations
    pub max_iterations: usize,
    /// Stop when the largest absolute subgradient component falls below this
    pub tolerance: f64,
    /// Fixed step taken opposite the subgradient
    pub step_size: f64,
}

impl Default for SolverConfig {
    fn default() -> Self {
        Self {
            max_iterations: DEFAULT_MAX_ITERATIONS,
            tolerance: DEFAULT_TOLERANCE,
            step_size: DEFAULT_STEP_SIZE,
        }
    }
}

impl SolverConfig {
    /// Create a validated configuration
    pub fn new(max_iterations: usize, tolerance: f64, step_size: f64) -> Result<Self> {
        let config = Self {
            max_iterations,
            tolerance,
            step_size,
        };
        config.validate()?;
        Ok(config)
    }

    /// Set the iteration cap
    pub fn with_max_iterations(mut self, max_iterations: usize) -> Self {
        self.max_iterations = max_iterations;
        self
    }

    /// Set the gradient tolerance
    pub fn with_tolerance(mut self, tolerance: f64) -> Self {
        self.tolerance = tolerance;
        self
    }

    /// Set the step size
    pub fn with_step_size(mut self, step_size: f64) -> Self {
        self.step_size = step_size;
        self
    }

    /// Check that every field is usable
    pub fn validate(&self) -> Result<()> {
        if self.max_iterations == 0 {
            return Err(Error::InvalidParameter(
                "max_iterations must be at least 1".to_string(),
            ));
        }
        if !(self.tolerance.is_finite() && self.tolerance > 0.0) {
            return Err(Error::InvalidParameter(format!(
                "tolerance {} must be finite and positive",
                self.tolerance
            )));
        }
        if !(self.step_size.is_finite() && self.step_size > 0.0) {
            return Err(Error::InvalidParameter(format!(
                "step_size {} must be finite and positive",
                self.step_size
            )));
        }
        Ok(())
    }
}
