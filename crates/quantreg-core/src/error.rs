//! Error types for quantile regression
//!
//! Provides a unified error type for all quantreg crates.

use thiserror::Error;

/// Core error type for quantile regression operations
#[derive(Error, Debug, Clone, PartialEq)]
pub enum Error {
    /// Zero observations on either side of a fit, or zero rows to predict
    #[error("Empty input: {context}")]
    EmptyInput { context: String },

    /// Row counts or covariate arity disagree
    #[error("Dimension mismatch in {context}: expected {expected}, got {actual}")]
    DimensionMismatch {
        context: String,
        expected: usize,
        actual: usize,
    },

    /// Quantile level outside the open interval (0, 1)
    #[error("Quantile level {tau} must be in (0, 1)")]
    InvalidTau { tau: f64 },

    /// Multi-quantile fit requested with no quantile levels
    #[error("No quantile levels specified")]
    EmptyTauSet,

    /// A fit in a multi-quantile aggregate disagrees on N or P
    #[error(
        "Fit for tau={tau} reports n={n}, p={p}; aggregate expects n={expected_n}, p={expected_p}"
    )]
    InconsistentFit {
        tau: f64,
        expected_n: usize,
        expected_p: usize,
        n: usize,
        p: usize,
    },

    /// Invalid solver or orchestration parameter
    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),

    /// Failure of a single quantile level inside a multi-quantile operation
    #[error("Failed for tau={tau}: {source}")]
    TauFit {
        tau: f64,
        #[source]
        source: Box<Error>,
    },
}

/// Result type alias using our Error type
pub type Result<T> = std::result::Result<T, Error>;

// Helper functions for common error patterns

impl Error {
    /// Create an error for empty input
    pub fn empty_input(context: &str) -> Self {
        Self::EmptyInput {
            context: context.to_string(),
        }
    }

    /// Create an error for size mismatch
    pub fn size_mismatch(expected: usize, actual: usize, context: &str) -> Self {
        Self::DimensionMismatch {
            context: context.to_string(),
            expected,
            actual,
        }
    }

    /// Attach the quantile level that failed
    pub fn for_tau(self, tau: f64) -> Self {
        Self::TauFit {
            tau,
            source: Box::new(self),
        }
    }

    /// The underlying error with any per-tau wrapping removed
    pub fn root(&self) -> &Error {
        match self {
            Self::TauFit { source, .. } => source.root(),
            other => other,
        }
    }

    /// Check that a quantile level lies strictly inside (0, 1)
    ///
    /// NaN is rejected.
    pub fn check_tau(tau: f64) -> Result<()> {
        if tau > 0.0 && tau < 1.0 {
            Ok(())
        } else {
            Err(Self::InvalidTau { tau })
        }
    }

    /// Check that a slice is non-empty
    pub fn check_non_empty<T>(data: &[T], context: &str) -> Result<()> {
        if data.is_empty() {
            return Err(Self::empty_input(context));
        }
        Ok(())
    }

    /// Check that two lengths agree
    pub fn check_len(expected: usize, actual: usize, context: &str) -> Result<()> {
        if expected != actual {
            return Err(Self::size_mismatch(expected, actual, context));
        }
        Ok(())
    }
}

/// Validate a response vector against a set of covariate rows
///
/// Checks emptiness first, then row counts. Returns N.
pub fn check_dataset(y: &[f64], x: &[Vec<f64>]) -> Result<usize> {
    Error::check_non_empty(y, "response vector")?;
    Error::check_non_empty(x, "covariate rows")?;
    Error::check_len(y.len(), x.len(), "covariate row count")?;
    Ok(y.len())
}

/// Validate that every row has the same width as the first and return it
pub fn check_rectangular(x: &[Vec<f64>]) -> Result<usize> {
    let width = x.first().map(Vec::len).unwrap_or(0);
    for row in x {
        Error::check_len(width, row.len(), "covariate row width")?;
    }
    Ok(width)
}
