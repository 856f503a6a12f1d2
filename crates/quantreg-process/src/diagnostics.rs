//! Cross-quantile diagnostics
//!
//! Three measures over a [`MultiFit`]:
//!
//! - residual statistics for each quantile level
//! - a pairwise quantile-crossing count over the in-sample fitted values
//! - a pseudo-R² taken from the median (τ = 0.5) fit
//!
//! Crossings are counted in observation order: a crossing is an index where
//! the order of the two fitted sequences flips relative to the previous index.
//! Sort the observations by covariate first if that is the order of interest.

use crate::multi::MultiFit;
use ordered_float::OrderedFloat;
use quantreg_core::{utils, ExecutionStrategy};
use quantreg_fit::SingleFit;
use serde::Serialize;
use tracing::{debug, instrument};

/// Summary statistics of one residual vector
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct ResidualStats {
    pub min: f64,
    pub max: f64,
    /// Upper middle element for even lengths
    pub median: f64,
    pub mean: f64,
    /// Population standard deviation
    pub std_dev: f64,
}

impl ResidualStats {
    /// Compute statistics over `residuals`; all zeros when empty
    pub fn from_residuals(residuals: &[f64]) -> Self {
        if residuals.is_empty() {
            return Self::default();
        }
        let sorted = utils::sorted(residuals);
        Self {
            min: sorted[0],
            max: sorted[sorted.len() - 1],
            median: utils::upper_median_sorted(&sorted),
            mean: utils::mean(residuals),
            std_dev: utils::population_std_dev(residuals),
        }
    }
}

/// Count order flips between two sequences of equal length
///
/// Index k ≥ 1 counts when `a` moves from at-or-below `b` to strictly above
/// it, or from at-or-above to strictly below. Sequences of different lengths
/// have no comparable points and yield 0.
pub fn count_crossings(a: &[f64], b: &[f64]) -> usize {
    if a.len() != b.len() {
        return 0;
    }
    a.windows(2)
        .zip(b.windows(2))
        .filter(|(wa, wb)| {
            (wa[0] <= wb[0] && wa[1] > wb[1]) || (wa[0] >= wb[0] && wa[1] < wb[1])
        })
        .count()
}

/// Symmetric matrix of pairwise crossing counts with a zero diagonal
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CrossingMatrix {
    size: usize,
    counts: Vec<usize>,
}

impl CrossingMatrix {
    /// Build the matrix over a list of fitted sequences
    pub fn from_sequences(sequences: &[&[f64]]) -> Self {
        let size = sequences.len();
        let mut counts = vec![0; size * size];
        for i in 0..size {
            for j in (i + 1)..size {
                let c = count_crossings(sequences[i], sequences[j]);
                counts[i * size + j] = c;
                counts[j * size + i] = c;
            }
        }
        Self { size, counts }
    }

    /// Number of rows (and columns)
    pub fn size(&self) -> usize {
        self.size
    }

    /// Crossings between sequences `i` and `j`
    ///
    /// # Panics
    ///
    /// Panics if either index is out of bounds.
    pub fn get(&self, i: usize, j: usize) -> usize {
        assert!(i < self.size && j < self.size, "crossing index out of bounds");
        self.counts[i * self.size + j]
    }

    /// Row `i` of the matrix
    pub fn row(&self, i: usize) -> &[usize] {
        &self.counts[i * self.size..(i + 1) * self.size]
    }

    /// Total crossings over distinct pairs (upper triangle)
    pub fn total(&self) -> usize {
        (0..self.size)
            .flat_map(|i| ((i + 1)..self.size).map(move |j| (i, j)))
            .map(|(i, j)| self.counts[i * self.size + j])
            .sum()
    }

    /// Nested-vector copy of the matrix
    pub fn to_rows(&self) -> Vec<Vec<usize>> {
        (0..self.size).map(|i| self.row(i).to_vec()).collect()
    }
}

/// Pseudo-R² of a single fit
///
/// 1 − Σ|rᵢ| / Σ|fittedᵢ − m| where m is the upper median of the residuals.
/// Returns 0 when the denominator is exactly zero.
pub fn pseudo_r_squared(fit: &SingleFit) -> f64 {
    let residuals = fit.residuals();
    let median = utils::upper_median(residuals);

    let numerator: f64 = residuals.iter().map(|r| r.abs()).sum();
    let denominator: f64 = fit.fitted().iter().map(|f| (f - median).abs()).sum();

    if denominator == 0.0 {
        0.0
    } else {
        1.0 - numerator / denominator
    }
}

/// Diagnostics computed over a multi-quantile fit
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Diagnostics {
    pseudo_r_squared: f64,
    residual_stats: Vec<(f64, ResidualStats)>,
    crossings: CrossingMatrix,
}

impl Diagnostics {
    /// Pseudo-R² of the τ = 0.5 fit, 0 when that level was not fitted
    pub fn pseudo_r_squared(&self) -> f64 {
        self.pseudo_r_squared
    }

    /// Residual statistics for exactly this quantile level
    pub fn residual_stats(&self, tau: f64) -> Option<&ResidualStats> {
        self.residual_stats
            .iter()
            .find(|(t, _)| OrderedFloat(*t) == OrderedFloat(tau))
            .map(|(_, stats)| stats)
    }

    /// (τ, statistics) pairs in ascending τ order
    pub fn all_residual_stats(&self) -> &[(f64, ResidualStats)] {
        &self.residual_stats
    }

    /// Pairwise crossing counts, indexed in ascending τ order
    pub fn crossings(&self) -> &CrossingMatrix {
        &self.crossings
    }
}

/// Compute diagnostics sequentially
pub fn compute_diagnostics(multi: &MultiFit) -> Diagnostics {
    compute_diagnostics_with(multi, ExecutionStrategy::Sequential)
}

/// Compute diagnostics, spreading the per-τ residual statistics over
/// `strategy`
#[instrument(skip(multi), fields(levels = multi.len(), n = multi.n()))]
pub fn compute_diagnostics_with(multi: &MultiFit, strategy: ExecutionStrategy) -> Diagnostics {
    let fits = multi.fits();

    let stats = strategy.execute_batch(fits.len(), |i| {
        ResidualStats::from_residuals(fits[i].residuals())
    });
    let residual_stats: Vec<(f64, ResidualStats)> =
        multi.taus().iter().copied().zip(stats).collect();

    let sequences: Vec<&[f64]> = fits.iter().map(SingleFit::fitted).collect();
    let crossings = CrossingMatrix::from_sequences(&sequences);

    let pseudo_r_squared = multi.get(0.5).map(pseudo_r_squared).unwrap_or(0.0);

    debug!(
        total_crossings = crossings.total(),
        pseudo_r_squared, "diagnostics computed"
    );

    Diagnostics {
        pseudo_r_squared,
        residual_stats,
        crossings,
    }
}
