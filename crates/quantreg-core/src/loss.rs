//! Check (tilted absolute deviation) loss
//!
//! For a residual `u` and quantile level τ:
//!
//! - ρ_τ(u) = τ·u       if u ≥ 0 (under-prediction)
//! - ρ_τ(u) = (τ−1)·u   if u < 0 (over-prediction)
//!
//! The loss is convex and piecewise linear with a kink at zero. Both solvers
//! use the one-sided subgradient from [`subgradient_weight`], so a residual of
//! exactly zero is treated the same as an over-prediction.

/// Check loss for a single residual
#[inline]
pub fn check_loss(residual: f64, tau: f64) -> f64 {
    if residual >= 0.0 {
        tau * residual
    } else {
        (tau - 1.0) * residual
    }
}

/// Multiplier applied to ∂fit/∂β_j for one observation
///
/// `τ − 1` when the residual is strictly positive, `τ` otherwise. Note this
/// equals ∂ρ_{1−τ}(y − fit)/∂fit rather than ∂ρ_τ(y − fit)/∂fit; descent with
/// it places low-τ fits above high-τ fits. Reported losses still use ρ_τ.
#[inline]
pub fn subgradient_weight(residual: f64, tau: f64) -> f64 {
    if residual > 0.0 {
        tau - 1.0
    } else {
        tau
    }
}

/// Sum of the check loss over all residuals
pub fn total_check_loss(residuals: &[f64], tau: f64) -> f64 {
    residuals.iter().map(|&r| check_loss(r, tau)).sum()
}
