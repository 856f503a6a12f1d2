//! Utility functions for working with data slices

use ordered_float::OrderedFloat;

/// Sort data and return a new vector
///
/// Uses a total order, so NaN values go to the end.
///
/// # Examples
///
/// ```rust
/// use quantreg_core::utils::sorted;
///
/// let data = vec![3.0, 1.0, 5.0, 2.0, 4.0];
/// assert_eq!(sorted(&data), vec![1.0, 2.0, 3.0, 4.0, 5.0]);
/// ```
pub fn sorted(data: &[f64]) -> Vec<f64> {
    let mut sorted = data.to_vec();
    sorted.sort_by_key(|&v| OrderedFloat(v));
    sorted
}

/// Element at index ⌊n/2⌋ of an already sorted slice
///
/// For even n this is the upper of the two middle elements, not their
/// average. Returns 0.0 for an empty slice.
pub fn upper_median_sorted(sorted: &[f64]) -> f64 {
    sorted.get(sorted.len() / 2).copied().unwrap_or(0.0)
}

/// Upper median of unsorted data
///
/// # Examples
///
/// ```rust
/// use quantreg_core::utils::upper_median;
///
/// assert_eq!(upper_median(&[4.0, 1.0, 3.0, 2.0]), 3.0);
/// assert_eq!(upper_median(&[]), 0.0);
/// ```
pub fn upper_median(data: &[f64]) -> f64 {
    upper_median_sorted(&sorted(data))
}

/// Calculate the mean of a slice
///
/// Returns 0.0 for empty slices.
pub fn mean(data: &[f64]) -> f64 {
    if data.is_empty() {
        return 0.0;
    }
    let sum: f64 = data.iter().sum();
    sum / data.len() as f64
}

/// Population variance as Σv²/n − mean²
///
/// The single-pass formula can cancel to a tiny negative number for
/// near-constant data, so the result is clamped at zero.
pub fn population_variance(data: &[f64]) -> f64 {
    if data.is_empty() {
        return 0.0;
    }
    let n = data.len() as f64;
    let (sum, sum_sq) = data
        .iter()
        .fold((0.0, 0.0), |(s, sq), &v| (s + v, sq + v * v));
    let mean = sum / n;
    (sum_sq / n - mean * mean).max(0.0)
}

/// Population standard deviation, never NaN for finite input
pub fn population_std_dev(data: &[f64]) -> f64 {
    population_variance(data).sqrt()
}
