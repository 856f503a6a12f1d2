//! Shared utilities for integration tests

#![allow(dead_code)]

use quantreg_fit::{FnModel, NonLinearModel, SingleFit};
use rand::prelude::*;
use rand_chacha::ChaCha8Rng;
use rand_distr::Normal;

pub use approx::assert_abs_diff_eq;

/// Install a test-writer subscriber once; `RUST_LOG=debug` shows solver logs
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

/// The five-point reference dataset with an intercept column
pub fn reference_data() -> (Vec<f64>, Vec<Vec<f64>>) {
    let x = vec![
        vec![1.0, 0.5],
        vec![1.0, 1.0],
        vec![1.0, 1.5],
        vec![1.0, 2.0],
        vec![1.0, 2.5],
    ];
    let y = vec![1.0, 2.0, 2.5, 3.0, 4.0];
    (y, x)
}

/// y = 1 · exp(0.5 · x) at x ∈ {0, 0.5, 1, 1.5, 2}
pub fn exponential_data() -> (Vec<f64>, Vec<Vec<f64>>) {
    let x: Vec<Vec<f64>> = [0.0, 0.5, 1.0, 1.5, 2.0].iter().map(|&v| vec![v]).collect();
    let y = x.iter().map(|r| (0.5 * r[0]).exp()).collect();
    (y, x)
}

/// f(β, x) = β₀ · exp(β₁ · x₀)
pub fn exponential_model() -> impl NonLinearModel + 'static {
    FnModel::new(
        |b: &[f64], x: &[f64]| b[0] * (b[1] * x[0]).exp(),
        |b: &[f64], x: &[f64], out: &mut [f64]| {
            let e = (b[1] * x[0]).exp();
            out[0] = e;
            out[1] = b[0] * x[0] * e;
        },
    )
    .named("exponential")
}

/// Seeded noisy line y = intercept + slope · x + ε over x ∈ [0, 1)
pub fn noisy_line(
    n: usize,
    intercept: f64,
    slope: f64,
    noise: f64,
    seed: u64,
) -> (Vec<f64>, Vec<Vec<f64>>) {
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    let normal = Normal::new(0.0, noise).unwrap();

    let x: Vec<Vec<f64>> = (0..n).map(|_| vec![1.0, rng.gen::<f64>()]).collect();
    let y = x
        .iter()
        .map(|row| intercept + slope * row[1] + normal.sample(&mut rng))
        .collect();
    (y, x)
}

/// Assert the residual definition and lengths of a fit
pub fn assert_residual_identity(fit: &SingleFit, y: &[f64]) {
    assert_eq!(fit.fitted().len(), fit.n());
    assert_eq!(fit.residuals().len(), fit.n());
    assert_eq!(y.len(), fit.n());
    for i in 0..y.len() {
        assert_eq!(fit.residuals()[i], y[i] - fit.fitted()[i]);
        assert_abs_diff_eq!(
            fit.fitted()[i] + fit.residuals()[i],
            y[i],
            epsilon = 1e-12 * y[i].abs().max(1.0)
        );
    }
}
