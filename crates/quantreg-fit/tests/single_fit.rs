//! Integration tests for single-quantile linear and non-linear fits

mod common;

use anyhow::Result;
use common::*;
use quantreg_core::{check_loss, CsrMatrix};
use quantreg_fit::prelude::*;
use quantreg_fit::{FitMethod, SharedModel};
use std::sync::Arc;

#[test]
fn test_reference_linear_fit_stays_modest() -> Result<()> {
    init_tracing();
    let (y, x) = reference_data();

    let fit = fit_linear(&y, &x, 0.5)?;
    assert_eq!(fit.n(), 5);
    assert_eq!(fit.p(), 2);
    assert_eq!(fit.method(), FitMethod::Linear);
    assert!(fit
        .coefficients()
        .iter()
        .all(|c| c.is_finite() && c.abs() < 10.0));
    assert_residual_identity(&fit, &y);
    Ok(())
}

#[test]
fn test_more_iterations_approach_noise_free_line() -> Result<()> {
    init_tracing();
    let x: Vec<Vec<f64>> = [0.0, 0.5, 1.0, 1.5, 2.0].iter().map(|&v| vec![1.0, v]).collect();
    let y: Vec<f64> = x.iter().map(|r| 1.0 + 2.0 * r[1]).collect();

    let short = LinearSolver::new(SolverConfig::default().with_max_iterations(50)).fit(&y, &x, 0.5)?;
    let full = fit_linear(&y, &x, 0.5)?;

    let error = |c: &[f64]| (c[0] - 1.0).abs() + (c[1] - 2.0).abs();
    assert!(error(full.coefficients()) < error(short.coefficients()));
    assert_abs_diff_eq!(full.coefficients()[0], 1.0, epsilon = 0.05);
    assert_abs_diff_eq!(full.coefficients()[1], 2.0, epsilon = 0.05);
    Ok(())
}

#[test]
fn test_noisy_data_fit_properties() -> Result<()> {
    init_tracing();
    let (y, x) = noisy_line(40, 1.0, 0.5, 0.2, 42);

    for tau in [0.1, 0.5, 0.9] {
        let fit = fit_linear(&y, &x, tau)?;
        assert_residual_identity(&fit, &y);

        let objective: f64 = fit.residuals().iter().map(|&r| check_loss(r, tau)).sum();
        assert_abs_diff_eq!(fit.check_loss(), objective, epsilon = 1e-9);
        assert!(fit.convergence().iterations <= SolverConfig::default().max_iterations);
    }
    Ok(())
}

#[test]
fn test_sparse_design_matches_dense() -> Result<()> {
    // Indicator columns give a mostly-zero design
    let x: Vec<Vec<f64>> = (0..12)
        .map(|i| {
            let mut row = vec![0.0; 4];
            row[i % 4] = 1.0;
            row
        })
        .collect();
    let y: Vec<f64> = (0..12).map(|i| (i % 4) as f64 + 0.1 * i as f64).collect();

    let csr = CsrMatrix::from_rows(&x)?;
    assert_eq!(csr.nnz(), 12);

    let solver = LinearSolver::default();
    let dense = solver.fit(&y, &x, 0.5)?;
    let sparse = solver.fit_sparse(&y, &csr, 0.5)?;
    assert_eq!(dense.coefficients(), sparse.coefficients());
    assert_eq!(dense.fitted(), sparse.fitted());
    Ok(())
}

#[test]
fn test_exponential_model_recovery() -> Result<()> {
    init_tracing();
    let (y, x) = exponential_data();

    let fit = fit_nonlinear(&y, &x, exponential_model(), &[0.5, 0.1], 0.5)?;
    assert_eq!(fit.method(), FitMethod::NonLinear);
    assert_eq!(fit.p(), 2);
    assert_abs_diff_eq!(fit.coefficients()[0], 1.0, epsilon = 0.1);
    assert_abs_diff_eq!(fit.coefficients()[1], 0.5, epsilon = 0.1);
    assert_residual_identity(&fit, &y);

    let preds = fit.predict(&[vec![0.0], vec![1.0]])?;
    assert_abs_diff_eq!(preds[0], fit.coefficients()[0], epsilon = 1e-12);
    Ok(())
}

#[test]
fn test_shared_model_reused_across_levels() -> Result<()> {
    let (y, x) = exponential_data();
    let model: SharedModel = Arc::new(exponential_model());
    let solver = NonLinearSolver::default();

    let low = solver.fit(&y, &x, &model, &[0.5, 0.1], 0.25)?;
    let high = solver.fit(&y, &x, &model, &[0.5, 0.1], 0.75)?;
    assert_ne!(low.coefficients(), high.coefficients());
    assert_eq!(Arc::strong_count(&model), 3);
    Ok(())
}

#[test]
fn test_out_of_range_tau_rejected_everywhere() {
    let (y, x) = reference_data();
    let (ey, ex) = exponential_data();

    for tau in [0.0, 1.0, -0.25, 1.25] {
        assert!(matches!(
            fit_linear(&y, &x, tau),
            Err(Error::InvalidTau { .. })
        ));
        assert!(matches!(
            fit_nonlinear(&ey, &ex, exponential_model(), &[0.5, 0.1], tau),
            Err(Error::InvalidTau { .. })
        ));
    }
}

#[test]
fn test_row_count_mismatch_rejected() {
    let (y, x) = reference_data();
    let (ey, ex) = exponential_data();

    assert!(matches!(
        fit_linear(&y[..4], &x, 0.5),
        Err(Error::DimensionMismatch { .. })
    ));
    assert!(matches!(
        fit_nonlinear(&ey, &ex[..3], exponential_model(), &[0.5, 0.1], 0.5),
        Err(Error::DimensionMismatch { .. })
    ));
}

#[test]
fn test_predict_validation() -> Result<()> {
    let (y, x) = reference_data();
    let fit = fit_linear(&y, &x, 0.5)?;

    assert!(matches!(
        fit.predict(&[vec![1.0, 2.0, 3.0]]),
        Err(Error::DimensionMismatch {
            expected: 2,
            actual: 3,
            ..
        })
    ));
    assert!(matches!(fit.predict(&[]), Err(Error::EmptyInput { .. })));
    assert_eq!(fit.predict(&[vec![1.0, 3.0]])?.len(), 1);
    Ok(())
}

#[test]
fn test_single_summary_header() -> Result<()> {
    let (y, x) = reference_data();
    let summary = fit_linear(&y, &x, 0.5)?.summary();
    let lines: Vec<&str> = summary.lines().collect();

    assert_eq!(lines[0], "Quantile Regression (tau = 0.50)");
    assert_eq!(lines[1], "Number of observations: 5");
    assert_eq!(lines[2], "Number of parameters: 2");
    assert_eq!(lines[3], "");
    assert_eq!(lines[4], "Coefficients:");
    assert!(lines[5].starts_with("  Beta[0]: "));
    assert!(lines.contains(&"Residual summary:"));

    let (ey, ex) = exponential_data();
    let nl = fit_nonlinear(&ey, &ex, exponential_model(), &[0.5, 0.1], 0.25)?;
    assert!(nl
        .summary()
        .starts_with("Non-linear Quantile Regression (tau = 0.25)\n"));
    Ok(())
}
