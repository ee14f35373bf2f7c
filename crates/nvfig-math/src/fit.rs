// ─────────────────────────────────────────────────────────────────────
// NV Figures — Least Squares
// © 1998–2026 Miroslav Šotek. All rights reserved.
// Contact: www.anulum.li | protoscience@anulum.li
// ORCID: https://orcid.org/0009-0009-3560-0851
// License: GNU AGPL v3 | Commercial licensing available
// ─────────────────────────────────────────────────────────────────────
//! Least-squares fitting.
//!
//! - `polyfit_linear`: degree-1 polynomial fit (log-log slopes).
//! - `curve_fit`: weighted Levenberg–Marquardt for nonlinear models with
//!   absolute sigma, returning the parameter covariance `(JᵀWJ)⁻¹`.

use ndarray::{Array1, Array2};
use nvfig_types::error::{FigureError, FigureResult};

use crate::linalg::{pinv_symmetric, solve_symmetric};

/// Relative eigenvalue cutoff for normal-equation solves.
const RCOND: f64 = 1e-15;

/// Result of a degree-1 polynomial fit `y = slope·x + intercept`.
#[derive(Debug, Clone, Copy)]
pub struct LinearFit {
    pub slope: f64,
    pub intercept: f64,
}

impl LinearFit {
    pub fn predict(&self, x: f64) -> f64 {
        self.slope * x + self.intercept
    }
}

/// Ordinary least-squares line through `(x, y)`.
pub fn polyfit_linear(x: &[f64], y: &[f64]) -> FigureResult<LinearFit> {
    if x.len() != y.len() {
        return Err(FigureError::Data(format!(
            "polyfit length mismatch: x={}, y={}",
            x.len(),
            y.len()
        )));
    }
    if x.len() < 2 {
        return Err(FigureError::Data(
            "polyfit needs at least 2 points".to_string(),
        ));
    }
    if x.iter().chain(y.iter()).any(|v| !v.is_finite()) {
        return Err(FigureError::Data("polyfit input is non-finite".to_string()));
    }

    let n = x.len() as f64;
    let mean_x = x.iter().sum::<f64>() / n;
    let mean_y = y.iter().sum::<f64>() / n;
    let mut sxx = 0.0;
    let mut sxy = 0.0;
    for (&xi, &yi) in x.iter().zip(y) {
        sxx += (xi - mean_x) * (xi - mean_x);
        sxy += (xi - mean_x) * (yi - mean_y);
    }
    if sxx == 0.0 {
        return Err(FigureError::Data(
            "polyfit x values have zero variance".to_string(),
        ));
    }

    let slope = sxy / sxx;
    Ok(LinearFit {
        slope,
        intercept: mean_y - slope * mean_x,
    })
}

/// Levenberg–Marquardt controls.
#[derive(Debug, Clone, Copy)]
pub struct CurveFitOptions {
    /// Cap on full model evaluations (residual vectors), Jacobian columns included.
    pub max_evaluations: usize,
    /// Stop when the relative χ² decrease falls below this.
    pub ftol: f64,
    /// Stop when the relative parameter step falls below this.
    pub xtol: f64,
    pub initial_lambda: f64,
}

impl Default for CurveFitOptions {
    fn default() -> Self {
        CurveFitOptions {
            max_evaluations: 10_000,
            ftol: 1.5e-8,
            xtol: 1.5e-8,
            initial_lambda: 1e-3,
        }
    }
}

/// Converged nonlinear fit.
#[derive(Debug, Clone)]
pub struct CurveFit {
    pub params: Vec<f64>,
    /// Parameter covariance; σ treated as absolute.
    pub covariance: Array2<f64>,
    /// One-sigma uncertainties, `sqrt(diag(covariance))`.
    pub uncertainties: Vec<f64>,
    pub chi_squared: f64,
    pub evaluations: usize,
}

impl CurveFit {
    pub fn reduced_chi_squared(&self, n_points: usize) -> f64 {
        let dof = n_points.saturating_sub(self.params.len()).max(1);
        self.chi_squared / dof as f64
    }
}

struct Problem<'a, F> {
    model: F,
    x: &'a [f64],
    y: &'a [f64],
    weights: Vec<f64>, // 1/σ
    evaluations: usize,
}

impl<'a, F> Problem<'a, F>
where
    F: Fn(f64, &[f64]) -> f64,
{
    fn residuals(&mut self, p: &[f64]) -> Array1<f64> {
        self.evaluations += 1;
        Array1::from_iter(
            self.x
                .iter()
                .zip(self.y)
                .zip(&self.weights)
                .map(|((&xi, &yi), &wi)| (yi - (self.model)(xi, p)) * wi),
        )
    }

    /// Forward-difference Jacobian of the weighted model, `[n, m]`.
    fn jacobian(&mut self, p: &[f64], r0: &Array1<f64>) -> Array2<f64> {
        let n = self.x.len();
        let m = p.len();
        let mut jac = Array2::zeros((n, m));
        let mut shifted = p.to_vec();
        for j in 0..m {
            let h = f64::EPSILON.sqrt() * p[j].abs().max(1e-8);
            shifted[j] = p[j] + h;
            let r1 = self.residuals(&shifted);
            shifted[j] = p[j];
            for i in 0..n {
                // r = (y − f)·w, so ∂(f·w)/∂p = −∂r/∂p
                jac[[i, j]] = -(r1[i] - r0[i]) / h;
            }
        }
        jac
    }
}

fn chi_squared(r: &Array1<f64>) -> f64 {
    r.iter().map(|v| v * v).sum()
}

/// Fit `model(x, params)` to `(x, y)` with optional absolute errors `sigma`.
pub fn curve_fit<F>(
    model: F,
    x: &[f64],
    y: &[f64],
    sigma: Option<&[f64]>,
    p0: &[f64],
    options: CurveFitOptions,
) -> FigureResult<CurveFit>
where
    F: Fn(f64, &[f64]) -> f64,
{
    let n = x.len();
    let m = p0.len();
    if y.len() != n {
        return Err(FigureError::Data(format!(
            "curve_fit length mismatch: x={n}, y={}",
            y.len()
        )));
    }
    if m == 0 || n < m {
        return Err(FigureError::Data(format!(
            "curve_fit needs at least as many points ({n}) as parameters ({m})"
        )));
    }
    let weights = match sigma {
        Some(s) => {
            if s.len() != n {
                return Err(FigureError::Data(format!(
                    "curve_fit sigma length {} != {n}",
                    s.len()
                )));
            }
            if s.iter().any(|v| !v.is_finite() || *v <= 0.0) {
                return Err(FigureError::Data(
                    "curve_fit sigma must be finite and > 0".to_string(),
                ));
            }
            s.iter().map(|v| 1.0 / v).collect()
        }
        None => vec![1.0; n],
    };

    let mut problem = Problem {
        model,
        x,
        y,
        weights,
        evaluations: 0,
    };

    let mut p = p0.to_vec();
    let mut r = problem.residuals(&p);
    let mut chi2 = chi_squared(&r);
    if !chi2.is_finite() {
        return Err(FigureError::FitFailed {
            iterations: 0,
            message: "model is non-finite at the initial guess".to_string(),
        });
    }

    let mut lambda = options.initial_lambda;
    let mut iterations = 0;

    'outer: loop {
        iterations += 1;
        let jac = problem.jacobian(&p, &r);
        let jtj = jac.t().dot(&jac);
        let jtr = jac.t().dot(&r);

        loop {
            if problem.evaluations >= options.max_evaluations {
                return Err(FigureError::FitFailed {
                    iterations,
                    message: format!(
                        "evaluation budget of {} exhausted (chi2 = {chi2:.6e})",
                        options.max_evaluations
                    ),
                });
            }

            let mut damped = jtj.clone();
            for k in 0..m {
                damped[[k, k]] += lambda * jtj[[k, k]].max(1e-12);
            }
            let delta = solve_symmetric(&damped, &jtr, RCOND)?;
            let trial: Vec<f64> = p.iter().zip(delta.iter()).map(|(a, d)| a + d).collect();
            let r_trial = problem.residuals(&trial);
            let chi2_trial = chi_squared(&r_trial);

            if chi2_trial.is_finite() && chi2_trial <= chi2 {
                let step_norm = delta.iter().map(|d| d * d).sum::<f64>().sqrt();
                let p_norm = p.iter().map(|v| v * v).sum::<f64>().sqrt();
                let rel_decrease = if chi2 > 0.0 {
                    (chi2 - chi2_trial) / chi2
                } else {
                    0.0
                };

                p = trial;
                r = r_trial;
                chi2 = chi2_trial;
                lambda = (lambda / 10.0).max(1e-12);

                if rel_decrease < options.ftol || step_norm < options.xtol * (p_norm + options.xtol)
                {
                    break 'outer;
                }
                break;
            }

            lambda *= 10.0;
            if lambda > 1e16 {
                // No downhill step left at any damping: p is a local minimum.
                break 'outer;
            }
        }
    }

    let jac = problem.jacobian(&p, &r);
    let covariance = pinv_symmetric(&jac.t().dot(&jac), RCOND)?;
    let uncertainties = (0..m).map(|k| covariance[[k, k]].max(0.0).sqrt()).collect();

    Ok(CurveFit {
        params: p,
        covariance,
        uncertainties,
        chi_squared: chi2,
        evaluations: problem.evaluations,
    })
}
