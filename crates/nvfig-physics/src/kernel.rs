// ─────────────────────────────────────────────────────────────────────
// NV Figures — Momentum Filter Kernel
// © 1998–2026 Miroslav Šotek. All rights reserved.
// Contact: www.anulum.li | protoscience@anulum.li
// ORCID: https://orcid.org/0009-0009-3560-0851
// License: GNU AGPL v3 | Commercial licensing available
// ─────────────────────────────────────────────────────────────────────
//! NV momentum-space filter function.
//!
//! An NV at stand-off distance d samples source currents through
//! F(q, d) = q³·e^{−2qd}. For fixed d the response peaks at q* = 3/(2d),
//! so the ridge has slope −1 in log-log space.

use ndarray::Array2;
use nvfig_math::fit::{polyfit_linear, LinearFit};
use nvfig_math::optimize::minimize_bounded;
use nvfig_math::sweep::linspace;
use nvfig_types::error::FigureResult;
use nvfig_types::state::Mesh2D;
use serde::{Deserialize, Serialize};

/// F(q, d) = q³ e^{−2qd}.
pub fn momentum_filter(q: f64, d: f64) -> f64 {
    q.powi(3) * (-2.0 * q * d).exp()
}

/// Analytic argmax over q: ∂F/∂q = 0 ⇒ q* = 3/(2d).
pub fn peak_momentum(d: f64) -> f64 {
    1.5 / d
}

/// Evaluate F over a mesh whose x axis is q and y axis is d.
pub fn filter_field(mesh: &Mesh2D) -> Array2<f64> {
    mesh.map(momentum_filter)
}

/// Bounds and resolution of the (q, d) plane.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct KernelDomain {
    pub q: (f64, f64),
    pub d: (f64, f64),
    pub nq: usize,
    pub nd: usize,
}

impl Default for KernelDomain {
    fn default() -> Self {
        KernelDomain {
            q: (0.5, 8.0),
            d: (0.5, 1.5),
            nq: 200,
            nd: 200,
        }
    }
}

impl KernelDomain {
    pub fn mesh(&self) -> Mesh2D {
        Mesh2D::new(self.nq, self.nd, self.q.0, self.q.1, self.d.0, self.d.1)
    }
}

/// Numerically traced maximum of F for each d.
#[derive(Debug, Clone)]
pub struct Ridge {
    pub d: Vec<f64>,
    pub q: Vec<f64>,
}

impl Ridge {
    /// Maximise F(·, d) on `q_bounds` for every d in `d_values`.
    pub fn trace(d_values: &[f64], q_bounds: (f64, f64)) -> FigureResult<Self> {
        let mut q = Vec::with_capacity(d_values.len());
        for &d in d_values {
            let m = minimize_bounded(|qq| -momentum_filter(qq, d), q_bounds.0, q_bounds.1)?;
            q.push(m.x);
        }
        Ok(Ridge {
            d: d_values.to_vec(),
            q,
        })
    }

    /// Trace over `domain.nd` evenly spaced d values.
    pub fn trace_domain(domain: &KernelDomain) -> FigureResult<Self> {
        let d_values = linspace(domain.d.0, domain.d.1, domain.nd);
        Self::trace(&d_values, domain.q)
    }

    /// Degree-1 fit of log10(d) against log10(q).
    pub fn log_log_fit(&self) -> FigureResult<LinearFit> {
        let log_q: Vec<f64> = self.q.iter().map(|v| v.log10()).collect();
        let log_d: Vec<f64> = self.d.iter().map(|v| v.log10()).collect();
        polyfit_linear(&log_q, &log_d)
    }

    pub fn points(&self) -> impl Iterator<Item = (f64, f64)> + '_ {
        self.q.iter().copied().zip(self.d.iter().copied())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_filter_values() {
        assert_eq!(momentum_filter(0.0, 1.0), 0.0);
        let expected = 8.0 * (-4.0_f64).exp();
        assert!((momentum_filter(2.0, 1.0) - expected).abs() < 1e-15);
    }

    #[test]
    fn test_peak_is_stationary() {
        let d = 0.8;
        let q = peak_momentum(d);
        let h = 1e-5;
        let slope = (momentum_filter(q + h, d) - momentum_filter(q - h, d)) / (2.0 * h);
        assert!(slope.abs() < 1e-8, "dF/dq at peak = {slope}");
    }

    #[test]
    fn test_ridge_matches_analytic() {
        let ridge = Ridge::trace_domain(&KernelDomain::default()).unwrap();
        assert_eq!(ridge.q.len(), 200);
        for (q, d) in ridge.points() {
            assert!((q - peak_momentum(d)).abs() < 1e-3, "d = {d}, q = {q}");
        }
    }

    #[test]
    fn test_ridge_slope_minus_one() {
        let ridge = Ridge::trace_domain(&KernelDomain::default()).unwrap();
        let fit = ridge.log_log_fit().unwrap();
        assert!((fit.slope + 1.0).abs() < 1e-3, "slope = {}", fit.slope);
    }

    #[test]
    fn test_ridge_clamped_at_bound() {
        // Peak at q = 3/(2·0.1) = 15 lies beyond q_max = 8.
        let ridge = Ridge::trace(&[0.1], (0.5, 8.0)).unwrap();
        assert!((ridge.q[0] - 8.0).abs() < 1e-3);
    }

    #[test]
    fn test_field_peak_row() {
        let domain = KernelDomain {
            nq: 151,
            nd: 3,
            ..KernelDomain::default()
        };
        let mesh = domain.mesh();
        let field = filter_field(&mesh);
        // Row d = 1.0: max near q = 1.5
        let row = field.row(1);
        let (imax, _) = row
            .iter()
            .enumerate()
            .fold((0, f64::MIN), |acc, (i, &v)| if v > acc.1 { (i, v) } else { acc });
        assert!((mesh.x[imax] - 1.5).abs() <= mesh.dx);
    }
}
