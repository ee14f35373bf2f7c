// ─────────────────────────────────────────────────────────────────────
// NV Figures — Gaussian Delta
// © 1998–2026 Miroslav Šotek. All rights reserved.
// Contact: www.anulum.li | protoscience@anulum.li
// ORCID: https://orcid.org/0009-0009-3560-0851
// License: GNU AGPL v3 | Commercial licensing available
// ─────────────────────────────────────────────────────────────────────
//! Gaussian approximation of a delta-function filter.
//!
//! δ(x) ≈ A·exp(−(x − c)² / 2σ²), parameterised by its full width at half
//! maximum so that the drawn width reads directly as 1/T₂*.

use nvfig_types::constants::FWHM_PER_SIGMA;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct GaussianDelta {
    pub center: f64,
    /// Full width at half maximum.
    pub fwhm: f64,
    #[serde(default = "default_amplitude")]
    pub amplitude: f64,
}

fn default_amplitude() -> f64 {
    1.0
}

impl GaussianDelta {
    pub fn new(center: f64, fwhm: f64, amplitude: f64) -> Self {
        GaussianDelta {
            center,
            fwhm,
            amplitude,
        }
    }

    pub fn sigma(&self) -> f64 {
        self.fwhm / FWHM_PER_SIGMA
    }

    pub fn value(&self, x: f64) -> f64 {
        let s = self.sigma();
        self.amplitude * (-(x - self.center).powi(2) / (2.0 * s * s)).exp()
    }

    pub fn sample(&self, xs: &[f64]) -> Vec<f64> {
        xs.iter().map(|&x| self.value(x)).collect()
    }

    /// x positions where the curve crosses A/2.
    pub fn half_max_crossings(&self) -> (f64, f64) {
        let half = 0.5 * self.fwhm;
        (self.center - half, self.center + half)
    }
}
