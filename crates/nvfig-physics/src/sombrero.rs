// ─────────────────────────────────────────────────────────────────────
// NV Figures — Sombrero Potential
// © 1998–2026 Miroslav Šotek. All rights reserved.
// Contact: www.anulum.li | protoscience@anulum.li
// ORCID: https://orcid.org/0009-0009-3560-0851
// License: GNU AGPL v3 | Commercial licensing available
// ─────────────────────────────────────────────────────────────────────
//! Quartic "Mexican hat" potential for spontaneous symmetry breaking.
//!
//! V(r) = s·p·r² + λ·r⁴, r² = φ₁² + φ₂²
//!
//! Two sign conventions appear on the figures:
//! - `Direct` (s = +1, p = μ): hump for μ > 0, ring valley for μ < 0.
//! - `Inverted` (s = −1, p = μ²): symmetric for μ² < 0, broken for μ² > 0.

use ndarray::Array2;
use nvfig_types::state::Mesh2D;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum QuadraticConvention {
    Direct,
    Inverted,
}

impl QuadraticConvention {
    fn sign(self) -> f64 {
        match self {
            QuadraticConvention::Direct => 1.0,
            QuadraticConvention::Inverted => -1.0,
        }
    }
}

/// Smooth height cutoff: V·σ((V − height)/smoothness), hidden below `floor`.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct SoftCutoff {
    pub height: f64,
    pub smoothness: f64,
    /// Mask values below this become NaN.
    pub floor: f64,
}

impl Default for SoftCutoff {
    fn default() -> Self {
        SoftCutoff {
            height: 3.0,
            smoothness: 0.5,
            floor: 0.01,
        }
    }
}

impl SoftCutoff {
    /// 1 well below the cutoff height, 0 well above.
    pub fn mask(&self, v: f64) -> f64 {
        1.0 / (1.0 + ((v - self.height) / self.smoothness).exp())
    }

    pub fn apply(&self, v: f64) -> f64 {
        let mask = self.mask(v);
        if mask < self.floor {
            f64::NAN
        } else {
            v * mask
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct SombreroPotential {
    pub convention: QuadraticConvention,
    /// Quartic coupling λ.
    pub lambda: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cutoff: Option<SoftCutoff>,
}

impl SombreroPotential {
    /// V = μ r² + r⁴.
    pub fn hump_to_valley() -> Self {
        SombreroPotential {
            convention: QuadraticConvention::Direct,
            lambda: 1.0,
            cutoff: None,
        }
    }

    /// V = −μ² r² + ½ r⁴ with the default soft cutoff.
    pub fn symmetry_breaking() -> Self {
        SombreroPotential {
            convention: QuadraticConvention::Inverted,
            lambda: 0.5,
            cutoff: Some(SoftCutoff::default()),
        }
    }

    /// Raw potential at squared radius `r_sq` (no cutoff).
    pub fn potential(&self, param: f64, r_sq: f64) -> f64 {
        self.convention.sign() * param * r_sq + self.lambda * r_sq * r_sq
    }

    /// Potential as displayed, after the optional cutoff.
    pub fn displayed(&self, param: f64, r_sq: f64) -> f64 {
        let v = self.potential(param, r_sq);
        match &self.cutoff {
            Some(c) => c.apply(v),
            None => v,
        }
    }

    /// Evaluate the displayed potential over a mesh.
    pub fn field(&self, mesh: &Mesh2D, param: f64) -> Array2<f64> {
        mesh.radius_squared().mapv(|r_sq| self.displayed(param, r_sq))
    }

    /// Effective r² coefficient, s·p. Negative means broken symmetry.
    pub fn mass_term(&self, param: f64) -> f64 {
        self.convention.sign() * param
    }

    /// Radius of the potential minimum.
    ///
    /// sqrt(−s·p / 2λ) in the broken phase, 0 otherwise, NaN when λ ≤ 0.
    pub fn vacuum_radius(&self, param: f64) -> f64 {
        if self.lambda <= 0.0 {
            return f64::NAN;
        }
        let m = self.mass_term(param);
        if m < 0.0 {
            (-m / (2.0 * self.lambda)).sqrt()
        } else {
            0.0
        }
    }

    /// Depth of the minimum, V(r_min). 0 in the symmetric phase.
    pub fn vacuum_energy(&self, param: f64) -> f64 {
        let r = self.vacuum_radius(param);
        self.potential(param, r * r)
    }

    pub fn is_broken(&self, param: f64) -> bool {
        self.mass_term(param) < 0.0
    }
}
