// ─────────────────────────────────────────────────────────────────────
// NV Figures — Accessible Field Ellipsoid
// © 1998–2026 Miroslav Šotek. All rights reserved.
// Contact: www.anulum.li | protoscience@anulum.li
// ORCID: https://orcid.org/0009-0009-3560-0851
// License: GNU AGPL v3 | Commercial licensing available
// ─────────────────────────────────────────────────────────────────────
//! Region of vector field reachable by the magnet system, an ellipsoid
//! with horizontal semi-axes (a, b) and vertical semi-axis c.

use std::f64::consts::PI;

use ndarray::Array2;
use nvfig_math::sweep::linspace;
use nvfig_types::constants::MAGIC_ANGLE_DEG;
use nvfig_types::state::AxisLimits;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct AccessibleField {
    pub a: f64,
    pub b: f64,
    pub c: f64,
}

impl Default for AccessibleField {
    fn default() -> Self {
        AccessibleField {
            a: 0.5,
            b: 0.5,
            c: 1.0,
        }
    }
}

/// Parametric surface, each array `[nu, nv]`.
#[derive(Debug, Clone)]
pub struct EllipsoidSurface {
    pub x: Array2<f64>,
    pub y: Array2<f64>,
    pub z: Array2<f64>,
}

impl EllipsoidSurface {
    /// (min, max) over the x, y and z arrays.
    pub fn extents(&self) -> [(f64, f64); 3] {
        [extent(&self.x), extent(&self.y), extent(&self.z)]
    }
}

fn extent(a: &Array2<f64>) -> (f64, f64) {
    a.iter().fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), &v| {
        (lo.min(v), hi.max(v))
    })
}

/// Circle of constant polar angle, drawn at ±z.
#[derive(Debug, Clone)]
pub struct LatitudeRing {
    pub angle_deg: f64,
    pub points: Vec<(f64, f64, f64)>,
}

impl LatitudeRing {
    /// Mirror image through the equatorial plane.
    pub fn mirrored(&self) -> Vec<(f64, f64, f64)> {
        self.points.iter().map(|&(x, y, z)| (x, y, -z)).collect()
    }
}

impl AccessibleField {
    /// u ∈ [0, 2π] (azimuth), v ∈ [0, π] (polar).
    pub fn surface(&self, nu: usize, nv: usize) -> EllipsoidSurface {
        let u = linspace(0.0, 2.0 * PI, nu);
        let v = linspace(0.0, PI, nv);
        EllipsoidSurface {
            x: Array2::from_shape_fn((nu, nv), |(i, j)| self.a * u[i].cos() * v[j].sin()),
            y: Array2::from_shape_fn((nu, nv), |(i, j)| self.b * u[i].sin() * v[j].sin()),
            z: Array2::from_shape_fn((nu, nv), |(_, j)| self.c * v[j].cos()),
        }
    }

    /// Ring at `angle_deg` from the vertical, enlarged by `scale`.
    pub fn ring(&self, angle_deg: f64, scale: f64, n: usize) -> LatitudeRing {
        let theta = angle_deg.to_radians();
        let z = scale * self.c * theta.cos();
        let points = linspace(0.0, 2.0 * PI, n)
            .into_iter()
            .map(|u| {
                (
                    scale * self.a * u.cos() * theta.sin(),
                    scale * self.b * u.sin() * theta.sin(),
                    z,
                )
            })
            .collect();
        LatitudeRing { angle_deg, points }
    }

    pub fn magic_angle_ring(&self, scale: f64, n: usize) -> LatitudeRing {
        self.ring(MAGIC_ANGLE_DEG, scale, n)
    }

    /// Cubic limits centred on the surface, half-range = half the largest extent.
    pub fn equal_axis_limits(surface: &EllipsoidSurface) -> AxisLimits {
        let ext = surface.extents();
        let half = ext
            .iter()
            .map(|(lo, hi)| hi - lo)
            .fold(0.0_f64, f64::max)
            * 0.5;
        let around = |(lo, hi): (f64, f64)| {
            let mid = 0.5 * (lo + hi);
            (mid - half, mid + half)
        };
        AxisLimits::new(around(ext[0]), around(ext[1]), around(ext[2]))
    }
}
