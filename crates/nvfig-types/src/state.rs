// ─────────────────────────────────────────────────────────────────────
// NV Figures — State
// © 1998–2026 Miroslav Šotek. All rights reserved.
// Contact: www.anulum.li | protoscience@anulum.li
// ORCID: https://orcid.org/0009-0009-3560-0851
// License: GNU AGPL v3 | Commercial licensing available
// ─────────────────────────────────────────────────────────────────────
use ndarray::{Array1, Array2};
use serde::{Deserialize, Serialize};

use crate::config::MeshSpec;

/// 2D evaluation mesh with precomputed meshgrid coordinates.
///
/// Built once per figure and shared read-only by every frame.
#[derive(Debug, Clone)]
pub struct Mesh2D {
    pub nx: usize,
    pub ny: usize,
    pub x: Array1<f64>,  // linspace(x_min, x_max, nx)
    pub y: Array1<f64>,  // linspace(y_min, y_max, ny)
    pub dx: f64,
    pub dy: f64,
    pub xx: Array2<f64>, // [ny, nx], rows follow y
    pub yy: Array2<f64>, // [ny, nx]
}

impl Mesh2D {
    pub fn new(nx: usize, ny: usize, x_min: f64, x_max: f64, y_min: f64, y_max: f64) -> Self {
        let x = Array1::linspace(x_min, x_max, nx);
        let y = Array1::linspace(y_min, y_max, ny);
        let dx = if nx > 1 { x[1] - x[0] } else { x_max - x_min };
        let dy = if ny > 1 { y[1] - y[0] } else { y_max - y_min };

        let xx = Array2::from_shape_fn((ny, nx), |(_, ix)| x[ix]);
        let yy = Array2::from_shape_fn((ny, nx), |(iy, _)| y[iy]);

        Mesh2D {
            nx,
            ny,
            x,
            y,
            dx,
            dy,
            xx,
            yy,
        }
    }

    pub fn from_spec(spec: &MeshSpec) -> Self {
        Self::new(spec.nx, spec.ny, spec.x.0, spec.x.1, spec.y.0, spec.y.1)
    }

    pub fn shape(&self) -> (usize, usize) {
        (self.ny, self.nx)
    }

    /// r² = x² + y² at every mesh node.
    pub fn radius_squared(&self) -> Array2<f64> {
        Array2::from_shape_fn(self.shape(), |(iy, ix)| {
            let x = self.x[ix];
            let y = self.y[iy];
            x * x + y * y
        })
    }

    /// Evaluate `f(x, y)` at every node.
    pub fn map<F>(&self, f: F) -> Array2<f64>
    where
        F: Fn(f64, f64) -> f64,
    {
        Array2::from_shape_fn(self.shape(), |(iy, ix)| f(self.x[ix], self.y[iy]))
    }

    pub fn x_range(&self) -> (f64, f64) {
        (self.x[0], self.x[self.nx - 1])
    }

    pub fn y_range(&self) -> (f64, f64) {
        (self.y[0], self.y[self.ny - 1])
    }
}

/// Fixed axis ranges of one figure or one whole sweep.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AxisLimits {
    pub x: (f64, f64),
    pub y: (f64, f64),
    pub z: (f64, f64),
}

impl AxisLimits {
    pub fn new(x: (f64, f64), y: (f64, f64), z: (f64, f64)) -> Self {
        AxisLimits { x, y, z }
    }

    /// Limits spanning the mesh in x/y with the given z range.
    pub fn for_mesh(mesh: &Mesh2D, z: (f64, f64)) -> Self {
        AxisLimits {
            x: mesh.x_range(),
            y: mesh.y_range(),
            z,
        }
    }

    pub fn z_span(&self) -> f64 {
        self.z.1 - self.z.0
    }

    /// Fraction of the z range covered by `value`, clamped to [0, 1].
    pub fn z_fraction(&self, value: f64) -> f64 {
        let span = self.z_span();
        if span.abs() < f64::EPSILON {
            return 0.5;
        }
        ((value - self.z.0) / span).clamp(0.0, 1.0)
    }

    pub fn contains_z(&self, value: f64) -> bool {
        value >= self.z.0 && value <= self.z.1
    }
}
