//! Numerical primitives for NV Figures.

pub mod fit;
pub mod linalg;
pub mod optimize;
pub mod sweep;
