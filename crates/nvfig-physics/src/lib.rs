//! Closed-form physics models behind the NV figures.
//!
//! Field models: sombrero potential, momentum filter kernel.
//! Scalar models: photon-counting readout, Gaussian delta,
//! stretched-exponential relaxation.
//! Geometry/catalogues: accessible-field ellipsoid, length scales.

pub mod delta;
pub mod ellipsoid;
pub mod kernel;
pub mod length_scales;
pub mod readout;
pub mod relaxation;
pub mod sombrero;
