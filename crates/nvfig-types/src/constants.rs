// ─────────────────────────────────────────────────────────────────────
// NV Figures — Constants
// © 1998–2026 Miroslav Šotek. All rights reserved.
// Contact: www.anulum.li | protoscience@anulum.li
// ORCID: https://orcid.org/0009-0009-3560-0851
// License: GNU AGPL v3 | Commercial licensing available
// ─────────────────────────────────────────────────────────────────────
/// FWHM = 2·sqrt(2·ln 2)·σ for a Gaussian.
pub const FWHM_PER_SIGMA: f64 = 2.354_820_045_030_949;

/// Noise penalty of a difference (signal − reference) measurement.
pub const DIFFERENCE_MEASUREMENT_FACTOR: f64 = std::f64::consts::SQRT_2;

/// Magic angle arccos(1/√3) in degrees, rounded as used on the figures.
pub const MAGIC_ANGLE_DEG: f64 = 54.7;

pub const SECONDS_PER_MINUTE: f64 = 60.0;

/// Typographic points per inch; font sizes are given in points.
pub const POINTS_PER_INCH: f64 = 72.0;

pub const NANOMETRE: f64 = 1e-9;
pub const MICROMETRE: f64 = 1e-6;
pub const MILLIMETRE: f64 = 1e-3;
