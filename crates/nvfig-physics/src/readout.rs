// ─────────────────────────────────────────────────────────────────────
// NV Figures — Photon-Counting Readout
// © 1998–2026 Miroslav Šotek. All rights reserved.
// Contact: www.anulum.li | protoscience@anulum.li
// ORCID: https://orcid.org/0009-0009-3560-0851
// License: GNU AGPL v3 | Commercial licensing available
// ─────────────────────────────────────────────────────────────────────
//! Shot-noise limited optical readout of NV spin states.
//!
//! Per readout: N = rate·t_ro photons, signal = C·N, noise = √N.
//! A difference measurement costs a further √2, so
//! SNR₁ = C·√N / √2 and reaching SNR_target takes (SNR_target/SNR₁)² readouts.

use nvfig_types::constants::{DIFFERENCE_MEASUREMENT_FACTOR, SECONDS_PER_MINUTE};
use nvfig_types::error::{FigureError, FigureResult};
use serde::{Deserialize, Serialize};

/// Acquisition system parameters.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AcquisitionParams {
    /// Detected photon rate [counts/s].
    pub photon_count_rate: f64,
    /// Readout window per shot [s].
    pub readout_time: f64,
    /// Spin-state contrast, 0 < C ≤ 1.
    pub contrast: f64,
}

impl AcquisitionParams {
    pub fn new(photon_count_rate: f64, readout_time: f64, contrast: f64) -> FigureResult<Self> {
        let params = AcquisitionParams {
            photon_count_rate,
            readout_time,
            contrast,
        };
        params.validate()?;
        Ok(params)
    }

    pub fn validate(&self) -> FigureResult<()> {
        if !(self.photon_count_rate.is_finite() && self.photon_count_rate > 0.0) {
            return Err(FigureError::Config(format!(
                "photon_count_rate must be finite and > 0, got {}",
                self.photon_count_rate
            )));
        }
        if !(self.readout_time.is_finite() && self.readout_time > 0.0) {
            return Err(FigureError::Config(format!(
                "readout_time must be finite and > 0, got {}",
                self.readout_time
            )));
        }
        if !(self.contrast.is_finite() && self.contrast > 0.0 && self.contrast <= 1.0) {
            return Err(FigureError::Config(format!(
                "contrast must lie in (0, 1], got {}",
                self.contrast
            )));
        }
        Ok(())
    }

    /// Expected photons per readout.
    pub fn photons_per_readout(&self) -> f64 {
        self.photon_count_rate * self.readout_time
    }

    /// Single-readout SNR of a difference measurement.
    pub fn snr_per_readout(&self) -> f64 {
        self.contrast * self.photons_per_readout().sqrt() / DIFFERENCE_MEASUREMENT_FACTOR
    }

    /// Readouts needed to average up to `target_snr` (not rounded).
    pub fn readouts_for_snr(&self, target_snr: f64) -> f64 {
        (target_snr / self.snr_per_readout()).powi(2)
    }

    /// Total wall time [s] to reach `target_snr`, counting the evolution
    /// time spent before every readout.
    pub fn time_to_snr(&self, evolution_time: f64, target_snr: f64) -> f64 {
        let n = self.readouts_for_snr(target_snr);
        n * evolution_time + n * self.readout_time
    }
}

/// A labelled acquisition configuration drawn as one curve.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AcquisitionPreset {
    pub label: String,
    pub params: AcquisitionParams,
}

impl AcquisitionPreset {
    fn new(label: &str, rate: f64, contrast: f64) -> Self {
        AcquisitionPreset {
            label: label.to_string(),
            params: AcquisitionParams {
                photon_count_rate: rate,
                readout_time: 1e-6,
                contrast,
            },
        }
    }

    /// The three curves of the averaging-time figure.
    pub fn standard_set() -> Vec<Self> {
        vec![
            Self::new("50k cps, 30% contrast (single NV)", 50e3, 0.30),
            Self::new(
                "200k cps, 30% contrast (single NV - Pillared)",
                200e3,
                0.30,
            ),
            Self::new("1.5M cps, 8% contrast (L035 Ensemble)", 1500e3, 0.08),
        ]
    }

    /// `(evolution_time [ms], total averaging time [min])` samples.
    pub fn averaging_curve(&self, evolution_times: &[f64], target_snr: f64) -> Vec<(f64, f64)> {
        evolution_times
            .iter()
            .map(|&t| {
                (
                    t * 1e3,
                    self.params.time_to_snr(t, target_snr) / SECONDS_PER_MINUTE,
                )
            })
            .collect()
    }
}

/// Normalised PL levels of the readout illustration.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct ReadoutLevels {
    /// m_s = 0 brightness.
    pub bright: f64,
    /// Level after partial population transfer.
    pub mid: f64,
    /// Fully transferred level, 1 − C.
    pub dark: f64,
}

impl ReadoutLevels {
    pub fn new(contrast: f64, mid: f64) -> FigureResult<Self> {
        let dark = 1.0 - contrast;
        if !(contrast > 0.0 && contrast <= 1.0) {
            return Err(FigureError::Config(format!(
                "contrast must lie in (0, 1], got {contrast}"
            )));
        }
        if !(mid > dark && mid < 1.0) {
            return Err(FigureError::Config(format!(
                "mid level {mid} must lie strictly between {dark} and 1"
            )));
        }
        Ok(ReadoutLevels {
            bright: 1.0,
            mid,
            dark,
        })
    }

    /// Span between bright and mid.
    pub fn p1(&self) -> f64 {
        self.bright - self.mid
    }

    /// Span between mid and dark.
    pub fn p0(&self) -> f64 {
        self.mid - self.dark
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_snr_example_finite_positive() {
        let p = AcquisitionParams::new(1e6, 1e-3, 0.3).unwrap();
        assert!((p.photons_per_readout() - 1000.0).abs() < 1e-9);
        let snr = p.snr_per_readout();
        assert!(snr.is_finite() && snr > 0.0);
        // 0.3·√1000/√2
        assert!((snr - 0.3 * 1000.0_f64.sqrt() / 2.0_f64.sqrt()).abs() < 1e-12);
    }

    #[test]
    fn test_time_to_snr_closed_form() {
        let p = AcquisitionParams::new(50e3, 1e-6, 0.3).unwrap();
        // N = 0.05, SNR₁ = 0.3·√0.05/√2 = 0.3·0.158113…
        let n = p.readouts_for_snr(5.0);
        let expected_n = (5.0 / (0.3 * 0.05_f64.sqrt() / 2.0_f64.sqrt())).powi(2);
        assert!((n - expected_n).abs() / expected_n < 1e-12);
        let t = p.time_to_snr(1e-3, 5.0);
        assert!((t - n * (1e-3 + 1e-6)).abs() / t < 1e-12);
    }

    #[test]
    fn test_time_grows_linearly_with_evolution() {
        let p = AcquisitionParams::new(200e3, 1e-6, 0.3).unwrap();
        let t0 = p.time_to_snr(0.0, 5.0);
        let t1 = p.time_to_snr(0.01, 5.0);
        let t2 = p.time_to_snr(0.02, 5.0);
        assert!(((t2 - t1) - (t1 - t0)).abs() / t2 < 1e-12);
    }

    #[test]
    fn test_brighter_preset_is_faster() {
        let presets = AcquisitionPreset::standard_set();
        assert_eq!(presets.len(), 3);
        let slow = presets[0].params.time_to_snr(0.05, 5.0);
        let fast = presets[1].params.time_to_snr(0.05, 5.0);
        assert!(fast < slow);
    }

    #[test]
    fn test_averaging_curve_units() {
        let preset = &AcquisitionPreset::standard_set()[0];
        let curve = preset.averaging_curve(&[0.1], 5.0);
        assert!((curve[0].0 - 100.0).abs() < 1e-12);
        let minutes = preset.params.time_to_snr(0.1, 5.0) / 60.0;
        assert!((curve[0].1 - minutes).abs() < 1e-9);
    }

    #[test]
    fn test_invalid_params() {
        assert!(AcquisitionParams::new(0.0, 1e-6, 0.3).is_err());
        assert!(AcquisitionParams::new(1e6, -1.0, 0.3).is_err());
        assert!(AcquisitionParams::new(1e6, 1e-6, 1.5).is_err());
        assert!(AcquisitionParams::new(f64::NAN, 1e-6, 0.3).is_err());
    }

    #[test]
    fn test_readout_levels() {
        let levels = ReadoutLevels::new(0.30, 0.93).unwrap();
        assert!((levels.dark - 0.70).abs() < 1e-12);
        assert!((levels.p1() - 0.07).abs() < 1e-12);
        assert!((levels.p0() - 0.23).abs() < 1e-12);
        assert!(ReadoutLevels::new(0.30, 0.5).is_err());
    }
}
