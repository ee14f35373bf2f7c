// ─────────────────────────────────────────────────────────────────────
// NV Figures — Property-Based Tests (proptest) for nvfig-math
// © 1998–2026 Miroslav Šotek. All rights reserved.
// Contact: www.anulum.li | protoscience@anulum.li
// ORCID: https://orcid.org/0009-0009-3560-0851
// License: GNU AGPL v3 | Commercial licensing available
// ─────────────────────────────────────────────────────────────────────
//! Property-based tests for nvfig-math using proptest.
//!
//! Covers: sweep length/monotonicity/endpoints, bounded minimisation,
//! linear least squares, noisy curve fitting.

use nvfig_math::fit::{curve_fit, polyfit_linear, CurveFitOptions};
use nvfig_math::optimize::minimize_bounded;
use nvfig_math::sweep::Sweep;
use proptest::prelude::*;
use rand::rngs::StdRng;
use rand::SeedableRng;
use rand_distr::{Distribution, Normal};

// ── Sweep Properties ─────────────────────────────────────────────────

proptest! {
    /// A sweep yields exactly `frame_count` values.
    #[test]
    fn sweep_length_matches(
        start in -100.0f64..100.0,
        end in -100.0f64..100.0,
        n in 1usize..500,
    ) {
        let sweep = Sweep::new(start, end, n).unwrap();
        prop_assert_eq!(sweep.values().len(), n);
        prop_assert_eq!(sweep.iter().count(), n);
    }

    /// Values are strictly monotonic in the direction of `end − start`.
    #[test]
    fn sweep_strictly_monotonic(
        start in -50.0f64..50.0,
        delta in prop_oneof![-50.0f64..-0.01, 0.01f64..50.0],
        n in 2usize..300,
    ) {
        let end = start + delta;
        let values = Sweep::new(start, end, n).unwrap().values();
        for w in values.windows(2) {
            if delta > 0.0 {
                prop_assert!(w[1] > w[0], "not increasing: {} -> {}", w[0], w[1]);
            } else {
                prop_assert!(w[1] < w[0], "not decreasing: {} -> {}", w[0], w[1]);
            }
        }
    }

    /// First value is `start`; last is `end` for n ≥ 2.
    #[test]
    fn sweep_endpoints_exact(
        start in -10.0f64..10.0,
        end in -10.0f64..10.0,
        n in 2usize..100,
    ) {
        let values = Sweep::new(start, end, n).unwrap().values();
        prop_assert_eq!(values[0], start);
        prop_assert_eq!(values[n - 1], end);
    }

    /// Every value lies between start and end.
    #[test]
    fn sweep_values_bounded(
        start in -10.0f64..10.0,
        end in -10.0f64..10.0,
        n in 1usize..100,
    ) {
        let lo = start.min(end) - 1e-12;
        let hi = start.max(end) + 1e-12;
        for v in Sweep::new(start, end, n).unwrap().values() {
            prop_assert!(v >= lo && v <= hi, "{} outside [{}, {}]", v, lo, hi);
        }
    }

    /// Degenerate sweep: every value equals start.
    #[test]
    fn sweep_constant_when_start_eq_end(v in -10.0f64..10.0, n in 1usize..50) {
        for x in Sweep::new(v, v, n).unwrap().values() {
            prop_assert_eq!(x, v);
        }
    }

    /// Two identical sweeps are bit-identical.
    #[test]
    fn sweep_deterministic(start in -10.0f64..10.0, end in -10.0f64..10.0, n in 1usize..100) {
        let a = Sweep::new(start, end, n).unwrap().values();
        let b = Sweep::new(start, end, n).unwrap().values();
        let a_bits: Vec<u64> = a.iter().map(|v| v.to_bits()).collect();
        let b_bits: Vec<u64> = b.iter().map(|v| v.to_bits()).collect();
        prop_assert_eq!(a_bits, b_bits);
    }
}

// ── Bounded Minimisation ─────────────────────────────────────────────

proptest! {
    /// Interior parabola minimum is found within tolerance.
    #[test]
    fn minimize_finds_parabola_vertex(c in -4.0f64..4.0, k in 0.1f64..10.0) {
        let m = minimize_bounded(|x| k * (x - c).powi(2), -5.0, 5.0).unwrap();
        prop_assert!((m.x - c).abs() < 1e-4, "x = {}, c = {}", m.x, c);
    }

    /// Result always lies inside the bounds.
    #[test]
    fn minimize_stays_in_bounds(c in -20.0f64..20.0, lo in -3.0f64..0.0, width in 0.5f64..6.0) {
        let hi = lo + width;
        let m = minimize_bounded(|x| (x - c).powi(2), lo, hi).unwrap();
        prop_assert!(m.x >= lo && m.x <= hi);
    }

    /// Momentum kernel ridge: argmax q³e^{−2qd} = 3/(2d) for interior peaks.
    #[test]
    fn minimize_momentum_ridge(d in 0.2f64..2.5) {
        let m = minimize_bounded(|q| -(q.powi(3) * (-2.0 * q * d).exp()), 0.5, 8.0).unwrap();
        prop_assert!((m.x - 1.5 / d).abs() < 1e-3, "d = {}, q = {}", d, m.x);
    }
}

// ── Least Squares ────────────────────────────────────────────────────

proptest! {
    /// polyfit recovers any exact line.
    #[test]
    fn polyfit_recovers_line(slope in -5.0f64..5.0, intercept in -5.0f64..5.0, n in 2usize..50) {
        let x: Vec<f64> = (0..n).map(|i| i as f64 * 0.3 - 2.0).collect();
        let y: Vec<f64> = x.iter().map(|v| slope * v + intercept).collect();
        let fit = polyfit_linear(&x, &y).unwrap();
        prop_assert!((fit.slope - slope).abs() < 1e-9);
        prop_assert!((fit.intercept - intercept).abs() < 1e-9);
    }
}

#[test]
fn noisy_stretched_exponential_within_three_sigma() {
    let model = |t: f64, p: &[f64]| p[0] * (-(t / p[1]).powf(p[2])).exp();
    let truth = [0.8, 600.0, 0.75];
    let mut rng = StdRng::seed_from_u64(0xC0FFEE);
    let noise = Normal::new(0.0, 0.01).unwrap();

    let t: Vec<f64> = (1..=60).map(|i| i as f64 * 50.0).collect();
    let y: Vec<f64> = t
        .iter()
        .map(|&ti| model(ti, &truth) + noise.sample(&mut rng))
        .collect();
    let sigma = vec![0.01; t.len()];

    let fit = curve_fit(
        model,
        &t,
        &y,
        Some(&sigma),
        &[0.8, 1475.0, 1.0],
        CurveFitOptions::default(),
    )
    .unwrap();

    for k in 0..3 {
        let err = (fit.params[k] - truth[k]).abs();
        assert!(
            err < 4.0 * fit.uncertainties[k] + 1e-9,
            "param {k}: fit {} ± {}, truth {}",
            fit.params[k],
            fit.uncertainties[k],
            truth[k]
        );
    }
    let chi2_red = fit.reduced_chi_squared(t.len());
    assert!(chi2_red > 0.3 && chi2_red < 3.0, "reduced chi2 = {chi2_red}");
}
