//! Bounded scalar minimisation.
//!
//! Brent's method on a closed interval: golden-section steps with
//! parabolic interpolation whenever the parabola is well behaved.
//! Used to trace the ridge of the momentum filter kernel.

use nvfig_types::error::{FigureError, FigureResult};

/// (3 − √5)/2.
const GOLDEN_MEAN: f64 = 0.381_966_011_250_105_1;

/// Default absolute x tolerance.
pub const DEFAULT_XTOL: f64 = 1e-5;

/// Default cap on objective evaluations.
pub const DEFAULT_MAX_EVALUATIONS: usize = 500;

#[derive(Debug, Clone, Copy)]
pub struct BoundedMinimum {
    pub x: f64,
    pub fx: f64,
    pub evaluations: usize,
    /// False when the evaluation cap stopped the search.
    pub converged: bool,
}

/// Minimise `f` on `[lower, upper]` with default tolerances.
pub fn minimize_bounded<F>(f: F, lower: f64, upper: f64) -> FigureResult<BoundedMinimum>
where
    F: Fn(f64) -> f64,
{
    minimize_bounded_with(f, lower, upper, DEFAULT_XTOL, DEFAULT_MAX_EVALUATIONS)
}

/// Minimise `f` on `[lower, upper]`.
///
/// Returns an error when the bounds are not finite or not ordered.
pub fn minimize_bounded_with<F>(
    f: F,
    lower: f64,
    upper: f64,
    xtol: f64,
    max_evaluations: usize,
) -> FigureResult<BoundedMinimum>
where
    F: Fn(f64) -> f64,
{
    if !(lower.is_finite() && upper.is_finite()) || lower > upper {
        return Err(FigureError::Config(format!(
            "Invalid minimisation bounds [{lower}, {upper}]"
        )));
    }
    if xtol <= 0.0 || max_evaluations == 0 {
        return Err(FigureError::Config(
            "xtol and max_evaluations must be positive".to_string(),
        ));
    }

    let sqrt_eps = f64::EPSILON.sqrt();
    let (mut a, mut b) = (lower, upper);

    let mut fulc = a + GOLDEN_MEAN * (b - a);
    let mut nfc = fulc;
    let mut xf = fulc;
    let mut rat: f64 = 0.0;
    let mut e: f64 = 0.0;

    let mut fx = f(xf);
    let mut evaluations = 1;
    let mut ffulc = fx;
    let mut fnfc = fx;

    let mut xm = 0.5 * (a + b);
    let mut tol1 = sqrt_eps * xf.abs() + xtol / 3.0;
    let mut tol2 = 2.0 * tol1;
    let mut converged = true;

    while (xf - xm).abs() > tol2 - 0.5 * (b - a) {
        let mut golden = true;

        if e.abs() > tol1 {
            // Try a parabolic step through the three best points.
            golden = false;
            let mut r = (xf - nfc) * (fx - ffulc);
            let mut q = (xf - fulc) * (fx - fnfc);
            let mut p = (xf - fulc) * q - (xf - nfc) * r;
            q = 2.0 * (q - r);
            if q > 0.0 {
                p = -p;
            }
            q = q.abs();
            r = e;
            e = rat;

            if p.abs() < (0.5 * q * r).abs() && p > q * (a - xf) && p < q * (b - xf) {
                rat = p / q;
                let x = xf + rat;
                if (x - a) < tol2 || (b - x) < tol2 {
                    rat = tol1 * step_sign(xm - xf);
                }
            } else {
                golden = true;
            }
        }

        if golden {
            e = if xf >= xm { a - xf } else { b - xf };
            rat = GOLDEN_MEAN * e;
        }

        let x = xf + step_sign(rat) * rat.abs().max(tol1);
        let fu = f(x);
        evaluations += 1;

        if fu <= fx {
            if x >= xf {
                a = xf;
            } else {
                b = xf;
            }
            fulc = nfc;
            ffulc = fnfc;
            nfc = xf;
            fnfc = fx;
            xf = x;
            fx = fu;
        } else {
            if x < xf {
                a = x;
            } else {
                b = x;
            }
            if fu <= fnfc || nfc == xf {
                fulc = nfc;
                ffulc = fnfc;
                nfc = x;
                fnfc = fu;
            } else if fu <= ffulc || fulc == xf || fulc == nfc {
                fulc = x;
                ffulc = fu;
            }
        }

        xm = 0.5 * (a + b);
        tol1 = sqrt_eps * xf.abs() + xtol / 3.0;
        tol2 = 2.0 * tol1;

        if evaluations >= max_evaluations {
            converged = false;
            break;
        }
    }

    Ok(BoundedMinimum {
        x: xf,
        fx,
        evaluations,
        converged,
    })
}

/// sign(v), with sign(0) = +1.
fn step_sign(v: f64) -> f64 {
    if v < 0.0 {
        -1.0
    } else {
        1.0
    }
}
