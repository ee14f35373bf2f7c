//! Linear algebra utilities.
//!
//! Jacobi eigendecomposition and pseudoinverse for the small symmetric
//! normal-equation matrices (2x2 to 4x4) that appear in curve fitting.

use ndarray::{Array1, Array2};
use nvfig_types::error::{FigureError, FigureResult};

const MAX_SWEEPS: usize = 100;

/// Eigendecomposition of a symmetric matrix by cyclic Jacobi rotations.
///
/// Returns `(eigenvalues, eigenvectors)` with eigenvectors stored as
/// columns, sorted by descending eigenvalue. A non-square input is a
/// [`FigureError::Data`].
pub fn symmetric_eigen(a: &Array2<f64>) -> FigureResult<(Array1<f64>, Array2<f64>)> {
    let n = a.nrows();
    if n != a.ncols() {
        return Err(FigureError::Data(format!(
            "symmetric_eigen needs a square matrix, got {}x{}",
            n,
            a.ncols()
        )));
    }

    let mut m = a.clone();
    let mut v = Array2::eye(n);

    for _ in 0..MAX_SWEEPS {
        let mut off_diag = 0.0;
        for i in 0..n {
            for j in (i + 1)..n {
                off_diag += m[[i, j]].abs();
            }
        }
        if off_diag < 1e-14 {
            break;
        }

        for i in 0..n {
            for j in (i + 1)..n {
                if m[[i, j]].abs() < 1e-300 {
                    continue;
                }
                let tau = (m[[j, j]] - m[[i, i]]) / (2.0 * m[[i, j]]);
                let t = if tau >= 0.0 {
                    1.0 / (tau + (1.0 + tau * tau).sqrt())
                } else {
                    -1.0 / (-tau + (1.0 + tau * tau).sqrt())
                };
                let cos = 1.0 / (1.0 + t * t).sqrt();
                let sin = t * cos;

                let mii = m[[i, i]];
                let mjj = m[[j, j]];
                let mij = m[[i, j]];
                m[[i, i]] = cos * cos * mii - 2.0 * sin * cos * mij + sin * sin * mjj;
                m[[j, j]] = sin * sin * mii + 2.0 * sin * cos * mij + cos * cos * mjj;
                m[[i, j]] = 0.0;
                m[[j, i]] = 0.0;

                for r in 0..n {
                    if r == i || r == j {
                        continue;
                    }
                    let ri = m[[r, i]];
                    let rj = m[[r, j]];
                    m[[r, i]] = cos * ri - sin * rj;
                    m[[i, r]] = m[[r, i]];
                    m[[r, j]] = sin * ri + cos * rj;
                    m[[j, r]] = m[[r, j]];
                }

                for r in 0..n {
                    let vi = v[[r, i]];
                    let vj = v[[r, j]];
                    v[[r, i]] = cos * vi - sin * vj;
                    v[[r, j]] = sin * vi + cos * vj;
                }
            }
        }
    }

    let mut order: Vec<usize> = (0..n).collect();
    order.sort_by(|&i, &j| {
        m[[j, j]]
            .partial_cmp(&m[[i, i]])
            .unwrap_or(std::cmp::Ordering::Equal)
    });

    let values = Array1::from_iter(order.iter().map(|&k| m[[k, k]]));
    let vectors = Array2::from_shape_fn((n, n), |(r, c)| v[[r, order[c]]]);
    Ok((values, vectors))
}

/// Pseudoinverse of a symmetric matrix.
///
/// Eigenvalues at or below `rcond · λ_max` are treated as zero.
pub fn pinv_symmetric(a: &Array2<f64>, rcond: f64) -> FigureResult<Array2<f64>> {
    let n = a.nrows();
    let (values, vectors) = symmetric_eigen(a)?;
    let lambda_max = values.iter().fold(0.0_f64, |acc, v| acc.max(v.abs()));
    let cutoff = rcond * lambda_max;

    let mut result = Array2::zeros((n, n));
    for k in 0..n {
        if values[k].abs() <= cutoff || values[k] == 0.0 {
            continue;
        }
        let inv = 1.0 / values[k];
        for i in 0..n {
            for j in 0..n {
                result[[i, j]] += vectors[[i, k]] * inv * vectors[[j, k]];
            }
        }
    }
    Ok(result)
}

/// Solve `A x = b` for symmetric `A` through its pseudoinverse.
pub fn solve_symmetric(
    a: &Array2<f64>,
    b: &Array1<f64>,
    rcond: f64,
) -> FigureResult<Array1<f64>> {
    Ok(pinv_symmetric(a, rcond)?.dot(b))
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    #[test]
    fn test_eigen_diagonal() {
        let a = array![[3.0, 0.0], [0.0, 5.0]];
        let (vals, _vecs) = symmetric_eigen(&a).unwrap();
        assert!((vals[0] - 5.0).abs() < 1e-12);
        assert!((vals[1] - 3.0).abs() < 1e-12);
    }

    #[test]
    fn test_eigen_reconstructs() {
        let a = array![[4.0, 1.0, 0.5], [1.0, 3.0, 0.2], [0.5, 0.2, 2.0]];
        let (vals, vecs) = symmetric_eigen(&a).unwrap();
        for i in 0..3 {
            for j in 0..3 {
                let mut sum = 0.0;
                for k in 0..3 {
                    sum += vecs[[i, k]] * vals[k] * vecs[[j, k]];
                }
                assert!((sum - a[[i, j]]).abs() < 1e-10, "({i},{j}) = {sum}");
            }
        }
    }

    #[test]
    fn test_pinv_identity() {
        let a: Array2<f64> = Array2::eye(3);
        let pinv = pinv_symmetric(&a, 1e-12).unwrap();
        for i in 0..3 {
            for j in 0..3 {
                let expected = if i == j { 1.0 } else { 0.0 };
                assert!((pinv[[i, j]] - expected).abs() < 1e-12);
            }
        }
    }

    #[test]
    fn test_solve_spd_system() {
        let a = array![[2.0, 1.0], [1.0, 3.0]];
        let b = array![3.0, 5.0];
        let x = solve_symmetric(&a, &b, 1e-14).unwrap();
        // Exact solution: x = (0.8, 1.4)
        assert!((x[0] - 0.8).abs() < 1e-10);
        assert!((x[1] - 1.4).abs() < 1e-10);
    }

    #[test]
    fn test_pinv_singular_drops_null_space() {
        let a = array![[1.0, 1.0], [1.0, 1.0]];
        let pinv = pinv_symmetric(&a, 1e-12).unwrap();
        // pinv of [[1,1],[1,1]] is [[.25,.25],[.25,.25]]
        for v in pinv.iter() {
            assert!((v - 0.25).abs() < 1e-10);
        }
    }

    #[test]
    fn test_non_square_is_error() {
        let a = Array2::<f64>::zeros((2, 3));
        assert!(matches!(symmetric_eigen(&a), Err(FigureError::Data(_))));
        assert!(matches!(pinv_symmetric(&a, 1e-12), Err(FigureError::Data(_))));
        let b = array![1.0, 2.0];
        assert!(solve_symmetric(&a, &b, 1e-12).is_err());
    }
}
