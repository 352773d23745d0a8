//! Inverse and pseudo-inverse used to solve the DLT system.
//!
//! Both functions are pure and reentrant; they only touch their argument.

use nalgebra::{DMatrix, DVector};

use crate::error::{HomographyError, Result};

/// Singular values at or below this are treated as zero
fn rank_tolerance(rows: usize, cols: usize, singular_values: &DVector<f64>) -> f64 {
    let sigma_max = singular_values.iter().cloned().fold(0.0, f64::max);
    rows.max(cols) as f64 * sigma_max * f64::EPSILON
}

/// Exact inverse of a square matrix.
///
/// Fails with [`HomographyError::SingularSystem`] when the matrix is
/// numerically rank deficient (smallest singular value within
/// `max(rows, cols) · σ_max · ε` of zero), when the LU factorization hits a
/// zero pivot, or when the inverse is not finite.
pub fn invert(a: &DMatrix<f64>) -> Result<DMatrix<f64>> {
    let (rows, cols) = a.shape();
    let singular_values = a.clone().svd(false, false).singular_values;
    let tolerance = rank_tolerance(rows, cols, &singular_values);
    let sigma_min = singular_values.iter().cloned().fold(f64::INFINITY, f64::min);
    if sigma_min.is_nan() || sigma_min <= tolerance {
        return Err(HomographyError::SingularSystem);
    }

    let inverse = a
        .clone()
        .try_inverse()
        .ok_or(HomographyError::SingularSystem)?;

    if inverse.iter().any(|v| !v.is_finite()) {
        return Err(HomographyError::SingularSystem);
    }

    Ok(inverse)
}

/// Moore-Penrose pseudo-inverse via SVD.
///
/// Singular values at or below `max(rows, cols) · σ_max · ε` are dropped, so a
/// rank-deficient matrix still yields the minimum-norm least-squares inverse.
/// Poor conditioning is not reported.
pub fn pseudo_invert(a: &DMatrix<f64>) -> Result<DMatrix<f64>> {
    let (rows, cols) = a.shape();
    let svd = a.clone().svd(true, true);
    let tolerance = rank_tolerance(rows, cols, &svd.singular_values);

    svd.pseudo_inverse(tolerance)
        .map_err(|e| HomographyError::Decomposition(e.to_string()))
}
