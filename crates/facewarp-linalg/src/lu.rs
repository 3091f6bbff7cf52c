use faer::prelude::SpSolver;
use faer::{Mat, MatRef};
use serde::{Deserialize, Serialize};

use crate::LinalgError;

/// Numeric tolerances for the LU based routines.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LuParams {
    /// A pivot whose magnitude is at most `singular_tol` times the largest pivot marks the
    /// matrix as singular.
    pub singular_tol: f64,
}

impl Default for LuParams {
    fn default() -> Self {
        Self {
            singular_tol: 1e-12,
        }
    }
}

fn check_square(a: MatRef<'_, f64>) -> Result<(), LinalgError> {
    if a.nrows() != a.ncols() {
        return Err(LinalgError::NotSquare {
            rows: a.nrows(),
            cols: a.ncols(),
        });
    }
    Ok(())
}

fn check_finite(a: MatRef<'_, f64>) -> Result<(), LinalgError> {
    for j in 0..a.ncols() {
        for i in 0..a.nrows() {
            if !a.read(i, j).is_finite() {
                return Err(LinalgError::NonFinite);
            }
        }
    }
    Ok(())
}

// Inspect the diagonal of U. Partial pivoting keeps the L factor bounded, so a vanishing
// pivot relative to the largest one means the matrix is rank deficient.
fn check_pivots(u: MatRef<'_, f64>, params: &LuParams) -> Result<(), LinalgError> {
    let n = u.nrows().min(u.ncols());
    let (min_pivot, max_pivot) = (0..n)
        .map(|i| u.read(i, i).abs())
        .fold((f64::INFINITY, 0.0f64), |(lo, hi), v| (lo.min(v), hi.max(v)));

    // NOTE: the negated comparison also rejects NaN pivots
    if !(min_pivot > params.singular_tol * max_pivot) || max_pivot == 0.0 {
        log::debug!("singular LU: min pivot {min_pivot:e}, max pivot {max_pivot:e}");
        return Err(LinalgError::SingularMatrix {
            min_pivot,
            max_pivot,
        });
    }

    Ok(())
}

/// Invert a square matrix using LU decomposition with partial pivoting.
///
/// # Arguments
///
/// * `a` - The square matrix to invert.
///
/// # Returns
///
/// The inverse of `a`, or [`LinalgError::SingularMatrix`] when `a` is not invertible within
/// the default tolerance.
///
/// Example:
///
/// ```
/// use facewarp_linalg::invert;
///
/// let a = faer::mat![[4.0, 7.0], [2.0, 6.0]];
/// let a_inv = invert(a.as_ref()).unwrap();
/// assert!((a_inv.read(0, 0) - 0.6).abs() < 1e-12);
/// ```
pub fn invert(a: MatRef<'_, f64>) -> Result<Mat<f64>, LinalgError> {
    invert_with_params(a, &LuParams::default())
}

/// Invert a square matrix with custom tolerances. See [`invert`].
pub fn invert_with_params(a: MatRef<'_, f64>, params: &LuParams) -> Result<Mat<f64>, LinalgError> {
    check_square(a)?;
    let n = a.nrows();
    if n == 0 {
        return Ok(Mat::zeros(0, 0));
    }
    check_finite(a)?;

    let lu = a.partial_piv_lu();
    check_pivots(lu.compute_u().as_ref(), params)?;

    let inv = lu.solve(Mat::<f64>::identity(n, n));
    check_finite(inv.as_ref())?;

    Ok(inv)
}

/// Solve `a * x = b` for `x` using LU decomposition with partial pivoting.
///
/// `b` may hold several right hand sides as columns.
pub fn solve(a: MatRef<'_, f64>, b: MatRef<'_, f64>) -> Result<Mat<f64>, LinalgError> {
    solve_with_params(a, b, &LuParams::default())
}

/// Solve `a * x = b` with custom tolerances. See [`solve`].
pub fn solve_with_params(
    a: MatRef<'_, f64>,
    b: MatRef<'_, f64>,
    params: &LuParams,
) -> Result<Mat<f64>, LinalgError> {
    check_square(a)?;
    if a.nrows() != b.nrows() {
        return Err(LinalgError::DimensionMismatch {
            left_rows: a.nrows(),
            left_cols: a.ncols(),
            right_rows: b.nrows(),
            right_cols: b.ncols(),
        });
    }
    if a.nrows() == 0 {
        return Ok(Mat::zeros(0, b.ncols()));
    }
    check_finite(a)?;
    check_finite(b)?;

    let lu = a.partial_piv_lu();
    check_pivots(lu.compute_u().as_ref(), params)?;

    Ok(lu.solve(b))
}
