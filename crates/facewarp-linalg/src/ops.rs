use faer::{Mat, MatRef};

use crate::LinalgError;

/// Largest absolute value of the matrix entries, `0.0` for an empty matrix.
pub fn max_abs(m: MatRef<'_, f64>) -> f64 {
    let mut max = 0.0f64;
    for j in 0..m.ncols() {
        for i in 0..m.nrows() {
            max = max.max(m.read(i, j).abs());
        }
    }
    max
}

/// Zero every entry whose magnitude is below `max_abs(m) * ratio`.
///
/// Products of solved systems carry round-off residue on entries that should vanish exactly;
/// snapping keeps such outputs stable across platforms.
///
/// # Returns
///
/// The number of entries set to zero.
pub fn snap_to_zero(m: &mut Mat<f64>, ratio: f64) -> usize {
    let threshold = max_abs(m.as_ref()) * ratio;
    let mut snapped = 0;
    for j in 0..m.ncols() {
        for i in 0..m.nrows() {
            let v = m.read(i, j);
            if v != 0.0 && v.abs() < threshold {
                m.write(i, j, 0.0);
                snapped += 1;
            }
        }
    }
    snapped
}

/// Multiply `a * b` and snap the near-zero entries of the product. See [`snap_to_zero`].
///
/// Example:
///
/// ```
/// use facewarp_linalg::matmul_snapped;
///
/// let a = faer::mat![[1.0, 1e-9], [0.0, 1.0]];
/// let b = faer::mat![[1.0, 0.0], [0.0, 1.0]];
/// let m = matmul_snapped(a.as_ref(), b.as_ref(), 1e-6).unwrap();
/// assert_eq!(m.read(0, 1), 0.0);
/// ```
pub fn matmul_snapped(
    a: MatRef<'_, f64>,
    b: MatRef<'_, f64>,
    ratio: f64,
) -> Result<Mat<f64>, LinalgError> {
    if a.ncols() != b.nrows() {
        return Err(LinalgError::DimensionMismatch {
            left_rows: a.nrows(),
            left_cols: a.ncols(),
            right_rows: b.nrows(),
            right_cols: b.ncols(),
        });
    }

    let mut m = a * b;
    let snapped = snap_to_zero(&mut m, ratio);
    if snapped > 0 {
        log::trace!("snapped {snapped} near-zero entries to zero");
    }

    Ok(m)
}
