use crate::linalg::{dot_product3, matmul33, IDENTITY_MAT33};

/// Compute the rotation matrix from an axis and angle.
///
/// # Arguments
///
/// * `axis` - The axis of rotation. It does not need to be normalized.
/// * `angle` - The angle of rotation in radians.
///
/// # Returns
///
/// The row-major rotation matrix.
///
/// Example:
///
/// ```
/// use facewarp_3d::transforms::axis_angle_to_rotation_matrix;
///
/// let rotation = axis_angle_to_rotation_matrix(&[0.0, 0.0, 2.0], 0.0).unwrap();
/// assert_eq!(rotation, [[1.0, 0.0, 0.0], [0.0, 1.0, 0.0], [0.0, 0.0, 1.0]]);
/// ```
pub fn axis_angle_to_rotation_matrix(
    axis: &[f64; 3],
    angle: f64,
) -> Result<[[f64; 3]; 3], &'static str> {
    let magnitude = dot_product3(axis, axis).sqrt();
    if !(magnitude.is_finite() && magnitude >= 1e-10) {
        return Err("cannot compute rotation matrix from a zero or non-finite axis");
    }
    let [x, y, z] = axis.map(|v| v / magnitude);

    // Rodrigues: R = I + sin(angle) * K + (1 - cos(angle)) * K^2, K the cross product matrix
    let k = [[0.0, -z, y], [z, 0.0, -x], [-y, x, 0.0]];
    let k2 = matmul33(&k, &k);
    let (s, t) = (angle.sin(), 1.0 - angle.cos());

    let mut rotation = IDENTITY_MAT33;
    for (i, row) in rotation.iter_mut().enumerate() {
        for (j, v) in row.iter_mut().enumerate() {
            *v += s * k[i][j] + t * k2[i][j];
        }
    }
    Ok(rotation)
}
