use facewarp_3d::linalg::{
    det_mat33, mat33_mul_vec3, matmul33, transform_points, transpose33, IDENTITY_MAT33,
};
use facewarp_3d::Point3;
use serde::{Deserialize, Serialize};

use crate::RegistrationError;

/// A similarity transform `x -> s * R * x + t`.
///
/// The rotation is row-major, orthonormal and has determinant +1; the scale is positive.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SimilarityTransform {
    /// Rotation matrix.
    pub rotation: [[f64; 3]; 3],
    /// Translation vector, applied after rotation and scaling.
    pub translation: [f64; 3],
    /// Uniform scale factor.
    pub scale: f64,
}

impl Default for SimilarityTransform {
    fn default() -> Self {
        Self::identity()
    }
}

impl SimilarityTransform {
    /// Create a transform from its rotation, translation and scale.
    pub fn new(rotation: [[f64; 3]; 3], translation: [f64; 3], scale: f64) -> Self {
        Self {
            rotation,
            translation,
            scale,
        }
    }

    /// The identity transform.
    pub fn identity() -> Self {
        Self::new(IDENTITY_MAT33, [0.0; 3], 1.0)
    }

    /// Apply the transform to a single point.
    #[inline]
    pub fn apply(&self, point: &Point3) -> Point3 {
        let r = mat33_mul_vec3(&self.rotation, point);
        [
            self.scale * r[0] + self.translation[0],
            self.scale * r[1] + self.translation[1],
            self.scale * r[2] + self.translation[2],
        ]
    }

    /// Apply the transform to every point, returning new points.
    pub fn transform_points(&self, points: &[Point3]) -> Vec<Point3> {
        let mut scaled = self.rotation;
        scaled.iter_mut().flatten().for_each(|v| *v *= self.scale);
        let mut dst = vec![[0.0; 3]; points.len()];
        transform_points(points, &scaled, &self.translation, &mut dst);
        dst
    }

    /// Compose two transforms: the result applies `other` first, then `self`.
    pub fn compose(&self, other: &Self) -> Self {
        let rt = mat33_mul_vec3(&self.rotation, &other.translation);
        Self {
            rotation: matmul33(&self.rotation, &other.rotation),
            translation: [
                self.scale * rt[0] + self.translation[0],
                self.scale * rt[1] + self.translation[1],
                self.scale * rt[2] + self.translation[2],
            ],
            scale: self.scale * other.scale,
        }
    }

    /// The inverse transform `x -> (1 / s) * R^T * (x - t)`.
    pub fn inverse(&self) -> Self {
        let rt = transpose33(&self.rotation);
        let inv_scale = 1.0 / self.scale;
        let t = mat33_mul_vec3(&rt, &self.translation);
        Self {
            rotation: rt,
            translation: [-inv_scale * t[0], -inv_scale * t[1], -inv_scale * t[2]],
            scale: inv_scale,
        }
    }

    /// The row-major 4x4 homogeneous matrix `[[s * R, t], [0, 0, 0, 1]]`.
    pub fn to_homogeneous(&self) -> [[f64; 4]; 4] {
        let mut m = [[0.0; 4]; 4];
        for i in 0..3 {
            for j in 0..3 {
                m[i][j] = self.scale * self.rotation[i][j];
            }
            m[i][3] = self.translation[i];
        }
        m[3][3] = 1.0;
        m
    }

    /// Decompose a row-major 4x4 homogeneous matrix `[[s * R, t], [0, 0, 0, 1]]`.
    ///
    /// # Errors
    ///
    /// [`RegistrationError::InvalidParameter`] if the upper-left block is not a positive
    /// multiple of a rotation within `tol`, or the last row is not `[0, 0, 0, 1]`.
    pub fn from_homogeneous(m: &[[f64; 4]; 4], tol: f64) -> Result<Self, RegistrationError> {
        if m[3] != [0.0, 0.0, 0.0, 1.0] {
            return Err(RegistrationError::InvalidParameter(format!(
                "last row of a homogeneous transform must be [0, 0, 0, 1], got {:?}",
                m[3]
            )));
        }

        let mut block = [[0.0; 3]; 3];
        for (i, row) in block.iter_mut().enumerate() {
            row.copy_from_slice(&m[i][..3]);
        }

        let det = det_mat33(&block);
        if !(det.is_finite() && det > 0.0) {
            return Err(RegistrationError::InvalidParameter(format!(
                "linear part has non-positive determinant {det}"
            )));
        }
        let scale = det.cbrt();

        let mut rotation = block;
        rotation.iter_mut().flatten().for_each(|v| *v /= scale);

        // R * R^T must be the identity
        let rrt = matmul33(&rotation, &transpose33(&rotation));
        for (i, row) in rrt.iter().enumerate() {
            for (j, v) in row.iter().enumerate() {
                if (v - IDENTITY_MAT33[i][j]).abs() > tol {
                    return Err(RegistrationError::InvalidParameter(
                        "linear part is not a scaled rotation".to_string(),
                    ));
                }
            }
        }

        Ok(Self::new(rotation, [m[0][3], m[1][3], m[2][3]], scale))
    }
}
