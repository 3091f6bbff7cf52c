use facewarp_3d::linalg::{det_mat33, mat33_mul_vec3, matmul33, transpose33};
use facewarp_3d::ops::{center_points, centroid, squared_distance};
use facewarp_3d::Point3;
use serde::{Deserialize, Serialize};

use crate::{RegistrationError, SimilarityTransform};

/// Parameters for the landmark alignment.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AlignParams {
    /// Estimate a uniform scale. When false the result is a rigid transform (scale 1).
    pub estimate_scale: bool,
    /// Relative tolerance on the singular values of the cross-covariance, and absolute
    /// tolerance on the mean squared spread of the source, below which the input is
    /// considered degenerate.
    pub degeneracy_tol: f64,
}

impl Default for AlignParams {
    fn default() -> Self {
        Self {
            estimate_scale: true,
            degeneracy_tol: 1e-10,
        }
    }
}

/// Compute the best-fit similarity transform mapping `source` onto `target`.
///
/// The two sets are matched index by index. See [`align_with_params`] for the details and
/// the failure modes; this uses [`AlignParams::default`], which estimates the scale.
///
/// Example:
///
/// ```
/// use facewarp_registration::align;
///
/// let source = vec![[0.0, 0.0, 0.0], [1.0, 0.0, 0.0], [0.0, 1.0, 0.0], [0.0, 0.0, 1.0]];
/// let target = source
///     .iter()
///     .map(|p| [2.0 * p[0] + 1.0, 2.0 * p[1], 2.0 * p[2]])
///     .collect::<Vec<_>>();
/// let transform = align(&source, &target).unwrap();
/// assert!((transform.scale - 2.0).abs() < 1e-9);
/// ```
pub fn align(
    source: &[Point3],
    target: &[Point3],
) -> Result<SimilarityTransform, RegistrationError> {
    align_with_params(source, target, &AlignParams::default())
}

/// Compute the best-fit similarity transform mapping `source` onto `target`.
///
/// Kabsch/Umeyama: both sets are centered on their centroids, the cross-covariance
/// `H = sum(src_i * dst_i^T)` is decomposed as `H = U * S * V^T`, and the rotation is
/// `R = V * diag(1, 1, d) * U^T` with `d = sign(det(V * U^T))` so that reflections are never
/// returned. The scale is the part of the target spread explained by the rotated source
/// divided by the source spread, and `t = dst_mean - s * R * src_mean`.
///
/// # Arguments
///
/// * `source` - Landmarks to be moved.
/// * `target` - Corresponding landmarks, same length and order as `source`.
/// * `params` - Alignment parameters.
///
/// # Errors
///
/// * [`RegistrationError::DimensionMismatch`] if the sets differ in length.
/// * [`RegistrationError::DegenerateInput`] with fewer than 3 landmarks, collinear
///   landmarks or a source collapsed to a single point.
pub fn align_with_params(
    source: &[Point3],
    target: &[Point3],
    params: &AlignParams,
) -> Result<SimilarityTransform, RegistrationError> {
    if source.len() != target.len() {
        return Err(RegistrationError::DimensionMismatch {
            left_name: "source",
            left_len: source.len(),
            right_name: "target",
            right_len: target.len(),
        });
    }

    let n = source.len();
    if n < 3 {
        return Err(RegistrationError::DegenerateInput(format!(
            "need at least 3 landmarks, got {n}"
        )));
    }

    // compute centroids and center both sets
    let (Some(src_centroid), Some(dst_centroid)) = (centroid(source), centroid(target)) else {
        return Err(RegistrationError::DegenerateInput("no landmarks".to_string()));
    };
    let src_centered = center_points(source, &src_centroid);
    let dst_centered = center_points(target, &dst_centroid);

    let src_spread = src_centered
        .iter()
        .map(|p| squared_distance(p, &[0.0; 3]))
        .sum::<f64>();
    if !(src_spread / n as f64 > params.degeneracy_tol) {
        return Err(RegistrationError::DegenerateInput(
            "source landmarks have near zero spread".to_string(),
        ));
    }

    // compute the cross-covariance matrix H = sum[(src - src_mean) * (dst - dst_mean)^T]
    let mut h = faer::Mat::<f64>::zeros(3, 3);
    for (s, d) in src_centered.iter().zip(dst_centered.iter()) {
        for r in 0..3 {
            for c in 0..3 {
                h.write(r, c, h.read(r, c) + s[r] * d[c]);
            }
        }
    }

    let svd = h.svd();
    let sigma = [
        svd.s_diagonal().read(0),
        svd.s_diagonal().read(1),
        svd.s_diagonal().read(2),
    ];
    let (u, v) = {
        let (u_ref, v_ref) = (svd.u(), svd.v());
        let mut u = [[0.0; 3]; 3];
        let mut v = [[0.0; 3]; 3];
        for i in 0..3 {
            for j in 0..3 {
                u[i][j] = u_ref.read(i, j);
                v[i][j] = v_ref.read(i, j);
            }
        }
        (u, v)
    };

    // the rotation is only determined when H has rank >= 2
    let mut sorted = sigma;
    sorted.sort_by(|a, b| b.total_cmp(a));
    if !(sorted[0] > 0.0) || !(sorted[1] > params.degeneracy_tol * sorted[0]) {
        return Err(RegistrationError::DegenerateInput(format!(
            "landmarks are collinear (singular values {:e}, {:e}, {:e})",
            sorted[0], sorted[1], sorted[2]
        )));
    }

    // identical inputs are a special case once they are known to be well posed
    if source == target {
        log::debug!("source and target landmarks are identical");
        return Ok(SimilarityTransform::identity());
    }

    let ut = transpose33(&u);
    let d = if det_mat33(&matmul33(&v, &ut)) < 0.0 {
        -1.0
    } else {
        1.0
    };

    // flip the singular direction with the smallest singular value
    let weakest = (0..3)
        .min_by(|&a, &b| sigma[a].total_cmp(&sigma[b]))
        .unwrap_or(2);
    let mut v_corrected = v;
    if d < 0.0 {
        log::debug!("correcting a reflection in the landmark alignment");
        for row in v_corrected.iter_mut() {
            row[weakest] = -row[weakest];
        }
    }
    let rotation = matmul33(&v_corrected, &ut);

    let scale = if params.estimate_scale {
        let explained = (0..3)
            .map(|k| if k == weakest { d * sigma[k] } else { sigma[k] })
            .sum::<f64>();
        let scale = explained / src_spread;
        if !(scale.is_finite() && scale > 0.0) {
            return Err(RegistrationError::DegenerateInput(format!(
                "scale is undefined ({scale})"
            )));
        }
        scale
    } else {
        1.0
    };

    // compute translation vector t = dst_mean - s * R * src_mean
    let rotated = mat33_mul_vec3(&rotation, &src_centroid);
    let translation = [
        dst_centroid[0] - scale * rotated[0],
        dst_centroid[1] - scale * rotated[1],
        dst_centroid[2] - scale * rotated[2],
    ];

    log::debug!(
        "aligned {n} landmarks: scale {scale}, translation {translation:?}, \
         singular values {sigma:?}"
    );

    Ok(SimilarityTransform::new(rotation, translation, scale))
}

/// Sum of squared distances between the transformed `source` and `target`.
pub fn residual(
    source: &[Point3],
    target: &[Point3],
    transform: &SimilarityTransform,
) -> Result<f64, RegistrationError> {
    if source.len() != target.len() {
        return Err(RegistrationError::DimensionMismatch {
            left_name: "source",
            left_len: source.len(),
            right_name: "target",
            right_len: target.len(),
        });
    }
    Ok(source
        .iter()
        .zip(target.iter())
        .map(|(s, t)| squared_distance(&transform.apply(s), t))
        .sum())
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use facewarp_3d::linalg::IDENTITY_MAT33;
    use facewarp_3d::transforms::axis_angle_to_rotation_matrix;
    use rand::{rngs::StdRng, Rng, SeedableRng};

    fn create_random_points(rng: &mut StdRng, num_points: usize) -> Vec<Point3> {
        (0..num_points)
            .map(|_| {
                [
                    rng.random_range(-1.0..1.0),
                    rng.random_range(-1.0..1.0),
                    rng.random_range(-1.0..1.0),
                ]
            })
            .collect()
    }

    fn create_random_transform(rng: &mut StdRng) -> SimilarityTransform {
        let axis = [
            rng.random_range(-1.0..1.0),
            rng.random_range(-1.0..1.0),
            rng.random_range(-1.0..1.0) + 2.0,
        ];
        let angle = rng.random_range(-3.0..3.0);
        let rotation = axis_angle_to_rotation_matrix(&axis, angle).unwrap_or(IDENTITY_MAT33);
        let translation = [
            rng.random_range(-5.0..5.0),
            rng.random_range(-5.0..5.0),
            rng.random_range(-5.0..5.0),
        ];
        SimilarityTransform::new(rotation, translation, rng.random_range(0.5..2.0))
    }

    fn assert_transform_eq(a: &SimilarityTransform, b: &SimilarityTransform, epsilon: f64) {
        for i in 0..3 {
            for j in 0..3 {
                assert_relative_eq!(a.rotation[i][j], b.rotation[i][j], epsilon = epsilon);
            }
            assert_relative_eq!(a.translation[i], b.translation[i], epsilon = epsilon);
        }
        assert_relative_eq!(a.scale, b.scale, epsilon = epsilon);
    }

    #[test]
    fn test_align_identity() -> Result<(), RegistrationError> {
        let mut rng = StdRng::seed_from_u64(0);
        let points = create_random_points(&mut rng, 30);
        let transform = align(&points, &points)?;
        assert_transform_eq(&transform, &SimilarityTransform::identity(), 1e-12);
        Ok(())
    }

    #[test]
    fn test_align_recovers_known_transform() -> Result<(), RegistrationError> {
        let mut rng = StdRng::seed_from_u64(1);
        for _ in 0..10 {
            let source = create_random_points(&mut rng, 20);
            let expected = create_random_transform(&mut rng);
            let target = expected.transform_points(&source);

            let transform = align(&source, &target)?;
            assert_transform_eq(&transform, &expected, 1e-9);
            assert_relative_eq!(det_mat33(&transform.rotation), 1.0, epsilon = 1e-9);
        }
        Ok(())
    }

    #[test]
    fn test_align_rigid_only() -> Result<(), RegistrationError> {
        let mut rng = StdRng::seed_from_u64(2);
        let source = create_random_points(&mut rng, 10);
        let mut expected = create_random_transform(&mut rng);
        expected.scale = 1.0;
        let target = expected.transform_points(&source);

        let params = AlignParams {
            estimate_scale: false,
            ..Default::default()
        };
        let transform = align_with_params(&source, &target, &params)?;
        assert_transform_eq(&transform, &expected, 1e-9);
        Ok(())
    }

    #[test]
    fn test_align_minimizes_residual() -> Result<(), RegistrationError> {
        let mut rng = StdRng::seed_from_u64(3);
        let source = create_random_points(&mut rng, 12);
        let motion = create_random_transform(&mut rng);
        // noisy correspondences: no transform fits exactly
        let target = motion
            .transform_points(&source)
            .into_iter()
            .map(|p| {
                [
                    p[0] + rng.random_range(-0.1..0.1),
                    p[1] + rng.random_range(-0.1..0.1),
                    p[2] + rng.random_range(-0.1..0.1),
                ]
            })
            .collect::<Vec<_>>();

        let transform = align(&source, &target)?;
        let best = residual(&source, &target, &transform)?;
        let identity = residual(&source, &target, &SimilarityTransform::identity())?;
        assert!(best <= identity);

        for _ in 0..200 {
            let delta = axis_angle_to_rotation_matrix(
                &[
                    rng.random_range(-1.0..1.0),
                    rng.random_range(-1.0..1.0),
                    rng.random_range(-1.0..1.0) + 2.0,
                ],
                rng.random_range(-0.05..0.05),
            )
            .unwrap_or(IDENTITY_MAT33);
            let perturbed = SimilarityTransform::new(
                matmul33(&delta, &transform.rotation),
                [
                    transform.translation[0] + rng.random_range(-0.05..0.05),
                    transform.translation[1] + rng.random_range(-0.05..0.05),
                    transform.translation[2] + rng.random_range(-0.05..0.05),
                ],
                transform.scale * (1.0 + rng.random_range(-0.05..0.05)),
            );
            assert!(residual(&source, &target, &perturbed)? >= best - 1e-9);
        }
        Ok(())
    }

    #[test]
    fn test_align_invariant_to_global_motion() -> Result<(), RegistrationError> {
        let mut rng = StdRng::seed_from_u64(4);
        let source = create_random_points(&mut rng, 15);
        let target = create_random_points(&mut rng, 15);
        let mut motion = create_random_transform(&mut rng);
        motion.scale = 1.0;

        let base = align(&source, &target)?;
        let moved = align(
            &motion.transform_points(&source),
            &motion.transform_points(&target),
        )?;

        // moved = motion * base * motion^-1
        let expected = motion.compose(&base).compose(&motion.inverse());
        assert_transform_eq(&moved, &expected, 1e-9);
        Ok(())
    }

    #[test]
    fn test_align_planar_landmarks() -> Result<(), RegistrationError> {
        // coplanar but not collinear: still well posed
        let source = vec![
            [0.0, 0.0, 0.0],
            [1.0, 0.0, 0.0],
            [0.0, 1.0, 0.0],
            [1.0, 1.0, 0.0],
        ];
        let expected = SimilarityTransform::new(
            axis_angle_to_rotation_matrix(&[1.0, 0.0, 0.0], std::f64::consts::FRAC_PI_2)
                .unwrap_or(IDENTITY_MAT33),
            [0.1, 0.2, 0.3],
            3.0,
        );
        let target = expected.transform_points(&source);
        let transform = align(&source, &target)?;
        assert_transform_eq(&transform, &expected, 1e-9);
        Ok(())
    }

    #[test]
    fn test_align_dimension_mismatch() {
        let source = vec![[0.0; 3]; 4];
        let target = vec![[0.0; 3]; 3];
        assert_eq!(
            align(&source, &target),
            Err(RegistrationError::DimensionMismatch {
                left_name: "source",
                left_len: 4,
                right_name: "target",
                right_len: 3,
            })
        );
    }

    #[test]
    fn test_align_too_few_points() {
        let points = vec![[0.0, 0.0, 0.0], [1.0, 0.0, 0.0]];
        assert!(matches!(
            align(&points, &points),
            Err(RegistrationError::DegenerateInput(_))
        ));
    }

    #[test]
    fn test_align_collinear() {
        let source = vec![
            [0.0, 0.0, 0.0],
            [1.0, 0.0, 0.0],
            [2.0, 0.0, 0.0],
            [3.0, 0.0, 0.0],
        ];
        let target = vec![
            [0.0, 0.0, 0.0],
            [0.0, 1.0, 0.0],
            [0.0, 2.0, 0.0],
            [0.0, 3.0, 0.0],
        ];
        assert!(matches!(
            align(&source, &target),
            Err(RegistrationError::DegenerateInput(_))
        ));
    }

    #[test]
    fn test_align_collinear_onto_itself() {
        let points = vec![
            [0.0, 0.0, 0.0],
            [1.0, 0.0, 0.0],
            [2.0, 0.0, 0.0],
            [3.0, 0.0, 0.0],
        ];
        assert!(matches!(
            align(&points, &points),
            Err(RegistrationError::DegenerateInput(_))
        ));

        let params = AlignParams {
            estimate_scale: false,
            ..Default::default()
        };
        assert!(matches!(
            align_with_params(&points, &points, &params),
            Err(RegistrationError::DegenerateInput(_))
        ));
    }

    #[test]
    fn test_align_zero_spread() {
        let source = vec![[1.0, 1.0, 1.0]; 5];
        let target = vec![
            [0.0, 0.0, 0.0],
            [1.0, 0.0, 0.0],
            [0.0, 1.0, 0.0],
            [0.0, 0.0, 1.0],
            [1.0, 1.0, 1.0],
        ];
        assert!(matches!(
            align(&source, &target),
            Err(RegistrationError::DegenerateInput(_))
        ));
    }
}
