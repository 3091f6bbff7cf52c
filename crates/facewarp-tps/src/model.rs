use facewarp_3d::ops::{centroid, euclidean_distance};
use facewarp_3d::Point3;
use facewarp_linalg::{invert_with_params, snap_to_zero, LuParams};
use faer::{Mat, MatRef};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use crate::kernel::tps_kernel_between;
use crate::TpsError;

/// A control point and the position it must be carried to.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ControlPair {
    /// Position in the undeformed space.
    pub control: Point3,
    /// Position the control point maps to.
    pub data: Point3,
}

impl ControlPair {
    /// Create a new control pair.
    pub fn new(control: Point3, data: Point3) -> Self {
        Self { control, data }
    }
}

impl From<(Point3, Point3)> for ControlPair {
    fn from((control, data): (Point3, Point3)) -> Self {
        Self::new(control, data)
    }
}

/// Parameters to build a [`TpsModel`].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TpsParams {
    /// Smoothing weight. `0` interpolates the data points exactly; larger values trade
    /// fidelity at the control points for a smoother warp.
    pub lambda: f64,
    /// Entries of a derived matrix below `max_abs * snap_ratio` are set to zero.
    pub snap_ratio: f64,
    /// Tolerances of the LU inversion of the system matrix.
    pub lu: LuParams,
}

impl Default for TpsParams {
    fn default() -> Self {
        Self {
            lambda: 0.0,
            snap_ratio: 1e-6,
            lu: LuParams::default(),
        }
    }
}

// Moves control points to zero mean and unit mean edge length, and data points to zero mean
// in the same units. The spline is invariant to this change of frame, while the system matrix
// built in it has entries of order one whatever the mesh units are.
#[derive(Debug, Clone, Copy)]
struct Frame {
    control_origin: Point3,
    data_origin: Point3,
    scale: f64,
}

impl Frame {
    fn new(controls: &[Point3], data: &[Point3], mean_edge: f64) -> Self {
        let scale = if mean_edge.is_finite() && mean_edge > 0.0 {
            mean_edge
        } else {
            1.0
        };
        Self {
            control_origin: centroid(controls).unwrap_or([0.0; 3]),
            data_origin: centroid(data).unwrap_or([0.0; 3]),
            scale,
        }
    }

    #[inline]
    fn control_to_local(&self, p: &Point3) -> Point3 {
        let o = &self.control_origin;
        [
            (p[0] - o[0]) / self.scale,
            (p[1] - o[1]) / self.scale,
            (p[2] - o[2]) / self.scale,
        ]
    }

    #[inline]
    fn data_to_local(&self, p: &Point3) -> Point3 {
        let o = &self.data_origin;
        [
            (p[0] - o[0]) / self.scale,
            (p[1] - o[1]) / self.scale,
            (p[2] - o[2]) / self.scale,
        ]
    }

    #[inline]
    fn data_from_local(&self, p: &Point3) -> Point3 {
        let o = &self.data_origin;
        [
            self.scale * p[0] + o[0],
            self.scale * p[1] + o[1],
            self.scale * p[2] + o[2],
        ]
    }
}

// sum over all ordered pairs i != j, divided by p^2
fn mean_edge_length(points: &[Point3]) -> f64 {
    let p = points.len();
    let mut edge_sum = 0.0;
    for i in 0..p {
        for j in (i + 1)..p {
            edge_sum += 2.0 * euclidean_distance(&points[i], &points[j]);
        }
    }
    edge_sum / (p * p) as f64
}

/// A solved 3D thin-plate spline.
///
/// The warp is `f(q) = sum_i w_i * U(|q - c_i|) + a_0 + a_x * q.x + a_y * q.y + a_z * q.z`,
/// solved per output coordinate from the system
///
/// ```text
/// | K + lambda * a^2 * I   P | | w |   | data |
/// | P^T                    0 | | a | = |  0   |
/// ```
///
/// where `K[i][j] = U(|c_i - c_j|)`, the rows of `P` are `[1, x, y, z]` of the control points
/// and `a` is the mean distance between control points.
///
/// The system is solved in a normalized frame: control points are centered on their centroid
/// and divided by `a`, data points are centered on theirs and divided by `a` too. The warp
/// does not depend on the frame, but the conditioning of the system and the snapping of the
/// coefficients no longer depend on the units of the mesh.
#[derive(Debug, Clone)]
pub struct TpsModel {
    control_points: Vec<Point3>,
    // control points in the normalized frame
    local_controls: Vec<Point3>,
    frame: Frame,
    mean_edge: f64,
    // (p + 4) x 3, the radial weights followed by the affine part
    coefficients: Mat<f64>,
    // inverse of the (p + 4) x (p + 4) system matrix
    l_inv: Mat<f64>,
    // p x p, without the regularization on the diagonal
    kernel: Mat<f64>,
    params: TpsParams,
}

impl TpsModel {
    /// Solve the spline through `pairs` with smoothing `lambda` and default tolerances.
    ///
    /// Example:
    ///
    /// ```
    /// use facewarp_tps::{ControlPair, TpsModel};
    ///
    /// let pairs = [
    ///     ControlPair::new([0.0, 0.0, 0.0], [0.0, 0.0, 1.0]),
    ///     ControlPair::new([1.0, 0.0, 0.0], [1.0, 0.0, 1.0]),
    ///     ControlPair::new([0.0, 1.0, 0.0], [0.0, 1.0, 1.0]),
    ///     ControlPair::new([0.0, 0.0, 1.0], [0.0, 0.0, 2.0]),
    /// ];
    /// let model = TpsModel::build(&pairs, 0.0).unwrap();
    /// let p = model.evaluate(&[0.0, 0.0, 0.0]);
    /// assert!((p[2] - 1.0).abs() < 1e-9);
    /// ```
    pub fn build(pairs: &[ControlPair], lambda: f64) -> Result<Self, TpsError> {
        Self::build_with_params(
            pairs,
            &TpsParams {
                lambda,
                ..Default::default()
            },
        )
    }

    /// Solve the spline through `pairs`.
    ///
    /// # Errors
    ///
    /// * [`TpsError::EmptyControlPoints`] if `pairs` is empty.
    /// * [`TpsError::InvalidRegularization`] if `lambda` is negative or not finite.
    /// * [`TpsError::InvalidSnapRatio`] if `snap_ratio` is negative or not finite.
    /// * [`TpsError::SingularSystem`] if the system cannot be inverted, e.g. duplicated
    ///   control points without smoothing, or fewer than 4 non-coplanar control points.
    pub fn build_with_params(pairs: &[ControlPair], params: &TpsParams) -> Result<Self, TpsError> {
        if pairs.is_empty() {
            return Err(TpsError::EmptyControlPoints);
        }
        if !(params.lambda.is_finite() && params.lambda >= 0.0) {
            return Err(TpsError::InvalidRegularization(params.lambda));
        }
        if !(params.snap_ratio.is_finite() && params.snap_ratio >= 0.0) {
            return Err(TpsError::InvalidSnapRatio(params.snap_ratio));
        }

        let p = pairs.len();
        if p < 4 {
            log::warn!("{p} control points cannot determine a 3D affine part");
        }

        let control_points = pairs.iter().map(|pair| pair.control).collect::<Vec<_>>();
        let data_points = pairs.iter().map(|pair| pair.data).collect::<Vec<_>>();

        let mean_edge = mean_edge_length(&control_points);
        let frame = Frame::new(&control_points, &data_points, mean_edge);
        let local_controls = control_points
            .iter()
            .map(|c| frame.control_to_local(c))
            .collect::<Vec<_>>();

        let mut kernel = Mat::<f64>::zeros(p, p);
        for i in 0..p {
            for j in (i + 1)..p {
                let u = tps_kernel_between(&local_controls[i], &local_controls[j]);
                kernel.write(i, j, u);
                kernel.write(j, i, u);
            }
        }

        // lambda * a^2 with a measured in the normalized frame, where it is 1 unless all
        // control points coincide
        let local_edge = mean_edge / frame.scale;
        let regularization = params.lambda * local_edge * local_edge;

        let l = Mat::<f64>::from_fn(p + 4, p + 4, |i, j| match (i < p, j < p) {
            (true, true) if i == j => regularization,
            (true, true) => kernel.read(i, j),
            (true, false) => affine_basis(&local_controls[i], j - p),
            (false, true) => affine_basis(&local_controls[j], i - p),
            (false, false) => 0.0,
        });

        let l_inv = invert_with_params(l.as_ref(), &params.lu).map_err(TpsError::SingularSystem)?;

        let rhs = Mat::<f64>::from_fn(p + 4, 3, |i, k| {
            if i < p {
                frame.data_to_local(&data_points[i])[k]
            } else {
                0.0
            }
        });
        let mut coefficients = &l_inv * &rhs;
        let snapped = snap_to_zero(&mut coefficients, params.snap_ratio);

        log::debug!(
            "solved thin-plate spline with {p} control points, lambda {}, mean edge {mean_edge}, \
             {snapped} coefficients snapped",
            params.lambda
        );

        Ok(Self {
            control_points,
            local_controls,
            frame,
            mean_edge,
            coefficients,
            l_inv,
            kernel,
            params: *params,
        })
    }

    /// Number of control points.
    pub fn num_control_points(&self) -> usize {
        self.control_points.len()
    }

    /// The smoothing weight the model was built with.
    pub fn lambda(&self) -> f64 {
        self.params.lambda
    }

    /// The parameters the model was built with.
    pub fn params(&self) -> &TpsParams {
        &self.params
    }

    /// The control points, in input order.
    pub fn control_points(&self) -> &[Point3] {
        &self.control_points
    }

    /// The mean distance `a` between control points, in input units.
    pub fn mean_edge_length(&self) -> f64 {
        self.mean_edge
    }

    /// The `(p + 4) x 3` coefficient matrix: one radial weight per control point followed by
    /// the constant and linear terms, one column per output coordinate.
    ///
    /// The coefficients act in the normalized frame described on [`TpsModel`].
    pub fn coefficients(&self) -> MatRef<'_, f64> {
        self.coefficients.as_ref()
    }

    /// Evaluate the warp at `query`.
    pub fn evaluate(&self, query: &Point3) -> Point3 {
        let p = self.local_controls.len();
        let w = &self.coefficients;
        let local = self.frame.control_to_local(query);

        let mut out = [0.0; 3];
        for (k, out_k) in out.iter_mut().enumerate() {
            let mut v = w.read(p, k)
                + w.read(p + 1, k) * local[0]
                + w.read(p + 2, k) * local[1]
                + w.read(p + 3, k) * local[2];
            for (i, c) in self.local_controls.iter().enumerate() {
                v += w.read(i, k) * tps_kernel_between(&local, c);
            }
            *out_k = v;
        }
        self.frame.data_from_local(&out)
    }

    /// Evaluate the warp at every point.
    pub fn warp_points(&self, points: &[Point3]) -> Vec<Point3> {
        points.iter().map(|q| self.evaluate(q)).collect()
    }

    /// Evaluate the warp at every point, in parallel. Same output as [`Self::warp_points`].
    pub fn warp_points_par(&self, points: &[Point3]) -> Vec<Point3> {
        points.par_iter().map(|q| self.evaluate(q)).collect()
    }

    /// The `n x (p + 4)` matrix mapping the data side of the system to the warped queries.
    ///
    /// Row `j` holds `[U(|q_j - c_0|), .., U(|q_j - c_p-1|), 1, x, y, z] * L^-1`, snapped, with
    /// queries and control points in the normalized frame. Its product with `[data; 0]` is the
    /// warp of the queries in input units, since the spline reproduces constant data exactly.
    /// The same matrix serves any data points over the same control points.
    pub fn influence_matrix(&self, queries: &[Point3]) -> Mat<f64> {
        let p = self.local_controls.len();
        let local = queries
            .iter()
            .map(|q| self.frame.control_to_local(q))
            .collect::<Vec<_>>();
        let basis = Mat::<f64>::from_fn(queries.len(), p + 4, |j, i| {
            if i < p {
                tps_kernel_between(&local[j], &self.local_controls[i])
            } else {
                affine_basis(&local[j], i - p)
            }
        });

        let mut influence = &basis * &self.l_inv;
        snap_to_zero(&mut influence, self.params.snap_ratio);
        influence
    }

    /// The bending energy `sum_k w_k^T * K * w_k` of the radial part, using the kernel without
    /// regularization.
    ///
    /// Computed in the normalized frame. The energy is unchanged by translating the control
    /// and data points, or by scaling both by the same factor.
    pub fn bending_energy(&self) -> f64 {
        let p = self.local_controls.len();
        let w = self.coefficients.as_ref().subrows(0, p);
        let kw = self.kernel.as_ref() * w;
        let mut energy = 0.0;
        for k in 0..3 {
            for i in 0..p {
                energy += w.read(i, k) * kw.read(i, k);
            }
        }
        energy
    }
}

// [1, x, y, z]
#[inline]
fn affine_basis(point: &Point3, index: usize) -> f64 {
    match index {
        0 => 1.0,
        k => point[k - 1],
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use facewarp_3d::ops::squared_distance;
    use facewarp_linalg::LinalgError;
    use rand::{rngs::StdRng, Rng, SeedableRng};

    fn create_translation_pairs() -> Vec<ControlPair> {
        vec![
            ControlPair::new([0.0, 0.0, 0.0], [0.0, 0.0, 1.0]),
            ControlPair::new([1.0, 0.0, 0.0], [1.0, 0.0, 1.0]),
            ControlPair::new([0.0, 1.0, 0.0], [0.0, 1.0, 1.0]),
            ControlPair::new([0.0, 0.0, 1.0], [0.0, 0.0, 2.0]),
        ]
    }

    fn create_random_pairs(rng: &mut StdRng, num_pairs: usize) -> Vec<ControlPair> {
        (0..num_pairs)
            .map(|_| {
                let c = [
                    rng.random_range(-1.0..1.0),
                    rng.random_range(-1.0..1.0),
                    rng.random_range(-1.0..1.0),
                ];
                let d = [
                    c[0] + rng.random_range(-0.2..0.2),
                    c[1] + rng.random_range(-0.2..0.2),
                    c[2] + rng.random_range(-0.2..0.2),
                ];
                ControlPair::new(c, d)
            })
            .collect()
    }

    fn residual(model: &TpsModel, pairs: &[ControlPair]) -> f64 {
        pairs
            .iter()
            .map(|pair| squared_distance(&model.evaluate(&pair.control), &pair.data))
            .sum()
    }

    #[test]
    fn test_translation() -> Result<(), TpsError> {
        let model = TpsModel::build(&create_translation_pairs(), 0.0)?;
        assert_eq!(model.num_control_points(), 4);

        let p = model.evaluate(&[0.0, 0.0, 0.0]);
        assert_relative_eq!(p[0], 0.0, epsilon = 1e-9);
        assert_relative_eq!(p[1], 0.0, epsilon = 1e-9);
        assert_relative_eq!(p[2], 1.0, epsilon = 1e-9);

        // pure translation: the radial weights vanish and the warp holds everywhere
        for i in 0..4 {
            for k in 0..3 {
                assert_eq!(model.coefficients().read(i, k), 0.0);
            }
        }
        let q = model.evaluate(&[0.3, -2.0, 5.0]);
        assert_relative_eq!(q[0], 0.3, epsilon = 1e-9);
        assert_relative_eq!(q[1], -2.0, epsilon = 1e-9);
        assert_relative_eq!(q[2], 6.0, epsilon = 1e-9);
        assert_relative_eq!(model.bending_energy(), 0.0, epsilon = 1e-12);
        Ok(())
    }

    #[test]
    fn test_exact_interpolation() -> Result<(), TpsError> {
        let mut rng = StdRng::seed_from_u64(21);
        let pairs = create_random_pairs(&mut rng, 25);
        let model = TpsModel::build(&pairs, 0.0)?;

        for pair in &pairs {
            let p = model.evaluate(&pair.control);
            for k in 0..3 {
                assert_relative_eq!(p[k], pair.data[k], epsilon = 1e-6);
            }
        }
        assert!(model.bending_energy() > 0.0);
        Ok(())
    }

    #[test]
    fn test_residual_grows_with_lambda() -> Result<(), TpsError> {
        let mut rng = StdRng::seed_from_u64(22);
        let pairs = create_random_pairs(&mut rng, 15);

        let mut previous = 0.0;
        for lambda in [0.0, 1e-3, 1e-2, 0.1, 1.0, 10.0] {
            let params = TpsParams {
                lambda,
                snap_ratio: 0.0,
                ..Default::default()
            };
            let model = TpsModel::build_with_params(&pairs, &params)?;
            assert_eq!(model.lambda(), lambda);
            let r = residual(&model, &pairs);
            assert!(r >= previous - 1e-12, "lambda {lambda}: {r} < {previous}");
            previous = r;
        }
        assert!(previous > 0.0);
        Ok(())
    }

    #[test]
    fn test_duplicate_control_points() {
        let pairs = vec![
            ControlPair::new([1.0, 2.0, 3.0], [0.0, 0.0, 0.0]),
            ControlPair::new([1.0, 2.0, 3.0], [0.0, 0.0, 0.0]),
        ];
        assert!(matches!(
            TpsModel::build(&pairs, 0.0),
            Err(TpsError::SingularSystem(LinalgError::SingularMatrix { .. }))
        ));

        let mut pairs = create_translation_pairs();
        pairs.push(ControlPair::new([1.0, 0.0, 0.0], [2.0, 0.0, 1.0]));
        assert!(matches!(
            TpsModel::build(&pairs, 0.0),
            Err(TpsError::SingularSystem(_))
        ));
    }

    #[test]
    fn test_invalid_input() {
        assert_eq!(TpsModel::build(&[], 0.0).err(), Some(TpsError::EmptyControlPoints));

        let pairs = create_translation_pairs();
        assert_eq!(
            TpsModel::build(&pairs, -1.0).err(),
            Some(TpsError::InvalidRegularization(-1.0))
        );
        assert!(matches!(
            TpsModel::build(&pairs, f64::NAN),
            Err(TpsError::InvalidRegularization(_))
        ));

        let params = TpsParams {
            snap_ratio: -1e-6,
            ..Default::default()
        };
        assert_eq!(
            TpsModel::build_with_params(&pairs, &params).err(),
            Some(TpsError::InvalidSnapRatio(-1e-6))
        );
    }

    #[test]
    fn test_influence_matrix_matches_warp() -> Result<(), TpsError> {
        let mut rng = StdRng::seed_from_u64(23);
        let pairs = create_random_pairs(&mut rng, 10);
        let model = TpsModel::build(&pairs, 0.05)?;

        let queries = create_random_pairs(&mut rng, 30)
            .into_iter()
            .map(|pair| pair.control)
            .collect::<Vec<_>>();
        let influence = model.influence_matrix(&queries);
        assert_eq!(influence.nrows(), 30);
        assert_eq!(influence.ncols(), 14);

        let rhs = Mat::<f64>::from_fn(14, 3, |i, k| if i < 10 { pairs[i].data[k] } else { 0.0 });
        let warped = &influence * &rhs;
        for (j, p) in model.warp_points(&queries).iter().enumerate() {
            for k in 0..3 {
                assert_relative_eq!(warped.read(j, k), p[k], epsilon = 1e-6);
            }
        }
        Ok(())
    }

    #[test]
    fn test_warp_points_parallel() -> Result<(), TpsError> {
        let mut rng = StdRng::seed_from_u64(24);
        let pairs = create_random_pairs(&mut rng, 12);
        let model = TpsModel::build(&pairs, 0.0)?;

        let points = create_random_pairs(&mut rng, 500)
            .into_iter()
            .map(|pair| pair.data)
            .collect::<Vec<_>>();
        assert_eq!(model.warp_points(&points), model.warp_points_par(&points));
        Ok(())
    }

    #[test]
    fn test_affine_data_has_no_bending() -> Result<(), TpsError> {
        let mut rng = StdRng::seed_from_u64(25);
        let pairs = create_random_pairs(&mut rng, 20)
            .into_iter()
            .map(|pair| {
                let c = pair.control;
                ControlPair::new(c, [2.0 * c[0] + c[1], c[1] - 1.0, 0.5 * c[2] + 3.0])
            })
            .collect::<Vec<_>>();
        let model = TpsModel::build(&pairs, 0.0)?;
        assert_relative_eq!(model.bending_energy(), 0.0, epsilon = 1e-9);

        let q = model.evaluate(&[0.5, 0.5, 0.5]);
        assert_relative_eq!(q[0], 1.5, epsilon = 1e-9);
        assert_relative_eq!(q[1], -0.5, epsilon = 1e-9);
        assert_relative_eq!(q[2], 3.25, epsilon = 1e-9);
        Ok(())
    }

    // seven well spread, non-coplanar points
    const SPREAD_POINTS: [Point3; 7] = [
        [0.0, 0.0, 0.0],
        [1.0, 0.0, 0.0],
        [0.0, 1.0, 0.0],
        [0.0, 0.0, 1.0],
        [1.0, 1.0, 0.5],
        [0.3, 0.8, 1.2],
        [-0.6, 0.4, 0.3],
    ];

    fn create_bent_pairs(
        scale: f64,
        control_offset: Point3,
        data_offset: Point3,
    ) -> Vec<ControlPair> {
        SPREAD_POINTS
            .iter()
            .map(|c| {
                let bent = [
                    c[0] + 0.1 * c[1].sin(),
                    c[1] + 0.05 * c[0] * c[2],
                    c[2] - 0.08 * c[1] * c[1],
                ];
                ControlPair::new(
                    [
                        scale * c[0] + control_offset[0],
                        scale * c[1] + control_offset[1],
                        scale * c[2] + control_offset[2],
                    ],
                    [
                        scale * bent[0] + data_offset[0],
                        scale * bent[1] + data_offset[1],
                        scale * bent[2] + data_offset[2],
                    ],
                )
            })
            .collect()
    }

    #[test]
    fn test_exact_interpolation_across_scales() -> Result<(), TpsError> {
        for scale in [1e-4, 1e-3, 1e-2, 1e-1, 1.0, 1e1, 1e2, 1e3, 1e4] {
            let pairs = create_bent_pairs(scale, [0.0; 3], [0.0; 3]);
            let model = TpsModel::build(&pairs, 0.0)?;
            assert!(model.bending_energy() > 0.0, "scale {scale}");

            for pair in &pairs {
                let p = model.evaluate(&pair.control);
                for k in 0..3 {
                    assert_relative_eq!(p[k], pair.data[k], epsilon = 1e-6 * scale);
                }
            }
        }
        Ok(())
    }

    #[test]
    fn test_mesh_scale_coordinates() -> Result<(), TpsError> {
        // unit model against the same landmarks in millimeters, away from the origin
        let unit = TpsModel::build(&create_bent_pairs(1.0, [0.0; 3], [0.0; 3]), 0.0)?;
        for scale in [1e2, 5e2, 1e3] {
            let control_offset = [120.0, -340.0, 860.0];
            let data_offset = [95.0, -310.0, 905.0];
            let pairs = create_bent_pairs(scale, control_offset, data_offset);
            let model = TpsModel::build(&pairs, 0.0)?;
            assert_relative_eq!(
                model.mean_edge_length(),
                scale * unit.mean_edge_length(),
                max_relative = 1e-12
            );

            for pair in &pairs {
                let p = model.evaluate(&pair.control);
                for k in 0..3 {
                    assert_relative_eq!(p[k], pair.data[k], epsilon = 1e-6 * scale);
                }
            }

            // away from the control points the warp is the unit warp, moved and scaled
            for q in [[0.5, 0.5, 0.5], [-1.0, 2.0, 0.3], [2.0, -0.5, 1.5]] {
                let expected = unit.evaluate(&q);
                let p = model.evaluate(&[
                    scale * q[0] + control_offset[0],
                    scale * q[1] + control_offset[1],
                    scale * q[2] + control_offset[2],
                ]);
                for k in 0..3 {
                    assert_relative_eq!(
                        p[k],
                        scale * expected[k] + data_offset[k],
                        epsilon = 1e-6 * scale
                    );
                }
            }
            assert_relative_eq!(
                model.bending_energy(),
                unit.bending_energy(),
                max_relative = 1e-6
            );
        }
        Ok(())
    }

    #[test]
    fn test_smoothing_invariant_to_units() -> Result<(), TpsError> {
        let unit = TpsModel::build(&create_bent_pairs(1.0, [0.0; 3], [0.0; 3]), 0.1)?;
        let scaled = TpsModel::build(&create_bent_pairs(1e3, [0.0; 3], [0.0; 3]), 0.1)?;
        for c in SPREAD_POINTS {
            let expected = unit.evaluate(&c);
            let p = scaled.evaluate(&[1e3 * c[0], 1e3 * c[1], 1e3 * c[2]]);
            for k in 0..3 {
                assert_relative_eq!(p[k], 1e3 * expected[k], epsilon = 1e-6);
            }
        }
        Ok(())
    }
}
