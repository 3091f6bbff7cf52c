use facewarp_3d::ops::squared_distance;
use facewarp_3d::Point3;

/// The spline basis `U(r) = r^2 * ln(r)`, with `U(0) = 0`.
///
/// Example:
///
/// ```
/// use facewarp_tps::kernel::tps_kernel;
///
/// assert_eq!(tps_kernel(0.0), 0.0);
/// assert_eq!(tps_kernel(1.0), 0.0);
/// assert!((tps_kernel(2.0) - 4.0 * 2f64.ln()).abs() < 1e-12);
/// ```
#[inline]
pub fn tps_kernel(r: f64) -> f64 {
    if r == 0.0 {
        0.0
    } else {
        r * r * r.ln()
    }
}

/// [`tps_kernel`] of the distance between two points, computed from the squared distance.
#[inline]
pub fn tps_kernel_between(a: &Point3, b: &Point3) -> f64 {
    let r2 = squared_distance(a, b);
    if r2 == 0.0 {
        0.0
    } else {
        // r^2 * ln(r) = r^2 * ln(r^2) / 2
        0.5 * r2 * r2.ln()
    }
}
