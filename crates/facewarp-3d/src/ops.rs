use crate::Point3;

/// Compute the squared Euclidean distance between two points.
///
/// Example:
/// ```
/// use facewarp_3d::ops::squared_distance;
///
/// let a = [1.0, 2.0, 3.0];
/// let b = [4.0, 6.0, 3.0];
/// assert_eq!(squared_distance(&a, &b), 25.0);
/// ```
#[inline]
pub fn squared_distance(a: &Point3, b: &Point3) -> f64 {
    let dx = a[0] - b[0];
    let dy = a[1] - b[1];
    let dz = a[2] - b[2];
    dx * dx + dy * dy + dz * dz
}

/// Compute the Euclidean distance between two points.
#[inline]
pub fn euclidean_distance(a: &Point3, b: &Point3) -> f64 {
    squared_distance(a, b).sqrt()
}

/// Linearly interpolate between `a` (`t = 0`) and `b` (`t = 1`).
#[inline]
pub fn lerp(a: &Point3, b: &Point3, t: f64) -> Point3 {
    [
        a[0] + (b[0] - a[0]) * t,
        a[1] + (b[1] - a[1]) * t,
        a[2] + (b[2] - a[2]) * t,
    ]
}

/// Compute the mean of the points, or `None` for an empty slice.
pub fn centroid(points: &[Point3]) -> Option<Point3> {
    if points.is_empty() {
        return None;
    }
    let n = points.len() as f64;
    let sum = points.iter().fold([0.0; 3], |acc, p| {
        [acc[0] + p[0], acc[1] + p[1], acc[2] + p[2]]
    });
    Some([sum[0] / n, sum[1] / n, sum[2] / n])
}

/// Subtract `center` from every point.
pub fn center_points(points: &[Point3], center: &Point3) -> Vec<Point3> {
    points
        .iter()
        .map(|p| [p[0] - center[0], p[1] - center[1], p[2] - center[2]])
        .collect()
}
