use serde::{Deserialize, Serialize};

use crate::Point3;

/// An ordered set of 3d points.
///
/// The order is meaningful: two sets passed together to a landmark alignment are matched
/// index by index, while a set passed to a nearest neighbor search is just a bag of samples.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PointSet {
    // The points in the set.
    points: Vec<Point3>,
}

impl PointSet {
    /// Create a new point set taking ownership of the points.
    pub fn new(points: Vec<Point3>) -> Self {
        Self { points }
    }

    /// Get the number of points in the set.
    #[inline]
    pub fn len(&self) -> usize {
        self.points.len()
    }

    /// Check if the set is empty.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Get as reference the points in the set.
    pub fn points(&self) -> &[Point3] {
        &self.points
    }

    /// Get the point at `index`, if any.
    #[inline]
    pub fn get(&self, index: usize) -> Option<&Point3> {
        self.points.get(index)
    }

    /// Iterate over the points in order.
    pub fn iter(&self) -> std::slice::Iter<'_, Point3> {
        self.points.iter()
    }

    /// Consume the set and return the points.
    pub fn into_points(self) -> Vec<Point3> {
        self.points
    }

    /// Compute the mean of the points, or `None` for an empty set.
    pub fn centroid(&self) -> Option<Point3> {
        crate::ops::centroid(&self.points)
    }

    /// Get the minimum bound of the set.
    pub fn min_bound(&self) -> Option<Point3> {
        let first = *self.points.first()?;
        Some(self.points.iter().fold(first, |a, b| {
            [a[0].min(b[0]), a[1].min(b[1]), a[2].min(b[2])]
        }))
    }

    /// Get the maximum bound of the set.
    pub fn max_bound(&self) -> Option<Point3> {
        let first = *self.points.first()?;
        Some(self.points.iter().fold(first, |a, b| {
            [a[0].max(b[0]), a[1].max(b[1]), a[2].max(b[2])]
        }))
    }
}

impl From<Vec<Point3>> for PointSet {
    fn from(points: Vec<Point3>) -> Self {
        Self::new(points)
    }
}

impl From<&[Point3]> for PointSet {
    fn from(points: &[Point3]) -> Self {
        Self::new(points.to_vec())
    }
}

impl FromIterator<Point3> for PointSet {
    fn from_iter<I: IntoIterator<Item = Point3>>(iter: I) -> Self {
        Self::new(iter.into_iter().collect())
    }
}

impl AsRef<[Point3]> for PointSet {
    fn as_ref(&self) -> &[Point3] {
        &self.points
    }
}

impl<'a> IntoIterator for &'a PointSet {
    type Item = &'a Point3;
    type IntoIter = std::slice::Iter<'a, Point3>;

    fn into_iter(self) -> Self::IntoIter {
        self.points.iter()
    }
}
