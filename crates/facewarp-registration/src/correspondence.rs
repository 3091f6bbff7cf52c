use facewarp_3d::ops::squared_distance;
use facewarp_3d::Point3;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use crate::RegistrationError;

/// The nearest target point found for one source point.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Correspondence {
    /// Index of the nearest point in the target set.
    pub target_index: usize,
    /// Squared Euclidean distance to that point.
    pub squared_distance: f64,
}

/// For every source point, its nearest target point.
///
/// Entry `i` belongs to source point `i`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CorrespondenceMap {
    matches: Vec<Correspondence>,
    num_targets: usize,
}

impl CorrespondenceMap {
    /// Number of source points.
    pub fn len(&self) -> usize {
        self.matches.len()
    }

    /// Check if the map holds no source point.
    pub fn is_empty(&self) -> bool {
        self.matches.is_empty()
    }

    /// The match of source point `index`.
    pub fn get(&self, index: usize) -> Option<&Correspondence> {
        self.matches.get(index)
    }

    /// Iterate over the matches in source order.
    pub fn iter(&self) -> std::slice::Iter<'_, Correspondence> {
        self.matches.iter()
    }

    /// The matches as a slice.
    pub fn as_slice(&self) -> &[Correspondence] {
        &self.matches
    }

    /// The matched target index of every source point.
    pub fn target_indices(&self) -> Vec<usize> {
        self.matches.iter().map(|m| m.target_index).collect()
    }

    /// Size of the target set the map was computed against.
    pub fn num_targets(&self) -> usize {
        self.num_targets
    }

    /// Mean squared distance over all matches, `None` when empty.
    pub fn mean_squared_distance(&self) -> Option<f64> {
        if self.matches.is_empty() {
            return None;
        }
        let sum = self.matches.iter().map(|m| m.squared_distance).sum::<f64>();
        Some(sum / self.matches.len() as f64)
    }

    /// Root mean squared distance over all matches, `None` when empty.
    pub fn rmse(&self) -> Option<f64> {
        self.mean_squared_distance().map(f64::sqrt)
    }
}

impl<'a> IntoIterator for &'a CorrespondenceMap {
    type Item = &'a Correspondence;
    type IntoIter = std::slice::Iter<'a, Correspondence>;

    fn into_iter(self) -> Self::IntoIter {
        self.matches.iter()
    }
}

/// Find the target point nearest to `query` by exhaustive scan.
///
/// Ties resolve to the lowest target index. Returns `None` if `target` is empty. The points
/// must be finite: a NaN distance never wins the comparison.
pub fn nearest_neighbor(query: &Point3, target: &[Point3]) -> Option<Correspondence> {
    let mut best: Option<Correspondence> = None;
    for (target_index, p) in target.iter().enumerate() {
        let d = squared_distance(query, p);
        // strict comparison keeps the first of equally distant points
        if best.map_or(true, |b| d < b.squared_distance) {
            best = Some(Correspondence {
                target_index,
                squared_distance: d,
            });
        }
    }
    best
}

fn check_finite(points: &[Point3], name: &'static str) -> Result<(), RegistrationError> {
    match points.iter().position(|p| !p.iter().all(|v| v.is_finite())) {
        Some(index) => Err(RegistrationError::NonFinite { name, index }),
        None => Ok(()),
    }
}

/// Match every source point to its nearest target point.
///
/// Brute force, `O(|source| * |target|)`. The result is deterministic: ties resolve to the
/// lowest target index.
///
/// # Errors
///
/// * [`RegistrationError::EmptyTarget`] if `target` is empty, even when `source` is empty
///   too.
/// * [`RegistrationError::NonFinite`] if a point of either set has a NaN or infinite
///   coordinate.
///
/// Example:
///
/// ```
/// use facewarp_registration::find_correspondences;
///
/// let source = vec![[0.0, 0.0, 0.0]];
/// let target = vec![[1.0, 0.0, 0.0], [0.0, 1.0, 0.0]];
/// let map = find_correspondences(&source, &target).unwrap();
/// assert_eq!(map.target_indices(), vec![0]);
/// ```
pub fn find_correspondences(
    source: &[Point3],
    target: &[Point3],
) -> Result<CorrespondenceMap, RegistrationError> {
    if target.is_empty() {
        return Err(RegistrationError::EmptyTarget);
    }
    check_finite(source, "source")?;
    check_finite(target, "target")?;

    let matches = source
        .iter()
        .map(|p| nearest_neighbor(p, target).ok_or(RegistrationError::EmptyTarget))
        .collect::<Result<Vec<_>, _>>()?;

    log::debug!(
        "matched {} source points against {} target points",
        source.len(),
        target.len()
    );

    Ok(CorrespondenceMap {
        matches,
        num_targets: target.len(),
    })
}

/// Parallel version of [`find_correspondences`] over the source points.
///
/// Each source point is searched independently, so the result is identical to the
/// sequential version.
pub fn find_correspondences_par(
    source: &[Point3],
    target: &[Point3],
) -> Result<CorrespondenceMap, RegistrationError> {
    if target.is_empty() {
        return Err(RegistrationError::EmptyTarget);
    }
    check_finite(source, "source")?;
    check_finite(target, "target")?;

    let matches = source
        .par_iter()
        .map(|p| nearest_neighbor(p, target).ok_or(RegistrationError::EmptyTarget))
        .collect::<Result<Vec<_>, _>>()?;

    log::debug!(
        "matched {} source points against {} target points in parallel",
        source.len(),
        target.len()
    );

    Ok(CorrespondenceMap {
        matches,
        num_targets: target.len(),
    })
}
