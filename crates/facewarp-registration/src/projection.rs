use facewarp_3d::ops::lerp;
use facewarp_3d::Point3;

use crate::{CorrespondenceMap, RegistrationError};

fn check_targets(map: &CorrespondenceMap, num_targets: usize) -> Result<(), RegistrationError> {
    if map.num_targets() != num_targets {
        return Err(RegistrationError::DimensionMismatch {
            left_name: "correspondence targets",
            left_len: map.num_targets(),
            right_name: "target attributes",
            right_len: num_targets,
        });
    }
    Ok(())
}

/// Copy a per-point attribute (color, label, ...) of the matched target point onto every
/// source point.
///
/// # Errors
///
/// [`RegistrationError::DimensionMismatch`] if `target_attributes` does not have one entry
/// per target point of `map`.
pub fn transfer_attributes<T: Clone>(
    map: &CorrespondenceMap,
    target_attributes: &[T],
) -> Result<Vec<T>, RegistrationError> {
    check_targets(map, target_attributes.len())?;
    Ok(map
        .iter()
        .map(|m| target_attributes[m.target_index].clone())
        .collect())
}

/// Move every source point towards its matched target point.
///
/// `weight = 0` leaves the source unchanged and `weight = 1` snaps each point onto its match.
/// Weights outside `[0, 1]` are clamped.
///
/// # Errors
///
/// * [`RegistrationError::InvalidParameter`] if `weight` is not finite.
/// * [`RegistrationError::DimensionMismatch`] if `map` was not computed for these sets.
pub fn project_onto(
    source: &[Point3],
    target: &[Point3],
    map: &CorrespondenceMap,
    weight: f64,
) -> Result<Vec<Point3>, RegistrationError> {
    if !weight.is_finite() {
        return Err(RegistrationError::InvalidParameter(format!(
            "projection weight must be finite, got {weight}"
        )));
    }
    if source.len() != map.len() {
        return Err(RegistrationError::DimensionMismatch {
            left_name: "source",
            left_len: source.len(),
            right_name: "correspondences",
            right_len: map.len(),
        });
    }
    check_targets(map, target.len())?;

    let weight = weight.clamp(0.0, 1.0);
    Ok(source
        .iter()
        .zip(map.iter())
        .map(|(p, m)| lerp(p, &target[m.target_index], weight))
        .collect())
}
