#![deny(missing_docs)]
#![doc = env!("CARGO_PKG_DESCRIPTION")]

/// The radial basis function of the spline.
pub mod kernel;

mod model;
pub use model::{ControlPair, TpsModel, TpsParams};

use facewarp_linalg::LinalgError;

/// Error types for the thin-plate-spline module.
#[derive(Debug, thiserror::Error, PartialEq)]
#[non_exhaustive]
pub enum TpsError {
    /// No control pair was given.
    #[error("At least one control pair is required")]
    EmptyControlPoints,

    /// The regularization weight is negative or not finite.
    #[error("Regularization must be finite and non-negative, got {0}")]
    InvalidRegularization(f64),

    /// The snapping ratio is negative or not finite.
    #[error("Snap ratio must be finite and non-negative, got {0}")]
    InvalidSnapRatio(f64),

    /// The spline system matrix cannot be inverted.
    #[error("Thin-plate-spline system cannot be solved")]
    SingularSystem(#[source] LinalgError),
}
