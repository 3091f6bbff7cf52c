#![deny(missing_docs)]
#![doc = env!("CARGO_PKG_DESCRIPTION")]

mod correspondence;
pub use correspondence::*;

mod kabsch;
pub use kabsch::*;

mod projection;
pub use projection::*;

mod transform;
pub use transform::SimilarityTransform;

/// Error types for the registration module.
#[derive(Debug, thiserror::Error, PartialEq)]
#[non_exhaustive]
pub enum RegistrationError {
    /// Paired inputs have different lengths.
    #[error("Mismatched lengths: {left_name} ({left_len}) != {right_name} ({right_len})")]
    DimensionMismatch {
        /// Label for the left-hand input.
        left_name: &'static str,
        /// Length of the left-hand input.
        left_len: usize,
        /// Label for the right-hand input.
        right_name: &'static str,
        /// Length of the right-hand input.
        right_len: usize,
    },

    /// The landmarks do not determine a unique transform.
    #[error("Degenerate input: {0}")]
    DegenerateInput(String),

    /// Nearest neighbor search against an empty target set.
    #[error("Target point set is empty")]
    EmptyTarget,

    /// A point has a NaN or infinite coordinate.
    #[error("Non-finite coordinate in {name} point {index}")]
    NonFinite {
        /// Label of the point set.
        name: &'static str,
        /// Index of the first offending point.
        index: usize,
    },

    /// A numeric parameter is out of its valid range.
    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),
}
