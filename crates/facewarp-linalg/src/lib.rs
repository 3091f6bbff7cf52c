#![deny(missing_docs)]
#![doc = env!("CARGO_PKG_DESCRIPTION")]

/// LU based inversion and linear solves.
pub mod lu;

/// Matrix products with small-value snapping.
pub mod ops;

pub use lu::{invert, invert_with_params, solve, solve_with_params, LuParams};
pub use ops::{matmul_snapped, max_abs, snap_to_zero};

/// Error types for the linalg module.
#[derive(Debug, thiserror::Error, PartialEq)]
#[non_exhaustive]
pub enum LinalgError {
    /// The matrix to factorize is not square.
    #[error("Expected a square matrix, got {rows}x{cols}")]
    NotSquare {
        /// Number of rows.
        rows: usize,
        /// Number of columns.
        cols: usize,
    },

    /// The matrix is singular within the configured tolerance.
    #[error("Matrix is singular: smallest pivot {min_pivot:e} vs largest {max_pivot:e}")]
    SingularMatrix {
        /// Smallest absolute pivot of the LU factorization.
        min_pivot: f64,
        /// Largest absolute pivot of the LU factorization.
        max_pivot: f64,
    },

    /// The matrix contains NaN or infinite entries.
    #[error("Matrix contains non-finite values")]
    NonFinite,

    /// The operand shapes are not compatible.
    #[error("Incompatible shapes: {left_rows}x{left_cols} and {right_rows}x{right_cols}")]
    DimensionMismatch {
        /// Rows of the left operand.
        left_rows: usize,
        /// Columns of the left operand.
        left_cols: usize,
        /// Rows of the right operand.
        right_rows: usize,
        /// Columns of the right operand.
        right_cols: usize,
    },
}
