#![deny(missing_docs)]
#![doc = env!("CARGO_PKG_DESCRIPTION")]

/// I/O utilities for reading and writing landmark and mesh vertex files.
pub mod io;

/// Linear algebra utilities for 3x3 matrices and 3d vectors.
pub mod linalg;

/// Operations on 3d points.
pub mod ops;

/// Ordered point sets.
pub mod pointset;

/// 3D transforms algorithms.
pub mod transforms;

/// A 3d point `[x, y, z]`.
pub type Point3 = [f64; 3];

pub use pointset::PointSet;
