/// Landmark text file reader and writer.
pub mod landmarks;

/// Wavefront OBJ vertex reader and vertex rewriting.
pub mod obj;
