use std::fs::File;
use std::io::{BufRead, BufReader, Write};
use std::path::Path;

use crate::Point3;

/// Error types for the landmark module.
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum LandmarkError {
    /// Failed to read or write the landmark file
    #[error("Failed to read landmark file")]
    Io(#[from] std::io::Error),

    /// A line did not contain three floating point coordinates
    #[error("Malformed landmark at line {line}: {content:?}")]
    Malformed {
        /// 1-based line number.
        line: usize,
        /// The offending line.
        content: String,
    },
}

/// Parse landmarks from a reader.
///
/// Each non-empty line holds one landmark as three whitespace separated coordinates.
/// Tokens after the third are ignored, as are lines starting with `#`.
pub fn parse_landmarks<R: BufRead>(reader: R) -> Result<Vec<Point3>, LandmarkError> {
    let mut landmarks = Vec::new();

    for (idx, line) in reader.lines().enumerate() {
        let line = line?;
        let trimmed = line.trim();
        if trimmed.is_empty() || trimmed.starts_with('#') {
            continue;
        }

        let malformed = || LandmarkError::Malformed {
            line: idx + 1,
            content: line.clone(),
        };

        let mut coords = [0.0; 3];
        let mut tokens = trimmed.split_whitespace();
        for coord in coords.iter_mut() {
            *coord = tokens
                .next()
                .and_then(|t| t.parse::<f64>().ok())
                .ok_or_else(malformed)?;
        }
        landmarks.push(coords);
    }

    log::debug!("parsed {} landmarks", landmarks.len());

    Ok(landmarks)
}

/// Read landmarks from a text file.
///
/// # Arguments
///
/// * `path` - The path to the landmark file.
///
/// # Returns
///
/// The landmarks in file order.
pub fn read_landmarks(path: impl AsRef<Path>) -> Result<Vec<Point3>, LandmarkError> {
    let file = File::open(path.as_ref())?;
    parse_landmarks(BufReader::new(file))
}

/// Write landmarks one per line as `x y z`.
pub fn write_landmarks<W: Write>(mut writer: W, points: &[Point3]) -> Result<(), LandmarkError> {
    for p in points {
        writeln!(writer, "{} {} {}", p[0], p[1], p[2])?;
    }
    writer.flush()?;
    Ok(())
}
