use std::fs::File;
use std::io::{BufRead, BufReader, Write};
use std::path::Path;

use crate::Point3;

/// Error types for the OBJ module.
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum ObjError {
    /// Failed to read or write the OBJ stream
    #[error("Failed to read OBJ file")]
    Io(#[from] std::io::Error),

    /// A vertex line did not carry three coordinates
    #[error("Malformed OBJ vertex at line {line}: {content:?}")]
    MalformedVertex {
        /// 1-based line number.
        line: usize,
        /// The offending line.
        content: String,
    },
}

/// Vertex data collected from the `v` lines of an OBJ file.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ObjVertices {
    /// Vertex positions in file order.
    pub positions: Vec<Point3>,
    /// Per-vertex colors, present only when every vertex line carries `r g b` after the position.
    pub colors: Option<Vec<[f64; 3]>>,
}

impl ObjVertices {
    /// Get the number of vertices.
    pub fn len(&self) -> usize {
        self.positions.len()
    }

    /// Check if no vertex was read.
    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }
}

struct VertexLine {
    position: Point3,
    color: Option<[f64; 3]>,
    // the tokens following the position, kept verbatim
    rest: Vec<String>,
}

// Returns `Ok(None)` for any line that is not a `v` line.
fn parse_vertex_line(line: &str, line_number: usize) -> Result<Option<VertexLine>, ObjError> {
    let mut tokens = line.split_whitespace();
    if tokens.next() != Some("v") {
        return Ok(None);
    }

    let malformed = || ObjError::MalformedVertex {
        line: line_number,
        content: line.to_string(),
    };

    let mut position = [0.0; 3];
    for coord in position.iter_mut() {
        *coord = tokens
            .next()
            .and_then(|t| t.parse::<f64>().ok())
            .ok_or_else(malformed)?;
    }

    let rest = tokens.map(str::to_string).collect::<Vec<_>>();
    let color = match rest.as_slice() {
        [r, g, b, ..] => match (r.parse::<f64>(), g.parse::<f64>(), b.parse::<f64>()) {
            (Ok(r), Ok(g), Ok(b)) => Some([r, g, b]),
            _ => None,
        },
        _ => None,
    };

    Ok(Some(VertexLine {
        position,
        color,
        rest,
    }))
}

/// Parse the vertex positions (and colors, if any) of an OBJ stream.
///
/// Only `v` lines are read; texture coordinates, normals, faces and comments are skipped.
pub fn parse_obj_vertices<R: BufRead>(reader: R) -> Result<ObjVertices, ObjError> {
    let mut positions = Vec::new();
    let mut colors = Vec::new();
    let mut all_colored = true;

    for (idx, line) in reader.lines().enumerate() {
        let line = line?;
        let Some(vertex) = parse_vertex_line(&line, idx + 1)? else {
            continue;
        };
        positions.push(vertex.position);
        match vertex.color {
            Some(color) => colors.push(color),
            None => all_colored = false,
        }
    }

    let colors = (all_colored && !positions.is_empty()).then_some(colors);

    log::debug!(
        "parsed {} OBJ vertices (colored: {})",
        positions.len(),
        colors.is_some()
    );

    Ok(ObjVertices { positions, colors })
}

/// Read the vertices of an OBJ file.
pub fn read_obj_vertices(path: impl AsRef<Path>) -> Result<ObjVertices, ObjError> {
    let file = File::open(path.as_ref())?;
    parse_obj_vertices(BufReader::new(file))
}

/// Stream an OBJ file, replacing every vertex position.
///
/// `f` receives the vertex index (in file order) and its position and returns the new
/// position. Tokens after the position (vertex colors) are written back unchanged and every
/// non-vertex line is copied through as-is.
///
/// # Returns
///
/// The number of vertices rewritten.
pub fn rewrite_obj_vertices<R, W, F>(reader: R, writer: W, mut f: F) -> Result<usize, ObjError>
where
    R: BufRead,
    W: Write,
    F: FnMut(usize, &Point3) -> Point3,
{
    rewrite_vertex_lines(reader, writer, |idx, position| (f(idx, position), None))
}

/// Stream an OBJ file, replacing every vertex position and color.
///
/// Like [`rewrite_obj_vertices`], but `f` also returns the `r g b` color written after the
/// position. Any tokens following the position in the input are dropped.
pub fn rewrite_obj_vertices_colored<R, W, F>(
    reader: R,
    writer: W,
    mut f: F,
) -> Result<usize, ObjError>
where
    R: BufRead,
    W: Write,
    F: FnMut(usize, &Point3) -> (Point3, [f64; 3]),
{
    rewrite_vertex_lines(reader, writer, |idx, position| {
        let (p, color) = f(idx, position);
        (p, Some(color))
    })
}

// A `None` color keeps the trailing tokens of the input line.
fn rewrite_vertex_lines<R, W, F>(reader: R, mut writer: W, mut f: F) -> Result<usize, ObjError>
where
    R: BufRead,
    W: Write,
    F: FnMut(usize, &Point3) -> (Point3, Option<[f64; 3]>),
{
    let mut num_vertices = 0;

    for (idx, line) in reader.lines().enumerate() {
        let line = line?;
        match parse_vertex_line(&line, idx + 1)? {
            Some(vertex) => {
                let (p, color) = f(num_vertices, &vertex.position);
                write!(writer, "v {} {} {}", p[0], p[1], p[2])?;
                match color {
                    Some(c) => write!(writer, " {} {} {}", c[0], c[1], c[2])?,
                    None => {
                        for token in &vertex.rest {
                            write!(writer, " {token}")?;
                        }
                    }
                }
                writeln!(writer)?;
                num_vertices += 1;
            }
            None => writeln!(writer, "{line}")?,
        }
    }

    writer.flush()?;

    Ok(num_vertices)
}
