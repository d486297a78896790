//! Wavefront OBJ reading and writing.
//!
//! The reader understands `v` and `f` records and ignores every other
//! directive. The writer emits each triangle with its own three vertices,
//! so the output never shares vertices between faces.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use bezmesh_math::Point3;
use bezmesh_tessellate::{MeshBounds, Triangle};
use log::{debug, warn};

use crate::bez::parse_number;
use crate::error::{ParseError, Result};

/// Polygons read from an OBJ file.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ObjMesh {
    /// Vertex positions in file order.
    pub vertices: Vec<Point3>,
    /// Faces as 0-based indices into `vertices`.
    pub faces: Vec<Vec<usize>>,
}

impl ObjMesh {
    /// Number of vertices.
    pub fn num_vertices(&self) -> usize {
        self.vertices.len()
    }

    /// Number of faces.
    pub fn num_faces(&self) -> usize {
        self.faces.len()
    }

    /// Axis-aligned bounds of the vertices.
    pub fn bounds(&self) -> Option<MeshBounds> {
        MeshBounds::from_points(self.vertices.iter().copied())
    }
}

/// Read an OBJ file from a path.
pub fn read_obj(path: impl AsRef<Path>) -> Result<ObjMesh> {
    let text = std::fs::read_to_string(path)?;
    parse_obj(&text)
}

/// Parse OBJ text.
///
/// Face corners may be written `i`, `i/t`, `i//n` or `i/t/n`; only the
/// vertex index is used. Indices are 1-based and must refer to a vertex
/// defined earlier in the file.
pub fn parse_obj(text: &str) -> Result<ObjMesh> {
    let mut mesh = ObjMesh::default();

    for (idx, line) in text.lines().enumerate() {
        let line_no = idx + 1;
        let mut tokens = line.split_whitespace();
        match tokens.next() {
            Some("v") => {
                let values = tokens
                    .map(|t| parse_number(line_no, t))
                    .collect::<Result<Vec<f64>>>()?;
                if values.len() < 3 {
                    return Err(ParseError::TokenCount {
                        line: line_no,
                        expected: 3,
                        found: values.len(),
                    });
                }
                if values.len() > 3 {
                    warn!("line {}: extra vertex components ignored", line_no);
                }
                mesh.vertices
                    .push(Point3::new(values[0], values[1], values[2]));
            }
            Some("f") => {
                let face = tokens
                    .map(|t| parse_face_index(line_no, t, mesh.vertices.len()))
                    .collect::<Result<Vec<usize>>>()?;
                mesh.faces.push(face);
            }
            _ => {}
        }
    }

    debug!(
        "parsed OBJ with {} vertices, {} faces",
        mesh.num_vertices(),
        mesh.num_faces()
    );
    Ok(mesh)
}

fn parse_face_index(line: usize, token: &str, vertex_count: usize) -> Result<usize> {
    let index_text = token.split('/').next().unwrap_or(token);
    let index: i64 = index_text.parse().map_err(|_| ParseError::InvalidNumber {
        line,
        token: token.to_string(),
    })?;

    match usize::try_from(index) {
        Ok(i) if (1..=vertex_count).contains(&i) => Ok(i - 1),
        _ => Err(ParseError::FaceIndex { line, index }),
    }
}

/// Write triangles to an OBJ file.
pub fn write_obj(path: impl AsRef<Path>, triangles: &[Triangle]) -> Result<()> {
    let file = File::create(path)?;
    let mut writer = BufWriter::new(file);
    write_obj_to(&mut writer, triangles)?;
    writer.flush()?;
    Ok(())
}

/// Write triangles as OBJ records.
///
/// Three `v` lines per triangle in order, then one `f` line per triangle
/// referencing its own vertices: triangle `i` becomes
/// `f 3i+1 3i+2 3i+3`.
pub fn write_obj_to<W: Write>(writer: &mut W, triangles: &[Triangle]) -> std::io::Result<()> {
    for tri in triangles {
        for p in tri.positions() {
            writeln!(writer, "v {} {} {}", p.x, p.y, p.z)?;
        }
    }
    for i in 0..triangles.len() {
        writeln!(writer, "f {} {} {}", 3 * i + 1, 3 * i + 2, 3 * i + 3)?;
    }
    Ok(())
}
