//! OBJ file loader for 3D models

use crate::render::mesh::{Mesh, Vertex};
use std::fs::File;
use std::io::{BufRead, BufReader, Read};
use std::path::Path;
use thiserror::Error;

/// OBJ parsing failures
#[derive(Error, Debug)]
pub enum ObjError {
    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    /// A numeric field failed to parse
    #[error("Parse error on line {line}: {message}")]
    ParseError {
        /// 1-based line number
        line: usize,
        /// What could not be parsed
        message: String,
    },
    /// Structurally invalid file
    #[error("Invalid format: {0}")]
    InvalidFormat(String),
}

/// Wavefront OBJ loader
pub struct ObjLoader;

impl ObjLoader {
    /// Load an OBJ file and return a mesh
    pub fn load_obj<P: AsRef<Path>>(path: P) -> Result<Mesh, ObjError> {
        let file = File::open(path)?;
        Self::parse(BufReader::new(file))
    }

    /// Parse OBJ text from any reader
    ///
    /// Supports `v`, `vn` and `f` records; polygons are fan-triangulated and
    /// negative (relative) indices are resolved. Faces without normals get a
    /// zero normal, which the rasterizer replaces with the face normal.
    pub fn parse<R: Read>(reader: BufReader<R>) -> Result<Mesh, ObjError> {
        let mut positions: Vec<[f32; 3]> = Vec::new();
        let mut normals: Vec<[f32; 3]> = Vec::new();
        let mut vertices = Vec::new();
        let mut indices = Vec::new();

        for (line_index, line) in reader.lines().enumerate() {
            let line = line?;
            let line_number = line_index + 1;
            let line = line.trim();

            if line.is_empty() || line.starts_with('#') {
                continue;
            }

            let parts: Vec<&str> = line.split_whitespace().collect();
            match parts[0] {
                "v" => positions.push(parse_triplet(&parts, line_number, "vertex")?),
                "vn" => normals.push(parse_triplet(&parts, line_number, "normal")?),
                "f" => {
                    if parts.len() < 4 {
                        return Err(ObjError::InvalidFormat(format!(
                            "face on line {line_number} has fewer than 3 vertices"
                        )));
                    }

                    let mut face_indices = Vec::with_capacity(parts.len() - 1);
                    for vertex_data in &parts[1..] {
                        let mut fields = vertex_data.split('/');
                        let pos_idx = fields
                            .next()
                            .ok_or_else(|| ObjError::InvalidFormat(format!("empty face vertex on line {line_number}")))
                            .and_then(|f| resolve_index(f, positions.len(), line_number))?;
                        let position = positions.get(pos_idx).ok_or_else(|| {
                            ObjError::InvalidFormat(format!("position index out of bounds on line {line_number}"))
                        })?;

                        // Texture coordinates are not used by icon rendering
                        let _tex = fields.next();
                        let normal = match fields.next() {
                            Some(f) if !f.is_empty() => {
                                let idx = resolve_index(f, normals.len(), line_number)?;
                                *normals.get(idx).ok_or_else(|| {
                                    ObjError::InvalidFormat(format!("normal index out of bounds on line {line_number}"))
                                })?
                            }
                            _ => [0.0, 0.0, 0.0],
                        };

                        vertices.push(Vertex::new(*position, normal));
                        face_indices.push((vertices.len() - 1) as u32);
                    }

                    // Triangulate face (simple fan triangulation)
                    for i in 1..(face_indices.len() - 1) {
                        indices.extend_from_slice(&[face_indices[0], face_indices[i], face_indices[i + 1]]);
                    }
                }
                _ => {
                    // Ignore other commands
                }
            }
        }

        if vertices.is_empty() {
            return Err(ObjError::InvalidFormat("No faces found in OBJ file".to_string()));
        }

        log::debug!("Parsed OBJ: {} vertices, {} triangles", vertices.len(), indices.len() / 3);
        Ok(Mesh::new(vertices, indices))
    }
}

fn parse_triplet(parts: &[&str], line: usize, what: &str) -> Result<[f32; 3], ObjError> {
    if parts.len() < 4 {
        return Err(ObjError::ParseError {
            line,
            message: format!("{what} needs 3 components"),
        });
    }
    let mut out = [0.0f32; 3];
    for (slot, text) in out.iter_mut().zip(&parts[1..4]) {
        *slot = text.parse().map_err(|_| ObjError::ParseError {
            line,
            message: format!("invalid {what} component '{text}'"),
        })?;
    }
    Ok(out)
}

/// Convert a 1-based (or negative, relative) OBJ index to a 0-based one
fn resolve_index(field: &str, count: usize, line: usize) -> Result<usize, ObjError> {
    let raw: i64 = field.parse().map_err(|_| ObjError::ParseError {
        line,
        message: format!("invalid index '{field}'"),
    })?;
    let resolved = match raw {
        0 => None,
        r if r > 0 => Some(r - 1),
        r => Some(count as i64 + r),
    };
    resolved
        .and_then(|i| usize::try_from(i).ok())
        .ok_or_else(|| ObjError::InvalidFormat(format!("index {raw} is invalid on line {line}")))
}
