//! Mesh representation for 3D models
//!
//! Plain geometry containers consumed by the bounds calculator and the
//! rasterizer. Meshes are shared between a prototype and its instances through
//! `Arc`, so instantiating an asset never copies vertex data.

use crate::foundation::math::Vec3;
use thiserror::Error;

/// Geometry validation failures
#[derive(Error, Debug, Clone, PartialEq)]
pub enum MeshError {
    /// Index buffer length is not a multiple of three
    #[error("index count {0} is not a multiple of 3")]
    IncompleteTriangle(usize),

    /// An index refers past the end of the vertex buffer
    #[error("index {index} out of range for {vertex_count} vertices")]
    IndexOutOfRange {
        /// Offending index value
        index: u32,
        /// Number of vertices in the mesh
        vertex_count: usize,
    },

    /// A vertex position contains NaN or infinity
    #[error("vertex {0} has a non-finite position")]
    NonFiniteVertex(usize),
}

/// 3D vertex with position and normal
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Vertex {
    /// Position in mesh-local space
    pub position: [f32; 3],

    /// Normal vector
    pub normal: [f32; 3],
}

impl Vertex {
    /// Create a new vertex
    pub fn new(position: [f32; 3], normal: [f32; 3]) -> Self {
        Self { position, normal }
    }

    /// Position as a vector
    pub fn position_vec(&self) -> Vec3 {
        Vec3::from(self.position)
    }
}

/// 3D mesh containing vertices and indices for rendering
///
/// Triangles are stored as an index list, three indices per triangle. Winding
/// order does not matter to the icon rasterizer, which draws both faces.
#[derive(Debug, Clone, Default)]
pub struct Mesh {
    /// Vertex data
    pub vertices: Vec<Vertex>,

    /// Index data for triangles
    pub indices: Vec<u32>,
}

impl Mesh {
    /// Create a new mesh
    pub fn new(vertices: Vec<Vertex>, indices: Vec<u32>) -> Self {
        Self { vertices, indices }
    }

    /// Returns true when the mesh has no vertices to draw
    pub fn is_empty(&self) -> bool {
        self.vertices.is_empty()
    }

    /// Number of triangles described by the index buffer
    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }

    /// Local-space axis-aligned bounds as `(min, max)`
    ///
    /// Returns `None` for meshes without vertices.
    pub fn local_bounds(&self) -> Option<(Vec3, Vec3)> {
        let first = self.vertices.first()?.position_vec();
        let bounds = self.vertices.iter().skip(1).fold((first, first), |(min, max), v| {
            let p = v.position_vec();
            (min.inf(&p), max.sup(&p))
        });
        Some(bounds)
    }

    /// Check that every index is in range and every position is finite
    pub fn validate(&self) -> Result<(), MeshError> {
        if self.indices.len() % 3 != 0 {
            return Err(MeshError::IncompleteTriangle(self.indices.len()));
        }
        if let Some(&index) = self.indices.iter().find(|&&i| i as usize >= self.vertices.len()) {
            return Err(MeshError::IndexOutOfRange {
                index,
                vertex_count: self.vertices.len(),
            });
        }
        if let Some(i) = self
            .vertices
            .iter()
            .position(|v| v.position.iter().any(|c| !c.is_finite()))
        {
            return Err(MeshError::NonFiniteVertex(i));
        }
        Ok(())
    }

    /// Create an axis-aligned box centered at the origin
    ///
    /// Each face has its own four vertices so normals stay flat per face.
    pub fn cuboid(half_extents: Vec3) -> Self {
        let (hx, hy, hz) = (half_extents.x, half_extents.y, half_extents.z);
        let faces: [([f32; 3], [[f32; 3]; 4]); 6] = [
            // Front (+Z)
            ([0.0, 0.0, 1.0], [[-hx, -hy, hz], [hx, -hy, hz], [hx, hy, hz], [-hx, hy, hz]]),
            // Back (-Z)
            ([0.0, 0.0, -1.0], [[hx, -hy, -hz], [-hx, -hy, -hz], [-hx, hy, -hz], [hx, hy, -hz]]),
            // Left (-X)
            ([-1.0, 0.0, 0.0], [[-hx, -hy, -hz], [-hx, -hy, hz], [-hx, hy, hz], [-hx, hy, -hz]]),
            // Right (+X)
            ([1.0, 0.0, 0.0], [[hx, -hy, hz], [hx, -hy, -hz], [hx, hy, -hz], [hx, hy, hz]]),
            // Top (+Y)
            ([0.0, 1.0, 0.0], [[-hx, hy, hz], [hx, hy, hz], [hx, hy, -hz], [-hx, hy, -hz]]),
            // Bottom (-Y)
            ([0.0, -1.0, 0.0], [[-hx, -hy, -hz], [hx, -hy, -hz], [hx, -hy, hz], [-hx, -hy, hz]]),
        ];

        let mut vertices = Vec::with_capacity(24);
        let mut indices = Vec::with_capacity(36);
        for (normal, corners) in faces {
            let base = vertices.len() as u32;
            vertices.extend(corners.iter().map(|&c| Vertex::new(c, normal)));
            indices.extend_from_slice(&[base, base + 1, base + 2, base + 2, base + 3, base]);
        }

        Self::new(vertices, indices)
    }

    /// Create a unit cube spanning `[-0.5, 0.5]` on every axis
    pub fn unit_cube() -> Self {
        Self::cuboid(Vec3::new(0.5, 0.5, 0.5))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unit_cube_layout() {
        let cube = Mesh::unit_cube();
        assert_eq!(cube.vertices.len(), 24);
        assert_eq!(cube.triangle_count(), 12);
        assert!(cube.validate().is_ok());

        let (min, max) = cube.local_bounds().unwrap();
        assert_eq!(min, Vec3::new(-0.5, -0.5, -0.5));
        assert_eq!(max, Vec3::new(0.5, 0.5, 0.5));
    }

    #[test]
    fn test_empty_mesh_has_no_bounds() {
        assert!(Mesh::default().local_bounds().is_none());
        assert!(Mesh::default().is_empty());
    }

    #[test]
    fn test_validate_rejects_out_of_range_index() {
        let mut mesh = Mesh::unit_cube();
        mesh.indices[4] = 99;
        assert_eq!(
            mesh.validate(),
            Err(MeshError::IndexOutOfRange { index: 99, vertex_count: 24 })
        );
    }

    #[test]
    fn test_validate_rejects_partial_triangle_and_nan() {
        let mut mesh = Mesh::unit_cube();
        mesh.indices.pop();
        assert_eq!(mesh.validate(), Err(MeshError::IncompleteTriangle(35)));

        let mut mesh = Mesh::unit_cube();
        mesh.vertices[3].position[1] = f32::NAN;
        assert_eq!(mesh.validate(), Err(MeshError::NonFiniteVertex(3)));
    }
}
