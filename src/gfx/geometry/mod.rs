//! # Procedural Geometry Generation
//!
//! Generates the primitive shapes the scenes are assembled from,
//! eliminating the need for external model files. All primitives are
//! unit-ish shapes centered on the origin in a Y-up coordinate system;
//! node scales stretch them to their final dimensions.

pub mod primitives;

pub use primitives::*;

use crate::gfx::vertex::Vertex3D;
use crate::simulation::collision::Aabb;
use cgmath::Vector3;

/// Represents generated geometry data ready for GPU upload
#[derive(Debug, Clone)]
pub struct GeometryData {
    /// Vertex positions (x, y, z)
    pub vertices: Vec<[f32; 3]>,
    /// Texture coordinates (u, v)
    pub tex_coords: Vec<[f32; 2]>,
    /// Normal vectors (x, y, z)
    pub normals: Vec<[f32; 3]>,
    /// Triangle indices (counter-clockwise winding)
    pub indices: Vec<u32>,
}

impl GeometryData {
    /// Create a new empty geometry data structure
    pub fn new() -> Self {
        Self {
            vertices: Vec::new(),
            tex_coords: Vec::new(),
            normals: Vec::new(),
            indices: Vec::new(),
        }
    }

    /// Get the number of vertices in this geometry
    pub fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    /// Get the number of triangles in this geometry
    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }

    /// Local-space bounds of the raw vertices.
    pub fn local_aabb(&self) -> Aabb {
        let mut bounds = Aabb::EMPTY;
        for v in &self.vertices {
            bounds.expand_by_point(Vector3::new(v[0], v[1], v[2]));
        }
        bounds
    }

    /// Interleaves positions, normals, and UVs for the vertex buffer.
    pub fn to_vertices(&self) -> Vec<Vertex3D> {
        (0..self.vertices.len())
            .map(|i| Vertex3D {
                position: self.vertices[i],
                normal: self.normals.get(i).copied().unwrap_or([0.0, 1.0, 0.0]),
                uv: self.tex_coords.get(i).copied().unwrap_or([0.0, 0.0]),
            })
            .collect()
    }

    /// Rebuilds per-vertex normals by averaging adjacent face normals.
    ///
    /// Used after displacing a grid (terrain), where authored normals no
    /// longer match the surface.
    pub fn recompute_normals(&mut self) {
        let mut normals = vec![[0.0f32; 3]; self.vertices.len()];

        for triangle in self.indices.chunks(3) {
            let [i0, i1, i2] = [
                triangle[0] as usize,
                triangle[1] as usize,
                triangle[2] as usize,
            ];
            let v0 = Vector3::from(self.vertices[i0]);
            let v1 = Vector3::from(self.vertices[i1]);
            let v2 = Vector3::from(self.vertices[i2]);

            let face = (v1 - v0).cross(v2 - v0);
            for &i in &[i0, i1, i2] {
                normals[i][0] += face.x;
                normals[i][1] += face.y;
                normals[i][2] += face.z;
            }
        }

        for n in normals.iter_mut() {
            let len = (n[0] * n[0] + n[1] * n[1] + n[2] * n[2]).sqrt();
            if len > 0.0 {
                n[0] /= len;
                n[1] /= len;
                n[2] /= len;
            }
        }

        self.normals = normals;
    }
}

impl Default for GeometryData {
    fn default() -> Self {
        Self::new()
    }
}
