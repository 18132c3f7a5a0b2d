//! Mesh Data
//!
//! Output geometry plus the scratch buffers used while building it.
//! All transformations happen in mesh_operations.rs

use glam::{Vec2, Vec3};

/// Reference to a vertex in one of the two index spaces used while building
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum VertexRef {
    /// Renderable vertex, index into `MeshBuffers::vertices`
    Interior(u32),
    /// Border-ring vertex, index into `MeshBuffers::border_vertices`
    Border(u32),
}

/// Finished terrain mesh, ready for upload
#[derive(Debug, Clone, PartialEq, Default)]
pub struct MeshData {
    pub vertices: Vec<Vec3>,
    pub uvs: Vec<Vec2>,
    /// Flat triangle list, three indices per triangle
    pub triangles: Vec<u32>,
    pub normals: Vec<Vec3>,
    pub vertices_per_line: usize,
}

impl MeshData {
    pub fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    pub fn triangle_count(&self) -> usize {
        self.triangles.len() / 3
    }

    pub fn vertices_as_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.vertices)
    }

    pub fn normals_as_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.normals)
    }

    pub fn uvs_as_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.uvs)
    }

    pub fn triangles_as_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.triangles)
    }
}

/// Interior and border geometry while a mesh is being assembled.
/// Border data only exists until normals are computed.
#[derive(Debug, Clone, Default)]
pub struct MeshBuffers {
    pub vertices: Vec<Vec3>,
    pub uvs: Vec<Vec2>,
    pub triangles: Vec<u32>,
    pub border_vertices: Vec<Vec3>,
    pub border_triangles: Vec<[VertexRef; 3]>,
    pub vertices_per_line: usize,
}

impl MeshBuffers {
    pub fn with_capacity(vertices_per_line: usize) -> Self {
        let interior = vertices_per_line * vertices_per_line;
        let quads = vertices_per_line.saturating_sub(1).pow(2);
        Self {
            vertices: vec![Vec3::ZERO; interior],
            uvs: vec![Vec2::ZERO; interior],
            triangles: Vec::with_capacity(quads * 6),
            border_vertices: vec![Vec3::ZERO; vertices_per_line * 4 + 4],
            border_triangles: Vec::with_capacity(vertices_per_line * 8 + 8),
            vertices_per_line,
        }
    }

    pub fn position(&self, vertex: VertexRef) -> Vec3 {
        match vertex {
            VertexRef::Interior(index) => self.vertices[index as usize],
            VertexRef::Border(index) => self.border_vertices[index as usize],
        }
    }
}
