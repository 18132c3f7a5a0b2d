//! Terrain mesh building
//!
//! Turns a bordered height grid into a renderable grid mesh at a given level
//! of detail. The border ring contributes to edge normals only, so adjacent
//! chunks light identically along their shared edge.

pub mod mesh_data;
pub mod mesh_operations;

pub use mesh_data::{MeshBuffers, MeshData, VertexRef};
pub use mesh_operations::{build, vertices_per_line};
