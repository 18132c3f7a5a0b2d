//! Chunk Data
//!
//! Per-chunk streaming state owned by the streaming manager.
//! All transformations happen in chunk_operations.rs

use crate::mesh::MeshData;
use crate::pipeline::RequestId;
use crate::terrain::MapData;
use glam::Vec2;
use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;

/// Integer chunk coordinate on the X/Z plane
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize)]
pub struct ChunkCoord {
    pub x: i32,
    pub y: i32,
}

impl ChunkCoord {
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    pub const fn offset(self, dx: i32, dy: i32) -> Self {
        Self::new(self.x + dx, self.y + dy)
    }
}

impl fmt::Display for ChunkCoord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

/// Axis-aligned square footprint of a chunk in chunk space
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ChunkBounds {
    pub center: Vec2,
    pub half_extent: f32,
}

/// Mesh cache entry for one level of detail. A missing entry means the mesh
/// was never requested.
#[derive(Debug, Clone, PartialEq)]
pub enum LodMeshSlot {
    Pending { request: RequestId },
    Ready(MeshData),
}

impl LodMeshSlot {
    pub fn is_ready(&self) -> bool {
        matches!(self, LodMeshSlot::Ready(_))
    }
}

/// Everything the manager knows about one chunk
#[derive(Debug, Clone)]
pub struct ChunkState {
    pub coord: ChunkCoord,
    pub bounds: ChunkBounds,
    pub map_request: Option<RequestId>,
    pub map_data: Option<Arc<MapData>>,
    /// Sparse cache keyed by level of detail. Ready meshes are never replaced.
    pub lod_meshes: FxHashMap<u32, LodMeshSlot>,
    /// Level of detail whose mesh is currently shown
    pub current_lod: Option<u32>,
    pub visible: bool,
}
