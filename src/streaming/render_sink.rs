//! Render collaborator
//!
//! The streaming manager never touches GPU state; it reports chunk changes to
//! a [`ChunkRenderSink`] from the interactive thread.

use super::chunk_data::ChunkCoord;
use crate::mesh::MeshData;
use crate::terrain::ColorGrid;
use glam::Vec3;

pub trait ChunkRenderSink {
    /// Color texture for a chunk, sent once when its map data arrives
    fn upload_texture(&mut self, coord: ChunkCoord, colors: &ColorGrid);

    /// Mesh to show for a chunk. `world_origin` already includes world scale.
    fn upload_mesh(
        &mut self,
        coord: ChunkCoord,
        level_of_detail: u32,
        mesh: &MeshData,
        world_origin: Vec3,
    );

    /// Called only when the chunk's visibility actually changes
    fn set_visible(&mut self, coord: ChunkCoord, visible: bool);

    /// Chunk dropped by eviction
    fn release_chunk(&mut self, _coord: ChunkCoord) {}
}

/// Sink that ignores everything
#[derive(Debug, Clone, Copy, Default)]
pub struct NullRenderSink;

impl ChunkRenderSink for NullRenderSink {
    fn upload_texture(&mut self, _coord: ChunkCoord, _colors: &ColorGrid) {}

    fn upload_mesh(
        &mut self,
        _coord: ChunkCoord,
        _level_of_detail: u32,
        _mesh: &MeshData,
        _world_origin: Vec3,
    ) {
    }

    fn set_visible(&mut self, _coord: ChunkCoord, _visible: bool) {}
}
