//! Chunk Operations - Pure Functions
//!
//! Coordinate quantisation, bounds distance and covering-set enumeration.

use super::chunk_data::{ChunkBounds, ChunkCoord, ChunkState};
use glam::{Vec2, Vec3};
use rustc_hash::FxHashMap;

/// Fresh state for a chunk that has not received any data yet
pub fn create_chunk_state(coord: ChunkCoord, chunk_edge_length: f32) -> ChunkState {
    ChunkState {
        coord,
        bounds: chunk_bounds(coord, chunk_edge_length),
        map_request: None,
        map_data: None,
        lod_meshes: FxHashMap::default(),
        current_lod: None,
        visible: false,
    }
}

/// Chunk centre in chunk space (before world scale)
pub fn chunk_center(coord: ChunkCoord, chunk_edge_length: f32) -> Vec2 {
    Vec2::new(coord.x as f32, coord.y as f32) * chunk_edge_length
}

pub fn chunk_bounds(coord: ChunkCoord, chunk_edge_length: f32) -> ChunkBounds {
    ChunkBounds {
        center: chunk_center(coord, chunk_edge_length),
        half_extent: chunk_edge_length * 0.5,
    }
}

/// Chunk containing `position`, rounding to the nearest chunk centre
pub fn chunk_coord_at(position: Vec2, chunk_edge_length: f32) -> ChunkCoord {
    let scaled = position / chunk_edge_length;
    ChunkCoord::new(scaled.x.round() as i32, scaled.y.round() as i32)
}

/// Euclidean distance from `point` to the closest point of `bounds`; zero inside
pub fn distance_to_bounds(bounds: &ChunkBounds, point: Vec2) -> f32 {
    let delta = (point - bounds.center).abs() - Vec2::splat(bounds.half_extent);
    delta.max(Vec2::ZERO).length()
}

/// Square block of coordinates `radius` chunks around `center`, row by row
pub fn covering_set(center: ChunkCoord, radius: i32) -> impl Iterator<Item = ChunkCoord> {
    let radius = radius.max(0);
    (-radius..=radius).flat_map(move |dy| (-radius..=radius).map(move |dx| center.offset(dx, dy)))
}

/// Whether the observer moved far enough since the last visible-set refresh
pub fn should_refresh_visible_set(last: Option<Vec2>, current: Vec2, move_threshold: f32) -> bool {
    match last {
        None => true,
        Some(last) => last.distance_squared(current) > move_threshold * move_threshold,
    }
}

/// World-space origin handed to the renderer for a chunk's mesh
pub fn chunk_world_origin(coord: ChunkCoord, chunk_edge_length: f32, world_scale: f32) -> Vec3 {
    let center = chunk_center(coord, chunk_edge_length) * world_scale;
    Vec3::new(center.x, 0.0, center.y)
}
