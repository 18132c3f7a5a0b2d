//! Chunk streaming
//!
//! Decides which chunks exist, which are visible and at what level of
//! detail, as the observer moves:
//!
//! - **LOD**: distance tiers and view distance
//! - **Chunk data/operations**: per-chunk state and spatial helpers
//! - **Render sink**: the renderer-facing callbacks
//! - **Streaming manager**: the per-tick driver

pub mod chunk_data;
pub mod chunk_operations;
pub mod lod;
pub mod render_sink;
pub mod streaming_manager;

pub use chunk_data::{ChunkBounds, ChunkCoord, ChunkState, LodMeshSlot};
pub use chunk_operations::{chunk_coord_at, covering_set, distance_to_bounds};
pub use lod::{default_detail_levels, max_view_distance, select_lod_index, LodInfo};
pub use render_sink::{ChunkRenderSink, NullRenderSink};
pub use streaming_manager::{ChunkStreamingManager, StreamingConfig};
