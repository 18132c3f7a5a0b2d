//! Engine-wide constants
//!
//! Grouped by subsystem. Values that constrain each other are checked at
//! compile time.

use static_assertions::const_assert_eq;

pub mod terrain {
    /// Renderable samples along one chunk edge (interior size).
    pub const MAP_CHUNK_SIZE: u32 = 241;

    /// Samples generated around the interior. Meshes read a normal-only ring
    /// one LOD stride outside the interior, so this covers the coarsest stride.
    pub const BORDER_WIDTH: u32 =
        super::lod::simplification_increment(super::lod::MAX_LEVEL_OF_DETAIL);

    /// Full sample grid edge including the border ring on both sides.
    pub const BORDERED_CHUNK_SIZE: u32 = MAP_CHUNK_SIZE + 2 * BORDER_WIDTH;

    /// World units covered by one chunk edge.
    pub const CHUNK_EDGE_LENGTH: u32 = MAP_CHUNK_SIZE - 1;

    /// Replacement for a non-positive noise scale.
    pub const MIN_NOISE_SCALE: f32 = 0.001;

    /// Octave offsets are drawn from `-OCTAVE_OFFSET_RANGE..OCTAVE_OFFSET_RANGE`.
    pub const OCTAVE_OFFSET_RANGE: i32 = 100_000;

    /// Empirical tuning for Global normalisation. Real noise sums rarely reach
    /// the theoretical maximum amplitude.
    pub const GLOBAL_NORMALIZE_DIVISOR: f32 = 1.75;
}

pub mod lod {
    /// Highest level of detail the mesh builder supports.
    pub const MAX_LEVEL_OF_DETAIL: u32 = 6;

    /// Least common multiple of all strides for LOD 0..=MAX_LEVEL_OF_DETAIL
    /// (1, 2, 4, 6, 8, 10, 12).
    pub const STRIDE_LCM: u32 = 120;

    /// Vertex decimation stride for a level of detail.
    pub const fn simplification_increment(level_of_detail: u32) -> u32 {
        if level_of_detail == 0 {
            1
        } else {
            level_of_detail * 2
        }
    }
}

pub mod falloff {
    /// Steepness of the falloff curve.
    pub const CURVE_STEEPNESS: f32 = 3.0;

    /// Shift of the falloff curve towards the edge.
    pub const CURVE_SHIFT: f32 = 2.2;
}

pub mod streaming {
    /// Observer travel (terrain units) before the visible set is recomputed.
    pub const VIEWER_MOVE_THRESHOLD: f32 = 25.0;

    /// Uniform scale applied between terrain units and world units.
    pub const WORLD_SCALE: f32 = 1.0;
}

pub mod pipeline {
    /// Name prefix for generation worker threads.
    pub const WORKER_THREAD_PREFIX: &str = "landmass-worker";
}

// Every supported LOD stride must divide the chunk edge evenly.
const_assert_eq!(terrain::CHUNK_EDGE_LENGTH % lod::STRIDE_LCM, 0);
const_assert_eq!(lod::STRIDE_LCM % lod::simplification_increment(lod::MAX_LEVEL_OF_DETAIL), 0);
