//! Terrain sample generation
//!
//! Everything in this module is a pure function of its inputs, so it can run
//! on any worker thread:
//!
//! - **Noise field**: seeded fractal noise into a [`ScalarGrid`]
//! - **Falloff**: radial mask biasing terrain down towards the map edge
//! - **Height curve**: shaping curve applied to heights before meshing
//! - **Height colors**: region table lookup producing a [`ColorGrid`]
//! - **Map data**: the per-chunk bundle of heights and colors

pub mod falloff;
pub mod height_color_data;
pub mod height_color_operations;
pub mod height_curve;
pub mod map_data;
pub mod noise_field_data;
pub mod noise_field_operations;

pub use falloff::{evaluate_falloff, generate_falloff_map};
pub use height_color_data::{Color, ColorGrid, RegionTable, TerrainRegion};
pub use height_color_operations::{
    apply_falloff, classify, falloff_adjusted_height, heightmap_to_colors, region_index_for,
};
pub use height_curve::{CurveKey, HeightCurve};
pub use map_data::{generate_map_data, MapData, MapSettings};
pub use noise_field_data::{NoiseConfig, NormalizeMode, ScalarGrid};
pub use noise_field_operations::{generate, generate_par};
