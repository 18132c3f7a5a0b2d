//! Per-chunk map data
//!
//! Heights plus colors for one chunk, generated once and then shared
//! read-only between the chunk and any mesh requests built from it.

use super::falloff::generate_falloff_map;
use super::height_color_data::{ColorGrid, RegionTable};
use super::height_color_operations::{apply_falloff, classify};
use super::noise_field_data::{NoiseConfig, ScalarGrid};
use super::noise_field_operations::generate;
use crate::constants::terrain::BORDER_WIDTH;
use glam::Vec2;

/// Everything needed to turn a chunk centre into [`MapData`]
#[derive(Debug, Clone)]
pub struct MapSettings {
    /// Noise parameters; `sample_origin` acts as a global offset
    pub noise: NoiseConfig,
    pub regions: RegionTable,
    /// Precomputed falloff mask of `bordered_size()`, when enabled
    pub falloff: Option<ScalarGrid>,
    /// Renderable samples per chunk edge
    pub chunk_resolution: usize,
}

impl MapSettings {
    pub fn new(
        noise: NoiseConfig,
        regions: RegionTable,
        use_falloff: bool,
        chunk_resolution: usize,
    ) -> Self {
        let falloff = use_falloff.then(|| generate_falloff_map(bordered_size(chunk_resolution)));
        Self {
            noise: noise.clamped(),
            regions,
            falloff,
            chunk_resolution,
        }
    }

    /// Sample grid edge including the border on both sides
    pub fn bordered_size(&self) -> usize {
        bordered_size(self.chunk_resolution)
    }
}

/// Generated grid edge for a chunk resolution
pub fn bordered_size(chunk_resolution: usize) -> usize {
    chunk_resolution + 2 * BORDER_WIDTH as usize
}

/// Heights (bordered) and colors (interior) for one chunk
#[derive(Debug, Clone, PartialEq)]
pub struct MapData {
    heights: ScalarGrid,
    colors: ColorGrid,
}

impl MapData {
    pub fn new(heights: ScalarGrid, colors: ColorGrid) -> Self {
        Self { heights, colors }
    }

    pub fn heights(&self) -> &ScalarGrid {
        &self.heights
    }

    pub fn colors(&self) -> &ColorGrid {
        &self.colors
    }
}

/// Generate heights and colors for the chunk centred at `center`
pub fn generate_map_data(settings: &MapSettings, center: Vec2) -> MapData {
    let size = settings.bordered_size();
    let noise = settings
        .noise
        .with_origin(center + settings.noise.sample_origin);

    let mut heights = generate(size, size, &noise);
    if let Some(falloff) = &settings.falloff {
        apply_falloff(&mut heights, falloff);
    }
    let colors = classify(&heights, &settings.regions, None, BORDER_WIDTH as usize);

    MapData::new(heights, colors)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::terrain::noise_field_data::NormalizeMode;

    fn settings(use_falloff: bool) -> MapSettings {
        MapSettings::new(
            NoiseConfig {
                seed: 9,
                octave_count: 3,
                normalize_mode: NormalizeMode::Global,
                ..Default::default()
            },
            RegionTable::default_landmass(),
            use_falloff,
            25,
        )
    }

    #[test]
    fn test_map_data_shapes() {
        let data = generate_map_data(&settings(false), Vec2::ZERO);
        assert_eq!(data.heights().width, 25 + 2 * BORDER_WIDTH as usize);
        assert_eq!(data.heights().height, 25 + 2 * BORDER_WIDTH as usize);
        assert_eq!(data.colors().size, 25);
        assert_eq!(data.colors().colors.len(), 25 * 25);
    }

    #[test]
    fn test_map_data_is_deterministic() {
        let settings = settings(true);
        let center = Vec2::new(24.0, -48.0);
        assert_eq!(
            generate_map_data(&settings, center),
            generate_map_data(&settings, center)
        );
    }

    #[test]
    fn test_neighbouring_chunks_share_edge_samples() {
        let settings = settings(false);
        let edge = (settings.chunk_resolution - 1) as f32;
        let here = generate_map_data(&settings, Vec2::ZERO);
        let east = generate_map_data(&settings, Vec2::new(edge, 0.0));

        // last interior column here is the first interior column east
        let border = BORDER_WIDTH as usize;
        let last = border + settings.chunk_resolution - 1;
        for y in 0..settings.bordered_size() {
            assert_eq!(here.heights().get(last, y), east.heights().get(border, y));
        }
        // the east border ring repeats interior samples from here
        assert_eq!(here.heights().get(last - 1, 5), east.heights().get(border - 1, 5));
    }

    #[test]
    fn test_falloff_mask_is_sized_to_bordered_grid() {
        let masked = settings(true);
        let falloff = masked.falloff.as_ref().unwrap();
        assert_eq!(falloff.width, masked.bordered_size());
        assert!(settings(false).falloff.is_none());
    }
}
