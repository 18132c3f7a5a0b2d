//! Height Color Data
//!
//! Region table and color grid types for the height classifier.
//! All transformations happen in height_color_operations.rs

use serde::{Deserialize, Serialize};

/// Linear RGBA color, laid out for direct texture upload
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize, bytemuck::Pod, bytemuck::Zeroable)]
pub struct Color {
    pub r: f32,
    pub g: f32,
    pub b: f32,
    pub a: f32,
}

impl Color {
    pub const TRANSPARENT: Color = Color::rgba(0.0, 0.0, 0.0, 0.0);
    pub const BLACK: Color = Color::rgb(0.0, 0.0, 0.0);
    pub const WHITE: Color = Color::rgb(1.0, 1.0, 1.0);

    pub const fn rgb(r: f32, g: f32, b: f32) -> Self {
        Self { r, g, b, a: 1.0 }
    }

    pub const fn rgba(r: f32, g: f32, b: f32, a: f32) -> Self {
        Self { r, g, b, a }
    }

    /// Component-wise interpolation, `t` clamped to [0,1]
    pub fn lerp(self, other: Color, t: f32) -> Color {
        let t = t.clamp(0.0, 1.0);
        Color {
            r: self.r + (other.r - self.r) * t,
            g: self.g + (other.g - self.g) * t,
            b: self.b + (other.b - self.b) * t,
            a: self.a + (other.a - self.a) * t,
        }
    }
}

/// One band of the region table
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TerrainRegion {
    pub name: String,
    /// Minimum normalised height for this region
    pub height: f32,
    pub color: Color,
}

impl TerrainRegion {
    pub fn new(name: impl Into<String>, height: f32, color: Color) -> Self {
        Self {
            name: name.into(),
            height,
            color,
        }
    }
}

/// Regions ordered by ascending `height` threshold
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RegionTable {
    pub regions: Vec<TerrainRegion>,
}

impl RegionTable {
    pub fn new(regions: Vec<TerrainRegion>) -> Self {
        Self { regions }
    }

    pub fn is_ascending(&self) -> bool {
        self.regions.windows(2).all(|w| w[0].height <= w[1].height)
    }

    pub fn len(&self) -> usize {
        self.regions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.regions.is_empty()
    }

    /// Water, sand, grass, rock and snow bands
    pub fn default_landmass() -> Self {
        Self::new(vec![
            TerrainRegion::new("deep_water", 0.0, Color::rgb(0.20, 0.38, 0.72)),
            TerrainRegion::new("shallow_water", 0.30, Color::rgb(0.22, 0.42, 0.78)),
            TerrainRegion::new("sand", 0.40, Color::rgb(0.83, 0.80, 0.49)),
            TerrainRegion::new("grass", 0.45, Color::rgb(0.34, 0.60, 0.10)),
            TerrainRegion::new("grass_high", 0.55, Color::rgb(0.24, 0.42, 0.07)),
            TerrainRegion::new("rock", 0.60, Color::rgb(0.37, 0.27, 0.24)),
            TerrainRegion::new("rock_high", 0.70, Color::rgb(0.29, 0.24, 0.23)),
            TerrainRegion::new("snow", 0.90, Color::WHITE),
        ])
    }
}

/// Square grid of colors, one per renderable (interior) sample
#[derive(Debug, Clone, PartialEq)]
pub struct ColorGrid {
    pub size: usize,
    pub colors: Vec<Color>,
}

impl ColorGrid {
    pub fn get(&self, x: usize, y: usize) -> Color {
        self.colors[y * self.size + x]
    }

    /// Raw RGBA32F bytes for texture upload
    pub fn as_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.colors)
    }
}
