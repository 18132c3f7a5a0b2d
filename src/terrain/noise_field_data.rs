//! Noise Field Data
//!
//! Plain data for the fractal noise generator.
//! All transformations happen in noise_field_operations.rs

use crate::constants::terrain::MIN_NOISE_SCALE;
use glam::Vec2;
use serde::{Deserialize, Serialize};

/// How raw octave sums are mapped into height values
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum NormalizeMode {
    /// Remap using the min/max observed in this grid. Seams between chunks.
    Local,
    /// Remap using the theoretical maximum amplitude. Consistent across chunks.
    #[default]
    Global,
}

/// Fractal noise parameters
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct NoiseConfig {
    pub seed: i32,
    pub scale: f32,
    pub octave_count: i32,
    pub persistence: f32,
    pub lacunarity: f32,
    /// World-space origin of the sample window
    pub sample_origin: Vec2,
    pub normalize_mode: NormalizeMode,
}

impl Default for NoiseConfig {
    fn default() -> Self {
        Self {
            seed: 0,
            scale: 50.0,
            octave_count: 4,
            persistence: 0.5,
            lacunarity: 2.0,
            sample_origin: Vec2::ZERO,
            normalize_mode: NormalizeMode::Global,
        }
    }
}

impl NoiseConfig {
    /// Copy with out-of-range parameters pulled back into their valid domain
    pub fn clamped(&self) -> Self {
        Self {
            scale: if self.scale <= 0.0 {
                MIN_NOISE_SCALE
            } else {
                self.scale
            },
            octave_count: self.octave_count.max(0),
            persistence: self.persistence.clamp(0.0, 1.0),
            lacunarity: self.lacunarity.max(1.0),
            ..self.clone()
        }
    }

    /// Same parameters sampled around a different origin
    pub fn with_origin(&self, sample_origin: Vec2) -> Self {
        Self {
            sample_origin,
            ..self.clone()
        }
    }
}

/// Row-major square-or-rectangular grid of height samples
#[derive(Debug, Clone, PartialEq)]
pub struct ScalarGrid {
    pub width: usize,
    pub height: usize,
    pub values: Vec<f32>,
}

impl ScalarGrid {
    pub fn new(width: usize, height: usize) -> Self {
        Self::filled(width, height, 0.0)
    }

    pub fn filled(width: usize, height: usize, value: f32) -> Self {
        Self {
            width,
            height,
            values: vec![value; width * height],
        }
    }

    pub fn index(&self, x: usize, y: usize) -> usize {
        y * self.width + x
    }

    pub fn get(&self, x: usize, y: usize) -> f32 {
        self.values[self.index(x, y)]
    }

    pub fn set(&mut self, x: usize, y: usize, value: f32) {
        let index = self.index(x, y);
        self.values[index] = value;
    }

    pub fn is_square(&self) -> bool {
        self.width == self.height
    }
}
