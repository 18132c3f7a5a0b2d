//! Noise Field Operations - Pure Functions
//!
//! Fractal (multi-octave) coherent noise sampled onto a grid. Output depends
//! only on the grid size and the [`NoiseConfig`], so the same request always
//! produces bit-identical samples no matter which thread runs it.

use super::noise_field_data::{NoiseConfig, NormalizeMode, ScalarGrid};
use crate::constants::terrain::{GLOBAL_NORMALIZE_DIVISOR, OCTAVE_OFFSET_RANGE};
use glam::{DVec2, Vec2};
use noise::{NoiseFn, Perlin};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use rayon::prelude::*;

/// Lattice seed for the coherent noise source. Terrain variety comes from the
/// per-octave offsets, not from the lattice.
const PERLIN_LATTICE_SEED: u32 = 0;

/// Generate a `width` x `height` noise grid on the calling thread.
///
/// Map requests run this on pool workers, so it never fans out further.
pub fn generate(width: usize, height: usize, config: &NoiseConfig) -> ScalarGrid {
    let config = config.clamped();
    let mut grid = ScalarGrid::new(width, height);
    if width == 0 || height == 0 {
        return grid;
    }

    let sampler = RowSampler::new(width, height, &config);
    for (y, row) in grid.values.chunks_mut(width).enumerate() {
        sampler.fill_row(y, row);
    }

    normalize(&mut grid, &config, config.octave_count as usize);
    grid
}

/// Same output as [`generate`], with rows spread over the rayon pool.
///
/// For one-off generation on an interactive or tool thread. Pool workers call
/// [`generate`] instead so the worker count stays the only concurrency cap.
pub fn generate_par(width: usize, height: usize, config: &NoiseConfig) -> ScalarGrid {
    let config = config.clamped();
    let mut grid = ScalarGrid::new(width, height);
    if width == 0 || height == 0 {
        return grid;
    }

    let sampler = RowSampler::new(width, height, &config);
    grid.values
        .par_chunks_mut(width)
        .enumerate()
        .for_each(|(y, row)| sampler.fill_row(y, row));

    normalize(&mut grid, &config, config.octave_count as usize);
    grid
}

/// Raw octave sums for one grid, before normalisation
struct RowSampler {
    perlin: Perlin,
    offsets: Vec<DVec2>,
    half_extent: DVec2,
    scale: f64,
    persistence: f64,
    lacunarity: f64,
}

impl RowSampler {
    fn new(width: usize, height: usize, config: &NoiseConfig) -> Self {
        Self {
            perlin: Perlin::new(PERLIN_LATTICE_SEED),
            offsets: octave_offsets(
                config.seed,
                config.octave_count as usize,
                config.sample_origin,
            ),
            half_extent: DVec2::new(width as f64 * 0.5, height as f64 * 0.5),
            scale: config.scale as f64,
            persistence: config.persistence as f64,
            lacunarity: config.lacunarity as f64,
        }
    }

    fn fill_row(&self, y: usize, row: &mut [f32]) {
        for (x, sample) in row.iter_mut().enumerate() {
            let position = DVec2::new(x as f64, y as f64) - self.half_extent;
            *sample = octave_sum(
                &self.perlin,
                position,
                &self.offsets,
                self.scale,
                self.persistence,
                self.lacunarity,
            );
        }
    }
}

/// One seeded offset per octave, each shifted by the sample origin.
/// X is added and Y subtracted so grid rows advance opposite to world Z.
pub fn octave_offsets(seed: i32, octave_count: usize, sample_origin: Vec2) -> Vec<DVec2> {
    let mut rng = ChaCha8Rng::seed_from_u64(seed as i64 as u64);
    (0..octave_count)
        .map(|_| {
            let offset_x = rng.gen_range(-OCTAVE_OFFSET_RANGE..OCTAVE_OFFSET_RANGE) as f64
                + sample_origin.x as f64;
            let offset_y = rng.gen_range(-OCTAVE_OFFSET_RANGE..OCTAVE_OFFSET_RANGE) as f64
                - sample_origin.y as f64;
            DVec2::new(offset_x, offset_y)
        })
        .collect()
}

/// Sum of amplitudes over all octaves, the largest value an octave sum can reach
pub fn max_possible_amplitude(octave_count: usize, persistence: f32) -> f32 {
    let mut amplitude = 1.0f32;
    let mut total = 0.0f32;
    for _ in 0..octave_count {
        total += amplitude;
        amplitude *= persistence;
    }
    total
}

fn octave_sum(
    perlin: &Perlin,
    position: DVec2,
    offsets: &[DVec2],
    scale: f64,
    persistence: f64,
    lacunarity: f64,
) -> f32 {
    let mut amplitude = 1.0f64;
    let mut frequency = 1.0f64;
    let mut noise_height = 0.0f64;

    for offset in offsets {
        let sample = (position + *offset) / scale * frequency;
        // [0,1] -> [-1,1] so octaves can cancel each other out
        let value = unit_noise(perlin, sample) * 2.0 - 1.0;
        noise_height += value * amplitude;

        amplitude *= persistence;
        frequency *= lacunarity;
    }

    noise_height as f32
}

/// Coherent noise remapped into [0,1]
fn unit_noise(perlin: &Perlin, sample: DVec2) -> f64 {
    ((perlin.get([sample.x, sample.y]) + 1.0) * 0.5).clamp(0.0, 1.0)
}

fn normalize(grid: &mut ScalarGrid, config: &NoiseConfig, octave_count: usize) {
    if octave_count == 0 {
        // Nothing was accumulated; a flat zero grid is the only sensible answer
        grid.values.iter_mut().for_each(|v| *v = 0.0);
        return;
    }

    match config.normalize_mode {
        NormalizeMode::Local => {
            let (min, max) = grid
                .values
                .iter()
                .fold((f32::MAX, f32::MIN), |(min, max), &v| (min.min(v), max.max(v)));
            for value in grid.values.iter_mut() {
                *value = inverse_lerp(min, max, *value);
            }
        }
        NormalizeMode::Global => {
            let max_possible = max_possible_amplitude(octave_count, config.persistence);
            let divisor = 2.0 * max_possible / GLOBAL_NORMALIZE_DIVISOR;
            for value in grid.values.iter_mut() {
                *value = ((*value + 1.0) / divisor).max(0.0);
            }
        }
    }
}

/// Position of `value` between `a` and `b`, clamped to [0,1]. Zero when `a == b`.
fn inverse_lerp(a: f32, b: f32, value: f32) -> f32 {
    if a == b {
        0.0
    } else {
        ((value - a) / (b - a)).clamp(0.0, 1.0)
    }
}
