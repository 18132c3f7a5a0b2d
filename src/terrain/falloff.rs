//! Radial falloff mask
//!
//! Square-shaped mask that is ~0 in the middle of the grid and rises to ~1
//! at the edges. Subtracting it from a height grid turns a chunk into an
//! island.

use super::noise_field_data::ScalarGrid;
use crate::constants::falloff::{CURVE_SHIFT, CURVE_STEEPNESS};

/// Generate a `size` x `size` falloff grid with the default curve shape
pub fn generate_falloff_map(size: usize) -> ScalarGrid {
    generate_falloff_map_with(size, CURVE_STEEPNESS, CURVE_SHIFT)
}

/// Generate a falloff grid with explicit curve constants
pub fn generate_falloff_map_with(size: usize, steepness: f32, shift: f32) -> ScalarGrid {
    let mut grid = ScalarGrid::new(size, size);
    if size == 0 {
        return grid;
    }

    for y in 0..size {
        for x in 0..size {
            let nx = x as f32 / size as f32 * 2.0 - 1.0;
            let ny = y as f32 / size as f32 * 2.0 - 1.0;
            let value = nx.abs().max(ny.abs());
            grid.set(x, y, evaluate_falloff(value, steepness, shift));
        }
    }

    grid
}

/// `x^a / (x^a + (b - b*x)^a)`
pub fn evaluate_falloff(value: f32, steepness: f32, shift: f32) -> f32 {
    let rising = value.powf(steepness);
    let falling = (shift - shift * value).powf(steepness);
    rising / (rising + falling)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_center_is_low_and_edge_is_high() {
        let grid = generate_falloff_map(101);
        let center = grid.get(50, 50);
        let edge = grid.get(0, 50);
        let corner = grid.get(0, 0);

        assert!(center < 0.01, "center was {center}");
        assert!(edge > 0.99, "edge was {edge}");
        assert!(corner > 0.99);
    }

    #[test]
    fn test_rises_monotonically_towards_edge() {
        let grid = generate_falloff_map(64);
        let row: Vec<f32> = (0..=32).map(|x| grid.get(32 - x, 32)).collect();
        assert!(row.windows(2).all(|w| w[0] <= w[1]));
    }

    #[test]
    fn test_is_symmetric_across_axes() {
        let grid = generate_falloff_map(33);
        // swapping x and y picks the same max(|nx|, |ny|)
        assert_eq!(grid.get(5, 16), grid.get(16, 5));
    }

    #[test]
    fn test_curve_endpoints() {
        assert_eq!(evaluate_falloff(0.0, CURVE_STEEPNESS, CURVE_SHIFT), 0.0);
        assert_eq!(evaluate_falloff(1.0, CURVE_STEEPNESS, CURVE_SHIFT), 1.0);
    }

    #[test]
    fn test_empty_grid() {
        assert!(generate_falloff_map(0).values.is_empty());
    }
}
