//! Height Color Operations - Pure Functions
//!
//! Classifies height samples into region colors, optionally after pulling
//! them down with a falloff mask.

use super::height_color_data::{Color, ColorGrid, RegionTable};
use super::noise_field_data::ScalarGrid;

/// Index of the last region whose threshold `height` meets or exceeds.
/// Scanning stops at the first threshold the height does not clear.
pub fn region_index_for(table: &RegionTable, height: f32) -> Option<usize> {
    let mut selected = None;
    for (index, region) in table.regions.iter().enumerate() {
        if height >= region.height {
            selected = Some(index);
        } else {
            break;
        }
    }
    selected
}

/// Height after subtracting a falloff value, clamped to [0,1]
pub fn falloff_adjusted_height(height: f32, falloff: f32) -> f32 {
    (height - falloff).clamp(0.0, 1.0)
}

/// Subtract a same-sized falloff grid from `grid` in place
pub fn apply_falloff(grid: &mut ScalarGrid, falloff: &ScalarGrid) {
    debug_assert_eq!(
        (grid.width, grid.height),
        (falloff.width, falloff.height),
        "falloff grid must match the height grid"
    );
    for (value, &mask) in grid.values.iter_mut().zip(falloff.values.iter()) {
        *value = falloff_adjusted_height(*value, mask);
    }
}

/// Produce one color per interior sample of a grid carrying `border` extra
/// samples on every side.
///
/// When `falloff` is supplied each sample is reduced by the matching falloff
/// value and clamped before lookup. Samples below every threshold are
/// transparent.
pub fn classify(
    grid: &ScalarGrid,
    table: &RegionTable,
    falloff: Option<&ScalarGrid>,
    border: usize,
) -> ColorGrid {
    let size = grid.width.min(grid.height).saturating_sub(2 * border);
    let mut colors = Vec::with_capacity(size * size);

    for y in 0..size {
        for x in 0..size {
            let (gx, gy) = (x + border, y + border);
            let mut height = grid.get(gx, gy);
            if let Some(mask) = falloff {
                height = falloff_adjusted_height(height, mask.get(gx, gy));
            }
            let color = region_index_for(table, height)
                .map(|index| table.regions[index].color)
                .unwrap_or(Color::TRANSPARENT);
            colors.push(color);
        }
    }

    ColorGrid { size, colors }
}

/// Greyscale preview of a height grid, black at 0 and white at 1
pub fn heightmap_to_colors(grid: &ScalarGrid) -> Vec<Color> {
    grid.values
        .iter()
        .map(|&height| Color::BLACK.lerp(Color::WHITE, height))
        .collect()
}
