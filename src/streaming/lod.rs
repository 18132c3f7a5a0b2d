//! Level-of-detail tiers
//!
//! Tiers are ordered by ascending visible distance; the last threshold is the
//! maximum view distance.

use crate::constants::lod::{simplification_increment, MAX_LEVEL_OF_DETAIL};
use crate::error::{LandmassError, LandmassResult};
use serde::{Deserialize, Serialize};

/// One LOD tier: mesh detail used up to `visible_distance_threshold`
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LodInfo {
    pub level_of_detail: u32,
    pub visible_distance_threshold: f32,
}

impl LodInfo {
    pub const fn new(level_of_detail: u32, visible_distance_threshold: f32) -> Self {
        Self {
            level_of_detail,
            visible_distance_threshold,
        }
    }
}

/// Tiers {0: 300, 1: 450, 2: 600}
pub fn default_detail_levels() -> Vec<LodInfo> {
    vec![
        LodInfo::new(0, 300.0),
        LodInfo::new(1, 450.0),
        LodInfo::new(2, 600.0),
    ]
}

pub fn max_view_distance(levels: &[LodInfo]) -> f32 {
    levels
        .last()
        .map(|level| level.visible_distance_threshold)
        .unwrap_or(0.0)
}

/// First tier whose threshold covers `distance`, or `None` past the last one
pub fn select_lod_index(levels: &[LodInfo], distance: f32) -> Option<usize> {
    levels
        .iter()
        .position(|level| distance <= level.visible_distance_threshold)
}

/// Chunks to scan in each direction around the observer's chunk
pub fn chunks_visible_in_view_distance(max_view_distance: f32, chunk_edge_length: f32) -> i32 {
    if chunk_edge_length <= 0.0 {
        return 0;
    }
    (max_view_distance / chunk_edge_length).round() as i32
}

/// Reject tier lists the streaming manager cannot serve
pub fn validate_detail_levels(levels: &[LodInfo], chunk_resolution: usize) -> LandmassResult<()> {
    if levels.is_empty() {
        return Err(LandmassError::invalid_config(
            "detail_levels",
            "[]",
            "at least one level of detail is required",
        ));
    }

    let span = chunk_resolution.saturating_sub(1);
    let mut previous = 0.0f32;
    for (index, level) in levels.iter().enumerate() {
        let field = format!("detail_levels[{index}]");

        if level.level_of_detail > MAX_LEVEL_OF_DETAIL {
            return Err(LandmassError::invalid_config(
                format!("{field}.level_of_detail"),
                level.level_of_detail,
                format!("must be at most {MAX_LEVEL_OF_DETAIL}"),
            ));
        }

        let stride = simplification_increment(level.level_of_detail) as usize;
        if span % stride != 0 {
            return Err(LandmassError::invalid_config(
                format!("{field}.level_of_detail"),
                level.level_of_detail,
                format!("stride {stride} does not divide chunk resolution - 1 ({span})"),
            ));
        }

        let threshold = level.visible_distance_threshold;
        if threshold.is_nan() || threshold <= previous {
            return Err(LandmassError::invalid_config(
                format!("{field}.visible_distance_threshold"),
                threshold,
                "thresholds must be positive and strictly ascending",
            ));
        }
        previous = threshold;
    }

    Ok(())
}
