//! Landmass configuration
//!
//! One serde structure covering noise, meshing, streaming and workers,
//! loadable from TOML. Every field has a default, so a partial file only
//! overrides what it names.

use crate::constants::streaming::{VIEWER_MOVE_THRESHOLD, WORLD_SCALE};
use crate::constants::terrain::MAP_CHUNK_SIZE;
use crate::error::{ErrorContext, LandmassError, LandmassResult};
use crate::pipeline::GenerationSettings;
use crate::streaming::lod::{default_detail_levels, validate_detail_levels, LodInfo};
use crate::streaming::StreamingConfig;
use crate::terrain::{
    HeightCurve, MapSettings, NoiseConfig, NormalizeMode, RegionTable, TerrainRegion,
};
use crate::thread_pool::ThreadPoolConfig;
use glam::Vec2;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Noise field and falloff parameters
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct NoiseSettings {
    pub seed: i32,
    pub scale: f32,
    pub octaves: i32,
    pub persistence: f32,
    pub lacunarity: f32,
    /// Global sample offset added to every chunk's centre
    pub offset: Vec2,
    pub normalize_mode: NormalizeMode,
    pub use_falloff: bool,
}

impl Default for NoiseSettings {
    fn default() -> Self {
        let noise = NoiseConfig::default();
        Self {
            seed: noise.seed,
            scale: noise.scale,
            octaves: noise.octave_count,
            persistence: noise.persistence,
            lacunarity: noise.lacunarity,
            offset: noise.sample_origin,
            normalize_mode: noise.normalize_mode,
            use_falloff: false,
        }
    }
}

impl NoiseSettings {
    pub fn to_noise_config(&self) -> NoiseConfig {
        NoiseConfig {
            seed: self.seed,
            scale: self.scale,
            octave_count: self.octaves,
            persistence: self.persistence,
            lacunarity: self.lacunarity,
            sample_origin: self.offset,
            normalize_mode: self.normalize_mode,
        }
    }
}

/// Height shaping applied when meshing
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MeshSettings {
    pub height_multiplier: f32,
    pub height_curve: HeightCurve,
}

impl Default for MeshSettings {
    fn default() -> Self {
        Self {
            height_multiplier: 30.0,
            height_curve: HeightCurve::linear(),
        }
    }
}

/// Chunk sizing, observer handling and worker count
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StreamingSettings {
    /// Renderable samples per chunk edge
    pub chunk_resolution: usize,
    pub viewer_move_threshold: f32,
    pub world_scale: f32,
    pub eviction_distance: Option<f32>,
    /// Worker threads; `None` uses one per logical CPU
    pub worker_count: Option<usize>,
}

impl Default for StreamingSettings {
    fn default() -> Self {
        Self {
            chunk_resolution: MAP_CHUNK_SIZE as usize,
            viewer_move_threshold: VIEWER_MOVE_THRESHOLD,
            world_scale: WORLD_SCALE,
            eviction_distance: None,
            worker_count: None,
        }
    }
}

/// Complete landmass configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LandmassConfig {
    pub noise: NoiseSettings,
    pub mesh: MeshSettings,
    pub streaming: StreamingSettings,
    pub regions: Vec<TerrainRegion>,
    pub detail_levels: Vec<LodInfo>,
}

impl Default for LandmassConfig {
    fn default() -> Self {
        Self {
            noise: NoiseSettings::default(),
            mesh: MeshSettings::default(),
            streaming: StreamingSettings::default(),
            regions: RegionTable::default_landmass().regions,
            detail_levels: default_detail_levels(),
        }
    }
}

impl LandmassConfig {
    pub fn from_toml_str(source: &str) -> LandmassResult<Self> {
        Ok(toml::from_str(source)?)
    }

    pub fn from_file(path: impl AsRef<Path>) -> LandmassResult<Self> {
        let path = path.as_ref();
        let source = std::fs::read_to_string(path).with_path(path)?;
        let config = toml::from_str(&source).map_err(|e| LandmassError::ConfigParse {
            context: path.display().to_string(),
            error: e.to_string(),
        })?;

        log::info!("[LandmassConfig::from_file] Loaded {}", path.display());
        Ok(config)
    }

    /// Copy with the noise parameters clamped into range by
    /// [`NoiseConfig::clamped`]
    pub fn sanitized(&self) -> Self {
        let mut config = self.clone();
        let clamped = self.noise.to_noise_config().clamped();
        if clamped != self.noise.to_noise_config() {
            log::debug!("[LandmassConfig::sanitized] Noise parameters clamped into range");
        }

        let noise = &mut config.noise;
        noise.scale = clamped.scale;
        noise.octaves = clamped.octave_count;
        noise.persistence = clamped.persistence;
        noise.lacunarity = clamped.lacunarity;

        config
    }

    /// Reject configurations the streaming manager cannot run with
    pub fn validate(&self) -> LandmassResult<()> {
        if self.streaming.chunk_resolution < 2 {
            return Err(LandmassError::invalid_config(
                "streaming.chunk_resolution",
                self.streaming.chunk_resolution,
                "must be at least 2",
            ));
        }

        validate_detail_levels(&self.detail_levels, self.streaming.chunk_resolution)?;

        let regions = RegionTable::new(self.regions.clone());
        if !regions.is_ascending() {
            return Err(LandmassError::invalid_config(
                "regions",
                format!("{} entries", regions.len()),
                "region heights must be ascending",
            ));
        }

        if self.streaming.worker_count == Some(0) {
            return Err(LandmassError::invalid_config(
                "streaming.worker_count",
                0,
                "must be at least 1",
            ));
        }

        self.streaming_config()
            .validate(self.streaming.chunk_resolution)?;

        log::info!("[LandmassConfig] Configuration validated successfully");
        Ok(())
    }

    /// Inputs for the generation pipeline
    pub fn generation_settings(&self) -> GenerationSettings {
        GenerationSettings {
            map: MapSettings::new(
                self.noise.to_noise_config(),
                RegionTable::new(self.regions.clone()),
                self.noise.use_falloff,
                self.streaming.chunk_resolution,
            ),
            height_curve: self.mesh.height_curve.clone(),
            height_multiplier: self.mesh.height_multiplier,
        }
    }

    pub fn streaming_config(&self) -> StreamingConfig {
        StreamingConfig {
            detail_levels: self.detail_levels.clone(),
            viewer_move_threshold: self.streaming.viewer_move_threshold,
            world_scale: self.streaming.world_scale,
            eviction_distance: self.streaming.eviction_distance,
        }
    }

    pub fn thread_pool_config(&self) -> ThreadPoolConfig {
        let mut config = ThreadPoolConfig::default();
        if let Some(worker_count) = self.streaming.worker_count {
            config.worker_count = worker_count;
        }
        config
    }
}
