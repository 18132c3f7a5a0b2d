// Hearth Landmass - procedural terrain generation and streaming
//
// Data-oriented layout, as in the rest of Hearth:
// - *_data modules hold plain data
// - *_operations modules hold pure transformations
// - Stateful types (worker pool, pipeline, streaming manager) own their threads and queues
//
// Typical use: load a LandmassConfig, call create_streaming_manager, then call
// ChunkStreamingManager::update once per frame with the observer position.

// Constants module
pub mod constants;

// Core modules
pub mod config;
pub mod error;

// Generation
pub mod mesh;
pub mod terrain;

// Scheduling and streaming
pub mod pipeline;
pub mod streaming;
pub mod thread_pool;

pub use config::{LandmassConfig, MeshSettings, NoiseSettings, StreamingSettings};
pub use error::{ErrorContext, LandmassError, LandmassResult};
pub use mesh::{MeshData, VertexRef};
pub use pipeline::{
    GenerationPipeline, GenerationSettings, MapDataReady, MeshDataReady, PipelineStats,
    RequestId, RequestStage,
};
pub use streaming::{
    ChunkCoord, ChunkRenderSink, ChunkStreamingManager, LodInfo, NullRenderSink, StreamingConfig,
};
pub use terrain::{
    Color, ColorGrid, CurveKey, HeightCurve, MapData, MapSettings, NoiseConfig, NormalizeMode,
    RegionTable, ScalarGrid, TerrainRegion,
};
pub use thread_pool::ThreadPoolConfig;

/// Build a streaming manager and its worker pool from configuration.
///
/// The configuration is sanitized, then validated; only structural problems
/// are reported as errors.
pub fn create_streaming_manager(config: &LandmassConfig) -> LandmassResult<ChunkStreamingManager> {
    let config = config.sanitized();
    config.validate()?;

    let pipeline =
        GenerationPipeline::new(config.generation_settings(), config.thread_pool_config())?;
    let manager = ChunkStreamingManager::new(config.streaming_config(), pipeline)?;

    log::info!(
        "[create_streaming_manager] Seed {}, chunk resolution {}",
        config.noise.seed,
        config.streaming.chunk_resolution
    );
    Ok(manager)
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Vec2;

    #[test]
    fn test_create_streaming_manager_from_defaults() {
        let mut config = LandmassConfig::default();
        config.streaming.worker_count = Some(1);

        let manager = create_streaming_manager(&config).unwrap();
        assert_eq!(manager.max_view_distance(), 600.0);
        assert_eq!(manager.chunks_visible_in_view_distance(), 3);
        assert_eq!(manager.pipeline().pool_stats().worker_count, 1);
    }

    #[test]
    fn test_out_of_range_noise_is_clamped_not_rejected() {
        let mut config = LandmassConfig::default();
        config.noise.octaves = -1;
        config.noise.lacunarity = 0.0;
        config.streaming.worker_count = Some(1);

        let manager = create_streaming_manager(&config).unwrap();
        let noise = &manager.pipeline().settings().map.noise;
        assert_eq!(noise.octave_count, 0);
        assert_eq!(noise.lacunarity, 1.0);
    }

    #[test]
    fn test_structural_errors_are_rejected() {
        let mut config = LandmassConfig::default();
        config.detail_levels.clear();
        assert!(matches!(
            create_streaming_manager(&config),
            Err(LandmassError::InvalidConfig { .. })
        ));
    }

    #[test]
    fn test_null_sink_tick() {
        let mut config = LandmassConfig::default();
        config.streaming.chunk_resolution = 25;
        config.detail_levels = vec![LodInfo::new(0, 40.0)];
        config.streaming.worker_count = Some(1);

        let mut manager = create_streaming_manager(&config).unwrap();
        manager.update(Vec2::ZERO, &mut NullRenderSink).unwrap();
        // round(40 / 24) = 2 chunks each way
        assert_eq!(manager.chunk_count(), 25);
    }
}
