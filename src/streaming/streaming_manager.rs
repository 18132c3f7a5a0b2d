//! Chunk streaming manager
//!
//! Keeps the chunks around the observer generated, meshed at the right level
//! of detail and visible, driven by one `update` call per interactive tick.
//! Chunk state is only touched on the calling thread; workers communicate
//! through the pipeline's completion queues.

use super::chunk_data::{ChunkCoord, ChunkState, LodMeshSlot};
use super::chunk_operations::{
    chunk_center, chunk_coord_at, chunk_world_origin, covering_set, create_chunk_state,
    distance_to_bounds, should_refresh_visible_set,
};
use super::lod::{
    chunks_visible_in_view_distance, default_detail_levels, max_view_distance, select_lod_index,
    validate_detail_levels, LodInfo,
};
use super::render_sink::ChunkRenderSink;
use crate::constants::streaming::{VIEWER_MOVE_THRESHOLD, WORLD_SCALE};
use crate::error::{LandmassError, LandmassResult};
use crate::pipeline::GenerationPipeline;
use glam::Vec2;
use rustc_hash::{FxHashMap, FxHashSet};

/// Streaming behaviour independent of terrain generation
#[derive(Debug, Clone, PartialEq)]
pub struct StreamingConfig {
    /// Ascending LOD tiers; the last threshold is the view distance
    pub detail_levels: Vec<LodInfo>,
    /// Observer travel (chunk space) before the visible set is recomputed
    pub viewer_move_threshold: f32,
    /// World units per chunk-space unit
    pub world_scale: f32,
    /// Hidden chunks farther than this are dropped. `None` keeps every chunk.
    pub eviction_distance: Option<f32>,
}

impl Default for StreamingConfig {
    fn default() -> Self {
        Self {
            detail_levels: default_detail_levels(),
            viewer_move_threshold: VIEWER_MOVE_THRESHOLD,
            world_scale: WORLD_SCALE,
            eviction_distance: None,
        }
    }
}

impl StreamingConfig {
    pub fn validate(&self, chunk_resolution: usize) -> LandmassResult<()> {
        validate_detail_levels(&self.detail_levels, chunk_resolution)?;

        if self.world_scale.is_nan() || self.world_scale <= 0.0 {
            return Err(LandmassError::invalid_config(
                "world_scale",
                self.world_scale,
                "must be positive",
            ));
        }

        if self.viewer_move_threshold.is_nan() || self.viewer_move_threshold < 0.0 {
            return Err(LandmassError::invalid_config(
                "viewer_move_threshold",
                self.viewer_move_threshold,
                "must not be negative",
            ));
        }

        if let Some(eviction) = self.eviction_distance {
            let view = max_view_distance(&self.detail_levels);
            if eviction.is_nan() || eviction <= view {
                return Err(LandmassError::invalid_config(
                    "eviction_distance",
                    eviction,
                    format!("must exceed the view distance {view}"),
                ));
            }
        }

        Ok(())
    }
}

/// Owns every chunk's state and drives the generation pipeline
#[derive(Debug)]
pub struct ChunkStreamingManager {
    config: StreamingConfig,
    pipeline: GenerationPipeline,
    chunks: FxHashMap<ChunkCoord, ChunkState>,
    visible_last_update: FxHashSet<ChunkCoord>,
    observer_position: Vec2,
    last_refresh_position: Option<Vec2>,
    chunk_edge_length: f32,
    max_view_distance: f32,
    chunks_visible_in_view_distance: i32,
}

impl ChunkStreamingManager {
    pub fn new(config: StreamingConfig, pipeline: GenerationPipeline) -> LandmassResult<Self> {
        let chunk_resolution = pipeline.settings().map.chunk_resolution;
        config.validate(chunk_resolution)?;

        let chunk_edge_length = chunk_resolution.saturating_sub(1).max(1) as f32;
        let max_view_distance = max_view_distance(&config.detail_levels);
        let chunks_visible = chunks_visible_in_view_distance(max_view_distance, chunk_edge_length);

        log::info!(
            "[ChunkStreamingManager::new] View distance {} ({} chunks each way), {} LOD tiers",
            max_view_distance,
            chunks_visible,
            config.detail_levels.len()
        );

        Ok(Self {
            config,
            pipeline,
            chunks: FxHashMap::default(),
            visible_last_update: FxHashSet::default(),
            observer_position: Vec2::ZERO,
            last_refresh_position: None,
            chunk_edge_length,
            max_view_distance,
            chunks_visible_in_view_distance: chunks_visible,
        })
    }

    /// One interactive tick. `observer` is the world-space X/Z position.
    ///
    /// Completed results are always delivered; the visible set is recomputed
    /// on the first tick and whenever the observer moved past the threshold.
    pub fn update<S>(&mut self, observer: Vec2, sink: &mut S) -> LandmassResult<()>
    where
        S: ChunkRenderSink + ?Sized,
    {
        self.observer_position = observer / self.config.world_scale;

        self.deliver_map_results(sink)?;
        self.deliver_mesh_results(sink)?;

        if should_refresh_visible_set(
            self.last_refresh_position,
            self.observer_position,
            self.config.viewer_move_threshold,
        ) {
            self.last_refresh_position = Some(self.observer_position);
            self.update_visible_chunks(sink)?;
        }

        Ok(())
    }

    pub fn config(&self) -> &StreamingConfig {
        &self.config
    }

    pub fn pipeline(&self) -> &GenerationPipeline {
        &self.pipeline
    }

    pub fn chunk(&self, coord: ChunkCoord) -> Option<&ChunkState> {
        self.chunks.get(&coord)
    }

    pub fn chunk_count(&self) -> usize {
        self.chunks.len()
    }

    /// Chunks shown after the latest refresh or delivery
    pub fn visible_chunks(&self) -> impl Iterator<Item = ChunkCoord> + '_ {
        self.chunks
            .values()
            .filter(|chunk| chunk.visible)
            .map(|chunk| chunk.coord)
    }

    /// Observer position in chunk space (world position / world scale)
    pub fn observer_position(&self) -> Vec2 {
        self.observer_position
    }

    pub fn max_view_distance(&self) -> f32 {
        self.max_view_distance
    }

    pub fn chunks_visible_in_view_distance(&self) -> i32 {
        self.chunks_visible_in_view_distance
    }

    // ========================================================================
    // Visible set
    // ========================================================================

    fn update_visible_chunks<S>(&mut self, sink: &mut S) -> LandmassResult<()>
    where
        S: ChunkRenderSink + ?Sized,
    {
        let previous = std::mem::take(&mut self.visible_last_update);
        let current = chunk_coord_at(self.observer_position, self.chunk_edge_length);

        for coord in covering_set(current, self.chunks_visible_in_view_distance) {
            if self.chunks.contains_key(&coord) {
                self.refresh_chunk(coord, sink)?;
            } else {
                self.create_chunk(coord)?;
            }
        }

        for coord in previous {
            if !self.visible_last_update.contains(&coord) {
                self.hide_chunk(coord, sink);
            }
        }

        self.evict_distant_chunks(sink);
        Ok(())
    }

    fn create_chunk(&mut self, coord: ChunkCoord) -> LandmassResult<()> {
        let mut chunk = create_chunk_state(coord, self.chunk_edge_length);
        let center = chunk_center(coord, self.chunk_edge_length);
        chunk.map_request = Some(self.pipeline.request_map_data(coord, center)?);

        log::debug!("[ChunkStreamingManager::create_chunk] Chunk {} created", coord);
        self.chunks.insert(coord, chunk);
        Ok(())
    }

    /// Re-evaluate distance, level of detail and visibility for one chunk
    fn refresh_chunk<S>(&mut self, coord: ChunkCoord, sink: &mut S) -> LandmassResult<()>
    where
        S: ChunkRenderSink + ?Sized,
    {
        let Some(chunk) = self.chunks.get_mut(&coord) else {
            return Ok(());
        };
        // Nothing to show until the heights exist
        let Some(map_data) = chunk.map_data.clone() else {
            return Ok(());
        };

        let distance = distance_to_bounds(&chunk.bounds, self.observer_position);
        let visible = distance <= self.max_view_distance;

        if visible {
            if let Some(index) = select_lod_index(&self.config.detail_levels, distance) {
                let lod = self.config.detail_levels[index].level_of_detail;

                if chunk.current_lod != Some(lod) {
                    match chunk.lod_meshes.get(&lod).map(LodMeshSlot::is_ready) {
                        Some(true) => {
                            if let Some(LodMeshSlot::Ready(mesh)) = chunk.lod_meshes.get(&lod) {
                                let origin = chunk_world_origin(
                                    coord,
                                    self.chunk_edge_length,
                                    self.config.world_scale,
                                );
                                sink.upload_mesh(coord, lod, mesh, origin);
                                chunk.current_lod = Some(lod);
                            }
                        }
                        Some(false) => {}
                        None => {
                            let request = self.pipeline.request_mesh_data(coord, map_data, lod)?;
                            chunk.lod_meshes.insert(lod, LodMeshSlot::Pending { request });
                        }
                    }
                }
            }
            self.visible_last_update.insert(coord);
        }

        if chunk.visible != visible {
            chunk.visible = visible;
            sink.set_visible(coord, visible);
        }

        Ok(())
    }

    fn hide_chunk<S>(&mut self, coord: ChunkCoord, sink: &mut S)
    where
        S: ChunkRenderSink + ?Sized,
    {
        if let Some(chunk) = self.chunks.get_mut(&coord) {
            if chunk.visible {
                chunk.visible = false;
                sink.set_visible(coord, false);
            }
        }
    }

    fn evict_distant_chunks<S>(&mut self, sink: &mut S)
    where
        S: ChunkRenderSink + ?Sized,
    {
        let Some(limit) = self.config.eviction_distance else {
            return;
        };

        let observer = self.observer_position;
        let evicted: Vec<ChunkCoord> = self
            .chunks
            .values()
            .filter(|chunk| !chunk.visible && distance_to_bounds(&chunk.bounds, observer) > limit)
            .map(|chunk| chunk.coord)
            .collect();

        for coord in evicted {
            self.chunks.remove(&coord);
            sink.release_chunk(coord);
        }
    }

    // ========================================================================
    // Delivery
    // ========================================================================

    /// Every drained result is stored even when a follow-up request fails;
    /// the first failure is returned once the batch is done.
    fn deliver_map_results<S>(&mut self, sink: &mut S) -> LandmassResult<()>
    where
        S: ChunkRenderSink + ?Sized,
    {
        let mut first_error = None;
        for ready in self.pipeline.drain_map_results() {
            let Some(chunk) = self.chunks.get_mut(&ready.coord) else {
                log::warn!(
                    "[ChunkStreamingManager::deliver_map_results] Chunk {} is gone, dropping request {}",
                    ready.coord,
                    ready.request
                );
                continue;
            };

            if chunk.map_data.is_some() {
                log::warn!(
                    "[ChunkStreamingManager::deliver_map_results] Chunk {} already has map data, dropping request {}",
                    ready.coord,
                    ready.request
                );
                continue;
            }

            sink.upload_texture(ready.coord, ready.map_data.colors());
            chunk.map_data = Some(ready.map_data);
            chunk.map_request = None;

            if let Err(e) = self.refresh_chunk(ready.coord, sink) {
                log::error!(
                    "[ChunkStreamingManager::deliver_map_results] Refresh of chunk {} failed: {}",
                    ready.coord,
                    e
                );
                first_error.get_or_insert(e);
            }
        }
        first_error.map_or(Ok(()), Err)
    }

    fn deliver_mesh_results<S>(&mut self, sink: &mut S) -> LandmassResult<()>
    where
        S: ChunkRenderSink + ?Sized,
    {
        let mut first_error = None;
        for ready in self.pipeline.drain_mesh_results() {
            let lod = ready.level_of_detail;
            let Some(chunk) = self.chunks.get_mut(&ready.coord) else {
                log::warn!(
                    "[ChunkStreamingManager::deliver_mesh_results] Chunk {} is gone, dropping LOD {} mesh",
                    ready.coord,
                    lod
                );
                continue;
            };

            if matches!(chunk.lod_meshes.get(&lod), Some(LodMeshSlot::Ready(_))) {
                log::warn!(
                    "[ChunkStreamingManager::deliver_mesh_results] Chunk {} LOD {} already cached, dropping request {}",
                    ready.coord,
                    lod,
                    ready.request
                );
                continue;
            }

            chunk.lod_meshes.insert(lod, LodMeshSlot::Ready(ready.mesh_data));
            if let Err(e) = self.refresh_chunk(ready.coord, sink) {
                log::error!(
                    "[ChunkStreamingManager::deliver_mesh_results] Refresh of chunk {} failed: {}",
                    ready.coord,
                    e
                );
                first_error.get_or_insert(e);
            }
        }
        first_error.map_or(Ok(()), Err)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mesh::MeshData;
    use crate::pipeline::GenerationSettings;
    use crate::terrain::{ColorGrid, HeightCurve, MapSettings, NoiseConfig, RegionTable};
    use crate::thread_pool::ThreadPoolConfig;
    use glam::Vec3;
    use std::time::{Duration, Instant};

    const RESOLUTION: usize = 25;
    const EDGE: f32 = 24.0;

    #[derive(Default)]
    struct RecordingSink {
        textures: Vec<ChunkCoord>,
        meshes: Vec<(ChunkCoord, u32, Vec3)>,
        visibility: Vec<(ChunkCoord, bool)>,
        released: Vec<ChunkCoord>,
    }

    impl RecordingSink {
        fn visibility_of(&self, coord: ChunkCoord) -> Vec<bool> {
            self.visibility
                .iter()
                .filter(|(c, _)| *c == coord)
                .map(|(_, v)| *v)
                .collect()
        }
    }

    impl ChunkRenderSink for RecordingSink {
        fn upload_texture(&mut self, coord: ChunkCoord, _colors: &ColorGrid) {
            self.textures.push(coord);
        }

        fn upload_mesh(&mut self, coord: ChunkCoord, lod: u32, _mesh: &MeshData, origin: Vec3) {
            self.meshes.push((coord, lod, origin));
        }

        fn set_visible(&mut self, coord: ChunkCoord, visible: bool) {
            self.visibility.push((coord, visible));
        }

        fn release_chunk(&mut self, coord: ChunkCoord) {
            self.released.push(coord);
        }
    }

    fn config() -> StreamingConfig {
        StreamingConfig {
            detail_levels: vec![
                LodInfo::new(0, 30.0),
                LodInfo::new(1, 45.0),
                LodInfo::new(2, 60.0),
            ],
            viewer_move_threshold: 5.0,
            world_scale: 1.0,
            eviction_distance: None,
        }
    }

    fn manager(config: StreamingConfig) -> ChunkStreamingManager {
        let settings = GenerationSettings {
            map: MapSettings::new(
                NoiseConfig {
                    seed: 3,
                    scale: 18.0,
                    ..Default::default()
                },
                RegionTable::default_landmass(),
                false,
                RESOLUTION,
            ),
            height_curve: HeightCurve::linear(),
            height_multiplier: 12.0,
        };
        let pool = ThreadPoolConfig {
            worker_count: 2,
            thread_name_prefix: "streaming-test".to_string(),
        };
        let pipeline = GenerationPipeline::new(settings, pool).unwrap();
        ChunkStreamingManager::new(config, pipeline).unwrap()
    }

    /// Tick at `observer` until every submitted request has been delivered
    fn settle(manager: &mut ChunkStreamingManager, sink: &mut RecordingSink, observer: Vec2) {
        let deadline = Instant::now() + Duration::from_secs(30);
        loop {
            manager.update(observer, sink).unwrap();
            let stats = manager.pipeline().stats();
            if stats.map_delivered == stats.map_requested
                && stats.mesh_delivered == stats.mesh_requested
            {
                return;
            }
            assert!(Instant::now() < deadline, "streaming did not settle: {stats:?}");
            std::thread::sleep(Duration::from_millis(2));
        }
    }

    #[test]
    fn test_first_tick_creates_covering_block() {
        let mut manager = manager(config());
        let mut sink = RecordingSink::default();
        manager.update(Vec2::ZERO, &mut sink).unwrap();

        assert_eq!(manager.chunks_visible_in_view_distance(), 3);
        assert_eq!(manager.chunk_count(), 49);
        assert_eq!(manager.pipeline().stats().map_requested, 49);
        // nothing can be shown before map data arrives
        assert!(sink.visibility.is_empty());
        assert!(sink.meshes.is_empty());
    }

    #[test]
    fn test_settled_chunks_use_distance_lod() {
        let mut manager = manager(config());
        let mut sink = RecordingSink::default();
        settle(&mut manager, &mut sink, Vec2::ZERO);

        let levels = config().detail_levels;
        for coord in covering_set(ChunkCoord::default(), 3) {
            let chunk = manager.chunk(coord).unwrap();
            assert!(chunk.map_data.is_some());

            let distance = distance_to_bounds(&chunk.bounds, Vec2::ZERO);
            let expected_visible = distance <= 60.0;
            assert_eq!(chunk.visible, expected_visible, "chunk {coord}");

            if expected_visible {
                let index = select_lod_index(&levels, distance).unwrap();
                assert_eq!(chunk.current_lod, Some(levels[index].level_of_detail));
            } else {
                assert_eq!(chunk.current_lod, None);
            }
        }

        let origin = manager.chunk(ChunkCoord::new(0, 0)).unwrap();
        assert_eq!(origin.current_lod, Some(0));
        assert_eq!(sink.visibility_of(ChunkCoord::new(0, 0)), vec![true]);
        assert_eq!(sink.textures.len(), 49);
        assert!(manager.visible_chunks().count() > 0);
    }

    #[test]
    fn test_leaving_area_hides_previous_chunks() {
        let mut manager = manager(config());
        let mut sink = RecordingSink::default();
        settle(&mut manager, &mut sink, Vec2::ZERO);

        let far = Vec2::new(EDGE * 10.0, 0.0);
        settle(&mut manager, &mut sink, far);

        let origin = ChunkCoord::new(0, 0);
        assert!(!manager.chunk(origin).unwrap().visible);
        assert_eq!(sink.visibility_of(origin), vec![true, false]);
        // chunks persist without an eviction distance
        assert_eq!(manager.chunk_count(), 98);
        assert!(manager.chunk(ChunkCoord::new(10, 0)).unwrap().visible);

        // visibility is only reported on change
        for coord in covering_set(origin, 3).chain(covering_set(ChunkCoord::new(10, 0), 3)) {
            let events = sink.visibility_of(coord);
            assert!(events.windows(2).all(|w| w[0] != w[1]), "chunk {coord}: {events:?}");
        }
    }

    #[test]
    fn test_small_moves_do_not_refresh_visible_set() {
        let mut manager = manager(StreamingConfig {
            viewer_move_threshold: 50.0,
            ..config()
        });
        let mut sink = RecordingSink::default();
        settle(&mut manager, &mut sink, Vec2::ZERO);

        // would quantise to chunk (2, 0) but is inside the threshold
        manager.update(Vec2::new(40.0, 0.0), &mut sink).unwrap();
        assert_eq!(manager.chunk_count(), 49);

        manager.update(Vec2::new(55.0, 0.0), &mut sink).unwrap();
        assert_eq!(manager.chunk_count(), 63);
    }

    #[test]
    fn test_eviction_releases_far_hidden_chunks() {
        let mut manager = manager(StreamingConfig {
            eviction_distance: Some(100.0),
            ..config()
        });
        let mut sink = RecordingSink::default();
        settle(&mut manager, &mut sink, Vec2::ZERO);
        settle(&mut manager, &mut sink, Vec2::new(EDGE * 10.0, 0.0));

        assert!(manager.chunk(ChunkCoord::new(0, 0)).is_none());
        assert!(sink.released.contains(&ChunkCoord::new(0, 0)));
        assert_eq!(manager.chunk_count(), 49);
    }

    #[test]
    fn test_deliveries_for_evicted_chunks_are_ignored() {
        let mut manager = manager(StreamingConfig {
            eviction_distance: Some(100.0),
            ..config()
        });
        let mut sink = RecordingSink::default();

        // requests for the origin block are still in flight when we leave
        manager.update(Vec2::ZERO, &mut sink).unwrap();
        settle(&mut manager, &mut sink, Vec2::new(EDGE * 10.0, 0.0));

        assert!(manager.chunk(ChunkCoord::new(0, 0)).is_none());
        assert_eq!(manager.chunk_count(), 49);
        let stats = manager.pipeline().stats();
        assert_eq!(stats.map_requested, 98);
        assert_eq!(stats.map_delivered, 98);
    }

    #[test]
    fn test_failed_follow_up_request_keeps_delivering_batch() {
        let mut manager = manager(config());
        let mut sink = RecordingSink::default();
        manager.update(Vec2::ZERO, &mut sink).unwrap();

        // workers finish the queued map jobs, then new mesh requests fail
        manager.pipeline.shutdown();
        let result = manager.update(Vec2::ZERO, &mut sink);
        assert!(matches!(result, Err(LandmassError::ChannelClosed { .. })));

        for coord in covering_set(ChunkCoord::default(), 3) {
            let chunk = manager.chunk(coord).unwrap();
            assert!(chunk.map_data.is_some(), "chunk {coord}");
            assert!(chunk.map_request.is_none(), "chunk {coord}");
        }
        assert_eq!(sink.textures.len(), 49);
        assert_eq!(manager.pipeline().stats().map_delivered, 49);
    }

    #[test]
    fn test_world_scale_applies_to_observer_and_origins() {
        let mut manager = manager(StreamingConfig {
            world_scale: 2.0,
            ..config()
        });
        let mut sink = RecordingSink::default();
        settle(&mut manager, &mut sink, Vec2::ZERO);

        let east = ChunkCoord::new(1, 0);
        let (_, lod, origin) = sink
            .meshes
            .iter()
            .find(|(coord, _, _)| *coord == east)
            .copied()
            .unwrap();
        assert_eq!(lod, 0);
        assert_eq!(origin, Vec3::new(48.0, 0.0, 0.0));

        manager.update(Vec2::new(EDGE * 2.0 * 10.0, 0.0), &mut sink).unwrap();
        assert_eq!(manager.observer_position(), Vec2::new(EDGE * 10.0, 0.0));
    }

    #[test]
    fn test_rejects_invalid_streaming_config() {
        let settings = StreamingConfig {
            eviction_distance: Some(10.0),
            ..config()
        };
        assert!(settings.validate(RESOLUTION).is_err());

        let settings = StreamingConfig {
            world_scale: 0.0,
            ..config()
        };
        assert!(settings.validate(RESOLUTION).is_err());
        assert!(config().validate(RESOLUTION).is_ok());
    }
}
