//! Generation pipeline
//!
//! Runs map and mesh generation on the worker pool and hands results back
//! through two completion queues. Each request moves through
//! [`RequestStage`]s; nothing is cancelled or coalesced, so a duplicate
//! request simply computes the same pure result twice.

use super::completion_queue::CompletionQueue;
use crate::error::LandmassResult;
use crate::mesh::{self, MeshData};
use crate::streaming::chunk_data::ChunkCoord;
use crate::terrain::{generate_map_data, HeightCurve, MapData, MapSettings};
use crate::thread_pool::{
    create_thread_pool, execute_task, pool_stats, shutdown_thread_pool, ThreadPoolConfig,
    ThreadPoolData, ThreadPoolStats,
};
use glam::Vec2;
use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

/// Identifier handed out per submission and carried by its result
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct RequestId(u64);

impl RequestId {
    pub(crate) const fn new(raw: u64) -> Self {
        Self(raw)
    }

    pub fn raw(self) -> u64 {
        self.0
    }
}

impl fmt::Display for RequestId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Lifecycle of a single request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RequestStage {
    Submitted,
    Running,
    Completed,
    Delivered,
}

/// Immutable inputs shared by every job
#[derive(Debug, Clone)]
pub struct GenerationSettings {
    pub map: MapSettings,
    pub height_curve: HeightCurve,
    pub height_multiplier: f32,
}

/// Finished map data for one chunk
#[derive(Debug, Clone)]
pub struct MapDataReady {
    pub request: RequestId,
    pub coord: ChunkCoord,
    pub map_data: Arc<MapData>,
}

/// Finished mesh for one chunk at one level of detail
#[derive(Debug, Clone)]
pub struct MeshDataReady {
    pub request: RequestId,
    pub coord: ChunkCoord,
    pub level_of_detail: u32,
    pub mesh_data: MeshData,
}

/// Snapshot of request counters
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct PipelineStats {
    pub map_requested: u64,
    pub mesh_requested: u64,
    pub map_completed: u64,
    pub mesh_completed: u64,
    pub map_delivered: u64,
    pub mesh_delivered: u64,
}

impl PipelineStats {
    /// Requests submitted but not yet completed.
    ///
    /// Counters are loaded one at a time, so a snapshot taken while workers
    /// run can see a stage ahead of the one before it; those gaps read as 0.
    pub fn in_flight(&self) -> u64 {
        self.map_requested.saturating_sub(self.map_completed)
            + self.mesh_requested.saturating_sub(self.mesh_completed)
    }

    /// Results completed but not yet drained
    pub fn awaiting_delivery(&self) -> u64 {
        self.map_completed.saturating_sub(self.map_delivered)
            + self.mesh_completed.saturating_sub(self.mesh_delivered)
    }
}

#[derive(Debug, Default)]
struct PipelineCounters {
    map_requested: AtomicU64,
    mesh_requested: AtomicU64,
    map_completed: AtomicU64,
    mesh_completed: AtomicU64,
    map_delivered: AtomicU64,
    mesh_delivered: AtomicU64,
}

/// Request/response broker between the interactive thread and the workers
#[derive(Debug)]
pub struct GenerationPipeline {
    settings: Arc<GenerationSettings>,
    pool: ThreadPoolData,
    map_results: Arc<CompletionQueue<MapDataReady>>,
    mesh_results: Arc<CompletionQueue<MeshDataReady>>,
    counters: Arc<PipelineCounters>,
    next_request: AtomicU64,
}

impl GenerationPipeline {
    pub fn new(settings: GenerationSettings, pool_config: ThreadPoolConfig) -> LandmassResult<Self> {
        let pool = create_thread_pool(pool_config)?;
        log::info!(
            "[GenerationPipeline::new] Chunk resolution {}, {} workers",
            settings.map.chunk_resolution,
            pool.workers.len()
        );

        Ok(Self {
            settings: Arc::new(settings),
            pool,
            map_results: Arc::new(CompletionQueue::new()),
            mesh_results: Arc::new(CompletionQueue::new()),
            counters: Arc::new(PipelineCounters::default()),
            next_request: AtomicU64::new(1),
        })
    }

    pub fn settings(&self) -> &GenerationSettings {
        &self.settings
    }

    /// Queue map generation for the chunk centred at `center` (chunk space)
    pub fn request_map_data(&self, coord: ChunkCoord, center: Vec2) -> LandmassResult<RequestId> {
        let request = self.next_request_id();
        let settings = Arc::clone(&self.settings);
        let results = Arc::clone(&self.map_results);
        let counters = Arc::clone(&self.counters);

        self.counters.map_requested.fetch_add(1, Ordering::SeqCst);
        log_stage("map", request, coord, RequestStage::Submitted);

        let submitted = execute_task(&self.pool, move || {
            log_stage("map", request, coord, RequestStage::Running);
            let map_data = Arc::new(generate_map_data(&settings.map, center));

            counters.map_completed.fetch_add(1, Ordering::SeqCst);
            results.push(MapDataReady {
                request,
                coord,
                map_data,
            });
            log_stage("map", request, coord, RequestStage::Completed);
        });

        if let Err(e) = submitted {
            self.counters.map_requested.fetch_sub(1, Ordering::SeqCst);
            return Err(e);
        }
        Ok(request)
    }

    /// Queue mesh generation for `coord` at `level_of_detail`
    pub fn request_mesh_data(
        &self,
        coord: ChunkCoord,
        map_data: Arc<MapData>,
        level_of_detail: u32,
    ) -> LandmassResult<RequestId> {
        let request = self.next_request_id();
        let settings = Arc::clone(&self.settings);
        let results = Arc::clone(&self.mesh_results);
        let counters = Arc::clone(&self.counters);

        self.counters.mesh_requested.fetch_add(1, Ordering::SeqCst);
        log_stage("mesh", request, coord, RequestStage::Submitted);

        let submitted = execute_task(&self.pool, move || {
            log_stage("mesh", request, coord, RequestStage::Running);
            let mesh_data = mesh::build(
                map_data.heights(),
                &settings.height_curve,
                settings.height_multiplier,
                level_of_detail,
            );

            counters.mesh_completed.fetch_add(1, Ordering::SeqCst);
            results.push(MeshDataReady {
                request,
                coord,
                level_of_detail,
                mesh_data,
            });
            log_stage("mesh", request, coord, RequestStage::Completed);
        });

        if let Err(e) = submitted {
            self.counters.mesh_requested.fetch_sub(1, Ordering::SeqCst);
            return Err(e);
        }
        Ok(request)
    }

    /// Every map result completed so far, in completion order
    pub fn drain_map_results(&self) -> Vec<MapDataReady> {
        let ready = self.map_results.drain();
        self.counters
            .map_delivered
            .fetch_add(ready.len() as u64, Ordering::SeqCst);
        for result in &ready {
            log_stage("map", result.request, result.coord, RequestStage::Delivered);
        }
        ready
    }

    /// Every mesh result completed so far, in completion order
    pub fn drain_mesh_results(&self) -> Vec<MeshDataReady> {
        let ready = self.mesh_results.drain();
        self.counters
            .mesh_delivered
            .fetch_add(ready.len() as u64, Ordering::SeqCst);
        for result in &ready {
            log_stage("mesh", result.request, result.coord, RequestStage::Delivered);
        }
        ready
    }

    pub fn stats(&self) -> PipelineStats {
        let load = |counter: &AtomicU64| counter.load(Ordering::SeqCst);
        PipelineStats {
            map_requested: load(&self.counters.map_requested),
            mesh_requested: load(&self.counters.mesh_requested),
            map_completed: load(&self.counters.map_completed),
            mesh_completed: load(&self.counters.mesh_completed),
            map_delivered: load(&self.counters.map_delivered),
            mesh_delivered: load(&self.counters.mesh_delivered),
        }
    }

    pub fn pool_stats(&self) -> ThreadPoolStats {
        pool_stats(&self.pool)
    }

    /// Stop accepting requests and join the workers once queued jobs finish.
    /// Their results stay in the completion queues for a final drain.
    pub fn shutdown(&mut self) {
        shutdown_thread_pool(&mut self.pool);
    }

    fn next_request_id(&self) -> RequestId {
        RequestId::new(self.next_request.fetch_add(1, Ordering::Relaxed))
    }
}

fn log_stage(kind: &str, request: RequestId, coord: ChunkCoord, stage: RequestStage) {
    log::debug!(
        "[GenerationPipeline] {} request {} for chunk {}: {:?}",
        kind,
        request,
        coord,
        stage
    );
}
