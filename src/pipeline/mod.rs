//! Asynchronous generation
//!
//! Map and mesh requests run on worker threads; results wait in completion
//! queues until the interactive tick drains them.

pub mod completion_queue;
pub mod generation_pipeline;

pub use completion_queue::CompletionQueue;
pub use generation_pipeline::{
    GenerationPipeline, GenerationSettings, MapDataReady, MeshDataReady, PipelineStats,
    RequestId, RequestStage,
};
