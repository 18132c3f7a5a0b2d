//! Generation worker pool
//!
//! A fixed number of threads drain a shared job queue, so a burst of chunk
//! requests queues up instead of spawning one thread per request.

pub mod thread_pool_data;
pub mod thread_pool_operations;

pub use thread_pool_data::{Job, ThreadPoolConfig, ThreadPoolData, ThreadPoolStats};
pub use thread_pool_operations::{
    create_thread_pool, execute_task, pool_stats, shutdown_thread_pool,
};
