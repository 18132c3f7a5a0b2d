//! Thread Pool Data
//!
//! Worker pool state and its configuration.
//! All transformations happen in thread_pool_operations.rs

use crate::constants::pipeline::WORKER_THREAD_PREFIX;
use crossbeam_channel::Sender;
use std::sync::atomic::AtomicUsize;
use std::sync::Arc;
use std::thread::JoinHandle;

/// Unit of work executed on a pool thread
pub type Job = Box<dyn FnOnce() + Send + 'static>;

/// Pool sizing
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ThreadPoolConfig {
    /// Fixed number of worker threads. Jobs beyond this wait in the queue.
    pub worker_count: usize,
    pub thread_name_prefix: String,
}

impl Default for ThreadPoolConfig {
    fn default() -> Self {
        Self {
            worker_count: num_cpus::get().max(1),
            thread_name_prefix: WORKER_THREAD_PREFIX.to_string(),
        }
    }
}

/// Counters shared between the pool handle and its workers
#[derive(Debug, Default)]
pub struct PoolCounters {
    pub queued: AtomicUsize,
    pub running: AtomicUsize,
    pub completed: AtomicUsize,
    pub panicked: AtomicUsize,
}

/// Snapshot of [`PoolCounters`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ThreadPoolStats {
    pub worker_count: usize,
    pub queued: usize,
    pub running: usize,
    pub completed: usize,
    pub panicked: usize,
}

/// Bounded worker pool fed through an unbounded job channel
pub struct ThreadPoolData {
    pub config: ThreadPoolConfig,
    /// `None` once the pool has been shut down
    pub sender: Option<Sender<Job>>,
    pub workers: Vec<JoinHandle<()>>,
    pub counters: Arc<PoolCounters>,
}

impl std::fmt::Debug for ThreadPoolData {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ThreadPoolData")
            .field("config", &self.config)
            .field("workers", &self.workers.len())
            .field("open", &self.sender.is_some())
            .field("counters", &self.counters)
            .finish()
    }
}

impl Drop for ThreadPoolData {
    fn drop(&mut self) {
        super::thread_pool_operations::shutdown_thread_pool(self);
    }
}
