//! Thread Pool Operations
//!
//! Create, feed and stop a fixed-size worker pool. Workers survive panicking
//! jobs; a panic is logged and counted.

use super::thread_pool_data::{Job, PoolCounters, ThreadPoolConfig, ThreadPoolData, ThreadPoolStats};
use crate::error::{LandmassError, LandmassResult};
use crossbeam_channel::Receiver;
use std::panic::{self, AssertUnwindSafe};
use std::sync::atomic::Ordering;
use std::sync::Arc;

/// Spawn `config.worker_count` workers (at least one)
pub fn create_thread_pool(config: ThreadPoolConfig) -> LandmassResult<ThreadPoolData> {
    let worker_count = config.worker_count.max(1);
    let (sender, receiver) = crossbeam_channel::unbounded::<Job>();
    let counters = Arc::new(PoolCounters::default());

    let mut workers = Vec::with_capacity(worker_count);
    for index in 0..worker_count {
        let name = format!("{}-{}", config.thread_name_prefix, index);
        let receiver = receiver.clone();
        let counters = Arc::clone(&counters);

        let handle = std::thread::Builder::new()
            .name(name.clone())
            .spawn(move || worker_loop(receiver, counters))
            .map_err(|e| LandmassError::WorkerSpawn {
                name,
                error: e.to_string(),
            })?;
        workers.push(handle);
    }

    log::info!(
        "[create_thread_pool] Started {} workers ({})",
        worker_count,
        config.thread_name_prefix
    );

    Ok(ThreadPoolData {
        config: ThreadPoolConfig {
            worker_count,
            ..config
        },
        sender: Some(sender),
        workers,
        counters,
    })
}

/// Queue a job. Never blocks; the job runs once a worker is free.
pub fn execute_task<F>(pool: &ThreadPoolData, job: F) -> LandmassResult<()>
where
    F: FnOnce() + Send + 'static,
{
    let sender = pool.sender.as_ref().ok_or_else(|| LandmassError::ChannelClosed {
        name: "worker_jobs".to_string(),
    })?;

    pool.counters.queued.fetch_add(1, Ordering::SeqCst);
    if let Err(e) = sender.send(Box::new(job)) {
        pool.counters.queued.fetch_sub(1, Ordering::SeqCst);
        return Err(e.into());
    }
    Ok(())
}

/// Current counter values
pub fn pool_stats(pool: &ThreadPoolData) -> ThreadPoolStats {
    ThreadPoolStats {
        worker_count: pool.workers.len(),
        queued: pool.counters.queued.load(Ordering::SeqCst),
        running: pool.counters.running.load(Ordering::SeqCst),
        completed: pool.counters.completed.load(Ordering::SeqCst),
        panicked: pool.counters.panicked.load(Ordering::SeqCst),
    }
}

/// Close the job queue and join every worker. Already queued jobs still run.
pub fn shutdown_thread_pool(pool: &mut ThreadPoolData) {
    if pool.sender.take().is_none() {
        return;
    }

    for handle in pool.workers.drain(..) {
        let name = handle.thread().name().unwrap_or("worker").to_string();
        if handle.join().is_err() {
            log::error!("[shutdown_thread_pool] Worker {} exited abnormally", name);
        }
    }

    log::info!(
        "[shutdown_thread_pool] Pool {} stopped",
        pool.config.thread_name_prefix
    );
}

fn worker_loop(receiver: Receiver<Job>, counters: Arc<PoolCounters>) {
    for job in receiver.iter() {
        counters.queued.fetch_sub(1, Ordering::SeqCst);
        counters.running.fetch_add(1, Ordering::SeqCst);

        let outcome = panic::catch_unwind(AssertUnwindSafe(job));

        counters.running.fetch_sub(1, Ordering::SeqCst);
        match outcome {
            Ok(()) => {
                counters.completed.fetch_add(1, Ordering::SeqCst);
            }
            Err(_) => {
                counters.panicked.fetch_add(1, Ordering::SeqCst);
                log::error!(
                    "[worker_loop] Job panicked on {}",
                    std::thread::current().name().unwrap_or("worker")
                );
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::AtomicUsize;
    use std::time::{Duration, Instant};

    fn config(worker_count: usize) -> ThreadPoolConfig {
        ThreadPoolConfig {
            worker_count,
            thread_name_prefix: "test-worker".to_string(),
        }
    }

    fn wait_for(mut condition: impl FnMut() -> bool) -> bool {
        let deadline = Instant::now() + Duration::from_secs(10);
        while Instant::now() < deadline {
            if condition() {
                return true;
            }
            std::thread::sleep(Duration::from_millis(2));
        }
        false
    }

    #[test]
    fn test_runs_all_jobs_with_fixed_workers() {
        let pool = create_thread_pool(config(2)).unwrap();
        let counter = Arc::new(AtomicUsize::new(0));

        for _ in 0..50 {
            let counter = Arc::clone(&counter);
            execute_task(&pool, move || {
                counter.fetch_add(1, Ordering::SeqCst);
            })
            .unwrap();
        }

        assert!(wait_for(|| counter.load(Ordering::SeqCst) == 50));
        assert_eq!(pool.workers.len(), 2);
        assert!(wait_for(|| pool_stats(&pool).completed == 50));
    }

    #[test]
    fn test_concurrency_never_exceeds_worker_count() {
        let pool = create_thread_pool(config(3)).unwrap();
        let active = Arc::new(AtomicUsize::new(0));
        let peak = Arc::new(AtomicUsize::new(0));
        let done = Arc::new(AtomicUsize::new(0));

        for _ in 0..24 {
            let (active, peak, done) = (Arc::clone(&active), Arc::clone(&peak), Arc::clone(&done));
            execute_task(&pool, move || {
                let now = active.fetch_add(1, Ordering::SeqCst) + 1;
                peak.fetch_max(now, Ordering::SeqCst);
                std::thread::sleep(Duration::from_millis(2));
                active.fetch_sub(1, Ordering::SeqCst);
                done.fetch_add(1, Ordering::SeqCst);
            })
            .unwrap();
        }

        assert!(wait_for(|| done.load(Ordering::SeqCst) == 24));
        assert!(peak.load(Ordering::SeqCst) <= 3);
    }

    #[test]
    fn test_worker_survives_panicking_job() {
        let pool = create_thread_pool(config(1)).unwrap();
        execute_task(&pool, || panic!("boom")).unwrap();

        let flag = Arc::new(AtomicUsize::new(0));
        let seen = Arc::clone(&flag);
        execute_task(&pool, move || {
            seen.store(1, Ordering::SeqCst);
        })
        .unwrap();

        assert!(wait_for(|| flag.load(Ordering::SeqCst) == 1));
        assert_eq!(pool_stats(&pool).panicked, 1);
    }

    #[test]
    fn test_shutdown_rejects_new_jobs() {
        let mut pool = create_thread_pool(config(1)).unwrap();
        shutdown_thread_pool(&mut pool);
        assert!(pool.workers.is_empty());

        let result = execute_task(&pool, || {});
        assert!(matches!(result, Err(LandmassError::ChannelClosed { .. })));
    }

    #[test]
    fn test_zero_workers_is_raised_to_one() {
        let pool = create_thread_pool(config(0)).unwrap();
        assert_eq!(pool_stats(&pool).worker_count, 1);
    }
}
