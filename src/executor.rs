//! # Bounded Execution
//!
//! Runs one job per item on a dedicated rayon pool whose size is the
//! concurrency limit, so no more than that many jobs are ever in flight.
//! Jobs are submitted in input order through a FIFO scope; completion order
//! is unspecified. [`BoundedExecutor::run`] returns only after every job has
//! finished.
//!
//! A job that panics does not disturb the others. The panic is caught,
//! logged and counted.

use std::panic::{self, AssertUnwindSafe};
use std::sync::atomic::{AtomicUsize, Ordering};

use log::error;
use rayon::{ThreadPool, ThreadPoolBuilder};

use crate::error::{Error, Result};

/// A fixed-size worker pool.
pub struct BoundedExecutor {
    pool: ThreadPool,
    limit: usize,
}

impl BoundedExecutor {
    /// Creates a pool running at most `limit` jobs at once.
    pub fn new(limit: usize) -> Result<Self> {
        if limit == 0 {
            return Err(Error::InvalidConcurrency {
                value: limit.to_string(),
            });
        }

        let pool = ThreadPoolBuilder::new()
            .num_threads(limit)
            .thread_name(|i| format!("sync-worker-{}", i))
            .build()?;

        Ok(Self { pool, limit })
    }

    /// The maximum number of jobs in flight.
    pub fn limit(&self) -> usize {
        self.limit
    }

    /// Runs `job` for every item and waits for all of them.
    ///
    /// Returns the number of jobs that panicked.
    pub fn run<T, F>(&self, items: Vec<T>, job: F) -> usize
    where
        T: Send,
        F: Fn(T) + Sync,
    {
        let panicked = AtomicUsize::new(0);
        let job = &job;
        let panicked_ref = &panicked;

        self.pool.scope_fifo(|scope| {
            for item in items {
                scope.spawn_fifo(move |_| {
                    if panic::catch_unwind(AssertUnwindSafe(|| job(item))).is_err() {
                        error!("A sync worker panicked; continuing with the remaining repositories");
                        panicked_ref.fetch_add(1, Ordering::SeqCst);
                    }
                });
            }
        });

        panicked.into_inner()
    }
}
