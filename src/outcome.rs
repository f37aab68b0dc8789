//! Run-scoped outcome accumulation.
//!
//! Every sync worker reports into one shared [`Outcomes`] value. Appends and
//! counter increments go through a single mutex, so concurrent workers never
//! lose an update. Once the executor has drained, the accumulator is turned
//! into an immutable [`Summary`].

use std::sync::{Mutex, MutexGuard, PoisonError};

use serde::Serialize;

use crate::strategy::Notice;

/// Final tally of one run.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Summary {
    pub cloned_count: usize,
    pub pulled_count: usize,
    pub infos: Vec<String>,
    pub errors: Vec<String>,
}

impl Summary {
    /// Number of repositories accounted for in any bucket.
    pub fn total(&self) -> usize {
        self.cloned_count + self.pulled_count + self.infos.len() + self.errors.len()
    }

    pub fn has_issues(&self) -> bool {
        !self.errors.is_empty()
    }
}

/// Thread-safe accumulator shared by all workers of a run.
#[derive(Debug, Default)]
pub struct Outcomes {
    tally: Mutex<Summary>,
}

impl Outcomes {
    pub fn new() -> Self {
        Self::default()
    }

    // A worker that panicked while holding the lock leaves the tally intact,
    // so poisoning is ignored.
    fn lock(&self) -> MutexGuard<'_, Summary> {
        self.tally.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn record_cloned(&self) {
        self.lock().cloned_count += 1;
    }

    pub fn record_pulled(&self) {
        self.lock().pulled_count += 1;
    }

    pub fn info(&self, message: impl Into<String>) {
        self.lock().infos.push(message.into());
    }

    pub fn error(&self, message: impl Into<String>) {
        self.lock().errors.push(message.into());
    }

    /// Records a classified step failure.
    pub fn notice(&self, notice: Notice) {
        match notice {
            Notice::Info(msg) => self.info(msg),
            Notice::Issue(msg) => self.error(msg),
        }
    }

    /// Consumes the accumulator once every worker has finished.
    pub fn into_summary(self) -> Summary {
        self.tally
            .into_inner()
            .unwrap_or_else(PoisonError::into_inner)
    }
}
