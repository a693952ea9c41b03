//! Scheduler module for parsort — task queue, coordinator, and workers.
//!
//! One sort becomes a pipeline of sort tasks and merge tasks exchanged
//! over point-to-point links:
//!
//! ```text
//! ┌────────────────────────────────────────────────────────────┐
//! │                       Coordinator                          │
//! │  TaskQueue ──pop──▶ idle slot ──TaskMsg──▶ ┌──────────┐    │
//! │      ▲                                     │ worker 1 │    │
//! │      │ fold level pairwise                 ├──────────┤    │
//! │  level buffer ◀──ResultMsg── (any order) ──│ worker N │    │
//! └────────────────────────────────────────────┴──────────┴────┘
//! ```
//!
//! The coordinator splits the input into chunks, dispatches sort work
//! to idle workers, collects results as they arrive, and folds each
//! completed level of sorted runs into the next level's merge tasks
//! until one run remains. The merge-tree shape depends on arrival
//! timing and is deliberately not deterministic; the sorted values
//! are.

mod coordinator;
mod queue;
mod worker;

pub use coordinator::{Coordinator, SortStats};
pub use queue::{Task, TaskKind, TaskQueue};
pub use worker::run_worker;

use tokio::sync::mpsc;

use crate::error::{SchedulerError, SchedulerResult};
use crate::message::{link, WorkerId};

/// Options for one distributed sort.
#[derive(Debug, Clone)]
pub struct SortOptions {
    /// Number of workers to spawn (0 sorts locally).
    pub workers: usize,
}

impl Default for SortOptions {
    fn default() -> Self {
        Self { workers: 8 }
    }
}

/// Outcome of one run: the sorted data plus scheduling counters.
#[derive(Debug, Clone)]
pub struct SortReport {
    /// The sorted sequence.
    pub sorted: Vec<i64>,
    /// Counters from the coordinator.
    pub stats: SortStats,
}

/// Sort `data` with a pool of `options.workers` workers.
///
/// Spawns one task per worker, runs the coordinator to completion, and
/// joins every worker before returning. With zero workers the input is
/// sorted locally on the calling task.
pub async fn run_sort(data: Vec<i64>, options: &SortOptions) -> SchedulerResult<SortReport> {
    let workers = options.workers;
    let (result_tx, result_rx) = mpsc::channel(workers.max(1));

    let mut links = Vec::with_capacity(workers);
    let mut handles = Vec::with_capacity(workers);
    for w in 1..=workers {
        let id = WorkerId(w);
        let (coord_link, endpoint) = link(id, result_tx.clone());
        links.push(coord_link);
        handles.push((id, tokio::spawn(run_worker(endpoint))));
    }
    // The coordinator must see the channel close once every worker is
    // gone, so it may not hold a sender of its own.
    drop(result_tx);

    let (sorted, stats) = Coordinator::new(links, result_rx).run(data).await?;

    for (id, handle) in handles {
        match handle.await {
            Ok(result) => result?,
            Err(_) => return Err(SchedulerError::WorkerFailed(id)),
        }
    }

    Ok(SortReport { sorted, stats })
}
