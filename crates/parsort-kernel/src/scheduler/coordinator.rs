//! The coordinator control loop.
//!
//! One task owns the task queue, the level buffer, and every worker
//! link, so all scheduling state is single-writer by construction. A
//! tick dispatches queued work to idle slots, collects whatever
//! results have arrived, and — once the queue is empty and no slot is
//! busy — folds the completed level pairwise into merge tasks. When a
//! fold leaves a single result the run terminates: every worker gets
//! one stop message and the result channel is dropped.
//!
//! The loop awaits the result channel only while tasks are
//! outstanding; already-arrived results are drained with a
//! non-blocking probe so a slow worker never stalls dispatch to the
//! others. Idleness is tracked per slot on the link itself, never
//! inferred from the absence of a message.

use tokio::sync::mpsc;

use crate::error::{SchedulerError, SchedulerResult};
use crate::message::{ResultMsg, TaskMsg, WorkerLink};
use crate::sort;

use super::queue::{Task, TaskKind, TaskQueue};

/// Counters describing one run. Used by the benchmark report and by
/// tests for the concurrency and shutdown properties.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SortStats {
    /// Sort tasks created while partitioning the input.
    pub sort_tasks: usize,
    /// Merge tasks created by level folds.
    pub merge_tasks: usize,
    /// Number of level folds performed.
    pub levels: usize,
    /// Peak number of concurrently busy worker slots.
    pub max_busy: usize,
    /// Stop messages sent (one per worker on clean termination).
    pub stops_sent: usize,
}

/// The coordinator: owns the queue, the level buffer, and all links.
pub struct Coordinator {
    links: Vec<WorkerLink>,
    result_rx: mpsc::Receiver<ResultMsg>,
    queue: TaskQueue,
    level: Vec<Vec<i64>>,
    stats: SortStats,
}

impl Coordinator {
    /// Create a coordinator over an already-built set of links and the
    /// receiving end of the shared result channel.
    pub fn new(links: Vec<WorkerLink>, result_rx: mpsc::Receiver<ResultMsg>) -> Self {
        Self {
            links,
            result_rx,
            queue: TaskQueue::new(),
            level: Vec::new(),
            stats: SortStats::default(),
        }
    }

    /// Run one sort to completion and return the sorted sequence with
    /// the run's counters.
    ///
    /// With an empty worker pool this falls back to sorting locally
    /// instead of deadlocking on dispatch.
    #[tracing::instrument(level = "debug", skip(self, input), fields(input_len = input.len(), workers = self.links.len()))]
    pub async fn run(mut self, input: Vec<i64>) -> SchedulerResult<(Vec<i64>, SortStats)> {
        if self.links.is_empty() {
            tracing::debug!("no workers attached, sorting locally");
            return Ok((sort::merge_sort(input), self.stats));
        }

        for chunk in partition(input, self.links.len()) {
            self.queue.push(Task::sort(chunk));
            self.stats.sort_tasks += 1;
        }

        loop {
            self.dispatch().await?;
            if self.queue.is_empty() && self.busy_count() == 0 {
                if self.level.len() > 1 {
                    self.fold();
                    continue;
                }
                break;
            }
            self.collect().await?;
        }

        self.shutdown().await?;
        Ok((self.level.pop().unwrap_or_default(), self.stats))
    }

    /// Feed queued tasks to idle slots until one side runs out.
    async fn dispatch(&mut self) -> SchedulerResult<()> {
        for link in self.links.iter_mut() {
            if link.is_busy() {
                continue;
            }
            let Some(task) = self.queue.pop() else {
                break;
            };
            tracing::trace!(worker = %link.id(), len = task.len(), "dispatching task");
            let msg = match task.kind {
                TaskKind::Sort(chunk) => TaskMsg::Sort(chunk),
                TaskKind::Merge(left, right) => TaskMsg::Merge(left, right),
            };
            link.send(msg).await?;
            link.mark_busy();
        }
        let busy = self.busy_count();
        self.stats.max_busy = self.stats.max_busy.max(busy);
        Ok(())
    }

    /// Wait for the next result, then drain any others that have
    /// already arrived. Results may come back in any order relative to
    /// dispatch order.
    async fn collect(&mut self) -> SchedulerResult<()> {
        let msg = self.result_rx.recv().await.ok_or_else(|| {
            SchedulerError::ResultChannelClosed {
                outstanding: self.busy_count(),
            }
        })?;
        self.accept(msg);
        while let Ok(msg) = self.result_rx.try_recv() {
            self.accept(msg);
        }
        Ok(())
    }

    /// Record one returned result: the slot goes idle and the payload
    /// joins the current level.
    fn accept(&mut self, msg: ResultMsg) {
        tracing::trace!(worker = %msg.worker, len = msg.payload.len(), "collected result");
        if let Some(link) = self.links.iter_mut().find(|l| l.id() == msg.worker) {
            link.mark_idle();
        }
        self.level.push(msg.payload);
    }

    /// Fold the completed level pairwise into merge tasks. An odd tail
    /// carries forward unmerged, so no result is ever dropped.
    fn fold(&mut self) {
        let level = std::mem::take(&mut self.level);
        let results = level.len();
        let (tasks, tail) = fold_level(level);
        for task in tasks {
            self.queue.push(task);
            self.stats.merge_tasks += 1;
        }
        if let Some(tail) = tail {
            self.level.push(tail);
        }
        self.stats.levels += 1;
        tracing::debug!(
            level = self.stats.levels,
            results,
            merges = self.queue.len(),
            "level complete, folded into merge tasks"
        );
    }

    /// Send one stop to every worker. Called only once the queue is
    /// empty and no task is outstanding, so no result can be in flight.
    async fn shutdown(&mut self) -> SchedulerResult<()> {
        for link in &self.links {
            link.send(TaskMsg::Stop).await?;
            self.stats.stops_sent += 1;
        }
        tracing::debug!(workers = self.links.len(), "sent stop to all workers");
        Ok(())
    }

    fn busy_count(&self) -> usize {
        self.links.iter().filter(|l| l.is_busy()).count()
    }
}

/// Split the input into at most `workers` contiguous chunks of size
/// ceil(n / workers). Every element lands in exactly one chunk; the
/// final chunk may be short.
pub(crate) fn partition(input: Vec<i64>, workers: usize) -> Vec<Vec<i64>> {
    if input.is_empty() {
        return Vec::new();
    }
    let chunk_size = input.len().div_ceil(workers);
    let mut chunks = Vec::with_capacity(workers);
    let mut rest = input;
    while rest.len() > chunk_size {
        let tail = rest.split_off(chunk_size);
        chunks.push(rest);
        rest = tail;
    }
    chunks.push(rest);
    chunks
}

/// Pair adjacent results of one level into merge tasks; an odd-length
/// level returns its unmatched tail for carry-forward.
pub(crate) fn fold_level(level: Vec<Vec<i64>>) -> (Vec<Task>, Option<Vec<i64>>) {
    let mut tasks = Vec::with_capacity(level.len() / 2);
    let mut results = level.into_iter();
    loop {
        match (results.next(), results.next()) {
            (Some(left), Some(right)) => tasks.push(Task::merge(left, right)),
            (Some(tail), None) => return (tasks, Some(tail)),
            (None, _) => return (tasks, None),
        }
    }
}
