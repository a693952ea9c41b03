//! Point-to-point links between the coordinator and workers.
//!
//! Each worker is addressed by a small integer id and attached to the
//! coordinator by exactly one link: a bounded task channel toward the
//! worker and a clone of the shared result channel back. The message
//! tag of the wire protocol is the enum discriminant; a merge task
//! carries both operands in one message so the pairing is atomic.
//!
//! The coordinator side of a link also carries the authoritative slot
//! state (idle or busy). Workers have no visibility into global state:
//! a worker only ever answers the message it just received.

use tokio::sync::mpsc;

use crate::error::{SchedulerError, SchedulerResult};

/// A worker has at most one outstanding task, so its inbox never needs
/// to hold more than the task in flight and a trailing stop.
const TASK_CHANNEL_CAPACITY: usize = 2;

/// Unique identifier for a worker slot (1..=W). The coordinator is the
/// distinguished role 0 and is never addressed by id.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct WorkerId(pub usize);

impl std::fmt::Display for WorkerId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Coordinator → worker messages.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TaskMsg {
    /// Sort one sequence.
    Sort(Vec<i64>),
    /// Merge two already-sorted sequences.
    Merge(Vec<i64>, Vec<i64>),
    /// Exit the service loop.
    Stop,
}

/// Worker → coordinator reply, self-attributing so the coordinator can
/// mark the right slot idle.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResultMsg {
    /// The worker that produced this result.
    pub worker: WorkerId,
    /// The sorted sequence.
    pub payload: Vec<i64>,
}

/// Coordinator-side end of one link: the task sender plus the slot state.
pub struct WorkerLink {
    id: WorkerId,
    tx: mpsc::Sender<TaskMsg>,
    busy: bool,
}

impl WorkerLink {
    /// The worker this link addresses.
    pub fn id(&self) -> WorkerId {
        self.id
    }

    /// Whether the slot has an outstanding task.
    pub fn is_busy(&self) -> bool {
        self.busy
    }

    pub(crate) fn mark_busy(&mut self) {
        self.busy = true;
    }

    pub(crate) fn mark_idle(&mut self) {
        self.busy = false;
    }

    /// Send one message to the worker. A closed channel means the peer
    /// is gone, which is fatal to the run.
    pub async fn send(&self, msg: TaskMsg) -> SchedulerResult<()> {
        self.tx
            .send(msg)
            .await
            .map_err(|_| SchedulerError::TaskChannelClosed(self.id))
    }
}

/// Worker-side end of one link.
pub struct WorkerEndpoint {
    id: WorkerId,
    task_rx: mpsc::Receiver<TaskMsg>,
    result_tx: mpsc::Sender<ResultMsg>,
}

impl WorkerEndpoint {
    /// This endpoint's own id.
    pub fn id(&self) -> WorkerId {
        self.id
    }

    /// Receive the next task. `None` means the coordinator dropped the
    /// link, which the worker treats like a stop.
    pub async fn recv(&mut self) -> Option<TaskMsg> {
        self.task_rx.recv().await
    }

    /// Reply to the coordinator with a result.
    pub async fn send_result(&self, payload: Vec<i64>) -> SchedulerResult<()> {
        self.result_tx
            .send(ResultMsg {
                worker: self.id,
                payload,
            })
            .await
            .map_err(|_| SchedulerError::TaskChannelClosed(self.id))
    }
}

/// Build one point-to-point link for worker `id`, sharing `result_tx`
/// as the return path to the coordinator.
pub fn link(id: WorkerId, result_tx: mpsc::Sender<ResultMsg>) -> (WorkerLink, WorkerEndpoint) {
    let (tx, task_rx) = mpsc::channel(TASK_CHANNEL_CAPACITY);
    (
        WorkerLink {
            id,
            tx,
            busy: false,
        },
        WorkerEndpoint {
            id,
            task_rx,
            result_tx,
        },
    )
}
