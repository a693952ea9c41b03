//! Scheduler errors.
//!
//! Every variant here is fatal to the run: the protocol defines no
//! retry or backoff. An empty worker pool is not an error (the
//! coordinator falls back to sorting locally), and an odd-sized level
//! is handled by carrying the tail forward.

use thiserror::Error;

use crate::message::WorkerId;

/// Result type for scheduler operations.
pub type SchedulerResult<T> = Result<T, SchedulerError>;

/// Fatal coordination failures.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SchedulerError {
    /// The task channel to a worker closed while the run was live.
    #[error("task channel to worker {0} closed")]
    TaskChannelClosed(WorkerId),
    /// The shared result channel closed with tasks still outstanding.
    #[error("result channel closed with {outstanding} tasks outstanding")]
    ResultChannelClosed { outstanding: usize },
    /// A worker task panicked or was cancelled before stopping cleanly.
    #[error("worker {0} failed before clean shutdown")]
    WorkerFailed(WorkerId),
}
