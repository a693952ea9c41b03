//! parsort-kernel: the coordinator/worker core of parsort.
//!
//! This crate provides:
//!
//! - **Sort**: The sequential merge-sort primitive and two-way merge
//! - **Message**: Typed point-to-point links between the coordinator
//!   and numbered workers (tasks one way, results the other)
//! - **Scheduler**: The task queue, the coordinator control loop that
//!   dispatches work and folds completed levels into merge tasks, and
//!   the per-worker service loop
//! - **Error**: The (fatal) channel and worker failure taxonomy
//!
//! The top-level entry point is [`scheduler::run_sort`].

pub mod error;
pub mod message;
pub mod scheduler;
pub mod sort;

pub use error::SchedulerError;
pub use message::WorkerId;
pub use scheduler::{run_sort, SortOptions, SortReport, SortStats};
