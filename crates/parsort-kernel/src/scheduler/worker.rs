//! The per-worker service loop.
//!
//! A worker never initiates communication: it receives one task,
//! executes the sequential primitive, replies with the result on the
//! same link, and loops. No state survives from one task to the next.

use crate::error::SchedulerResult;
use crate::message::{TaskMsg, WorkerEndpoint};
use crate::sort;

/// Serve tasks until a stop message arrives or the coordinator drops
/// the link. Returns an error only if a result cannot be delivered.
#[tracing::instrument(level = "debug", skip(endpoint), fields(worker = %endpoint.id()))]
pub async fn run_worker(mut endpoint: WorkerEndpoint) -> SchedulerResult<()> {
    while let Some(msg) = endpoint.recv().await {
        match msg {
            TaskMsg::Sort(chunk) => {
                tracing::trace!(len = chunk.len(), "sorting chunk");
                endpoint.send_result(sort::merge_sort(chunk)).await?;
            }
            TaskMsg::Merge(left, right) => {
                tracing::trace!(len = left.len() + right.len(), "merging pair");
                endpoint.send_result(sort::merge(&left, &right)).await?;
            }
            TaskMsg::Stop => {
                tracing::debug!("received stop");
                break;
            }
        }
    }
    Ok(())
}
