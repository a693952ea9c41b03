//! Pending-work store for the coordinator.
//!
//! A priority queue of sort and merge tasks. Merge tasks outrank sort
//! tasks so a completed pair is drained before more raw sort work can
//! starve the downstream merges; among equal priorities insertion
//! order wins. Accessed only from the coordinator, never shared.

use std::cmp::Ordering;
use std::collections::BinaryHeap;

/// Merge tasks outrank sort tasks: lower value wins.
pub const PRIORITY_MERGE: u8 = 0;
pub const PRIORITY_SORT: u8 = 1;

/// The work a task carries.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TaskKind {
    /// Sort one unsorted chunk.
    Sort(Vec<i64>),
    /// Merge two adjacent sorted results from the previous level.
    Merge(Vec<i64>, Vec<i64>),
}

/// One unit of dispatchable work. Consumed exactly once, by exactly
/// one worker.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Task {
    /// Payload.
    pub kind: TaskKind,
    /// Scheduling priority (lower wins).
    pub priority: u8,
}

impl Task {
    /// A sort task over one chunk of the input.
    pub fn sort(chunk: Vec<i64>) -> Self {
        Self {
            kind: TaskKind::Sort(chunk),
            priority: PRIORITY_SORT,
        }
    }

    /// A merge task over two adjacent results of a completed level.
    pub fn merge(left: Vec<i64>, right: Vec<i64>) -> Self {
        Self {
            kind: TaskKind::Merge(left, right),
            priority: PRIORITY_MERGE,
        }
    }

    /// Total number of elements the task carries.
    pub fn len(&self) -> usize {
        match &self.kind {
            TaskKind::Sort(chunk) => chunk.len(),
            TaskKind::Merge(left, right) => left.len() + right.len(),
        }
    }

    /// Whether the task carries no elements.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

struct QueueEntry {
    task: Task,
    seq: u64,
}

impl PartialEq for QueueEntry {
    fn eq(&self, other: &Self) -> bool {
        self.task.priority == other.task.priority && self.seq == other.seq
    }
}

impl Eq for QueueEntry {}

impl Ord for QueueEntry {
    fn cmp(&self, other: &Self) -> Ordering {
        // BinaryHeap is a max-heap; invert so the lowest (priority, seq)
        // pair pops first.
        (other.task.priority, other.seq).cmp(&(self.task.priority, self.seq))
    }
}

impl PartialOrd for QueueEntry {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// Priority-ordered pending-work store.
#[derive(Default)]
pub struct TaskQueue {
    heap: BinaryHeap<QueueEntry>,
    seq: u64,
}

impl TaskQueue {
    /// Create an empty queue.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a task.
    pub fn push(&mut self, task: Task) {
        let seq = self.seq;
        self.seq += 1;
        self.heap.push(QueueEntry { task, seq });
    }

    /// Remove and return the highest-priority task; insertion order
    /// breaks ties.
    pub fn pop(&mut self) -> Option<Task> {
        self.heap.pop().map(|entry| entry.task)
    }

    /// Whether no work is pending.
    pub fn is_empty(&self) -> bool {
        self.heap.is_empty()
    }

    /// Number of pending tasks.
    pub fn len(&self) -> usize {
        self.heap.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_merge_outranks_sort() {
        let mut queue = TaskQueue::new();
        queue.push(Task::sort(vec![5, 4]));
        queue.push(Task::merge(vec![1], vec![2]));
        queue.push(Task::sort(vec![3]));

        let first = queue.pop().unwrap();
        assert_eq!(first.priority, PRIORITY_MERGE);
        assert_eq!(queue.pop().unwrap().priority, PRIORITY_SORT);
        assert_eq!(queue.pop().unwrap().priority, PRIORITY_SORT);
        assert!(queue.pop().is_none());
    }

    #[test]
    fn test_fifo_among_equal_priority() {
        let mut queue = TaskQueue::new();
        queue.push(Task::sort(vec![1]));
        queue.push(Task::sort(vec![2]));
        queue.push(Task::sort(vec![3]));

        assert_eq!(queue.pop().unwrap().kind, TaskKind::Sort(vec![1]));
        assert_eq!(queue.pop().unwrap().kind, TaskKind::Sort(vec![2]));
        assert_eq!(queue.pop().unwrap().kind, TaskKind::Sort(vec![3]));
    }

    #[test]
    fn test_fifo_among_merges() {
        let mut queue = TaskQueue::new();
        queue.push(Task::merge(vec![1], vec![2]));
        queue.push(Task::merge(vec![3], vec![4]));

        assert_eq!(queue.pop().unwrap().kind, TaskKind::Merge(vec![1], vec![2]));
        assert_eq!(queue.pop().unwrap().kind, TaskKind::Merge(vec![3], vec![4]));
    }

    #[test]
    fn test_len_and_empty() {
        let mut queue = TaskQueue::new();
        assert!(queue.is_empty());
        queue.push(Task::sort(vec![1]));
        queue.push(Task::sort(vec![2]));
        assert_eq!(queue.len(), 2);
        queue.pop();
        queue.pop();
        assert!(queue.is_empty());
    }

    #[test]
    fn test_task_len() {
        assert_eq!(Task::sort(vec![1, 2, 3]).len(), 3);
        assert_eq!(Task::merge(vec![1], vec![2, 3]).len(), 3);
        assert!(Task::sort(vec![]).is_empty());
    }
}
