//! End-to-end tests for the coordinator/worker scheduler.
//!
//! Tests verify:
//! - the output is the sorted permutation of the input for any worker
//!   count, including the zero-worker local fallback
//! - partitioning and level folds never drop elements
//! - every worker receives exactly one stop and joins cleanly
//! - the busy-slot count never exceeds the pool size

use parsort_kernel::{run_sort, SortOptions, SortReport};
use rstest::rstest;

// ============================================================================
// Test Helpers
// ============================================================================

async fn sort_with(data: Vec<i64>, workers: usize) -> SortReport {
    run_sort(data, &SortOptions { workers })
        .await
        .expect("scheduler run failed")
}

fn reference(mut data: Vec<i64>) -> Vec<i64> {
    data.sort_unstable();
    data
}

fn random_data(len: usize, seed: u64) -> Vec<i64> {
    let mut rng = fastrand::Rng::with_seed(seed);
    (0..len).map(|_| rng.i64(..)).collect()
}

// ============================================================================
// Correctness across worker counts
// ============================================================================

#[rstest]
#[case(0)]
#[case(1)]
#[case(2)]
#[case(3)]
#[case(5)]
#[case(8)]
#[tokio::test]
async fn test_sorted_permutation_for_any_pool_size(#[case] workers: usize) {
    let data = random_data(1000, 7);
    let expected = reference(data.clone());

    let report = sort_with(data, workers).await;
    assert_eq!(report.sorted, expected);
}

#[tokio::test]
async fn test_spec_scenario_ten_elements_three_workers() {
    let report = sort_with(vec![9, 4, 7, 3, 2, 8, 5, 1, 6, 0], 3).await;
    assert_eq!(report.sorted, vec![0, 1, 2, 3, 4, 5, 6, 7, 8, 9]);
}

#[rstest]
#[case(0)]
#[case(4)]
#[tokio::test]
async fn test_empty_input(#[case] workers: usize) {
    let report = sort_with(Vec::new(), workers).await;
    assert!(report.sorted.is_empty());
}

#[tokio::test]
async fn test_single_element() {
    let report = sort_with(vec![42], 4).await;
    assert_eq!(report.sorted, vec![42]);
}

#[tokio::test]
async fn test_more_workers_than_elements() {
    let report = sort_with(vec![3, 1, 2], 8).await;
    assert_eq!(report.sorted, vec![1, 2, 3]);
    // One chunk per element, none dropped.
    assert_eq!(report.stats.sort_tasks, 3);
}

#[tokio::test]
async fn test_duplicates_survive() {
    let data = vec![5, 5, 5, 1, 1, 9, 9, 9, 9, 0];
    let expected = reference(data.clone());
    let report = sort_with(data, 3).await;
    assert_eq!(report.sorted, expected);
}

#[tokio::test]
async fn test_zero_workers_falls_back_locally() {
    let data = random_data(500, 11);
    let expected = reference(data.clone());

    let report = sort_with(data, 0).await;
    assert_eq!(report.sorted, expected);
    // No protocol traffic in local mode.
    assert_eq!(report.stats.sort_tasks, 0);
    assert_eq!(report.stats.stops_sent, 0);
    assert_eq!(report.stats.max_busy, 0);
}

// ============================================================================
// Idempotence
// ============================================================================

#[tokio::test]
async fn test_same_values_across_runs() {
    let data = random_data(2000, 3);

    let first = sort_with(data.clone(), 4).await;
    let second = sort_with(data, 4).await;
    // Values are deterministic even though the merge-tree shape is not.
    assert_eq!(first.sorted, second.sorted);
}

// ============================================================================
// Partitioning and folding invariants
// ============================================================================

#[rstest]
#[case(10, 3)]
#[case(7, 2)]
#[case(1001, 8)]
#[case(13, 5)]
#[tokio::test]
async fn test_uneven_partition_is_disjoint_cover(#[case] len: usize, #[case] workers: usize) {
    let data = random_data(len, len as u64);
    let expected = reference(data.clone());

    let report = sort_with(data, workers).await;
    // Equality with the reference means every element appeared in
    // exactly one chunk: nothing lost, nothing duplicated.
    assert_eq!(report.sorted, expected);
    assert_eq!(report.sorted.len(), len);
}

#[tokio::test]
async fn test_fold_counts_form_a_binary_merge_tree() {
    let report = sort_with(random_data(999, 23), 5).await;
    // Each merge folds two runs into one, so reducing S sorted chunks
    // to a single run takes exactly S - 1 merges, odd tails included.
    assert_eq!(report.stats.merge_tasks, report.stats.sort_tasks - 1);
    assert!(report.stats.levels >= 1);
}

// ============================================================================
// Concurrency and shutdown
// ============================================================================

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_million_elements_eight_workers() {
    let data = random_data(1_000_000, 42);
    let expected = reference(data.clone());

    let report = sort_with(data, 8).await;
    assert_eq!(report.sorted, expected);
    assert!(
        report.stats.max_busy <= 8,
        "busy slots exceeded pool size: {}",
        report.stats.max_busy
    );
}

#[rstest]
#[case(1)]
#[case(3)]
#[case(8)]
#[tokio::test]
async fn test_stop_reaches_every_worker_once(#[case] workers: usize) {
    let report = sort_with(random_data(100, 9), workers).await;
    // run_sort joins every worker task, so a clean return means each
    // loop exited on its stop message.
    assert_eq!(report.stats.stops_sent, workers);
}

#[tokio::test]
async fn test_stop_sent_even_for_empty_input() {
    let report = sort_with(Vec::new(), 3).await;
    assert_eq!(report.stats.stops_sent, 3);
    assert_eq!(report.stats.sort_tasks, 0);
}

#[tokio::test]
async fn test_peak_busy_bounded_by_outstanding_work() {
    // Two chunks can never occupy more than two slots at once.
    let report = sort_with(random_data(10, 5), 2).await;
    assert!(report.stats.max_busy <= 2);
    assert_eq!(report.stats.sort_tasks, 2);
}
