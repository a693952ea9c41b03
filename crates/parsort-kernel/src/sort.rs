//! Sequential sort primitives.
//!
//! These are the commodity operations workers run on request: a
//! divide-and-conquer merge sort and a linear-time merge of two
//! already-sorted sequences. Pure functions, no concurrency.

/// Stable merge sort by recursive halving.
pub fn merge_sort(data: Vec<i64>) -> Vec<i64> {
    if data.len() <= 1 {
        return data;
    }
    let mid = data.len() / 2;
    let mut left = data;
    let right = left.split_off(mid);
    let left = merge_sort(left);
    let right = merge_sort(right);
    merge(&left, &right)
}

/// Linear-time merge of two sorted sequences.
///
/// Stable: on ties the element from `left` comes first.
pub fn merge(left: &[i64], right: &[i64]) -> Vec<i64> {
    let mut out = Vec::with_capacity(left.len() + right.len());
    let (mut i, mut j) = (0, 0);
    while i < left.len() && j < right.len() {
        if left[i] <= right[j] {
            out.push(left[i]);
            i += 1;
        } else {
            out.push(right[j]);
            j += 1;
        }
    }
    out.extend_from_slice(&left[i..]);
    out.extend_from_slice(&right[j..]);
    out
}

/// Whether a sequence is non-decreasing. Diagnostic only.
pub fn is_sorted(data: &[i64]) -> bool {
    data.windows(2).all(|w| w[0] <= w[1])
}
