// (c) Copyright 2025 Helsing GmbH. All rights reserved.
//! The stable subsequence of an ordered diff.
//!
//! Given, for each item present in both arrangements and in _old_ order, its index in the _new_
//! arrangement, the items that keep their relative order form an increasing subsequence. The
//! longest such subsequence is left untouched and everything else common to both sides is moved,
//! which minimizes the number of moves.
//!
//! Several longest subsequences usually exist. Patience sorting keeps, for every length, the
//! candidate ending in the smallest new index, and the result is traced back from the last
//! candidate of maximal length. In practice this keeps the items that end up _earliest_ in the
//! new arrangement stable among equally long candidates, and, once lists are long enough for
//! the candidates to differ in length, the larger contiguous run. For example, swapping
//! neighbours `[1, 2] -> [2, 1]` keeps `2` and moves `1` behind it, and reversing `[1, 2, 3]`
//! keeps only `3`.

/// Returns the indices into `seq` of a longest strictly increasing subsequence of `seq`.
///
/// The returned indices are in ascending order.
pub(crate) fn longest_increasing_subsequence(seq: &[usize]) -> Vec<usize> {
    // tails[k] is the index into `seq` of the smallest value ending an increasing run of length
    // k + 1 seen so far. its values are strictly increasing.
    let mut tails: Vec<usize> = Vec::new();
    let mut predecessor: Vec<Option<usize>> = Vec::with_capacity(seq.len());

    for (i, &x) in seq.iter().enumerate() {
        let k = tails.partition_point(|&t| seq[t] < x);
        predecessor.push(k.checked_sub(1).map(|p| tails[p]));
        if k == tails.len() {
            tails.push(i);
        } else {
            tails[k] = i;
        }
    }

    let mut lis = Vec::with_capacity(tails.len());
    let mut cursor = tails.last().copied();
    while let Some(i) = cursor {
        lis.push(i);
        cursor = predecessor[i];
    }
    lis.reverse();
    lis
}
