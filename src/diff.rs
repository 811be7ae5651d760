// (c) Copyright 2025 Helsing GmbH. All rights reserved.
//! Diffing two versions of a child collection into storage calls.
//!
//! All entry points match the items of `before` and `after` by id (as reported by
//! [`DiffApi::get_id`]):
//!
//! - ids only in `before` are removed,
//! - ids only in `after` are added,
//! - ids in both are replaced, unconditionally (no-op detection is up to the API).
//!
//! [`diff`] and [`diff_add_then_update`] are for collections without positions. The latter
//! creates every new record before any replace happens, so that an existing item may refer to a
//! sibling created in the same batch.
//!
//! [`diff_orderable`] additionally reproduces the order of `after`: it keeps the longest
//! subsequence of common items whose relative order did not change in place and moves only the
//! rest. Adds and moves carry a [`BetweenPosition`] anchor built from ids that are already in
//! place when the call is made:
//!
//! - `previous` is the item directly before it in `after`,
//! - `next` is the first item after it in `after` that was never moved.
//!
//! Removals come first, in reverse `before` order. Then `after` is scanned left to right,
//! emitting adds and moves as they are encountered. Replaces come last.
//!
//! All entry points replace matched items in `before` order.
//!
//! ```rust
//! use orderdiff::diff::{diff_orderable, recording::RecordingDiffApi};
//!
//! let mut api = RecordingDiffApi::new(|v: &u32| *v);
//! let changes = diff_orderable(&[1, 2, 3, 4], &[1, 4, 2, 3], &mut api).unwrap();
//! assert_eq!(changes, 1);
//! assert_eq!(format!("{:?}", api.operations), "[Move(4, between(1, 2))]");
//! ```
//!
//! Duplicate ids on either side are not supported. The results are unspecified (but will not
//! panic), so callers must ensure uniqueness beforehand.
use crate::{create_map_with_capacity, position::BetweenPosition};
use api::{CollectionDiffApi, DiffApi, OrderableCollectionDiffApi};
use smallvec::SmallVec;
use std::hash::Hash;
use tracing::{debug, trace};

pub mod api;
mod operation;
pub mod recording;
mod stable;

pub use operation::{CollectionDiffOperation, PositionDiffKind};

/// Index-level matching of the two sides of a diff.
struct Matching {
    /// For each index into `before`, the index into `after` of the item with the same id.
    before_to_after: Vec<Option<usize>>,
    /// For each index into `after`, the index into `before` of the item with the same id.
    after_to_before: Vec<Option<usize>>,
}

impl Matching {
    fn new<T, Id>(before: &[T], after: &[T], get_id: impl Fn(&T) -> Id) -> Self
    where
        Id: Eq + Hash,
    {
        let mut after_index = create_map_with_capacity(after.len());
        for (j, value) in after.iter().enumerate() {
            after_index.insert(get_id(value), j);
        }

        let mut before_to_after = vec![None; before.len()];
        let mut after_to_before = vec![None; after.len()];
        for (i, value) in before.iter().enumerate() {
            if let Some(&j) = after_index.get(&get_id(value)) {
                before_to_after[i] = Some(j);
                after_to_before[j] = Some(i);
            }
        }

        Self {
            before_to_after,
            after_to_before,
        }
    }

    /// `(before, after)` index pairs of matched items, in `before` order.
    fn pairs(&self) -> impl Iterator<Item = (usize, usize)> + '_ {
        self.before_to_after
            .iter()
            .enumerate()
            .filter_map(|(i, j)| j.map(|j| (i, j)))
    }
}

/// Diffs two unordered collections.
///
/// Scans `before` in order, replacing matched items and removing the others, then adds the
/// items only present in `after`, in `after` order. Returns the sum of the counts reported by
/// the API.
pub fn diff<T, A>(before: &[T], after: &[T], api: &mut A) -> Result<usize, A::Error>
where
    A: CollectionDiffApi<T> + ?Sized,
{
    let matching = Matching::new(before, after, |v| api.get_id(v));

    let mut changes = 0;
    for (value, j) in before.iter().zip(&matching.before_to_after) {
        changes += match j {
            Some(j) => api.replace(value, &after[*j])?,
            None => api.remove(value)?,
        };
    }
    for (value, i) in after.iter().zip(&matching.after_to_before) {
        if i.is_none() {
            changes += api.add(value)?;
        }
    }

    debug!(
        before = before.len(),
        after = after.len(),
        changes,
        "diffed unordered collection"
    );
    Ok(changes)
}

/// Diffs two unordered collections, creating all new records before replacing any.
///
/// The order of calls is:
///
/// 1. `remove` for items only in `before`, in `before` order,
/// 2. [`add_and_get`](CollectionDiffApi::add_and_get) for items only in `after`, in `after`
///    order,
/// 3. `replace` for matched items, in `before` order,
/// 4. `replace(created, after)` for every record created in step 2.
///
/// Step 4 lets the API create a reduced record first and fill in references to siblings
/// afterwards. Its counts are not included in the returned total, since the record was already
/// counted when it was added.
pub fn diff_add_then_update<T, A>(before: &[T], after: &[T], api: &mut A) -> Result<usize, A::Error>
where
    T: Clone,
    A: CollectionDiffApi<T> + ?Sized,
{
    let matching = Matching::new(before, after, |v| api.get_id(v));

    let mut changes = 0;
    for (value, j) in before.iter().zip(&matching.before_to_after) {
        if j.is_none() {
            changes += api.remove(value)?;
        }
    }

    let mut created = SmallVec::<[(T, usize); 8]>::new();
    for (j, value) in after.iter().enumerate() {
        if matching.after_to_before[j].is_none() {
            let (added, stored) = api.add_and_get(value)?;
            changes += added;
            created.push((stored, j));
        }
    }

    for (i, j) in matching.pairs() {
        changes += api.replace(&before[i], &after[j])?;
    }

    for (stored, j) in &created {
        api.replace(stored, &after[*j])?;
    }

    debug!(
        before = before.len(),
        after = after.len(),
        created = created.len(),
        changes,
        "diffed collection, adds first"
    );
    Ok(changes)
}

/// The structural operations of an ordered diff together with the matching they came from.
struct OrderablePlan<'a, T, Id> {
    operations: Vec<CollectionDiffOperation<&'a T, Id>>,
    matching: Matching,
    stable: usize,
}

impl<'a, T, Id> OrderablePlan<'a, T, Id>
where
    Id: Clone + Eq + Hash,
{
    fn new(before: &'a [T], after: &'a [T], get_id: impl Fn(&T) -> Id) -> Self {
        let matching = Matching::new(before, after, &get_id);

        // positions in `after` of the common items, taken in `before` order. the increasing
        // runs of this are the items whose relative order survived.
        let common: Vec<usize> = matching.before_to_after.iter().flatten().copied().collect();
        let mut is_stable = vec![false; after.len()];
        let lis = stable::longest_increasing_subsequence(&common);
        for &k in &lis {
            is_stable[common[k]] = true;
        }

        let mut operations = Vec::new();
        for (value, j) in before.iter().zip(&matching.before_to_after).rev() {
            if j.is_none() {
                operations.push(CollectionDiffOperation::remove(value));
            }
        }

        // only stable items are in place ahead of the scan, so `next` anchors must skip
        // everything else.
        let mut next_stable = vec![None; after.len()];
        let mut upcoming = None;
        for j in (0..after.len()).rev() {
            next_stable[j] = upcoming.clone();
            if is_stable[j] {
                upcoming = Some(get_id(&after[j]));
            }
        }

        let mut previous = None;
        for (j, value) in after.iter().enumerate() {
            if !is_stable[j] {
                let between = BetweenPosition::new(previous.clone(), next_stable[j].take());
                operations.push(match matching.after_to_before[j] {
                    Some(i) => CollectionDiffOperation::mv(&before[i], between),
                    None => CollectionDiffOperation::add(value, between),
                });
            }
            previous = Some(get_id(value));
        }

        Self {
            operations,
            matching,
            stable: lis.len(),
        }
    }
}

/// Computes the add, remove and move operations that turn `before` into `after`, without
/// calling into any storage.
///
/// This is the structural part of [`diff_orderable`], in the same order. Removals and moves
/// carry the `before` value, adds the `after` value.
pub fn orderable_operations<'a, T, Id>(
    before: &'a [T],
    after: &'a [T],
    get_id: impl Fn(&T) -> Id,
) -> Vec<CollectionDiffOperation<&'a T, Id>>
where
    Id: Clone + Eq + Hash,
{
    OrderablePlan::new(before, after, get_id).operations
}

/// Diffs two ordered collections, reproducing the order of `after` with a minimal number of
/// moves.
///
/// See the [module documentation](self) for the order of calls and how anchors are chosen.
/// Returns the sum of the counts reported by the API, replaces included.
pub fn diff_orderable<T, A>(before: &[T], after: &[T], api: &mut A) -> Result<usize, A::Error>
where
    A: OrderableCollectionDiffApi<T> + ?Sized,
{
    let plan = OrderablePlan::new(before, after, |v| api.get_id(v));
    let structural = plan.operations.len();

    let mut changes = 0;
    for op in plan.operations {
        trace!(kind = ?op.kind, between = ?op.between, "applying collection operation");
        changes += match op.kind {
            PositionDiffKind::Remove => api.remove(op.value)?,
            PositionDiffKind::Add => api.add_between(op.value, op.between.unwrap_or_default())?,
            PositionDiffKind::Move => api.move_between(op.value, op.between.unwrap_or_default())?,
        };
    }

    for (i, j) in plan.matching.pairs() {
        changes += api.replace(&before[i], &after[j])?;
    }

    debug!(
        before = before.len(),
        after = after.len(),
        stable = plan.stable,
        structural,
        changes,
        "diffed ordered collection"
    );
    Ok(changes)
}
