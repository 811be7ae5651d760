// (c) Copyright 2025 Helsing GmbH. All rights reserved.
//! # orderdiff: Ordered Child Collections Without Renumbering
//!
//! This crate maintains **ordered child collections** (an entry's senses, a sense's example
//! sentences, a writing-system list, ...) that live inside a conflict-free, offline-capable data
//! store. Several replicas may insert, remove or reorder members of the same collection before
//! they synchronize, so positions cannot be stored as array indices: two replicas inserting "at
//! index 2" would collide. Instead every member carries a floating-point **order key**, and the
//! collection is read back sorted by `(order, id)`.
//!
//! Two stateless components cooperate on top of that representation:
//!
//! - [`pick_order`] computes a fresh order key for an insertion point described by a
//!   [`BetweenPosition`] anchor (`{previous, next}`), degrading gracefully when the anchors are
//!   stale because of concurrent edits.
//! - The [`diff`] module turns "old arrangement" and "new arrangement" of a collection into the
//!   minimal sequence of add / remove / move / replace calls that reproduces the new arrangement,
//!   expressed in anchors rather than indices. Items on the longest stable subsequence are never
//!   moved.
//!
//! The differ never touches storage itself. Callers hand it an implementation of
//! [`DiffApi`](diff::DiffApi) and friends which turns each call into whatever the backing store
//! needs, usually a change record for the CRDT log. [`OrderedCollection`] is an in-memory
//! implementation that resolves anchors through [`pick_order`] and records [`Change`]s.
//!
//! ## Example
//!
//! ```rust
//! use orderdiff::{OrderedCollection, Orderable, diff::diff_orderable};
//!
//! #[derive(Clone, Debug, PartialEq)]
//! struct Sense {
//!     id: u32,
//!     order: f64,
//!     gloss: &'static str,
//! }
//!
//! impl Orderable for Sense {
//!     type Id = u32;
//!     fn id(&self) -> u32 {
//!         self.id
//!     }
//!     fn order(&self) -> f64 {
//!         self.order
//!     }
//!     fn set_order(&mut self, order: f64) {
//!         self.order = order;
//!     }
//! }
//!
//! let run = Sense { id: 1, order: 1.0, gloss: "run" };
//! let walk = Sense { id: 2, order: 2.0, gloss: "walk" };
//! let before = [run.clone(), walk.clone()];
//! let mut senses = OrderedCollection::new(before.clone());
//!
//! // the user dragged "walk" above "run"
//! let changes = diff_orderable(&before, &[walk, run], &mut senses)?;
//! assert_eq!(changes, 1);
//! assert_eq!(senses.ids().collect::<Vec<_>>(), [2, 1]);
//! # Ok::<(), orderdiff::CollectionError<u32>>(())
//! ```
//!
//! ## Concurrency
//!
//! Everything here is synchronous and pure over already-materialized snapshots. Order keys
//! produced by different replicas are not coordinated; reconciling them is the job of the CRDT
//! merge layer. Within one diff call the emission order of operations is part of the contract
//! and must be preserved by the API implementation.
//!
//! ## Features
//!
//! - `serde`: Provides `serde` support for anchors, operations, order keys and change records.
//! - `arbitrary`: Implements `quickcheck::Arbitrary` for [`BetweenPosition`], useful for
//!   property-based testing.
//!
//! The wire-format tests need the `serde` feature, so run the suite with `--all-features` to
//! cover them.
#[cfg(test)]
#[macro_use(quickcheck)]
extern crate quickcheck_macros;

use ahash::RandomState;
use std::{
    hash::BuildHasher,
    sync::atomic::{AtomicBool, Ordering},
};

// Use a constant seed for hashing to make performance benchmarks have less variance.
pub(crate) const DETERMINISTIC_HASHER: RandomState = RandomState::with_seeds(48, 1516, 23, 42);

pub mod change;
pub use change::Change;
pub mod collection;
pub use collection::{CollectionError, OrderedCollection};
pub mod diff;
pub use diff::{
    CollectionDiffOperation, PositionDiffKind,
    api::{CollectionDiffApi, DiffApi, OrderableCollectionDiffApi},
};
/// Macros usable for tests and initialization
pub mod macros;
pub mod order_picker;
pub use order_picker::pick_order;
pub mod position;
pub use position::{BetweenPosition, OrderKey, Orderable, apply_sort_order, sort_key};

#[cfg(test)]
mod test_util;

static ENABLE_DETERMINISM: AtomicBool = AtomicBool::new(false);

/// Makes all internal hash maps use a fixed seed.
///
/// This should only be enabled for testing and benchmarking, as it increases the odds of DoS
/// scenarios when ids come from untrusted input.
#[doc(hidden)]
pub fn enable_determinism() {
    ENABLE_DETERMINISM.store(true, Ordering::Release);
}

/// Checks if determinism is enabled.
///
/// Should be used internally and for testing.
#[doc(hidden)]
pub fn determinism_enabled() -> bool {
    ENABLE_DETERMINISM.load(Ordering::Acquire)
}

#[inline]
fn make_random_state() -> RandomState {
    if determinism_enabled() {
        DETERMINISTIC_HASHER
    } else {
        RandomState::new()
    }
}

fn create_map_with_capacity<K, V>(
    capacity: usize,
) -> std::collections::HashMap<K, V, DiffRandomState> {
    std::collections::HashMap::with_capacity_and_hasher(capacity, DiffRandomState::default())
}

/// A small wrapper around [`ahash::RandomState`] that switches to a fixed seed once
/// [`enable_determinism`] has been called.
#[derive(Clone)]
pub struct DiffRandomState {
    inner: RandomState,
}

impl Default for DiffRandomState {
    #[inline]
    fn default() -> Self {
        Self {
            inner: make_random_state(),
        }
    }
}

impl BuildHasher for DiffRandomState {
    type Hasher = <RandomState as BuildHasher>::Hasher;

    #[inline]
    fn build_hasher(&self) -> Self::Hasher {
        self.inner.build_hasher()
    }
}
