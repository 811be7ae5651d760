// (c) Copyright 2025 Helsing GmbH. All rights reserved.
//! The storage side of a diff.
//!
//! The differ decides _what_ has to happen to turn one arrangement of a collection into another;
//! implementors of these traits decide _how_ that is persisted. Typically each call becomes a
//! change record in the CRDT log (see [`OrderedCollection`](crate::OrderedCollection) for an
//! in-memory implementation).
//!
//! Every method returns the number of records it actually affected. The differ sums these up,
//! so an implementation that decides a call is a no-op (an unchanged replace, a removal it
//! refuses to perform) reports `0` and does not inflate the change count.
//!
//! Calls arrive in emission order and must be applied in that order.
use crate::position::BetweenPosition;
use std::{fmt, hash::Hash};

/// Identity and the operations shared by ordered and unordered collections.
///
/// If `Error = Infallible`, the API can be thought of as a recorder. If it can produce an error,
/// the differ stops at the first failing call and hands the error back unchanged; no rollback of
/// the calls made so far is attempted.
pub trait DiffApi<T> {
    /// Identity used to match items of the old and the new collection.
    type Id: Clone + Eq + Hash + fmt::Debug;

    type Error;

    fn get_id(&self, value: &T) -> Self::Id;

    /// Removes an item that exists only in the old collection.
    fn remove(&mut self, value: &T) -> Result<usize, Self::Error>;

    /// Updates an item present in both collections.
    ///
    /// Called for every matched pair, including ones whose payload is unchanged; detecting
    /// no-ops is up to the implementation.
    fn replace(&mut self, before: &T, after: &T) -> Result<usize, Self::Error>;
}

/// Storage for a collection without positions.
pub trait CollectionDiffApi<T>: DiffApi<T> {
    /// Adds an item that exists only in the new collection.
    fn add(&mut self, value: &T) -> Result<usize, Self::Error>;

    /// Adds an item and returns the record as it was stored.
    ///
    /// The returned value is used as the `before` side of a follow-up
    /// [`replace`](DiffApi::replace), which lets an implementation create a stripped-down record
    /// first (for example without references to siblings that may not exist yet) and fill in
    /// the rest once every new sibling has been created.
    fn add_and_get(&mut self, value: &T) -> Result<(usize, T), Self::Error>
    where
        T: Clone,
    {
        let changes = self.add(value)?;
        Ok((changes, value.clone()))
    }
}

/// Storage for a collection whose members are ordered.
///
/// Positions are always handed over as anchors to neighbouring ids; turning an anchor into an
/// order key (usually via [`pick_order`](crate::pick_order)) is the implementation's job.
pub trait OrderableCollectionDiffApi<T>: DiffApi<T> {
    /// Adds an item that exists only in the new collection at the given position.
    fn add_between(
        &mut self,
        value: &T,
        between: BetweenPosition<Self::Id>,
    ) -> Result<usize, Self::Error>;

    /// Repositions an item that exists in both collections.
    fn move_between(
        &mut self,
        value: &T,
        between: BetweenPosition<Self::Id>,
    ) -> Result<usize, Self::Error>;
}
