// (c) Copyright 2025 Helsing GmbH. All rights reserved.
//! This module contains a diff API that applies nothing and simply records every call it
//! receives. It serves as a dry run ("what would syncing these two collections do?") and is
//! what most tests assert against.
use super::{
    CollectionDiffOperation,
    api::{CollectionDiffApi, DiffApi, OrderableCollectionDiffApi},
};
use crate::position::BetweenPosition;
use std::{convert::Infallible, fmt, hash::Hash};

/// A diff API that records all calls.
///
/// Structural calls are recorded in [`operations`](Self::operations) and each reports one
/// affected record. Replacements are recorded separately and report a change only when `before`
/// and `after` differ.
pub struct RecordingDiffApi<T, Id, F> {
    identity: F,
    /// Every add, remove and move seen, in call order.
    pub operations: Vec<CollectionDiffOperation<T, Id>>,
    /// Every `(before, after)` pair passed to `replace`, in call order.
    pub replacements: Vec<(T, T)>,
}

impl<T, Id, F> RecordingDiffApi<T, Id, F>
where
    F: Fn(&T) -> Id,
{
    /// Creates a recorder that identifies items through `identity`.
    pub fn new(identity: F) -> Self {
        Self {
            identity,
            operations: Vec::new(),
            replacements: Vec::new(),
        }
    }

    /// The recorded operations with each value replaced by its id.
    pub fn operation_ids(&self) -> Vec<CollectionDiffOperation<Id, Id>>
    where
        Id: Clone,
    {
        self.operations
            .iter()
            .map(|op| CollectionDiffOperation {
                value: (self.identity)(&op.value),
                kind: op.kind,
                between: op.between.clone(),
            })
            .collect()
    }
}

impl<T, Id, F> fmt::Debug for RecordingDiffApi<T, Id, F>
where
    T: fmt::Debug,
    Id: fmt::Debug,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RecordingDiffApi")
            .field("operations", &self.operations)
            .field("replacements", &self.replacements)
            .finish_non_exhaustive()
    }
}

impl<T, Id, F> DiffApi<T> for RecordingDiffApi<T, Id, F>
where
    T: Clone + PartialEq,
    Id: Clone + Eq + Hash + fmt::Debug,
    F: Fn(&T) -> Id,
{
    type Id = Id;
    type Error = Infallible;

    fn get_id(&self, value: &T) -> Id {
        (self.identity)(value)
    }

    fn remove(&mut self, value: &T) -> Result<usize, Self::Error> {
        self.operations
            .push(CollectionDiffOperation::remove(value.clone()));
        Ok(1)
    }

    fn replace(&mut self, before: &T, after: &T) -> Result<usize, Self::Error> {
        self.replacements.push((before.clone(), after.clone()));
        Ok(usize::from(before != after))
    }
}

impl<T, Id, F> CollectionDiffApi<T> for RecordingDiffApi<T, Id, F>
where
    T: Clone + PartialEq,
    Id: Clone + Eq + Hash + fmt::Debug,
    F: Fn(&T) -> Id,
{
    fn add(&mut self, value: &T) -> Result<usize, Self::Error> {
        self.operations.push(CollectionDiffOperation::add(
            value.clone(),
            BetweenPosition::default(),
        ));
        Ok(1)
    }
}

impl<T, Id, F> OrderableCollectionDiffApi<T> for RecordingDiffApi<T, Id, F>
where
    T: Clone + PartialEq,
    Id: Clone + Eq + Hash + fmt::Debug,
    F: Fn(&T) -> Id,
{
    fn add_between(&mut self, value: &T, between: BetweenPosition<Id>) -> Result<usize, Self::Error> {
        self.operations
            .push(CollectionDiffOperation::add(value.clone(), between));
        Ok(1)
    }

    fn move_between(
        &mut self,
        value: &T,
        between: BetweenPosition<Id>,
    ) -> Result<usize, Self::Error> {
        self.operations
            .push(CollectionDiffOperation::mv(value.clone(), between));
        Ok(1)
    }
}
