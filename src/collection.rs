// (c) Copyright 2025 Helsing GmbH. All rights reserved.
//! An in-memory ordered collection that applies diffs.
//!
//! [`OrderedCollection`] is a snapshot of the siblings of one parent (say, the senses of one
//! entry) kept in `(order, id)` order. It implements the diff API traits by resolving every
//! anchor with [`pick_order`] against its _current_ contents, which is exactly what a
//! storage-backed implementation does before it writes a change record. Each effective call is
//! logged as a [`Change`], so the collection doubles as a reference for what a real
//! implementation should emit.
use crate::{
    change::Change,
    diff::{
        self,
        api::{CollectionDiffApi, DiffApi, OrderableCollectionDiffApi},
    },
    order_picker::pick_order,
    position::{BetweenPosition, Orderable, apply_sort_order, sort_key},
};
use std::fmt;
use tracing::trace;

/// Error returned when an operation on an [`OrderedCollection`] does not fit its contents.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CollectionError<Id> {
    /// No member has this id.
    NotFound(Id),
    /// A member with this id already exists.
    DuplicateId(Id),
    /// A replace was asked to turn one member into another.
    IdMismatch { before: Id, after: Id },
}

impl<Id: fmt::Debug> fmt::Display for CollectionError<Id> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CollectionError::NotFound(id) => write!(f, "no member with id {id:?}"),
            CollectionError::DuplicateId(id) => write!(f, "a member with id {id:?} already exists"),
            CollectionError::IdMismatch { before, after } => {
                write!(f, "cannot replace member {before:?} with member {after:?}")
            }
        }
    }
}

impl<Id: fmt::Debug> std::error::Error for CollectionError<Id> {}

/// The members of one ordered collection, plus the log of changes made to them.
#[derive(Clone)]
pub struct OrderedCollection<T: Orderable> {
    items: Vec<T>,
    changes: Vec<Change<T, T::Id>>,
}

impl<T> fmt::Debug for OrderedCollection<T>
where
    T: Orderable + fmt::Debug,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(&self.items).finish()
    }
}

impl<T: Orderable> Default for OrderedCollection<T> {
    fn default() -> Self {
        Self {
            items: Vec::new(),
            changes: Vec::new(),
        }
    }
}

impl<T: Orderable> FromIterator<T> for OrderedCollection<T> {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        Self::new(iter)
    }
}

impl<T: Orderable> OrderedCollection<T> {
    /// Creates a collection from a loaded snapshot, sorting it into display order.
    ///
    /// No change records are produced for the initial members.
    pub fn new(items: impl IntoIterator<Item = T>) -> Self {
        let mut items: Vec<T> = items.into_iter().collect();
        apply_sort_order(&mut items);
        Self {
            items,
            changes: Vec::new(),
        }
    }

    /// The members in display order.
    pub fn items(&self) -> &[T] {
        &self.items
    }

    pub fn into_items(self) -> Vec<T> {
        self.items
    }

    /// The member ids in display order.
    pub fn ids(&self) -> impl Iterator<Item = T::Id> + '_ {
        self.items.iter().map(Orderable::id)
    }

    pub fn get(&self, id: &T::Id) -> Option<&T> {
        self.index_of(id).map(|i| &self.items[i])
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// The changes made since creation (or since the last [`take_changes`](Self::take_changes)).
    pub fn changes(&self) -> &[Change<T, T::Id>] {
        &self.changes
    }

    /// Drains the change log, eg. to hand it to the replication layer.
    pub fn take_changes(&mut self) -> Vec<Change<T, T::Id>> {
        std::mem::take(&mut self.changes)
    }

    fn index_of(&self, id: &T::Id) -> Option<usize> {
        self.items.iter().position(|item| &item.id() == id)
    }

    fn insert_sorted(&mut self, item: T) {
        let key = sort_key(&item);
        let at = self.items.partition_point(|other| sort_key(other) < key);
        self.items.insert(at, item);
    }

    /// Adds a new member at the position described by `between` and returns its order key.
    ///
    /// The order key `value` arrives with is ignored.
    pub fn insert(
        &mut self,
        mut value: T,
        between: Option<&BetweenPosition<T::Id>>,
    ) -> Result<f64, CollectionError<T::Id>>
    where
        T: Clone,
    {
        let id = value.id();
        if self.index_of(&id).is_some() {
            return Err(CollectionError::DuplicateId(id));
        }
        let order = pick_order(&self.items, between);
        value.set_order(order);
        trace!(?id, order, "created member");
        self.changes.push(Change::Create {
            value: value.clone(),
        });
        self.insert_sorted(value);
        Ok(order)
    }

    /// Gives an existing member a new order key so it ends up at `between`, and returns the key.
    pub fn reposition(
        &mut self,
        id: &T::Id,
        between: &BetweenPosition<T::Id>,
    ) -> Result<f64, CollectionError<T::Id>> {
        let index = self
            .index_of(id)
            .ok_or_else(|| CollectionError::NotFound(id.clone()))?;
        let order = pick_order(&self.items, Some(between));
        let mut item = self.items.remove(index);
        item.set_order(order);
        trace!(?id, order, "moved member");
        self.changes.push(Change::SetOrder {
            id: id.clone(),
            order,
        });
        self.insert_sorted(item);
        Ok(order)
    }

    /// Deletes a member and returns it.
    pub fn delete(&mut self, id: &T::Id) -> Result<T, CollectionError<T::Id>> {
        let index = self
            .index_of(id)
            .ok_or_else(|| CollectionError::NotFound(id.clone()))?;
        trace!(?id, "deleted member");
        self.changes.push(Change::Delete { id: id.clone() });
        Ok(self.items.remove(index))
    }

    /// Replaces the payload of a member, keeping its current order key.
    ///
    /// Returns whether anything changed; an identical payload produces no change record.
    pub fn update(&mut self, after: &T) -> Result<bool, CollectionError<T::Id>>
    where
        T: Clone + PartialEq,
    {
        let id = after.id();
        let index = self
            .index_of(&id)
            .ok_or_else(|| CollectionError::NotFound(id.clone()))?;
        let current = &mut self.items[index];

        let mut updated = after.clone();
        updated.set_order(current.order());
        if *current == updated {
            return Ok(false);
        }

        let before = std::mem::replace(current, updated.clone());
        trace!(?id, "updated member");
        self.changes.push(Change::Update {
            id,
            before,
            after: updated,
        });
        Ok(true)
    }

    /// Brings the collection to the arrangement of `after`, with the fewest moves possible.
    ///
    /// Returns the number of effective changes.
    pub fn sync(&mut self, after: &[T]) -> Result<usize, CollectionError<T::Id>>
    where
        T: Clone + PartialEq,
    {
        let before = self.items.clone();
        diff::diff_orderable(&before, after, self)
    }
}

impl<T> DiffApi<T> for OrderedCollection<T>
where
    T: Orderable + Clone + PartialEq,
{
    type Id = T::Id;
    type Error = CollectionError<T::Id>;

    fn get_id(&self, value: &T) -> T::Id {
        value.id()
    }

    fn remove(&mut self, value: &T) -> Result<usize, Self::Error> {
        self.delete(&value.id()).map(|_| 1)
    }

    fn replace(&mut self, before: &T, after: &T) -> Result<usize, Self::Error> {
        let (before_id, after_id) = (before.id(), after.id());
        if before_id != after_id {
            return Err(CollectionError::IdMismatch {
                before: before_id,
                after: after_id,
            });
        }
        self.update(after).map(usize::from)
    }
}

impl<T> CollectionDiffApi<T> for OrderedCollection<T>
where
    T: Orderable + Clone + PartialEq,
{
    fn add(&mut self, value: &T) -> Result<usize, Self::Error> {
        self.insert(value.clone(), None).map(|_| 1)
    }

    fn add_and_get(&mut self, value: &T) -> Result<(usize, T), Self::Error> {
        let order = self.insert(value.clone(), None)?;
        let mut stored = value.clone();
        stored.set_order(order);
        Ok((1, stored))
    }
}

impl<T> OrderableCollectionDiffApi<T> for OrderedCollection<T>
where
    T: Orderable + Clone + PartialEq,
{
    fn add_between(
        &mut self,
        value: &T,
        between: BetweenPosition<T::Id>,
    ) -> Result<usize, Self::Error> {
        self.insert(value.clone(), Some(&between)).map(|_| 1)
    }

    fn move_between(
        &mut self,
        value: &T,
        between: BetweenPosition<T::Id>,
    ) -> Result<usize, Self::Error> {
        self.reposition(&value.id(), &between).map(|_| 1)
    }
}
