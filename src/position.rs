// (c) Copyright 2025 Helsing GmbH. All rights reserved.
//! Order keys, orderable items and insertion anchors.
//!
//! Members of an ordered collection do not store their index. Each member has an [`OrderKey`]
//! and the collection is the sequence of members sorted by `(order, id)` (see [`sort_key`]).
//! Inserting between two members means picking a key strictly between theirs, which never
//! requires touching any other member.
//!
//! Where an insertion should happen is described by a [`BetweenPosition`]: the ids of the
//! desired neighbours, not their keys, since keys may have changed (or neighbours may be gone)
//! by the time the anchor is resolved against a replica's snapshot.
use std::{cmp::Ordering, fmt, hash::Hash};

// NOTE: `f64` keys run out of distinct midpoints after roughly fifty bisections of the same
// gap. the collections this is used for are small and human edited, so that is accepted rather
// than moving to an unbounded fractional scheme.
/// A totally ordered wrapper around the `f64` order key of an [`Orderable`].
///
/// Comparisons use [`f64::total_cmp`], so every value (including the ones [`OrderKey::from_raw`]
/// refuses to produce) has a well-defined place in the order. `-0.0` and `0.0` are the same
/// key, as they are for plain `f64` comparison.
#[derive(Clone, Copy)]
#[cfg_attr(feature = "serde", derive(::serde::Deserialize, ::serde::Serialize))]
pub struct OrderKey(f64);

impl fmt::Debug for OrderKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl PartialEq for OrderKey {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for OrderKey {}

impl PartialOrd for OrderKey {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for OrderKey {
    fn cmp(&self, other: &Self) -> Ordering {
        normalize(self.0).total_cmp(&normalize(other.0))
    }
}

/// Folds `-0.0` into `0.0`, the only pair of distinct bit patterns that compare equal as `f64`.
fn normalize(value: f64) -> f64 {
    if value == 0.0 { 0.0 } else { value }
}

impl OrderKey {
    /// Creates an `OrderKey` from a raw `f64` value.
    ///
    /// Returns `None` for NaN and infinities, which cannot take part in midpoint arithmetic.
    pub fn from_raw(value: f64) -> Option<OrderKey> {
        value.is_finite().then_some(Self(normalize(value)))
    }

    /// Returns the raw `f64` value of the key.
    pub fn as_raw(&self) -> f64 {
        self.0
    }
}

/// An item of an ordered collection.
///
/// Ids must be unique within the parent collection and never reused. Order keys need not be
/// unique: concurrent inserts on different replicas may pick the same key, in which case the id
/// decides.
pub trait Orderable {
    /// Stable identity of the item.
    type Id: Clone + Eq + Hash + Ord + fmt::Debug;

    fn id(&self) -> Self::Id;

    fn order(&self) -> f64;

    fn set_order(&mut self, order: f64);
}

/// The key an [`Orderable`] sorts by: order key first, id as tie-break.
pub fn sort_key<T: Orderable>(item: &T) -> (OrderKey, T::Id) {
    (OrderKey(item.order()), item.id())
}

/// Sorts a freshly loaded snapshot of siblings into display order.
pub fn apply_sort_order<T: Orderable>(items: &mut [T]) {
    items.sort_by_cached_key(sort_key);
}

/// Where an item should end up, expressed through its desired neighbours.
///
/// | `previous` | `next`  | meaning                        |
/// |------------|---------|--------------------------------|
/// | `None`     | `None`  | anywhere, typically appended   |
/// | `None`     | `x`     | immediately before `x`         |
/// | `x`        | `None`  | immediately after `x`          |
/// | `x`        | `y`     | between `x` and `y`            |
///
/// The referenced ids may no longer exist in the snapshot the anchor is resolved against.
/// Consumers (like [`pick_order`](crate::pick_order)) must treat that as a degraded anchor,
/// never as an error.
#[derive(Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(::serde::Deserialize, ::serde::Serialize))]
pub struct BetweenPosition<Id> {
    pub previous: Option<Id>,
    pub next: Option<Id>,
}

impl<Id> Default for BetweenPosition<Id> {
    fn default() -> Self {
        Self {
            previous: None,
            next: None,
        }
    }
}

impl<Id: fmt::Debug> fmt::Debug for BetweenPosition<Id> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "between(")?;
        match &self.previous {
            Some(id) => write!(f, "{id:?}")?,
            None => write!(f, "_")?,
        }
        write!(f, ", ")?;
        match &self.next {
            Some(id) => write!(f, "{id:?}")?,
            None => write!(f, "_")?,
        }
        write!(f, ")")
    }
}

impl<Id> BetweenPosition<Id> {
    pub fn new(previous: Option<Id>, next: Option<Id>) -> Self {
        Self { previous, next }
    }

    /// Immediately after `previous`.
    pub fn after(previous: Id) -> Self {
        Self::new(Some(previous), None)
    }

    /// Immediately before `next`.
    pub fn before(next: Id) -> Self {
        Self::new(None, Some(next))
    }

    /// True when neither side is anchored, ie. the item may go anywhere.
    pub fn is_unanchored(&self) -> bool {
        self.previous.is_none() && self.next.is_none()
    }

    /// Converts an anchor expressed in one kind of reference into another, for instance from
    /// neighbouring items into their ids.
    pub fn map<U, F>(self, mut f: F) -> BetweenPosition<U>
    where
        F: FnMut(Id) -> U,
    {
        BetweenPosition {
            previous: self.previous.map(&mut f),
            next: self.next.map(&mut f),
        }
    }
}

#[cfg(any(test, feature = "arbitrary"))]
impl<Id> quickcheck::Arbitrary for BetweenPosition<Id>
where
    Id: quickcheck::Arbitrary,
{
    fn arbitrary(g: &mut quickcheck::Gen) -> Self {
        Self {
            previous: Option::arbitrary(g),
            next: Option::arbitrary(g),
        }
    }

    fn shrink(&self) -> Box<dyn Iterator<Item = Self>> {
        let next = self.next.clone();
        let previous = self.previous.clone();
        Box::new(
            self.previous
                .shrink()
                .map(move |previous| Self {
                    previous,
                    next: next.clone(),
                })
                .chain(self.next.shrink().map(move |next| Self {
                    previous: previous.clone(),
                    next,
                })),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_util::Item;

    #[test]
    fn order_key_rejects_non_finite() {
        assert_eq!(OrderKey::from_raw(1.5).map(|k| k.as_raw()), Some(1.5));
        assert!(OrderKey::from_raw(f64::NAN).is_none());
        assert!(OrderKey::from_raw(f64::INFINITY).is_none());
        assert!(OrderKey::from_raw(f64::NEG_INFINITY).is_none());
    }

    #[test]
    fn order_key_treats_signed_zeros_as_equal() {
        assert_eq!(OrderKey(-0.0), OrderKey(0.0));
        assert_eq!(OrderKey::from_raw(-0.0).map(|k| k.as_raw().to_bits()), Some(0));
        assert!(OrderKey(-1.0) < OrderKey(-0.5));
        assert!(OrderKey(-0.5) < OrderKey(-0.0));
    }

    #[test]
    fn signed_zeros_tie_break_by_id() {
        let mut items = vec![Item::new(2, -0.0), Item::new(1, 0.0), Item::new(3, -0.0)];
        apply_sort_order(&mut items);
        let ids: Vec<_> = items.iter().map(|item| item.id).collect();
        assert_eq!(ids, [1, 2, 3]);
    }

    #[test]
    fn sort_breaks_ties_by_id() {
        let mut items = vec![
            Item::new(3, 2.0),
            Item::new(2, 1.0),
            Item::new(1, 2.0),
            Item::new(0, 7.5),
        ];
        apply_sort_order(&mut items);
        let ids: Vec<_> = items.iter().map(Orderable::id).collect();
        assert_eq!(ids, [2, 1, 3, 0]);
    }

    #[test]
    fn between_debug() {
        assert_eq!(format!("{:?}", BetweenPosition::<u32>::default()), "between(_, _)");
        assert_eq!(format!("{:?}", BetweenPosition::after(4)), "between(4, _)");
        assert_eq!(format!("{:?}", BetweenPosition::before(4)), "between(_, 4)");
        assert_eq!(
            format!("{:?}", BetweenPosition::new(Some(1), Some(2))),
            "between(1, 2)"
        );
    }

    #[test]
    fn between_map_keeps_open_ends() {
        let anchor = BetweenPosition::before(Item::new(7, 1.0)).map(|item| item.id());
        assert_eq!(anchor, BetweenPosition::before(7));
        assert!(!anchor.is_unanchored());
        assert!(BetweenPosition::<u32>::default().is_unanchored());
    }
}
