// (c) Copyright 2025 Helsing GmbH. All rights reserved.
//! Fractional order-key assignment.
//!
//! [`pick_order`] is resolved against whatever snapshot of siblings the caller currently has.
//! Under eventual consistency that snapshot may disagree with the one the anchor was computed
//! from: anchors may have been deleted, or reordered so that `previous` now sorts after `next`.
//! The picker always returns a usable key anyway, preferring availability over strictness.
use crate::position::{BetweenPosition, Orderable};
use tracing::debug;

/// Computes the order key for a new (or moved) item given its siblings and an optional anchor.
///
/// - No anchor, or an unanchored one: one past the largest sibling key (`1.0` without siblings).
/// - Both anchors found and correctly ordered: their midpoint.
/// - Both anchors found but inverted: one past `previous`, ignoring `next`.
/// - Only `previous` found: one past it. Only `next` found: one before it.
/// - Neither found: append, as if there had been no anchor at all.
///
/// ```rust
/// # use orderdiff::{BetweenPosition, Orderable, pick_order};
/// # #[derive(Clone)]
/// # struct Example { id: u8, order: f64 }
/// # impl Orderable for Example {
/// #     type Id = u8;
/// #     fn id(&self) -> u8 { self.id }
/// #     fn order(&self) -> f64 { self.order }
/// #     fn set_order(&mut self, order: f64) { self.order = order }
/// # }
/// let siblings = [Example { id: 1, order: 1.0 }, Example { id: 2, order: 2.0 }];
/// assert_eq!(pick_order(&siblings, None), 3.0);
/// assert_eq!(pick_order(&siblings, Some(&BetweenPosition::new(Some(1), Some(2)))), 1.5);
/// assert_eq!(pick_order(&siblings, Some(&BetweenPosition::before(1))), 0.0);
/// ```
pub fn pick_order<'a, T, I>(siblings: I, between: Option<&BetweenPosition<T::Id>>) -> f64
where
    T: Orderable + 'a,
    I: IntoIterator<Item = &'a T>,
{
    let Some(between) = between.filter(|b| !b.is_unanchored()) else {
        return append_order(siblings);
    };

    let mut before = None;
    let mut after = None;
    let mut max = None::<f64>;
    for sibling in siblings {
        let order = sibling.order();
        max = Some(max.map_or(order, |m| m.max(order)));
        let id = sibling.id();
        if before.is_none() && between.previous.as_ref() == Some(&id) {
            before = Some(order);
        }
        if after.is_none() && between.next.as_ref() == Some(&id) {
            after = Some(order);
        }
    }

    match (before, after) {
        (Some(before), Some(after)) if before < after => (before + after) / 2.0,
        (Some(before), Some(after)) => {
            debug!(
                ?between,
                before, after, "anchors are inverted; placing after previous"
            );
            before + 1.0
        }
        (Some(before), None) => before + 1.0,
        (None, Some(after)) => after - 1.0,
        (None, None) => {
            debug!(?between, "no anchor found among siblings; appending");
            max.unwrap_or(0.0) + 1.0
        }
    }
}

fn append_order<'a, T, I>(siblings: I) -> f64
where
    T: Orderable + 'a,
    I: IntoIterator<Item = &'a T>,
{
    siblings
        .into_iter()
        .map(Orderable::order)
        .reduce(f64::max)
        .unwrap_or(0.0)
        + 1.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_util::Item;
    use quickcheck::TestResult;

    fn siblings() -> Vec<Item> {
        vec![Item::new(1, 1.0), Item::new(2, 2.0), Item::new(3, 3.0)]
    }

    #[test]
    fn appends_without_anchor() {
        assert_eq!(pick_order(&siblings(), None), 4.0);
        assert_eq!(pick_order(&siblings(), Some(&BetweenPosition::default())), 4.0);
    }

    #[test]
    fn first_item_gets_one() {
        assert_eq!(pick_order::<Item, _>(&[], None), 1.0);
    }

    #[test]
    fn appends_after_negative_keys() {
        let siblings = [Item::new(1, -4.0), Item::new(2, -2.5)];
        assert_eq!(pick_order(&siblings, None), -1.5);
    }

    #[test]
    fn midpoint_between_anchors() {
        let between = BetweenPosition::new(Some(2), Some(3));
        assert_eq!(pick_order(&siblings(), Some(&between)), 2.5);
    }

    #[test]
    fn only_previous() {
        assert_eq!(pick_order(&siblings(), Some(&BetweenPosition::after(1))), 2.0);
    }

    #[test]
    fn only_next() {
        assert_eq!(pick_order(&siblings(), Some(&BetweenPosition::before(1))), 0.0);
    }

    #[test]
    fn inverted_anchors_favour_previous() {
        let between = BetweenPosition::new(Some(3), Some(1));
        assert_eq!(pick_order(&siblings(), Some(&between)), 4.0);
    }

    #[test]
    fn equal_anchors_favour_previous() {
        let siblings = [Item::new(1, 2.0), Item::new(2, 2.0)];
        let between = BetweenPosition::new(Some(1), Some(2));
        assert_eq!(pick_order(&siblings, Some(&between)), 3.0);
    }

    #[test]
    fn deleted_previous_uses_next() {
        let between = BetweenPosition::new(Some(42), Some(2));
        assert_eq!(pick_order(&siblings(), Some(&between)), 1.0);
    }

    #[test]
    fn deleted_next_uses_previous() {
        let between = BetweenPosition::new(Some(2), Some(42));
        assert_eq!(pick_order(&siblings(), Some(&between)), 3.0);
    }

    #[test]
    fn both_deleted_appends() {
        let between = BetweenPosition::new(Some(41), Some(42));
        assert_eq!(pick_order(&siblings(), Some(&between)), 4.0);
        assert_eq!(pick_order::<Item, _>(&[], Some(&between)), 1.0);
    }

    #[quickcheck]
    fn append_is_greater_than_all(orders: Vec<i32>) -> bool {
        let siblings: Vec<_> = orders
            .iter()
            .zip(0..)
            .map(|(&order, id)| Item::new(id, f64::from(order)))
            .collect();
        let picked = pick_order(&siblings, None);
        siblings.iter().all(|s| s.order < picked)
    }

    #[quickcheck]
    fn midpoint_is_strictly_between(a: i32, b: i32) -> TestResult {
        if a == b {
            return TestResult::discard();
        }
        let (lo, hi) = (f64::from(a.min(b)), f64::from(a.max(b)));
        let siblings = [Item::new(1, lo), Item::new(2, hi)];
        let picked = pick_order(&siblings, Some(&BetweenPosition::new(Some(1), Some(2))));
        TestResult::from_bool(lo < picked && picked < hi)
    }

    #[quickcheck]
    fn any_anchor_yields_a_finite_key(orders: Vec<i16>, between: BetweenPosition<u8>) -> bool {
        let siblings: Vec<_> = orders
            .iter()
            .zip(0..)
            .map(|(&order, id)| Item::new(id, f64::from(order)))
            .collect();
        let between = between.map(u32::from);
        pick_order(&siblings, Some(&between)).is_finite()
    }
}
