// (c) Copyright 2025 Helsing GmbH. All rights reserved.
use crate::position::BetweenPosition;
use std::fmt;

/// The structural kind of a [`CollectionDiffOperation`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(::serde::Deserialize, ::serde::Serialize))]
pub enum PositionDiffKind {
    Add,
    Remove,
    Move,
}

/// One structural step of an ordered diff.
///
/// `between` is `Some` for [`PositionDiffKind::Add`] and [`PositionDiffKind::Move`] and `None`
/// for [`PositionDiffKind::Remove`]. A sequence of operations is only meaningful in the order
/// it was produced in: anchors may refer to items placed by earlier operations.
#[derive(Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(::serde::Deserialize, ::serde::Serialize))]
pub struct CollectionDiffOperation<V, Id> {
    pub value: V,
    pub kind: PositionDiffKind,
    pub between: Option<BetweenPosition<Id>>,
}

impl<V, Id> CollectionDiffOperation<V, Id> {
    pub fn add(value: V, between: BetweenPosition<Id>) -> Self {
        Self {
            value,
            kind: PositionDiffKind::Add,
            between: Some(between),
        }
    }

    pub fn remove(value: V) -> Self {
        Self {
            value,
            kind: PositionDiffKind::Remove,
            between: None,
        }
    }

    pub fn mv(value: V, between: BetweenPosition<Id>) -> Self {
        Self {
            value,
            kind: PositionDiffKind::Move,
            between: Some(between),
        }
    }

    /// Maps the carried value, keeping kind and anchor.
    pub fn map_value<U>(self, f: impl FnOnce(V) -> U) -> CollectionDiffOperation<U, Id> {
        CollectionDiffOperation {
            value: f(self.value),
            kind: self.kind,
            between: self.between,
        }
    }
}

// renders as `Move(v1, between(v2, _))`, which is what the tests compare against.
impl<V, Id> fmt::Debug for CollectionDiffOperation<V, Id>
where
    V: fmt::Debug,
    Id: fmt::Debug,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}({:?}", self.kind, self.value)?;
        if let Some(between) = &self.between {
            write!(f, ", {between:?}")?;
        }
        write!(f, ")")
    }
}
