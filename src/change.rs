// (c) Copyright 2025 Helsing GmbH. All rights reserved.
//! Change records produced when a diff is applied to a collection.
//!
//! These are what gets appended to the replicated change log. They only ever carry concrete
//! order keys: anchors are resolved against the local snapshot before a record is produced, so
//! a replica receiving the record never needs to know what the anchor was.
use std::fmt;

/// One persisted mutation of an ordered collection.
#[derive(Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(::serde::Deserialize, ::serde::Serialize))]
pub enum Change<T, Id> {
    /// A new member, with its order key already assigned.
    Create { value: T },
    /// An existing member got a new order key.
    SetOrder { id: Id, order: f64 },
    /// An existing member's payload changed.
    Update { id: Id, before: T, after: T },
    /// A member was deleted.
    Delete { id: Id },
}

impl<T, Id> Change<T, Id> {
    /// Short name of the kind of change, for logging.
    pub fn kind(&self) -> &'static str {
        match self {
            Change::Create { .. } => "create",
            Change::SetOrder { .. } => "set-order",
            Change::Update { .. } => "update",
            Change::Delete { .. } => "delete",
        }
    }
}

impl<T, Id> fmt::Debug for Change<T, Id>
where
    T: fmt::Debug,
    Id: fmt::Debug,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Change::Create { value } => write!(f, "Create({value:?})"),
            Change::SetOrder { id, order } => write!(f, "SetOrder({id:?}, {order})"),
            Change::Update { id, .. } => write!(f, "Update({id:?})"),
            Change::Delete { id } => write!(f, "Delete({id:?})"),
        }
    }
}
