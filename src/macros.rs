// (c) Copyright 2025 Helsing GmbH. All rights reserved.
/// Convenience macro for creating anchors.
///
/// Use `_` for an open end, mirroring how anchors are printed.
///
/// ```rust
/// # use orderdiff::{BetweenPosition, between};
/// assert_eq!(between!(1, 2), BetweenPosition::new(Some(1), Some(2)));
/// assert_eq!(between!(_, 2), BetweenPosition::before(2));
/// assert_eq!(between!(1, _), BetweenPosition::after(1));
/// let open: BetweenPosition<u32> = between!(_, _);
/// assert!(open.is_unanchored());
/// ```
#[macro_export]
macro_rules! between {
    (_, _) => {
        $crate::BetweenPosition::new(None, None)
    };
    (_, $next:expr) => {
        $crate::BetweenPosition::new(None, Some($next))
    };
    ($previous:expr, _) => {
        $crate::BetweenPosition::new(Some($previous), None)
    };
    ($previous:expr, $next:expr) => {
        $crate::BetweenPosition::new(Some($previous), Some($next))
    };
}

/// Convenience macro for building the operation list a diff is expected to emit.
///
/// NOTE! This is mostly useful for tests. Values stand in for themselves, so it pairs with a
/// recorder that identifies items by value.
///
/// ```rust
/// # use orderdiff::{CollectionDiffOperation, operations};
/// let ops: Vec<CollectionDiffOperation<u32, u32>> = operations![
///     Remove(3),
///     Add(4, (_, 1)),
///     Move(1, (4, _)),
/// ];
/// assert_eq!(
///     format!("{ops:?}"),
///     "[Remove(3), Add(4, between(_, 1)), Move(1, between(4, _))]"
/// );
/// ```
#[macro_export]
macro_rules! operations {
    (@op Remove($value:expr)) => {
        $crate::CollectionDiffOperation::remove($value)
    };
    (@op Add($value:expr, ($($between:tt)*))) => {
        $crate::CollectionDiffOperation::add($value, $crate::between!($($between)*))
    };
    (@op Move($value:expr, ($($between:tt)*))) => {
        $crate::CollectionDiffOperation::mv($value, $crate::between!($($between)*))
    };
    ($($kind:ident ( $($args:tt)* )),* $(,)?) => {
        vec![$( $crate::operations!(@op $kind($($args)*)) ),*]
    };
}

#[cfg(test)]
mod tests {
    use crate::{BetweenPosition, CollectionDiffOperation};

    #[test]
    fn between_open_ends() {
        let open: BetweenPosition<u32> = between!(_, _);
        assert!(open.is_unanchored());
        assert_eq!(between!(1 + 1, _).previous, Some(2));
        assert_eq!(format!("{:?}", between!("a", "b")), "between(\"a\", \"b\")");
    }

    #[test]
    fn operations_literal() {
        let ops: Vec<CollectionDiffOperation<u32, u32>> =
            operations![Add(2, (_, 1)), Move(1, (2, 3)), Remove(4)];
        assert_eq!(
            ops,
            vec![
                CollectionDiffOperation::add(2, BetweenPosition::before(1)),
                CollectionDiffOperation::mv(1, BetweenPosition::new(Some(2), Some(3))),
                CollectionDiffOperation::remove(4),
            ]
        );
        let none: Vec<CollectionDiffOperation<u32, u32>> = operations![];
        assert!(none.is_empty());
    }
}
