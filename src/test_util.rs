// (c) Copyright 2025 Helsing GmbH. All rights reserved.
//! Shared fixtures for unit tests.
use crate::position::Orderable;
use quickcheck::{Arbitrary, Gen};
use rand::{SeedableRng, rngs::StdRng, seq::SliceRandom};
use std::sync::Once;

/// A minimal orderable record.
#[derive(Clone, Debug, PartialEq)]
pub(crate) struct Item {
    pub id: u32,
    pub order: f64,
    pub label: &'static str,
}

impl Item {
    pub fn new(id: u32, order: f64) -> Self {
        Self {
            id,
            order,
            label: "",
        }
    }

    pub fn with_label(mut self, label: &'static str) -> Self {
        self.label = label;
        self
    }
}

impl Orderable for Item {
    type Id = u32;

    fn id(&self) -> u32 {
        self.id
    }

    fn order(&self) -> f64 {
        self.order
    }

    fn set_order(&mut self, order: f64) {
        self.order = order;
    }
}

/// Installs a `tracing` subscriber that writes through the test harness.
///
/// Filtering follows `RUST_LOG`; repeated calls are no-ops.
pub(crate) fn init_tracing() {
    static INIT: Once = Once::new();
    INIT.call_once(|| {
        let _ = tracing_subscriber::fmt()
            .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
            .with_test_writer()
            .try_init();
    });
}

/// Two arrangements of a collection sharing some ids.
///
/// `before` has distinct, increasing order keys (as a freshly loaded snapshot would). `after`
/// keeps a random subset of `before` in random order, mixed with fresh ids.
#[derive(Clone, Debug)]
pub(crate) struct Arrangements {
    pub before: Vec<Item>,
    pub after: Vec<Item>,
}

impl Arrangements {
    pub fn generate(g: &mut Gen, seed: u64) -> Self {
        let size = g.size().min(24);
        let before_len = usize::arbitrary(g) % (size + 1);
        let before: Vec<Item> = (0..before_len)
            .map(|i| Item::new(i as u32, i as f64 + 1.0))
            .collect();

        let mut after: Vec<Item> = before
            .iter()
            .filter(|_| u8::arbitrary(g) % 4 != 0)
            .cloned()
            .collect();
        let fresh = usize::arbitrary(g) % (size / 2 + 1);
        after.extend((0..fresh).map(|i| Item::new(1000 + i as u32, 0.0).with_label("fresh")));

        // mostly-sorted inputs hit the interesting stable-run cases more often than full
        // shuffles, so only shuffle a window some of the time.
        let mut rng = StdRng::seed_from_u64(seed);
        if bool::arbitrary(g) {
            after.shuffle(&mut rng);
        } else if after.len() > 1 {
            let start = usize::arbitrary(g) % after.len();
            let end = start + usize::arbitrary(g) % (after.len() - start) + 1;
            after[start..end].shuffle(&mut rng);
        }

        Self { before, after }
    }

    pub fn ids(items: &[Item]) -> Vec<u32> {
        items.iter().map(|item| item.id).collect()
    }
}

impl Arbitrary for Arrangements {
    fn arbitrary(g: &mut Gen) -> Self {
        let seed = u64::arbitrary(g);
        Self::generate(g, seed)
    }

    fn shrink(&self) -> Box<dyn Iterator<Item = Self>> {
        // drop one item from `after` at a time; `before` stays a valid snapshot.
        let this = self.clone();
        Box::new((0..self.after.len()).rev().map(move |skip| {
            let mut shrunk = this.clone();
            shrunk.after.remove(skip);
            shrunk
        }))
    }
}
