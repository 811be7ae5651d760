// (c) Copyright 2025 Helsing GmbH. All rights reserved.
#![cfg_attr(not(target_os = "linux"), allow(dead_code, unused_imports))]

use iai_callgrind::{library_benchmark, library_benchmark_group, main};
use orderdiff::{
    BetweenPosition, OrderedCollection, Orderable,
    diff::{diff_orderable, recording::RecordingDiffApi},
    pick_order,
};
use rand::{SeedableRng, rngs::StdRng, seq::SliceRandom};
use std::hint::black_box;

#[derive(Clone, Debug, PartialEq)]
struct Row {
    id: u32,
    order: f64,
}

impl Orderable for Row {
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

fn row_id(row: &Row) -> u32 {
    row.id
}

fn setup_rows(n: u32) -> Vec<Row> {
    orderdiff::enable_determinism();
    (0..n)
        .map(|id| Row {
            id,
            order: f64::from(id) + 1.0,
        })
        .collect()
}

fn setup_shuffled(n: u32) -> (Vec<Row>, Vec<Row>) {
    let before = setup_rows(n);
    let mut after = before.clone();
    after.shuffle(&mut StdRng::seed_from_u64(7));
    (before, after)
}

#[library_benchmark]
#[bench::medium(setup_rows(255))]
fn pick_order_between(rows: Vec<Row>) {
    let rows = black_box(rows);
    let order = pick_order(&rows, Some(&BetweenPosition::new(Some(127), Some(128))));
    black_box(order);
}

#[library_benchmark]
#[bench::medium(setup_rows(255))]
fn pick_order_append(rows: Vec<Row>) {
    let rows = black_box(rows);
    black_box(pick_order(&rows, None));
}

#[library_benchmark]
#[bench::medium(setup_shuffled(255))]
fn diff_orderable_shuffled((before, after): (Vec<Row>, Vec<Row>)) {
    let (before, after) = black_box((before, after));
    let mut api = RecordingDiffApi::new(row_id);
    let changes = diff_orderable(&before, &after, &mut api);
    black_box((changes, api));
}

#[library_benchmark]
#[bench::medium(setup_shuffled(255))]
fn collection_sync_shuffled((before, after): (Vec<Row>, Vec<Row>)) {
    let mut collection = OrderedCollection::new(black_box(before));
    let changes = collection.sync(black_box(&after));
    black_box((changes, collection));
}

library_benchmark_group!(
    name = pick_orders;
    benchmarks = pick_order_between, pick_order_append
);
library_benchmark_group!(
    name = diffs;
    benchmarks = diff_orderable_shuffled, collection_sync_shuffled
);

#[cfg(target_os = "linux")]
main!(library_benchmark_groups = pick_orders, diffs);

#[cfg(not(target_os = "linux"))]
fn main() {}
