//! Criterion benchmarks for the multi-index.

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use rand::Rng;

use multi_index::{
    Criteria, CriteriaType, KeyCriteria, KeyValueIndexing, MultiIndex, NestedIndex,
    PredicateCriteria, Results,
};

const REGION: CriteriaType = CriteriaType::new("region");
const STATUS: CriteriaType = CriteriaType::new("status");

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
struct Order {
    id: u64,
    region: u16,
    status: u8,
}

fn region_indexing() -> KeyValueIndexing<u16, Order> {
    KeyValueIndexing::single(REGION, |o: &Order| o.region)
}

fn nested_region_indexing() -> KeyValueIndexing<u16, Order> {
    region_indexing().with_factory(|| {
        Box::new(NestedIndex::new(KeyValueIndexing::single(
            STATUS,
            |o: &Order| o.status,
        )))
    })
}

/// Random orders spread over 500 regions and 8 statuses.
fn make_orders(count: u64) -> Vec<Order> {
    let mut rng = rand::thread_rng();
    (0..count)
        .map(|id| Order {
            id,
            region: rng.gen_range(0..500),
            status: rng.gen_range(0..8),
        })
        .collect()
}

fn make_index(orders: &[Order], nested: bool) -> MultiIndex<Order> {
    let mut index = MultiIndex::new();
    if nested {
        index.add_index(nested_region_indexing());
    } else {
        index.add_index(region_indexing());
    }
    index.add_all(orders.iter().cloned());
    index
}

fn bench_add(c: &mut Criterion) {
    let orders = make_orders(100_000);

    c.bench_function("add_100k_indexed", |b| {
        b.iter(|| black_box(make_index(&orders, false)))
    });
}

fn bench_indexed_vs_scan(c: &mut Criterion) {
    let orders = make_orders(100_000);
    let indexed = make_index(&orders, false);
    let unindexed: MultiIndex<Order> = {
        let mut index = MultiIndex::new();
        index.add_all(orders.iter().cloned());
        index
    };
    let region = region_indexing().criteria(vec![42]);
    let criteria: [&dyn Criteria<Order>; 1] = [&region];

    c.bench_function("query_indexed_100k", |b| {
        b.iter(|| black_box(indexed.get_matches(&criteria, 100).size()))
    });

    c.bench_function("query_full_scan_100k", |b| {
        b.iter(|| black_box(unindexed.get_matches(&criteria, 100).size()))
    });
}

fn bench_nested_descent(c: &mut Criterion) {
    let orders = make_orders(100_000);
    let flat = make_index(&orders, false);
    let nested = make_index(&orders, true);
    let region = region_indexing().criteria(vec![42]);
    let status = KeyCriteria::new(STATUS, vec![3u8], |o: &Order| vec![o.status]);
    let criteria: [&dyn Criteria<Order>; 2] = [&region, &status];

    c.bench_function("query_two_criteria_flat_100k", |b| {
        b.iter(|| black_box(flat.get_matches(&criteria, 100).size()))
    });

    c.bench_function("query_two_criteria_nested_100k", |b| {
        b.iter(|| black_box(nested.get_matches(&criteria, 100).size()))
    });
}

fn bench_paginate(c: &mut Criterion) {
    let orders = make_orders(100_000);
    let index = make_index(&orders, false);
    let even = PredicateCriteria::new(STATUS, |o: &Order| o.id % 2 == 0);
    let criteria: [&dyn Criteria<Order>; 1] = [&even];

    c.bench_function("read_to_end_from_budget_10", |b| {
        b.iter(|| {
            let mut results = index.get_matches(&criteria, 10);
            let last = results.size().saturating_sub(1);
            black_box(results.read_to(last))
        })
    });
}

criterion_group!(
    benches,
    bench_add,
    bench_indexed_vs_scan,
    bench_nested_descent,
    bench_paginate,
);
criterion_main!(benches);
