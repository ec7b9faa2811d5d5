//! Benchmarks for group index rebuilds and window decisions.
//!
//! Run with: `cargo bench --package bufferlist --bench group_index_bench`
//!
//! A rebuild is O(n) and runs on every membership change of a grouped store,
//! so it bounds how large a grouped list can get before store edits stutter.
//! Decisions run on every scroll tick and must stay allocation-free.

use bufferlist::window::decide;
use bufferlist::{GroupIndex, ListConfig, ScrollDirection, ScrollSnapshot, VecStore, Window};
use criterion::{BenchmarkId, Criterion, Throughput, criterion_group, criterion_main};
use std::hint::black_box;

// ============================================================================
// Data
// ============================================================================

/// Surname-like records, sorted, so groups are contiguous.
fn contacts(n: usize) -> VecStore<String> {
    let mut names: Vec<String> = (0..n)
        .map(|i| {
            let letter = char::from(b'A' + (i * 7 % 26) as u8);
            format!("{letter}{i:07}")
        })
        .collect();
    names.sort();
    VecStore::new(names).with_grouper(|name: &String| name[..1].to_string())
}

fn alphabet() -> Vec<String> {
    ('A'..='Z').map(String::from).collect()
}

// ============================================================================
// Benchmarks
// ============================================================================

fn bench_rebuild(c: &mut Criterion) {
    let mut group = c.benchmark_group("group_index_rebuild");
    let symbols = alphabet();
    for size in [1_000usize, 10_000, 100_000] {
        let store = contacts(size);
        group.throughput(Throughput::Elements(size as u64));
        group.bench_with_input(BenchmarkId::new("groups_only", size), &store, |b, store| {
            b.iter(|| black_box(GroupIndex::build(store, &[])));
        });
        group.bench_with_input(BenchmarkId::new("with_jump", size), &store, |b, store| {
            b.iter(|| black_box(GroupIndex::build(store, &symbols)));
        });
    }
    group.finish();
}

fn bench_lookup(c: &mut Criterion) {
    let store = contacts(100_000);
    let index = GroupIndex::build(&store, &alphabet());
    let mut group = c.benchmark_group("group_index_lookup");
    group.bench_function("previous_group", |b| {
        b.iter(|| black_box(index.previous_group(black_box("M"))));
    });
    group.bench_function("group_containing", |b| {
        b.iter(|| black_box(index.group_containing(black_box(73_210))));
    });
    group.finish();
}

fn bench_decide(c: &mut Criterion) {
    let config = ListConfig::default();
    let snapshot = ScrollSnapshot {
        position: 42_500,
        viewport_height: 600,
        content_height: 4_250,
        top_proxy: 42_415,
    };
    c.bench_function("window_decide", |b| {
        b.iter(|| {
            black_box(decide(
                black_box(Some(Window::new(499, 548))),
                1_000,
                black_box(&snapshot),
                ScrollDirection::Down,
                &config,
            ))
        });
    });
}

criterion_group!(benches, bench_rebuild, bench_lookup, bench_decide);
criterion_main!(benches);
