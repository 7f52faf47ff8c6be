//! IAI-Callgrind benchmark for FixedIntMap operations.
//!
//! Measures instruction counts for insertion, lookup, removal and the
//! tombstone-heavy churn pattern.
//!
//! # Design Notes
//!
//! - Lookup and removal benchmarks build their map in a `#[bench::with_setup]`
//!   function so construction is not attributed to the measurement.
//! - The churn benchmark keeps a fixed set of live keys while cycling others
//!   through the table, which exercises tombstone reuse and in-place compaction.

use fixedmap::table::FixedIntMap;
use iai_callgrind::{library_benchmark, library_benchmark_group, main};
use std::hint::black_box;

fn setup_map_1000() -> FixedIntMap {
    (0..1000).map(|key| (key, key * 2)).collect()
}

fn setup_map_10000() -> FixedIntMap {
    (0..10000).map(|key| (key, key * 2)).collect()
}

#[library_benchmark]
fn insert_1000() -> FixedIntMap {
    let mut map = FixedIntMap::new();
    for key in 0..1000 {
        map.insert(black_box(key), black_box(key));
    }
    black_box(map)
}

#[library_benchmark]
fn insert_reserved_1000() -> FixedIntMap {
    let mut map = FixedIntMap::with_capacity(1000);
    for key in 0..1000 {
        map.insert(black_box(key), black_box(key));
    }
    black_box(map)
}

#[library_benchmark]
#[bench::with_setup(setup_map_1000())]
fn get_1000(map: FixedIntMap) -> u64 {
    let map = black_box(map);
    let mut sum = 0u64;
    for key in 0..1000 {
        if let Some(value) = map.get(black_box(key)) {
            sum = sum.wrapping_add(value);
        }
    }
    black_box(sum)
}

#[library_benchmark]
#[bench::with_setup(setup_map_10000())]
fn get_10000(map: FixedIntMap) -> u64 {
    let map = black_box(map);
    let mut sum = 0u64;
    for key in 0..10000 {
        if let Some(value) = map.get(black_box(key)) {
            sum = sum.wrapping_add(value);
        }
    }
    black_box(sum)
}

#[library_benchmark]
#[bench::with_setup(setup_map_1000())]
fn get_missing_1000(map: FixedIntMap) -> usize {
    let map = black_box(map);
    let missing = (1000..2000).filter(|key| !map.contains_key(black_box(*key))).count();
    black_box(missing)
}

#[library_benchmark]
#[bench::with_setup(setup_map_1000())]
fn remove_1000(map: FixedIntMap) -> FixedIntMap {
    let mut map = black_box(map);
    for key in 0..1000 {
        map.discard(black_box(key));
    }
    black_box(map)
}

#[library_benchmark]
#[bench::with_setup(setup_map_1000())]
fn churn_1000(map: FixedIntMap) -> FixedIntMap {
    let mut map = black_box(map);
    for key in 1000..11000 {
        map.insert(black_box(key), key);
        map.discard(black_box(key));
    }
    black_box(map)
}

library_benchmark_group!(
    name = fixed_int_map_group;
    benchmarks =
        insert_1000, insert_reserved_1000,
        get_1000, get_10000, get_missing_1000,
        remove_1000,
        churn_1000
);

main!(library_benchmark_groups = fixed_int_map_group);
