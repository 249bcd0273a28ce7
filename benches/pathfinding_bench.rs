//! Path planning and range query benchmarks
//!
//! Run with: `cargo bench`

use criterion::{black_box, criterion_group, criterion_main, Criterion};

use hex_skirmish::battle::{cells_within_range, compute_budget_limited_path, find_path, Cell, GridBounds};

fn pathfinding_benchmark(c: &mut Criterion) {
    let bounds = GridBounds::new(15, 12);

    c.bench_function("find_path corner to corner", |b| {
        b.iter(|| {
            find_path(
                black_box(&bounds),
                black_box(Cell::new(0, 0)),
                black_box(Cell::new(14, 11)),
                Some(Cell::new(7, 6)),
            )
        })
    });

    c.bench_function("budget path, goal out of reach", |b| {
        b.iter(|| {
            compute_budget_limited_path(
                black_box(&bounds),
                black_box(Cell::new(0, 6)),
                black_box(Cell::new(14, 6)),
                30,
                6.0,
                None,
            )
        })
    });

    // Goal is the blocked cell, so the search exhausts the grid
    c.bench_function("find_path to blocked goal", |b| {
        b.iter(|| {
            find_path(
                black_box(&bounds),
                black_box(Cell::new(0, 0)),
                black_box(Cell::new(10, 10)),
                Some(Cell::new(10, 10)),
            )
        })
    });
}

fn range_benchmark(c: &mut Criterion) {
    let bounds = GridBounds::new(15, 12);
    c.bench_function("cells_within_range r5", |b| {
        b.iter(|| cells_within_range(black_box(&bounds), black_box(Cell::new(7, 6)), 5))
    });
}

criterion_group!(benches, pathfinding_benchmark, range_benchmark);
criterion_main!(benches);
