use criterion::{black_box, criterion_group, criterion_main, Criterion};
use glam::Vec3;
use lattice::{Bounds, SpatialHashGrid};

/// Deterministic pseudo-positions without pulling an RNG into the bench.
fn scatter(i: u32) -> Vec3 {
    let f = i as f32;
    Vec3::new(
        (f * 37.0) % 1000.0 - 500.0,
        (f * 91.0) % 1000.0 - 500.0,
        (f * 53.0) % 400.0 - 200.0,
    )
}

fn bench_insert_10k(c: &mut Criterion) {
    c.bench_function("grid_insert_10k", |b| {
        b.iter(|| {
            let mut grid: SpatialHashGrid<u32> = SpatialHashGrid::new(32.0);
            for i in 0..10_000 {
                grid.insert(i, scatter(i));
            }
            black_box(grid.len())
        });
    });
}

fn bench_update_churn(c: &mut Criterion) {
    // Most per-tick updates stay inside their cell; measure that fast path
    // mixed with occasional cell crossings.
    let mut grid: SpatialHashGrid<u32> = SpatialHashGrid::new(32.0);
    for i in 0..10_000 {
        grid.insert(i, scatter(i));
    }

    c.bench_function("grid_update_churn_10k", |b| {
        let mut offset = 0.0f32;
        b.iter(|| {
            offset += 1.5;
            for i in 0..10_000 {
                grid.update(i, scatter(i) + Vec3::new(offset % 48.0, 0.0, 0.0));
            }
            black_box(grid.cell_count())
        });
    });
}

fn bench_query_radius(c: &mut Criterion) {
    let mut grid: SpatialHashGrid<u32> = SpatialHashGrid::new(32.0);
    for i in 0..10_000 {
        grid.insert(i, scatter(i));
    }

    c.bench_function("grid_query_radius_40", |b| {
        b.iter(|| black_box(grid.query_radius(black_box(Vec3::ZERO), black_box(40.0))));
    });
}

fn bench_query_aabb(c: &mut Criterion) {
    let mut grid: SpatialHashGrid<u32> = SpatialHashGrid::new(32.0);
    for i in 0..10_000 {
        grid.insert(i, scatter(i));
    }
    let volume = Bounds::around_sphere(Vec3::ZERO, 40.0);

    c.bench_function("grid_query_aabb_80", |b| {
        b.iter(|| black_box(grid.query_aabb(black_box(volume.min), black_box(volume.max))));
    });
}

criterion_group!(
    benches,
    bench_insert_10k,
    bench_update_churn,
    bench_query_radius,
    bench_query_aabb
);
criterion_main!(benches);
