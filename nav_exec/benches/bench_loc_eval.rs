use criterion::{black_box, criterion_group, criterion_main, Criterion};
use nalgebra::{Vector2, Vector3};

use nav_lib::nav::loc_eval::nearest_point;

fn bench_nearest_point(c: &mut Criterion) {
    // A reference trajectory of 10k points along a spiral
    let refs: Vec<Vector3<f64>> = (0..10_000)
        .map(|i| {
            let t = i as f64 * 0.01;
            Vector3::new(t * t.cos(), t * t.sin(), 0.0)
        })
        .collect();

    let position = Vector2::new(12.3, -45.6);

    c.bench_function("nearest_point_10k", |b| {
        b.iter(|| nearest_point(black_box(&refs), black_box(position)))
    });
}

criterion_group!(benches, bench_nearest_point);
criterion_main!(benches);
