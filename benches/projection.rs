//! Grid projection with and without the RA-reuse cache

use criterion::{black_box, criterion_group, criterion_main, Criterion};

use skychart::config::GridSpacing;
use skychart::pipeline::grid::grid_lines;
use skychart::projection::CachedProjector;
use skychart::{Coordinate, SphereTransform};

/// Every meridian sampled at 1° Dec, RA-major like the grid pass
fn meridian_samples() -> Vec<(f64, f64)> {
    (0..360)
        .flat_map(|ra| (-90..=90).map(move |dec| (ra as f64, dec as f64)))
        .collect()
}

fn benchmarks(c: &mut Criterion) {
    let transform = SphereTransform::new(30.0, 0.0, 80.0, 60.0, 400.0).unwrap();
    let samples = meridian_samples();

    c.bench_function("meridians_uncached", |b| {
        b.iter(|| {
            for &(ra, dec) in &samples {
                let coord = Coordinate::from_degrees(ra, dec).unwrap();
                black_box(transform.project_coordinate(&coord));
            }
        })
    });

    c.bench_function("meridians_cached", |b| {
        b.iter(|| {
            let mut projector = CachedProjector::new(&transform);
            for &(ra, dec) in &samples {
                black_box(projector.project_degrees(ra, dec).unwrap());
            }
        })
    });

    c.bench_function("grid_lines", |b| {
        b.iter(|| black_box(grid_lines(&transform, &GridSpacing::default()).unwrap()))
    });
}

criterion_group!(benches, benchmarks);
criterion_main!(benches);
