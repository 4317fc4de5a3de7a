//! Estimator benchmarks with 95% confidence intervals.
//!
//! Run with: cargo criterion
//! JSON output: cargo criterion --message-format json

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use sterad::geometry::DiscGeometry;
use sterad::propagate::{UncertaintyPropagator, WorkStealingPropagator};
use sterad::rng::McRng;
use sterad::sampler::sample_trial;
use sterad::simulate_solid_angle;

/// Single-trial throughput: one disc point, one direction, one
/// intercept test.
fn bench_sample_trial(c: &mut Criterion) {
    let mut group = c.benchmark_group("sampler");
    group.sample_size(100);
    group.confidence_level(0.95);

    let geom = DiscGeometry::new(2.5, 4.0, 13.0).unwrap();
    group.bench_function("sample_trial", |b| {
        let mut rng = McRng::new(42);
        b.iter(|| black_box(sample_trial(&geom, &mut rng)));
    });

    group.finish();
}

/// Single solid-angle estimate across sample counts.
fn bench_estimate(c: &mut Criterion) {
    let mut group = c.benchmark_group("estimator");
    group.sample_size(50);
    group.confidence_level(0.95);

    for num_samples in [1_000usize, 10_000].iter() {
        group.bench_with_input(
            BenchmarkId::new("simulate_solid_angle", num_samples),
            num_samples,
            |b, &num_samples| {
                let mut rng = McRng::new(42);
                b.iter(|| {
                    black_box(simulate_solid_angle(2.5, 4.0, 13.0, num_samples, &mut rng))
                });
            },
        );
    }

    group.finish();
}

/// Serial versus work-stealing propagation over the same workload.
fn bench_propagation(c: &mut Criterion) {
    let mut group = c.benchmark_group("propagation");
    group.sample_size(20);
    group.confidence_level(0.95);

    let geom = DiscGeometry::new(2.5, 4.0, 13.0).unwrap();

    group.bench_function("serial_20x2000", |b| {
        let propagator = UncertaintyPropagator::new(2_000, 20);
        let mut rng = McRng::new(42);
        b.iter(|| black_box(propagator.propagate(&geom, 0.5, &mut rng)));
    });

    group.bench_function("work_stealing_20x2000", |b| {
        let propagator = WorkStealingPropagator::new(2_000, 20);
        let mut rng = McRng::new(42);
        b.iter(|| black_box(propagator.propagate(&geom, 0.5, &mut rng)));
    });

    group.finish();
}

criterion_group!(benches, bench_sample_trial, bench_estimate, bench_propagation);
criterion_main!(benches);
