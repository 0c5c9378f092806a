//! Criterion benchmarks for walk steps and the inscribed-ball LP.
//!
//! Coordinate hit-and-run should scale with the constraint count only;
//! sphere hit-and-run pays an extra `A·d` product per step.

use criterion::{black_box, criterion_group, criterion_main, BatchSize, BenchmarkId, Criterion};
use polyvol::api::{
    compute_inner_ball, cross_polytope, cube, simplex, RandomSource, RandomWalkSampler, WalkKind,
    WalkState,
};

fn bench_walk_steps(c: &mut Criterion) {
    let mut group = c.benchmark_group("walk_100_steps");
    for &n in &[5usize, 10, 20, 40] {
        let p = simplex::<f64>(n).unwrap();
        let start = compute_inner_ball(&p).unwrap().center;
        for kind in [WalkKind::CoordinateHitAndRun, WalkKind::HitAndRun] {
            let sampler = RandomWalkSampler::new(&p, kind);
            let label = format!("{kind:?}");
            group.bench_with_input(BenchmarkId::new(label, n), &n, |b, _| {
                b.iter_batched(
                    || (WalkState::new(&p, start.clone()), RandomSource::seeded(n as u64)),
                    |(mut state, mut rng)| {
                        sampler.advance(None, &mut state, 100, &mut rng).unwrap();
                        black_box(state.into_point())
                    },
                    BatchSize::SmallInput,
                );
            });
        }
    }
    group.finish();
}

fn bench_inner_ball(c: &mut Criterion) {
    let mut group = c.benchmark_group("inner_ball");
    for &n in &[10usize, 30, 50] {
        let p = cube::<f64>(n, 1.0).unwrap();
        group.bench_with_input(BenchmarkId::new("cube", n), &p, |b, p| {
            b.iter(|| black_box(compute_inner_ball(p).unwrap()));
        });
    }
    let cross = cross_polytope::<f64>(8).unwrap();
    group.bench_function(BenchmarkId::new("cross", 8), |b| {
        b.iter(|| black_box(compute_inner_ball(&cross).unwrap()));
    });
    group.finish();
}

criterion_group!(benches, bench_walk_steps, bench_inner_ball);
criterion_main!(benches);
