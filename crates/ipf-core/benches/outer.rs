use criterion::{BenchmarkId, Criterion, black_box, criterion_group, criterion_main};
use ipf_core::{Evaluation, PointGroup, Symmetry, Vector3d, VectorBatch};
use rand::SeedableRng;
use rand::rngs::SmallRng;

fn bench_dot_outer(c: &mut Criterion) {
    let mut rng = SmallRng::seed_from_u64(42);
    let a = Vector3d::random_unit(2_000, &mut rng);
    let b = Vector3d::random_unit(500, &mut rng);

    let mut group = c.benchmark_group("dot_outer");
    group.bench_function("eager", |bench| {
        bench.iter(|| a.dot_outer(black_box(&b), &Evaluation::Eager).unwrap())
    });
    for chunk in [20, 100, 500] {
        group.bench_with_input(BenchmarkId::new("chunked", chunk), &chunk, |bench, &chunk| {
            bench.iter(|| a.dot_outer(black_box(&b), &Evaluation::chunked(chunk)).unwrap())
        });
    }
    group.finish();
}

fn bench_reduce(c: &mut Criterion) {
    let mut rng = SmallRng::seed_from_u64(42);
    let v = Vector3d::random_unit(10_000, &mut rng);
    let oh = Symmetry::new(PointGroup::Oh);
    c.bench_function("in_fundamental_sector_oh", |bench| {
        bench.iter(|| v.in_fundamental_sector(black_box(&oh)).unwrap())
    });
}

criterion_group!(benches, bench_dot_outer, bench_reduce);
criterion_main!(benches);
