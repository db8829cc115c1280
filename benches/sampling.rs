use criterion::{black_box, criterion_group, criterion_main, Criterion};
use junban::permutation::{random_permutation_with_rng, sorted_by};
use junban::{permuted_systematic_sample_with_rng, systematic_sample_with_rng, IdentityWeight};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

fn weights(size: usize) -> Vec<f64> {
    let mut rng = StdRng::seed_from_u64(7);
    (0..size).map(|_| rng.random::<f64>()).collect()
}

fn bench_random_permutation(c: &mut Criterion) {
    let mut group = c.benchmark_group("random_permutation");

    let sizes = [1_000, 10_000, 100_000];
    let k = 100;
    let mut rng = StdRng::seed_from_u64(42);

    for &size in &sizes {
        let data: Vec<u32> = (0..size as u32).collect();
        group.bench_function(format!("full_n{}", size), |b| {
            b.iter(|| {
                let it = random_permutation_with_rng(black_box(&data), None, &mut rng);
                black_box(it.map(|it| it.len()).ok());
            })
        });
        group.bench_function(format!("partial_n{}_k{}", size, k), |b| {
            b.iter(|| {
                let it = random_permutation_with_rng(black_box(&data), Some(k), &mut rng);
                black_box(it.map(|it| it.len()).ok());
            })
        });
    }
    group.finish();
}

fn bench_sorted(c: &mut Criterion) {
    let mut group = c.benchmark_group("sorted");
    let sizes = [1_000, 100_000];
    let k = 10;

    for &size in &sizes {
        let data = weights(size);
        group.bench_function(format!("full_n{}", size), |b| {
            b.iter(|| {
                let it = sorted_by(black_box(&data), None, |a, b| a.total_cmp(b));
                black_box(it.map(|it| it.len()).ok());
            })
        });
        // Partial sort should stay close to linear.
        group.bench_function(format!("top{}_n{}", k, size), |b| {
            b.iter(|| {
                let it = sorted_by(black_box(&data), Some(k), |a, b| b.total_cmp(a));
                black_box(it.map(|it| it.len()).ok());
            })
        });
    }
    group.finish();
}

fn bench_systematic(c: &mut Criterion) {
    let mut group = c.benchmark_group("systematic");
    let sizes = [1_000, 100_000];
    let mut rng = StdRng::seed_from_u64(3);

    for &size in &sizes {
        let data = weights(size);
        let total: f64 = data.iter().sum();
        group.bench_function(format!("resample_n{}", size), |b| {
            b.iter(|| {
                let sample = systematic_sample_with_rng(
                    black_box(&data),
                    size,
                    total,
                    IdentityWeight,
                    &mut rng,
                );
                black_box(sample.count());
            })
        });
        group.bench_function(format!("permuted_resample_n{}", size), |b| {
            b.iter(|| {
                let sample = permuted_systematic_sample_with_rng(
                    black_box(&data),
                    size,
                    total,
                    IdentityWeight,
                    &mut rng,
                );
                black_box(sample.count());
            })
        });
    }
    group.finish();
}

criterion_group!(benches, bench_random_permutation, bench_sorted, bench_systematic);
criterion_main!(benches);
