//! Benchmarks for single and batch productivity evaluation
use std::hint::black_box;

use agrofuzz::{evaluate_batch, BatchConfig, Observation, ProductivityModel};
use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};

fn observations(rows: usize) -> Vec<Observation> {
    (0..rows)
        .map(|i| {
            let t = (i % 97) as f64 / 96.0;
            Observation::new(4.0 + 46.0 * t, 5.0 + 3.0 * (1.0 - t), 0.5 + 0.4 * t)
        })
        .collect()
}

// ===== Single Observation =====

fn bench_evaluate(c: &mut Criterion) {
    let model = ProductivityModel::new().unwrap();

    c.bench_function("evaluate_reference_sample", |b| {
        b.iter(|| {
            model
                .evaluate(black_box(6.0), black_box(7.6), black_box(0.639306))
                .unwrap()
        });
    });

    c.bench_function("model_construction", |b| {
        b.iter(|| ProductivityModel::new().unwrap());
    });
}

// ===== Batch Evaluation =====

fn bench_batch(c: &mut Criterion) {
    let mut group = c.benchmark_group("evaluate_batch");
    let model = ProductivityModel::new().unwrap();

    for rows in [100, 1_000, 10_000] {
        let data = observations(rows);
        group.throughput(Throughput::Elements(rows as u64));

        group.bench_with_input(BenchmarkId::new("sequential", rows), &data, |b, data| {
            let config = BatchConfig::sequential();
            b.iter(|| evaluate_batch(&model, black_box(data), &config).unwrap());
        });

        group.bench_with_input(BenchmarkId::new("parallel", rows), &data, |b, data| {
            let config = BatchConfig::default().with_min_parallel_rows(1);
            b.iter(|| evaluate_batch(&model, black_box(data), &config).unwrap());
        });
    }

    group.finish();
}

criterion_group!(benches, bench_evaluate, bench_batch);
criterion_main!(benches);
