//! Criterion benchmarks for progress tracking and whole runs.

use std::sync::Arc;

use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion};

use multifit_core::options::RunOptions;
use multifit_core::registry::{DefaultFactory, ModelerFactory};
use multifit_core::series::Series;
use multifit_orchestration::interfaces::NullReporter;
use multifit_orchestration::orchestrator::run_fit_predict;
use multifit_orchestration::tracker::ProgressTracker;

#[allow(clippy::cast_precision_loss)]
fn input(groups: usize, len: usize) -> Vec<Series> {
    (0..groups)
        .map(|g| {
            let values = (0..len).map(|t| ((g + t) % 13) as f64).collect();
            Series::new(format!("item_{g}"), values)
        })
        .collect()
}

fn bench_record_completion(c: &mut Criterion) {
    let mut group = c.benchmark_group("record_completion");
    for &workers in &[1usize, 4, 16] {
        group.bench_with_input(BenchmarkId::from_parameter(workers), &workers, |b, &workers| {
            b.iter(|| {
                let tracker = ProgressTracker::new(vec![256; workers], Arc::new(NullReporter));
                for job in 0..256 {
                    for slot in 0..workers {
                        tracker.record_completion(slot, job).unwrap();
                    }
                }
            });
        });
    }
    group.finish();
}

fn bench_run(c: &mut Criterion) {
    let factory = DefaultFactory::new();
    let modeler = factory.get("ses").unwrap();
    let series = input(512, 200);

    let mut group = c.benchmark_group("run_fit_predict");
    for &workers in &[1usize, 4] {
        let opts = RunOptions {
            workers,
            ..Default::default()
        };
        group.bench_with_input(BenchmarkId::from_parameter(workers), &workers, |b, _| {
            b.iter(|| {
                run_fit_predict(series.clone(), modeler.as_ref(), &opts, Arc::new(NullReporter))
                    .unwrap()
            });
        });
    }
    group.finish();
}

criterion_group!(benches, bench_record_completion, bench_run);
criterion_main!(benches);
