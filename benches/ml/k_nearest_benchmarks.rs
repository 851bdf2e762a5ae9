use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use knn::{Dataset, KNNClassifier};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

const FEATURES: usize = 4;
const CLASSES: i32 = 3;

fn generate_dataset(size: usize, seed: u64) -> Dataset {
    let mut rng = StdRng::seed_from_u64(seed);
    let mut dataset = Dataset::new();
    for _ in 0..size {
        let label = rng.gen_range(0..CLASSES);
        let features = (0..FEATURES)
            .map(|_| label as f64 * 2.0 + rng.gen::<f64>())
            .collect();
        dataset.add_example(label, features).unwrap();
    }
    dataset
}

fn bench_classify_single(c: &mut Criterion) {
    let mut group = c.benchmark_group("knn_classify_single");
    let query = vec![2.5; FEATURES];

    for size in [100, 1_000, 10_000].iter() {
        let training = generate_dataset(*size, 42);
        let classifier = KNNClassifier::new(5, &training).unwrap();

        group.bench_with_input(BenchmarkId::from_parameter(size), size, |b, _| {
            b.iter(|| classifier.classify(black_box(&query)).unwrap())
        });
    }
    group.finish();
}

fn bench_train_test_cycle(c: &mut Criterion) {
    let mut group = c.benchmark_group("knn_train_test_cycle");

    for size in [150, 1_000].iter() {
        let dataset = generate_dataset(*size, 7);
        let training_size = size / 2;

        group.bench_with_input(BenchmarkId::from_parameter(size), size, |b, _| {
            let mut rng = StdRng::seed_from_u64(1);
            b.iter(|| {
                dataset
                    .classify_with_rng(black_box(3), training_size, &mut rng)
                    .unwrap()
            })
        });
    }
    group.finish();
}

criterion_group!(benches, bench_classify_single, bench_train_test_cycle);
criterion_main!(benches);
