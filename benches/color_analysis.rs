use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use image::{Rgb, RgbImage};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use tone_sort::{AdaptiveClusterer, FeatureExtractor, ImageSignature, SimilarityCalculator};

fn noise(width: u32, height: u32, seed: u64) -> RgbImage {
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    let mut image = RgbImage::new(width, height);
    for pixel in image.pixels_mut() {
        *pixel = Rgb([rng.gen(), rng.gen(), rng.gen()]);
    }
    image
}

fn signatures(count: u64) -> Vec<ImageSignature> {
    let extractor = FeatureExtractor::new();
    (0..count)
        .map(|seed| {
            extractor
                .extract_rgb(format!("bench-{seed}"), &noise(64, 64, seed))
                .expect("synthetic image")
        })
        .collect()
}

fn benchmark_extraction(c: &mut Criterion) {
    let extractor = FeatureExtractor::new();
    let mut group = c.benchmark_group("extract_rgb");
    for size in [200u32, 1024] {
        let image = noise(size, size, 7);
        group.bench_with_input(BenchmarkId::from_parameter(size), &image, |b, image| {
            b.iter(|| extractor.extract_rgb("bench", black_box(image)))
        });
    }
    group.finish();
}

fn benchmark_distance_matrix(c: &mut Criterion) {
    let calculator = SimilarityCalculator::default();
    let sigs = signatures(50);
    c.bench_function("build_matrix_50", |b| {
        b.iter(|| calculator.build_matrix(black_box(&sigs)))
    });
}

fn benchmark_clustering(c: &mut Criterion) {
    let matrix = SimilarityCalculator::default().build_matrix(&signatures(50));
    let clusterer = AdaptiveClusterer::default();
    c.bench_function("cluster_auto_k_50", |b| {
        b.iter(|| clusterer.cluster(black_box(&matrix), None))
    });
}

criterion_group!(
    benches,
    benchmark_extraction,
    benchmark_distance_matrix,
    benchmark_clustering
);
criterion_main!(benches);
