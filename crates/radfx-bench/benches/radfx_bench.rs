//! Benchmarks for radfx filters and the executor.
//!
//! Run with: `cargo bench`

use std::hint::black_box;

use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};

use radfx_core::GrayImage;
use radfx_engine::{ExecutionMode, FilterExecutor, FilterKind};
use radfx_ops::array::{convolve2d, Kernel};
use radfx_ops::canny::{canny, CannyParams};
use radfx_ops::{dct, fourier, median, otsu};

/// Deterministic radiograph-like test image.
fn test_image(size: usize) -> GrayImage {
    GrayImage::from_fn(size, size, |x, y| {
        let c = size as f64 / 2.0;
        let r = (x as f64 - c).hypot(y as f64 - c);
        (120.0 + 60.0 * (r / 9.0).sin() + ((x * 7 + y * 13) % 17) as f64).clamp(0.0, 255.0)
    })
    .unwrap()
}

const SIZES: [usize; 3] = [128, 256, 512];

/// Benchmark 2D convolution with the default Gaussian kernel.
fn bench_convolve(c: &mut Criterion) {
    let mut group = c.benchmark_group("convolve2d");
    let kernel = Kernel::gaussian(5, 1.4).unwrap();

    for size in SIZES {
        let img = test_image(size);
        group.throughput(Throughput::Elements((size * size) as u64));
        group.bench_with_input(BenchmarkId::new("gaussian_5x5", size), &img, |b, img| {
            b.iter(|| convolve2d(black_box(img), &kernel).unwrap())
        });
    }
    group.finish();
}

/// Benchmark the rank-order and spectral filters.
fn bench_filters(c: &mut Criterion) {
    let mut group = c.benchmark_group("filters");

    for size in SIZES {
        let img = test_image(size);
        group.throughput(Throughput::Elements((size * size) as u64));

        group.bench_with_input(BenchmarkId::new("median_5", size), &img, |b, img| {
            b.iter(|| median::median_filter(black_box(img), 5).unwrap())
        });
        group.bench_with_input(BenchmarkId::new("canny", size), &img, |b, img| {
            b.iter(|| canny(black_box(img), &CannyParams::default()).unwrap())
        });
        group.bench_with_input(BenchmarkId::new("fourier", size), &img, |b, img| {
            b.iter(|| fourier::fourier_view(black_box(img)).unwrap())
        });
        group.bench_with_input(BenchmarkId::new("dct", size), &img, |b, img| {
            b.iter(|| dct::dct_view(black_box(img)).unwrap())
        });
        group.bench_with_input(BenchmarkId::new("otsu", size), &img, |b, img| {
            b.iter(|| otsu::otsu(black_box(img)))
        });
    }
    group.finish();
}

/// Benchmark a full eight-filter batch, sequential vs parallel.
fn bench_executor(c: &mut Criterion) {
    let mut group = c.benchmark_group("executor");
    group.sample_size(20);

    let img = test_image(256);
    let names: Vec<&str> = FilterKind::ALL.iter().map(|k| k.name()).collect();

    for mode in [ExecutionMode::Sequential, ExecutionMode::Parallel] {
        let exec = FilterExecutor::with_defaults().unwrap().with_mode(mode);
        group.bench_function(format!("all_filters_{:?}", mode), |b| {
            b.iter(|| exec.apply(black_box(&img), &names).unwrap())
        });
    }
    group.finish();
}

criterion_group!(benches, bench_convolve, bench_filters, bench_executor);
criterion_main!(benches);
