//! Benchmarks for the depth heuristic.
//!
//! Run with: cargo bench -p relief-depth
//!
//! To compare against baseline:
//! 1. First run: cargo bench -p relief-depth -- --save-baseline main
//! 2. After changes: cargo bench -p relief-depth -- --baseline main

use criterion::{black_box, criterion_group, criterion_main, Criterion, Throughput};
use image::{Rgba, RgbaImage};
use relief_depth::{compute_depth, DepthParams};

/// Checkerboard test image; dense in edges so no pass short-circuits.
fn checkerboard(size: u32) -> RgbaImage {
    RgbaImage::from_fn(size, size, |x, y| {
        if (x / 8 + y / 8) % 2 == 0 {
            Rgba([230, 230, 230, 255])
        } else {
            Rgba([20, 20, 20, 255])
        }
    })
}

fn bench_compute_depth(c: &mut Criterion) {
    let mut group = c.benchmark_group("compute_depth");
    let params = DepthParams::default();

    for size in [64u32, 256, 512] {
        let image = checkerboard(size);
        group.throughput(Throughput::Elements(u64::from(size) * u64::from(size)));
        group.bench_function(format!("{size}x{size}"), |b| {
            b.iter(|| compute_depth(black_box(&image), black_box(&params)));
        });
    }

    group.finish();
}

fn bench_kernel_sizes(c: &mut Criterion) {
    let mut group = c.benchmark_group("kernel_size");
    let image = checkerboard(256);

    for kernel in [3u32, 5, 9] {
        let params = DepthParams::new().with_kernel_size(kernel);
        group.bench_function(format!("k{kernel}"), |b| {
            b.iter(|| compute_depth(black_box(&image), black_box(&params)));
        });
    }

    group.finish();
}

criterion_group!(benches, bench_compute_depth, bench_kernel_sizes);
criterion_main!(benches);
