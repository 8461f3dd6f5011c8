//! Performance benchmarks for the computation engine.
//!
//! Run with: `cargo bench`
//!
//! These benchmarks measure throughput for the kernels and composites across
//! various input sizes to validate O(n) complexity and establish baselines.

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use ta_engine::prelude::*;

/// Generate a synthetic random-walk price series, reproducible via the seed.
fn generate_series(size: usize) -> Vec<f64> {
    let mut rng = StdRng::seed_from_u64(0x5eed);
    let mut data = Vec::with_capacity(size);
    let mut price = 100.0_f64;
    for _ in 0..size {
        price = (price + rng.gen_range(-1.5..1.5)).max(10.0);
        data.push(price);
    }
    data
}

/// Generate synthetic OHLCV data around the same walk.
fn generate_bars(size: usize) -> (Vec<f64>, Vec<f64>, Vec<f64>, Vec<f64>) {
    let close = generate_series(size);
    let mut rng = StdRng::seed_from_u64(0xba45);
    let mut high = Vec::with_capacity(size);
    let mut low = Vec::with_capacity(size);
    let mut volume = Vec::with_capacity(size);
    for &c in &close {
        high.push(c + rng.gen_range(0.0..1.2));
        low.push(c - rng.gen_range(0.0..1.2));
        volume.push(rng.gen_range(100_000.0..2_000_000.0));
    }
    (high, low, close, volume)
}

const SIZES: &[usize] = &[1_000, 10_000, 100_000];

fn bench_moving_averages(c: &mut Criterion) {
    let settings = Settings::new();
    let mut group = c.benchmark_group("moving_average");
    for &size in SIZES {
        let data = generate_series(size);
        let range = resolve_range(RangeSpec::full(), &[size]).unwrap();
        let mut out = vec![0.0; size];
        group.throughput(Throughput::Elements(size as u64));
        group.bench_with_input(BenchmarkId::new("sma", size), &data, |b, data| {
            b.iter(|| sma_into(black_box(data), range, black_box(20), &mut out));
        });
        group.bench_with_input(BenchmarkId::new("ema", size), &data, |b, data| {
            b.iter(|| ema_into(black_box(data), range, black_box(20), &settings, &mut out));
        });
        group.bench_with_input(BenchmarkId::new("wma", size), &data, |b, data| {
            b.iter(|| wma_into(black_box(data), range, black_box(20), &mut out));
        });
    }
    group.finish();
}

fn bench_extrema_and_variance(c: &mut Criterion) {
    let mut group = c.benchmark_group("windows");
    for &size in SIZES {
        let data = generate_series(size);
        let range = resolve_range(RangeSpec::full(), &[size]).unwrap();
        let mut out = vec![0.0; size];
        group.throughput(Throughput::Elements(size as u64));
        group.bench_with_input(BenchmarkId::new("rolling_max", size), &data, |b, data| {
            b.iter(|| rolling_max_into(black_box(data), range, black_box(14), &mut out));
        });
        group.bench_with_input(BenchmarkId::new("stddev", size), &data, |b, data| {
            b.iter(|| stddev_into(black_box(data), range, black_box(14), &mut out));
        });
    }
    group.finish();
}

fn bench_composites(c: &mut Criterion) {
    let settings = Settings::new();
    let mut group = c.benchmark_group("composites");
    for &size in SIZES {
        let (high, low, close, volume) = generate_bars(size);
        let range = resolve_range(RangeSpec::full(), &[size]).unwrap();
        let mut out = vec![0.0; size];
        let mut out2 = vec![0.0; size];
        let mut out3 = vec![0.0; size];
        group.throughput(Throughput::Elements(size as u64));
        group.bench_with_input(BenchmarkId::new("rsi", size), &close, |b, data| {
            b.iter(|| rsi_into(black_box(data), range, black_box(14), &settings, &mut out));
        });
        group.bench_with_input(BenchmarkId::new("macd", size), &close, |b, data| {
            b.iter(|| {
                macd_into(
                    black_box(data),
                    range,
                    12,
                    26,
                    9,
                    &settings,
                    &mut out,
                    &mut out2,
                    &mut out3,
                )
            });
        });
        group.bench_function(BenchmarkId::new("adx", size), |b| {
            b.iter(|| {
                adx_into(
                    black_box(&high),
                    black_box(&low),
                    black_box(&close),
                    range,
                    14,
                    &settings,
                    &mut out,
                )
            });
        });
        group.bench_function(BenchmarkId::new("mfi", size), |b| {
            b.iter(|| {
                mfi_into(
                    black_box(&high),
                    black_box(&low),
                    black_box(&close),
                    black_box(&volume),
                    range,
                    14,
                    &settings,
                    &mut out,
                )
            });
        });
        group.bench_function(BenchmarkId::new("stoch", size), |b| {
            b.iter(|| {
                stoch_into(
                    black_box(&high),
                    black_box(&low),
                    black_box(&close),
                    range,
                    5,
                    3,
                    MaKind::Sma,
                    3,
                    MaKind::Sma,
                    &settings,
                    &mut out,
                    &mut out2,
                )
            });
        });
    }
    group.finish();
}

fn bench_hilbert(c: &mut Criterion) {
    let settings = Settings::new();
    let mut group = c.benchmark_group("hilbert");
    for &size in SIZES {
        let data = generate_series(size);
        let range = resolve_range(RangeSpec::full(), &[size]).unwrap();
        let mut out = vec![0.0; size];
        let mut out2 = vec![0.0; size];
        group.throughput(Throughput::Elements(size as u64));
        group.bench_with_input(BenchmarkId::new("dc_period", size), &data, |b, data| {
            b.iter(|| ht_dc_period_into(black_box(data), range, &settings, &mut out));
        });
        group.bench_with_input(BenchmarkId::new("sine", size), &data, |b, data| {
            b.iter(|| ht_sine_into(black_box(data), range, &settings, &mut out, &mut out2));
        });
        group.bench_with_input(BenchmarkId::new("trendline", size), &data, |b, data| {
            b.iter(|| ht_trendline_into(black_box(data), range, &settings, &mut out));
        });
    }
    group.finish();
}

criterion_group!(
    benches,
    bench_moving_averages,
    bench_extrema_and_variance,
    bench_composites,
    bench_hilbert
);
criterion_main!(benches);
