//! Criterion benchmarks for the indicator hot paths.
//!
//! Benchmarks:
//! 1. ADX family (Wilder sums + DX average)
//! 2. SuperTrend band ratchet
//! 3. Full-catalogue combine on one series
//! 4. combine_many fan-out over independent series

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use serde_json::json;

use barlab_core::indicators::{adx_series, supertrend_series};
use barlab_core::registry::IndicatorRegistry;
use barlab_core::synthetic::random_walk;
use barlab_core::{combine_indicators, combine_many, Frame, IndicatorConfig};

fn hlc(n: usize) -> (Vec<f64>, Vec<f64>, Vec<f64>) {
    let series = random_walk(n, 42);
    let bars = series.bars();
    (
        bars.iter().map(|b| b.high).collect(),
        bars.iter().map(|b| b.low).collect(),
        bars.iter().map(|b| b.close).collect(),
    )
}

fn full_config() -> IndicatorConfig {
    IndicatorRegistry::with_defaults()
        .ids()
        .fold(IndicatorConfig::new(), |cfg, id| cfg.with(id, json!({})))
}

fn bench_engines(c: &mut Criterion) {
    let mut group = c.benchmark_group("engines");
    for n in [1_000usize, 10_000] {
        let (high, low, close) = hlc(n);
        group.bench_with_input(BenchmarkId::new("adx_14", n), &n, |b, _| {
            b.iter(|| adx_series(black_box(&high), black_box(&low), black_box(&close), 14))
        });
        group.bench_with_input(BenchmarkId::new("supertrend_10_3", n), &n, |b, _| {
            b.iter(|| supertrend_series(black_box(&high), black_box(&low), black_box(&close), 10, 3.0))
        });
    }
    group.finish();
}

fn bench_combine(c: &mut Criterion) {
    let config = full_config();
    let frame = Frame::from_series(&random_walk(5_000, 7));
    c.bench_function("combine_full_catalogue_5000", |b| {
        b.iter(|| combine_indicators(black_box(&frame), black_box(&config)))
    });

    let frames: Vec<Frame> = (0..16)
        .map(|seed| Frame::from_series(&random_walk(2_000, seed)))
        .collect();
    c.bench_function("combine_many_16x2000", |b| {
        b.iter(|| combine_many(black_box(&frames), black_box(&config)))
    });
}

criterion_group!(benches, bench_engines, bench_combine);
criterion_main!(benches);
