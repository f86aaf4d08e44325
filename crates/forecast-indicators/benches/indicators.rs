//! Benchmarks for indicator implementations.

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use forecast_core::traits::{Indicator, MultiOutputIndicator};
use forecast_core::types::{PriceSeries, Timeframe};
use forecast_indicators::{compute_indicators, Ema, IndicatorWindows, Macd, Rsi};

fn generate_test_data(size: usize) -> Vec<f64> {
    (0..size)
        .map(|i| 100.0 + (i as f64 * 0.1).sin() * 10.0)
        .collect()
}

fn benchmark_ema(c: &mut Criterion) {
    let mut group = c.benchmark_group("EMA");

    for size in [1000, 10000, 100000].iter() {
        let data = generate_test_data(*size);

        group.bench_with_input(BenchmarkId::new("batch", size), &data, |b, data| {
            let ema = Ema::new(20);
            b.iter(|| ema.calculate(black_box(data)))
        });
    }

    group.finish();
}

fn benchmark_rsi(c: &mut Criterion) {
    let mut group = c.benchmark_group("RSI");

    for size in [1000, 10000, 100000].iter() {
        let data = generate_test_data(*size);

        group.bench_with_input(BenchmarkId::new("batch", size), &data, |b, data| {
            let rsi = Rsi::new(14);
            b.iter(|| rsi.calculate(black_box(data)))
        });
    }

    group.finish();
}

fn benchmark_macd(c: &mut Criterion) {
    let mut group = c.benchmark_group("MACD");

    for size in [1000, 10000, 100000].iter() {
        let data = generate_test_data(*size);

        group.bench_with_input(BenchmarkId::new("batch", size), &data, |b, data| {
            let macd = Macd::new();
            b.iter(|| macd.calculate(black_box(data)))
        });
    }

    group.finish();
}

fn benchmark_engine(c: &mut Criterion) {
    let mut group = c.benchmark_group("compute_indicators");
    let windows = IndicatorWindows::default();

    for size in [1000, 10000].iter() {
        let series = PriceSeries::from_closes("BENCH", Timeframe::Hour1, &generate_test_data(*size))
            .expect("generated closes are positive");

        group.bench_with_input(BenchmarkId::new("default", size), &series, |b, series| {
            b.iter(|| compute_indicators(black_box(series), &windows))
        });
    }

    group.finish();
}

criterion_group!(benches, benchmark_ema, benchmark_rsi, benchmark_macd, benchmark_engine);
criterion_main!(benches);
