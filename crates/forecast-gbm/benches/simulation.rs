//! Benchmarks for Monte-Carlo simulation.

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use forecast_gbm::{
    estimate_horizon, simulate_forecast, simulate_forecast_parallel, ForecastParameters, RngShocks,
};
use rand::rngs::StdRng;
use rand::SeedableRng;

fn benchmark_simulation(c: &mut Criterion) {
    let mut group = c.benchmark_group("simulate_forecast");

    for runs in [100, 1000, 10000].iter() {
        let params = ForecastParameters::default().with_simulations(*runs);

        group.bench_with_input(BenchmarkId::new("sequential", runs), &params, |b, params| {
            let mut shocks = RngShocks::seeded(42);
            b.iter(|| simulate_forecast(black_box(1000.0), params, &mut shocks))
        });

        group.bench_with_input(BenchmarkId::new("parallel", runs), &params, |b, params| {
            let mut master = StdRng::seed_from_u64(42);
            b.iter(|| simulate_forecast_parallel(black_box(1000.0), params, &mut master))
        });
    }

    group.finish();
}

fn benchmark_closed_form(c: &mut Criterion) {
    let params = ForecastParameters::default();
    c.bench_function("estimate_horizon", |b| {
        b.iter(|| estimate_horizon(black_box(1000.0), &params, black_box(1.0), 0.0))
    });
}

criterion_group!(benches, benchmark_simulation, benchmark_closed_form);
criterion_main!(benches);
