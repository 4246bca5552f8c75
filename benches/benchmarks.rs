use chrono::{Duration, NaiveDate};
use criterion::{black_box, criterion_group, criterion_main, Criterion};
use fx_aggregator::{
    calendar::chunk_range,
    data::DailyTable,
    volatility::{log_returns, rolling_std, VolatilityEngine},
};

fn synthetic_table(pairs: usize, days: i64) -> DailyTable {
    let names = (0..pairs).map(|p| format!("PAIR{}", p)).collect();
    let mut table = DailyTable::new(names);
    let start = NaiveDate::from_ymd_opt(2019, 1, 1).unwrap();

    for day in 0..days {
        let row = (0..pairs)
            .map(|p| {
                let phase = (day as f64 * 0.37 + p as f64).sin();
                Some(1.0 + p as f64 * 0.1 + phase * 0.01)
            })
            .collect();
        table.upsert_row(start + Duration::days(day), row);
    }

    table
}

fn benchmark_volatility_table(c: &mut Criterion) {
    let table = synthetic_table(10, 5 * 365);
    let engine = VolatilityEngine::default();

    c.bench_function("volatility_10_pairs_5_years", |b| {
        b.iter(|| engine.compute(black_box(&table)));
    });
}

fn benchmark_rolling_std(c: &mut Criterion) {
    let table = synthetic_table(1, 5 * 365);
    let returns = log_returns(&table.column("PAIR0").unwrap());

    c.bench_function("rolling_std_250", |b| {
        b.iter(|| rolling_std(black_box(&returns), 250));
    });
}

fn benchmark_merge(c: &mut Criterion) {
    let base = synthetic_table(10, 5 * 365);
    let delta = synthetic_table(10, 30);

    c.bench_function("daily_merge_30_days", |b| {
        b.iter(|| {
            let mut merged = base.clone();
            merged.merge(black_box(&delta))
        });
    });
}

fn benchmark_chunking(c: &mut Criterion) {
    let start = NaiveDate::from_ymd_opt(2000, 1, 1).unwrap();
    let end = NaiveDate::from_ymd_opt(2024, 12, 31).unwrap();

    c.bench_function("chunk_25_years", |b| {
        b.iter(|| chunk_range(black_box(start), black_box(end), 365));
    });
}

criterion_group!(
    benches,
    benchmark_volatility_table,
    benchmark_rolling_std,
    benchmark_merge,
    benchmark_chunking
);
criterion_main!(benches);
