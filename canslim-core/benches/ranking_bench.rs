//! Criterion benchmarks for scoring hot paths.
//!
//! Benchmarks:
//! 1. RS snapshot over a large universe (performance + percentile ranks)
//! 2. Cached RS lookups (the per-symbol path once a snapshot exists)
//! 3. Market regime classification
//! 4. Full per-symbol evaluation (components + composite)
//! 5. Trend qualification and pullback scan

use std::collections::BTreeMap;

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};

use canslim_core::composite::{evaluate_canslim, SymbolInputs};
use canslim_core::config::{EngineConfig, RsConfig};
use canslim_core::data::InMemoryProvider;
use canslim_core::domain::{Fundamentals, OwnershipHistory, PriceBar};
use canslim_core::market::classify;
use canslim_core::ranking::{percentile_ranks, RsRanker, RsSnapshot};
use canslim_core::trend::PullbackDetector;

// ── Helpers ──────────────────────────────────────────────────────────

fn make_bars(n: usize, phase: f64) -> Vec<PriceBar> {
    let base_date = chrono::NaiveDate::from_ymd_opt(2020, 1, 2).unwrap();
    (0..n)
        .map(|i| {
            let close = 100.0 + i as f64 * 0.05 + ((i as f64 + phase) * 0.1).sin() * 10.0;
            let open = close - 0.3;
            PriceBar {
                date: base_date + chrono::Duration::days(i as i64),
                open,
                high: close + 1.5,
                low: open - 1.5,
                close,
                volume: 1_000_000 + (i as u64 % 500_000),
            }
        })
        .collect()
}

fn symbol(k: usize) -> String {
    format!("SYM{k:04}")
}

fn make_series(symbols: usize, bars: usize) -> BTreeMap<String, Vec<f64>> {
    (0..symbols)
        .map(|k| {
            let closes = make_bars(bars, k as f64 * 0.7).iter().map(|b| b.close).collect();
            (symbol(k), closes)
        })
        .collect()
}

fn make_provider(symbols: usize, bars: usize) -> InMemoryProvider {
    let names: Vec<String> = (0..symbols).map(symbol).collect();
    let mut provider = InMemoryProvider::new().with_universe(names.clone());
    for (k, name) in names.into_iter().enumerate() {
        provider = provider.with_bars(name, make_bars(bars, k as f64 * 0.7));
    }
    provider
}

// ── 1. RS Snapshot ───────────────────────────────────────────────────

fn bench_rs_snapshot(c: &mut Criterion) {
    let mut group = c.benchmark_group("rs_snapshot");
    let config = RsConfig::default();
    let as_of = chrono::NaiveDate::from_ymd_opt(2021, 6, 30).unwrap();

    for &universe in &[50, 500] {
        let series = make_series(universe, 300);
        group.bench_with_input(BenchmarkId::new("from_series", universe), &universe, |b, _| {
            b.iter(|| RsSnapshot::from_series(as_of, "bench".into(), black_box(&series), &config));
        });

        let values: Vec<f64> = (0..universe).map(|k| ((k * 37) % 101) as f64).collect();
        group.bench_with_input(BenchmarkId::new("percentile_ranks", universe), &universe, |b, _| {
            b.iter(|| percentile_ranks(black_box(&values)));
        });
    }

    group.finish();
}

// ── 2. Cached Lookups ────────────────────────────────────────────────

fn bench_cached_rank(c: &mut Criterion) {
    let provider = make_provider(500, 300);
    let ranker = RsRanker::new(RsConfig::default());
    let as_of = make_bars(300, 0.0)[299].date;
    // warm the cache once; every iteration is a hit
    ranker.rank(&provider, &provider, &symbol(0), as_of);

    c.bench_function("rs_rank_cached_500", |b| {
        b.iter(|| ranker.rank(&provider, &provider, black_box(&symbol(250)), as_of));
    });
}

// ── 3. Market Regime ─────────────────────────────────────────────────

fn bench_market(c: &mut Criterion) {
    let mut group = c.benchmark_group("market_classify");
    let config = EngineConfig::default();
    for &bar_count in &[252, 1260] {
        let bars = make_bars(bar_count, 0.0);
        group.bench_with_input(BenchmarkId::new("classify", bar_count), &bar_count, |b, _| {
            b.iter(|| classify("SPY", black_box(&bars), &config.market));
        });
    }
    group.finish();
}

// ── 4. Symbol Evaluation ─────────────────────────────────────────────

fn bench_evaluate(c: &mut Criterion) {
    let config = EngineConfig::default();
    let bars = make_bars(300, 0.0);
    let market = classify("SPY", &bars, &config.market);
    let fundamentals = Fundamentals::default();
    let ownership = OwnershipHistory::default();

    c.bench_function("evaluate_canslim_300", |b| {
        b.iter(|| {
            let inputs = SymbolInputs {
                symbol: "BENCH",
                bars: black_box(&bars),
                fundamentals: &fundamentals,
                ownership: &ownership,
                rs: 80.0,
            };
            evaluate_canslim(inputs, &market, &config)
        });
    });
}

// ── 5. Pullback Detection ────────────────────────────────────────────

fn bench_pullbacks(c: &mut Criterion) {
    let detector = PullbackDetector::default();
    let bars = make_bars(120, 0.0);
    c.bench_function("pullback_detect_120", |b| {
        b.iter(|| detector.detect(black_box(&bars)));
    });
}

criterion_group!(
    benches,
    bench_rs_snapshot,
    bench_cached_rank,
    bench_market,
    bench_evaluate,
    bench_pullbacks,
);
criterion_main!(benches);
