//! Screening over a synthetic market: ordering, isolation of per-symbol
//! failures, determinism across pool widths, momentum setups.

use canslim_core::data::{InMemoryProvider, PriceHistory, ProviderError};
use canslim_core::trend::PullbackDetector;
use canslim_runner::{generate_bars, RunConfig, Screener, SyntheticMarket};
use chrono::NaiveDate;

fn start() -> NaiveDate {
    NaiveDate::from_ymd_opt(2023, 1, 2).unwrap()
}

fn as_of() -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 6, 28).unwrap()
}

fn peers() -> Vec<String> {
    (0..12).map(|k| format!("P{k:02}")).collect()
}

/// Twelve noisy peers, a benchmark, and one noise-free steady climber.
fn market_data() -> InMemoryProvider {
    let market = peers()
        .into_iter()
        .enumerate()
        .fold(SyntheticMarket::new(start(), as_of()).with_volatility(0.01), |m, (k, s)| {
            m.with_symbol(s, 0.00025 * k as f64 - 0.001)
        })
        .with_symbol("SPY", 0.0006);
    market
        .provider()
        .with_bars("CLEAN", generate_bars("CLEAN", start(), as_of(), 0.002, 0.0))
}

fn config(symbols: Vec<String>, workers: usize) -> RunConfig {
    RunConfig {
        symbols,
        workers,
        ..RunConfig::default()
    }
}

fn screen_symbols() -> Vec<String> {
    let mut symbols = peers();
    symbols.push("CLEAN".into());
    symbols
}

#[test]
fn every_symbol_scored_and_sorted() {
    let data = market_data();
    let screener = Screener::new(config(screen_symbols(), 3)).unwrap();
    let report = screener.screen(&data, as_of()).unwrap();

    assert!(report.failures.is_empty());
    assert_eq!(report.results.len(), 13);
    assert_eq!(report.as_of, as_of());
    assert!(report
        .results
        .windows(2)
        .all(|w| w[0].composite >= w[1].composite));
    for result in &report.results {
        assert!((0.0..=100.0).contains(&result.composite));
        assert!((1.0..=99.0).contains(&result.rs), "{} rs {}", result.symbol, result.rs);
        assert_eq!(result.market, report.market);
        // synthetic data carries no fundamentals
        assert!(!result.has_fundamentals());
    }
    assert_eq!(screener.ranker().cache().computations(), 1);
}

#[test]
fn pool_width_does_not_change_results() {
    let data = market_data();
    let inline = Screener::new(config(screen_symbols(), 1)).unwrap().screen(&data, as_of()).unwrap();
    let pooled = Screener::new(config(screen_symbols(), 4)).unwrap().screen(&data, as_of()).unwrap();
    assert_eq!(inline, pooled);
}

#[test]
fn failures_are_isolated() {
    let data = market_data().with_bars("TINY", generate_bars("TINY", start(), start() + chrono::Duration::days(20), 0.0, 0.01));
    let mut symbols = screen_symbols();
    symbols.push("GHOST".into());
    symbols.push("TINY".into());
    let report = Screener::new(config(symbols, 2)).unwrap().screen(&data, as_of()).unwrap();

    assert_eq!(report.results.len(), 13);
    assert_eq!(report.failures.len(), 2);
    let ghost = report.failures.iter().find(|f| f.symbol == "GHOST").unwrap();
    assert!(ghost.reason.contains(&ProviderError::SymbolNotFound { symbol: "GHOST".into() }.to_string()));
    let tiny = report.failures.iter().find(|f| f.symbol == "TINY").unwrap();
    assert!(tiny.reason.contains("insufficient history"));
}

#[test]
fn missing_benchmark_means_neutral_market() {
    let data = market_data();
    let mut run = config(screen_symbols(), 1);
    run.benchmark = "NOPE".into();
    let report = Screener::new(run).unwrap().screen(&data, as_of()).unwrap();
    assert_eq!(report.market.score, 0.4);
    assert!(!report.market.is_bullish);
    assert!(report.results.iter().all(|r| r.scores.m == 0.4));
}

#[test]
fn steady_climber_is_a_momentum_setup() {
    let data = market_data();
    let report = Screener::new(config(screen_symbols(), 2)).unwrap().screen(&data, as_of()).unwrap();
    let setup = report.setups.iter().find(|s| s.symbol == "CLEAN").unwrap();

    assert!(setup.strength.is_strong_trend);
    assert_eq!(setup.strength.ema_8_adherence, 100.0);
    assert_eq!(setup.latest_rsi, Some(100.0));
    assert!(!setup.signals.is_empty());
    assert!(setup.signals.windows(2).all(|w| w[0].date < w[1].date));
    assert_eq!(Some(setup.latest_close), report.result("CLEAN").unwrap().metrics.latest_close);

    let bars = data.bars("CLEAN", Some(as_of())).unwrap();
    assert_eq!(setup.signals, PullbackDetector::default().detect(&bars));
}

#[test]
fn pullback_scan_can_be_disabled() {
    let data = market_data();
    let mut run = config(screen_symbols(), 1);
    run.scan_pullbacks = false;
    let report = Screener::new(run).unwrap().screen(&data, as_of()).unwrap();
    assert!(report.setups.is_empty());
}

#[test]
fn buy_signals_respect_thresholds() {
    let data = market_data();
    let report = Screener::new(config(screen_symbols(), 1)).unwrap().screen(&data, as_of()).unwrap();
    let all = report.buy_signals(0.0, 0.0);
    assert_eq!(all.len(), report.results.len());
    let none = report.buy_signals(100.1, 0.0);
    assert!(none.is_empty());
    for r in report.buy_signals(40.0, 50.0) {
        assert!(r.composite >= 40.0 && r.rs >= 50.0);
    }
}

#[test]
fn empty_symbol_list_is_an_error() {
    let data = market_data();
    let screener = Screener::new(config(Vec::new(), 1)).unwrap();
    assert!(matches!(screener.screen(&data, as_of()), Err(canslim_runner::RunError::NoSymbols)));
}
