//! Export: CSV for record tables, JSON for whole reports.

use std::fs::File;
use std::io::BufWriter;
use std::path::Path;

use anyhow::{Context, Result};
use canslim_core::composite::CanslimResult;
use serde::Serialize;

use crate::backtest::BacktestRecord;

// ─── CSV export ─────────────────────────────────────────────────────

/// Backtest records as CSV, one row per (date, symbol), header included.
pub fn records_to_csv(records: &[BacktestRecord]) -> Result<String> {
    let mut wtr = csv::Writer::from_writer(vec![]);
    if records.is_empty() {
        wtr.write_record(RECORD_HEADER)?;
    }
    for record in records {
        wtr.serialize(record)?;
    }
    let bytes = wtr.into_inner().context("failed to flush CSV writer")?;
    String::from_utf8(bytes).context("CSV output was not UTF-8")
}

pub fn write_records_csv(path: &Path, records: &[BacktestRecord]) -> Result<()> {
    let csv = records_to_csv(records)?;
    std::fs::write(path, csv).with_context(|| format!("failed to write {}", path.display()))
}

const RECORD_HEADER: [&str; 18] = [
    "date",
    "symbol",
    "close",
    "rs",
    "composite",
    "c",
    "a",
    "n",
    "s",
    "l",
    "i",
    "m",
    "proximity_to_high",
    "has_fundamentals",
    "market_bullish",
    "distribution_days",
    "follow_through",
    "buy_signal",
];

/// Screen results as CSV: scores, RS and the headline raw metrics.
///
/// Columns: symbol, as_of, composite, rs, c, a, n, s, l, i, m,
/// current_growth, annual_growth, proximity_to_high, institutional_ownership,
/// has_fundamentals
pub fn results_to_csv(results: &[CanslimResult]) -> Result<String> {
    let mut wtr = csv::Writer::from_writer(vec![]);
    wtr.write_record([
        "symbol",
        "as_of",
        "composite",
        "rs",
        "c",
        "a",
        "n",
        "s",
        "l",
        "i",
        "m",
        "current_growth",
        "annual_growth",
        "proximity_to_high",
        "institutional_ownership",
        "has_fundamentals",
    ])?;

    for r in results {
        let s = &r.scores;
        wtr.write_record([
            r.symbol.clone(),
            r.as_of.to_string(),
            format!("{:.2}", r.composite),
            format!("{:.2}", r.rs),
            format!("{:.4}", s.c),
            format!("{:.4}", s.a),
            format!("{:.4}", s.n),
            format!("{:.4}", s.s),
            format!("{:.4}", s.l),
            format!("{:.4}", s.i),
            format!("{:.4}", s.m),
            optional(r.metrics.current_growth),
            optional(r.metrics.annual_growth),
            optional(r.metrics.proximity_to_high),
            optional(r.metrics.institutional_ownership),
            s.has_fundamentals.to_string(),
        ])?;
    }

    let bytes = wtr.into_inner().context("failed to flush CSV writer")?;
    String::from_utf8(bytes).context("CSV output was not UTF-8")
}

pub fn write_results_csv(path: &Path, results: &[CanslimResult]) -> Result<()> {
    let csv = results_to_csv(results)?;
    std::fs::write(path, csv).with_context(|| format!("failed to write {}", path.display()))
}

fn optional(value: Option<f64>) -> String {
    value.map(|v| format!("{v:.6}")).unwrap_or_default()
}

// ─── JSON export ────────────────────────────────────────────────────

/// Pretty JSON of any report (screen or backtest).
pub fn write_report_json<T: Serialize>(path: &Path, report: &T) -> Result<()> {
    let file = File::create(path).with_context(|| format!("failed to create {}", path.display()))?;
    serde_json::to_writer_pretty(BufWriter::new(file), report)
        .with_context(|| format!("failed to write JSON to {}", path.display()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn record(buy: bool) -> BacktestRecord {
        BacktestRecord {
            date: NaiveDate::from_ymd_opt(2024, 5, 6).unwrap(),
            symbol: "ACME".into(),
            close: Some(42.5),
            rs: 88.0,
            composite: 71.25,
            c: 0.5,
            a: 0.4,
            n: 0.9,
            s: 0.6,
            l: 0.7744,
            i: 0.8,
            m: 0.85,
            proximity_to_high: None,
            has_fundamentals: true,
            market_bullish: true,
            distribution_days: 2,
            follow_through: false,
            buy_signal: buy,
        }
    }

    #[test]
    fn records_csv_has_header_and_rows() {
        let csv = records_to_csv(&[record(true), record(false)]).unwrap();
        let lines: Vec<&str> = csv.lines().collect();
        assert_eq!(lines.len(), 3);
        assert_eq!(lines[0], RECORD_HEADER.join(","));
        assert!(lines[1].starts_with("2024-05-06,ACME,42.5,88.0,71.25,"));
        assert!(lines[1].ends_with(",true,2,false,true"));
        // missing proximity is an empty field
        assert!(lines[1].contains(",0.85,,true,"));
    }

    #[test]
    fn empty_records_still_have_header() {
        let csv = records_to_csv(&[]).unwrap();
        assert_eq!(csv.trim_end(), RECORD_HEADER.join(","));
    }

    #[test]
    fn writes_files() {
        let dir = tempfile::tempdir().unwrap();
        let csv_path = dir.path().join("records.csv");
        write_records_csv(&csv_path, &[record(true)]).unwrap();
        assert!(std::fs::read_to_string(&csv_path).unwrap().contains("ACME"));

        let json_path = dir.path().join("records.json");
        write_report_json(&json_path, &vec![record(false)]).unwrap();
        let back: Vec<BacktestRecord> =
            serde_json::from_str(&std::fs::read_to_string(&json_path).unwrap()).unwrap();
        assert_eq!(back, vec![record(false)]);
    }

    #[test]
    fn unwritable_path_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("missing").join("out.json");
        assert!(write_report_json(&path, &1).is_err());
    }
}
