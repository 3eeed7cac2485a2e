//! Quarter-weighted trailing performance and average-tie percentile ranks.

use crate::config::RsConfig;

/// Weighted sum of four non-overlapping quarter returns ending at the last bar.
///
/// Anchors sit at `n-1, n-q, n-2q, n-3q, n-4q`; the most recent quarter takes
/// `quarter_weights[0]`. Series shorter than `4q` are not ranked (`None`), as
/// are series with a non-positive or non-finite anchor.
pub fn weighted_performance(closes: &[f64], config: &RsConfig) -> Option<f64> {
    let n = closes.len();
    let q = config.quarter_length;
    if q == 0 || n < config.required_history() {
        return None;
    }

    let anchors = [n - 1, n - q, n - 2 * q, n - 3 * q, n - 4 * q];
    let prices: Vec<f64> = anchors.iter().map(|&i| closes[i]).collect();
    if prices.iter().any(|p| !p.is_finite() || *p <= 0.0) {
        return None;
    }

    let performance: f64 = prices
        .windows(2)
        .zip(config.quarter_weights)
        .map(|(pair, weight)| weight * (pair[0] / pair[1] - 1.0))
        .sum();
    performance.is_finite().then_some(performance)
}

/// Percentile rank in (0, 1] of each value, ties sharing their average rank.
///
/// Output order matches input order. `rank / n` with 1-based ranks, so the
/// largest value always maps to 1.0.
pub fn percentile_ranks(values: &[f64]) -> Vec<f64> {
    let n = values.len();
    let mut order: Vec<usize> = (0..n).collect();
    order.sort_by(|&a, &b| values[a].total_cmp(&values[b]));

    let mut ranks = vec![0.0; n];
    let mut start = 0;
    while start < n {
        let mut end = start + 1;
        while end < n && values[order[end]] == values[order[start]] {
            end += 1;
        }
        // positions start..end hold 1-based ranks start+1..=end
        let average = (start + 1 + end) as f64 / 2.0;
        for &idx in &order[start..end] {
            ranks[idx] = average / n as f64;
        }
        start = end;
    }
    ranks
}
