//! L: leader or laggard, from the RS percentile.

use super::ComponentEval;

/// `(rs / 100)^2`: a power curve that punishes laggards harder than a linear map.
pub fn evaluate_l(rs: Option<f64>) -> ComponentEval<f64> {
    match rs.filter(|r| r.is_finite()) {
        Some(rs) => ComponentEval::scored((rs / 100.0).powi(2), rs),
        None => ComponentEval::unavailable(0.0),
    }
}
