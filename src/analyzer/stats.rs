//! Percentage helpers shared by the aggregates.

/// `part / whole * 100`. Returns 0.0 when `whole` is 0, so callers never see NaN.
pub fn pct(part: usize, whole: usize) -> f64 {
    if whole == 0 {
        0.0
    } else {
        part as f64 / whole as f64 * 100.0
    }
}

pub fn round1(v: f64) -> f64 {
    (v * 10.0).round() / 10.0
}
