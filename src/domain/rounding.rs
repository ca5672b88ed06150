//! Two-decimal rounding for reported figures.
//!
//! Halves round toward positive infinity, so `-0.125` becomes `-0.12` and
//! `0.125` becomes `0.13`.

pub fn round_scalar(value: f64) -> f64 {
    (value * 100.0 + 0.5).floor() / 100.0
}

pub fn round_series(values: &[f64]) -> Vec<f64> {
    values.iter().copied().map(round_scalar).collect()
}

pub fn round_optional(value: Option<f64>) -> Option<f64> {
    value.map(round_scalar)
}

pub fn round_optional_series(values: &[Option<f64>]) -> Vec<Option<f64>> {
    values.iter().copied().map(round_optional).collect()
}
