// src/query/normalize.rs

/// Min-max scale `value` into [0, 1] against the bounds of the set it came from.
///
/// A degenerate range (every value equal) maps to 0.
pub fn min_max(value: f64, min: f64, max: f64) -> f64 {
    let span = max - min;
    if span <= 0.0 || !span.is_finite() {
        return 0.0;
    }
    ((value - min) / span).clamp(0.0, 1.0)
}
