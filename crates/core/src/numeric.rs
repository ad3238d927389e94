//! Rounding helpers shared by the scoring crates.
//!
//! Scores are reported with half-up rounding (`2.5 -> 3`, `-2.5 -> -2`),
//! which differs from `f64::round` for negative halves.

/// Round to the nearest integer, ties toward positive infinity.
pub fn round_half_up(value: f64) -> f64 {
    (value + 0.5).floor()
}

/// Round half-up to a fixed number of decimal places.
pub fn round_to(value: f64, decimals: u32) -> f64 {
    let factor = 10f64.powi(decimals as i32);
    round_half_up(value * factor) / factor
}
