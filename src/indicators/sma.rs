// =============================================================================
// Simple Moving Average (SMA)
// =============================================================================

use super::rolling::{mean, rolling_apply};

/// Trailing arithmetic mean of `closes` over `window`.
///
/// The output has one value per close. Element i is the mean of the trailing
/// `min(window, i + 1)` closes. Returns an empty vec when `window == 0`.
pub fn calculate_sma(closes: &[f64], window: usize) -> Vec<f64> {
    rolling_apply(closes, window, mean)
}
