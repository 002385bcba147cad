// =============================================================================
// Bollinger Bands
// =============================================================================
//
// Bollinger Bands consist of a middle band (SMA), an upper band (SMA + k*σ),
// and a lower band (SMA - k*σ), where σ is the rolling *sample* standard
// deviation over the same window as the SMA.
//
// Both the SMA and σ use a partial window at the start of the series. The very
// first point has a one-element window, so σ = 0 and the bands collapse onto
// the middle instead of going NaN.

use super::rolling::{mean, rolling_apply, sample_std};

/// Three parallel band series, one value per input close.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BollingerBands {
    pub upper: Vec<f64>,
    pub middle: Vec<f64>,
    pub lower: Vec<f64>,
}

impl BollingerBands {
    pub fn len(&self) -> usize {
        self.middle.len()
    }

    pub fn is_empty(&self) -> bool {
        self.middle.is_empty()
    }

    /// `(upper, middle, lower)` at index `i`.
    pub fn at(&self, i: usize) -> Option<(f64, f64, f64)> {
        Some((*self.upper.get(i)?, *self.middle.get(i)?, *self.lower.get(i)?))
    }
}

/// Calculate Bollinger Bands for the given closing prices.
///
/// - `middle` = SMA(`window`)
/// - `upper`  = middle + `num_std` * σ
/// - `lower`  = middle - `num_std` * σ
///
/// Returns empty bands when `window == 0`.
pub fn calculate_bollinger(closes: &[f64], window: usize, num_std: f64) -> BollingerBands {
    let middle = rolling_apply(closes, window, mean);
    let std_dev = rolling_apply(closes, window, sample_std);

    let upper = middle
        .iter()
        .zip(&std_dev)
        .map(|(m, s)| m + num_std * s)
        .collect();
    let lower = middle
        .iter()
        .zip(&std_dev)
        .map(|(m, s)| m - num_std * s)
        .collect();

    BollingerBands {
        upper,
        middle,
        lower,
    }
}
