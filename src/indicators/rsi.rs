// =============================================================================
// Relative Strength Index (RSI) — rolling-mean smoothing
// =============================================================================
//
// RSI measures the speed and magnitude of recent price changes to evaluate
// whether an asset is overbought or oversold.
//
// Step 1 — Compute day-over-day deltas. The first close has no predecessor
//          and contributes a delta of 0.
// Step 2 — Split into gains (positive deltas, else 0) and losses (negated
//          negative deltas, else 0).
// Step 3 — Average gains and losses over the trailing window (partial window
//          at the start of the series).
// Step 4 — RS  = avg_gain / avg_loss
//          RSI = 100 - 100 / (1 + RS)
//
// When avg_loss is zero RS is undefined; RSI is pinned to 100 so no infinity
// or NaN reaches the chart.
//
// Thresholds:  RSI >= 70 => OVERBOUGHT,  RSI <= 30 => OVERSOLD.
// =============================================================================

use super::rolling::{mean, rolling_apply};

const OVERBOUGHT: f64 = 70.0;
const OVERSOLD: f64 = 30.0;

/// Compute the full RSI series for the given `closes` and `window`.
///
/// The returned vector has one value per close, each in [0, 100].
///
/// # Edge cases
/// - `window == 0` => empty vec
/// - `closes` empty => empty vec
/// - average loss of zero => 100.0
pub fn calculate_rsi(closes: &[f64], window: usize) -> Vec<f64> {
    if window == 0 || closes.is_empty() {
        return Vec::new();
    }

    // --- Gains / losses, first delta is zero ---------------------------------
    let mut gains = Vec::with_capacity(closes.len());
    let mut losses = Vec::with_capacity(closes.len());
    gains.push(0.0);
    losses.push(0.0);
    for w in closes.windows(2) {
        let delta = w[1] - w[0];
        gains.push(if delta > 0.0 { delta } else { 0.0 });
        losses.push(if delta < 0.0 { -delta } else { 0.0 });
    }

    // --- Rolling averages ----------------------------------------------------
    let avg_gain = rolling_apply(&gains, window, mean);
    let avg_loss = rolling_apply(&losses, window, mean);

    avg_gain
        .iter()
        .zip(&avg_loss)
        .map(|(&g, &l)| rsi_from_averages(g, l))
        .collect()
}

/// Label an RSI reading.
pub fn rsi_label(value: f64) -> &'static str {
    if value >= OVERBOUGHT {
        "OVERBOUGHT"
    } else if value <= OVERSOLD {
        "OVERSOLD"
    } else {
        "NEUTRAL"
    }
}

// =============================================================================
// Internal helpers
// =============================================================================

/// Convert average gain / average loss into an RSI value in [0, 100].
///
/// - If average loss is zero, RSI is 100.0 (includes a flat window).
/// - Anything non-finite falls back to 100.0 as well; that only happens when
///   the inputs themselves are non-finite.
fn rsi_from_averages(avg_gain: f64, avg_loss: f64) -> f64 {
    if avg_loss == 0.0 {
        return 100.0;
    }
    let rs = avg_gain / avg_loss;
    let rsi = 100.0 - 100.0 / (1.0 + rs);
    if rsi.is_finite() {
        rsi.clamp(0.0, 100.0)
    } else {
        100.0
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
#[cfg(test)]
mod tests {
    use super::*;

    // ---- calculate_rsi ---------------------------------------------------

    #[test]
    fn rsi_empty_input() {
        assert!(calculate_rsi(&[], 14).is_empty());
    }

    #[test]
    fn rsi_window_zero() {
        assert!(calculate_rsi(&[1.0, 2.0, 3.0], 0).is_empty());
    }

    #[test]
    fn rsi_same_length_as_input() {
        let closes: Vec<f64> = (1..=5).map(|x| x as f64).collect();
        assert_eq!(calculate_rsi(&closes, 20).len(), 5);
    }

    #[test]
    fn rsi_all_gains() {
        // Strictly ascending prices => RSI should be 100 everywhere.
        let closes: Vec<f64> = (1..=60).map(|x| x as f64).collect();
        let series = calculate_rsi(&closes, 20);
        for &v in &series {
            assert!((v - 100.0).abs() < 1e-10, "expected 100.0, got {v}");
        }
    }

    #[test]
    fn rsi_all_losses() {
        // Strictly descending prices => RSI is 0 once a loss is in the window.
        let closes: Vec<f64> = (1..=60).rev().map(|x| x as f64).collect();
        let series = calculate_rsi(&closes, 20);
        assert!((series[0] - 100.0).abs() < 1e-10);
        for &v in &series[1..] {
            assert!(v.abs() < 1e-10, "expected 0.0, got {v}");
        }
    }

    #[test]
    fn rsi_flat_market_has_no_losses() {
        let series = calculate_rsi(&[100.0; 30], 14);
        assert!(series.iter().all(|&v| v == 100.0));
    }

    #[test]
    fn rsi_known_values() {
        // deltas: 0, +2, -1, +3 ; window 2
        // i=1: gain 2/2=1.0 loss 0 => 100
        // i=2: gains (2,0)->1.0 losses (0,1)->0.5 => RS 2 => 66.666...
        // i=3: gains (0,3)->1.5 losses (1,0)->0.5 => RS 3 => 75
        let series = calculate_rsi(&[10.0, 12.0, 11.0, 14.0], 2);
        assert_eq!(series[0], 100.0);
        assert_eq!(series[1], 100.0);
        assert!((series[2] - 200.0 / 3.0).abs() < 1e-10);
        assert!((series[3] - 75.0).abs() < 1e-10);
    }

    #[test]
    fn rsi_range_check() {
        // Arbitrary data — RSI must always be in [0, 100].
        let closes = vec![
            44.34, 44.09, 44.15, 43.61, 44.33, 44.83, 45.10, 45.42, 45.84, 46.08,
            45.89, 46.03, 44.18, 44.22, 44.57, 43.42, 42.66, 43.13,
        ];
        for window in [1, 3, 14, 20] {
            for &v in &calculate_rsi(&closes, window) {
                assert!((0.0..=100.0).contains(&v), "RSI {v} out of range");
            }
        }
    }

    // ---- rsi_label -------------------------------------------------------

    fn last_label(closes: &[f64], window: usize) -> (f64, &'static str) {
        let value = *calculate_rsi(closes, window).last().unwrap();
        (value, rsi_label(value))
    }

    #[test]
    fn rising_market_is_overbought() {
        let closes: Vec<f64> = (1..=30).map(|x| x as f64).collect();
        let (val, label) = last_label(&closes, 14);
        assert!((val - 100.0).abs() < 1e-10);
        assert_eq!(label, "OVERBOUGHT");
    }

    #[test]
    fn falling_market_is_oversold() {
        let closes: Vec<f64> = (1..=30).rev().map(|x| x as f64).collect();
        let (val, label) = last_label(&closes, 14);
        assert!(val.abs() < 1e-10);
        assert_eq!(label, "OVERSOLD");
    }

    #[test]
    fn mixed_window_value_and_label() {
        let (val, label) = last_label(&[10.0, 12.0, 11.0, 14.0, 13.0], 4);
        // window (+2, -1, +3, -1): gains 5/4, losses 2/4 => RS 2.5 => 71.43
        assert!((val - 500.0 / 7.0).abs() < 1e-10);
        assert_eq!(label, "OVERBOUGHT");
    }

    #[test]
    fn label_thresholds_are_inclusive() {
        assert_eq!(rsi_label(70.0), "OVERBOUGHT");
        assert_eq!(rsi_label(69.99), "NEUTRAL");
        assert_eq!(rsi_label(50.0), "NEUTRAL");
        assert_eq!(rsi_label(30.01), "NEUTRAL");
        assert_eq!(rsi_label(30.0), "OVERSOLD");
    }
}
