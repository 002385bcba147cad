// =============================================================================
// IndicatorSet — every trend-chart series for one symbol
// =============================================================================

use crate::market_data::PriceSeries;
use crate::runtime_config::IndicatorParams;

use super::bollinger::{calculate_bollinger, BollingerBands};
use super::rsi::{calculate_rsi, rsi_label};
use super::sma::calculate_sma;

/// Indicator series aligned to the date index of the `PriceSeries` they were
/// computed from. Recomputed wholesale, never mutated.
#[derive(Debug, Clone, PartialEq)]
pub struct IndicatorSet {
    pub symbol: String,
    pub sma_short: Vec<f64>,
    pub sma_long: Vec<f64>,
    pub bollinger: BollingerBands,
    pub rsi: Vec<f64>,
}

impl IndicatorSet {
    pub fn compute(series: &PriceSeries, params: &IndicatorParams) -> Self {
        let closes = &series.close;
        Self {
            symbol: series.symbol.clone(),
            sma_short: calculate_sma(closes, params.sma_short),
            sma_long: calculate_sma(closes, params.sma_long),
            bollinger: calculate_bollinger(closes, params.bollinger_window, params.bollinger_k),
            rsi: calculate_rsi(closes, params.rsi_window),
        }
    }

    pub fn len(&self) -> usize {
        self.sma_short.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sma_short.is_empty()
    }

    /// Most recent RSI with its OVERBOUGHT / OVERSOLD / NEUTRAL label.
    pub fn latest_rsi(&self) -> Option<(f64, &'static str)> {
        let value = *self.rsi.last()?;
        Some((value, rsi_label(value)))
    }
}
