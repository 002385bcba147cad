// =============================================================================
// Technical Indicators Module
// =============================================================================
//
// Pure, side-effect-free implementations of the indicators drawn on the trend
// chart. Every series function returns one value per input close, using a
// partial window at the start of the series (a "minimum one observation"
// rolling policy), so all outputs share the date index of their input.

pub mod bollinger;
pub mod rolling;
pub mod rsi;
pub mod set;
pub mod sma;

pub use bollinger::{calculate_bollinger, BollingerBands};
pub use rsi::{calculate_rsi, rsi_label};
pub use set::IndicatorSet;
pub use sma::calculate_sma;
