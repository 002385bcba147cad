// =============================================================================
// Ordinary least-squares trend line
// =============================================================================
//
// Fits close = intercept + slope * x where x is the trading-day ordinal
// 0, 1, ..., n-1 (not calendar time; weekends and holidays collapse).
//
//   slope     = Σ((x-x̄)(y-ȳ)) / Σ((x-x̄)²)
//   intercept = ȳ - slope * x̄
//
// A single observation has zero x-variance; the line is flat through it.

use tracing::trace;

use crate::error::ForecastError;

/// Fitted line over the ordinal index.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LinearModel {
    pub slope: f64,
    pub intercept: f64,
}

impl LinearModel {
    pub fn predict(&self, x: f64) -> f64 {
        self.intercept + self.slope * x
    }
}

/// Fit `ys` against x = 0..ys.len().
pub fn fit_ols(ys: &[f64]) -> Result<LinearModel, ForecastError> {
    if ys.is_empty() {
        return Err(ForecastError::EmptySeries);
    }

    let n = ys.len() as f64;
    let x_mean = (n - 1.0) / 2.0;
    let y_mean = ys.iter().sum::<f64>() / n;

    let mut numerator = 0.0_f64;
    let mut denominator = 0.0_f64;

    for (i, &y) in ys.iter().enumerate() {
        let dx = i as f64 - x_mean;
        numerator += dx * (y - y_mean);
        denominator += dx * dx;
    }

    let slope = if denominator.abs() < f64::EPSILON {
        0.0
    } else {
        numerator / denominator
    };
    let intercept = y_mean - slope * x_mean;

    trace!(slope, intercept, points = ys.len(), "OLS fit");

    Ok(LinearModel { slope, intercept })
}
