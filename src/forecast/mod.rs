// =============================================================================
// Forecaster — linear trend extrapolation
// =============================================================================
//
// Fits an OLS line to one symbol's cleaned closes against the trading-day
// ordinal and extends it over the business days of the horizon. The k-th
// future business day continues the ordinal at x = n + k.
//
// No confidence intervals, no hold-out validation: this is a trend line, not
// a model with measured accuracy.

pub mod horizon;
pub mod regression;

use chrono::NaiveDate;
use tracing::debug;

use crate::error::ForecastError;
use crate::market_data::PriceSeries;

pub use horizon::{business_days_after, is_business_day};
pub use regression::{fit_ols, LinearModel};

/// Fitted model plus its predicted closes.
#[derive(Debug, Clone, PartialEq)]
pub struct Forecast {
    pub symbol: String,
    pub model: LinearModel,
    pub points: Vec<(NaiveDate, f64)>,
}

impl Forecast {
    pub fn first_date(&self) -> Option<NaiveDate> {
        self.points.first().map(|(d, _)| *d)
    }

    pub fn last_date(&self) -> Option<NaiveDate> {
        self.points.last().map(|(d, _)| *d)
    }
}

/// Fit `series` and extrapolate `horizon_days` calendar days past its last
/// date.
pub fn build_forecast(series: &PriceSeries, horizon_days: u32) -> Result<Forecast, ForecastError> {
    let model = fit_ols(&series.close)?;
    let last = series.last_date().ok_or(ForecastError::EmptySeries)?;

    let n = series.len();
    let points: Vec<(NaiveDate, f64)> = business_days_after(last, horizon_days)
        .into_iter()
        .enumerate()
        .map(|(k, date)| (date, model.predict((n + k) as f64)))
        .collect();

    debug!(
        symbol = %series.symbol,
        slope = model.slope,
        intercept = model.intercept,
        points = points.len(),
        "forecast built"
    );

    Ok(Forecast {
        symbol: series.symbol.clone(),
        model,
        points,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    /// Consecutive business days starting Monday 2021-12-06.
    fn series(closes: &[f64]) -> PriceSeries {
        let dates: Vec<NaiveDate> = date(2021, 12, 6)
            .iter_days()
            .filter(|d| is_business_day(*d))
            .take(closes.len())
            .collect();
        PriceSeries {
            symbol: "AAPL".to_string(),
            dates,
            open: closes.to_vec(),
            close: closes.to_vec(),
        }
    }

    #[test]
    fn empty_series_is_an_error() {
        let err = build_forecast(&PriceSeries::empty("AAPL"), 90).unwrap_err();
        assert_eq!(err, ForecastError::EmptySeries);
    }

    #[test]
    fn continues_the_ordinal_after_history() {
        // y = 100 + x over 10 trading days; last date Friday 2021-12-17.
        let closes: Vec<f64> = (0..10).map(|x| 100.0 + x as f64).collect();
        let forecast = build_forecast(&series(&closes), 7).unwrap();

        assert_eq!(forecast.symbol, "AAPL");
        assert_eq!(forecast.first_date(), Some(date(2021, 12, 20)));
        assert_eq!(forecast.last_date(), Some(date(2021, 12, 24)));
        assert_eq!(forecast.points.len(), 5);
        for (k, (_, value)) in forecast.points.iter().enumerate() {
            assert!((value - (110.0 + k as f64)).abs() < 1e-9);
        }
    }

    #[test]
    fn forecast_points_are_collinear() {
        let closes = [150.0, 151.3, 149.8, 153.2, 155.0, 154.1, 157.6, 158.2];
        let forecast = build_forecast(&series(&closes), 30).unwrap();
        let values: Vec<f64> = forecast.points.iter().map(|(_, v)| *v).collect();
        let step = values[1] - values[0];
        for w in values.windows(2) {
            assert!((w[1] - w[0] - step).abs() < 1e-9);
        }
        assert!((step - forecast.model.slope).abs() < 1e-9);
    }

    #[test]
    fn single_close_gives_flat_forecast() {
        let forecast = build_forecast(&series(&[42.0]), 14).unwrap();
        assert_eq!(forecast.model.slope, 0.0);
        assert!(forecast.points.iter().all(|(_, v)| *v == 42.0));
        assert_eq!(forecast.points.len(), 10);
    }
}
