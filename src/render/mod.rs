// =============================================================================
// Chart Renderer — SVG output via plotters
// =============================================================================
//
// Pure presentation: takes the computed series by reference and writes one
// SVG per chart into the output directory. Nothing here feeds back into the
// pipelines.
//
//   market_trends.svg     one panel per symbol, dual y-axis
//   forecast_<SYM>.svg    historical close + predicted close
// =============================================================================

pub mod forecast;
pub mod trends;

use std::ops::Range;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use chrono::{Duration, NaiveDate};
use plotters::style::RGBColor;

pub use forecast::render_forecast;
pub use trends::render_trends;

pub const TRENDS_FILE: &str = "market_trends.svg";

pub(crate) const FONT: &str = "sans-serif";

// Matplotlib "tab10" colours so the charts look familiar.
pub(crate) const TAB_BLUE: RGBColor = RGBColor(31, 119, 180);
pub(crate) const TAB_ORANGE: RGBColor = RGBColor(255, 127, 14);
pub(crate) const TAB_GREEN: RGBColor = RGBColor(44, 160, 44);
pub(crate) const TAB_RED: RGBColor = RGBColor(214, 39, 40);
pub(crate) const TAB_PURPLE: RGBColor = RGBColor(148, 103, 189);
pub(crate) const TAB_BROWN: RGBColor = RGBColor(140, 86, 75);
pub(crate) const TAB_GRAY: RGBColor = RGBColor(127, 127, 127);
pub(crate) const TAB_OLIVE: RGBColor = RGBColor(188, 189, 34);

/// One labelled polyline.
pub(crate) struct Line {
    pub label: String,
    pub color: RGBColor,
    pub points: Vec<(NaiveDate, f64)>,
}

impl Line {
    pub fn new(label: impl Into<String>, color: RGBColor, dates: &[NaiveDate], values: &[f64]) -> Self {
        Self {
            label: label.into(),
            color,
            points: dates.iter().copied().zip(values.iter().copied()).collect(),
        }
    }
}

/// Path of the forecast chart for `symbol` inside `dir`.
pub fn forecast_path(dir: &Path, symbol: &str) -> PathBuf {
    dir.join(format!("forecast_{symbol}.svg"))
}

/// Path of the trend chart inside `dir`.
pub fn trends_path(dir: &Path) -> PathBuf {
    dir.join(TRENDS_FILE)
}

pub(crate) fn ensure_parent(path: &Path) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("failed to create output directory {}", parent.display()))?;
    }
    Ok(())
}

/// plotters errors are generic over the backend; flatten them for anyhow.
pub(crate) fn chart_error(err: impl std::fmt::Display) -> anyhow::Error {
    anyhow::anyhow!("chart drawing failed: {err}")
}

/// Padded y-range covering every finite value. Falls back to `0..1` when
/// there is nothing to cover and widens a degenerate range.
pub(crate) fn value_bounds(values: impl IntoIterator<Item = f64>) -> Range<f64> {
    let (min, max) = values
        .into_iter()
        .filter(|v| v.is_finite())
        .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), v| {
            (lo.min(v), hi.max(v))
        });

    if !min.is_finite() {
        return 0.0..1.0;
    }
    if (max - min).abs() < f64::EPSILON {
        return (min - 1.0)..(max + 1.0);
    }
    let pad = (max - min) * 0.05;
    (min - pad)..(max + pad)
}

/// Date range spanning `first..=last`, at least one day wide.
pub(crate) fn date_bounds(first: NaiveDate, last: NaiveDate) -> Range<NaiveDate> {
    let end = if last > first { last } else { first + Duration::days(1) };
    first..end
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2022, 1, d).unwrap()
    }

    #[test]
    fn bounds_are_padded() {
        let r = value_bounds([10.0, 20.0, 15.0]);
        assert!((r.start - 9.5).abs() < 1e-10);
        assert!((r.end - 20.5).abs() < 1e-10);
    }

    #[test]
    fn bounds_skip_non_finite_values() {
        let r = value_bounds([f64::NAN, 1.0, f64::INFINITY, 3.0]);
        assert!(r.start < 1.0 && r.end > 3.0);
        assert!(r.end.is_finite());
    }

    #[test]
    fn degenerate_bounds_are_widened() {
        assert_eq!(value_bounds([5.0, 5.0]), 4.0..6.0);
        assert_eq!(value_bounds(std::iter::empty()), 0.0..1.0);
    }

    #[test]
    fn single_day_date_range_is_widened() {
        assert_eq!(date_bounds(date(3), date(3)), date(3)..date(4));
        assert_eq!(date_bounds(date(3), date(7)), date(3)..date(7));
    }

    #[test]
    fn output_paths() {
        let dir = Path::new("charts");
        assert_eq!(trends_path(dir), PathBuf::from("charts/market_trends.svg"));
        assert_eq!(forecast_path(dir, "AAPL"), PathBuf::from("charts/forecast_AAPL.svg"));
    }

    #[test]
    fn line_zips_dates_and_values() {
        let line = Line::new("Close", TAB_BLUE, &[date(3), date(4)], &[1.0, 2.0]);
        assert_eq!(line.points, vec![(date(3), 1.0), (date(4), 2.0)]);
        assert_eq!(line.label, "Close");
    }
}
