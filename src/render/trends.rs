// =============================================================================
// Trend chart — one stacked panel per symbol
// =============================================================================
//
// Primary y-axis:   Open, Close
// Secondary y-axis: SMA short/long, Bollinger upper/middle/lower, RSI
//
// RSI (0..100) shares the secondary axis with the overlays, so on high-priced
// symbols it sits near the bottom of the panel.

use std::path::Path;

use anyhow::Result;
use plotters::prelude::*;
use tracing::{debug, info};

use super::{
    chart_error, date_bounds, ensure_parent, value_bounds, Line, FONT, TAB_BLUE, TAB_BROWN,
    TAB_GRAY, TAB_GREEN, TAB_OLIVE, TAB_ORANGE, TAB_PURPLE, TAB_RED,
};
use crate::indicators::IndicatorSet;
use crate::market_data::PriceSeries;
use crate::runtime_config::IndicatorParams;

const WIDTH: u32 = 1400;
const PANEL_HEIGHT: u32 = 420;

/// Write the multi-panel trend chart to `path`. `panels` pairs each cleaned
/// series with the indicators computed from it.
pub fn render_trends(
    path: &Path,
    panels: &[(PriceSeries, IndicatorSet)],
    params: &IndicatorParams,
) -> Result<()> {
    ensure_parent(path)?;

    let first = panels.iter().filter_map(|(s, _)| s.dates.first()).min().copied();
    let last = panels.iter().filter_map(|(s, _)| s.last_date()).max();
    let (Some(first), Some(last)) = (first, last) else {
        anyhow::bail!("no price data to chart");
    };
    let x_range = date_bounds(first, last);

    let rows = panels.len().max(1);
    let height = PANEL_HEIGHT * rows as u32;

    let root = SVGBackend::new(path, (WIDTH, height)).into_drawing_area();
    root.fill(&WHITE).map_err(chart_error)?;

    for (area, (series, set)) in root.split_evenly((rows, 1)).iter().zip(panels) {
        if series.is_empty() {
            area.titled(&format!("{}: no usable rows", series.symbol), (FONT, 22))
                .map_err(chart_error)?;
            continue;
        }

        let primary = vec![
            Line::new("Open", TAB_BLUE, &series.dates, &series.open),
            Line::new("Close", TAB_ORANGE, &series.dates, &series.close),
        ];
        let secondary = vec![
            Line::new(format!("SMA {}", params.sma_short), TAB_GREEN, &series.dates, &set.sma_short),
            Line::new(format!("SMA {}", params.sma_long), TAB_RED, &series.dates, &set.sma_long),
            Line::new("Upper Band", TAB_PURPLE, &series.dates, &set.bollinger.upper),
            Line::new("Middle Band", TAB_GRAY, &series.dates, &set.bollinger.middle),
            Line::new("Lower Band", TAB_OLIVE, &series.dates, &set.bollinger.lower),
            Line::new(format!("RSI {}", params.rsi_window), TAB_BROWN, &series.dates, &set.rsi),
        ];

        let y_range = value_bounds(primary.iter().flat_map(|l| l.points.iter().map(|p| p.1)));
        let y2_range = value_bounds(secondary.iter().flat_map(|l| l.points.iter().map(|p| p.1)));

        let mut chart = ChartBuilder::on(area)
            .caption(&series.symbol, (FONT, 22))
            .margin(10)
            .x_label_area_size(35)
            .y_label_area_size(60)
            .right_y_label_area_size(60)
            .build_cartesian_2d(x_range.clone(), y_range)
            .map_err(chart_error)?
            .set_secondary_coord(x_range.clone(), y2_range);

        chart
            .configure_mesh()
            .x_desc("Date")
            .y_desc("Price")
            .x_label_formatter(&|d| d.format("%Y-%m-%d").to_string())
            .draw()
            .map_err(chart_error)?;
        chart
            .configure_secondary_axes()
            .y_desc("Price / RSI")
            .draw()
            .map_err(chart_error)?;

        for line in primary {
            let color = line.color;
            chart
                .draw_series(LineSeries::new(line.points, color.stroke_width(2)))
                .map_err(chart_error)?
                .label(line.label)
                .legend(move |(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], color));
        }
        for line in secondary {
            let color = line.color;
            chart
                .draw_secondary_series(LineSeries::new(line.points, color.stroke_width(1)))
                .map_err(chart_error)?
                .label(line.label)
                .legend(move |(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], color));
        }

        chart
            .configure_series_labels()
            .position(SeriesLabelPosition::UpperLeft)
            .background_style(WHITE.mix(0.8))
            .border_style(BLACK)
            .draw()
            .map_err(chart_error)?;

        debug!(symbol = %series.symbol, points = series.len(), "trend panel drawn");
    }

    root.present().map_err(chart_error)?;
    info!(path = %path.display(), panels = panels.len(), "trend chart written");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn series(symbol: &str, closes: &[f64]) -> PriceSeries {
        let start = NaiveDate::from_ymd_opt(2022, 1, 3).unwrap();
        PriceSeries {
            symbol: symbol.to_string(),
            dates: start.iter_days().take(closes.len()).collect(),
            open: closes.iter().map(|c| c - 0.5).collect(),
            close: closes.to_vec(),
        }
    }

    #[test]
    fn writes_one_panel_per_symbol() {
        let params = IndicatorParams::default();
        let panels: Vec<(PriceSeries, IndicatorSet)> = [("AAPL", 150.0), ("MSFT", 300.0)]
            .iter()
            .map(|(sym, base)| {
                let closes: Vec<f64> = (0..40).map(|i| base + (i as f64 * 0.4).sin() * 3.0).collect();
                let s = series(sym, &closes);
                let set = IndicatorSet::compute(&s, &params);
                (s, set)
            })
            .collect();

        let dir = std::env::temp_dir().join(format!("stock_trends_render_{}", std::process::id()));
        let path = dir.join("market_trends.svg");
        render_trends(&path, &panels, &params).unwrap();

        let svg = std::fs::read_to_string(&path).unwrap();
        assert!(svg.contains("<svg"));
        assert!(svg.contains("AAPL"));
        assert!(svg.contains("MSFT"));
        assert!(svg.contains("Upper Band"));
        std::fs::remove_dir_all(&dir).ok();
    }

    #[test]
    fn nothing_to_chart_is_an_error() {
        let params = IndicatorParams::default();
        let empty = PriceSeries::empty("AAPL");
        let set = IndicatorSet::compute(&empty, &params);
        let path = std::env::temp_dir().join("stock_trends_never_written.svg");
        assert!(render_trends(&path, &[(empty, set)], &params).is_err());
        assert!(!path.exists());
    }
}
