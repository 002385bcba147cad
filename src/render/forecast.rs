// =============================================================================
// Forecast chart — historical close and the extrapolated trend
// =============================================================================

use std::path::Path;

use anyhow::Result;
use plotters::prelude::*;
use tracing::info;

use super::{chart_error, date_bounds, ensure_parent, value_bounds, Line, FONT, TAB_BLUE, TAB_ORANGE};
use crate::forecast::Forecast;
use crate::market_data::PriceSeries;

const WIDTH: u32 = 1200;
const HEIGHT: u32 = 600;

pub fn render_forecast(path: &Path, series: &PriceSeries, forecast: &Forecast) -> Result<()> {
    let first = series.dates.first().copied().or_else(|| forecast.first_date());
    let last = forecast.last_date().or_else(|| series.last_date());
    let (Some(first), Some(last)) = (first, last) else {
        anyhow::bail!("no data to chart for {}", series.symbol);
    };

    ensure_parent(path)?;

    let (dates, values): (Vec<_>, Vec<_>) = forecast.points.iter().copied().unzip();
    let lines = [
        Line::new("Historical Close", TAB_BLUE, &series.dates, &series.close),
        Line::new("Predicted Close", TAB_ORANGE, &dates, &values),
    ];
    let y_range = value_bounds(lines.iter().flat_map(|l| l.points.iter().map(|p| p.1)));

    let root = SVGBackend::new(path, (WIDTH, HEIGHT)).into_drawing_area();
    root.fill(&WHITE).map_err(chart_error)?;

    let mut chart = ChartBuilder::on(&root)
        .caption(format!("{} Stock Price Forecast", series.symbol), (FONT, 26))
        .margin(15)
        .x_label_area_size(40)
        .y_label_area_size(70)
        .build_cartesian_2d(date_bounds(first, last), y_range)
        .map_err(chart_error)?;

    chart
        .configure_mesh()
        .x_desc("Date")
        .y_desc("Close Price")
        .x_label_formatter(&|d| d.format("%Y-%m-%d").to_string())
        .draw()
        .map_err(chart_error)?;

    for line in lines {
        let color = line.color;
        chart
            .draw_series(LineSeries::new(line.points, color.stroke_width(2)))
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

    root.present().map_err(chart_error)?;
    info!(path = %path.display(), points = forecast.points.len(), "forecast chart written");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::forecast::build_forecast;
    use chrono::NaiveDate;

    #[test]
    fn writes_history_and_prediction() {
        let start = NaiveDate::from_ymd_opt(2021, 11, 1).unwrap();
        let closes: Vec<f64> = (0..30).map(|i| 150.0 + i as f64 * 0.7).collect();
        let series = PriceSeries {
            symbol: "AAPL".to_string(),
            dates: start.iter_days().take(closes.len()).collect(),
            open: closes.clone(),
            close: closes,
        };
        let forecast = build_forecast(&series, 90).unwrap();

        let dir = std::env::temp_dir().join(format!("stock_forecast_render_{}", std::process::id()));
        let path = dir.join("forecast_AAPL.svg");
        render_forecast(&path, &series, &forecast).unwrap();

        let svg = std::fs::read_to_string(&path).unwrap();
        assert!(svg.contains("<svg"));
        assert!(svg.contains("AAPL Stock Price Forecast"));
        assert!(svg.contains("Predicted Close"));
        std::fs::remove_dir_all(&dir).ok();
    }
}
