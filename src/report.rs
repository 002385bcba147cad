// =============================================================================
// Console Reporter
// =============================================================================
//
// Human-readable tables on stdout. The format is for people, not parsers:
// long tables are elided in the middle (first and last HEAD_ROWS rows) and
// absent values print as `-`.
//
// Every writer takes `impl Write` so the binaries pass a locked stdout and the
// tests pass a `Vec<u8>`.
// =============================================================================

use std::io::{self, Write};

use crate::forecast::Forecast;
use crate::indicators::IndicatorSet;
use crate::market_data::{PriceSeries, Quote, QuoteTable};
use crate::runtime_config::IndicatorParams;

/// Rows printed at each end of an elided table.
const HEAD_ROWS: usize = 5;

const DATE_WIDTH: usize = 10;
const CELL_WIDTH: usize = 12;

// =============================================================================
// Historical quote table
// =============================================================================

pub fn write_quote_table<W: Write>(out: &mut W, table: &QuoteTable) -> io::Result<()> {
    writeln!(out, "Historical Stock Price")?;

    // Two header lines: symbol, then field.
    write!(out, "{:<DATE_WIDTH$}", "")?;
    for symbol in table.symbols() {
        for _ in 0..5 {
            write!(out, " {symbol:>CELL_WIDTH$}")?;
        }
    }
    writeln!(out)?;
    write!(out, "{:<DATE_WIDTH$}", "Date")?;
    for _ in table.symbols() {
        for field in ["Open", "High", "Low", "Close", "Volume"] {
            write!(out, " {field:>CELL_WIDTH$}")?;
        }
    }
    writeln!(out)?;

    let len = table.len();
    for idx in visible_rows(len) {
        let Some(idx) = idx else {
            writeln!(out, "{:<DATE_WIDTH$}", "...")?;
            continue;
        };
        write!(out, "{}", table.dates()[idx])?;
        if let Some(row) = table.row(idx) {
            for cell in row {
                write_quote_cells(out, cell.as_ref())?;
            }
        }
        writeln!(out)?;
    }

    writeln!(
        out,
        "[{len} rows x {} columns]",
        table.symbols().len() * 5
    )?;
    writeln!(out)
}

fn write_quote_cells<W: Write>(out: &mut W, quote: Option<&Quote>) -> io::Result<()> {
    let q = quote.copied().unwrap_or_default();
    for price in [q.open, q.high, q.low, q.close] {
        write!(out, " {:>CELL_WIDTH$}", fmt_price(price))?;
    }
    let volume = q.volume.map_or_else(|| "-".to_string(), |v| v.to_string());
    write!(out, " {volume:>CELL_WIDTH$}")
}

/// Row indices to print; `None` marks the elision line.
fn visible_rows(len: usize) -> Vec<Option<usize>> {
    if len <= HEAD_ROWS * 2 {
        return (0..len).map(Some).collect();
    }
    (0..HEAD_ROWS)
        .map(Some)
        .chain(std::iter::once(None))
        .chain((len - HEAD_ROWS..len).map(Some))
        .collect()
}

fn fmt_price(value: Option<f64>) -> String {
    match value {
        Some(v) if v.is_finite() => format!("{v:.2}"),
        _ => "-".to_string(),
    }
}

// =============================================================================
// Indicator summary
// =============================================================================

pub fn write_indicator_summary<W: Write>(
    out: &mut W,
    series: &PriceSeries,
    set: &IndicatorSet,
    params: &IndicatorParams,
) -> io::Result<()> {
    writeln!(out, "{} ({} trading days)", series.symbol, series.len())?;

    let (Some(date), Some(close)) = (series.last_date(), series.last_close()) else {
        writeln!(out, "  no usable rows")?;
        return writeln!(out);
    };

    writeln!(out, "  {:<16} {close:>10.2}  ({date})", "Last close")?;
    if let Some(v) = set.sma_short.last() {
        writeln!(out, "  {:<16} {v:>10.2}", format!("SMA {}", params.sma_short))?;
    }
    if let Some(v) = set.sma_long.last() {
        writeln!(out, "  {:<16} {v:>10.2}", format!("SMA {}", params.sma_long))?;
    }
    let last_band = set.bollinger.len().checked_sub(1).and_then(|i| set.bollinger.at(i));
    if let Some((upper, middle, lower)) = last_band {
        writeln!(
            out,
            "  {:<16} {lower:>10.2} / {middle:.2} / {upper:.2}",
            format!("Bollinger {}", params.bollinger_window)
        )?;
    }
    if let Some((rsi, label)) = set.latest_rsi() {
        writeln!(
            out,
            "  {:<16} {rsi:>10.2}  {label}",
            format!("RSI {}", params.rsi_window)
        )?;
    }
    writeln!(out)
}

// =============================================================================
// Forecast table
// =============================================================================

pub fn write_forecast<W: Write>(out: &mut W, forecast: &Forecast) -> io::Result<()> {
    writeln!(out, "Predicted Future Closing Prices ({})", forecast.symbol)?;
    writeln!(
        out,
        "Trend line: close = {:.4} + {:.4} * day",
        forecast.model.intercept, forecast.model.slope
    )?;
    writeln!(out, "{:<DATE_WIDTH$} {:>CELL_WIDTH$}", "Date", "Close")?;
    for (date, value) in &forecast.points {
        writeln!(out, "{date} {value:>CELL_WIDTH$.2}")?;
    }
    writeln!(out, "[{} rows]", forecast.points.len())?;
    writeln!(out)
}
