// =============================================================================
// Chart payload parsing
// =============================================================================
//
// Expected shape (abridged):
//
//   { "chart": {
//       "result": [{
//         "meta": { "symbol": "AAPL", "gmtoffset": -18000, ... },
//         "timestamp": [1641220200, ...],
//         "indicators": { "quote": [{
//           "open": [...], "high": [...], "low": [...],
//           "close": [...], "volume": [...]
//         }]}
//       }],
//       "error": null
//   }}
//
// `timestamp` is omitted entirely when the range holds no trading days.
// Individual array entries are `null` for gaps.
// =============================================================================

use chrono::{DateTime, NaiveDate};
use serde_json::Value;

use crate::error::FetchError;
use crate::market_data::{DailyBar, Quote};
use crate::types::DateRange;

/// Parse a chart response body into daily bars that fall inside `range`.
pub fn parse_chart_response(
    symbol: &str,
    body: &Value,
    range: &DateRange,
) -> Result<Vec<DailyBar>, FetchError> {
    let chart = body
        .get("chart")
        .ok_or_else(|| FetchError::malformed(symbol, "missing field chart"))?;

    if let Some(err) = chart.get("error").filter(|e| !e.is_null()) {
        let code = err["code"].as_str().unwrap_or("unknown");
        let description = err["description"].as_str().unwrap_or("");
        if code.eq_ignore_ascii_case("Not Found") {
            return Err(FetchError::InvalidSymbol(symbol.to_string()));
        }
        return Err(FetchError::Provider {
            symbol: symbol.to_string(),
            message: format!("{code}: {description}"),
        });
    }

    let result = chart["result"]
        .as_array()
        .and_then(|r| r.first())
        .ok_or_else(|| FetchError::malformed(symbol, "missing chart.result[0]"))?;

    let timestamps = match result.get("timestamp") {
        None | Some(Value::Null) => return Ok(Vec::new()),
        Some(ts) => ts
            .as_array()
            .ok_or_else(|| FetchError::malformed(symbol, "timestamp is not an array"))?,
    };

    // Dates are taken in exchange-local time so a 09:30 New York open does
    // not slip to the previous UTC day.
    let gmt_offset = result["meta"]["gmtoffset"].as_i64().unwrap_or(0);

    let quote = &result["indicators"]["quote"][0];
    if !quote.is_object() {
        return Err(FetchError::malformed(symbol, "missing indicators.quote[0]"));
    }

    let len = timestamps.len();
    let open = price_column(symbol, quote, "open", len)?;
    let high = price_column(symbol, quote, "high", len)?;
    let low = price_column(symbol, quote, "low", len)?;
    let close = price_column(symbol, quote, "close", len)?;
    let volume = volume_column(symbol, quote, len)?;

    let mut bars = Vec::with_capacity(len);
    for (i, ts) in timestamps.iter().enumerate() {
        let date = local_date(symbol, ts, gmt_offset)?;
        if !range.contains(date) {
            continue;
        }
        bars.push(DailyBar {
            date,
            quote: Quote {
                open: open[i],
                high: high[i],
                low: low[i],
                close: close[i],
                volume: volume[i],
            },
        });
    }

    Ok(bars)
}

fn local_date(symbol: &str, ts: &Value, gmt_offset: i64) -> Result<NaiveDate, FetchError> {
    let secs = ts
        .as_i64()
        .ok_or_else(|| FetchError::malformed(symbol, format!("bad timestamp {ts}")))?;
    secs.checked_add(gmt_offset)
        .and_then(|local| DateTime::from_timestamp(local, 0))
        .map(|dt| dt.date_naive())
        .ok_or_else(|| FetchError::malformed(symbol, format!("timestamp {secs} out of range")))
}

fn column<'a>(
    symbol: &str,
    quote: &'a Value,
    name: &str,
    len: usize,
) -> Result<&'a Vec<Value>, FetchError> {
    let values = quote[name]
        .as_array()
        .ok_or_else(|| FetchError::malformed(symbol, format!("missing column {name}")))?;
    if values.len() != len {
        return Err(FetchError::malformed(
            symbol,
            format!("column {name} has {} rows, expected {len}", values.len()),
        ));
    }
    Ok(values)
}

fn price_column(
    symbol: &str,
    quote: &Value,
    name: &str,
    len: usize,
) -> Result<Vec<Option<f64>>, FetchError> {
    Ok(column(symbol, quote, name, len)?
        .iter()
        .map(Value::as_f64)
        .collect())
}

fn volume_column(symbol: &str, quote: &Value, len: usize) -> Result<Vec<Option<u64>>, FetchError> {
    Ok(column(symbol, quote, "volume", len)?
        .iter()
        .map(|v| v.as_u64().or_else(|| v.as_f64().map(|f| f.max(0.0) as u64)))
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn range() -> DateRange {
        DateRange::new(
            NaiveDate::from_ymd_opt(2022, 1, 1).unwrap(),
            NaiveDate::from_ymd_opt(2022, 1, 6).unwrap(),
        )
        .unwrap()
    }

    fn parse(json: &str) -> Result<Vec<DailyBar>, FetchError> {
        let body: Value = serde_json::from_str(json).unwrap();
        parse_chart_response("AAPL", &body, &range())
    }

    // 2022-01-03, 01-04, 01-05 and 01-06 at 09:30 New York (14:30 UTC).
    const THREE_DAYS_AND_ONE_PAST_END: &str = r#"{
        "chart": {
            "result": [{
                "meta": { "symbol": "AAPL", "gmtoffset": -18000 },
                "timestamp": [1641220200, 1641306600, 1641393000, 1641479400],
                "indicators": { "quote": [{
                    "open":   [177.83, null, 179.61, 172.70],
                    "high":   [182.88, 182.94, 180.17, 175.30],
                    "low":    [177.71, 179.12, 174.64, 171.64],
                    "close":  [182.01, 179.70, null, 172.00],
                    "volume": [104487900, 99310400, 94537600, 96904000]
                }]}
            }],
            "error": null
        }
    }"#;

    #[test]
    fn parses_rows_and_maps_null_to_absent() {
        let bars = parse(THREE_DAYS_AND_ONE_PAST_END).unwrap();
        assert_eq!(bars.len(), 3);

        assert_eq!(bars[0].date, NaiveDate::from_ymd_opt(2022, 1, 3).unwrap());
        assert_eq!(bars[0].quote.open, Some(177.83));
        assert_eq!(bars[0].quote.volume, Some(104_487_900));

        assert_eq!(bars[1].quote.open, None);
        assert_eq!(bars[1].quote.close, Some(179.70));
        assert_eq!(bars[2].quote.close, None);
    }

    #[test]
    fn rows_on_or_after_end_are_discarded() {
        let bars = parse(THREE_DAYS_AND_ONE_PAST_END).unwrap();
        let last = bars.last().unwrap().date;
        assert_eq!(last, NaiveDate::from_ymd_opt(2022, 1, 5).unwrap());
    }

    #[test]
    fn missing_timestamp_means_no_trading_days() {
        let json = r#"{
            "chart": {
                "result": [{
                    "meta": { "symbol": "AAPL", "gmtoffset": -18000 },
                    "indicators": { "quote": [{}] }
                }],
                "error": null
            }
        }"#;
        assert!(parse(json).unwrap().is_empty());
    }

    #[test]
    fn overflowing_timestamp_is_malformed() {
        let json = r#"{
            "chart": {
                "result": [{
                    "meta": { "symbol": "AAPL", "gmtoffset": 3600 },
                    "timestamp": [9223372036854775807],
                    "indicators": { "quote": [{
                        "open": [1.0], "high": [1.0], "low": [1.0],
                        "close": [1.0], "volume": [1]
                    }]}
                }],
                "error": null
            }
        }"#;
        assert!(matches!(parse(json), Err(FetchError::MalformedResponse { .. })));
    }

    #[test]
    fn not_found_error_is_invalid_symbol() {
        let json = r#"{
            "chart": {
                "result": null,
                "error": { "code": "Not Found", "description": "No data found, symbol may be delisted" }
            }
        }"#;
        assert!(matches!(parse(json), Err(FetchError::InvalidSymbol(s)) if s == "AAPL"));
    }

    #[test]
    fn other_chart_error_is_provider_error() {
        let json = r#"{
            "chart": {
                "result": null,
                "error": { "code": "Bad Request", "description": "Invalid input - interval=1x is not supported" }
            }
        }"#;
        match parse(json) {
            Err(FetchError::Provider { message, .. }) => assert!(message.starts_with("Bad Request")),
            other => panic!("expected provider error, got {other:?}"),
        }
    }

    #[test]
    fn mismatched_columns_are_malformed() {
        let json = r#"{
            "chart": {
                "result": [{
                    "meta": { "gmtoffset": 0 },
                    "timestamp": [1641220200, 1641306600],
                    "indicators": { "quote": [{
                        "open": [1.0], "high": [1.0, 1.0], "low": [1.0, 1.0],
                        "close": [1.0, 1.0], "volume": [1, 1]
                    }]}
                }],
                "error": null
            }
        }"#;
        assert!(matches!(parse(json), Err(FetchError::MalformedResponse { .. })));
    }

    #[test]
    fn missing_chart_is_malformed() {
        assert!(matches!(parse("{}"), Err(FetchError::MalformedResponse { .. })));
    }
}
