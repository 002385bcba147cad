// =============================================================================
// Typed errors for the fetch and forecast stages
// =============================================================================
//
// Library boundaries that a caller may want to branch on return these enums.
// The binaries and the rendering glue wrap them in `anyhow::Error`.

use chrono::NaiveDate;
use thiserror::Error;

/// Failure while retrieving quotes from the market-data provider.
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("invalid date range: start {start} is not before end {end}")]
    InvalidRange { start: NaiveDate, end: NaiveDate },

    #[error("failed to build HTTP client")]
    Client(#[source] reqwest::Error),

    #[error("invalid provider URL {url}: {reason}")]
    InvalidBaseUrl { url: String, reason: String },

    #[error("request for {symbol} failed")]
    Network {
        symbol: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("unknown symbol {0}")]
    InvalidSymbol(String),

    #[error("provider rejected request for {symbol}: {message}")]
    Provider { symbol: String, message: String },

    #[error("malformed response for {symbol}: {reason}")]
    MalformedResponse { symbol: String, reason: String },

    #[error("no quotes returned for {symbols:?} in [{start}, {end})")]
    EmptyDataset {
        symbols: Vec<String>,
        start: NaiveDate,
        end: NaiveDate,
    },
}

impl FetchError {
    pub(crate) fn malformed(symbol: &str, reason: impl Into<String>) -> Self {
        Self::MalformedResponse {
            symbol: symbol.to_string(),
            reason: reason.into(),
        }
    }
}

/// Failure while fitting the trend line.
#[derive(Debug, Error, PartialEq)]
pub enum ForecastError {
    #[error("cannot fit a trend line to an empty series")]
    EmptySeries,
}
