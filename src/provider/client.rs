// =============================================================================
// Yahoo Finance chart API client — daily OHLCV history
// =============================================================================
//
// One unauthenticated GET per symbol against /v8/finance/chart. Requests are
// issued one at a time and never retried: a failed run is simply re-run.
// =============================================================================

use std::time::Duration;

use reqwest::{StatusCode, Url};
use tracing::{debug, info, instrument, warn};

use crate::error::FetchError;
use crate::market_data::{DailyBar, QuoteTable, SymbolHistory};
use crate::provider::chart::parse_chart_response;
use crate::types::DateRange;

/// Default public endpoint of the chart API.
pub const DEFAULT_BASE_URL: &str = "https://query1.finance.yahoo.com";

/// The chart API rejects requests without a browser-like agent.
const USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36";

const REQUEST_TIMEOUT: Duration = Duration::from_secs(20);

/// Market-data client for daily quotes.
#[derive(Clone)]
pub struct YahooClient {
    base_url: Url,
    client: reqwest::Client,
}

impl YahooClient {
    // -------------------------------------------------------------------------
    // Construction
    // -------------------------------------------------------------------------

    /// Create a client against `base_url` (no trailing slash required).
    pub fn new(base_url: impl Into<String>) -> Result<Self, FetchError> {
        let raw = base_url.into();
        let base_url = Url::parse(&raw).map_err(|e| FetchError::InvalidBaseUrl {
            url: raw.clone(),
            reason: e.to_string(),
        })?;
        if base_url.cannot_be_a_base() {
            return Err(FetchError::InvalidBaseUrl {
                url: raw,
                reason: "not a hierarchical URL".to_string(),
            });
        }

        let client = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .timeout(REQUEST_TIMEOUT)
            .build()
            .map_err(FetchError::Client)?;

        debug!(base_url = %base_url, "YahooClient initialised");

        Ok(Self { base_url, client })
    }

    /// `{base}/v8/finance/chart/{symbol}` with the symbol percent-encoded as a
    /// single path segment.
    fn chart_url(&self, symbol: &str, range: &DateRange) -> Result<Url, FetchError> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|()| FetchError::InvalidBaseUrl {
                url: self.base_url.to_string(),
                reason: "not a hierarchical URL".to_string(),
            })?
            .pop_if_empty()
            .extend(["v8", "finance", "chart", symbol]);
        url.query_pairs_mut()
            .append_pair("period1", &range.start_unix().to_string())
            .append_pair("period2", &range.end_unix().to_string())
            .append_pair("interval", "1d")
            .append_pair("events", "history");
        Ok(url)
    }

    // -------------------------------------------------------------------------
    // Daily history
    // -------------------------------------------------------------------------

    /// GET /v8/finance/chart/{symbol} — daily bars inside `range`.
    ///
    /// An empty vector means the provider knows the symbol but had no trading
    /// days in the range.
    #[instrument(skip(self, range), fields(range = %range), name = "yahoo::get_daily_bars")]
    pub async fn get_daily_bars(
        &self,
        symbol: &str,
        range: &DateRange,
    ) -> Result<Vec<DailyBar>, FetchError> {
        let url = self.chart_url(symbol, range)?;

        let resp = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|source| FetchError::Network {
                symbol: symbol.to_string(),
                source,
            })?;

        let status = resp.status();
        let text = resp.text().await.map_err(|source| FetchError::Network {
            symbol: symbol.to_string(),
            source,
        })?;

        let bars = classify_response(symbol, status, &text, range)?;
        debug!(symbol, count = bars.len(), "daily bars fetched");
        Ok(bars)
    }

    /// Fetch every symbol in turn and align the results into one table.
    ///
    /// Fails on the first symbol that errors, and with
    /// [`FetchError::EmptyDataset`] when no symbol produced a single row.
    pub async fn fetch_table(
        &self,
        symbols: &[String],
        range: &DateRange,
    ) -> Result<QuoteTable, FetchError> {
        let mut histories = Vec::with_capacity(symbols.len());

        for symbol in symbols {
            let bars = self.get_daily_bars(symbol, range).await?;
            if bars.is_empty() {
                warn!(symbol = %symbol, range = %range, "no trading days returned");
            }
            histories.push(SymbolHistory {
                symbol: symbol.clone(),
                bars,
            });
        }

        let table = QuoteTable::align(histories).non_empty(range)?;

        info!(
            symbols = ?table.symbols(),
            rows = table.len(),
            "quote table ready"
        );
        Ok(table)
    }
}

/// Map an HTTP status and body to bars or a typed error.
///
/// - 404                      => `InvalidSymbol`
/// - non-JSON body, non-2xx   => `Provider`
/// - non-JSON body, 2xx       => `MalformedResponse`
/// - `chart.error` in body    => `InvalidSymbol` / `Provider` (more specific
///   than the status line, so checked first)
/// - any other non-2xx        => `Provider`
pub(crate) fn classify_response(
    symbol: &str,
    status: StatusCode,
    text: &str,
    range: &DateRange,
) -> Result<Vec<DailyBar>, FetchError> {
    if status == StatusCode::NOT_FOUND {
        return Err(FetchError::InvalidSymbol(symbol.to_string()));
    }

    let provider_error = || FetchError::Provider {
        symbol: symbol.to_string(),
        message: format!("HTTP {status}"),
    };

    let body: serde_json::Value = match serde_json::from_str(text) {
        Ok(body) => body,
        Err(_) if !status.is_success() => return Err(provider_error()),
        Err(e) => return Err(FetchError::malformed(symbol, e.to_string())),
    };

    let bars = parse_chart_response(symbol, &body, range)?;
    if !status.is_success() {
        return Err(provider_error());
    }
    Ok(bars)
}

impl std::fmt::Debug for YahooClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("YahooClient")
            .field("base_url", &self.base_url.as_str())
            .finish()
    }
}
