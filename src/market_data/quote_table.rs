use std::collections::BTreeMap;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::FetchError;
use crate::types::DateRange;

// ---------------------------------------------------------------------------
// Data types
// ---------------------------------------------------------------------------

/// One day of OHLCV data for a single symbol. Any field may be absent when the
/// provider reports a gap; absence is never coerced to zero.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Quote {
    pub open: Option<f64>,
    pub high: Option<f64>,
    pub low: Option<f64>,
    pub close: Option<f64>,
    pub volume: Option<u64>,
}

/// A dated quote as returned by the provider for one symbol.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DailyBar {
    pub date: NaiveDate,
    pub quote: Quote,
}

/// Per-symbol history handed to [`QuoteTable::align`].
#[derive(Debug, Clone)]
pub struct SymbolHistory {
    pub symbol: String,
    pub bars: Vec<DailyBar>,
}

// ---------------------------------------------------------------------------
// QuoteTable -- aligned multi-symbol table
// ---------------------------------------------------------------------------

/// Multi-symbol quote table aligned on a shared, strictly increasing date
/// index. The index is the union of every date any symbol reported; a symbol
/// with no row for a date holds `None` in that cell.
#[derive(Debug, Clone, Default)]
pub struct QuoteTable {
    symbols: Vec<String>,
    dates: Vec<NaiveDate>,
    /// `rows[date_idx][symbol_idx]`
    rows: Vec<Vec<Option<Quote>>>,
}

impl QuoteTable {
    /// Merge per-symbol histories into one table. Symbols keep the order they
    /// are given in; a date reported twice for the same symbol keeps the last
    /// row.
    pub fn align(histories: Vec<SymbolHistory>) -> Self {
        let symbols: Vec<String> = histories.iter().map(|h| h.symbol.clone()).collect();
        let width = symbols.len();

        let mut by_date: BTreeMap<NaiveDate, Vec<Option<Quote>>> = BTreeMap::new();
        for (col, history) in histories.into_iter().enumerate() {
            for bar in history.bars {
                by_date.entry(bar.date).or_insert_with(|| vec![None; width])[col] =
                    Some(bar.quote);
            }
        }

        let (dates, rows): (Vec<_>, Vec<_>) = by_date.into_iter().unzip();
        debug!(symbols = width, rows = dates.len(), "quote table aligned");

        Self {
            symbols,
            dates,
            rows,
        }
    }

    pub fn symbols(&self) -> &[String] {
        &self.symbols
    }

    pub fn dates(&self) -> &[NaiveDate] {
        &self.dates
    }

    pub fn len(&self) -> usize {
        self.dates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.dates.is_empty()
    }

    /// All cells of the row at `idx`, in symbol order.
    pub fn row(&self, idx: usize) -> Option<&[Option<Quote>]> {
        self.rows.get(idx).map(Vec::as_slice)
    }

    /// Reject a table with no rows at all: every requested symbol came back
    /// without a trading day in `range`.
    pub fn non_empty(self, range: &DateRange) -> Result<Self, FetchError> {
        if self.is_empty() {
            return Err(FetchError::EmptyDataset {
                symbols: self.symbols,
                start: range.start(),
                end: range.end(),
            });
        }
        Ok(self)
    }

    fn column(&self, symbol: &str) -> Option<usize> {
        self.symbols.iter().position(|s| s == symbol)
    }

    /// Project the cleaned price series for one symbol.
    ///
    /// Rows whose open is absent or non-numeric are dropped, as are rows with
    /// no usable close. Cleaning is per symbol, so two symbols of the same
    /// table may retain different dates. Returns `None` for an unknown symbol.
    pub fn series(&self, symbol: &str) -> Option<PriceSeries> {
        let col = self.column(symbol)?;
        let mut series = PriceSeries::empty(symbol);
        let mut dropped = 0usize;

        for (date, row) in self.dates.iter().zip(&self.rows) {
            let Some(quote) = row[col] else { continue };
            match (finite(quote.open), finite(quote.close)) {
                (Some(open), Some(close)) => series.push(*date, open, close),
                _ => dropped += 1,
            }
        }

        if dropped > 0 {
            debug!(symbol, dropped, "rows without a numeric open/close dropped");
        }
        Some(series)
    }
}

fn finite(value: Option<f64>) -> Option<f64> {
    value.filter(|v| v.is_finite())
}

// ---------------------------------------------------------------------------
// PriceSeries -- gap-free per-symbol projection
// ---------------------------------------------------------------------------

/// Cleaned per-symbol series: parallel `dates`, `open` and `close` vectors with
/// strictly increasing dates and only finite prices.
#[derive(Debug, Clone, PartialEq)]
pub struct PriceSeries {
    pub symbol: String,
    pub dates: Vec<NaiveDate>,
    pub open: Vec<f64>,
    pub close: Vec<f64>,
}

impl PriceSeries {
    pub fn empty(symbol: impl Into<String>) -> Self {
        Self {
            symbol: symbol.into(),
            dates: Vec::new(),
            open: Vec::new(),
            close: Vec::new(),
        }
    }

    fn push(&mut self, date: NaiveDate, open: f64, close: f64) {
        self.dates.push(date);
        self.open.push(open);
        self.close.push(close);
    }

    pub fn len(&self) -> usize {
        self.dates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.dates.is_empty()
    }

    pub fn last_date(&self) -> Option<NaiveDate> {
        self.dates.last().copied()
    }

    pub fn last_close(&self) -> Option<f64> {
        self.close.last().copied()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
