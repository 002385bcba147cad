pub mod quote_table;

// Re-export the table types for convenient access (e.g. `use crate::market_data::Quote`).
pub use quote_table::{DailyBar, PriceSeries, Quote, QuoteTable, SymbolHistory};
