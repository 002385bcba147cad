// =============================================================================
// Stock Trends — library root
// =============================================================================
//
// Shared building blocks for the two pipeline binaries:
//
//   trends   : fetch -> indicators -> console report -> trend chart
//   forecast : fetch -> linear forecast -> console report -> forecast chart
//
// Everything runs once per invocation; nothing is persisted between runs.
// =============================================================================

pub mod error;
pub mod forecast;
pub mod indicators;
pub mod market_data;
pub mod pipeline;
pub mod provider;
pub mod render;
pub mod report;
pub mod runtime_config;
pub mod types;
