// =============================================================================
// Runtime Configuration — run parameters for both pipelines
// =============================================================================
//
// Resolution order, lowest priority first:
//   1. built-in defaults
//   2. optional JSON file (`stock_trends.json`, or `$STOCK_TRENDS_CONFIG`)
//   3. environment variables (a `.env` file is loaded by the binaries first)
//
// All fields carry `#[serde(default)]` so a config file only needs the keys it
// wants to change.
// =============================================================================

use std::path::{Path, PathBuf};

use anyhow::{ensure, Context, Result};
use chrono::NaiveDate;
use serde::{Deserialize, Deserializer, Serialize};
use tracing::info;

use crate::provider::DEFAULT_BASE_URL;
use crate::types::DateRange;

/// Default config file looked up in the working directory.
pub const DEFAULT_CONFIG_PATH: &str = "stock_trends.json";

/// Environment variable naming an alternative config file.
pub const CONFIG_PATH_ENV: &str = "STOCK_TRENDS_CONFIG";

const ENV_SYMBOLS: &str = "STOCK_SYMBOLS";
const ENV_START_DATE: &str = "STOCK_START_DATE";
const ENV_END_DATE: &str = "STOCK_END_DATE";
const ENV_OUTPUT_DIR: &str = "STOCK_OUTPUT_DIR";
const ENV_PROVIDER_URL: &str = "STOCK_PROVIDER_URL";

// =============================================================================
// Default-value helpers (required by serde `default = "..."` attribute)
// =============================================================================

fn ymd(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap_or_default()
}

fn default_provider_url() -> String {
    DEFAULT_BASE_URL.to_string()
}

fn default_output_dir() -> PathBuf {
    PathBuf::from("charts")
}

fn default_trend_symbols() -> Vec<String> {
    vec!["AAPL".to_string(), "MSFT".to_string(), "NFLX".to_string()]
}

fn default_trend_start() -> NaiveDate {
    ymd(2022, 1, 1)
}

fn default_trend_end() -> NaiveDate {
    ymd(2023, 1, 1)
}

fn default_forecast_symbols() -> Vec<String> {
    vec!["AAPL".to_string()]
}

fn default_forecast_start() -> NaiveDate {
    ymd(2015, 1, 1)
}

fn default_forecast_end() -> NaiveDate {
    ymd(2021, 12, 31)
}

fn default_sma_short() -> usize {
    50
}

fn default_sma_long() -> usize {
    200
}

fn default_bollinger_window() -> usize {
    20
}

fn default_bollinger_k() -> f64 {
    2.0
}

fn default_rsi_window() -> usize {
    20
}

fn default_horizon_days() -> u32 {
    90
}

// =============================================================================
// Pipeline selector
// =============================================================================

/// Which binary is running; selects the config section env overrides apply to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Pipeline {
    Trends,
    Forecast,
}

impl std::fmt::Display for Pipeline {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Trends => write!(f, "trends"),
            Self::Forecast => write!(f, "forecast"),
        }
    }
}

// =============================================================================
// IndicatorParams
// =============================================================================

/// Window lengths and band width for the indicator engine.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct IndicatorParams {
    #[serde(default = "default_sma_short")]
    pub sma_short: usize,

    #[serde(default = "default_sma_long")]
    pub sma_long: usize,

    #[serde(default = "default_bollinger_window")]
    pub bollinger_window: usize,

    /// Band half-width in standard deviations.
    #[serde(default = "default_bollinger_k")]
    pub bollinger_k: f64,

    #[serde(default = "default_rsi_window")]
    pub rsi_window: usize,
}

impl Default for IndicatorParams {
    fn default() -> Self {
        Self {
            sma_short: default_sma_short(),
            sma_long: default_sma_long(),
            bollinger_window: default_bollinger_window(),
            bollinger_k: default_bollinger_k(),
            rsi_window: default_rsi_window(),
        }
    }
}

impl IndicatorParams {
    fn validate(&self) -> Result<()> {
        ensure!(self.sma_short >= 1, "sma_short must be at least 1");
        ensure!(self.sma_long >= 1, "sma_long must be at least 1");
        ensure!(self.bollinger_window >= 1, "bollinger_window must be at least 1");
        ensure!(self.rsi_window >= 1, "rsi_window must be at least 1");
        ensure!(
            self.bollinger_k.is_finite() && self.bollinger_k > 0.0,
            "bollinger_k must be a positive number, got {}",
            self.bollinger_k
        );
        Ok(())
    }
}

// =============================================================================
// Pipeline sections
// =============================================================================

/// Parameters of the `trends` binary.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrendsConfig {
    #[serde(default = "default_trend_symbols", deserialize_with = "deserialize_symbols")]
    pub symbols: Vec<String>,

    #[serde(default = "default_trend_start")]
    pub start_date: NaiveDate,

    /// Exclusive.
    #[serde(default = "default_trend_end")]
    pub end_date: NaiveDate,

    #[serde(default)]
    pub indicators: IndicatorParams,
}

impl Default for TrendsConfig {
    fn default() -> Self {
        Self {
            symbols: default_trend_symbols(),
            start_date: default_trend_start(),
            end_date: default_trend_end(),
            indicators: IndicatorParams::default(),
        }
    }
}

/// Parameters of the `forecast` binary.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ForecastConfig {
    #[serde(default = "default_forecast_symbols", deserialize_with = "deserialize_symbols")]
    pub symbols: Vec<String>,

    #[serde(default = "default_forecast_start")]
    pub start_date: NaiveDate,

    /// Exclusive.
    #[serde(default = "default_forecast_end")]
    pub end_date: NaiveDate,

    /// Calendar days past the last close to extrapolate over.
    #[serde(default = "default_horizon_days")]
    pub horizon_days: u32,
}

impl Default for ForecastConfig {
    fn default() -> Self {
        Self {
            symbols: default_forecast_symbols(),
            start_date: default_forecast_start(),
            end_date: default_forecast_end(),
            horizon_days: default_horizon_days(),
        }
    }
}

// =============================================================================
// RuntimeConfig
// =============================================================================

/// Top-level configuration shared by both binaries.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RuntimeConfig {
    /// Base URL of the chart API.
    #[serde(default = "default_provider_url")]
    pub provider_url: String,

    /// Directory the SVG charts are written to.
    #[serde(default = "default_output_dir")]
    pub output_dir: PathBuf,

    #[serde(default)]
    pub trends: TrendsConfig,

    #[serde(default)]
    pub forecast: ForecastConfig,
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            provider_url: default_provider_url(),
            output_dir: default_output_dir(),
            trends: TrendsConfig::default(),
            forecast: ForecastConfig::default(),
        }
    }
}

impl RuntimeConfig {
    /// Load configuration from a JSON file at `path`.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();

        let content = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read config from {}", path.display()))?;

        let config: Self = serde_json::from_str(&content)
            .with_context(|| format!("failed to parse config from {}", path.display()))?;

        info!(path = %path.display(), "config file loaded");
        Ok(config)
    }

    /// Load `path` when it exists, otherwise start from the defaults. A file
    /// that exists but does not parse is still an error.
    pub fn load_or_default(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        if path.exists() {
            Self::load(path)
        } else {
            info!(path = %path.display(), "no config file, using defaults");
            Ok(Self::default())
        }
    }

    /// Apply overrides from the process environment.
    pub fn apply_env(&mut self, pipeline: Pipeline) -> Result<()> {
        self.apply_overrides(pipeline, |key| std::env::var(key).ok())
    }

    /// Apply overrides from `lookup`. Symbols and dates go to the section of
    /// `pipeline`; output dir and provider URL are shared.
    pub fn apply_overrides<F>(&mut self, pipeline: Pipeline, lookup: F) -> Result<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(url) = lookup(ENV_PROVIDER_URL) {
            self.provider_url = url;
        }
        if let Some(dir) = lookup(ENV_OUTPUT_DIR) {
            self.output_dir = PathBuf::from(dir);
        }

        let (symbols, start, end) = match pipeline {
            Pipeline::Trends => (
                &mut self.trends.symbols,
                &mut self.trends.start_date,
                &mut self.trends.end_date,
            ),
            Pipeline::Forecast => (
                &mut self.forecast.symbols,
                &mut self.forecast.start_date,
                &mut self.forecast.end_date,
            ),
        };

        if let Some(list) = lookup(ENV_SYMBOLS) {
            *symbols = parse_symbols(&list);
        }
        if let Some(raw) = lookup(ENV_START_DATE) {
            *start = parse_date(ENV_START_DATE, &raw)?;
        }
        if let Some(raw) = lookup(ENV_END_DATE) {
            *end = parse_date(ENV_END_DATE, &raw)?;
        }
        Ok(())
    }

    /// Symbols requested by `pipeline`.
    pub fn symbols(&self, pipeline: Pipeline) -> &[String] {
        match pipeline {
            Pipeline::Trends => &self.trends.symbols,
            Pipeline::Forecast => &self.forecast.symbols,
        }
    }

    /// Date range requested by `pipeline`.
    pub fn date_range(&self, pipeline: Pipeline) -> Result<DateRange> {
        let (start, end) = match pipeline {
            Pipeline::Trends => (self.trends.start_date, self.trends.end_date),
            Pipeline::Forecast => (self.forecast.start_date, self.forecast.end_date),
        };
        Ok(DateRange::new(start, end)?)
    }

    /// Reject parameters the pipeline cannot run with.
    pub fn validate(&self, pipeline: Pipeline) -> Result<()> {
        ensure!(
            !self.symbols(pipeline).is_empty(),
            "no symbols configured for {pipeline}"
        );
        self.date_range(pipeline)?;
        match pipeline {
            Pipeline::Trends => self.trends.indicators.validate()?,
            Pipeline::Forecast => ensure!(
                self.forecast.horizon_days >= 1,
                "horizon_days must be at least 1"
            ),
        }
        Ok(())
    }
}

/// Tickers are trimmed and upper-cased; blank entries are dropped. Applied to
/// both the config file and `STOCK_SYMBOLS`.
fn normalise_symbols<I, S>(raw: I) -> Vec<String>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    raw.into_iter()
        .map(|s| s.as_ref().trim().to_uppercase())
        .filter(|s| !s.is_empty())
        .collect()
}

fn deserialize_symbols<'de, D>(deserializer: D) -> std::result::Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Vec::<String>::deserialize(deserializer).map(normalise_symbols)
}

fn parse_symbols(list: &str) -> Vec<String> {
    normalise_symbols(list.split(','))
}

fn parse_date(key: &str, raw: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d")
        .with_context(|| format!("{key} must be YYYY-MM-DD, got {raw:?}"))
}
