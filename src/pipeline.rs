// =============================================================================
// Pipelines — the fetch -> transform -> present runs behind both binaries
// =============================================================================
//
// Each run is linear and single-shot: one config, one fetch, one report, one
// set of charts. Any failure aborts the run and propagates to `main`, which
// prints the error chain and exits non-zero.
// =============================================================================

use std::io::{self, Write};
use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use crate::forecast::build_forecast;
use crate::indicators::IndicatorSet;
use crate::market_data::QuoteTable;
use crate::provider::YahooClient;
use crate::render::{forecast_path, render_forecast, render_trends, trends_path};
use crate::report::{write_forecast, write_indicator_summary, write_quote_table};
use crate::runtime_config::{Pipeline, RuntimeConfig, CONFIG_PATH_ENV, DEFAULT_CONFIG_PATH};

/// Install the global tracing subscriber. `RUST_LOG` overrides the default
/// `info` level; logs go to stderr so stdout carries only the report.
pub fn init_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(io::stderr)
        .init();
}

/// Resolve defaults, config file and environment for `pipeline`.
pub fn load_config(pipeline: Pipeline) -> Result<RuntimeConfig> {
    let mut config = match std::env::var(CONFIG_PATH_ENV).ok() {
        // An explicitly named file must exist.
        Some(path) => RuntimeConfig::load(&path)?,
        None => RuntimeConfig::load_or_default(DEFAULT_CONFIG_PATH)?,
    };

    config.apply_env(pipeline)?;
    config
        .validate(pipeline)
        .with_context(|| format!("invalid {pipeline} configuration"))?;

    info!(
        %pipeline,
        symbols = ?config.symbols(pipeline),
        output_dir = %config.output_dir.display(),
        "configuration resolved"
    );
    Ok(config)
}

async fn fetch(config: &RuntimeConfig, pipeline: Pipeline) -> Result<QuoteTable> {
    let range = config.date_range(pipeline)?;
    let client = YahooClient::new(config.provider_url.as_str())?;
    let table = client
        .fetch_table(config.symbols(pipeline), &range)
        .await
        .context("failed to fetch market data")?;
    Ok(table)
}

// =============================================================================
// trends
// =============================================================================

/// Fetch, compute indicators, print the report and write the trend chart.
/// Returns the chart path.
pub async fn run_trends(config: &RuntimeConfig) -> Result<PathBuf> {
    let table = fetch(config, Pipeline::Trends).await?;
    let params = &config.trends.indicators;

    let panels: Vec<_> = table
        .symbols()
        .iter()
        .filter_map(|symbol| table.series(symbol))
        .map(|series| {
            let set = IndicatorSet::compute(&series, params);
            (series, set)
        })
        .collect();

    {
        let stdout = io::stdout();
        let mut out = stdout.lock();
        write_quote_table(&mut out, &table).context("failed to write quote table")?;
        for (series, set) in &panels {
            write_indicator_summary(&mut out, series, set, params)
                .context("failed to write indicator summary")?;
        }
        out.flush().context("failed to flush stdout")?;
    }

    let path = trends_path(&config.output_dir);
    render_trends(&path, &panels, params)
        .with_context(|| format!("failed to render {}", path.display()))?;
    Ok(path)
}

// =============================================================================
// forecast
// =============================================================================

/// Fetch, fit and extrapolate each symbol, print the forecast tables and write
/// one chart per symbol. Returns the chart paths.
pub async fn run_forecast(config: &RuntimeConfig) -> Result<Vec<PathBuf>> {
    let table = fetch(config, Pipeline::Forecast).await?;
    let horizon = config.forecast.horizon_days;

    {
        let stdout = io::stdout();
        let mut out = stdout.lock();
        write_quote_table(&mut out, &table).context("failed to write quote table")?;
        out.flush().context("failed to flush stdout")?;
    }

    let mut written = Vec::new();
    for symbol in table.symbols() {
        let Some(series) = table.series(symbol).filter(|s| !s.is_empty()) else {
            warn!(%symbol, "no usable closes, skipping forecast");
            continue;
        };

        let forecast = build_forecast(&series, horizon)
            .with_context(|| format!("failed to forecast {symbol}"))?;
        info!(
            %symbol,
            slope = forecast.model.slope,
            points = forecast.points.len(),
            "forecast fitted"
        );

        {
            let stdout = io::stdout();
            let mut out = stdout.lock();
            write_forecast(&mut out, &forecast).context("failed to write forecast")?;
            out.flush().context("failed to flush stdout")?;
        }

        let path = forecast_path(&config.output_dir, symbol);
        render_forecast(&path, &series, &forecast)
            .with_context(|| format!("failed to render {}", path.display()))?;
        written.push(path);
    }

    if written.is_empty() {
        bail!("no symbol had enough data to forecast");
    }
    Ok(written)
}
