// =============================================================================
// forecast — linear trend forecast of closing prices
// =============================================================================

use tracing::info;

use stock_trends::pipeline::{init_tracing, load_config, run_forecast};
use stock_trends::runtime_config::Pipeline;

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    // ── 1. Environment & config ──────────────────────────────────────────
    let _ = dotenv::dotenv();
    init_tracing();

    let config = load_config(Pipeline::Forecast)?;

    // ── 2. Fetch -> fit -> report -> chart ───────────────────────────────
    let charts = run_forecast(&config).await?;

    info!(charts = charts.len(), "forecast run complete");
    Ok(())
}
