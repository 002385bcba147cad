// =============================================================================
// trends — price history, SMA / Bollinger / RSI, multi-panel trend chart
// =============================================================================

use tracing::info;

use stock_trends::pipeline::{init_tracing, load_config, run_trends};
use stock_trends::runtime_config::Pipeline;

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    // ── 1. Environment & config ──────────────────────────────────────────
    let _ = dotenv::dotenv();
    init_tracing();

    let config = load_config(Pipeline::Trends)?;

    // ── 2. Fetch -> indicators -> report -> chart ────────────────────────
    let chart = run_trends(&config).await?;

    info!(chart = %chart.display(), "trends run complete");
    Ok(())
}
