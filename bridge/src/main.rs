use anyhow::{Context, Result};
use sonos_bridge::{Bridge, Config};
use sonos_state::logging;
use tracing::info;

#[tokio::main]
async fn main() -> Result<()> {
    let config = Config::from_args()?;

    let mode = match config.log_mode {
        Some(mode) => mode,
        None => logging::mode_from_env()?,
    };
    logging::init_logging_with_filter(mode, config.log_filter.as_deref())?;

    config.print_summary();

    let bridge = Bridge::start(&config).await?;
    info!("Bridge running with {} node(s); press Ctrl+C to stop", bridge.registry().len());

    tokio::signal::ctrl_c()
        .await
        .context("Failed to listen for Ctrl+C")?;
    info!("Shutting down...");

    let summary = bridge.shutdown().await?;
    info!(
        "Stopped: {} event(s), {} update(s), {} topology pass(es), {} report(s)",
        summary.engine.events_received,
        summary.engine.updates_published,
        summary.engine.topology_passes,
        summary.reports_sent
    );

    Ok(())
}
