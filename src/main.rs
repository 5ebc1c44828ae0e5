use std::sync::Arc;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use account_monitor::actors::Coordinator;
use account_monitor::config::SimulationConfig;
use account_monitor::metrics::Metrics;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize structured logging with environment-based filtering
    // Default to INFO level, can be overridden with RUST_LOG env var
    // Example: RUST_LOG=account_monitor=trace cargo run
    tracing_subscriber::registry()
        .with(fmt::layer().with_target(true).with_thread_ids(true))
        .with(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("info,account_monitor=debug"))
        )
        .init();

    tracing::info!("🚀 Starting shared account monitor");

    // === 1. Configuration ===
    let config = SimulationConfig::default();
    tracing::info!(config = %serde_json::to_string(&config)?, "Loaded simulation config");

    // === 2. Metrics ===
    let metrics = Arc::new(Metrics::new()?);
    tracing::info!("📊 Metrics registry created with {} metrics", metrics.registry().gather().len());

    // === 3. Coordinator with deposit, withdraw and sampler actors ===
    let mut coordinator = Coordinator::new(config, metrics.clone())?;
    let health = coordinator.health();
    coordinator.start();

    // === 4. Run until Ctrl-C ===
    tracing::info!("⏳ Running until Ctrl-C");
    let report = coordinator
        .run_until(async {
            if let Err(e) = tokio::signal::ctrl_c().await {
                tracing::error!("Failed to listen for Ctrl-C: {}", e);
            }
        })
        .await?;

    let system = health.system_health().await;
    tracing::info!(
        final_balance = report.final_balance,
        deposits = report.deposits,
        withdrawals = report.withdrawals,
        restarts = report.restarts,
        history_min = ?report.history.min(),
        history_max = ?report.history.max(),
        health = ?system.overall_status,
        "🎉 Simulation complete"
    );
    tracing::debug!("Final metrics:\n{}", metrics.render()?);

    Ok(())
}
