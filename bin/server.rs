// RFM Dashboard - Web Server
// Loads the configured transaction table once and serves the analytics as JSON

use anyhow::{Context, Result};
use clap::Parser;
use rfm_dashboard::api::{router, AppState};
use rfm_dashboard::{build_report, load_config, TransactionLoader};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

/// JSON API over the RFM dashboard analytics
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Configuration file (defaults to ./rfm-dashboard.toml, then built-in settings)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Transaction table to serve, overriding `server.data_path`
    #[arg(short, long)]
    data: Option<PathBuf>,

    /// Address to bind, overriding `server.bind`
    #[arg(short, long)]
    bind: Option<String>,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let args = Args::parse();
    let config = load_config(args.config.as_deref()).context("Failed to load configuration")?;

    let data_path = args.data.unwrap_or_else(|| config.data_path());
    let bind = args.bind.unwrap_or_else(|| config.server.bind.clone());

    let transactions = TransactionLoader::new()
        .with_delimiter(config.delimiter())
        .load_path(&data_path)
        .with_context(|| format!("Failed to load transactions from {}", data_path.display()))?;

    let report = build_report(&transactions, config.analytics.smoothing_window)
        .context("Failed to compute dashboard analytics")?;
    tracing::info!(
        customers = report.segmentation.customers.len(),
        "Analytics ready for {}",
        data_path.display()
    );

    let app = router(AppState::new(report));

    let listener = tokio::net::TcpListener::bind(&bind)
        .await
        .with_context(|| format!("Failed to bind to {bind}"))?;

    tracing::info!("Server running on http://{bind}/api/report");

    axum::serve(listener, app).await.context("Server error")?;

    Ok(())
}
