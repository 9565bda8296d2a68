//! Entry point for the timesheet HTTP server.
//!
//! Reads [`Config`] from the environment (after loading `.env` when present),
//! installs the tracing subscriber, opens the entry store and serves until
//! Ctrl-C.

use anyhow::Context;
use dotenv::dotenv;
use tokio::net::TcpListener;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use timesheet_server::{AppState, Config};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv().ok();
    let config = Config::from_env()?;

    let filter = EnvFilter::try_new(&config.log_filter).unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .init();

    let state = AppState::from_config(&config).context("failed to open entry store")?;

    let addr = config.socket_addr();
    let listener = TcpListener::bind(addr)
        .await
        .with_context(|| format!("failed to bind {addr}"))?;
    info!(%addr, "timesheet server listening");

    timesheet_server::run(listener, state, shutdown_signal()).await?;
    info!("timesheet server stopped");
    Ok(())
}

async fn shutdown_signal() {
    match tokio::signal::ctrl_c().await {
        Ok(()) => info!("shutdown requested"),
        Err(err) => {
            error!(error = %err, "failed to listen for Ctrl-C; running until killed");
            std::future::pending::<()>().await;
        }
    }
}
