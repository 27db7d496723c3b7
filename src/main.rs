//! Oracle Chess - Unified CLI
//!
//! Play in the terminal, serve the local stand-in oracle, or probe an oracle.

#![warn(missing_docs)]

mod cli;

use anyhow::Result;
use clap::Parser;
use cli::{Cli, Command};
use oracle_chess::{ClientConfig, HttpOracle, LocalOracle, run_tui};
use std::path::Path;
use tracing::{info, instrument};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    match cli.command {
        Command::Play {
            config,
            oracle_url,
            color,
            difficulty,
        } => {
            let mut config = load_config(&config, oracle_url)?;
            if let Some(color) = color {
                config = config.with_human_color(color.into());
            }
            if difficulty.is_some() {
                config = config.with_difficulty(difficulty);
            }
            run_tui(config).await
        }
        Command::Oracle { host, port } => run_local_oracle(host, port).await,
        Command::Health { config, oracle_url } => {
            let config = load_config(&config, oracle_url)?;
            run_health(config).await
        }
    }
}

/// Loads the config file, then applies the environment and CLI URL overrides.
fn load_config(path: &Path, oracle_url: Option<String>) -> Result<ClientConfig> {
    let config = ClientConfig::load(path)?;
    Ok(match oracle_url {
        Some(url) => config.with_oracle_url(url),
        None => config,
    })
}

fn init_stderr_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("info,oracle_chess=debug")),
        )
        .with_writer(std::io::stderr)
        .init();
}

/// Run the local stand-in oracle
#[instrument]
async fn run_local_oracle(host: String, port: u16) -> Result<()> {
    init_stderr_tracing();

    let addr = format!("{}:{}", host, port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    info!(%addr, "Serving local oracle, press Ctrl-C to stop");

    tokio::select! {
        result = LocalOracle::default().serve(listener) => result?,
        _ = tokio::signal::ctrl_c() => info!("Shutting down"),
    }
    Ok(())
}

/// Probe an oracle's health endpoint
#[instrument(skip(config), fields(oracle_url = %config.oracle_url()))]
async fn run_health(config: ClientConfig) -> Result<()> {
    init_stderr_tracing();

    let oracle = HttpOracle::new(config.oracle_url(), config.request_timeout())?;
    let health = oracle.health().await?;
    println!(
        "{}: status={} model={} device={}",
        oracle.base_url(),
        health.status,
        health.model,
        health.device
    );
    Ok(())
}
