//! Multisig wallet dashboard server.
//!
//! # Architecture Overview
//!
//! ```text
//!     API client ──▶ http (guard, handlers) ──▶ dashboard (stores, navigation)
//!                                                     │
//!                                                     ▼
//!                                   contracts (factory, wallet, erc20, multicall)
//!                                                     │
//!                                                     ▼
//!                                   blockchain (client, signer, error resolution) ──▶ JSON-RPC node
//!
//!     events monitor ──(eth_getLogs)──▶ activity feed ──▶ GET /api/wallets/{wallet}/events
//! ```

use std::path::PathBuf;
use std::sync::Arc;

use clap::Parser;
use tokio::net::TcpListener;

use multisig_dashboard::blockchain::wallet::PRIVATE_KEY_ENV_VAR;
use multisig_dashboard::blockchain::{BlockchainClient, Wallet};
use multisig_dashboard::config::{load_config, DashboardConfig};
use multisig_dashboard::config::validation::validate_config;
use multisig_dashboard::dashboard::Dashboard;
use multisig_dashboard::events::{ActivityFeed, WalletEventMonitor};
use multisig_dashboard::http::{AppState, HttpServer};
use multisig_dashboard::lifecycle::signals::listen_for_shutdown;
use multisig_dashboard::lifecycle::Shutdown;
use multisig_dashboard::observability::{logging, metrics};

#[derive(Parser)]
#[command(name = "multisig-dashboard")]
#[command(about = "Multisig wallet dashboard API", long_about = None)]
struct Args {
    /// Path to the TOML configuration file.
    #[arg(short, long)]
    config: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    let config = match &args.config {
        Some(path) => load_config(path)?,
        None => {
            let config = DashboardConfig::default();
            if let Err(errors) = validate_config(&config) {
                for error in &errors {
                    eprintln!("config: {error}");
                }
                return Err("default configuration is invalid".into());
            }
            config
        }
    };

    logging::init_tracing(&config.observability)?;
    tracing::info!(version = env!("CARGO_PKG_VERSION"), "multisig-dashboard starting");
    tracing::info!(
        bind_address = %config.server.bind_address,
        rpc_url = %config.blockchain.rpc_url,
        chain_id = config.blockchain.chain_id,
        "Configuration loaded"
    );

    if config.observability.metrics_enabled {
        match config.observability.metrics_address.parse() {
            Ok(addr) => metrics::init_metrics(addr),
            Err(_) => tracing::error!(
                metrics_address = %config.observability.metrics_address,
                "Failed to parse metrics address"
            ),
        }
    }

    let mut client = BlockchainClient::new(config.blockchain.clone()).await?;
    if std::env::var_os(PRIVATE_KEY_ENV_VAR).is_some() {
        let wallet = Wallet::from_env(config.blockchain.chain_id)?;
        client = client.with_wallet(&wallet)?;
    } else {
        tracing::warn!("{} not set; running watch-only", PRIVATE_KEY_ENV_VAR);
    }

    let dashboard = Arc::new(Dashboard::from_config(client.clone(), &config)?);
    let feed = Arc::new(ActivityFeed::new(config.events.feed_capacity));
    let shutdown = Shutdown::new();

    let monitor = WalletEventMonitor::new(
        client,
        config.events.clone(),
        dashboard.clone(),
        feed.clone(),
    )?;
    let monitor_task = tokio::spawn(monitor.run(shutdown.clone()));
    tokio::spawn(listen_for_shutdown(shutdown.clone()));

    let listener = TcpListener::bind(&config.server.bind_address).await?;
    tracing::info!(address = %listener.local_addr()?, "Listening for connections");

    let state = AppState {
        dashboard: dashboard.clone(),
        feed,
        config: Arc::new(config),
    };
    HttpServer::new(state).run(listener, shutdown.clone()).await?;

    // The server can also stop on its own; make sure the monitor follows.
    shutdown.trigger();
    if let Err(e) = monitor_task.await {
        tracing::warn!(error = %e, "Wallet event monitor task failed");
    }

    if let Err(e) = dashboard.session().save_to_file() {
        tracing::error!(error = %e, "Failed to persist session");
    }

    tracing::info!("Shutdown complete");
    Ok(())
}
