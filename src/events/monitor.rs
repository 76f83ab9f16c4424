//! Polls wallet logs into the activity feed.

use std::sync::Arc;
use std::time::Duration;

use alloy::primitives::Address;
use alloy::rpc::types::Filter;
use tokio::time::sleep;

use crate::blockchain::client::BlockchainClient;
use crate::blockchain::types::{BlockchainError, BlockchainResult};
use crate::config::EventsConfig;
use crate::dashboard::Dashboard;
use crate::events::feed::{decode_wallet_event, ActivityFeed};
use crate::lifecycle::Shutdown;
use crate::observability::metrics;

/// Watches the configured wallets plus whichever wallet is selected.
pub struct WalletEventMonitor {
    client: BlockchainClient,
    config: EventsConfig,
    watched: Vec<Address>,
    dashboard: Arc<Dashboard>,
    feed: Arc<ActivityFeed>,
    last_block: u64,
}

impl WalletEventMonitor {
    /// Create a new event monitor.
    pub fn new(
        client: BlockchainClient,
        config: EventsConfig,
        dashboard: Arc<Dashboard>,
        feed: Arc<ActivityFeed>,
    ) -> BlockchainResult<Self> {
        let watched = config
            .wallets
            .iter()
            .map(|w| {
                w.parse().map_err(|e| {
                    BlockchainError::InvalidArgument(format!("events.wallets '{w}': {e}"))
                })
            })
            .collect::<BlockchainResult<Vec<Address>>>()?;

        Ok(Self {
            client,
            config,
            watched,
            dashboard,
            feed,
            last_block: 0,
        })
    }

    /// Addresses to query this round.
    fn addresses(&self) -> Vec<Address> {
        let mut addresses = self.watched.clone();
        if let Some(selected) = self.dashboard.wallets().selected() {
            if !addresses.contains(&selected.address) {
                addresses.push(selected.address);
            }
        }
        addresses
    }

    /// Run the monitor loop until shutdown.
    pub async fn run(mut self, shutdown: Shutdown) {
        if !self.config.enabled {
            tracing::info!("Wallet event monitor disabled");
            return;
        }

        let mut shutdown_rx = shutdown.subscribe();
        tracing::info!(watched = self.watched.len(), "Starting wallet event monitor");

        let interval = Duration::from_millis(self.config.poll_interval_ms);
        loop {
            if let Err(e) = self.poll_events().await {
                tracing::error!(error = %e, "Error polling wallet events");
            }

            tokio::select! {
                _ = sleep(interval) => {}
                _ = shutdown_rx.recv() => {
                    tracing::info!("Wallet event monitor stopped");
                    return;
                }
            }
        }
    }

    /// Fetch confirmed logs since the last poll.
    ///
    /// The first successful poll only records the confirmed head, so the
    /// log range never reaches back to genesis.
    pub async fn poll_events(&mut self) -> BlockchainResult<usize> {
        let current_block = self.client.get_block_number().await?;

        // Wait for confirmations
        let target_block = current_block.saturating_sub(self.client.confirmation_blocks());
        if self.last_block == 0 {
            self.last_block = target_block;
            tracing::info!(block = target_block, "Initialized wallet event monitor");
            return Ok(0);
        }
        if target_block <= self.last_block {
            return Ok(0);
        }

        let addresses = self.addresses();
        if addresses.is_empty() {
            self.last_block = target_block;
            return Ok(0);
        }

        let filter = Filter::new()
            .address(addresses)
            .from_block(self.last_block + 1)
            .to_block(target_block);

        let logs = self.client.get_logs(&filter).await?;

        let mut decoded = 0;
        for log in &logs {
            if let Some(event) = decode_wallet_event(log) {
                tracing::debug!(
                    wallet = %event.wallet,
                    kind = event.kind.as_str(),
                    block = ?event.block_number,
                    "Wallet event"
                );
                metrics::record_wallet_events(event.kind.as_str(), 1);
                self.feed.push(event);
                decoded += 1;
            }
        }

        self.last_block = target_block;
        Ok(decoded)
    }
}
