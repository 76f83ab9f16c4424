//! Configuration schema definitions.
//!
//! This module defines the complete configuration structure for the dashboard.
//! All types derive Serde traits for deserialization from config files.

use serde::{Deserialize, Serialize};

/// Root configuration for the multisig dashboard.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct DashboardConfig {
    /// HTTP API server settings.
    pub server: ServerConfig,

    /// Blockchain RPC settings.
    pub blockchain: BlockchainConfig,

    /// Addresses of the shared contracts (factory, multicall).
    pub contracts: ContractsConfig,

    /// Page sizes for list views.
    pub pagination: PaginationConfig,

    /// Connected-account persistence.
    pub session: SessionConfig,

    /// Wallet event monitoring.
    pub events: EventsConfig,

    /// Observability settings.
    pub observability: ObservabilityConfig,
}

/// HTTP API server configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Bind address (e.g., "127.0.0.1:8080").
    pub bind_address: String,

    /// Request timeout in seconds. Covers receipt waits on write routes.
    pub request_timeout_secs: u64,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_address: "127.0.0.1:8080".to_string(),
            request_timeout_secs: 180,
        }
    }
}

/// Blockchain integration configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct BlockchainConfig {
    /// JSON-RPC endpoint URL.
    pub rpc_url: String,

    /// Failover JSON-RPC endpoint URLs, used for reads only.
    #[serde(default)]
    pub failover_urls: Vec<String>,

    /// Chain ID (e.g., 1 for Ethereum mainnet, 31337 for local Anvil).
    pub chain_id: u64,

    /// RPC request timeout in seconds.
    pub rpc_timeout_secs: u64,

    /// Number of block confirmations to wait for after a write.
    pub confirmation_blocks: u64,

    /// Maximum time to wait for a transaction receipt, in seconds.
    pub receipt_timeout_secs: u64,
}

impl Default for BlockchainConfig {
    fn default() -> Self {
        Self {
            rpc_url: "http://localhost:8545".to_string(),
            failover_urls: Vec::new(),
            chain_id: 31337,
            rpc_timeout_secs: 10,
            confirmation_blocks: 1,
            receipt_timeout_secs: 120,
        }
    }
}

/// Shared contract addresses.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ContractsConfig {
    /// Address of the wallet factory contract.
    pub wallet_factory: String,

    /// Address of the Multicall3 contract.
    pub multicall3: String,
}

impl Default for ContractsConfig {
    fn default() -> Self {
        Self {
            wallet_factory: String::new(),
            // Multicall3 is deployed at the same address on most chains.
            multicall3: "0xcA11bde05977b3631167028862bE2a173976CA11".to_string(),
        }
    }
}

/// Page sizes used by the list views.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct PaginationConfig {
    pub wallets_per_page: u64,
    pub tokens_per_page: u64,
    pub transactions_per_page: u64,
}

impl Default for PaginationConfig {
    fn default() -> Self {
        Self {
            wallets_per_page: 5,
            tokens_per_page: 10,
            transactions_per_page: 5,
        }
    }
}

/// Session persistence configuration.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct SessionConfig {
    /// JSON file holding the connected accounts. In-memory only when unset.
    pub state_path: Option<String>,
}

/// Wallet event monitor configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct EventsConfig {
    /// Enable the background event monitor.
    pub enabled: bool,

    /// Wallet addresses that are always watched.
    pub wallets: Vec<String>,

    /// Polling interval in milliseconds.
    pub poll_interval_ms: u64,

    /// Maximum number of events kept per wallet.
    pub feed_capacity: usize,
}

impl Default for EventsConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            wallets: Vec::new(),
            poll_interval_ms: 5000,
            feed_capacity: 50,
        }
    }
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Log level (trace, debug, info, warn, error).
    pub log_level: String,

    /// Enable metrics endpoint.
    pub metrics_enabled: bool,

    /// Metrics endpoint bind address.
    pub metrics_address: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            metrics_enabled: false,
            metrics_address: "127.0.0.1:9090".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = DashboardConfig::default();
        assert_eq!(config.pagination.wallets_per_page, 5);
        assert_eq!(config.pagination.tokens_per_page, 10);
        assert_eq!(config.pagination.transactions_per_page, 5);
        assert_eq!(config.blockchain.rpc_timeout_secs, 10);
        assert!(config.session.state_path.is_none());
        assert!(!config.events.enabled);
    }

    #[test]
    fn test_partial_toml_uses_defaults() {
        let config: DashboardConfig = toml::from_str(
            r#"
            [blockchain]
            rpc_url = "http://127.0.0.1:9545"
            chain_id = 11155111

            [pagination]
            tokens_per_page = 25
            "#,
        )
        .unwrap();

        assert_eq!(config.blockchain.rpc_url, "http://127.0.0.1:9545");
        assert_eq!(config.blockchain.chain_id, 11155111);
        assert_eq!(config.blockchain.confirmation_blocks, 1);
        assert_eq!(config.pagination.tokens_per_page, 25);
        assert_eq!(config.pagination.wallets_per_page, 5);
        assert_eq!(config.server.bind_address, "127.0.0.1:8080");
    }
}
