//! Blockchain RPC client with timeout and error handling.
//!
//! # Responsibilities
//! - Connect to JSON-RPC endpoints (primary + failovers)
//! - Run contract view calls with failover and timeouts
//! - Hold the signing provider used for writes
//! - Query chain state (chain id, block number, logs)

use std::future::Future;
use std::time::{Duration, Instant};

use alloy::primitives::Address;
use alloy::providers::{DynProvider, Provider, ProviderBuilder};
use alloy::rpc::types::{Filter, Log};
use tokio::time::timeout;

use crate::blockchain::errors::{resolve_contract_error, resolve_transport_error};
use crate::blockchain::types::{BlockchainConfig, BlockchainError, BlockchainResult, ChainId};
use crate::blockchain::wallet::Wallet;
use crate::observability::metrics;

/// Blockchain RPC client wrapper with failover support.
#[derive(Clone)]
pub struct BlockchainClient {
    /// List of read providers (primary + failovers).
    providers: Vec<DynProvider>,
    /// Provider with the signer attached, bound to the primary endpoint.
    signer: Option<(DynProvider, Address)>,
    /// Configuration.
    config: BlockchainConfig,
    /// Request timeout duration.
    timeout_duration: Duration,
}

impl BlockchainClient {
    /// Create a new blockchain client.
    ///
    /// Chain ID verification failures are logged, not fatal, so the
    /// dashboard can start while the node is still coming up.
    pub async fn new(config: BlockchainConfig) -> BlockchainResult<Self> {
        let timeout_duration = Duration::from_secs(config.rpc_timeout_secs);
        let mut providers = Vec::new();

        // 1. Add primary provider
        let primary_url: url::Url = config.rpc_url.parse().map_err(|e| {
            BlockchainError::Rpc(format!("Invalid RPC URL '{}': {}", config.rpc_url, e))
        })?;
        providers.push(ProviderBuilder::new().connect_http(primary_url).erased());

        // 2. Add failover providers
        for url_str in &config.failover_urls {
            if let Ok(url) = url_str.parse() {
                providers.push(ProviderBuilder::new().connect_http(url).erased());
            } else {
                tracing::warn!(url = %url_str, "Ignoring invalid failover RPC URL");
            }
        }

        let client = Self {
            providers,
            signer: None,
            config: config.clone(),
            timeout_duration,
        };

        match client.verify_chain_id().await {
            Ok(()) => {
                tracing::info!(
                    rpc_url = %config.rpc_url,
                    chain_id = config.chain_id,
                    "Blockchain client initialized"
                );
            }
            Err(e) => {
                tracing::warn!(
                    error = %e,
                    "Blockchain client initialized but chain verification failed"
                );
            }
        }

        Ok(client)
    }

    /// Attach a signer; writes go through the primary endpoint only.
    pub fn with_wallet(mut self, wallet: &Wallet) -> BlockchainResult<Self> {
        let url: url::Url = self.config.rpc_url.parse().map_err(|e| {
            BlockchainError::Rpc(format!("Invalid RPC URL '{}': {}", self.config.rpc_url, e))
        })?;
        let provider = ProviderBuilder::new()
            .wallet(wallet.to_network_wallet())
            .connect_http(url)
            .erased();
        self.signer = Some((provider, wallet.address()));
        Ok(self)
    }

    /// Address of the attached signer, if any.
    pub fn signer_address(&self) -> Option<Address> {
        self.signer.as_ref().map(|(_, address)| *address)
    }

    /// The signing provider, or `NoSigner` when running watch-only.
    pub fn signing_provider(&self) -> BlockchainResult<DynProvider> {
        self.signer
            .as_ref()
            .map(|(provider, _)| provider.clone())
            .ok_or(BlockchainError::NoSigner)
    }

    /// Verify the connected chain ID matches configuration.
    pub async fn verify_chain_id(&self) -> BlockchainResult<()> {
        let chain_id = self.get_chain_id().await?;
        if chain_id.0 != self.config.chain_id {
            return Err(BlockchainError::ChainMismatch {
                expected: self.config.chain_id,
                actual: chain_id.0,
            });
        }
        Ok(())
    }

    /// Get the chain ID from the RPC.
    pub async fn get_chain_id(&self) -> BlockchainResult<ChainId> {
        for (i, provider) in self.providers.iter().enumerate() {
            let fut = provider.get_chain_id();
            match timeout(self.timeout_duration, fut).await {
                Ok(Ok(result)) => return Ok(ChainId(result)),
                Ok(Err(e)) => {
                    tracing::warn!(provider_idx = i, error = %e, "RPC error, trying next provider");
                }
                Err(_) => {
                    tracing::warn!(provider_idx = i, "RPC timeout, trying next provider");
                }
            }
        }
        Err(BlockchainError::Rpc("All RPC providers failed".to_string()))
    }

    /// Get the latest block number.
    pub async fn get_block_number(&self) -> BlockchainResult<u64> {
        for (i, provider) in self.providers.iter().enumerate() {
            let fut = provider.get_block_number();
            match timeout(self.timeout_duration, fut).await {
                Ok(Ok(result)) => return Ok(result),
                Ok(Err(e)) => tracing::warn!(provider_idx = i, error = %e, "RPC error"),
                Err(_) => tracing::warn!(provider_idx = i, "RPC timeout"),
            }
        }
        Err(BlockchainError::Rpc("All providers failed to get block number".to_string()))
    }

    /// Fetch logs matching a filter.
    pub async fn get_logs(&self, filter: &Filter) -> BlockchainResult<Vec<Log>> {
        for (i, provider) in self.providers.iter().enumerate() {
            let fut = provider.get_logs(filter);
            match timeout(self.timeout_duration, fut).await {
                Ok(Ok(result)) => return Ok(result),
                Ok(Err(e)) => {
                    let resolved = resolve_transport_error(&e);
                    if !resolved.is_transient() {
                        return Err(resolved);
                    }
                    tracing::warn!(provider_idx = i, error = %e, "RPC error")
                }
                Err(_) => tracing::warn!(provider_idx = i, "RPC timeout"),
            }
        }
        Err(BlockchainError::Rpc("All providers failed to get logs".to_string()))
    }

    /// Run a contract view call with failover.
    ///
    /// `call` receives a provider and builds the request against it. Reverts
    /// are returned straight away; transient failures move on to the next
    /// provider.
    pub async fn read<T, F, Fut>(&self, op: &'static str, call: F) -> BlockchainResult<T>
    where
        F: Fn(DynProvider) -> Fut,
        Fut: Future<Output = Result<T, alloy::contract::Error>>,
    {
        let start = Instant::now();
        let mut last_error = None;

        for (i, provider) in self.providers.iter().enumerate() {
            match timeout(self.timeout_duration, call(provider.clone())).await {
                Ok(Ok(value)) => {
                    metrics::record_rpc_call(op, "ok", start);
                    return Ok(value);
                }
                Ok(Err(e)) => {
                    let resolved = resolve_contract_error(e);
                    if !resolved.is_transient() {
                        metrics::record_rpc_call(op, resolved.code(), start);
                        return Err(resolved);
                    }
                    tracing::warn!(provider_idx = i, op, error = ?resolved, "RPC error, trying next provider");
                    last_error = Some(resolved);
                }
                Err(_) => {
                    tracing::warn!(provider_idx = i, op, "RPC timeout, trying next provider");
                    last_error = Some(BlockchainError::Timeout(self.config.rpc_timeout_secs));
                }
            }
        }

        let error = last_error
            .unwrap_or_else(|| BlockchainError::Rpc("All RPC providers failed".to_string()));
        metrics::record_rpc_call(op, error.code(), start);
        Err(error)
    }

    /// Check if the blockchain is reachable.
    pub async fn is_healthy(&self) -> bool {
        self.get_block_number().await.is_ok()
    }

    /// Get the configuration.
    pub fn config(&self) -> &BlockchainConfig {
        &self.config
    }

    /// Get the number of confirmation blocks required.
    pub fn confirmation_blocks(&self) -> u64 {
        self.config.confirmation_blocks
    }
}

impl std::fmt::Debug for BlockchainClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BlockchainClient")
            .field("rpc_url", &self.config.rpc_url)
            .field("chain_id", &self.config.chain_id)
            .field("timeout_secs", &self.config.rpc_timeout_secs)
            .field("signer", &self.signer_address())
            .finish()
    }
}
