//! ERC-20 token reads and allowance approval.

use alloy::primitives::{Address, U256};

use crate::blockchain::client::BlockchainClient;
use crate::blockchain::types::BlockchainResult;
use crate::contracts::abi::IERC20;

/// Client for arbitrary ERC-20 contracts.
#[derive(Debug, Clone)]
pub struct Erc20Service {
    client: BlockchainClient,
}

impl Erc20Service {
    pub fn new(client: BlockchainClient) -> Self {
        Self { client }
    }

    pub async fn name(&self, token: Address) -> BlockchainResult<String> {
        self.client
            .read("name", move |provider| async move {
                IERC20::new(token, provider).name().call().await
            })
            .await
    }

    pub async fn symbol(&self, token: Address) -> BlockchainResult<String> {
        self.client
            .read("symbol", move |provider| async move {
                IERC20::new(token, provider).symbol().call().await
            })
            .await
    }

    pub async fn decimals(&self, token: Address) -> BlockchainResult<u8> {
        self.client
            .read("decimals", move |provider| async move {
                IERC20::new(token, provider).decimals().call().await
            })
            .await
    }

    /// Allow `spender` to pull `value` of `token` from the signer.
    pub async fn approve(&self, token: Address, spender: Address, value: U256) -> BlockchainResult<()> {
        let provider = self.client.signing_provider()?;
        let erc20 = IERC20::new(token, provider);
        self.client
            .submit("approve", erc20.approve(spender, value))
            .await?;
        tracing::debug!(token = %token, spender = %spender, value = %value, "Allowance approved");
        Ok(())
    }
}
