//! Wallet factory reads and wallet creation.

use alloy::primitives::{Address, B256, U256};

use crate::blockchain::client::BlockchainClient;
use crate::blockchain::transaction::{find_event, receipt_logs};
use crate::blockchain::types::{BlockchainError, BlockchainResult};
use crate::contracts::abi::IWalletFactory;
use crate::contracts::types::Wallet;

/// Client for the wallet factory contract.
#[derive(Debug, Clone)]
pub struct WalletFactoryService {
    client: BlockchainClient,
    address: Address,
}

impl WalletFactoryService {
    pub fn new(client: BlockchainClient, address: Address) -> Self {
        Self { client, address }
    }

    pub fn address(&self) -> Address {
        self.address
    }

    /// Addresses of wallets the signer belongs to.
    pub async fn wallet_addresses_by_signer(
        &self,
        signer: Address,
        offset: u64,
        limit: u64,
    ) -> BlockchainResult<Vec<Address>> {
        let factory = self.address;
        self.client
            .read("getWalletAddressesBySigner", move |provider| async move {
                IWalletFactory::new(factory, provider)
                    .getWalletAddressesBySigner(signer, U256::from(offset), U256::from(limit))
                    .call()
                    .await
            })
            .await
    }

    /// Newest wallets the signer belongs to, most recent first.
    pub async fn newest_wallets_by_signer(
        &self,
        signer: Address,
        offset: u64,
        limit: u64,
    ) -> BlockchainResult<Vec<Wallet>> {
        let factory = self.address;
        let views = self
            .client
            .read("getNewestWalletsBySigner", move |provider| async move {
                IWalletFactory::new(factory, provider)
                    .getNewestWalletsBySigner(signer, U256::from(offset), U256::from(limit))
                    .call()
                    .await
            })
            .await?;
        Ok(views.into_iter().map(Wallet::from).collect())
    }

    /// One wallet by address. Reverts with `WalletDoesNotExist` for unknown addresses.
    pub async fn wallet(&self, wallet: Address) -> BlockchainResult<Wallet> {
        let factory = self.address;
        let view = self
            .client
            .read("getWallet", move |provider| async move {
                IWalletFactory::new(factory, provider).getWallet(wallet).call().await
            })
            .await?;
        Ok(view.into())
    }

    /// Deploy a new wallet; returns the address from the `WalletCreated` event.
    pub async fn create_wallet(
        &self,
        name: String,
        signers: Vec<Address>,
        minimum_approvals: u64,
        password_hash: B256,
    ) -> BlockchainResult<Address> {
        let provider = self.client.signing_provider()?;
        let factory = IWalletFactory::new(self.address, provider);
        let call = factory.createWallet(name, signers, U256::from(minimum_approvals), password_hash);

        let receipt = self.client.submit("createWallet", call).await?;
        let created = find_event::<IWalletFactory::WalletCreated>(receipt_logs(&receipt))
            .ok_or_else(|| BlockchainError::Unknown("WalletCreated event missing".to_string()))?;

        tracing::info!(wallet = %created.wallet, signers = created.signers.len(), "Wallet created");
        Ok(created.wallet)
    }
}
