//! Dashboard interaction layer: route-driven fetches into the stores and
//! signed writes.

use std::path::PathBuf;

use alloy::primitives::{Address, B256, U256};
use serde::Serialize;

use crate::blockchain::client::BlockchainClient;
use crate::blockchain::types::{BlockchainError, BlockchainResult};
use crate::config::{ContractsConfig, DashboardConfig, PaginationConfig};
use crate::contracts::{
    Erc20Service, Multicall3Service, MultisigWalletService, Token, TokenMetadata, Transaction,
    TransactionAction, Wallet, WalletBalance, WalletFactoryService,
};
use crate::dashboard::routes::pagination_offset;
use crate::dashboard::session::Session;
use crate::dashboard::store::{TokenMetadataStore, TokenStore, TransactionStore, WalletStore};
use crate::utils::format::{generate_salt, password_hash};

/// Result of a wallet deployment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CreatedWallet {
    pub address: Address,
    /// Needed later to unlock balance; generated when the caller gave none.
    pub salt: String,
}

/// Everything the dashboard reads, writes and remembers.
pub struct Dashboard {
    client: BlockchainClient,
    factory: Option<WalletFactoryService>,
    multicall: Multicall3Service,
    erc20: Erc20Service,
    pagination: PaginationConfig,
    session: Session,
    wallets: WalletStore,
    tokens: TokenStore,
    transactions: TransactionStore,
    token_metadatas: TokenMetadataStore,
}

fn parse_contract_address(field: &str, value: &str) -> BlockchainResult<Address> {
    value
        .trim()
        .parse()
        .map_err(|e| BlockchainError::InvalidArgument(format!("{field} '{value}': {e}")))
}

impl Dashboard {
    pub fn new(
        client: BlockchainClient,
        contracts: &ContractsConfig,
        pagination: PaginationConfig,
        session: Session,
    ) -> BlockchainResult<Self> {
        let factory = if contracts.wallet_factory.trim().is_empty() {
            tracing::warn!("No wallet factory configured; wallet listing and creation are disabled");
            None
        } else {
            let address = parse_contract_address("contracts.wallet_factory", &contracts.wallet_factory)?;
            Some(WalletFactoryService::new(client.clone(), address))
        };
        let multicall_address = parse_contract_address("contracts.multicall3", &contracts.multicall3)?;

        Ok(Self {
            multicall: Multicall3Service::new(client.clone(), multicall_address),
            erc20: Erc20Service::new(client.clone()),
            factory,
            client,
            pagination,
            session,
            wallets: WalletStore::new(),
            tokens: TokenStore::new(),
            transactions: TransactionStore::new(),
            token_metadatas: TokenMetadataStore::new(),
        })
    }

    /// Build from config, restoring the persisted session when configured.
    pub fn from_config(client: BlockchainClient, config: &DashboardConfig) -> BlockchainResult<Self> {
        let session = match &config.session.state_path {
            Some(path) => Session::load_from_file(PathBuf::from(path)).map_err(|e| {
                BlockchainError::NotAvailable(format!("session file '{path}': {e}"))
            })?,
            None => Session::default(),
        };
        Self::new(client, &config.contracts, config.pagination.clone(), session)
    }

    pub fn client(&self) -> &BlockchainClient {
        &self.client
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn wallets(&self) -> &WalletStore {
        &self.wallets
    }

    pub fn tokens(&self) -> &TokenStore {
        &self.tokens
    }

    pub fn transactions(&self) -> &TransactionStore {
        &self.transactions
    }

    pub fn token_metadatas(&self) -> &TokenMetadataStore {
        &self.token_metadatas
    }

    pub fn pagination(&self) -> &PaginationConfig {
        &self.pagination
    }

    fn factory(&self) -> BlockchainResult<&WalletFactoryService> {
        self.factory
            .as_ref()
            .ok_or_else(|| BlockchainError::NotAvailable("wallet factory not configured".to_string()))
    }

    fn wallet_service(&self, wallet: Address) -> MultisigWalletService {
        MultisigWalletService::new(self.client.clone(), wallet)
    }

    fn active_account(&self) -> BlockchainResult<Address> {
        self.session
            .active_account()
            .ok_or_else(|| BlockchainError::Wallet("No account connected".to_string()))
    }

    /// Drop every cached list and selection, e.g. after the account changes.
    pub fn reset_stores(&self) {
        self.wallets.reset();
        self.tokens.reset();
        self.transactions.reset();
        self.token_metadatas.reset();
    }

    // ==========================================================================
    // Wallets
    // ==========================================================================

    /// With a wallet keyword select that wallet, otherwise list a page.
    pub async fn sync_wallets_with_route(
        &self,
        page: u64,
        keyword: Option<Address>,
    ) -> BlockchainResult<()> {
        self.wallets.set_route(page, keyword.map(|k| k.to_string()));
        match keyword {
            Some(address) => {
                let wallet = self.fetch_wallet_by_addr(address).await?;
                self.wallets.select(Some(wallet));
            }
            None => {
                self.fetch_paginated_wallets(page).await?;
                self.wallets.select(None);
            }
        }
        Ok(())
    }

    /// Newest wallets of the active account.
    pub async fn fetch_paginated_wallets(&self, page: u64) -> BlockchainResult<Vec<Wallet>> {
        let signer = self.active_account()?;
        let limit = self.pagination.wallets_per_page;
        let wallets = self
            .factory()?
            .newest_wallets_by_signer(signer, pagination_offset(page, limit), limit)
            .await?;

        tracing::debug!(signer = %signer, page, count = wallets.len(), "Fetched wallets");
        self.wallets.set_items(wallets.clone());
        self.wallets.set_page(page);
        Ok(wallets)
    }

    /// Fetch one wallet; on failure the wallet list is cleared.
    pub async fn fetch_wallet_by_addr(&self, address: Address) -> BlockchainResult<Wallet> {
        match self.factory()?.wallet(address).await {
            Ok(wallet) => {
                self.wallets.set_items(vec![wallet.clone()]);
                Ok(wallet)
            }
            Err(e) => {
                self.wallets.set_items(Vec::new());
                Err(e)
            }
        }
    }

    pub async fn fetch_wallet_balance(
        &self,
        wallet: Address,
        token: Option<Address>,
    ) -> BlockchainResult<WalletBalance> {
        self.wallet_service(wallet)
            .balance(token.unwrap_or(Address::ZERO))
            .await
    }

    /// Deploy a wallet; the password is only ever sent as its salted hash.
    pub async fn create_wallet(
        &self,
        name: String,
        signers: Vec<Address>,
        minimum_approvals: u64,
        password: &str,
        salt: Option<String>,
    ) -> BlockchainResult<CreatedWallet> {
        let salt = salt.filter(|s| !s.is_empty()).unwrap_or_else(generate_salt);
        let hash = password_hash(password, &salt);
        let address = self
            .factory()?
            .create_wallet(name, signers, minimum_approvals, hash)
            .await?;
        Ok(CreatedWallet { address, salt })
    }

    /// Deposit into `wallet`; ERC-20 deposits approve the allowance first.
    pub async fn deposit_wallet(
        &self,
        wallet: Address,
        token: Address,
        value: U256,
    ) -> BlockchainResult<()> {
        if token != Address::ZERO {
            self.erc20.approve(token, wallet, value).await?;
        }
        self.wallet_service(wallet).deposit(token, value).await
    }

    pub async fn lock_wallet_balance(&self, wallet: Address, usd_amount: U256) -> BlockchainResult<()> {
        self.wallet_service(wallet).lock_balance_in_usd(usd_amount).await
    }

    pub async fn unlock_wallet_balance(
        &self,
        wallet: Address,
        usd_amount: U256,
        password: String,
        salt: String,
    ) -> BlockchainResult<()> {
        self.wallet_service(wallet)
            .unlock_balance_in_usd(usd_amount, password, salt)
            .await
    }

    // ==========================================================================
    // Tokens
    // ==========================================================================

    /// With a token keyword select that token, otherwise list a page.
    pub async fn sync_tokens_with_route(
        &self,
        wallet: Option<Address>,
        page: u64,
        keyword: Option<Address>,
    ) -> BlockchainResult<()> {
        self.tokens.set_route(page, keyword.map(|k| k.to_string()));
        let Some(wallet) = wallet else {
            return Ok(());
        };
        match keyword {
            Some(token) => {
                let token = self.fetch_token_by_addr(wallet, token).await?;
                self.tokens.select(Some(token));
            }
            None => {
                self.fetch_paginated_tokens(wallet, page).await?;
                self.tokens.select(None);
            }
        }
        Ok(())
    }

    pub async fn fetch_paginated_tokens(&self, wallet: Address, page: u64) -> BlockchainResult<Vec<Token>> {
        let limit = self.pagination.tokens_per_page;
        let tokens = self
            .wallet_service(wallet)
            .tokens(pagination_offset(page, limit), limit)
            .await?;
        self.tokens.set_items(tokens.clone());
        self.tokens.set_page(page);
        Ok(tokens)
    }

    /// Fetch one token; on failure the token list is cleared.
    pub async fn fetch_token_by_addr(&self, wallet: Address, token: Address) -> BlockchainResult<Token> {
        match self.wallet_service(wallet).token(token).await {
            Ok(token) => {
                self.tokens.set_items(vec![token.clone()]);
                Ok(token)
            }
            Err(e) => {
                self.tokens.set_items(Vec::new());
                Err(e)
            }
        }
    }

    pub async fn add_token(&self, wallet: Address, token: Address) -> BlockchainResult<()> {
        self.wallet_service(wallet).add_token(token).await
    }

    pub async fn remove_token(&self, wallet: Address, token: Address) -> BlockchainResult<()> {
        self.wallet_service(wallet).remove_token(token).await
    }

    /// Metadata for `addresses`, fetching only what is not stored yet.
    ///
    /// The zero address (Ether) has no ERC-20 metadata and is skipped.
    pub async fn fetch_token_metadatas(&self, addresses: &[Address]) -> BlockchainResult<Vec<TokenMetadata>> {
        let wanted = erc20_addresses(addresses);

        let missing: Vec<Address> = wanted
            .iter()
            .copied()
            .filter(|address| !self.token_metadatas.contains(address))
            .collect();

        if !missing.is_empty() {
            let fetched = self.multicall.token_metadatas(&missing).await?;
            tracing::debug!(count = fetched.len(), "Fetched token metadata");
            self.token_metadatas.insert_all(fetched);
        }

        Ok(wanted
            .iter()
            .filter_map(|address| self.token_metadatas.find(address))
            .collect())
    }

    // ==========================================================================
    // Transactions
    // ==========================================================================

    /// With a transaction keyword select that transaction, otherwise list a page.
    pub async fn sync_transactions_with_route(
        &self,
        wallet: Option<Address>,
        page: u64,
        keyword: Option<B256>,
    ) -> BlockchainResult<()> {
        self.transactions.set_route(page, keyword.map(|k| k.to_string()));
        let Some(wallet) = wallet else {
            return Ok(());
        };
        match keyword {
            Some(hash) => {
                let transaction = self.fetch_transaction_by_hash(wallet, hash).await?;
                self.transactions.select(Some(transaction));
            }
            None => {
                self.fetch_paginated_transactions(wallet, page).await?;
                self.transactions.select(None);
            }
        }
        Ok(())
    }

    pub async fn fetch_paginated_transactions(
        &self,
        wallet: Address,
        page: u64,
    ) -> BlockchainResult<Vec<Transaction>> {
        let limit = self.pagination.transactions_per_page;
        let transactions = self
            .wallet_service(wallet)
            .newest_transactions(pagination_offset(page, limit), limit)
            .await?;
        self.transactions.set_items(transactions.clone());
        self.transactions.set_page(page);
        Ok(transactions)
    }

    pub async fn fetch_transaction_by_hash(&self, wallet: Address, hash: B256) -> BlockchainResult<Transaction> {
        let transaction = self.wallet_service(wallet).transaction(hash).await?;
        self.transactions.set_items(vec![transaction.clone()]);
        Ok(transaction)
    }

    /// Load metadata for every ERC-20 token the listed transactions move.
    pub async fn load_transaction_token_metadatas(&self) -> BlockchainResult<Vec<TokenMetadata>> {
        self.fetch_token_metadatas(&self.transaction_tokens()).await
    }

    /// Already loaded metadata for the tokens the listed transactions move.
    pub fn cached_transaction_token_metadatas(&self) -> Vec<TokenMetadata> {
        erc20_addresses(&self.transaction_tokens())
            .iter()
            .filter_map(|address| self.token_metadatas.find(address))
            .collect()
    }

    fn transaction_tokens(&self) -> Vec<Address> {
        self.transactions
            .items()
            .iter()
            .filter(|t| !t.is_ether())
            .map(|t| t.token)
            .collect()
    }

    pub async fn create_wallet_transaction(
        &self,
        wallet: Address,
        token: Address,
        to: Address,
        value: U256,
    ) -> BlockchainResult<B256> {
        self.wallet_service(wallet).create_transaction(token, to, value).await
    }

    pub async fn approve_wallet_transaction(&self, wallet: Address, hash: B256) -> BlockchainResult<()> {
        self.wallet_service(wallet).approve_transaction(hash).await
    }

    pub async fn revoke_wallet_transaction(&self, wallet: Address, hash: B256) -> BlockchainResult<()> {
        self.wallet_service(wallet).revoke_transaction(hash).await
    }

    pub async fn cancel_wallet_transaction(&self, wallet: Address, hash: B256) -> BlockchainResult<()> {
        self.wallet_service(wallet).cancel_transaction(hash).await
    }

    pub async fn execute_wallet_transaction(&self, wallet: Address, hash: B256) -> BlockchainResult<()> {
        self.wallet_service(wallet).execute_transaction(hash).await
    }

    /// Dispatch one of the four signer actions.
    pub async fn act_on_wallet_transaction(
        &self,
        wallet: Address,
        action: TransactionAction,
        hash: B256,
    ) -> BlockchainResult<()> {
        match action {
            TransactionAction::Approve => self.approve_wallet_transaction(wallet, hash).await,
            TransactionAction::Revoke => self.revoke_wallet_transaction(wallet, hash).await,
            TransactionAction::Cancel => self.cancel_wallet_transaction(wallet, hash).await,
            TransactionAction::Execute => self.execute_wallet_transaction(wallet, hash).await,
        }
    }
}

impl std::fmt::Debug for Dashboard {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Dashboard")
            .field("client", &self.client)
            .field("factory", &self.factory.as_ref().map(|f| f.address()))
            .field("connected", &self.session.is_connected())
            .finish()
    }
}

/// Distinct non-zero addresses, in first-seen order.
fn erc20_addresses(addresses: &[Address]) -> Vec<Address> {
    let mut wanted: Vec<Address> = Vec::with_capacity(addresses.len());
    for &address in addresses {
        if address != Address::ZERO && !wanted.contains(&address) {
            wanted.push(address);
        }
    }
    wanted
}
