//! Reads and writes against a single multisig wallet.

use alloy::primitives::{Address, B256, U256};
use alloy::providers::DynProvider;

use crate::blockchain::client::BlockchainClient;
use crate::blockchain::transaction::{find_event, receipt_logs};
use crate::blockchain::types::{BlockchainError, BlockchainResult};
use crate::contracts::abi::IMultisigWallet;
use crate::contracts::types::{Token, Transaction, WalletBalance};

/// Client bound to one wallet contract.
#[derive(Debug, Clone)]
pub struct MultisigWalletService {
    client: BlockchainClient,
    address: Address,
}

/// Actions a signer can take on a pending transaction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransactionAction {
    Approve,
    Revoke,
    Cancel,
    Execute,
}

impl TransactionAction {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Approve => "approve",
            Self::Revoke => "revoke",
            Self::Cancel => "cancel",
            Self::Execute => "execute",
        }
    }
}

impl std::str::FromStr for TransactionAction {
    type Err = BlockchainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "approve" => Ok(Self::Approve),
            "revoke" => Ok(Self::Revoke),
            "cancel" => Ok(Self::Cancel),
            "execute" => Ok(Self::Execute),
            other => Err(BlockchainError::InvalidArgument(format!(
                "unknown transaction action '{other}'"
            ))),
        }
    }
}

impl MultisigWalletService {
    pub fn new(client: BlockchainClient, address: Address) -> Self {
        Self { client, address }
    }

    pub fn address(&self) -> Address {
        self.address
    }

    fn contract(&self) -> BlockchainResult<IMultisigWallet::IMultisigWalletInstance<DynProvider>> {
        Ok(IMultisigWallet::new(self.address, self.client.signing_provider()?))
    }

    // ---------------------------------------------------------------------
    // Balance
    // ---------------------------------------------------------------------

    /// Deposit `value` of `token`. Ether (zero token) travels as call value.
    ///
    /// ERC-20 deposits need an allowance for this wallet beforehand.
    pub async fn deposit(&self, token: Address, value: U256) -> BlockchainResult<()> {
        let wallet = self.contract()?;
        let mut call = wallet.deposit(token, value);
        if token == Address::ZERO {
            call = call.value(value);
        }
        self.client.submit("deposit", call).await?;
        tracing::info!(wallet = %self.address, token = %token, value = %value, "Deposit confirmed");
        Ok(())
    }

    /// Lock `usd_amount` (18 decimals) of the wallet's balance.
    pub async fn lock_balance_in_usd(&self, usd_amount: U256) -> BlockchainResult<()> {
        let wallet = self.contract()?;
        self.client
            .submit("lockBalancedInUsd", wallet.lockBalancedInUsd(usd_amount))
            .await?;
        Ok(())
    }

    /// Unlock `usd_amount`; the contract checks the password against its stored hash.
    pub async fn unlock_balance_in_usd(
        &self,
        usd_amount: U256,
        password: String,
        salt: String,
    ) -> BlockchainResult<()> {
        let wallet = self.contract()?;
        self.client
            .submit("unlockBalanceInUsd", wallet.unlockBalanceInUsd(usd_amount, password, salt))
            .await?;
        Ok(())
    }

    pub async fn balance(&self, token: Address) -> BlockchainResult<WalletBalance> {
        let wallet = self.address;
        let result = self
            .client
            .read("getBalance", move |provider| async move {
                IMultisigWallet::new(wallet, provider).getBalance(token).call().await
            })
            .await?;
        Ok(WalletBalance {
            token,
            balance: result.balance,
            balance_in_usd: result.balanceInUsd,
        })
    }

    // ---------------------------------------------------------------------
    // Transactions
    // ---------------------------------------------------------------------

    /// Propose a transfer; returns its hash from the `TransactionCreated` event.
    pub async fn create_transaction(
        &self,
        token: Address,
        to: Address,
        value: U256,
    ) -> BlockchainResult<B256> {
        let wallet = self.contract()?;
        let receipt = self
            .client
            .submit("createTransaction", wallet.createTransaction(token, to, value))
            .await?;

        let created = find_event::<IMultisigWallet::TransactionCreated>(receipt_logs(&receipt))
            .ok_or_else(|| {
                BlockchainError::Unknown("TransactionCreated event missing".to_string())
            })?;

        tracing::info!(wallet = %self.address, tx_hash = %created.txHash, "Transaction created");
        Ok(created.txHash)
    }

    pub async fn approve_transaction(&self, hash: B256) -> BlockchainResult<()> {
        self.act(TransactionAction::Approve, hash).await
    }

    pub async fn revoke_transaction(&self, hash: B256) -> BlockchainResult<()> {
        self.act(TransactionAction::Revoke, hash).await
    }

    pub async fn cancel_transaction(&self, hash: B256) -> BlockchainResult<()> {
        self.act(TransactionAction::Cancel, hash).await
    }

    pub async fn execute_transaction(&self, hash: B256) -> BlockchainResult<()> {
        self.act(TransactionAction::Execute, hash).await
    }

    /// Apply `action` to the transaction `hash`.
    pub async fn act(&self, action: TransactionAction, hash: B256) -> BlockchainResult<()> {
        let wallet = self.contract()?;
        match action {
            TransactionAction::Approve => {
                self.client
                    .submit("approveTransaction", wallet.approveTransaction(hash))
                    .await?
            }
            TransactionAction::Revoke => {
                self.client
                    .submit("revokeTransaction", wallet.revokeTransaction(hash))
                    .await?
            }
            TransactionAction::Cancel => {
                self.client
                    .submit("cancelTransaction", wallet.cancelTransaction(hash))
                    .await?
            }
            TransactionAction::Execute => {
                self.client
                    .submit("executeTransaction", wallet.executeTransaction(hash))
                    .await?
            }
        };
        tracing::info!(
            wallet = %self.address,
            tx_hash = %hash,
            action = action.as_str(),
            "Transaction action confirmed"
        );
        Ok(())
    }

    pub async fn newest_transactions(&self, offset: u64, limit: u64) -> BlockchainResult<Vec<Transaction>> {
        let wallet = self.address;
        let views = self
            .client
            .read("getNewestTransactions", move |provider| async move {
                IMultisigWallet::new(wallet, provider)
                    .getNewestTransactions(U256::from(offset), U256::from(limit))
                    .call()
                    .await
            })
            .await?;
        Ok(views.into_iter().map(Transaction::from).collect())
    }

    pub async fn transaction(&self, hash: B256) -> BlockchainResult<Transaction> {
        let wallet = self.address;
        let view = self
            .client
            .read("getTransaction", move |provider| async move {
                IMultisigWallet::new(wallet, provider).getTransaction(hash).call().await
            })
            .await?;
        Ok(view.into())
    }

    // ---------------------------------------------------------------------
    // Tokens
    // ---------------------------------------------------------------------

    pub async fn tokens(&self, offset: u64, limit: u64) -> BlockchainResult<Vec<Token>> {
        let wallet = self.address;
        let views = self
            .client
            .read("getTokens", move |provider| async move {
                IMultisigWallet::new(wallet, provider)
                    .getTokens(U256::from(offset), U256::from(limit))
                    .call()
                    .await
            })
            .await?;
        Ok(views.into_iter().map(Token::from).collect())
    }

    pub async fn token(&self, token: Address) -> BlockchainResult<Token> {
        let wallet = self.address;
        let view = self
            .client
            .read("getToken", move |provider| async move {
                IMultisigWallet::new(wallet, provider).getToken(token).call().await
            })
            .await?;
        Ok(view.into())
    }

    pub async fn add_token(&self, token: Address) -> BlockchainResult<()> {
        let wallet = self.contract()?;
        self.client.submit("addToken", wallet.addToken(token)).await?;
        Ok(())
    }

    pub async fn remove_token(&self, token: Address) -> BlockchainResult<()> {
        let wallet = self.contract()?;
        self.client.submit("removeToken", wallet.removeToken(token)).await?;
        Ok(())
    }
}
