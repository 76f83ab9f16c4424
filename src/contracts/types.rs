//! Domain records decoded from contract tuples.

use alloy::primitives::{Address, B256, U256};
use serde::{Deserialize, Serialize};

use crate::contracts::abi::{IMultisigWallet, IWalletFactory};

/// A multisig wallet as returned by the factory.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Wallet {
    pub address: Address,
    pub name: String,
    pub signers: Vec<Address>,
    pub minimum_approvals: u64,
    /// USD amounts carry 18 decimals.
    pub total_balance_in_usd: U256,
    pub total_locked_balance_in_usd: U256,
    pub total_unlocked_balance_in_usd: U256,
}

impl Wallet {
    pub fn is_signer(&self, account: Address) -> bool {
        self.signers.contains(&account)
    }
}

impl From<IWalletFactory::WalletView> for Wallet {
    fn from(view: IWalletFactory::WalletView) -> Self {
        Self {
            address: view.addr,
            name: view.name,
            signers: view.signers,
            minimum_approvals: view.minimumApprovals.saturating_to(),
            total_balance_in_usd: view.totalBalanceInUsd,
            total_locked_balance_in_usd: view.totalLockedBalanceInUsd,
            total_unlocked_balance_in_usd: view.totalUnlockedBalanceInUsd,
        }
    }
}

/// Where a wallet transaction is in its lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransactionStatus {
    Pending,
    Executed,
    Cancelled,
}

/// A transaction proposed inside a multisig wallet.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Transaction {
    pub hash: B256,
    /// Zero address means Ether.
    pub token: Address,
    pub to: Address,
    pub value: U256,
    pub value_in_usd: U256,
    pub approval_count: u8,
    pub approvers: Vec<Address>,
    pub created_at: u64,
    pub executed_at: u64,
    pub cancelled_at: u64,
    pub status: TransactionStatus,
}

impl Transaction {
    pub fn is_ether(&self) -> bool {
        self.token == Address::ZERO
    }

    pub fn is_approved_by(&self, account: Address) -> bool {
        self.approvers.contains(&account)
    }
}

fn status_of(executed_at: u64, cancelled_at: u64) -> TransactionStatus {
    if executed_at != 0 {
        TransactionStatus::Executed
    } else if cancelled_at != 0 {
        TransactionStatus::Cancelled
    } else {
        TransactionStatus::Pending
    }
}

impl From<IMultisigWallet::TransactionView> for Transaction {
    fn from(view: IMultisigWallet::TransactionView) -> Self {
        let executed_at = view.executedAt.saturating_to();
        let cancelled_at = view.cancelledAt.saturating_to();
        Self {
            hash: view.hash,
            token: view.token,
            to: view.to,
            value: view.value,
            value_in_usd: view.valueInUsd,
            approval_count: view.approvalCount,
            approvers: view.approvers,
            created_at: view.createdAt.saturating_to(),
            executed_at,
            cancelled_at,
            status: status_of(executed_at, cancelled_at),
        }
    }
}

/// A token registered in a wallet, with the wallet's holdings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Token {
    pub address: Address,
    pub name: String,
    pub symbol: String,
    pub decimals: u8,
    pub balance: U256,
    pub balance_in_usd: U256,
    pub price_in_usd: U256,
}

impl From<IMultisigWallet::TokenView> for Token {
    fn from(view: IMultisigWallet::TokenView) -> Self {
        Self {
            address: view.addr,
            name: view.name,
            symbol: view.symbol,
            decimals: view.decimals,
            balance: view.balance,
            balance_in_usd: view.balanceInUsd,
            price_in_usd: view.priceInUsd,
        }
    }
}

/// ERC-20 metadata read from the token contract itself.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenMetadata {
    pub address: Address,
    pub name: String,
    pub symbol: String,
    pub decimals: u8,
}

/// A wallet's holdings of one token. Zero token address means Ether.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct WalletBalance {
    pub token: Address,
    pub balance: U256,
    pub balance_in_usd: U256,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn transaction_view(executed_at: u64, cancelled_at: u64) -> IMultisigWallet::TransactionView {
        IMultisigWallet::TransactionView {
            hash: B256::repeat_byte(0x01),
            token: Address::ZERO,
            to: Address::repeat_byte(0x02),
            value: U256::from(100),
            valueInUsd: U256::from(200),
            approvalCount: 2,
            approvers: vec![Address::repeat_byte(0x03), Address::repeat_byte(0x04)],
            createdAt: U256::from(1_700_000_000u64),
            executedAt: U256::from(executed_at),
            cancelledAt: U256::from(cancelled_at),
        }
    }

    #[test]
    fn test_wallet_from_view() {
        let view = IWalletFactory::WalletView {
            name: "Treasury".to_string(),
            addr: Address::repeat_byte(0xaa),
            signers: vec![Address::repeat_byte(0x01), Address::repeat_byte(0x02)],
            minimumApprovals: U256::from(2),
            totalBalanceInUsd: U256::from(30),
            totalLockedBalanceInUsd: U256::from(10),
            totalUnlockedBalanceInUsd: U256::from(20),
        };

        let wallet = Wallet::from(view);
        assert_eq!(wallet.address, Address::repeat_byte(0xaa));
        assert_eq!(wallet.name, "Treasury");
        assert_eq!(wallet.minimum_approvals, 2);
        assert_eq!(wallet.total_locked_balance_in_usd, U256::from(10));
        assert!(wallet.is_signer(Address::repeat_byte(0x02)));
        assert!(!wallet.is_signer(Address::repeat_byte(0x09)));
    }

    #[test]
    fn test_transaction_status() {
        assert_eq!(Transaction::from(transaction_view(0, 0)).status, TransactionStatus::Pending);
        assert_eq!(Transaction::from(transaction_view(5, 0)).status, TransactionStatus::Executed);
        assert_eq!(Transaction::from(transaction_view(0, 7)).status, TransactionStatus::Cancelled);
    }

    #[test]
    fn test_transaction_fields() {
        let tx = Transaction::from(transaction_view(0, 0));
        assert!(tx.is_ether());
        assert_eq!(tx.approval_count, 2);
        assert_eq!(tx.created_at, 1_700_000_000);
        assert!(tx.is_approved_by(Address::repeat_byte(0x04)));

        let json = serde_json::to_value(&tx).unwrap();
        assert_eq!(json["status"], "pending");
    }

    #[test]
    fn test_token_from_view() {
        let token = Token::from(IMultisigWallet::TokenView {
            addr: Address::repeat_byte(0x05),
            name: "Dai Stablecoin".to_string(),
            symbol: "DAI".to_string(),
            decimals: 18,
            balance: U256::from(7),
            balanceInUsd: U256::from(8),
            priceInUsd: U256::from(9),
        });
        assert_eq!(token.symbol, "DAI");
        assert_eq!(token.price_in_usd, U256::from(9));
    }
}
