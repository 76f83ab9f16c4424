//! Chain-specific types and error definitions.

use thiserror::Error;

pub use crate::config::schema::BlockchainConfig;

/// Chain ID type for strong typing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ChainId(pub u64);

impl From<u64> for ChainId {
    fn from(id: u64) -> Self {
        Self(id)
    }
}

impl From<ChainId> for u64 {
    fn from(id: ChainId) -> Self {
        id.0
    }
}

/// Errors that can occur during blockchain operations.
///
/// The display strings are the user-facing messages; `code()` gives the
/// stable machine-readable category.
#[derive(Debug, Error)]
pub enum BlockchainError {
    /// The signer or the node refused to sign the request.
    #[error("Action rejected by user.")]
    ActionRejected,

    /// Transport-level failure talking to the RPC endpoint.
    #[error("Network error.")]
    Network(String),

    /// The contract reverted; holds the decoded, human-readable reason.
    #[error("{0}")]
    Reverted(String),

    /// The sender cannot pay for gas or value.
    #[error("Unpredictable gas limit.")]
    InsufficientFunds,

    /// Malformed address, hash, amount or call arguments.
    #[error("Invalid input format.")]
    InvalidArgument(String),

    /// The transaction was mined but its receipt reports failure.
    #[error("Transaction Failed.")]
    TransactionFailed,

    /// RPC request timed out.
    #[error("RPC timeout after {0} seconds")]
    Timeout(u64),

    /// Every configured provider failed.
    #[error("RPC error: {0}")]
    Rpc(String),

    /// Invalid private key format or signing failure.
    #[error("Wallet error: {0}")]
    Wallet(String),

    /// A write was requested but no signer is attached.
    #[error("No signer account is connected.")]
    NoSigner,

    /// Chain configuration mismatch.
    #[error("Chain ID mismatch: expected {expected}, got {actual}")]
    ChainMismatch { expected: u64, actual: u64 },

    /// A required contract address is not configured.
    #[error("Blockchain not available: {0}")]
    NotAvailable(String),

    /// Anything the resolver could not classify.
    #[error("Unknown error occurred.")]
    Unknown(String),
}

impl BlockchainError {
    /// Stable error category, modelled on the ethers error codes.
    pub fn code(&self) -> &'static str {
        match self {
            Self::ActionRejected => "ACTION_REJECTED",
            Self::Network(_) | Self::Rpc(_) => "NETWORK_ERROR",
            Self::Reverted(_) => "CALL_EXCEPTION",
            Self::InsufficientFunds => "INSUFFICIENT_FUNDS",
            Self::InvalidArgument(_) => "INVALID_ARGUMENT",
            Self::TransactionFailed => "TRANSACTION_FAILED",
            Self::Timeout(_) => "TIMEOUT",
            Self::Wallet(_) | Self::NoSigner => "WALLET_ERROR",
            Self::ChainMismatch { .. } => "CHAIN_MISMATCH",
            Self::NotAvailable(_) => "NOT_AVAILABLE",
            Self::Unknown(_) => "UNKNOWN_ERROR",
        }
    }

    /// Whether another provider might answer differently.
    pub fn is_transient(&self) -> bool {
        matches!(self, Self::Network(_) | Self::Timeout(_) | Self::Rpc(_))
    }
}

/// Result type for blockchain operations.
pub type BlockchainResult<T> = Result<T, BlockchainError>;
