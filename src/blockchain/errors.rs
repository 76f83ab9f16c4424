//! Normalization of RPC, contract and receipt failures into [`BlockchainError`].
//!
//! Every service call funnels its failure through one of the `resolve_*`
//! functions so the dashboard only ever shows a small, fixed vocabulary of
//! messages. Revert payloads are decoded against the known custom errors of
//! the factory and wallet contracts.

use alloy::contract::Error as ContractError;
use alloy::primitives::keccak256;
use alloy::providers::{PendingTransactionError, WatchTxError};
use alloy::sol_types::{Revert, SolError};
use alloy::transports::TransportError;

use crate::blockchain::types::BlockchainError;
use crate::utils::format::pascal_to_sentence_case;

/// JSON-RPC code used by wallets when the user declines a request (EIP-1193).
pub const USER_REJECTED_CODE: i64 = 4001;

/// JSON-RPC "invalid params" code.
pub const INVALID_PARAMS_CODE: i64 = -32602;

/// Message shown for reverts that carry no decodable reason.
pub const GENERIC_REVERT_MESSAGE: &str = "Contract reverted.";

/// Parameterless custom errors declared by the factory and wallet contracts.
pub const KNOWN_CONTRACT_ERRORS: &[&str] = &[
    // Factory
    "WalletDoesNotExist",
    "WalletExceededMaximum",
    // Validation
    "MustUseFunctionCall",
    "MustBeGreaterThanZero",
    "MustBeNonZeroAddress",
    "MustMatchEtherValue",
    // Wallet configuration
    "InsufficientSigners",
    "ExcessiveSigners",
    "DuplicateSigners",
    "OnlySigner",
    "InvalidPasswordHashLength",
    "PasswordHashMismatch",
    // Transactions
    "DepositFailed",
    "TransactionDoesNotExist",
    "TransactionAlreadyApproved",
    "TransactionNotApproved",
    "TransactionAlreadyRevoked",
    "TransactionNotRevoked",
    "TransactionAlreadyExecuted",
    "TransactionNotExecuted",
    "TransactionAlreadyCancelled",
    "TransactionNotCancelled",
    "TransactionLacksApprovals",
    "TransactionInsufficientBalance",
    "TransactionInsufficientUnlockedBalance",
    "TransactionFailed",
];

/// 4-byte selector of a parameterless error.
fn error_selector(name: &str) -> [u8; 4] {
    let hash = keccak256(format!("{name}()"));
    [hash[0], hash[1], hash[2], hash[3]]
}

/// Look up the custom error a revert payload starts with.
pub fn find_contract_error(data: &[u8]) -> Option<&'static str> {
    let selector = data.get(..4)?;
    KNOWN_CONTRACT_ERRORS
        .iter()
        .copied()
        .find(|name| error_selector(name) == selector)
}

/// Turn revert data into a user-facing message.
///
/// `Error(string)` yields its reason verbatim; a known custom error yields
/// its name in sentence case with a trailing period.
pub fn decode_revert(data: &[u8]) -> String {
    if data.len() < 4 {
        return GENERIC_REVERT_MESSAGE.to_string();
    }

    if data[..4] == Revert::SELECTOR {
        return match Revert::abi_decode(data) {
            Ok(revert) => revert.reason,
            Err(_) => GENERIC_REVERT_MESSAGE.to_string(),
        };
    }

    match find_contract_error(data) {
        Some(name) => format!("{}.", pascal_to_sentence_case(name)),
        None => GENERIC_REVERT_MESSAGE.to_string(),
    }
}

/// Classify a JSON-RPC error response.
pub fn resolve_rpc_failure(code: i64, message: &str, revert_data: Option<&[u8]>) -> BlockchainError {
    let lowered = message.to_lowercase();

    if code == USER_REJECTED_CODE
        || lowered.contains("user rejected")
        || lowered.contains("user denied")
    {
        return BlockchainError::ActionRejected;
    }

    if lowered.contains("network") {
        return BlockchainError::Network(message.to_string());
    }

    if let Some(data) = revert_data {
        return BlockchainError::Reverted(decode_revert(data));
    }

    if lowered.contains("insufficient funds") {
        return BlockchainError::InsufficientFunds;
    }

    if code == INVALID_PARAMS_CODE || lowered.contains("invalid argument") {
        return BlockchainError::InvalidArgument(message.to_string());
    }

    if lowered.contains("execution reverted") {
        return BlockchainError::Reverted(GENERIC_REVERT_MESSAGE.to_string());
    }

    BlockchainError::Unknown(message.to_string())
}

/// Classify a transport-layer error.
pub fn resolve_transport_error(err: &TransportError) -> BlockchainError {
    if let Some(payload) = err.as_error_resp() {
        let revert = payload.as_revert_data();
        return resolve_rpc_failure(payload.code, &payload.message, revert.as_ref().map(|data| &data[..]));
    }

    if err.is_transport_error() {
        return BlockchainError::Network(err.to_string());
    }

    let message = err.to_string();
    if message.to_lowercase().contains("network") {
        BlockchainError::Network(message)
    } else {
        BlockchainError::Unknown(message)
    }
}

/// Classify a failure while waiting for a receipt. A watcher timeout is
/// reported against `receipt_timeout_secs`.
pub fn resolve_pending_error(err: PendingTransactionError, receipt_timeout_secs: u64) -> BlockchainError {
    match err {
        PendingTransactionError::TransportError(e) => resolve_transport_error(&e),
        PendingTransactionError::TxWatcher(WatchTxError::Timeout) => {
            BlockchainError::Timeout(receipt_timeout_secs)
        }
        other => BlockchainError::Network(other.to_string()),
    }
}

/// Classify an error returned by a generated contract binding.
pub fn resolve_contract_error(err: ContractError) -> BlockchainError {
    match err {
        ContractError::TransportError(e) => resolve_transport_error(&e),
        ContractError::PendingTransactionError(PendingTransactionError::TransportError(e)) => {
            resolve_transport_error(&e)
        }
        ContractError::PendingTransactionError(e) => BlockchainError::Network(e.to_string()),
        other => BlockchainError::Unknown(other.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::contracts::abi::{IMultisigWallet, IWalletFactory};

    fn custom_error(name: &str) -> Vec<u8> {
        error_selector(name).to_vec()
    }

    #[test]
    fn test_selectors_match_generated_bindings() {
        assert_eq!(error_selector("OnlySigner"), IMultisigWallet::OnlySigner::SELECTOR);
        assert_eq!(
            error_selector("TransactionLacksApprovals"),
            IMultisigWallet::TransactionLacksApprovals::SELECTOR
        );
        assert_eq!(
            error_selector("WalletDoesNotExist"),
            IWalletFactory::WalletDoesNotExist::SELECTOR
        );
    }

    #[test]
    fn test_decode_custom_error() {
        assert_eq!(decode_revert(&custom_error("OnlySigner")), "Only signer.");
        assert_eq!(
            decode_revert(&custom_error("TransactionDoesNotExist")),
            "Transaction does not exist."
        );
        assert_eq!(
            decode_revert(&custom_error("WalletDoesNotExist")),
            "Wallet does not exist."
        );
    }

    #[test]
    fn test_decode_revert_string() {
        let data = Revert { reason: "Not enough approvals".to_string() }.abi_encode();
        assert_eq!(&data[..4], &[0x08, 0xc3, 0x79, 0xa0]);
        assert_eq!(decode_revert(&data), "Not enough approvals");
    }

    #[test]
    fn test_decode_unknown_or_short_data() {
        assert_eq!(decode_revert(&[0xde, 0xad, 0xbe, 0xef]), GENERIC_REVERT_MESSAGE);
        assert_eq!(decode_revert(&[0x01]), GENERIC_REVERT_MESSAGE);
    }

    #[test]
    fn test_resolve_user_rejection() {
        let err = resolve_rpc_failure(4001, "User rejected the request.", None);
        assert!(matches!(err, BlockchainError::ActionRejected));
    }

    #[test]
    fn test_resolve_revert_with_data() {
        let data = custom_error("TransactionAlreadyApproved");
        let err = resolve_rpc_failure(3, "execution reverted", Some(&data));
        assert_eq!(err.to_string(), "Transaction already approved.");
        assert_eq!(err.code(), "CALL_EXCEPTION");
    }

    #[test]
    fn test_resolve_revert_without_data() {
        let err = resolve_rpc_failure(-32000, "execution reverted", None);
        assert_eq!(err.to_string(), GENERIC_REVERT_MESSAGE);
    }

    #[test]
    fn test_resolve_insufficient_funds() {
        let err = resolve_rpc_failure(
            -32000,
            "insufficient funds for gas * price + value",
            None,
        );
        assert!(matches!(err, BlockchainError::InsufficientFunds));
        assert_eq!(err.to_string(), "Unpredictable gas limit.");
    }

    #[test]
    fn test_resolve_invalid_params_and_unknown() {
        let err = resolve_rpc_failure(-32602, "bad address", None);
        assert_eq!(err.to_string(), "Invalid input format.");

        let err = resolve_rpc_failure(-32603, "internal", None);
        assert_eq!(err.to_string(), "Unknown error occurred.");
    }

    #[test]
    fn test_resolve_network_message() {
        let err = resolve_rpc_failure(-32000, "network is unreachable", None);
        assert!(matches!(err, BlockchainError::Network(_)));
    }

    #[test]
    fn test_receipt_watch_timeout_is_timeout() {
        let err = resolve_pending_error(PendingTransactionError::TxWatcher(WatchTxError::Timeout), 30);
        assert!(matches!(err, BlockchainError::Timeout(30)));
        assert_eq!(err.code(), "TIMEOUT");
    }
}
