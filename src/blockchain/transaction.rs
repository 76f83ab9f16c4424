//! Sending contract writes and reading their receipts.
//!
//! # Responsibilities
//! - Sign and broadcast a prepared contract call
//! - Wait for the configured confirmations
//! - Turn failed receipts into `TransactionFailed`
//! - Pull typed events back out of receipt logs

use std::time::{Duration, Instant};

use alloy::contract::{CallBuilder, CallDecoder};
use alloy::providers::Provider;
use alloy::rpc::types::{Log, TransactionReceipt};
use alloy::sol_types::SolEvent;

use crate::blockchain::client::BlockchainClient;
use crate::blockchain::errors::{resolve_contract_error, resolve_pending_error};
use crate::blockchain::types::{BlockchainError, BlockchainResult};
use crate::observability::metrics;

/// Whether a receipt reports failure. A missing receipt is not a failure.
pub fn did_transaction_fail(receipt: Option<&TransactionReceipt>) -> bool {
    match receipt {
        Some(receipt) => !receipt.status(),
        None => false,
    }
}

/// Whether a receipt reports success.
pub fn did_transaction_succeed(receipt: Option<&TransactionReceipt>) -> bool {
    !did_transaction_fail(receipt)
}

/// First log in `logs` that decodes as `E`.
pub fn find_event<E: SolEvent>(logs: &[Log]) -> Option<E> {
    logs.iter()
        .find_map(|log| log.log_decode::<E>().ok())
        .map(|decoded| decoded.inner.data)
}

impl BlockchainClient {
    /// Send a contract write and wait for its receipt.
    ///
    /// The call must have been built against [`BlockchainClient::signing_provider`].
    pub async fn submit<P, D>(
        &self,
        op: &'static str,
        call: CallBuilder<P, D>,
    ) -> BlockchainResult<TransactionReceipt>
    where
        P: Provider,
        D: CallDecoder,
    {
        let start = Instant::now();
        let result = self.send_and_confirm(op, call).await;
        let outcome = match &result {
            Ok(_) => "ok",
            Err(e) => e.code(),
        };
        metrics::record_transaction(op, outcome, start);
        result
    }

    async fn send_and_confirm<P, D>(
        &self,
        op: &'static str,
        call: CallBuilder<P, D>,
    ) -> BlockchainResult<TransactionReceipt>
    where
        P: Provider,
        D: CallDecoder,
    {
        let pending = call.send().await.map_err(resolve_contract_error)?;
        let tx_hash = *pending.tx_hash();

        tracing::info!(op, tx_hash = %tx_hash, "Transaction sent");

        let receipt_timeout = self.config().receipt_timeout_secs;
        let receipt = pending
            .with_required_confirmations(self.confirmation_blocks())
            .with_timeout(Some(Duration::from_secs(receipt_timeout)))
            .get_receipt()
            .await
            .map_err(|e| resolve_pending_error(e, receipt_timeout))?;

        if did_transaction_fail(Some(&receipt)) {
            tracing::warn!(op, tx_hash = %tx_hash, "Transaction reverted on-chain");
            return Err(BlockchainError::TransactionFailed);
        }

        tracing::info!(
            op,
            tx_hash = %tx_hash,
            block_number = receipt.block_number.unwrap_or_default(),
            "Transaction confirmed"
        );
        Ok(receipt)
    }
}

/// Logs carried by a receipt.
pub fn receipt_logs(receipt: &TransactionReceipt) -> &[Log] {
    receipt.inner.logs()
}
