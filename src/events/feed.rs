//! Decoded wallet events and the per-wallet activity feed.

use std::collections::VecDeque;

use alloy::primitives::{Address, B256, U256};
use alloy::rpc::types::Log;
use alloy::sol_types::SolEvent;
use dashmap::DashMap;
use serde::Serialize;
use uuid::Uuid;

use crate::contracts::abi::IMultisigWallet;

/// What happened in a wallet.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum WalletEventKind {
    Deposited {
        sender: Address,
        value: U256,
    },
    TransactionCreated {
        tx_hash: B256,
        to: Address,
        value: U256,
        token: Address,
    },
    TransactionApproved {
        tx_hash: B256,
        approver: Address,
    },
    TransactionRevoked {
        tx_hash: B256,
        revoker: Address,
    },
    TransactionCancelled {
        tx_hash: B256,
        canceller: Address,
    },
    TransactionExecuted {
        tx_hash: B256,
        executor: Address,
    },
}

impl WalletEventKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Deposited { .. } => "deposited",
            Self::TransactionCreated { .. } => "transaction_created",
            Self::TransactionApproved { .. } => "transaction_approved",
            Self::TransactionRevoked { .. } => "transaction_revoked",
            Self::TransactionCancelled { .. } => "transaction_cancelled",
            Self::TransactionExecuted { .. } => "transaction_executed",
        }
    }
}

/// One wallet log, decoded.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct WalletEvent {
    pub id: Uuid,
    pub wallet: Address,
    pub block_number: Option<u64>,
    pub transaction_hash: Option<B256>,
    pub log_index: Option<u64>,
    #[serde(flatten)]
    pub kind: WalletEventKind,
}

fn decode<E: SolEvent>(log: &Log) -> Option<E> {
    log.log_decode::<E>().ok().map(|decoded| decoded.inner.data)
}

/// Decode a wallet log; `None` for anything that is not a wallet event.
pub fn decode_wallet_event(log: &Log) -> Option<WalletEvent> {
    use IMultisigWallet::*;

    let topic0 = *log.topics().first()?;

    let kind = if topic0 == Deposited::SIGNATURE_HASH {
        decode::<Deposited>(log).map(|e| WalletEventKind::Deposited {
            sender: e.sender,
            value: e.value,
        })
    } else if topic0 == TransactionCreated::SIGNATURE_HASH {
        decode::<TransactionCreated>(log).map(|e| WalletEventKind::TransactionCreated {
            tx_hash: e.txHash,
            to: e.to,
            value: e.value,
            token: e.token,
        })
    } else if topic0 == TransactionApproved::SIGNATURE_HASH {
        decode::<TransactionApproved>(log).map(|e| WalletEventKind::TransactionApproved {
            tx_hash: e.txHash,
            approver: e.approver,
        })
    } else if topic0 == TransactionRevoked::SIGNATURE_HASH {
        decode::<TransactionRevoked>(log).map(|e| WalletEventKind::TransactionRevoked {
            tx_hash: e.txHash,
            revoker: e.revoker,
        })
    } else if topic0 == TransactionCancelled::SIGNATURE_HASH {
        decode::<TransactionCancelled>(log).map(|e| WalletEventKind::TransactionCancelled {
            tx_hash: e.txHash,
            canceller: e.canceller,
        })
    } else if topic0 == TransactionExecuted::SIGNATURE_HASH {
        decode::<TransactionExecuted>(log).map(|e| WalletEventKind::TransactionExecuted {
            tx_hash: e.txHash,
            executor: e.executor,
        })
    } else {
        None
    }?;

    Some(WalletEvent {
        id: Uuid::new_v4(),
        wallet: log.address(),
        block_number: log.block_number,
        transaction_hash: log.transaction_hash,
        log_index: log.log_index,
        kind,
    })
}

/// Bounded, per-wallet history of recent events.
#[derive(Debug)]
pub struct ActivityFeed {
    inner: DashMap<Address, VecDeque<WalletEvent>>,
    capacity: usize,
}

impl ActivityFeed {
    pub fn new(capacity: usize) -> Self {
        Self {
            inner: DashMap::new(),
            capacity: capacity.max(1),
        }
    }

    /// Append an event, dropping the oldest once the wallet is at capacity.
    pub fn push(&self, event: WalletEvent) {
        let mut events = self.inner.entry(event.wallet).or_default();
        events.push_back(event);
        while events.len() > self.capacity {
            events.pop_front();
        }
    }

    /// Newest first.
    pub fn recent(&self, wallet: &Address, limit: Option<usize>) -> Vec<WalletEvent> {
        self.inner
            .get(wallet)
            .map(|events| {
                events
                    .iter()
                    .rev()
                    .take(limit.unwrap_or(usize::MAX))
                    .cloned()
                    .collect()
            })
            .unwrap_or_default()
    }

    pub fn len(&self, wallet: &Address) -> usize {
        self.inner.get(wallet).map(|events| events.len()).unwrap_or(0)
    }

    pub fn clear(&self) {
        self.inner.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloy::primitives::Log as PrimitiveLog;

    fn rpc_log<E: SolEvent>(wallet: Address, block: u64, event: &E) -> Log {
        Log {
            inner: PrimitiveLog {
                address: wallet,
                data: event.encode_log_data(),
            },
            block_number: Some(block),
            transaction_hash: Some(B256::repeat_byte(block as u8)),
            log_index: Some(0),
            ..Default::default()
        }
    }

    fn deposit(wallet: Address, block: u64) -> WalletEvent {
        decode_wallet_event(&rpc_log(
            wallet,
            block,
            &IMultisigWallet::Deposited {
                sender: Address::repeat_byte(0x22),
                value: U256::from(block),
            },
        ))
        .unwrap()
    }

    #[test]
    fn test_decode_approval() {
        let wallet = Address::repeat_byte(0x11);
        let log = rpc_log(
            wallet,
            12,
            &IMultisigWallet::TransactionApproved {
                txHash: B256::repeat_byte(0xaa),
                approver: Address::repeat_byte(0x33),
            },
        );

        let event = decode_wallet_event(&log).unwrap();
        assert_eq!(event.wallet, wallet);
        assert_eq!(event.block_number, Some(12));
        assert_eq!(
            event.kind,
            WalletEventKind::TransactionApproved {
                tx_hash: B256::repeat_byte(0xaa),
                approver: Address::repeat_byte(0x33),
            }
        );

        let json = serde_json::to_value(&event).unwrap();
        assert_eq!(json["kind"], "transaction_approved");
    }

    #[test]
    fn test_unrelated_log_is_ignored() {
        let log = Log::default();
        assert!(decode_wallet_event(&log).is_none());
    }

    #[test]
    fn test_feed_is_bounded_and_newest_first() {
        let wallet = Address::repeat_byte(0x11);
        let feed = ActivityFeed::new(2);

        feed.push(deposit(wallet, 1));
        feed.push(deposit(wallet, 2));
        feed.push(deposit(wallet, 3));

        let recent = feed.recent(&wallet, None);
        assert_eq!(feed.len(&wallet), 2);
        assert_eq!(recent[0].block_number, Some(3));
        assert_eq!(recent[1].block_number, Some(2));

        assert_eq!(feed.recent(&wallet, Some(1)).len(), 1);
        assert!(feed.recent(&Address::ZERO, None).is_empty());
    }
}
