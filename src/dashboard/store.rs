//! In-memory state containers for wallets, tokens, transactions and token metadata.
//!
//! List stores keep an immutable snapshot behind `ArcSwap`; readers never
//! block and every update publishes a fresh snapshot.

use std::sync::Arc;

use alloy::primitives::{Address, B256};
use arc_swap::ArcSwap;
use dashmap::DashMap;
use serde::Serialize;

use crate::contracts::types::{Token, TokenMetadata, Transaction, Wallet};

/// Records that can be selected by a stable key.
pub trait Keyed {
    type Key: Copy + PartialEq + std::fmt::Debug + Serialize + Send + Sync + 'static;

    fn key(&self) -> Self::Key;
}

impl Keyed for Wallet {
    type Key = Address;

    fn key(&self) -> Address {
        self.address
    }
}

impl Keyed for Token {
    type Key = Address;

    fn key(&self) -> Address {
        self.address
    }
}

impl Keyed for Transaction {
    type Key = B256;

    fn key(&self) -> B256 {
        self.hash
    }
}

/// One published state of a list store.
#[derive(Debug, Clone, Serialize)]
pub struct ListState<T: Keyed> {
    pub items: Vec<T>,
    pub selected: Option<T::Key>,
    pub current_page: u64,
    pub keyword: Option<String>,
}

impl<T: Keyed> Default for ListState<T> {
    fn default() -> Self {
        Self {
            items: Vec::new(),
            selected: None,
            current_page: 1,
            keyword: None,
        }
    }
}

impl<T: Keyed + Clone> ListState<T> {
    /// The selected record, if it is still in the list.
    pub fn selected_item(&self) -> Option<&T> {
        let key = self.selected?;
        self.items.iter().find(|item| item.key() == key)
    }

    pub fn find(&self, key: T::Key) -> Option<&T> {
        self.items.iter().find(|item| item.key() == key)
    }
}

/// Paged list with an optional selection and a route keyword.
pub struct ListStore<T: Keyed> {
    state: ArcSwap<ListState<T>>,
}

pub type WalletStore = ListStore<Wallet>;
pub type TokenStore = ListStore<Token>;
pub type TransactionStore = ListStore<Transaction>;

impl<T: Keyed + Clone> ListStore<T> {
    pub fn new() -> Self {
        Self {
            state: ArcSwap::from_pointee(ListState::default()),
        }
    }

    /// Current snapshot.
    pub fn snapshot(&self) -> Arc<ListState<T>> {
        self.state.load_full()
    }

    pub fn items(&self) -> Vec<T> {
        self.state.load().items.clone()
    }

    pub fn current_page(&self) -> u64 {
        self.state.load().current_page
    }

    pub fn keyword(&self) -> Option<String> {
        self.state.load().keyword.clone()
    }

    pub fn selected(&self) -> Option<T> {
        self.state.load().selected_item().cloned()
    }

    pub fn find(&self, key: T::Key) -> Option<T> {
        self.state.load().find(key).cloned()
    }

    /// Patch page and keyword from the route.
    pub fn set_route(&self, current_page: u64, keyword: Option<String>) {
        self.state.rcu(|state| ListState {
            current_page,
            keyword: keyword.clone(),
            ..(**state).clone()
        });
    }

    pub fn set_items(&self, items: Vec<T>) {
        self.state.rcu(|state| ListState {
            items: items.clone(),
            ..(**state).clone()
        });
    }

    pub fn set_page(&self, current_page: u64) {
        self.state.rcu(|state| ListState {
            current_page,
            ..(**state).clone()
        });
    }

    /// Select `item`, replacing the listed copy with the same key.
    ///
    /// `None` clears the selection.
    pub fn select(&self, item: Option<T>) {
        self.state.rcu(|state| {
            let mut next = (**state).clone();
            match &item {
                Some(item) => {
                    let key = item.key();
                    for listed in next.items.iter_mut().filter(|listed| listed.key() == key) {
                        *listed = item.clone();
                    }
                    next.selected = Some(key);
                }
                None => next.selected = None,
            }
            next
        });
    }

    /// Select the listed record with `key`; false when it is not listed.
    pub fn select_key(&self, key: T::Key) -> bool {
        match self.find(key) {
            Some(item) => {
                self.select(Some(item));
                true
            }
            None => false,
        }
    }

    pub fn reset(&self) {
        self.state.store(Arc::new(ListState::default()));
    }
}

impl<T: Keyed + Clone> Default for ListStore<T> {
    fn default() -> Self {
        Self::new()
    }
}

/// ERC-20 metadata keyed by token address.
#[derive(Debug, Default)]
pub struct TokenMetadataStore {
    inner: DashMap<Address, TokenMetadata>,
}

impl TokenMetadataStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn find(&self, address: &Address) -> Option<TokenMetadata> {
        self.inner.get(address).map(|r| r.value().clone())
    }

    pub fn contains(&self, address: &Address) -> bool {
        self.inner.contains_key(address)
    }

    pub fn insert_all(&self, metadatas: impl IntoIterator<Item = TokenMetadata>) {
        for metadata in metadatas {
            self.inner.insert(metadata.address, metadata);
        }
    }

    /// Every stored entry, ordered by address.
    pub fn all(&self) -> Vec<TokenMetadata> {
        let mut all: Vec<_> = self.inner.iter().map(|r| r.value().clone()).collect();
        all.sort_by_key(|m| m.address);
        all
    }

    pub fn len(&self) -> usize {
        self.inner.len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }

    pub fn reset(&self) {
        self.inner.clear();
    }
}
