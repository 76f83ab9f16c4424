//! Navigation: load what a view needs, then report where the dashboard is.

use alloy::primitives::{Address, B256};

use crate::blockchain::types::{BlockchainError, BlockchainResult};
use crate::dashboard::interaction::Dashboard;
use crate::dashboard::routes::{RouteLocation, RouteName};

impl Dashboard {
    /// Explicit wallet first, then the selected one.
    fn resolve_wallet(&self, wallet: Option<Address>) -> BlockchainResult<Address> {
        wallet
            .or_else(|| self.wallets().selected().map(|w| w.address))
            .ok_or_else(|| BlockchainError::InvalidArgument("no wallet selected".to_string()))
    }

    /// Reload the current page of wallets.
    pub async fn navigate_to_dashboard(&self) -> BlockchainResult<RouteLocation> {
        let page = self.wallets().current_page();
        self.fetch_paginated_wallets(page).await?;
        Ok(RouteLocation::new(RouteName::Dashboard).with_page(page))
    }

    pub async fn navigate_to_wallet_show(&self, wallet: Option<Address>) -> BlockchainResult<RouteLocation> {
        let address = self.resolve_wallet(wallet)?;
        let wallet = self.fetch_wallet_by_addr(address).await?;
        self.wallets().select(Some(wallet));
        Ok(RouteLocation::new(RouteName::WalletShow).with_wallet(address))
    }

    /// Select the wallet, then either one token (argument, then store keyword)
    /// or the current page of tokens.
    pub async fn navigate_to_token_index(
        &self,
        wallet: Option<Address>,
        token: Option<Address>,
    ) -> BlockchainResult<RouteLocation> {
        let address = self.resolve_wallet(wallet)?;
        let wallet = self.fetch_wallet_by_addr(address).await?;
        self.wallets().select(Some(wallet));

        let token = token.or_else(|| self.tokens().keyword().and_then(|k| k.parse().ok()));
        let location = RouteLocation::new(RouteName::TokenIndex).with_wallet(address);

        match token {
            Some(token) => {
                let token = self.fetch_token_by_addr(address, token).await?;
                let location = location.with_token(token.address);
                self.tokens().select(Some(token));
                Ok(location)
            }
            None => {
                let page = self.tokens().current_page();
                self.fetch_paginated_tokens(address, page).await?;
                self.tokens().select(None);
                Ok(location.with_page(page))
            }
        }
    }

    /// Like [`Dashboard::navigate_to_token_index`] for transactions; also loads
    /// metadata for the ERC-20 tokens they move.
    pub async fn navigate_to_transaction_index(
        &self,
        wallet: Option<Address>,
        transaction: Option<B256>,
    ) -> BlockchainResult<RouteLocation> {
        let address = self.resolve_wallet(wallet)?;
        let wallet = self.fetch_wallet_by_addr(address).await?;
        self.wallets().select(Some(wallet));

        let hash = transaction.or_else(|| self.transactions().keyword().and_then(|k| k.parse().ok()));
        let location = RouteLocation::new(RouteName::TransactionIndex).with_wallet(address);

        let location = match hash {
            Some(hash) => {
                let transaction = self.fetch_transaction_by_hash(address, hash).await?;
                let location = location.with_transaction(transaction.hash);
                self.transactions().select(Some(transaction));
                location
            }
            None => {
                let page = self.transactions().current_page();
                self.fetch_paginated_transactions(address, page).await?;
                self.transactions().select(None);
                location.with_page(page)
            }
        };

        self.load_transaction_token_metadatas().await?;
        Ok(location)
    }

    /// Wallet activity view.
    pub fn navigate_to_notifications(&self, wallet: Option<Address>) -> BlockchainResult<RouteLocation> {
        let address = self.resolve_wallet(wallet)?;
        Ok(RouteLocation::new(RouteName::NotificationIndex).with_wallet(address))
    }
}
