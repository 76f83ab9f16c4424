//! Dashboard routes, page parsing and the connect guard.

use std::fmt;

use alloy::primitives::{Address, B256};
use serde::{Deserialize, Serialize};

/// Named dashboard views.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RouteName {
    #[serde(rename = "dashboard")]
    Dashboard,
    #[serde(rename = "connect")]
    Connect,
    #[serde(rename = "wallet.create")]
    WalletCreate,
    #[serde(rename = "wallet.show")]
    WalletShow,
    #[serde(rename = "wallet.deposit")]
    WalletDeposit,
    #[serde(rename = "wallet.transfer")]
    WalletTransfer,
    #[serde(rename = "wallet.lock")]
    WalletLock,
    #[serde(rename = "token.index")]
    TokenIndex,
    #[serde(rename = "transaction.index")]
    TransactionIndex,
    #[serde(rename = "notification.index")]
    NotificationIndex,
}

impl RouteName {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Dashboard => "dashboard",
            Self::Connect => "connect",
            Self::WalletCreate => "wallet.create",
            Self::WalletShow => "wallet.show",
            Self::WalletDeposit => "wallet.deposit",
            Self::WalletTransfer => "wallet.transfer",
            Self::WalletLock => "wallet.lock",
            Self::TokenIndex => "token.index",
            Self::TransactionIndex => "transaction.index",
            Self::NotificationIndex => "notification.index",
        }
    }

    /// Everything but Connect needs a connected account.
    pub fn requires_account(self) -> bool {
        self != Self::Connect
    }

    /// The view an API path serves, or `None` for paths outside the dashboard.
    pub fn for_api_path(method: &str, path: &str) -> Option<Self> {
        let rest = path.strip_prefix("/api")?;
        let segments: Vec<&str> = rest.split('/').filter(|s| !s.is_empty()).collect();

        let route = match segments.as_slice() {
            ["session", ..] | ["status"] => Self::Connect,
            ["tokens", ..] => Self::TokenIndex,
            ["wallets"] if method == "POST" => Self::WalletCreate,
            ["wallets"] => Self::Dashboard,
            ["wallets", _] | ["wallets", _, "balance"] => Self::WalletShow,
            ["wallets", _, "deposit"] => Self::WalletDeposit,
            ["wallets", _, "lock"] | ["wallets", _, "unlock"] => Self::WalletLock,
            ["wallets", _, "tokens", ..] => Self::TokenIndex,
            ["wallets", _, "transactions"] if method == "POST" => Self::WalletTransfer,
            ["wallets", _, "transactions", ..] => Self::TransactionIndex,
            ["wallets", _, "events"] => Self::NotificationIndex,
            _ => return None,
        };
        Some(route)
    }
}

impl fmt::Display for RouteName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A concrete place in the dashboard.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RouteLocation {
    pub name: RouteName,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub wallet: Option<Address>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub token: Option<Address>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub transaction: Option<B256>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub page: Option<u64>,
}

impl RouteLocation {
    pub fn new(name: RouteName) -> Self {
        Self {
            name,
            wallet: None,
            token: None,
            transaction: None,
            page: None,
        }
    }

    pub fn with_wallet(mut self, wallet: Address) -> Self {
        self.wallet = Some(wallet);
        self
    }

    pub fn with_token(mut self, token: Address) -> Self {
        self.token = Some(token);
        self
    }

    pub fn with_transaction(mut self, hash: B256) -> Self {
        self.transaction = Some(hash);
        self
    }

    pub fn with_page(mut self, page: u64) -> Self {
        self.page = Some(page);
        self
    }

    /// Browser path for this location, e.g. `/wallets/0x…/transactions?page=2`.
    pub fn path(&self) -> String {
        let wallet = self.wallet.map(|w| format!("/wallets/{w}")).unwrap_or_default();

        let mut path = match self.name {
            RouteName::Dashboard => "/".to_string(),
            RouteName::Connect => "/connect".to_string(),
            RouteName::WalletCreate => "/wallets/create".to_string(),
            RouteName::WalletShow => wallet,
            RouteName::WalletDeposit => format!("{wallet}/deposit"),
            RouteName::WalletTransfer => format!("{wallet}/transfer"),
            RouteName::WalletLock => format!("{wallet}/lock"),
            RouteName::TokenIndex => match self.token {
                Some(token) => format!("{wallet}/tokens/{token}"),
                None => format!("{wallet}/tokens"),
            },
            RouteName::TransactionIndex => match self.transaction {
                Some(hash) => format!("{wallet}/transactions/{hash}"),
                None => format!("{wallet}/transactions"),
            },
            RouteName::NotificationIndex => format!("{wallet}/notifications"),
        };

        if let Some(page) = self.page {
            path.push_str(&format!("?page={page}"));
        }
        path
    }
}

/// Where an unconnected visitor is sent instead of `route`.
pub fn guard_redirect(route: RouteName, connected: bool) -> Option<RouteLocation> {
    if route.requires_account() && !connected {
        Some(RouteLocation::new(RouteName::Connect))
    } else {
        None
    }
}

/// Page number from a query value; anything but decimal digits is page 1.
pub fn parse_page(raw: Option<&str>) -> u64 {
    raw.filter(|s| !s.is_empty() && s.bytes().all(|b| b.is_ascii_digit()))
        .and_then(|s| s.parse::<u64>().ok())
        .map(|page| page.max(1))
        .unwrap_or(1)
}

/// Offset of the first item on `page`.
pub fn pagination_offset(page: u64, limit: u64) -> u64 {
    page.saturating_sub(1).saturating_mul(limit)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_page() {
        assert_eq!(parse_page(Some("3")), 3);
        assert_eq!(parse_page(Some("0")), 1);
        assert_eq!(parse_page(Some("-2")), 1);
        assert_eq!(parse_page(Some("2a")), 1);
        assert_eq!(parse_page(Some("")), 1);
        assert_eq!(parse_page(Some("99999999999999999999999")), 1);
        assert_eq!(parse_page(None), 1);
    }

    #[test]
    fn test_pagination_offset() {
        assert_eq!(pagination_offset(1, 5), 0);
        assert_eq!(pagination_offset(3, 10), 20);
        assert_eq!(pagination_offset(0, 5), 0);
    }

    #[test]
    fn test_paths() {
        let wallet = Address::repeat_byte(0xab);
        let hash = B256::repeat_byte(0x01);

        assert_eq!(RouteLocation::new(RouteName::Dashboard).with_page(2).path(), "/?page=2");
        assert_eq!(RouteLocation::new(RouteName::Connect).path(), "/connect");
        assert_eq!(
            RouteLocation::new(RouteName::WalletShow).with_wallet(wallet).path(),
            format!("/wallets/{wallet}")
        );
        assert_eq!(
            RouteLocation::new(RouteName::TransactionIndex)
                .with_wallet(wallet)
                .with_transaction(hash)
                .path(),
            format!("/wallets/{wallet}/transactions/{hash}")
        );
        assert_eq!(
            RouteLocation::new(RouteName::TokenIndex)
                .with_wallet(wallet)
                .with_page(4)
                .path(),
            format!("/wallets/{wallet}/tokens?page=4")
        );
    }

    #[test]
    fn test_guard() {
        assert!(guard_redirect(RouteName::Connect, false).is_none());
        assert!(guard_redirect(RouteName::Dashboard, true).is_none());

        let redirect = guard_redirect(RouteName::WalletShow, false).unwrap();
        assert_eq!(redirect.name, RouteName::Connect);
        assert_eq!(redirect.path(), "/connect");
    }

    #[test]
    fn test_api_path_mapping() {
        assert_eq!(RouteName::for_api_path("GET", "/api/status"), Some(RouteName::Connect));
        assert_eq!(RouteName::for_api_path("POST", "/api/session/connect"), Some(RouteName::Connect));
        assert_eq!(RouteName::for_api_path("GET", "/api/wallets"), Some(RouteName::Dashboard));
        assert_eq!(RouteName::for_api_path("POST", "/api/wallets"), Some(RouteName::WalletCreate));
        assert_eq!(
            RouteName::for_api_path("POST", "/api/wallets/0x1/transactions"),
            Some(RouteName::WalletTransfer)
        );
        assert_eq!(
            RouteName::for_api_path("POST", "/api/wallets/0x1/transactions/0x2/approve"),
            Some(RouteName::TransactionIndex)
        );
        assert_eq!(
            RouteName::for_api_path("GET", "/api/wallets/0x1/events"),
            Some(RouteName::NotificationIndex)
        );
        assert_eq!(RouteName::for_api_path("GET", "/metrics"), None);
    }

    #[test]
    fn test_route_name_serde() {
        let json = serde_json::to_string(&RouteName::WalletShow).unwrap();
        assert_eq!(json, "\"wallet.show\"");
        assert_eq!(RouteName::TokenIndex.to_string(), "token.index");
    }
}
