//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Validate addresses and URLs parse
//! - Validate value ranges (timeouts > 0, page sizes > 0)
//!
//! # Design Decisions
//! - Returns all validation errors, not just first
//! - Validation is pure function: DashboardConfig → Result<(), Vec<ValidationError>>
//! - Runs before config is accepted into the system

use std::net::SocketAddr;

use alloy::primitives::Address;
use thiserror::Error;

use crate::config::schema::DashboardConfig;

/// A single semantic problem in the configuration.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{field}: {reason}")]
pub struct ValidationError {
    pub field: String,
    pub reason: String,
}

impl ValidationError {
    fn new(field: impl Into<String>, reason: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            reason: reason.into(),
        }
    }
}

/// Validate a parsed configuration.
pub fn validate_config(config: &DashboardConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    if config.server.bind_address.parse::<SocketAddr>().is_err() {
        errors.push(ValidationError::new(
            "server.bind_address",
            format!("'{}' is not a socket address", config.server.bind_address),
        ));
    }
    if config.server.request_timeout_secs == 0 {
        errors.push(ValidationError::new("server.request_timeout_secs", "must be greater than zero"));
    }

    let chain = &config.blockchain;
    if chain.rpc_url.parse::<url::Url>().is_err() {
        errors.push(ValidationError::new(
            "blockchain.rpc_url",
            format!("'{}' is not a valid URL", chain.rpc_url),
        ));
    }
    for (i, failover) in chain.failover_urls.iter().enumerate() {
        if failover.parse::<url::Url>().is_err() {
            errors.push(ValidationError::new(
                format!("blockchain.failover_urls[{i}]"),
                format!("'{failover}' is not a valid URL"),
            ));
        }
    }
    if chain.rpc_timeout_secs == 0 {
        errors.push(ValidationError::new("blockchain.rpc_timeout_secs", "must be greater than zero"));
    }
    if chain.receipt_timeout_secs == 0 {
        errors.push(ValidationError::new("blockchain.receipt_timeout_secs", "must be greater than zero"));
    }

    // An empty factory address is allowed: factory routes then answer 503.
    let factory = &config.contracts.wallet_factory;
    if !factory.is_empty() && factory.parse::<Address>().is_err() {
        errors.push(ValidationError::new(
            "contracts.wallet_factory",
            format!("'{factory}' is not an address"),
        ));
    }
    if config.contracts.multicall3.parse::<Address>().is_err() {
        errors.push(ValidationError::new(
            "contracts.multicall3",
            format!("'{}' is not an address", config.contracts.multicall3),
        ));
    }

    let pages = &config.pagination;
    for (field, value) in [
        ("pagination.wallets_per_page", pages.wallets_per_page),
        ("pagination.tokens_per_page", pages.tokens_per_page),
        ("pagination.transactions_per_page", pages.transactions_per_page),
    ] {
        if value == 0 {
            errors.push(ValidationError::new(field, "must be greater than zero"));
        }
    }

    for (i, wallet) in config.events.wallets.iter().enumerate() {
        if wallet.parse::<Address>().is_err() {
            errors.push(ValidationError::new(
                format!("events.wallets[{i}]"),
                format!("'{wallet}' is not an address"),
            ));
        }
    }
    if config.events.enabled && config.events.poll_interval_ms == 0 {
        errors.push(ValidationError::new("events.poll_interval_ms", "must be greater than zero"));
    }
    if config.events.feed_capacity == 0 {
        errors.push(ValidationError::new("events.feed_capacity", "must be greater than zero"));
    }

    if config.observability.metrics_enabled
        && config.observability.metrics_address.parse::<SocketAddr>().is_err()
    {
        errors.push(ValidationError::new(
            "observability.metrics_address",
            format!("'{}' is not a socket address", config.observability.metrics_address),
        ));
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        assert!(validate_config(&DashboardConfig::default()).is_ok());
    }

    #[test]
    fn test_collects_every_error() {
        let mut config = DashboardConfig::default();
        config.blockchain.rpc_url = "not a url".to_string();
        config.blockchain.rpc_timeout_secs = 0;
        config.pagination.transactions_per_page = 0;
        config.events.wallets.push("0x1234".to_string());

        let errors = validate_config(&config).unwrap_err();
        let fields: Vec<_> = errors.iter().map(|e| e.field.as_str()).collect();
        assert_eq!(
            fields,
            vec![
                "blockchain.rpc_url",
                "blockchain.rpc_timeout_secs",
                "pagination.transactions_per_page",
                "events.wallets[0]",
            ]
        );
    }

    #[test]
    fn test_metrics_address_checked_only_when_enabled() {
        let mut config = DashboardConfig::default();
        config.observability.metrics_address = "nowhere".to_string();
        assert!(validate_config(&config).is_ok());

        config.observability.metrics_enabled = true;
        let errors = validate_config(&config).unwrap_err();
        assert_eq!(errors[0].field, "observability.metrics_address");
    }
}
