//! Blockchain integration subsystem.
//!
//! # Data Flow
//! ```text
//! Environment Variables (private key)
//!     → wallet.rs (key loading)
//!     → client.rs (RPC connection, failover reads, signing provider)
//!     → transaction.rs (send, confirm, decode receipt events)
//!     → errors.rs (normalize every failure into BlockchainError)
//! ```
//!
//! # Security Constraints
//! - Private keys ONLY from environment variables
//! - Never log private keys or passwords
//! - All RPC calls have configurable timeouts
//! - Graceful degradation when blockchain unreachable

pub mod client;
pub mod errors;
pub mod transaction;
pub mod types;
pub mod wallet;

pub use client::BlockchainClient;
pub use types::{BlockchainConfig, BlockchainError, BlockchainResult, ChainId};
pub use wallet::Wallet;
