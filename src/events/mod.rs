//! Wallet activity.
//!
//! # Data Flow
//! ```text
//! monitor.rs (eth_getLogs every poll_interval_ms, after confirmations)
//!     → feed.rs (decode the six wallet events, keep the newest per wallet)
//!     → GET /api/wallets/{wallet}/events
//! ```

pub mod feed;
pub mod monitor;

pub use feed::{decode_wallet_event, ActivityFeed, WalletEvent, WalletEventKind};
pub use monitor::WalletEventMonitor;
