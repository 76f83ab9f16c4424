//! The dashboard itself: stores, session, navigation and interaction.
//!
//! # Data Flow
//! ```text
//! route (page, keyword)
//!     → interaction.rs (sync_*_with_route, fetch_*, writes)
//!     → contracts services → BlockchainClient
//!     → store.rs (snapshots read by the API)
//!
//! navigator.rs: resolve wallet/item from arguments or selection,
//!               load, select, return the RouteLocation
//! ```

pub mod interaction;
pub mod navigator;
pub mod routes;
pub mod session;
pub mod store;

pub use interaction::{CreatedWallet, Dashboard};
pub use routes::{guard_redirect, pagination_offset, parse_page, RouteLocation, RouteName};
pub use session::{Session, SessionState};
pub use store::{ListState, TokenMetadataStore, TokenStore, TransactionStore, WalletStore};
