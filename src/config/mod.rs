//! Dashboard configuration.
//!
//! ```text
//! dashboard.toml
//!     → loader.rs (read, deserialize with serde defaults)
//!     → validation.rs (addresses, URLs, ranges; every problem reported)
//!     → DashboardConfig, handed to each subsystem at startup
//! ```
//!
//! Nothing is reloaded at runtime. The signer key is read from the
//! environment, never from this file.

pub mod loader;
pub mod schema;
pub mod validation;

pub use loader::{load_config, ConfigError};
pub use schema::{
    BlockchainConfig, ContractsConfig, DashboardConfig, EventsConfig, ObservabilityConfig,
    PaginationConfig, ServerConfig, SessionConfig,
};
