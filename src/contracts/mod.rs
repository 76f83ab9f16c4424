//! Contract bindings and typed services.
//!
//! # Data Flow
//! ```text
//! abi.rs (sol! bindings)
//!     → factory.rs / multisig.rs / erc20.rs / multicall.rs (calls via BlockchainClient)
//!     → types.rs (tuple → domain record)
//! ```

pub mod abi;
pub mod erc20;
pub mod factory;
pub mod multicall;
pub mod multisig;
pub mod types;

pub use erc20::Erc20Service;
pub use factory::WalletFactoryService;
pub use multicall::Multicall3Service;
pub use multisig::{MultisigWalletService, TransactionAction};
pub use types::{Token, TokenMetadata, Transaction, TransactionStatus, Wallet, WalletBalance};
