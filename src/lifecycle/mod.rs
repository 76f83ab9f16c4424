//! Process lifecycle.
//!
//! ```text
//! SIGINT / SIGTERM (signals.rs)
//!     → Shutdown::trigger (shutdown.rs)
//!     → HTTP server drains, event monitor returns, session is written
//! ```

pub mod shutdown;
pub mod signals;

pub use shutdown::Shutdown;
