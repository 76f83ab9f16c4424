//! Multisig wallet dashboard library.

pub mod blockchain;
pub mod config;
pub mod contracts;
pub mod dashboard;
pub mod events;
pub mod http;
pub mod lifecycle;
pub mod observability;
pub mod utils;

pub use config::schema::DashboardConfig;
pub use dashboard::Dashboard;
pub use http::HttpServer;
pub use lifecycle::Shutdown;
