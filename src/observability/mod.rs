//! Logs and metrics for the dashboard.
//!
//! ```text
//! tracing events (every subsystem) ──▶ logging.rs  ──▶ stdout
//! RPC reads, writes, API requests,
//! decoded wallet events            ──▶ metrics.rs  ──▶ Prometheus scrape listener
//! ```
//!
//! The `x-request-id` set by the HTTP layer shows up on every `TraceLayer` span.

pub mod logging;
pub mod metrics;
