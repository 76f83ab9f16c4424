//! Structured logging.
//!
//! # Responsibilities
//! - Initialize the tracing subscriber once at startup
//! - Take the default level from configuration, let `RUST_LOG` override it

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::ObservabilityConfig;

/// Directive used when neither `RUST_LOG` nor the config give a usable one.
const FALLBACK_DIRECTIVE: &str = "multisig_dashboard=info,tower_http=info";

/// Build the filter: `RUST_LOG` first, then `log_level` from config.
pub fn build_filter(config: &ObservabilityConfig) -> EnvFilter {
    EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(default_directive(&config.log_level)))
        .unwrap_or_else(|_| EnvFilter::new(FALLBACK_DIRECTIVE))
}

/// Expand a bare level such as `debug` into crate-scoped directives.
fn default_directive(level: &str) -> String {
    let level = level.trim();
    if level.contains('=') || level.contains(',') {
        level.to_string()
    } else {
        format!("multisig_dashboard={level},tower_http={level}")
    }
}

/// Install the global subscriber.
///
/// Returns an error when a subscriber is already installed.
pub fn init_tracing(
    config: &ObservabilityConfig,
) -> Result<(), tracing_subscriber::util::TryInitError> {
    tracing_subscriber::registry()
        .with(build_filter(config))
        .with(tracing_subscriber::fmt::layer())
        .try_init()
}
