//! HTTP server setup.
//!
//! # Responsibilities
//! - Build the Axum router for the dashboard API
//! - Put wallet and token routes behind the connect guard
//! - Wire up middleware (timeout, request ID, tracing, metrics)
//! - Serve until shutdown

use std::sync::Arc;
use std::time::{Duration, Instant};

use axum::{
    body::Body,
    http::{HeaderName, Request},
    middleware::{self, Next},
    response::Response,
    routing::{delete, get, post},
    Router,
};
use tokio::net::TcpListener;
use tower_http::{
    request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer},
    timeout::TimeoutLayer,
    trace::TraceLayer,
};

use crate::config::DashboardConfig;
use crate::dashboard::Dashboard;
use crate::events::ActivityFeed;
use crate::http::guard::require_connected;
use crate::http::handlers;
use crate::lifecycle::Shutdown;
use crate::observability::metrics;

/// Header carrying the per-request correlation ID.
pub const X_REQUEST_ID: &str = "x-request-id";

/// Application state injected into handlers.
#[derive(Clone)]
pub struct AppState {
    pub dashboard: Arc<Dashboard>,
    pub feed: Arc<ActivityFeed>,
    pub config: Arc<DashboardConfig>,
}

/// Build the API router with all middleware layers.
#[allow(deprecated)]
pub fn router(state: AppState) -> Router {
    let guarded = Router::new()
        .route(
            "/api/wallets",
            get(handlers::list_wallets).post(handlers::create_wallet),
        )
        .route("/api/wallets/{wallet}", get(handlers::show_wallet))
        .route("/api/wallets/{wallet}/balance", get(handlers::wallet_balance))
        .route("/api/wallets/{wallet}/deposit", post(handlers::deposit))
        .route("/api/wallets/{wallet}/lock", post(handlers::lock_balance))
        .route("/api/wallets/{wallet}/unlock", post(handlers::unlock_balance))
        .route(
            "/api/wallets/{wallet}/tokens",
            get(handlers::list_tokens).post(handlers::add_token),
        )
        .route(
            "/api/wallets/{wallet}/tokens/{token}",
            get(handlers::show_token).delete(handlers::remove_token),
        )
        .route(
            "/api/wallets/{wallet}/transactions",
            get(handlers::list_transactions).post(handlers::create_transaction),
        )
        .route(
            "/api/wallets/{wallet}/transactions/{hash}",
            get(handlers::show_transaction),
        )
        .route(
            "/api/wallets/{wallet}/transactions/{hash}/{action}",
            post(handlers::act_on_transaction),
        )
        .route("/api/wallets/{wallet}/events", get(handlers::wallet_events))
        .route("/api/tokens/metadata", get(handlers::token_metadata))
        .route_layer(middleware::from_fn_with_state(state.clone(), require_connected));

    let request_timeout = Duration::from_secs(state.config.server.request_timeout_secs);
    let request_id = HeaderName::from_static(X_REQUEST_ID);

    Router::new()
        .route("/api/status", get(handlers::get_status))
        .route("/api/session", get(handlers::get_session))
        .route("/api/session/connect", post(handlers::connect))
        .route("/api/session/disconnect", post(handlers::disconnect))
        .merge(guarded)
        .route_layer(middleware::from_fn(record_request))
        .with_state(state)
        .layer(TimeoutLayer::new(request_timeout))
        .layer(PropagateRequestIdLayer::new(request_id.clone()))
        .layer(TraceLayer::new_for_http())
        .layer(SetRequestIdLayer::new(request_id, MakeRequestUuid))
}

/// Count and time every routed request.
async fn record_request(request: Request<Body>, next: Next) -> Response {
    let start = Instant::now();
    let method = request.method().clone();
    let response = next.run(request).await;
    metrics::record_api_request(method.as_str(), response.status().as_u16(), start);
    response
}

/// HTTP server for the dashboard API.
pub struct HttpServer {
    router: Router,
}

impl HttpServer {
    pub fn new(state: AppState) -> Self {
        Self {
            router: router(state),
        }
    }

    /// Serve on `listener` until `shutdown` fires.
    pub async fn run(self, listener: TcpListener, shutdown: Shutdown) -> Result<(), std::io::Error> {
        let addr = listener.local_addr()?;
        tracing::info!(address = %addr, "HTTP server starting");

        axum::serve(listener, self.router)
            .with_graceful_shutdown(shutdown.wait())
            .await?;

        tracing::info!("HTTP server stopped");
        Ok(())
    }
}
