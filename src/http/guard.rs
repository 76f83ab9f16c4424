//! Route guard: dashboard views need a connected account.

use axum::{
    body::Body,
    extract::State,
    http::{Request, StatusCode},
    middleware::Next,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;

use crate::dashboard::routes::{guard_redirect, RouteName};
use crate::http::server::AppState;

/// Body of the 401 sent to unconnected callers.
#[derive(Debug, Serialize)]
pub struct NotConnectedBody {
    pub code: &'static str,
    pub message: &'static str,
    pub redirect: String,
}

pub async fn require_connected(
    State(state): State<AppState>,
    request: Request<Body>,
    next: Next,
) -> Response {
    let route = RouteName::for_api_path(request.method().as_str(), request.uri().path());
    let connected = state.dashboard.session().is_connected();

    if let Some(redirect) = route.and_then(|route| guard_redirect(route, connected)) {
        tracing::debug!(path = %request.uri().path(), "Rejected unconnected request");
        let body = NotConnectedBody {
            code: "NOT_CONNECTED",
            message: "Connect an account first.",
            redirect: redirect.path(),
        };
        return (StatusCode::UNAUTHORIZED, Json(body)).into_response();
    }

    next.run(request).await
}
