//! API error type and its JSON rendering.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;
use thiserror::Error;

use crate::blockchain::types::BlockchainError;

/// Errors returned by API handlers.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error(transparent)]
    Blockchain(#[from] BlockchainError),

    #[error("{0}")]
    BadRequest(String),

    #[error("Session could not be saved: {0}")]
    Session(#[from] std::io::Error),
}

/// Body of every error response.
#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub code: &'static str,
    pub message: String,
}

impl ApiError {
    pub fn code(&self) -> &'static str {
        match self {
            Self::Blockchain(e) => e.code(),
            Self::BadRequest(_) => "INVALID_ARGUMENT",
            Self::Session(_) => "SESSION_ERROR",
        }
    }

    pub fn status(&self) -> StatusCode {
        match self {
            Self::Blockchain(e) => match e {
                BlockchainError::ActionRejected => StatusCode::FORBIDDEN,
                BlockchainError::Reverted(_) | BlockchainError::TransactionFailed => {
                    StatusCode::UNPROCESSABLE_ENTITY
                }
                BlockchainError::InsufficientFunds | BlockchainError::InvalidArgument(_) => {
                    StatusCode::BAD_REQUEST
                }
                BlockchainError::Wallet(_) | BlockchainError::NoSigner => StatusCode::CONFLICT,
                BlockchainError::Network(_)
                | BlockchainError::Rpc(_)
                | BlockchainError::ChainMismatch { .. } => StatusCode::BAD_GATEWAY,
                BlockchainError::Timeout(_) => StatusCode::GATEWAY_TIMEOUT,
                BlockchainError::NotAvailable(_) => StatusCode::SERVICE_UNAVAILABLE,
                BlockchainError::Unknown(_) => StatusCode::INTERNAL_SERVER_ERROR,
            },
            Self::BadRequest(_) => StatusCode::BAD_REQUEST,
            Self::Session(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            tracing::error!(error = ?self, "Request failed");
        } else {
            tracing::debug!(error = ?self, "Request rejected");
        }

        let body = ErrorBody {
            code: self.code(),
            message: self.to_string(),
        };
        (status, Json(body)).into_response()
    }
}

pub type ApiResult<T> = Result<T, ApiError>;
