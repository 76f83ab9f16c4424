//! Dashboard JSON API.
//!
//! # Data Flow
//! ```text
//! request
//!     → server.rs (request ID, trace, timeout, metrics)
//!     → guard.rs (wallet/token routes need a connected account)
//!     → handlers.rs (parse, call Dashboard, answer with the view)
//!     → error.rs (ApiError → {"code","message"})
//! ```

pub mod error;
pub mod guard;
pub mod handlers;
pub mod server;

pub use error::{ApiError, ApiResult};
pub use server::{router, AppState, HttpServer, X_REQUEST_ID};
