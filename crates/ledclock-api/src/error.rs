//! Error types for the control API.
//!
//! [`ApiError`] unifies all failure modes into a single enum that converts
//! into the `{"ok": false, "error": "..."}` body every endpoint uses for
//! failures, via its [`IntoResponse`](axum::response::IntoResponse)
//! implementation.

use std::any::Any;

use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use ledclock_core::ControlError;

/// Errors that can occur in the control API layer.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// The control operation rejected its input.
    #[error(transparent)]
    Control(#[from] ControlError),

    /// The request body was missing or not the expected JSON.
    #[error("invalid request body: {0}")]
    InvalidBody(String),

    /// An internal error occurred.
    #[error("internal error: {0}")]
    Internal(String),
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        Self::InvalidBody(rejection.body_text())
    }
}

impl ApiError {
    const fn status(&self) -> StatusCode {
        match self {
            Self::Control(_) | Self::InvalidBody(_) => StatusCode::BAD_REQUEST,
            Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            tracing::error!(error = %self, "request failed");
        } else {
            tracing::debug!(error = %self, "request rejected");
        }

        let body = serde_json::json!({
            "ok": false,
            "error": self.to_string(),
        });

        (status, axum::Json(body)).into_response()
    }
}

/// Turn a handler panic into an [`ApiError::Internal`] response.
///
/// Installed with [`CatchPanicLayer`](tower_http::catch_panic::CatchPanicLayer)
/// so a fault in one request never takes down the server.
pub fn panic_response(payload: Box<dyn Any + Send + 'static>) -> Response {
    let detail = payload
        .downcast_ref::<String>()
        .cloned()
        .or_else(|| payload.downcast_ref::<&str>().map(|s| (*s).to_owned()))
        .unwrap_or_else(|| "handler panicked".to_owned());

    ApiError::Internal(detail).into_response()
}
