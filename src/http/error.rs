//! Mapping of service errors onto HTTP responses.

use crate::Error;
use crate::observability::current_request_id;
use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Serialize;

/// Error returned by the todo handlers.
///
/// | Error | Status | Body |
/// |-------|--------|------|
/// | `NotFound` | 404 | empty |
/// | `InvalidInput` | 400 | `{"error": <message>}` |
/// | anything else | 500 | `{"error": "internal server error"}` |
#[derive(Debug)]
pub struct ApiError(Error);

impl ApiError {
    /// Status code this error maps to.
    #[must_use]
    pub const fn status(&self) -> StatusCode {
        match self.0 {
            Error::NotFound { .. } => StatusCode::NOT_FOUND,
            Error::InvalidInput(_) => StatusCode::BAD_REQUEST,
            Error::OperationFailed { .. } | Error::FeatureNotEnabled(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            },
        }
    }
}

impl From<Error> for ApiError {
    fn from(err: Error) -> Self {
        Self(err)
    }
}

#[derive(Serialize)]
struct ErrorBody {
    error: String,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        match self.0 {
            Error::NotFound { id } => {
                tracing::debug!(%id, "Todo not found");
                status.into_response()
            },
            Error::InvalidInput(message) => {
                tracing::warn!(error = %message, "Rejected request");
                (status, Json(ErrorBody { error: message })).into_response()
            },
            err => {
                tracing::error!(
                    error = %err,
                    request_id = current_request_id().as_deref().unwrap_or("-"),
                    "Request failed"
                );
                (
                    status,
                    Json(ErrorBody {
                        error: "internal server error".to_string(),
                    }),
                )
                    .into_response()
            },
        }
    }
}
