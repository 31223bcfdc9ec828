use axum::http::StatusCode;
use axum::response::{IntoResponse, Json, Response};
use serde::Serialize;

use nudge_core::errors::{NudgeError, NudgeErrorCode};

/// Error body: `{status: "error", code, message}`.
#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub status: &'static str,
    pub code: &'static str,
    pub message: String,
}

/// A `NudgeError` on its way out of a handler. Storage failures are 503 so
/// upstream webhook senders retry; anything else is a 500.
#[derive(Debug)]
pub struct ApiError(pub NudgeError);

impl From<NudgeError> for ApiError {
    fn from(e: NudgeError) -> Self {
        Self(e)
    }
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self.0 {
            NudgeError::Storage(_) => StatusCode::SERVICE_UNAVAILABLE,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        tracing::error!(error = %self.0, code = self.0.error_code(), "request failed");
        let body = ErrorBody {
            status: "error",
            code: self.0.error_code(),
            message: self.0.to_string(),
        };
        (self.status(), Json(body)).into_response()
    }
}
