use axum::extract::rejection::{JsonRejection, PathRejection};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use common::types::Message;
use service::auth::errors::AuthError;
use service::errors::ServiceError;
use thiserror::Error;
use tracing::{debug, error};

pub const INVALID_PAYLOAD: &str = "Invalid payload";
pub const MISSING_SERVICE_FIELDS: &str = "Title and description are required";

/// Error surface of the HTTP API. Each variant renders as
/// `{"message": ...}`; internal detail is logged, never returned.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Invalid credentials")]
    InvalidCredentials,
    #[error("Unauthorized")]
    Unauthorized,
    #[error("{0}")]
    InvalidPayload(&'static str),
    #[error("{message}")]
    Storage { message: &'static str, detail: String },
    #[error("{message}")]
    Session { message: &'static str, detail: String },
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::InvalidCredentials | ApiError::Unauthorized => StatusCode::UNAUTHORIZED,
            ApiError::InvalidPayload(_) => StatusCode::BAD_REQUEST,
            ApiError::Storage { .. } | ApiError::Session { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Map a content-layer failure: input problems become 400, anything
    /// else is a storage fault reported as `message`.
    pub fn content(message: &'static str) -> impl FnOnce(ServiceError) -> ApiError {
        move |e| {
            if e.is_validation() {
                ApiError::InvalidPayload(MISSING_SERVICE_FIELDS)
            } else {
                ApiError::Storage { message, detail: e.to_string() }
            }
        }
    }
}

impl From<AuthError> for ApiError {
    fn from(e: AuthError) -> Self {
        debug!(code = e.code(), error = %e, "auth error");
        match e {
            AuthError::InvalidCredentials => ApiError::InvalidCredentials,
            AuthError::Unauthorized => ApiError::Unauthorized,
            AuthError::Session(detail) => ApiError::Session { message: "Failed to logout", detail },
            AuthError::HashError(detail) => ApiError::Session { message: "Failed to establish session", detail },
        }
    }
}

impl From<JsonRejection> for ApiError {
    fn from(e: JsonRejection) -> Self {
        debug!(error = %e.body_text(), "rejected request body");
        ApiError::InvalidPayload(INVALID_PAYLOAD)
    }
}

impl From<PathRejection> for ApiError {
    fn from(e: PathRejection) -> Self {
        debug!(error = %e.body_text(), "rejected path parameter");
        ApiError::InvalidPayload(INVALID_PAYLOAD)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        match &self {
            ApiError::Storage { message, detail } | ApiError::Session { message, detail } => {
                error!(event = "request_failed", %status, reason = *message, detail = %detail, "internal error");
            }
            _ => debug!(%status, reason = %self, "request rejected"),
        }
        (status, Json(Message::new(self.to_string()))).into_response()
    }
}
