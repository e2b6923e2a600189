//! Error handling for the gateway.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;

/// Application error type.
#[derive(Debug)]
pub enum AppError {
    /// Internal server error.
    Internal(String),
    /// Bad request.
    BadRequest(String),
    /// No user on the request.
    Unauthorized(String),
    /// The user may not act on the resource.
    Forbidden(String),
    /// Not found.
    NotFound(String),
    /// The request conflicts with the resource state.
    Conflict(String),
}

/// Error response body.
#[derive(Serialize)]
pub struct ErrorResponse {
    /// Error flag.
    pub error: bool,
    /// Error code.
    pub code: String,
    /// Error message.
    pub message: String,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code, message) = match self {
            AppError::Internal(msg) => (StatusCode::INTERNAL_SERVER_ERROR, "INTERNAL_ERROR", msg),
            AppError::BadRequest(msg) => (StatusCode::BAD_REQUEST, "BAD_REQUEST", msg),
            AppError::Unauthorized(msg) => (StatusCode::UNAUTHORIZED, "UNAUTHORIZED", msg),
            AppError::Forbidden(msg) => (StatusCode::FORBIDDEN, "FORBIDDEN", msg),
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, "NOT_FOUND", msg),
            AppError::Conflict(msg) => (StatusCode::CONFLICT, "CONFLICT", msg),
        };

        let body = ErrorResponse {
            error: true,
            code: code.to_string(),
            message,
        };

        (status, Json(body)).into_response()
    }
}

impl From<pollme_polls::Error> for AppError {
    fn from(err: pollme_polls::Error) -> Self {
        use pollme_polls::Error;

        let message = err.to_string();
        match err {
            Error::Storage(_) | Error::Serialization(_) | Error::Deserialization(_) => {
                AppError::Internal(message)
            }
            Error::PollNotFound(_)
            | Error::ChoiceNotFound(_)
            | Error::GenreNotFound(_)
            | Error::SampleDataNotFound(_)
            | Error::SampleNodeNotFound(_) => AppError::NotFound(message),
            Error::NotOwner { .. } => AppError::Forbidden(message),
            Error::AlreadyVoted { .. } | Error::PollClosed(_) | Error::DuplicateGenre(_) => {
                AppError::Conflict(message)
            }
            Error::NoChoiceSelected | Error::ChoiceNotInPoll { .. } | Error::Validation(_) => {
                AppError::BadRequest(message)
            }
        }
    }
}

impl From<serde_json::Error> for AppError {
    fn from(err: serde_json::Error) -> Self {
        AppError::Internal(format!("JSON error: {}", err))
    }
}
