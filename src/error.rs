//! HTTP-facing error type.

use crate::games::xiangqi::MoveError;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use derive_more::{Display, Error};
use tracing::{debug, error};

/// Body sent for every rejected move, whatever the reason.
pub const INVALID_MOVE: &str = "Invalid move";

/// Body sent when a request body could not be read.
pub const BODY_READ_FAILED: &str = "Error reading request body";

/// Errors surfaced to HTTP clients.
///
/// Every variant is terminal for the current request only.
#[derive(Debug, Display, Error)]
pub enum ApiError {
    /// The move request body did not parse.
    #[display("{_0}")]
    MalformedMove(#[error(not(source))] String),

    /// The move failed validation.
    #[display("Invalid move: {_0}")]
    InvalidMove(MoveError),

    /// No route matched.
    #[display("Not found")]
    NotFound,

    /// The request body could not be read.
    #[display("Error reading request body: {_0}")]
    BodyRead(axum::Error),
}

impl From<MoveError> for ApiError {
    fn from(err: MoveError) -> Self {
        Self::InvalidMove(err)
    }
}

impl From<serde_json::Error> for ApiError {
    fn from(err: serde_json::Error) -> Self {
        Self::MalformedMove(err.to_string())
    }
}

impl ApiError {
    /// HTTP status for this error.
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::MalformedMove(_) | ApiError::InvalidMove(_) => StatusCode::BAD_REQUEST,
            ApiError::NotFound => StatusCode::NOT_FOUND,
            ApiError::BodyRead(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let body = match &self {
            ApiError::MalformedMove(message) => message.clone(),
            ApiError::InvalidMove(_) => INVALID_MOVE.to_string(),
            ApiError::NotFound => "404 page not found".to_string(),
            ApiError::BodyRead(_) => BODY_READ_FAILED.to_string(),
        };

        if status.is_server_error() {
            error!(error = %self, %status, "Request failed");
        } else {
            debug!(error = %self, %status, "Client error");
        }

        (status, body).into_response()
    }
}
