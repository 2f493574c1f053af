use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use thiserror::Error;

use crate::common::{ErrorBody, ValidationError};
use crate::storage::StorageError;

pub const INVALID_MESSAGE_DATA: &str = "Invalid message data";
pub const FAILED_TO_FETCH_MESSAGES: &str = "Failed to fetch messages";
pub const FAILED_TO_GET_ONLINE_COUNT: &str = "Failed to get online count";
pub const FAILED_TO_CREATE_MESSAGE: &str = "Failed to create message";

/// Errors surfaced by the API handlers. Clients only ever see the fixed
/// public message; the inner error is logged.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("invalid message data: {0}")]
    InvalidMessage(#[from] ValidationError),
    /// The body never decoded: wrong or missing content type, broken JSON,
    /// or over the size cap. Oversized bodies deliberately answer 400
    /// "Invalid message data" rather than 413, keeping the endpoint to the
    /// documented 201/400/500 set.
    #[error("invalid message data: unreadable request body: {0}")]
    UnreadableBody(String),
    #[error("failed to fetch messages: {0}")]
    FetchMessages(#[source] StorageError),
    #[error("failed to get online count: {0}")]
    OnlineCount(#[source] StorageError),
    #[error("failed to create message: {0}")]
    CreateMessage(#[source] StorageError),
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::InvalidMessage(_) | ApiError::UnreadableBody(_) => StatusCode::BAD_REQUEST,
            ApiError::FetchMessages(_) | ApiError::OnlineCount(_) | ApiError::CreateMessage(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    pub fn public_message(&self) -> &'static str {
        match self {
            ApiError::InvalidMessage(_) | ApiError::UnreadableBody(_) => INVALID_MESSAGE_DATA,
            ApiError::FetchMessages(_) => FAILED_TO_FETCH_MESSAGES,
            ApiError::OnlineCount(_) => FAILED_TO_GET_ONLINE_COUNT,
            ApiError::CreateMessage(_) => FAILED_TO_CREATE_MESSAGE,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            log::error!("{self}");
        } else {
            log::debug!("Rejected request: {self}");
        }

        let body = ErrorBody {
            error: self.public_message().to_string(),
        };
        (status, Json(body)).into_response()
    }
}
