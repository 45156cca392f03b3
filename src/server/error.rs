//! Error types and JSON error responses for the HTTP surface.

use axum::http::header::CONTENT_TYPE;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use thiserror::Error;

use crate::app::ActionError;
use crate::render::SnapshotError;
use crate::router::RouteError;

#[derive(Debug, Error)]
pub enum ServerError {
    /// Route resolution failed (guard error, bad pattern)
    #[error("Route error: {0}")]
    Route(#[from] RouteError),

    /// The business layer rejected the action
    #[error("Action rejected: {0}")]
    Action(#[from] ActionError),

    #[error("Snapshot error: {0}")]
    Snapshot(#[from] SnapshotError),

    #[error("Missing session header")]
    MissingSession,

    #[error("Unknown session '{0}'")]
    UnknownSession(String),

    /// Invalid request format or parameters
    #[error("Invalid request: {0}")]
    InvalidRequest(String),
}

impl ServerError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            ServerError::Route(_) => StatusCode::INTERNAL_SERVER_ERROR,
            ServerError::Action(ActionError::UnknownAction(_)) => StatusCode::NOT_FOUND,
            ServerError::Action(ActionError::InvalidPayload { .. }) => {
                StatusCode::UNPROCESSABLE_ENTITY
            }
            ServerError::Snapshot(_) => StatusCode::INTERNAL_SERVER_ERROR,
            ServerError::MissingSession => StatusCode::BAD_REQUEST,
            ServerError::UnknownSession(_) => StatusCode::NOT_FOUND,
            ServerError::InvalidRequest(_) => StatusCode::BAD_REQUEST,
        }
    }

    pub fn error_type(&self) -> &'static str {
        match self {
            ServerError::Route(_) => "route_error",
            ServerError::Action(ActionError::UnknownAction(_)) => "unknown_action",
            ServerError::Action(ActionError::InvalidPayload { .. }) => "invalid_payload",
            ServerError::Snapshot(_) => "snapshot_error",
            ServerError::MissingSession => "missing_session",
            ServerError::UnknownSession(_) => "unknown_session",
            ServerError::InvalidRequest(_) => "invalid_request",
        }
    }
}

impl IntoResponse for ServerError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        if status.is_server_error() {
            tracing::error!(error = %self, "Request failed");
        } else {
            tracing::debug!(error = %self, "Request rejected");
        }

        let body = serde_json::json!({
            "error": {
                "type": self.error_type(),
                "message": self.to_string(),
            }
        });
        (status, [(CONTENT_TYPE, "application/json")], body.to_string()).into_response()
    }
}
