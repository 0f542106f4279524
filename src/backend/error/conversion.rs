/**
 * Error Conversion
 *
 * This module converts backend errors into HTTP responses.
 *
 * # Response Format
 *
 * Error responses are returned as JSON with the following structure:
 * ```json
 * {
 *   "success": false,
 *   "message": "Friend request not found",
 *   "error": "raw store error, only for 5xx"
 * }
 * ```
 */

use axum::{
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;

use crate::backend::error::types::BackendError;

/// Wire shape of every error response
#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub success: bool,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl From<&BackendError> for ErrorBody {
    fn from(err: &BackendError) -> Self {
        Self {
            success: false,
            message: err.message(),
            error: err.detail(),
        }
    }
}

impl IntoResponse for BackendError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        if status.is_server_error() {
            tracing::error!("Request failed: {}", self);
        } else {
            tracing::debug!("Request rejected ({}): {}", status.as_u16(), self);
        }

        (status, Json(ErrorBody::from(&self))).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::StatusCode;

    #[test]
    fn test_client_error_body_has_no_detail() {
        let body = ErrorBody::from(&BackendError::not_found("Chat"));
        let json = serde_json::to_value(&body).unwrap();
        assert_eq!(json["success"], false);
        assert_eq!(json["message"], "Chat not found");
        assert!(json.get("error").is_none());
    }

    #[test]
    fn test_into_response_status() {
        let response = BackendError::permission_denied("nope").into_response();
        assert_eq!(response.status(), StatusCode::FORBIDDEN);
    }
}
