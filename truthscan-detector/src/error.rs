//! Error types for truthscan-detector.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};

/// Message returned for any 5xx; details stay in the logs.
pub const INTERNAL_ERROR_MESSAGE: &str = "Internal server error";

/// Detector service errors.
#[derive(Debug, thiserror::Error)]
pub enum DetectorError {
    #[error("{0}")]
    InvalidRequest(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl From<truthscan_common::Error> for DetectorError {
    fn from(err: truthscan_common::Error) -> Self {
        if err.is_client_error() {
            Self::InvalidRequest(err.to_string())
        } else {
            Self::Internal(err.to_string())
        }
    }
}

impl IntoResponse for DetectorError {
    fn into_response(self) -> Response {
        let (status, message) = match &self {
            DetectorError::InvalidRequest(msg) => (StatusCode::BAD_REQUEST, msg.clone()),
            DetectorError::Internal(detail) => {
                tracing::error!(error = %detail, "Request failed with internal error");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    INTERNAL_ERROR_MESSAGE.to_string(),
                )
            }
        };

        let body = serde_json::json!({
            "success": false,
            "error": message,
        });

        (status, axum::Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    async fn body_json(response: Response) -> serde_json::Value {
        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        serde_json::from_slice(&body).unwrap()
    }

    #[test]
    fn test_error_display() {
        let err = DetectorError::InvalidRequest("Text is required".to_string());
        assert_eq!(err.to_string(), "Text is required");
    }

    #[tokio::test]
    async fn test_invalid_request_response() {
        let response = DetectorError::InvalidRequest("bad".into()).into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let json = body_json(response).await;
        assert_eq!(json["success"], false);
        assert_eq!(json["error"], "bad");
    }

    #[tokio::test]
    async fn test_internal_error_hides_detail() {
        let response = DetectorError::Internal("db password wrong".into()).into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        let json = body_json(response).await;
        assert_eq!(json["error"], INTERNAL_ERROR_MESSAGE);
    }

    #[test]
    fn test_from_common_error() {
        let err: DetectorError = truthscan_common::Error::InvalidInput("x".into()).into();
        assert!(matches!(err, DetectorError::InvalidRequest(_)));

        let err: DetectorError = truthscan_common::Error::Internal("x".into()).into();
        assert!(matches!(err, DetectorError::Internal(_)));
    }
}
