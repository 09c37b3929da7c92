use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

/// Application-level error type.
/// Implements `IntoResponse` so Axum handlers can return `Result<T, AppError>`.
///
/// The message carried by each variant is exactly what the client sees in the
/// `{"error": ...}` body; the underlying cause is only logged.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Storage error: {message}")]
    Storage {
        message: String,
        #[source]
        source: anyhow::Error,
    },
}

impl AppError {
    pub fn storage(message: impl Into<String>, source: impl Into<anyhow::Error>) -> Self {
        AppError::Storage {
            message: message.into(),
            source: source.into(),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, msg),
            AppError::Validation(msg) => (StatusCode::BAD_REQUEST, msg),
            AppError::Storage { message, source } => {
                tracing::error!("Storage error: {message}: {source:?}");
                (StatusCode::INTERNAL_SERVER_ERROR, message)
            }
        };

        (status, Json(json!({ "error": message }))).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::to_bytes;
    use serde_json::Value;

    async fn render(err: AppError) -> (StatusCode, Value) {
        let response = err.into_response();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    #[tokio::test]
    async fn test_not_found_maps_to_404_with_flat_error_body() {
        let (status, body) = render(AppError::NotFound("Candidate not found".into())).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body, json!({"error": "Candidate not found"}));
    }

    #[tokio::test]
    async fn test_storage_error_hides_cause() {
        let io = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "read-only fs");
        let (status, body) = render(AppError::storage("Failed to save candidate", io)).await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body, json!({"error": "Failed to save candidate"}));
    }
}
