use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;

/// Error body shared by every endpoint on failure.
#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    /// Collection name outside the allow-list; rejected before any store access.
    #[error("invalid collection name: {0}")]
    InvalidCollection(String),
    /// Path id that does not parse as an ObjectId.
    #[error("invalid document id: {0}")]
    InvalidId(String),
    /// Request body that cannot be stored as a document.
    #[error("invalid document body: {0}")]
    InvalidBody(String),
    #[error("{0} not found")]
    NotFound(&'static str),
    #[error(transparent)]
    Store(#[from] mongodb::error::Error),
}

impl AppError {
    fn status_and_body(self) -> (StatusCode, ErrorBody) {
        match self {
            AppError::InvalidCollection(name) => (
                StatusCode::BAD_REQUEST,
                ErrorBody { error: "Invalid collection name".to_string(), details: Some(name) },
            ),
            AppError::InvalidId(id) => (
                StatusCode::BAD_REQUEST,
                ErrorBody { error: "Invalid document id".to_string(), details: Some(id) },
            ),
            AppError::InvalidBody(detail) => (
                StatusCode::BAD_REQUEST,
                ErrorBody { error: "Invalid document body".to_string(), details: Some(detail) },
            ),
            AppError::NotFound(what) => (
                StatusCode::NOT_FOUND,
                ErrorBody { error: format!("{what} not found"), details: None },
            ),
            AppError::Store(err) => {
                // Driver messages can carry topology and credential details;
                // they go to the log, not to the client.
                tracing::error!(error = %err, "store operation failed");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    ErrorBody { error: "Database operation failed".to_string(), details: None },
                )
            }
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, body) = self.status_and_body();
        (status, Json(body)).into_response()
    }
}

pub type AppResult<T> = Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn client_errors_map_to_400() {
        let resp = AppError::InvalidCollection("films".to_string()).into_response();
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

        let resp = AppError::InvalidId("not-hex".to_string()).into_response();
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn not_found_maps_to_404() {
        let resp = AppError::NotFound("Movie").into_response();
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    }

    #[test]
    fn error_body_omits_absent_details() {
        let body = ErrorBody { error: "Movie not found".to_string(), details: None };
        let json = serde_json::to_value(&body).unwrap();
        assert_eq!(json, serde_json::json!({ "error": "Movie not found" }));
    }
}
