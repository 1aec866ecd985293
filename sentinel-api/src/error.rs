use axum::{
    extract::rejection::{JsonRejection, QueryRejection},
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use sentinel_core::CoreError;
use serde_json::json;

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error(transparent)]
    Core(#[from] CoreError),
}

impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        AppError::Core(CoreError::InvalidRecord(rejection.body_text()))
    }
}

impl From<QueryRejection> for AppError {
    fn from(rejection: QueryRejection) -> Self {
        AppError::Core(CoreError::InvalidIdentifier(rejection.body_text()))
    }
}

impl AppError {
    /// One row per error kind; nothing falls through to a generic 500.
    pub fn status_code(&self) -> StatusCode {
        match self {
            AppError::Core(CoreError::InvalidIdentifier(_)) => StatusCode::BAD_REQUEST,
            AppError::Core(CoreError::InvalidRecord(_)) => StatusCode::BAD_REQUEST,
            AppError::Core(CoreError::StoreUnavailable(_)) => StatusCode::SERVICE_UNAVAILABLE,
        }
    }

    pub fn kind(&self) -> &'static str {
        match self {
            AppError::Core(CoreError::InvalidIdentifier(_)) => "INVALID_IDENTIFIER",
            AppError::Core(CoreError::InvalidRecord(_)) => "INVALID_RECORD",
            AppError::Core(CoreError::StoreUnavailable(_)) => "STORE_UNAVAILABLE",
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let kind = self.kind();

        let message = match &self {
            AppError::Core(CoreError::StoreUnavailable(detail)) => {
                tracing::warn!("Record store unavailable: {}", detail);
                "Flight status store is temporarily unavailable".to_string()
            }
            other => other.to_string(),
        };

        let body = Json(json!({
            "error": kind,
            "message": message,
        }));

        if status == StatusCode::SERVICE_UNAVAILABLE {
            return (status, [(header::RETRY_AFTER, "1")], body).into_response();
        }
        (status, body).into_response()
    }
}
