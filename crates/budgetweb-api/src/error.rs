//! Error types for budgetweb-api

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use budgetweb_core::CoreError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ApiError {
    #[error("Not found: {resource}")]
    NotFound { resource: String },

    #[error("Bad request: {message}")]
    BadRequest { message: String },

    #[error("Sheet rejected: {message}")]
    UnprocessableSheet { message: String },

    #[error("Internal server error")]
    InternalError,
}

impl ApiError {
    fn status(&self) -> StatusCode {
        match self {
            ApiError::NotFound { .. } => StatusCode::NOT_FOUND,
            ApiError::BadRequest { .. } => StatusCode::BAD_REQUEST,
            ApiError::UnprocessableSheet { .. } => StatusCode::UNPROCESSABLE_ENTITY,
            ApiError::InternalError => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<CoreError> for ApiError {
    fn from(error: CoreError) -> Self {
        match &error {
            CoreError::NotLoaded => ApiError::BadRequest {
                message: error.to_string(),
            },
            CoreError::Sheet(_) => ApiError::UnprocessableSheet {
                message: error.to_string(),
            },
            _ => ApiError::InternalError,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = serde_json::json!({
            "error": self.to_string(),
        });
        (self.status(), axum::Json(body)).into_response()
    }
}
