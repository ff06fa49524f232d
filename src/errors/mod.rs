//! Error handling at the HTTP boundary.
//!
//! Every failure is reported as `404 {"message": ...}`: the dashboard client
//! only distinguishes success from failure and shows the message text.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;

use crate::store::StoreError;

/// Body of every error response.
#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub message: String,
}

/// Application error type.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("Invalid query string: {0}")]
    InvalidQuery(String),

    #[error("Invalid sort parameter: {0}")]
    InvalidSort(String),

    #[error("Invalid search pattern: {0}")]
    InvalidSearch(#[from] regex::Error),

    #[error("Invalid pagination: {0}")]
    InvalidPagination(String),

    #[error(transparent)]
    Store(#[from] StoreError),
}

impl AppError {
    /// Whether the error came from request input rather than the store.
    pub fn is_client_input(&self) -> bool {
        !matches!(self, Self::Store(_))
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let message = self.to_string();
        if self.is_client_input() {
            tracing::warn!(error = %message, "Rejected request parameters");
        } else {
            tracing::error!(error = %message, "Store error");
        }

        (StatusCode::NOT_FOUND, Json(ErrorBody { message })).into_response()
    }
}
