//! # Error Handling Middleware
//!
//! This module provides a standardized way to handle errors in the Bandsync
//! API. It maps domain-specific errors to appropriate HTTP status codes and
//! JSON error responses, ensuring a consistent error handling experience
//! across the entire API.
//!
//! Permission-denied maps to 403 and not-found to 404 — the two are
//! deliberately distinct so "exists but forbidden" is never conflated with
//! "doesn't exist". Callers that want to mask that distinction for privacy
//! can do so on their side.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use bandsync_core::errors::BandError;
use serde_json::json;

/// Application error wrapper that provides HTTP status code mapping.
///
/// `AppError` wraps domain-specific `BandError` instances and implements
/// `IntoResponse` to convert them into HTTP responses with appropriate
/// status codes and JSON payloads.
#[derive(Debug)]
pub struct AppError(pub BandError);

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        // Map error types to HTTP status codes
        let status = match &self.0 {
            BandError::NotFound(_) => StatusCode::NOT_FOUND,
            BandError::Validation(_) => StatusCode::BAD_REQUEST,
            BandError::Authentication(_) => StatusCode::UNAUTHORIZED,
            BandError::PermissionDenied(_) => StatusCode::FORBIDDEN,
            BandError::Database(_) => StatusCode::INTERNAL_SERVER_ERROR,
            BandError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };

        // Get the error message and format as JSON
        let message = self.0.to_string();
        let body = Json(json!({ "error": message }));

        // Combine status code and JSON body into a response
        (status, body).into_response()
    }
}

/// Allows using `?` with functions returning `Result<T, BandError>` in
/// handlers that return `Result<T, AppError>`.
impl From<BandError> for AppError {
    fn from(err: BandError) -> Self {
        AppError(err)
    }
}

/// Wraps raw repository errors as `BandError::Database`.
impl From<eyre::Report> for AppError {
    fn from(err: eyre::Report) -> Self {
        AppError(BandError::Database(err))
    }
}
