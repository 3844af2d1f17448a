// Copyright (c) 2026 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

//! API error types.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Serialize;
use thiserror::Error;

/// Errors surfaced at the proxy's HTTP boundary.
#[derive(Debug, Error)]
pub enum ApiError {
    /// The mandatory `url` query parameter is missing.
    #[error("URL parameter is required")]
    MissingParameter,

    /// The target could not be fetched or processed.
    #[error("Failed to fetch URL")]
    Upstream,
}

/// Error response body.
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = match &self {
            ApiError::MissingParameter => StatusCode::BAD_REQUEST,
            ApiError::Upstream => StatusCode::INTERNAL_SERVER_ERROR,
        };

        let body = ErrorResponse {
            error: self.to_string(),
        };

        (status, axum::Json(body)).into_response()
    }
}

/// Result type for handler operations.
pub type Result<T> = std::result::Result<T, ApiError>;
