// ABOUTME: Unified error handling system with standard error codes and HTTP responses
// ABOUTME: Maps every failure class to a stable code, status, and structured JSON body
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Innerlens

//! Unified error handling for the Innerlens server
//!
//! Every handler returns [`AppResult`]; failures are translated into an
//! [`AppError`] carrying a stable [`ErrorCode`] that maps to exactly one
//! HTTP status. Nothing propagates as an unhandled fault - the
//! `IntoResponse` impl turns the error into a structured JSON envelope.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

/// Result type used throughout the server
pub type AppResult<T> = Result<T, AppError>;

/// Stable error codes surfaced to clients
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ErrorCode {
    /// Missing or malformed request fields
    #[error("invalid_input")]
    InvalidInput,
    /// No authenticated identity on the request
    #[error("auth_required")]
    AuthRequired,
    /// Credentials or token present but not valid
    #[error("auth_invalid")]
    AuthInvalid,
    /// Authenticated identity lacks the required role
    #[error("permission_denied")]
    PermissionDenied,
    /// Referenced record absent or not visible to the caller
    #[error("resource_not_found")]
    ResourceNotFound,
    /// Persistence layer failure
    #[error("database_error")]
    DatabaseError,
    /// Downstream service call failed
    #[error("external_service_error")]
    ExternalServiceError,
    /// Dependent feature is not configured on this deployment
    #[error("feature_disabled")]
    FeatureDisabled,
    /// Server-side configuration problem
    #[error("config_error")]
    ConfigError,
    /// Anything else unexpected
    #[error("internal_error")]
    InternalError,
}

impl ErrorCode {
    /// HTTP status this code maps to
    #[must_use]
    pub const fn http_status(self) -> StatusCode {
        match self {
            Self::InvalidInput => StatusCode::BAD_REQUEST,
            Self::AuthRequired | Self::AuthInvalid => StatusCode::UNAUTHORIZED,
            Self::PermissionDenied => StatusCode::FORBIDDEN,
            Self::ResourceNotFound => StatusCode::NOT_FOUND,
            Self::ExternalServiceError => StatusCode::BAD_GATEWAY,
            Self::FeatureDisabled => StatusCode::SERVICE_UNAVAILABLE,
            Self::DatabaseError | Self::ConfigError | Self::InternalError => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }
}

/// Application error with a stable code and human-readable message
#[derive(Debug, Clone, Error)]
#[error("{code}: {message}")]
pub struct AppError {
    /// Stable error code
    pub code: ErrorCode,
    /// Human-readable message, safe to surface to clients
    pub message: String,
}

impl AppError {
    /// Create an error with an explicit code
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
        }
    }

    /// Missing or malformed input (400)
    pub fn invalid_input(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::InvalidInput, message)
    }

    /// No authenticated identity (401)
    pub fn auth_required(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::AuthRequired, message)
    }

    /// Invalid credentials or token (401)
    pub fn auth_invalid(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::AuthInvalid, message)
    }

    /// Wrong role for the operation (403)
    pub fn permission_denied(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::PermissionDenied, message)
    }

    /// Referenced record absent or not owned by caller (404)
    pub fn not_found(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::ResourceNotFound, message)
    }

    /// Persistence failure (500)
    pub fn database(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::DatabaseError, message)
    }

    /// Downstream service failure (502)
    pub fn external_service(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::ExternalServiceError, message)
    }

    /// Feature not configured on this deployment (503)
    pub fn feature_disabled(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::FeatureDisabled, message)
    }

    /// Server configuration problem (500)
    pub fn config(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::ConfigError, message)
    }

    /// Unexpected failure (500)
    pub fn internal(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::InternalError, message)
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.code.http_status();
        let body = json!({
            "success": false,
            "error": {
                "code": self.code.to_string(),
                "message": self.message,
            }
        });
        (status, Json(body)).into_response()
    }
}
