// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! API error types and handling.
//!
//! Every error renders as `{"error": "<message>"}` where the message is a
//! short, machine-stable string. Internal details are logged, never echoed.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use warden_core::StoreError;

use crate::auth::TokenError;

/// Result type alias for API operations.
pub type ApiResult<T> = Result<T, ApiError>;

// =============================================================================
// Messages
// =============================================================================

/// Stable error strings returned to callers.
pub mod messages {
    /// No `Authorization` header.
    pub const TOKEN_MISSING: &str = "token missing";
    /// Malformed header, bad signature, wrong algorithm.
    pub const TOKEN_INVALID: &str = "invalid token";
    /// Token past its expiry.
    pub const TOKEN_EXPIRED: &str = "token expired";
    /// Unknown account or no authentication context.
    pub const UNAUTHORIZED: &str = "unauthorized";
    /// Authenticated but not allowed.
    pub const FORBIDDEN: &str = "forbidden";
    /// Unknown username or wrong password.
    pub const INVALID_CREDENTIALS: &str = "invalid credentials";
    /// Login attempt on an inactive account.
    pub const ACCOUNT_DEACTIVATED: &str = "account is deactivated";
    /// Any server-side failure.
    pub const INTERNAL: &str = "internal server error";
}

// =============================================================================
// ApiError
// =============================================================================

/// API error type with HTTP status code mapping.
#[derive(Debug, Error)]
pub enum ApiError {
    /// No bearer token was presented (401).
    #[error("Token missing")]
    TokenMissing,

    /// The bearer token is malformed, tampered with, or uses a foreign algorithm (401).
    #[error("Invalid token: {reason}")]
    TokenInvalid {
        /// Internal reason, logged only.
        reason: String,
    },

    /// The bearer token has expired (401).
    #[error("Token expired")]
    TokenExpired,

    /// The token subject does not resolve to an account (401).
    #[error("Unauthorized: {reason}")]
    Unauthorized {
        /// Internal reason, logged only.
        reason: String,
    },

    /// The caller is authenticated but not allowed (403).
    #[error("Forbidden: {reason}")]
    Forbidden {
        /// Internal reason, logged only.
        reason: String,
    },

    /// Login failed (401).
    #[error("Invalid credentials")]
    InvalidCredentials,

    /// Login attempt on an inactive account (403).
    #[error("Account is deactivated")]
    AccountDeactivated,

    /// Bad request (400).
    #[error("Bad request: {message}")]
    BadRequest {
        /// Error message, returned to the caller.
        message: String,
    },

    /// Resource not found (404).
    #[error("Resource not found: {resource}")]
    NotFound {
        /// The resource that was not found.
        resource: String,
    },

    /// Internal server error (500).
    #[error("Internal error: {message}")]
    Internal {
        /// Error message, logged only.
        message: String,
        /// Underlying error.
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },
}

impl ApiError {
    /// Creates an invalid token error.
    pub fn token_invalid(reason: impl Into<String>) -> Self {
        Self::TokenInvalid {
            reason: reason.into(),
        }
    }

    /// Creates an unauthorized error.
    pub fn unauthorized(reason: impl Into<String>) -> Self {
        Self::Unauthorized {
            reason: reason.into(),
        }
    }

    /// Creates a forbidden error.
    pub fn forbidden(reason: impl Into<String>) -> Self {
        Self::Forbidden {
            reason: reason.into(),
        }
    }

    /// Creates a bad request error.
    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::BadRequest {
            message: message.into(),
        }
    }

    /// Creates a not found error.
    pub fn not_found(resource: impl Into<String>) -> Self {
        Self::NotFound {
            resource: resource.into(),
        }
    }

    /// Creates an internal error.
    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal {
            message: message.into(),
            source: None,
        }
    }

    /// Creates an internal error with a source.
    pub fn internal_with<E>(message: impl Into<String>, source: E) -> Self
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        Self::Internal {
            message: message.into(),
            source: Some(Box::new(source)),
        }
    }

    /// Returns the HTTP status code for this error.
    pub fn status_code(&self) -> StatusCode {
        match self {
            ApiError::TokenMissing
            | ApiError::TokenInvalid { .. }
            | ApiError::TokenExpired
            | ApiError::Unauthorized { .. }
            | ApiError::InvalidCredentials => StatusCode::UNAUTHORIZED,
            ApiError::Forbidden { .. } | ApiError::AccountDeactivated => StatusCode::FORBIDDEN,
            ApiError::BadRequest { .. } => StatusCode::BAD_REQUEST,
            ApiError::NotFound { .. } => StatusCode::NOT_FOUND,
            ApiError::Internal { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Returns the error string sent to the caller.
    pub fn user_message(&self) -> String {
        match self {
            ApiError::TokenMissing => messages::TOKEN_MISSING.to_string(),
            ApiError::TokenInvalid { .. } => messages::TOKEN_INVALID.to_string(),
            ApiError::TokenExpired => messages::TOKEN_EXPIRED.to_string(),
            ApiError::Unauthorized { .. } => messages::UNAUTHORIZED.to_string(),
            ApiError::Forbidden { .. } => messages::FORBIDDEN.to_string(),
            ApiError::InvalidCredentials => messages::INVALID_CREDENTIALS.to_string(),
            ApiError::AccountDeactivated => messages::ACCOUNT_DEACTIVATED.to_string(),
            ApiError::BadRequest { message } => message.clone(),
            ApiError::NotFound { resource } => format!("{} not found", resource),
            ApiError::Internal { .. } => messages::INTERNAL.to_string(),
        }
    }

    /// Returns `true` if this is a server error (5xx).
    pub fn is_server_error(&self) -> bool {
        self.status_code().is_server_error()
    }
}

// =============================================================================
// Conversions
// =============================================================================

impl From<TokenError> for ApiError {
    fn from(err: TokenError) -> Self {
        match err {
            TokenError::Expired => ApiError::TokenExpired,
            TokenError::Invalid { reason } => ApiError::TokenInvalid { reason },
            other => ApiError::internal_with("token service failure", other),
        }
    }
}

impl From<StoreError> for ApiError {
    fn from(err: StoreError) -> Self {
        ApiError::internal_with("directory lookup failed", err)
    }
}

// =============================================================================
// Response Body
// =============================================================================

/// JSON body of an error response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorBody {
    /// Machine-stable error string.
    pub error: String,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status_code();

        if self.is_server_error() {
            tracing::error!(
                error = %self,
                source = ?std::error::Error::source(&self).map(|s| s.to_string()),
                status = %status,
                "Server error occurred"
            );
        } else {
            tracing::debug!(error = %self, status = %status, "Client error occurred");
        }

        let body = ErrorBody {
            error: self.user_message(),
        };
        (status, Json(body)).into_response()
    }
}
