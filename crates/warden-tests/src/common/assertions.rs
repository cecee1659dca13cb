// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! # Custom Test Assertions
//!
//! Assertion helpers for gate results and HTTP responses, with failure
//! messages that name the error actually returned.

use axum::response::Response;
use http::StatusCode;
use warden_api::{ApiError, ApiResult};

// =============================================================================
// ApiResult Assertions
// =============================================================================

/// Assertion extensions for gate and handler results.
pub trait ApiResultAssertions<T> {
    /// Asserts success and returns the value.
    fn assert_ok(self) -> T;

    /// Asserts `TokenMissing`.
    fn assert_token_missing(self);

    /// Asserts `TokenInvalid`.
    fn assert_token_invalid(self);

    /// Asserts `TokenExpired`.
    fn assert_token_expired(self);

    /// Asserts `Unauthorized`.
    fn assert_unauthorized(self);

    /// Asserts `Forbidden`.
    fn assert_forbidden(self);

    /// Asserts a 5xx error.
    fn assert_server_error(self);
}

impl<T: std::fmt::Debug> ApiResultAssertions<T> for ApiResult<T> {
    fn assert_ok(self) -> T {
        match self {
            Ok(value) => value,
            Err(e) => panic!("Expected Ok, got error: {:?}", e),
        }
    }

    fn assert_token_missing(self) {
        expect_error(self, "TokenMissing", |e| matches!(e, ApiError::TokenMissing));
    }

    fn assert_token_invalid(self) {
        expect_error(self, "TokenInvalid", |e| {
            matches!(e, ApiError::TokenInvalid { .. })
        });
    }

    fn assert_token_expired(self) {
        expect_error(self, "TokenExpired", |e| matches!(e, ApiError::TokenExpired));
    }

    fn assert_unauthorized(self) {
        expect_error(self, "Unauthorized", |e| {
            matches!(e, ApiError::Unauthorized { .. })
        });
    }

    fn assert_forbidden(self) {
        expect_error(self, "Forbidden", |e| matches!(e, ApiError::Forbidden { .. }));
    }

    fn assert_server_error(self) {
        expect_error(self, "a server error", ApiError::is_server_error);
    }
}

fn expect_error<T: std::fmt::Debug>(
    result: ApiResult<T>,
    expected: &str,
    predicate: impl FnOnce(&ApiError) -> bool,
) {
    match result {
        Ok(value) => panic!("Expected {}, got Ok({:?})", expected, value),
        Err(e) => assert!(predicate(&e), "Expected {}, got {:?}", expected, e),
    }
}

// =============================================================================
// Response Assertions
// =============================================================================

/// Asserts the response status.
pub fn assert_status(response: &Response, expected: StatusCode) {
    assert_eq!(
        response.status(),
        expected,
        "Expected status {}, got {}",
        expected,
        response.status()
    );
}

/// Reads the whole response body as JSON.
pub async fn body_json(response: Response) -> serde_json::Value {
    let bytes = axum::body::to_bytes(response.into_body(), 1024 * 1024)
        .await
        .expect("read response body");
    serde_json::from_slice(&bytes).unwrap_or_else(|e| {
        panic!(
            "Response body is not JSON ({}): {}",
            e,
            String::from_utf8_lossy(&bytes)
        )
    })
}

/// Asserts the status and that the body is exactly `{"error": message}`.
pub async fn assert_error_response(response: Response, status: StatusCode, message: &str) {
    assert_status(&response, status);
    let body = body_json(response).await;
    assert_eq!(body, serde_json::json!({ "error": message }));
}
