// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! # Warden Integration Tests
//!
//! Shared test utilities and integration suites for the warden workspace.
//!
//! ## Module Structure
//!
//! - [`common`]: Shared test utilities, fixtures, and helpers
//!   - `fixtures`: A seeded directory with well-known accounts and grants
//!   - `builders`: Builders for directories and HTTP requests
//!   - `assertions`: Assertion helpers for API errors and responses
//!   - `mocks`: Failing and counting store implementations
//!   - `harness`: A router wired over the fixture directory
//!
//! ## Running Tests
//!
//! ```bash
//! cargo test -p warden-tests
//! cargo test -p warden-tests --test integration_gate
//! cargo test -p warden-tests --test integration_api
//! ```
//!
//! ## Test Categories
//!
//! ### Token Tests (`integration_tokens.rs`)
//! - Lifetimes, round trips, tampering, expiry, secret separation
//!
//! ### Gate Tests (`integration_gate.rs`)
//! - Authentication, role and permission checks, store failures
//! - Role-independent subject links (property test)
//!
//! ### API Tests (`integration_api.rs`)
//! - HTTP status codes and error bodies through the full router
//!
//! ### Config Tests (`integration_config.rs`)
//! - Seeding a directory from a configuration file and logging in
//!
//! ## Writing New Tests
//!
//! ```rust,ignore
//! use warden_tests::prelude::*;
//!
//! #[tokio::test]
//! async fn test_something() {
//!     let app = TestApp::new();
//!     let token = app.access_token(app.fixture.editor);
//!     let response = app
//!         .send(TestRequest::get(app.path("/auth/info")).bearer(&token).build())
//!         .await;
//!     assert_status(&response, http::StatusCode::OK);
//! }
//! ```

#![warn(missing_docs)]
#![deny(unsafe_code)]

pub mod common;

/// Re-export commonly used items for convenience.
pub mod prelude {
    pub use crate::common::assertions::*;
    pub use crate::common::builders::*;
    pub use crate::common::fixtures::*;
    pub use crate::common::harness::*;
    pub use crate::common::mocks::*;
    pub use crate::common::init_test_logging;
}
