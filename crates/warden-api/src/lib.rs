// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! # warden-api
//!
//! Token service, request gate and HTTP surface for the warden auth core.
//!
//! ## Request pipeline
//!
//! ```text
//! Authorization: Bearer <access token>
//!        │
//!        ▼
//!   AuthLayer ── AuthGate::authenticate ──► AuthContext (request extensions)
//!        │
//!        ▼
//!   GuardLayer ── require_role / require_permission / require_superuser
//!        │
//!        ▼
//!   handler (Auth extractor)
//! ```
//!
//! Failures answer `{"error": "<message>"}` with 401, 403 or 500.

#![warn(missing_docs)]
#![warn(rustdoc::missing_crate_level_docs)]
#![deny(unsafe_code)]

pub mod auth;
pub mod error;
pub mod extractors;
pub mod handlers;
pub mod middleware;
pub mod response;
pub mod server;
pub mod state;

pub use auth::{AuthContext, AuthGate, Claims, TokenConfig, TokenPair, TokenService};
pub use error::{ApiError, ApiResult, ErrorBody};
pub use middleware::{AuthLayer, Guard, GuardLayer};
pub use server::{ApiServer, ApiServerBuilder};
pub use state::{AppState, AppStateBuilder};

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
