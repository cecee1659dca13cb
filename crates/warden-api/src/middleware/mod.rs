// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! Middleware implementations for the API server.
//!
//! - [`AuthLayer`]: bearer token authentication
//! - [`GuardLayer`]: role, permission and superuser checks on authenticated routes

mod auth;
mod guard;

pub use auth::{AuthLayer, AuthMiddleware};
pub use guard::{Guard, GuardLayer, GuardMiddleware};
