// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! API handlers for all endpoints.
//!
//! - [`health`]: liveness probe
//! - [`auth`]: login, refresh, account and permission queries
//! - [`admin`]: admin-only routes

mod admin;
mod auth;
mod health;

pub use admin::*;
pub use auth::*;
pub use health::*;
