// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! Authentication and authorization.
//!
//! - [`TokenService`] signs and verifies access/refresh tokens
//! - [`AuthGate`] authenticates requests and evaluates role and permission guards
//! - [`AuthContext`] is the per-request result of authentication

mod claims;
mod context;
mod gate;
pub mod password;
pub mod permission;
mod token;

pub use claims::Claims;
pub use context::AuthContext;
pub use gate::{parse_bearer, AuthGate, BEARER_SCHEME};
pub use permission::PermissionSet;
pub use token::{
    TokenConfig, TokenError, TokenKind, TokenPair, TokenResult, TokenService,
    ACCEPTED_ALGORITHMS, SIGNING_ALGORITHM,
};
