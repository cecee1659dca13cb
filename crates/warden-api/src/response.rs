// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! API response types.

use serde::{Deserialize, Serialize};
use warden_core::{AccountId, Permission, PermissionId, Role, RoleId, Subject};

use crate::auth::TokenPair;

/// Token type advertised in login and refresh responses.
pub const TOKEN_TYPE_BEARER: &str = "Bearer";

// =============================================================================
// Tokens
// =============================================================================

/// Body of a successful login or refresh.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenResponse {
    /// Access token.
    pub access_token: String,
    /// Refresh token.
    pub refresh_token: String,
    /// Access token lifetime in seconds.
    pub expires_in: u64,
    /// Always `"Bearer"`.
    pub token_type: String,
}

impl From<TokenPair> for TokenResponse {
    fn from(pair: TokenPair) -> Self {
        Self {
            access_token: pair.access_token,
            refresh_token: pair.refresh_token,
            expires_in: pair.expires_in,
            token_type: TOKEN_TYPE_BEARER.to_string(),
        }
    }
}

// =============================================================================
// Account
// =============================================================================

/// Role as shown to the caller.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoleSummary {
    /// Role ID.
    pub id: RoleId,
    /// Role name.
    pub name: String,
}

impl From<&Role> for RoleSummary {
    fn from(role: &Role) -> Self {
        Self {
            id: role.id,
            name: role.name.clone(),
        }
    }
}

/// Permission as shown to the caller.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PermissionSummary {
    /// Permission ID.
    pub id: PermissionId,
    /// Permission name.
    pub name: String,
}

impl From<Permission> for PermissionSummary {
    fn from(permission: Permission) -> Self {
        Self {
            id: permission.id,
            name: permission.name,
        }
    }
}

/// Body of `GET {base}/auth/info`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AccountInfoResponse {
    /// Account ID.
    pub account_id: AccountId,
    /// Account email.
    pub email: String,
    /// Superuser flag.
    pub is_superuser: bool,
    /// Assigned roles.
    pub roles: Vec<RoleSummary>,
    /// Direct role-granted permissions, sorted by name.
    pub permissions: Vec<PermissionSummary>,
}

/// Body of `GET {base}/auth/permissions`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PermissionsResponse {
    /// Direct role-granted permissions, sorted by name.
    pub permissions: Vec<PermissionSummary>,
}

/// Body of a successful model-permission check.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PermissionCheckResponse {
    /// The checked subject.
    pub subject: Subject,
    /// The checked permission name.
    pub permission: String,
    /// Always `true`; denials are error responses.
    pub granted: bool,
}

// =============================================================================
// Health
// =============================================================================

/// Body of `GET /health`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    /// `"ok"` while the process serves requests.
    pub status: String,
    /// Crate version.
    pub version: String,
}

impl HealthResponse {
    /// Creates a healthy response.
    pub fn healthy() -> Self {
        Self {
            status: "ok".to_string(),
            version: crate::VERSION.to_string(),
        }
    }
}

/// Body of `GET {base}/admin/ping`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PingResponse {
    /// Always `"pong"`.
    pub message: String,
    /// The caller.
    pub account_id: AccountId,
}
