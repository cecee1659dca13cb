// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! Authentication handlers.

use axum::{extract::State, Json};
use serde::{Deserialize, Serialize};

use crate::auth::password::verify_password;
use crate::error::{ApiError, ApiResult};
use crate::extractors::{Auth, SubjectPermissionPath, ValidatedJson};
use crate::response::{
    AccountInfoResponse, PermissionCheckResponse, PermissionSummary, PermissionsResponse,
    RoleSummary, TokenResponse,
};
use crate::state::AppState;

// =============================================================================
// Login
// =============================================================================

/// Login request body.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginRequest {
    /// Username.
    pub username: String,
    /// Password.
    pub password: String,
}

/// POST {base}/auth/login
///
/// Exchanges a username and password for a token pair.
pub async fn login(
    State(state): State<AppState>,
    ValidatedJson(request): ValidatedJson<LoginRequest>,
) -> ApiResult<Json<TokenResponse>> {
    if request.username.is_empty() || request.password.is_empty() {
        return Err(ApiError::bad_request("username and password are required"));
    }

    let Some(credentials) = state
        .directory()
        .credentials
        .find_by_username(&request.username)
        .await?
    else {
        tracing::debug!(username = %request.username, "Login for unknown username");
        return Err(ApiError::InvalidCredentials);
    };

    let hash = credentials.password_hash.clone();
    let password = request.password;
    let verified = tokio::task::spawn_blocking(move || verify_password(&password, &hash))
        .await
        .map_err(|e| ApiError::internal_with("password verification task failed", e))?;

    let account = credentials.account;
    if !verified {
        tracing::debug!(account_id = %account.id, "Login with wrong password");
        return Err(ApiError::InvalidCredentials);
    }
    // Checked after the password so deactivation is only disclosed to the holder.
    if !account.is_active {
        tracing::warn!(account_id = %account.id, "Login attempt on deactivated account");
        return Err(ApiError::AccountDeactivated);
    }

    let pair = state.tokens().issue_pair(account.id, &account.email)?;

    tracing::info!(account_id = %account.id, "Account logged in");

    Ok(Json(pair.into()))
}

// =============================================================================
// Refresh Token
// =============================================================================

/// Refresh request body.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RefreshRequest {
    /// Refresh token.
    pub refresh_token: String,
}

/// POST {base}/auth/refresh
///
/// Exchanges a valid refresh token for a new token pair.
pub async fn refresh_token(
    State(state): State<AppState>,
    ValidatedJson(request): ValidatedJson<RefreshRequest>,
) -> ApiResult<Json<TokenResponse>> {
    let claims = state.tokens().verify_refresh(&request.refresh_token)?;

    let account = state
        .directory()
        .identities
        .find_by_id(claims.sub)
        .await?
        .ok_or_else(|| ApiError::unauthorized(format!("account {} not found", claims.sub)))?;

    if !account.is_active {
        tracing::warn!(account_id = %account.id, "Refresh attempt on deactivated account");
        return Err(ApiError::AccountDeactivated);
    }

    let pair = state.tokens().issue_pair(account.id, &account.email)?;

    tracing::debug!(account_id = %account.id, "Token refreshed");

    Ok(Json(pair.into()))
}

// =============================================================================
// Current Account
// =============================================================================

/// GET {base}/auth/info
///
/// Returns the authenticated account with its roles and permissions.
pub async fn account_info(Auth(ctx): Auth) -> Json<AccountInfoResponse> {
    Json(AccountInfoResponse {
        account_id: ctx.account_id,
        email: ctx.email.clone(),
        is_superuser: ctx.is_superuser,
        roles: ctx.roles.iter().map(RoleSummary::from).collect(),
        permissions: summaries(&ctx),
    })
}

/// GET {base}/auth/permissions
///
/// Returns the direct role-granted permissions of the authenticated account.
pub async fn permissions(Auth(ctx): Auth) -> Json<PermissionsResponse> {
    Json(PermissionsResponse {
        permissions: summaries(&ctx),
    })
}

fn summaries(ctx: &crate::auth::AuthContext) -> Vec<PermissionSummary> {
    ctx.permissions
        .sorted()
        .into_iter()
        .map(PermissionSummary::from)
        .collect()
}

// =============================================================================
// Model Permission Check
// =============================================================================

/// GET {base}/auth/model-permissions/{kind}/{id}/{permission}
///
/// Succeeds iff the caller holds the named permission on the subject.
pub async fn check_model_permission(
    State(state): State<AppState>,
    Auth(ctx): Auth,
    path: SubjectPermissionPath,
) -> ApiResult<Json<PermissionCheckResponse>> {
    state
        .gate()
        .require_permission(&ctx, &path.subject, &path.permission)
        .await?;

    Ok(Json(PermissionCheckResponse {
        subject: path.subject,
        permission: path.permission,
        granted: true,
    }))
}

// =============================================================================
// Tests
// =============================================================================
