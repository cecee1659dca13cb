// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! Request gate: authentication and the role/permission guards.
//!
//! [`AuthGate::authenticate`] turns an `Authorization` header into an
//! [`AuthContext`]. The guards then consult that context:
//!
//! | guard | superuser | grant condition |
//! |---|---|---|
//! | [`require_role`](AuthGate::require_role) | bypass | any role name matches, ignoring case |
//! | [`require_permission`](AuthGate::require_permission) | bypass | direct role grant, or a subject link while holding at least one role |
//! | [`require_superuser`](AuthGate::require_superuser) | pass | never |
//!
//! Store failures surface as internal errors and always deny.

use std::sync::Arc;

use axum::http::HeaderValue;
use tracing::{debug, warn};
use warden_core::{Directory, Subject};

use super::{AuthContext, PermissionSet, TokenService};
use crate::error::{ApiError, ApiResult};

/// Authorization scheme expected in the `Authorization` header.
pub const BEARER_SCHEME: &str = "Bearer";

// =============================================================================
// AuthGate
// =============================================================================

/// Orchestrates the token service and the directory stores.
#[derive(Clone)]
pub struct AuthGate {
    tokens: Arc<TokenService>,
    directory: Directory,
}

impl AuthGate {
    /// Creates a gate.
    pub fn new(tokens: Arc<TokenService>, directory: Directory) -> Self {
        Self { tokens, directory }
    }

    /// Returns the token service.
    pub fn tokens(&self) -> &TokenService {
        &self.tokens
    }

    /// Returns the directory.
    pub fn directory(&self) -> &Directory {
        &self.directory
    }

    /// Authenticates a request from its `Authorization` header.
    ///
    /// # Errors
    ///
    /// * `TokenMissing` - no header, or an empty one
    /// * `TokenInvalid` - not `Bearer <token>`, or the token fails verification
    /// * `TokenExpired` - the token is past its expiry
    /// * `Unauthorized` - the subject does not resolve to an account
    /// * `Forbidden` - the account is inactive
    /// * `Internal` - a store lookup failed
    pub async fn authenticate(&self, authorization: Option<&HeaderValue>) -> ApiResult<AuthContext> {
        let header = match authorization {
            Some(value) if !value.is_empty() => value,
            _ => return Err(ApiError::TokenMissing),
        };
        let header = header
            .to_str()
            .map_err(|_| ApiError::token_invalid("authorization header is not visible ASCII"))?;
        let token = parse_bearer(header)?;

        let claims = self.tokens.verify_access(token)?;

        let account = self
            .directory
            .identities
            .find_by_id(claims.sub)
            .await?
            .ok_or_else(|| ApiError::unauthorized(format!("account {} not found", claims.sub)))?;

        if !account.is_active {
            warn!(account_id = %account.id, "Rejected token of inactive account");
            return Err(ApiError::forbidden("account is inactive"));
        }

        let roles = self.directory.roles.roles_of(account.id).await?;
        let permissions = if roles.is_empty() {
            PermissionSet::new()
        } else {
            let role_ids: Vec<_> = roles.iter().map(|r| r.id).collect();
            PermissionSet::from_permissions(self.directory.roles.permissions_of(&role_ids).await?)
        };

        debug!(
            account_id = %account.id,
            roles = roles.len(),
            permissions = permissions.len(),
            "Request authenticated"
        );

        Ok(AuthContext::new(token, &account, roles, permissions))
    }

    /// Grants iff the account is a superuser or holds any of `allowed`.
    pub fn require_role<S: AsRef<str>>(&self, ctx: &AuthContext, allowed: &[S]) -> ApiResult<()> {
        if ctx.is_superuser || ctx.has_any_role(allowed) {
            return Ok(());
        }

        debug!(
            account_id = %ctx.account_id,
            roles = ?ctx.role_names(),
            required = ?allowed.iter().map(AsRef::as_ref).collect::<Vec<_>>(),
            "Role check denied"
        );
        Err(ApiError::forbidden("missing required role"))
    }

    /// Grants iff the account may use `permission_name` on `subject`.
    ///
    /// Unknown permission names are denied. The direct role grant is checked
    /// first; the subject link is only consulted when that fails. A link
    /// grants to any account holding at least one role, whichever role that is.
    pub async fn require_permission(
        &self,
        ctx: &AuthContext,
        subject: &Subject,
        permission_name: &str,
    ) -> ApiResult<()> {
        if ctx.is_superuser {
            return Ok(());
        }

        let Some(permission_id) = self.directory.catalog.find_by_name(permission_name).await? else {
            debug!(permission = permission_name, "Unknown permission name");
            return Err(ApiError::forbidden(format!(
                "unknown permission '{}'",
                permission_name
            )));
        };

        if ctx.has_permission(permission_id) {
            return Ok(());
        }

        if !ctx.roles.is_empty()
            && self
                .directory
                .model_permissions
                .exists(subject, permission_id)
                .await?
        {
            return Ok(());
        }

        debug!(
            account_id = %ctx.account_id,
            subject = %subject,
            permission = permission_name,
            "Permission check denied"
        );
        Err(ApiError::forbidden("missing required permission"))
    }

    /// Grants iff the account is a superuser.
    pub fn require_superuser(&self, ctx: &AuthContext) -> ApiResult<()> {
        if ctx.is_superuser {
            Ok(())
        } else {
            Err(ApiError::forbidden("superuser required"))
        }
    }
}

impl std::fmt::Debug for AuthGate {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AuthGate")
            .field("tokens", &self.tokens)
            .finish_non_exhaustive()
    }
}

// =============================================================================
// Helper Functions
// =============================================================================

/// Extracts the token from `Bearer <token>`.
///
/// The scheme is case-sensitive and must be followed by exactly one space and a
/// non-empty token containing no further spaces.
pub fn parse_bearer(header: &str) -> ApiResult<&str> {
    let mut parts = header.split(' ');
    match (parts.next(), parts.next(), parts.next()) {
        (Some(BEARER_SCHEME), Some(token), None) if !token.is_empty() => Ok(token),
        _ => Err(ApiError::token_invalid("malformed authorization header")),
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::{TokenConfig, TokenKind};
    use crate::auth::Claims;
    use async_trait::async_trait;
    use std::time::Duration;
    use warden_core::{
        Account, AccountId, InMemoryDirectory, ModelPermissionStore, Permission, PermissionId,
        ResourceId, Role, StoreError, StoreResult,
    };

    struct Fixture {
        gate: AuthGate,
        directory: Arc<InMemoryDirectory>,
    }

    impl Fixture {
        fn new() -> Self {
            let directory = Arc::new(InMemoryDirectory::new());
            let tokens = Arc::new(
                TokenService::new(TokenConfig::new(
                    "gate-access-secret-for-unit-tests",
                    "gate-refresh-secret-for-unit-tests",
                ))
                .unwrap(),
            );
            let gate = AuthGate::new(tokens, Directory::from_shared(directory.clone()));
            Self { gate, directory }
        }

        fn account(&self, account: Account, roles: &[&str]) -> AccountId {
            let id = self.directory.add_account(account, "hash").unwrap();
            for name in roles {
                let role = match self.directory.role_by_name(name) {
                    Some(role) => role.id,
                    None => self.directory.add_role(Role::new(*name)).unwrap(),
                };
                self.directory.assign_role(id, role).unwrap();
            }
            id
        }

        fn bearer(&self, id: AccountId) -> HeaderValue {
            let pair = self.gate.tokens().issue_pair(id, "user@example.com").unwrap();
            HeaderValue::from_str(&format!("Bearer {}", pair.access_token)).unwrap()
        }

        async fn context(&self, id: AccountId) -> AuthContext {
            self.gate.authenticate(Some(&self.bearer(id))).await.unwrap()
        }
    }

    struct FailingLinks;

    #[async_trait]
    impl ModelPermissionStore for FailingLinks {
        async fn exists(&self, _: &Subject, _: PermissionId) -> StoreResult<bool> {
            Err(StoreError::unavailable("links offline"))
        }
    }

    #[test]
    fn test_parse_bearer() {
        assert_eq!(parse_bearer("Bearer abc.def.ghi").unwrap(), "abc.def.ghi");
        assert!(parse_bearer("bearer abc").is_err());
        assert!(parse_bearer("Bearer  abc").is_err());
        assert!(parse_bearer("Bearer a b").is_err());
        assert!(parse_bearer("Bearer ").is_err());
        assert!(parse_bearer("Basic abc").is_err());
        assert!(parse_bearer("abc").is_err());
    }

    #[tokio::test]
    async fn test_missing_header() {
        let fx = Fixture::new();
        assert!(matches!(
            fx.gate.authenticate(None).await,
            Err(ApiError::TokenMissing)
        ));
        assert!(matches!(
            fx.gate.authenticate(Some(&HeaderValue::from_static(""))).await,
            Err(ApiError::TokenMissing)
        ));
    }

    #[tokio::test]
    async fn test_garbage_token() {
        let fx = Fixture::new();
        let header = HeaderValue::from_static("Bearer garbage");
        assert!(matches!(
            fx.gate.authenticate(Some(&header)).await,
            Err(ApiError::TokenInvalid { .. })
        ));
    }

    #[tokio::test]
    async fn test_expired_token() {
        let fx = Fixture::new();
        let id = fx.account(Account::new("alice", "a@example.com"), &[]);
        let claims = Claims::expired(id, "a@example.com", Duration::from_secs(30));
        let token = fx.gate.tokens().sign(TokenKind::Access, &claims).unwrap();
        let header = HeaderValue::from_str(&format!("Bearer {}", token)).unwrap();

        assert!(matches!(
            fx.gate.authenticate(Some(&header)).await,
            Err(ApiError::TokenExpired)
        ));
    }

    #[tokio::test]
    async fn test_unknown_account() {
        let fx = Fixture::new();
        let header = fx.bearer(AccountId::new());
        assert!(matches!(
            fx.gate.authenticate(Some(&header)).await,
            Err(ApiError::Unauthorized { .. })
        ));
    }

    #[tokio::test]
    async fn test_inactive_account_forbidden() {
        let fx = Fixture::new();
        let id = fx.account(Account::new("alice", "a@example.com").with_active(false), &[]);
        assert!(matches!(
            fx.gate.authenticate(Some(&fx.bearer(id))).await,
            Err(ApiError::Forbidden { .. })
        ));
    }

    #[tokio::test]
    async fn test_context_contents() {
        let fx = Fixture::new();
        let read = fx.directory.add_permission(Permission::new("menus.read")).unwrap();
        let id = fx.account(Account::new("alice", "a@example.com"), &["editor", "reviewer"]);
        for name in ["editor", "reviewer"] {
            let role = fx.directory.role_by_name(name).unwrap();
            fx.directory.grant(role.id, read).unwrap();
        }

        let ctx = fx.context(id).await;
        assert_eq!(ctx.account_id, id);
        assert_eq!(ctx.roles.len(), 2);
        assert_eq!(ctx.permissions.len(), 1);
        assert!(ctx.has_permission(read));
        assert!(!ctx.token.is_empty());
    }

    #[tokio::test]
    async fn test_require_role() {
        let fx = Fixture::new();
        let id = fx.account(Account::new("alice", "a@example.com"), &["Admin"]);
        let ctx = fx.context(id).await;

        assert!(fx.gate.require_role(&ctx, &["admin"]).is_ok());
        assert!(fx.gate.require_role(&ctx, &["ADMIN"]).is_ok());
        assert!(fx.gate.require_role(&ctx, &["editor", "admin"]).is_ok());
        assert!(matches!(
            fx.gate.require_role(&ctx, &["editor"]),
            Err(ApiError::Forbidden { .. })
        ));
    }

    #[tokio::test]
    async fn test_superuser_bypass() {
        let fx = Fixture::new();
        let id = fx.account(
            Account::new("root", "root@example.com").with_superuser(true),
            &[],
        );
        let ctx = fx.context(id).await;
        let menu = Subject::Resource(ResourceId::new());

        assert!(fx.gate.require_role(&ctx, &["admin"]).is_ok());
        assert!(fx.gate.require_superuser(&ctx).is_ok());
        assert!(fx
            .gate
            .require_permission(&ctx, &menu, "does.not.exist")
            .await
            .is_ok());
    }

    #[tokio::test]
    async fn test_unknown_permission_forbidden() {
        let fx = Fixture::new();
        let id = fx.account(Account::new("alice", "a@example.com"), &["editor"]);
        let ctx = fx.context(id).await;
        let menu = Subject::Resource(ResourceId::new());

        assert!(matches!(
            fx.gate.require_permission(&ctx, &menu, "menus.read").await,
            Err(ApiError::Forbidden { .. })
        ));
        assert!(fx.gate.require_superuser(&ctx).is_err());
    }

    #[tokio::test]
    async fn test_direct_grant_without_link() {
        let fx = Fixture::new();
        let read = fx.directory.add_permission(Permission::new("menus.read")).unwrap();
        let id = fx.account(Account::new("alice", "a@example.com"), &["editor"]);
        let editor = fx.directory.role_by_name("editor").unwrap();
        fx.directory.grant(editor.id, read).unwrap();
        let ctx = fx.context(id).await;

        let menu = Subject::Resource(ResourceId::new());
        assert!(fx.gate.require_permission(&ctx, &menu, "menus.read").await.is_ok());
    }

    #[tokio::test]
    async fn test_link_grants_any_role_holder() {
        let fx = Fixture::new();
        let write = fx.directory.add_permission(Permission::new("menus.write")).unwrap();
        let menu = Subject::Resource(ResourceId::new());
        fx.directory.link(menu, write).unwrap();

        let with_role = fx.account(Account::new("alice", "a@example.com"), &["viewer"]);
        let ctx = fx.context(with_role).await;
        assert!(fx.gate.require_permission(&ctx, &menu, "menus.write").await.is_ok());

        let other_menu = Subject::Resource(ResourceId::new());
        assert!(fx
            .gate
            .require_permission(&ctx, &other_menu, "menus.write")
            .await
            .is_err());
    }

    #[tokio::test]
    async fn test_link_requires_some_role() {
        let fx = Fixture::new();
        let write = fx.directory.add_permission(Permission::new("menus.write")).unwrap();
        let menu = Subject::Resource(ResourceId::new());
        fx.directory.link(menu, write).unwrap();

        let roleless = fx.account(Account::new("bob", "b@example.com"), &[]);
        let ctx = fx.context(roleless).await;
        assert!(matches!(
            fx.gate.require_permission(&ctx, &menu, "menus.write").await,
            Err(ApiError::Forbidden { .. })
        ));
    }

    #[tokio::test]
    async fn test_link_store_failure_fails_closed() {
        let fx = Fixture::new();
        fx.directory.add_permission(Permission::new("menus.write")).unwrap();
        let id = fx.account(Account::new("alice", "a@example.com"), &["viewer"]);
        let ctx = fx.context(id).await;

        let directory = fx.gate.directory().clone().with_model_permissions(Arc::new(FailingLinks));
        let gate = AuthGate::new(Arc::new(fx.gate.tokens().clone()), directory);
        let menu = Subject::Resource(ResourceId::new());

        let err = gate.require_permission(&ctx, &menu, "menus.write").await.unwrap_err();
        assert!(err.is_server_error());
    }
}
