// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! Authentication context.

use std::sync::Arc;

use serde::Serialize;
use warden_core::{Account, AccountId, PermissionId, Role, RoleId};

use super::permission::PermissionSet;

/// Authorization snapshot for one request.
///
/// Built by [`AuthGate::authenticate`](super::AuthGate::authenticate) and
/// stored in the request extensions. It lives exactly as long as the request.
#[derive(Debug, Clone, Serialize)]
pub struct AuthContext {
    /// The raw bearer token.
    #[serde(skip)]
    pub token: Arc<str>,
    /// Account ID.
    pub account_id: AccountId,
    /// Account email.
    pub email: String,
    /// Superuser flag at authentication time.
    pub is_superuser: bool,
    /// Assigned roles.
    pub roles: Arc<[Role]>,
    /// Direct role-granted permissions.
    #[serde(skip)]
    pub permissions: Arc<PermissionSet>,
}

impl AuthContext {
    /// Creates a context for an account.
    pub fn new(
        token: impl Into<Arc<str>>,
        account: &Account,
        roles: Vec<Role>,
        permissions: PermissionSet,
    ) -> Self {
        Self {
            token: token.into(),
            account_id: account.id,
            email: account.email.clone(),
            is_superuser: account.is_superuser,
            roles: roles.into(),
            permissions: Arc::new(permissions),
        }
    }

    /// Returns `true` if any role matches `name`, ignoring case.
    pub fn has_role(&self, name: &str) -> bool {
        self.roles.iter().any(|r| r.matches_name(name))
    }

    /// Returns `true` if any role matches any of `names`, ignoring case.
    pub fn has_any_role<S: AsRef<str>>(&self, names: &[S]) -> bool {
        names.iter().any(|name| self.has_role(name.as_ref()))
    }

    /// Returns `true` if the permission was granted directly through a role.
    pub fn has_permission(&self, id: PermissionId) -> bool {
        self.permissions.contains(id)
    }

    /// Returns the ids of the assigned roles.
    pub fn role_ids(&self) -> Vec<RoleId> {
        self.roles.iter().map(|r| r.id).collect()
    }

    /// Returns the role names.
    pub fn role_names(&self) -> Vec<&str> {
        self.roles.iter().map(|r| r.name.as_str()).collect()
    }
}
