// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! Collaborator interfaces consumed by the request gate.
//!
//! The gate never talks to a database directly. Every lookup goes through one
//! of the traits below, so a deployment can back them with SQL, a cache, or the
//! bundled [`InMemoryDirectory`](crate::memory::InMemoryDirectory).
//!
//! All methods are `async`. Dropping the returned future abandons the lookup,
//! which is how request cancellation propagates into the stores.

use std::sync::Arc;

use async_trait::async_trait;

use crate::error::StoreResult;
use crate::model::{Account, AccountCredentials, Permission, Role, Subject};
use crate::types::{AccountId, PermissionId, RoleId};

// =============================================================================
// Traits
// =============================================================================

/// Resolves account identifiers to account records.
#[async_trait]
pub trait IdentityStore: Send + Sync {
    /// Finds an account by id. Returns `Ok(None)` when it does not exist.
    async fn find_by_id(&self, id: AccountId) -> StoreResult<Option<Account>>;
}

/// Resolves login names to accounts with their password hashes.
#[async_trait]
pub trait CredentialStore: Send + Sync {
    /// Finds credentials by username. Returns `Ok(None)` when unknown.
    async fn find_by_username(&self, username: &str) -> StoreResult<Option<AccountCredentials>>;
}

/// Resolves role assignment and direct role grants.
#[async_trait]
pub trait RoleStore: Send + Sync {
    /// Returns the roles assigned to an account.
    async fn roles_of(&self, account_id: AccountId) -> StoreResult<Vec<Role>>;

    /// Returns the permissions directly granted to any of the given roles.
    ///
    /// Implementations may return duplicates; callers deduplicate by id.
    async fn permissions_of(&self, role_ids: &[RoleId]) -> StoreResult<Vec<Permission>>;
}

/// Answers whether a polymorphic subject holds a permission.
#[async_trait]
pub trait ModelPermissionStore: Send + Sync {
    /// Returns `true` if a link `(subject, permission_id)` exists.
    async fn exists(&self, subject: &Subject, permission_id: PermissionId) -> StoreResult<bool>;
}

/// Resolves permission names.
#[async_trait]
pub trait PermissionCatalog: Send + Sync {
    /// Finds a permission id by exact name.
    async fn find_by_name(&self, name: &str) -> StoreResult<Option<PermissionId>>;
}

// =============================================================================
// Directory
// =============================================================================

/// Bundle of every collaborator the auth layer needs.
///
/// Cloning is cheap; each store is reference-counted.
#[derive(Clone)]
pub struct Directory {
    /// Account lookup.
    pub identities: Arc<dyn IdentityStore>,
    /// Login lookup.
    pub credentials: Arc<dyn CredentialStore>,
    /// Roles and direct grants.
    pub roles: Arc<dyn RoleStore>,
    /// Subject permission links.
    pub model_permissions: Arc<dyn ModelPermissionStore>,
    /// Permission names.
    pub catalog: Arc<dyn PermissionCatalog>,
}

impl Directory {
    /// Creates a directory where one value implements every store.
    pub fn from_shared<S>(store: Arc<S>) -> Self
    where
        S: IdentityStore
            + CredentialStore
            + RoleStore
            + ModelPermissionStore
            + PermissionCatalog
            + 'static,
    {
        Self {
            identities: store.clone(),
            credentials: store.clone(),
            roles: store.clone(),
            model_permissions: store.clone(),
            catalog: store,
        }
    }

    /// Replaces the identity store.
    pub fn with_identities(mut self, store: Arc<dyn IdentityStore>) -> Self {
        self.identities = store;
        self
    }

    /// Replaces the credential store.
    pub fn with_credentials(mut self, store: Arc<dyn CredentialStore>) -> Self {
        self.credentials = store;
        self
    }

    /// Replaces the role store.
    pub fn with_roles(mut self, store: Arc<dyn RoleStore>) -> Self {
        self.roles = store;
        self
    }

    /// Replaces the model permission store.
    pub fn with_model_permissions(mut self, store: Arc<dyn ModelPermissionStore>) -> Self {
        self.model_permissions = store;
        self
    }

    /// Replaces the permission catalog.
    pub fn with_catalog(mut self, store: Arc<dyn PermissionCatalog>) -> Self {
        self.catalog = store;
        self
    }
}

impl std::fmt::Debug for Directory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Directory").finish_non_exhaustive()
    }
}
