// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! # Mock Stores
//!
//! Store implementations for exercising the gate in isolation.
//!
//! - [`FailingStore`] fails every lookup, so any store it is plugged into
//!   surfaces as an internal error.
//! - [`CountingStore`] delegates to a real directory and records how often
//!   each lookup runs.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use warden_core::{
    Account, AccountCredentials, AccountId, CredentialStore, Directory, IdentityStore,
    InMemoryDirectory, ModelPermissionStore, Permission, PermissionCatalog, PermissionId, Role,
    RoleId, RoleStore, StoreError, StoreResult, Subject,
};

// =============================================================================
// FailingStore
// =============================================================================

/// A store whose every lookup fails with [`StoreError::Unavailable`].
#[derive(Debug, Clone, Default)]
pub struct FailingStore;

impl FailingStore {
    fn fail<T>(&self, operation: &str) -> StoreResult<T> {
        Err(StoreError::unavailable(format!("{} is down", operation)))
    }

    /// Returns `directory` with its identity store failing.
    pub fn identities(directory: Directory) -> Directory {
        directory.with_identities(Arc::new(FailingStore))
    }

    /// Returns `directory` with its role store failing.
    pub fn roles(directory: Directory) -> Directory {
        directory.with_roles(Arc::new(FailingStore))
    }

    /// Returns `directory` with its link store failing.
    pub fn links(directory: Directory) -> Directory {
        directory.with_model_permissions(Arc::new(FailingStore))
    }

    /// Returns `directory` with its permission catalog failing.
    pub fn catalog(directory: Directory) -> Directory {
        directory.with_catalog(Arc::new(FailingStore))
    }

    /// Returns `directory` with its credential store failing.
    pub fn credentials(directory: Directory) -> Directory {
        directory.with_credentials(Arc::new(FailingStore))
    }
}

#[async_trait]
impl IdentityStore for FailingStore {
    async fn find_by_id(&self, _id: AccountId) -> StoreResult<Option<Account>> {
        self.fail("identity store")
    }
}

#[async_trait]
impl CredentialStore for FailingStore {
    async fn find_by_username(&self, _username: &str) -> StoreResult<Option<AccountCredentials>> {
        self.fail("credential store")
    }
}

#[async_trait]
impl RoleStore for FailingStore {
    async fn roles_of(&self, _account_id: AccountId) -> StoreResult<Vec<Role>> {
        self.fail("role store")
    }

    async fn permissions_of(&self, _role_ids: &[RoleId]) -> StoreResult<Vec<Permission>> {
        self.fail("role store")
    }
}

#[async_trait]
impl ModelPermissionStore for FailingStore {
    async fn exists(&self, _subject: &Subject, _permission_id: PermissionId) -> StoreResult<bool> {
        self.fail("link store")
    }
}

#[async_trait]
impl PermissionCatalog for FailingStore {
    async fn find_by_name(&self, _name: &str) -> StoreResult<Option<PermissionId>> {
        self.fail("permission catalog")
    }
}

// =============================================================================
// CountingStore
// =============================================================================

/// Call counters for a [`CountingStore`].
#[derive(Debug, Default)]
pub struct CallCounts {
    /// `IdentityStore::find_by_id`.
    pub find_by_id: AtomicU64,
    /// `CredentialStore::find_by_username`.
    pub find_by_username: AtomicU64,
    /// `RoleStore::roles_of`.
    pub roles_of: AtomicU64,
    /// `RoleStore::permissions_of`.
    pub permissions_of: AtomicU64,
    /// `ModelPermissionStore::exists`.
    pub link_exists: AtomicU64,
    /// `PermissionCatalog::find_by_name`.
    pub find_by_name: AtomicU64,
}

impl CallCounts {
    /// Reads a counter.
    pub fn get(counter: &AtomicU64) -> u64 {
        counter.load(Ordering::SeqCst)
    }

    /// Sum of all counters.
    pub fn total(&self) -> u64 {
        [
            &self.find_by_id,
            &self.find_by_username,
            &self.roles_of,
            &self.permissions_of,
            &self.link_exists,
            &self.find_by_name,
        ]
        .into_iter()
        .map(Self::get)
        .sum()
    }
}

/// Delegates to an [`InMemoryDirectory`] and counts every call.
#[derive(Debug, Clone)]
pub struct CountingStore {
    inner: Arc<InMemoryDirectory>,
    counts: Arc<CallCounts>,
}

impl CountingStore {
    /// Wraps `inner`.
    pub fn new(inner: Arc<InMemoryDirectory>) -> Self {
        Self {
            inner,
            counts: Arc::new(CallCounts::default()),
        }
    }

    /// Returns the shared counters.
    pub fn counts(&self) -> Arc<CallCounts> {
        self.counts.clone()
    }

    /// Returns a [`Directory`] where every store is this counter.
    pub fn directory(&self) -> Directory {
        Directory::from_shared(Arc::new(self.clone()))
    }

    fn hit(counter: &AtomicU64) {
        counter.fetch_add(1, Ordering::SeqCst);
    }
}

#[async_trait]
impl IdentityStore for CountingStore {
    async fn find_by_id(&self, id: AccountId) -> StoreResult<Option<Account>> {
        Self::hit(&self.counts.find_by_id);
        self.inner.find_by_id(id).await
    }
}

#[async_trait]
impl CredentialStore for CountingStore {
    async fn find_by_username(&self, username: &str) -> StoreResult<Option<AccountCredentials>> {
        Self::hit(&self.counts.find_by_username);
        self.inner.find_by_username(username).await
    }
}

#[async_trait]
impl RoleStore for CountingStore {
    async fn roles_of(&self, account_id: AccountId) -> StoreResult<Vec<Role>> {
        Self::hit(&self.counts.roles_of);
        self.inner.roles_of(account_id).await
    }

    async fn permissions_of(&self, role_ids: &[RoleId]) -> StoreResult<Vec<Permission>> {
        Self::hit(&self.counts.permissions_of);
        self.inner.permissions_of(role_ids).await
    }
}

#[async_trait]
impl ModelPermissionStore for CountingStore {
    async fn exists(&self, subject: &Subject, permission_id: PermissionId) -> StoreResult<bool> {
        Self::hit(&self.counts.link_exists);
        self.inner.exists(subject, permission_id).await
    }
}

#[async_trait]
impl PermissionCatalog for CountingStore {
    async fn find_by_name(&self, name: &str) -> StoreResult<Option<PermissionId>> {
        Self::hit(&self.counts.find_by_name);
        self.inner.find_by_name(name).await
    }
}
